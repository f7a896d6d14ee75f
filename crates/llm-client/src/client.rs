//! Anthropic Messages API client for batched headline classification.

use std::time::Duration;

use common::{Error, Result, SentimentLabel};
use serde_json::json;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::labels::{neutral_labels, parse_labels};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

const SYSTEM_PROMPT: &str = "You are a financial sentiment classifier. \
For each headline, respond with exactly one of 📈, 📉, or 🔹. \
Give one symbol per line, in the same order as the input. \
Do not output anything else.";

pub struct LlmClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
}

impl LlmClient {
    pub fn new(api_key: String, model: String, timeout_ms: u64, max_retries: u32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("failed to build LLM HTTP client");

        Self {
            client,
            api_url: ANTHROPIC_API_URL.to_string(),
            api_key,
            model,
            max_retries,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn extract_text_content(response_body: &serde_json::Value) -> Result<&str> {
        let content_arr = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| Error::Sentiment("missing or invalid 'content' field".into()))?;

        content_arr
            .iter()
            .find(|item| item["type"] == "text")
            .and_then(|item| item["text"].as_str())
            .ok_or_else(|| Error::Sentiment("missing 'text' content".into()))
    }

    /// One batched classification call: one label line per input headline.
    ///
    /// Errors on transport failure, a non-success status after retries, or a
    /// response whose line count does not match the input length.
    pub async fn request_labels(&self, texts: &[String]) -> Result<Vec<SentimentLabel>> {
        let payload = json!({
            "model": self.model,
            "max_tokens": 200,
            "system": SYSTEM_PROMPT,
            "messages": [
                {
                    "role": "user",
                    "content": texts.join("\n")
                }
            ]
        });

        let mut attempt = 0u32;
        loop {
            let send_result = self
                .client
                .post(&self.api_url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .json(&payload)
                .send()
                .await;

            match send_result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        if status.as_u16() == 429 && attempt < self.max_retries {
                            attempt += 1;
                            sleep(Duration::from_millis(150 * u64::from(attempt))).await;
                            continue;
                        }
                        return Err(Error::Sentiment(format!(
                            "classifier returned {}: {}",
                            status.as_u16(),
                            &body[..body.len().min(200)]
                        )));
                    }

                    let response_body: serde_json::Value = response
                        .json()
                        .await
                        .map_err(|e| Error::Sentiment(format!("response decode: {}", e)))?;
                    let text = Self::extract_text_content(&response_body)?;
                    debug!("Classifier raw response: {:?}", text);

                    return parse_labels(text, texts.len()).ok_or_else(|| {
                        Error::Sentiment(format!(
                            "response line count does not match {} input headlines",
                            texts.len()
                        ))
                    });
                }
                Err(e) => {
                    if attempt < self.max_retries {
                        attempt += 1;
                        sleep(Duration::from_millis(150 * u64::from(attempt))).await;
                        continue;
                    }
                    return Err(Error::Http(format!("classifier request: {}", e)));
                }
            }
        }
    }
}

/// Classifier facade that never fails.
///
/// Output always has the same length and order as the input; any failure of
/// the underlying service degrades the whole batch to Neutral.
pub struct SentimentClassifier {
    inner: Option<LlmClient>,
}

impl SentimentClassifier {
    pub fn new(inner: Option<LlmClient>) -> Self {
        Self { inner }
    }

    pub async fn classify(&self, texts: &[String]) -> Vec<SentimentLabel> {
        if texts.is_empty() {
            return Vec::new();
        }

        let Some(client) = &self.inner else {
            warn!("No classifier configured; treating all headlines as Neutral");
            return neutral_labels(texts.len());
        };

        match client.request_labels(texts).await {
            Ok(labels) => labels,
            Err(e) => {
                warn!("Sentiment classification failed: {}", e);
                neutral_labels(texts.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_content() {
        let body = json!({
            "content": [
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "📈\n📉"}
            ]
        });
        assert_eq!(LlmClient::extract_text_content(&body).unwrap(), "📈\n📉");
    }

    #[test]
    fn test_extract_text_content_missing_is_error() {
        let body = json!({"content": []});
        assert!(LlmClient::extract_text_content(&body).is_err());

        let body = json!({"error": "overloaded"});
        assert!(LlmClient::extract_text_content(&body).is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_classifier_degrades_to_neutral() {
        let classifier = SentimentClassifier::new(None);
        let texts = vec!["Fed cuts rates".to_string(), "Markets rally".to_string()];
        let labels = classifier.classify(&texts).await;
        assert_eq!(labels, neutral_labels(2));
    }

    #[tokio::test]
    async fn test_empty_batch_is_empty() {
        let classifier = SentimentClassifier::new(None);
        assert!(classifier.classify(&[]).await.is_empty());
    }
}
