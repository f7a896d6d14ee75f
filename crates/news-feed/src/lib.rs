//! Headline feeds: Finnhub and Marketaux news adapters.
//!
//! Each source is best-effort: a failed fetch contributes an empty list and a
//! warning, never an error to the caller. Headlines are filtered for market
//! relevance at collection time; callers are expected to filter again before
//! classification in case a source ignores the pre-filter.

pub mod relevance;

use std::time::Duration;

use common::{Error, Headline, Result};
use serde::Deserialize;
use tracing::{debug, warn};

pub use relevance::is_market_relevant;

const FINNHUB_NEWS_URL: &str = "https://finnhub.io/api/v1/news";
const MARKETAUX_NEWS_URL: &str = "https://api.marketaux.com/v1/news/all";

/// Cap per source, matching the feeds' useful depth.
const MAX_HEADLINES_PER_SOURCE: usize = 10;

// ── Wire types ────────────────────────────────────────────────────────

/// One item of the Finnhub general-news array.
#[derive(Debug, Deserialize)]
pub struct FinnhubNewsItem {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub url: String,
}

/// Envelope of GET /v1/news/all on Marketaux.
#[derive(Debug, Deserialize)]
pub struct MarketauxResponse {
    #[serde(default)]
    pub data: Vec<MarketauxArticle>,
}

#[derive(Debug, Deserialize)]
pub struct MarketauxArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

// ── Clients ───────────────────────────────────────────────────────────

/// Finnhub general-news client.
#[derive(Debug, Clone)]
pub struct FinnhubNewsClient {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl FinnhubNewsClient {
    pub fn new(token: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            client: build_http_client(timeout_ms),
            url: FINNHUB_NEWS_URL.to_string(),
            token: token.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Latest general-market headlines, best-effort ordered as served.
    pub async fn latest_headlines(&self) -> Result<Vec<Headline>> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[("category", "general"), ("token", &self.token)])
            .send()
            .await
            .map_err(|e| Error::Http(format!("finnhub news request: {}", e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::News(format!(
                "finnhub news returned {}: {}",
                status,
                &body[..body.len().min(200)]
            )));
        }

        let items: Vec<FinnhubNewsItem> = resp
            .json()
            .await
            .map_err(|e| Error::News(format!("finnhub news parse: {}", e)))?;

        debug!("Finnhub returned {} news items", items.len());

        Ok(items
            .into_iter()
            .take(MAX_HEADLINES_PER_SOURCE)
            .filter(|item| !item.headline.is_empty())
            .map(|item| Headline::new(item.headline, item.url))
            .collect())
    }
}

/// Marketaux symbol-scoped news client.
#[derive(Debug, Clone)]
pub struct MarketauxNewsClient {
    client: reqwest::Client,
    url: String,
    token: String,
    symbols: String,
}

impl MarketauxNewsClient {
    pub fn new(token: impl Into<String>, symbols: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            client: build_http_client(timeout_ms),
            url: MARKETAUX_NEWS_URL.to_string(),
            token: token.into(),
            symbols: symbols.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Latest symbol-scoped headlines, best-effort ordered as served.
    pub async fn latest_headlines(&self) -> Result<Vec<Headline>> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("symbols", self.symbols.as_str()),
                ("filter_entities", "true"),
                ("language", "en"),
                ("api_token", self.token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(format!("marketaux news request: {}", e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::News(format!(
                "marketaux news returned {}: {}",
                status,
                &body[..body.len().min(200)]
            )));
        }

        let envelope: MarketauxResponse = resp
            .json()
            .await
            .map_err(|e| Error::News(format!("marketaux news parse: {}", e)))?;

        debug!("Marketaux returned {} articles", envelope.data.len());

        Ok(envelope
            .data
            .into_iter()
            .take(MAX_HEADLINES_PER_SOURCE)
            .filter(|article| !article.title.is_empty())
            .map(|article| Headline::new(article.title, article.url))
            .collect())
    }
}

fn build_http_client(timeout_ms: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .pool_max_idle_per_host(4)
        .build()
        .expect("failed to build news HTTP client")
}

// ── Collection ────────────────────────────────────────────────────────

/// Gather headlines from both feeds and keep the market-relevant ones.
///
/// A source that fails contributes nothing; the other still runs. Order is
/// preserved: Finnhub items first, then Marketaux.
pub async fn collect_headlines(
    finnhub: &FinnhubNewsClient,
    marketaux: &MarketauxNewsClient,
) -> Vec<Headline> {
    let mut all = Vec::new();

    match finnhub.latest_headlines().await {
        Ok(headlines) => all.extend(headlines),
        Err(e) => warn!("Finnhub news fetch failed: {}", e),
    }

    match marketaux.latest_headlines().await {
        Ok(headlines) => all.extend(headlines),
        Err(e) => warn!("Marketaux news fetch failed: {}", e),
    }

    all.retain(|h| is_market_relevant(&h.text));
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finnhub_array_deserializes() {
        let raw = r#"[
            {"headline":"Fed holds rates steady","url":"https://example.com/fed","source":"x"},
            {"headline":"","url":"https://example.com/empty"},
            {"url":"https://example.com/missing-title"}
        ]"#;
        let items: Vec<FinnhubNewsItem> = serde_json::from_str(raw).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].headline, "Fed holds rates steady");
        assert_eq!(items[2].headline, "");
    }

    #[test]
    fn test_marketaux_envelope_deserializes() {
        let raw = r#"{"meta":{"found":2},"data":[
            {"title":"Treasury yields jump","url":"https://example.com/yields"},
            {"title":"Earnings beat estimates","url":"https://example.com/earnings"}
        ]}"#;
        let envelope: MarketauxResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[1].title, "Earnings beat estimates");
    }

    #[test]
    fn test_marketaux_empty_envelope_is_ok() {
        let envelope: MarketauxResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(envelope.data.is_empty());
    }
}
