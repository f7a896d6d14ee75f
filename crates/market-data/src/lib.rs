//! Finnhub quote client.
//!
//! One thin adapter per market signal. The `fetch_*` methods implement the
//! signal-source contract: every transport or parse failure is recovered at
//! this boundary and returned as `None`, with a warning — it never escalates.

use std::time::Duration;

use common::{Error, Result};
use serde::Deserialize;
use tracing::{debug, warn};

const FINNHUB_API_BASE: &str = "https://finnhub.io/api/v1";

/// Quote payload from GET /quote. `c` is the current price, `pc` the
/// previous close. Finnhub reports unknown symbols as all-zero quotes.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuoteResponse {
    #[serde(default)]
    pub c: f64,
    #[serde(default)]
    pub pc: f64,
}

/// A quote with missing-aware fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quote {
    pub price: Option<f64>,
    pub previous_close: Option<f64>,
}

impl From<QuoteResponse> for Quote {
    fn from(raw: QuoteResponse) -> Self {
        Self {
            price: sanitize_level(raw.c),
            previous_close: sanitize_level(raw.pc),
        }
    }
}

/// Map a raw quote level to a present value. Finnhub reports "no data" as
/// 0.0, so zero and non-finite levels are both Missing.
fn sanitize_level(value: f64) -> Option<f64> {
    if value.is_finite() && value != 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Finnhub REST client with connection pooling and a request timeout.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl QuoteClient {
    pub fn new(token: impl Into<String>, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_max_idle_per_host(4)
            .build()
            .expect("failed to build quote HTTP client");

        Self {
            client,
            api_base: FINNHUB_API_BASE.to_string(),
            token: token.into(),
        }
    }

    /// Override the API base URL (used by integration setups).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Fetch the raw quote for `symbol`. All failures are typed.
    pub async fn get_quote(&self, symbol: &str) -> Result<Quote> {
        let url = format!("{}/quote", self.api_base);
        debug!("Fetching quote for {}", symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("token", &self.token)])
            .send()
            .await
            .map_err(|e| Error::Http(format!("quote request for {}: {}", symbol, e)))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Quote(format!(
                "quote API returned {} for {}: {}",
                status,
                symbol,
                &body[..body.len().min(200)]
            )));
        }

        let raw: QuoteResponse = resp
            .json()
            .await
            .map_err(|e| Error::Quote(format!("quote parse for {}: {}", symbol, e)))?;

        Ok(Quote::from(raw))
    }

    /// Current price for `symbol`, or `None` when the source is unavailable.
    pub async fn fetch_price(&self, symbol: &str) -> Option<f64> {
        match self.get_quote(symbol).await {
            Ok(quote) => quote.price,
            Err(e) => {
                warn!("Failed to fetch price for {}: {}", symbol, e);
                None
            }
        }
    }

    /// Previous-session close for `symbol`, or `None` when unavailable.
    pub async fn fetch_previous_close(&self, symbol: &str) -> Option<f64> {
        match self.get_quote(symbol).await {
            Ok(quote) => quote.previous_close,
            Err(e) => {
                warn!("Failed to fetch previous close for {}: {}", symbol, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_rejects_zero_and_non_finite() {
        assert_eq!(sanitize_level(0.0), None);
        assert_eq!(sanitize_level(f64::NAN), None);
        assert_eq!(sanitize_level(f64::INFINITY), None);
        assert_eq!(sanitize_level(5912.25), Some(5912.25));
    }

    #[test]
    fn test_quote_response_deserializes() {
        let raw: QuoteResponse =
            serde_json::from_str(r#"{"c":5912.25,"pc":5890.0,"h":5920.5,"l":5880.0}"#).unwrap();
        let quote = Quote::from(raw);
        assert_eq!(quote.price, Some(5912.25));
        assert_eq!(quote.previous_close, Some(5890.0));
    }

    #[test]
    fn test_unknown_symbol_quote_is_missing() {
        // Finnhub answers unknown symbols with zeroed fields, not an error.
        let raw: QuoteResponse = serde_json::from_str(r#"{"c":0,"pc":0}"#).unwrap();
        let quote = Quote::from(raw);
        assert_eq!(quote.price, None);
        assert_eq!(quote.previous_close, None);
    }

    #[test]
    fn test_missing_fields_default_to_missing() {
        let raw: QuoteResponse = serde_json::from_str(r#"{}"#).unwrap();
        let quote = Quote::from(raw);
        assert_eq!(quote.price, None);
        assert_eq!(quote.previous_close, None);
    }
}
