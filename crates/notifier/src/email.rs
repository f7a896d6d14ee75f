//! Email delivery via an HTTP mail relay.
//!
//! The relay accepts a JSON payload {from, to, subject, text, html} and does
//! the actual SMTP work. Delivery is fire-and-forget from the bot's point of
//! view: a failed send is logged, never escalated.

use std::time::Duration;

use common::{Error, Result};
use serde_json::json;
use tracing::{info, warn};

use crate::report::Report;

#[derive(Debug, Clone)]
pub struct EmailNotifier {
    client: reqwest::Client,
    relay_url: String,
    from: String,
    to: String,
}

impl EmailNotifier {
    pub fn new(
        relay_url: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("failed to build email HTTP client");

        Self {
            client,
            relay_url: relay_url.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Deliver the report. Never returns an error to the caller.
    pub async fn send(&self, report: &Report) {
        match self.try_send(report).await {
            Ok(()) => info!("✅ Report emailed to {}", self.to),
            Err(e) => warn!("❌ Email delivery failed: {}", e),
        }
    }

    async fn try_send(&self, report: &Report) -> Result<()> {
        let payload = json!({
            "from": self.from,
            "to": self.to,
            "subject": report.subject,
            "text": report.plain_body,
            "html": report.html_body,
        });

        let resp = self
            .client
            .post(&self.relay_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Http(format!("mail relay request: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Notify(format!(
                "mail relay returned {}: {}",
                status.as_u16(),
                &body[..body.len().min(200)]
            )));
        }

        Ok(())
    }
}
