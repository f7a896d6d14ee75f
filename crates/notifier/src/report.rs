//! Report assembly: plaintext and HTML renderings of one cycle.
//!
//! Rendering borrows every input and mutates nothing. Missing numeric
//! signals render as "unavailable" — a report is produced even under total
//! data loss.

use chrono::NaiveDate;
use common::{ClassifiedHeadline, Direction, MarketSnapshot};

/// Everything the renderer needs for one cycle, borrowed.
pub struct ReportInput<'a> {
    pub date: NaiveDate,
    pub slot_label: &'a str,
    pub snapshot: &'a MarketSnapshot,
    pub sentiment_score: i64,
    pub headlines: &'a [ClassifiedHeadline],
    pub direction: Direction,
    pub rationale: &'a [String],
    /// Human-readable generation timestamp for the footer.
    pub generated_at: &'a str,
}

/// A rendered notification payload, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub plain_body: String,
    pub html_body: String,
}

/// Render a missing-aware signal for display.
fn fmt_signal(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "unavailable".to_string(),
    }
}

/// Build the full report for one cycle.
pub fn build_report(input: &ReportInput<'_>) -> Report {
    let subject = format!("📊 Pre-Market Alert | {}", input.slot_label);

    let headline_lines: Vec<String> = input
        .headlines
        .iter()
        .map(|h| format!("- {}", h.display))
        .collect();
    let rationale_lines: Vec<String> = input
        .rationale
        .iter()
        .map(|r| format!("- {}", r))
        .collect();

    let plain_body = format!(
        "📊 Pre-Market Alert for {}\n\
         🔹 SPX: {}  🔺 VIX: {}  📉 ES: {}\n\
         📊 Sentiment Score: {}\n\
         \n\
         📰 Headlines:\n\
         {}\n\
         \n\
         📊 Market Bias: {}\n\
         {}\n\
         \n\
         Generated by premarket-bot • {}\n",
        input.date,
        fmt_signal(input.snapshot.spx),
        fmt_signal(input.snapshot.vix),
        fmt_signal(input.snapshot.es),
        input.sentiment_score,
        if headline_lines.is_empty() {
            "- (no market-relevant headlines)".to_string()
        } else {
            headline_lines.join("\n")
        },
        input.direction,
        rationale_lines.join("\n"),
        input.generated_at,
    );

    let headline_items: String = if input.headlines.is_empty() {
        "<li>(no market-relevant headlines)</li>".to_string()
    } else {
        input
            .headlines
            .iter()
            .map(|h| format!("<li>{}</li>", h.display))
            .collect()
    };
    let rationale_items: String = input
        .rationale
        .iter()
        .map(|r| format!("<li>{}</li>", r))
        .collect();

    let html_body = format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; padding: 20px; color: #333;">
  <h2 style="color: #0d6efd;">📊 Pre-Market Alert for {}</h2>
  <p>
    <strong>🔹 SPX:</strong> {} &nbsp;&nbsp;
    <strong>🔺 VIX:</strong> {} &nbsp;&nbsp;
    <strong>📉 ES:</strong> {}
  </p>
  <p><strong>📊 Sentiment Score:</strong> <span style="font-size: 1.2em; font-weight: bold;">{}</span></p>
  <h3>📰 Headlines:</h3>
  <ul>{}</ul>
  <h3>📊 Market Bias: {}</h3>
  <ul>{}</ul>
  <p style="font-size: 0.9em; color: #888;">Generated by premarket-bot • {}</p>
</body>
</html>"#,
        input.date,
        fmt_signal(input.snapshot.spx),
        fmt_signal(input.snapshot.vix),
        fmt_signal(input.snapshot.es),
        input.sentiment_score,
        headline_items,
        input.direction,
        rationale_items,
        input.generated_at,
    );

    Report {
        subject,
        plain_body,
        html_body,
    }
}
