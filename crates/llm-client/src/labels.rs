//! Classifier output parsing and label/headline pairing.

use common::{ClassifiedHeadline, Headline, SentimentLabel};

/// Parse one response line into a label. The classifier is instructed to
/// answer with a bare glyph; anything unrecognized falls back to Neutral.
fn parse_label_line(line: &str) -> SentimentLabel {
    let trimmed = line.trim();
    if trimmed.starts_with(SentimentLabel::Bullish.glyph()) {
        SentimentLabel::Bullish
    } else if trimmed.starts_with(SentimentLabel::Bearish.glyph()) {
        SentimentLabel::Bearish
    } else {
        SentimentLabel::Neutral
    }
}

/// Parse the raw completion into labels.
///
/// Returns `None` unless the response has exactly `expected` non-empty
/// lines — a shorter or longer response must not be paired with headlines,
/// since the alignment would be unknown.
pub fn parse_labels(raw: &str, expected: usize) -> Option<Vec<SentimentLabel>> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() != expected {
        return None;
    }

    Some(lines.into_iter().map(parse_label_line).collect())
}

/// The degraded output: one Neutral per input.
pub fn neutral_labels(len: usize) -> Vec<SentimentLabel> {
    vec![SentimentLabel::Neutral; len]
}

/// Pair headlines with their labels, in order.
///
/// The classifier contract guarantees `labels.len() == headlines.len()`;
/// `zip` keeps this total even if a caller violates it.
pub fn pair_headlines(
    headlines: Vec<Headline>,
    labels: &[SentimentLabel],
) -> Vec<ClassifiedHeadline> {
    headlines
        .into_iter()
        .zip(labels.iter().copied())
        .map(|(headline, label)| ClassifiedHeadline::new(headline, label))
        .collect()
}

/// Signed sum of per-headline weights.
pub fn aggregate_score(classified: &[ClassifiedHeadline]) -> i64 {
    classified.iter().map(|c| c.weight).sum()
}
