//! Domain types shared across the bot.
//!
//! Every market signal travels as `Option<f64>`: `None` means the source was
//! unavailable. A numeric zero is never used as a stand-in for "missing".

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Headlines ─────────────────────────────────────────────────────────

/// A single news headline with its source link. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub text: String,
    pub link: String,
}

impl Headline {
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }
}

/// Coarse sentiment for one headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl SentimentLabel {
    /// Integer weight contributed to the aggregate sentiment score.
    pub fn weight(self) -> i64 {
        match self {
            SentimentLabel::Bullish => 3,
            SentimentLabel::Bearish => -3,
            SentimentLabel::Neutral => 0,
        }
    }

    /// Display glyph, also the symbol the classifier is asked to emit.
    pub fn glyph(self) -> &'static str {
        match self {
            SentimentLabel::Bullish => "📈",
            SentimentLabel::Bearish => "📉",
            SentimentLabel::Neutral => "🔹",
        }
    }
}

/// A headline paired with its classification result. Created once per cycle,
/// read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedHeadline {
    pub headline: Headline,
    pub label: SentimentLabel,
    pub weight: i64,
    /// Pre-rendered line for reports: "{glyph} {text} - {link}".
    pub display: String,
}

impl ClassifiedHeadline {
    pub fn new(headline: Headline, label: SentimentLabel) -> Self {
        let display = format!("{} {} - {}", label.glyph(), headline.text, headline.link);
        Self {
            headline,
            label,
            weight: label.weight(),
            display,
        }
    }
}

// ── Signals & bias ────────────────────────────────────────────────────

/// Snapshot of the four market signals for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketSnapshot {
    /// Current index price.
    pub spx: Option<f64>,
    /// Near-term futures price.
    pub es: Option<f64>,
    /// Previous-session futures settle.
    pub prev_es: Option<f64>,
    /// Volatility index level.
    pub vix: Option<f64>,
}

/// The forced directional call. Neutral is not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Bullish => "📈",
            Direction::Bearish => "📉",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => write!(f, "📈 Bullish"),
            Direction::Bearish => write!(f, "📉 Bearish"),
        }
    }
}

// ── Prediction log ────────────────────────────────────────────────────

/// One appended row of the prediction log. Missing signals serialize as
/// empty cells, never as zero.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub date: NaiveDate,
    pub spx: Option<f64>,
    pub es: Option<f64>,
    pub vix: Option<f64>,
    pub sentiment_score: i64,
    pub predicted_trend: String,
    pub predicted_move_pts: Option<f64>,
}
