//! Unified error type for the pre-market bot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Quote API error: {0}")]
    Quote(String),

    #[error("News API error: {0}")]
    News(String),

    #[error("Sentiment service error: {0}")]
    Sentiment(String),

    #[error("Notifier error: {0}")]
    Notify(String),

    #[error("Prediction log error: {0}")]
    Log(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
