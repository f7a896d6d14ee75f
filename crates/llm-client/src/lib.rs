//! Batched headline sentiment classification via the Anthropic Messages API.

pub mod client;
pub mod labels;

pub use client::{LlmClient, SentimentClassifier};
pub use labels::{aggregate_score, neutral_labels, pair_headlines, parse_labels};
