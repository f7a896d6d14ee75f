use common::{Direction, MarketSnapshot};
use serde::{Deserialize, Serialize};

/// Inputs to the bias estimator.
///
/// Every market signal is optionally missing; the sentiment score defaults to
/// 0 upstream when no headlines qualify. Inputs arrive pre-sanitized, so the
/// estimator has no error states of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasInput {
    /// Current index price. Carried for reporting; not a scored factor.
    pub spx: Option<f64>,
    /// Near-term futures price.
    pub es: Option<f64>,
    /// Previous-session futures settle.
    pub prev_es: Option<f64>,
    /// Volatility index level.
    pub vix: Option<f64>,
    /// Signed sum of per-headline sentiment weights.
    pub sentiment_score: i64,
}

impl BiasInput {
    pub fn from_snapshot(snapshot: &MarketSnapshot, sentiment_score: i64) -> Self {
        Self {
            spx: snapshot.spx,
            es: snapshot.es,
            prev_es: snapshot.prev_es,
            vix: snapshot.vix,
            sentiment_score,
        }
    }
}

/// The estimator's output: a forced directional call plus the ordered
/// rationale trail explaining it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasResult {
    pub direction: Direction,
    pub rationale: Vec<String>,
}
