//! Directional bias estimation.
//!
//! A pure scoring pass over one cycle's signals. The output is always one of
//! two directions: a net-zero score resolves to Bearish, never Neutral, so
//! the caller always gets an actionable call even under total data loss.

use common::Direction;

use crate::types::{BiasInput, BiasResult};

/// Futures gap (in points) beyond which the gap becomes a scored factor.
/// Gaps inside [-10, 10] contribute nothing.
const GAP_THRESHOLD_PTS: f64 = 10.0;

/// Absolute aggregate sentiment needed to count as a news bias.
const SENTIMENT_THRESHOLD: i64 = 3;

/// VIX level above which volatility adds bearish weight.
const HIGH_VIX_LEVEL: f64 = 30.0;

/// Estimate the directional bias for one cycle.
///
/// Deterministic and free of I/O: identical inputs produce an identical
/// direction and rationale sequence. Rationale order is fixed — gap note
/// first, then triggered factors in evaluation order, forced-direction
/// note last.
pub fn estimate(input: &BiasInput) -> BiasResult {
    let mut score: i64 = 0;
    let mut rationale: Vec<String> = Vec::new();

    let gap = match (input.es, input.prev_es) {
        (Some(es), Some(prev_es)) => {
            let gap = es - prev_es;
            rationale.push(format!("Calculated ES Gap: {:.2}", gap));
            gap
        }
        _ => {
            rationale.push("Gap calculation skipped: Missing ES data".to_string());
            0.0
        }
    };

    if gap > GAP_THRESHOLD_PTS {
        score += 1;
        rationale.push("ES futures lead SPX → bullish".to_string());
    } else if gap < -GAP_THRESHOLD_PTS {
        score -= 1;
        rationale.push("ES futures lag SPX → bearish".to_string());
    }

    if input.sentiment_score >= SENTIMENT_THRESHOLD {
        score += 1;
        rationale.push("Positive news bias".to_string());
    } else if input.sentiment_score <= -SENTIMENT_THRESHOLD {
        score -= 1;
        rationale.push("Negative news bias".to_string());
    }

    if let Some(vix) = input.vix {
        if vix > HIGH_VIX_LEVEL {
            score -= 1;
            rationale.push("High VIX (>30) → bearish weight".to_string());
        }
    }

    // Forced binary resolution: a score of exactly 0 lands Bearish.
    let direction = if score > 0 {
        rationale.push("Neutral bias overridden → forced Bullish".to_string());
        Direction::Bullish
    } else {
        rationale.push("Neutral bias overridden → forced Bearish".to_string());
        Direction::Bearish
    };

    BiasResult {
        direction,
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_input(
        es: Option<f64>,
        prev_es: Option<f64>,
        vix: Option<f64>,
        sentiment_score: i64,
    ) -> BiasInput {
        BiasInput {
            spx: Some(5900.0),
            es,
            prev_es,
            vix,
            sentiment_score,
        }
    }

    #[test]
    fn test_bullish_gap_forces_bullish() {
        // gap=+15, sentiment=0, vix=20 → score=+1 → Bullish
        let result = estimate(&make_input(Some(5915.0), Some(5900.0), Some(20.0), 0));
        assert_eq!(result.direction, Direction::Bullish);
        assert!(result
            .rationale
            .contains(&"ES futures lead SPX → bullish".to_string()));
        assert_eq!(
            result.rationale.last().unwrap(),
            "Neutral bias overridden → forced Bullish"
        );
    }

    #[test]
    fn test_all_missing_resolves_bearish() {
        // Both futures missing, vix missing, sentiment 0 → score=0 → Bearish
        let result = estimate(&make_input(None, None, None, 0));
        assert_eq!(result.direction, Direction::Bearish);
        assert!(result
            .rationale
            .contains(&"Gap calculation skipped: Missing ES data".to_string()));
        assert_eq!(
            result.rationale.last().unwrap(),
            "Neutral bias overridden → forced Bearish"
        );
    }

    #[test]
    fn test_mixed_factors_net_bearish() {
        // gap=-15 (-1), sentiment=+3 (+1), vix=35 (-1) → score=-1 → Bearish
        let result = estimate(&make_input(Some(5885.0), Some(5900.0), Some(35.0), 3));
        assert_eq!(result.direction, Direction::Bearish);
        assert_eq!(
            result.rationale,
            vec![
                "Calculated ES Gap: -15.00".to_string(),
                "ES futures lag SPX → bearish".to_string(),
                "Positive news bias".to_string(),
                "High VIX (>30) → bearish weight".to_string(),
                "Neutral bias overridden → forced Bearish".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_score_ties_break_bearish() {
        // Everything present but nothing triggers: documented quirk — a net
        // score of exactly 0 is Bearish, not Neutral.
        let result = estimate(&make_input(Some(5905.0), Some(5900.0), Some(18.0), 0));
        assert_eq!(result.direction, Direction::Bearish);
    }

    #[test]
    fn test_gap_threshold_is_inclusive_dead_zone() {
        // A gap of exactly ±10 contributes nothing, and adds no factor line.
        for gap in [10.0, -10.0] {
            let result = estimate(&make_input(Some(5900.0 + gap), Some(5900.0), None, 0));
            assert_eq!(result.direction, Direction::Bearish);
            assert!(!result.rationale.iter().any(|r| r.contains("futures")));
        }
    }

    #[test]
    fn test_one_missing_futures_leg_skips_gap() {
        for (es, prev_es) in [(Some(5950.0), None), (None, Some(5900.0))] {
            let result = estimate(&make_input(es, prev_es, None, 0));
            assert_eq!(
                result.rationale[0],
                "Gap calculation skipped: Missing ES data"
            );
            // The skipped gap contributes exactly 0: no gap factor fires.
            assert!(!result.rationale.iter().any(|r| r.contains("futures")));
        }
    }

    #[test]
    fn test_negative_sentiment_counts_bearish() {
        let result = estimate(&make_input(None, None, None, -3));
        assert_eq!(result.direction, Direction::Bearish);
        assert!(result
            .rationale
            .contains(&"Negative news bias".to_string()));
    }

    #[test]
    fn test_vix_at_threshold_does_not_fire() {
        let result = estimate(&make_input(None, None, Some(30.0), 3));
        assert_eq!(result.direction, Direction::Bullish);
        assert!(!result.rationale.iter().any(|r| r.contains("VIX")));
    }

    #[test]
    fn test_estimator_is_deterministic() {
        let input = make_input(Some(5920.0), Some(5900.0), Some(32.0), -6);
        let first = estimate(&input);
        let second = estimate(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn test_direction_is_always_binary() {
        let inputs = [
            make_input(None, None, None, 0),
            make_input(Some(6000.0), Some(5900.0), Some(50.0), 9),
            make_input(Some(5800.0), Some(5900.0), Some(10.0), -9),
            make_input(Some(5900.0), Some(5900.0), None, 1),
        ];
        for input in inputs {
            let result = estimate(&input);
            assert!(matches!(
                result.direction,
                Direction::Bullish | Direction::Bearish
            ));
            assert!(result
                .rationale
                .last()
                .unwrap()
                .starts_with("Neutral bias overridden"));
        }
    }
}
