//! Market-relevance keyword filter.

/// Domain terms that mark a headline as market-relevant.
const MARKET_KEYWORDS: &[&str] = &[
    "fed",
    "tariff",
    "rate",
    "inflation",
    "yields",
    "bond",
    "treasury",
    "earnings",
    "revenue",
    "stocks",
    "markets",
    "recession",
    "jobless",
    "cpi",
    "ppi",
    "gdp",
    "volatility",
];

/// True iff the lowercased text contains at least one market keyword.
/// Substring match, not whole-word; pure, no side effects.
pub fn is_market_relevant(text: &str) -> bool {
    let lowered = text.to_lowercase();
    MARKET_KEYWORDS.iter().any(|k| lowered.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_keyword_matches() {
        assert!(is_market_relevant("Fed signals pause on rate hikes"));
        assert!(is_market_relevant("Treasury yields climb ahead of auction"));
        assert!(is_market_relevant("CPI report due"));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert!(is_market_relevant("INFLATION COOLS IN JULY"));
        assert!(is_market_relevant("gdp growth revised up"));
    }

    #[test]
    fn test_match_is_substring_not_whole_word() {
        // "rate" inside "corporate" still matches; the filter is intentionally
        // coarse and errs toward keeping headlines.
        assert!(is_market_relevant("Corporate borrowing surges"));
    }

    #[test]
    fn test_off_topic_text_rejected() {
        assert!(!is_market_relevant("I like cars"));
        assert!(!is_market_relevant("Local team wins championship"));
        assert!(!is_market_relevant(""));
    }
}
