//! Aggregation of per-article analyses into one news sentiment.

use crate::types::{ArticleAnalysis, Impact, MarketSentiment, NewsSentiment};

/// Maximum number of reasons surfaced as top factors.
pub const MAX_TOP_FACTORS: usize = 3;

/// Characters kept from each reason before the ellipsis.
const FACTOR_CHARS: usize = 100;

pub const NO_FACTORS_PLACEHOLDER: &str = "No significant news factors found";

/// Confidence reported when there is nothing to aggregate.
const EMPTY_CONFIDENCE: f64 = 50.0;

/// Combine article analyses.
///
/// A direction wins only if its count strictly exceeds both other counts;
/// every tie resolves to neutral.
pub fn aggregate_sentiment(analyses: &[ArticleAnalysis]) -> NewsSentiment {
    let count = |impact: Impact| analyses.iter().filter(|a| a.impact == impact).count();
    let up = count(Impact::Up);
    let down = count(Impact::Down);
    let neutral = count(Impact::Neutral);

    let overall = if up > down && up > neutral {
        MarketSentiment::Bullish
    } else if down > up && down > neutral {
        MarketSentiment::Bearish
    } else {
        MarketSentiment::Neutral
    };

    let confidence = if analyses.is_empty() {
        EMPTY_CONFIDENCE
    } else {
        analyses.iter().map(|a| a.confidence).sum::<f64>() / analyses.len() as f64
    };

    let mut top_factors: Vec<String> = analyses
        .iter()
        .filter(|a| !a.reason.trim().is_empty())
        .take(MAX_TOP_FACTORS)
        .map(|a| format!("{}...", a.reason.chars().take(FACTOR_CHARS).collect::<String>()))
        .collect();
    if top_factors.is_empty() {
        top_factors.push(NO_FACTORS_PLACEHOLDER.to_string());
    }

    NewsSentiment {
        overall,
        confidence,
        top_factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(impact: Impact, confidence: f64, reason: &str) -> ArticleAnalysis {
        ArticleAnalysis {
            impact,
            confidence,
            reason: reason.to_string(),
        }
    }

    fn impacts(up: usize, down: usize, neutral: usize) -> Vec<ArticleAnalysis> {
        let mut out = Vec::new();
        out.extend((0..up).map(|_| analysis(Impact::Up, 60.0, "up")));
        out.extend((0..down).map(|_| analysis(Impact::Down, 60.0, "down")));
        out.extend((0..neutral).map(|_| analysis(Impact::Neutral, 60.0, "flat")));
        out
    }

    #[test]
    fn test_empty_list() {
        let sentiment = aggregate_sentiment(&[]);
        assert_eq!(sentiment.overall, MarketSentiment::Neutral);
        assert_eq!(sentiment.confidence, 50.0);
        assert_eq!(sentiment.top_factors, vec![NO_FACTORS_PLACEHOLDER.to_string()]);
    }

    #[test]
    fn test_confidence_is_mean() {
        let analyses = vec![
            analysis(Impact::Up, 80.0, "a"),
            analysis(Impact::Down, 40.0, "b"),
        ];
        assert_eq!(aggregate_sentiment(&analyses).confidence, 60.0);
    }

    #[test]
    fn test_strict_majority_required() {
        assert_eq!(aggregate_sentiment(&impacts(3, 1, 1)).overall, MarketSentiment::Bullish);
        assert_eq!(aggregate_sentiment(&impacts(1, 2, 0)).overall, MarketSentiment::Bearish);
        // UP does not strictly exceed NEUTRAL.
        assert_eq!(aggregate_sentiment(&impacts(2, 1, 2)).overall, MarketSentiment::Neutral);
        assert_eq!(aggregate_sentiment(&impacts(0, 0, 4)).overall, MarketSentiment::Neutral);
    }

    #[test]
    fn test_equal_up_down_is_neutral() {
        for pair in 0..4 {
            for neutral in 0..4 {
                let sentiment = aggregate_sentiment(&impacts(pair, pair, neutral));
                assert_eq!(sentiment.overall, MarketSentiment::Neutral);
            }
        }
    }

    #[test]
    fn test_top_factors_input_order_and_truncation() {
        let long = "x".repeat(150);
        let analyses = vec![
            analysis(Impact::Neutral, 10.0, "first"),
            analysis(Impact::Up, 99.0, &long),
            analysis(Impact::Down, 50.0, "third"),
            analysis(Impact::Up, 90.0, "fourth"),
        ];
        let sentiment = aggregate_sentiment(&analyses);
        assert_eq!(sentiment.top_factors.len(), 3);
        assert_eq!(sentiment.top_factors[0], "first...");
        assert_eq!(sentiment.top_factors[1], format!("{}...", "x".repeat(100)));
        assert_eq!(sentiment.top_factors[2], "third...");
    }

    #[test]
    fn test_blank_reasons_are_not_factors() {
        let blank_only = vec![
            analysis(Impact::Up, 70.0, ""),
            analysis(Impact::Up, 70.0, "   "),
        ];
        let sentiment = aggregate_sentiment(&blank_only);
        assert_eq!(sentiment.top_factors, vec![NO_FACTORS_PLACEHOLDER.to_string()]);
        assert_eq!(sentiment.overall, MarketSentiment::Bullish);

        let mixed = vec![
            analysis(Impact::Down, 60.0, ""),
            analysis(Impact::Down, 60.0, "a"),
            analysis(Impact::Up, 60.0, "b"),
            analysis(Impact::Up, 60.0, "c"),
        ];
        assert_eq!(
            aggregate_sentiment(&mixed).top_factors,
            vec!["a...", "b...", "c..."]
        );
    }

    #[test]
    fn test_order_insensitive_counts_and_confidence() {
        let mut analyses = vec![
            analysis(Impact::Up, 90.0, "a"),
            analysis(Impact::Up, 30.0, "b"),
            analysis(Impact::Down, 60.0, "c"),
        ];
        let forward = aggregate_sentiment(&analyses);
        analyses.reverse();
        let reversed = aggregate_sentiment(&analyses);
        assert_eq!(forward.overall, reversed.overall);
        assert_eq!(forward.confidence, reversed.confidence);
    }
}
