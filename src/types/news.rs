use serde::{Deserialize, Serialize};
use std::fmt;

use super::MarketSentiment;

/// A news article as returned by the news-search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub content: Option<String>,
    /// Publisher display name.
    pub source: String,
    #[serde(default)]
    pub author: Option<String>,
    /// ISO-8601 publication time.
    pub published_at: String,
}

/// Expected price impact of a single article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Impact {
    Up,
    Down,
    Neutral,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Up => "UP",
            Impact::Down => "DOWN",
            Impact::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI classification of one article.
///
/// A confidence of 0 marks a failure-neutral result (decode or invocation
/// failure); a genuine or unconfigured neutral carries 50.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    pub impact: Impact,
    /// 0-100.
    pub confidence: f64,
    pub reason: String,
}

impl ArticleAnalysis {
    pub fn neutral(confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            impact: Impact::Neutral,
            confidence,
            reason: reason.into(),
        }
    }
}

/// Sentiment aggregated over a batch of article analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSentiment {
    pub overall: MarketSentiment,
    /// Mean of the contributing confidences, 50 for no articles.
    pub confidence: f64,
    /// At most three reasons, in input order.
    pub top_factors: Vec<String>,
}

/// An article paired with its classification, as served by the news-impact endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleImpact {
    pub article: Article,
    pub analysis: ArticleAnalysis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_wire_format() {
        assert_eq!(serde_json::to_string(&Impact::Up).unwrap(), "\"UP\"");
        let impact: Impact = serde_json::from_str("\"NEUTRAL\"").unwrap();
        assert_eq!(impact, Impact::Neutral);
        assert!(serde_json::from_str::<Impact>("\"up\"").is_err());
    }

    #[test]
    fn test_article_deserializes_with_missing_optionals() {
        let json = r#"{
            "title": "Gold climbs",
            "url": "https://example.com/a",
            "source": "Reuters",
            "publishedAt": "2024-05-01T10:00:00Z"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "Gold climbs");
        assert!(article.description.is_none());
        assert!(article.author.is_none());
        assert_eq!(article.published_at, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_news_sentiment_serialization() {
        let sentiment = NewsSentiment {
            overall: MarketSentiment::Bullish,
            confidence: 72.5,
            top_factors: vec!["Rate cut expectations...".to_string()],
        };
        let json = serde_json::to_value(&sentiment).unwrap();
        assert_eq!(json["overall"], "bullish");
        assert_eq!(json["topFactors"][0], "Rate cut expectations...");
    }
}
