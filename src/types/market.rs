use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad market mood, used by both the macro snapshot and news sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketSentiment {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl MarketSentiment {
    /// Parse from string, case-insensitively.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bullish" => Some(Self::Bullish),
            "bearish" => Some(Self::Bearish),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for MarketSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Macroeconomic snapshot supplied alongside the price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroSnapshot {
    /// US dollar index level.
    pub usd_index: f64,
    /// Policy interest rate, percent.
    pub interest_rates: f64,
    /// Year-over-year inflation, percent.
    pub inflation: f64,
    pub market_sentiment: MarketSentiment,
}
