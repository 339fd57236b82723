use serde::{Deserialize, Serialize};

/// Bollinger band triple. All three fields are null together.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bollinger {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
}

impl Bollinger {
    pub fn new(upper: f64, middle: f64, lower: f64) -> Self {
        Self {
            upper: Some(upper),
            middle: Some(middle),
            lower: Some(lower),
        }
    }

    /// The all-null triple used when history is too short.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_none() && self.middle.is_none() && self.lower.is_none()
    }
}

/// Technical indicators derived from a price history.
///
/// Every field is independently nullable based on how much history
/// was available. Recomputed per request.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalIndicators {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub bollinger: Bollinger,
}

impl TechnicalIndicators {
    /// Indicators with every field null.
    pub fn empty() -> Self {
        Self::default()
    }
}
