use serde::{Deserialize, Serialize};

use super::Direction;

/// Short-horizon directional prediction. Produced fresh on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub direction: Direction,
    pub confidence: f64,
    /// Predicted price.
    pub price: f64,
    /// Absolute predicted move, never negative.
    pub price_change: f64,
    pub price_change_percent: f64,
    /// ISO-8601 synthesis time.
    pub timestamp: String,
    pub supporting_factor: String,
}
