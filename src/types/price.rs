use serde::{Deserialize, Serialize};
use std::fmt;

/// One daily OHLC record from the price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Trading day, `YYYY-MM-DD`.
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Close-to-close change versus the previous day, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<f64>,
}

impl PricePoint {
    /// Create a point with only a close price (open/high/low set to the close).
    pub fn from_close(date: impl Into<String>, close: f64) -> Self {
        Self {
            date: date.into(),
            open: close,
            high: close,
            low: close,
            close,
            change_percent: None,
        }
    }
}

/// Direction of a predicted price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Direction implied by a price delta. A flat move counts as up.
    pub fn from_delta(delta: f64) -> Self {
        if delta >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Parse the exact lowercase wire form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// +1.0 for up, -1.0 for down.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Close of the last point, or 0 for an empty history.
pub fn latest_close(prices: &[PricePoint]) -> f64 {
    prices.last().map(|p| p.close).unwrap_or(0.0)
}

/// Direction of the last close-to-close move, `Up` when there is only one point.
pub fn last_move_direction(prices: &[PricePoint]) -> Direction {
    match prices {
        [.., previous, latest] => Direction::from_delta(latest.close - previous.close),
        _ => Direction::Up,
    }
}
