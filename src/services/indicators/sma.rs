//! Simple Moving Average (SMA) indicator.

use super::Indicator;
use crate::types::PricePoint;

/// SMA (Simple Moving Average) indicator.
///
/// Mean of the last `period` closes.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

/// Mean of the last `period` values, None if fewer are available.
pub fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

impl Indicator for Sma {
    type Output = f64;

    fn id(&self) -> &str {
        match self.period {
            50 => "ma50",
            200 => "ma200",
            _ => "sma",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[PricePoint]) -> Option<f64> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        trailing_mean(&closes, self.period)
    }
}
