//! Exponential Moving Average (EMA) indicator.

use super::Indicator;
use crate::types::PricePoint;

/// EMA (Exponential Moving Average) indicator.
///
/// Seeded with the SMA of the first `period` closes, then smoothed
/// forward with `k = 2 / (period + 1)`.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

/// Final EMA value over a series of closes.
pub fn calculate_ema(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let k = 2.0 / (period as f64 + 1.0);

    // First EMA is SMA
    let seed: f64 = closes.iter().take(period).sum::<f64>() / period as f64;

    Some(
        closes
            .iter()
            .skip(period)
            .fold(seed, |ema, close| close * k + ema * (1.0 - k)),
    )
}

impl Indicator for Ema {
    type Output = f64;

    fn id(&self) -> &str {
        match self.period {
            12 => "ema12",
            26 => "ema26",
            _ => "ema",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[PricePoint]) -> Option<f64> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        calculate_ema(&closes, self.period)
    }
}
