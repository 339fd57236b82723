//! MACD (Moving Average Convergence Divergence) indicator.

use super::{ema::calculate_ema, Indicator};
use crate::types::PricePoint;

/// MACD line: EMA(fast) - EMA(slow), both over the full close series.
///
/// Only the line itself is produced; no signal line or histogram.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
        }
    }
}

impl Indicator for Macd {
    type Output = f64;

    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        self.slow_period
    }

    fn calculate(&self, candles: &[PricePoint]) -> Option<f64> {
        if candles.len() < self.min_periods() {
            return None;
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let fast = calculate_ema(&closes, self.fast_period)?;
        let slow = calculate_ema(&closes, self.slow_period)?;

        Some(fast - slow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::test_support::*;

    #[test]
    fn test_macd_min_periods() {
        let macd = Macd::default();
        assert_eq!(macd.min_periods(), 26);
        assert!(macd.calculate(&uptrend(25)).is_none());
        assert!(macd.calculate(&uptrend(26)).is_some());
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let value = Macd::default().calculate(&uptrend(60)).unwrap();
        assert!(value > 0.0, "MACD in uptrend should be > 0, got {}", value);
    }

    #[test]
    fn test_macd_zero_for_flat_series() {
        let candles = candles_from_closes(&[10.0; 40]);
        let value = Macd::default().calculate(&candles).unwrap();
        assert!(value.abs() < 1e-9);
    }

    #[test]
    fn test_macd_matches_ema_difference() {
        let candles = choppy(80);
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let expected = calculate_ema(&closes, 12).unwrap() - calculate_ema(&closes, 26).unwrap();
        assert_eq!(Macd::default().calculate(&candles), Some(expected));
    }
}
