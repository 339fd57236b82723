//! Relative Strength Index (RSI) indicator.

use super::{round2, Indicator};
use crate::types::PricePoint;

/// RSI (Relative Strength Index) indicator.
///
/// Simple (non-smoothed) variant: gains and losses are summed over the
/// last `period` close-to-close deltas and each divided by `period`.
/// Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate RSI value from price changes.
    fn calculate_rsi(candles: &[PricePoint], period: usize) -> Option<f64> {
        if period == 0 || candles.len() < period {
            return None;
        }

        let changes: Vec<f64> = candles
            .windows(2)
            .map(|pair| pair[1].close - pair[0].close)
            .collect();
        let recent = &changes[changes.len().saturating_sub(period)..];

        let gains: f64 = recent.iter().filter(|c| **c > 0.0).sum();
        let losses: f64 = recent.iter().filter(|c| **c < 0.0).map(|c| c.abs()).sum();

        // Divide by the full period even when fewer deltas exist.
        let avg_gain = gains / period as f64;
        let avg_loss = losses / period as f64;

        if avg_loss == 0.0 {
            return Some(100.0);
        }

        let rs = avg_gain / avg_loss;
        Some(round2(100.0 - (100.0 / (1.0 + rs))))
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn id(&self) -> &str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[PricePoint]) -> Option<f64> {
        Self::calculate_rsi(candles, self.period)
    }
}
