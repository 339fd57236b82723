//! Technical indicator implementations.
//!
//! Pure functions over an ascending price history. Insufficient history
//! is never an error: the affected indicator is simply `None`.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::BollingerBands;
pub use ema::Ema;
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma::Sma;

use crate::types::{Bollinger, PricePoint, TechnicalIndicators};

/// Below this many points every indicator is null.
pub const MIN_HISTORY: usize = 14;

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Value produced when enough history is available.
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Minimum number of price points required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator. Returns None if history is too short.
    fn calculate(&self, candles: &[PricePoint]) -> Option<Self::Output>;
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute every indicator for a price history.
pub fn calculate_indicators(candles: &[PricePoint]) -> TechnicalIndicators {
    if candles.len() < MIN_HISTORY {
        return TechnicalIndicators::empty();
    }

    TechnicalIndicators {
        rsi: Rsi::default().calculate(candles),
        macd: Macd::default().calculate(candles),
        ma50: Sma::new(50).calculate(candles),
        ma200: Sma::new(200).calculate(candles),
        bollinger: BollingerBands::default()
            .calculate(candles)
            .unwrap_or_else(Bollinger::empty),
    }
}
