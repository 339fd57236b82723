//! Bollinger Bands indicator.

use super::{round2, sma::trailing_mean, Indicator};
use crate::types::{Bollinger, PricePoint};

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// StdDev is the population standard deviation of the same window.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    /// Calculate standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }
}

impl Indicator for BollingerBands {
    type Output = Bollinger;

    fn id(&self) -> &str {
        "bollinger"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, candles: &[PricePoint]) -> Option<Bollinger> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let middle = trailing_mean(&closes, self.period)?;

        let window = &closes[closes.len() - self.period..];
        let std_dev = Self::std_dev(window, middle);

        let upper = middle + self.std_dev_multiplier * std_dev;
        let lower = middle - self.std_dev_multiplier * std_dev;

        Some(Bollinger::new(round2(upper), round2(middle), round2(lower)))
    }
}
