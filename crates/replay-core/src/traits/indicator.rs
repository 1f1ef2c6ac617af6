//! Indicator trait definitions.

use crate::types::Bar;

/// Batch indicator over a single input series.
///
/// Output has exactly one value per input value. Positions where the
/// indicator is still warming up hold `f64::NAN`.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<f64>;

    /// Index of the first value that can be non-NaN.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Indicator that reads whole bars and/or produces several aligned series
/// (MACD, ADX, VWAP).
pub trait MultiOutputIndicator: Send + Sync {
    /// Output container; every series in it is as long as `bars`.
    type Outputs;

    fn calculate(&self, bars: &[Bar]) -> Self::Outputs;

    fn period(&self) -> usize;

    fn name(&self) -> &str;
}
