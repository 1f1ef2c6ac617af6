//! Volume-weighted indicators.

use replay_core::traits::MultiOutputIndicator;
use replay_core::types::Bar;

/// Cumulative VWAP over daily bars: running sum of typical price times
/// volume divided by running volume. NaN until some volume has traded.
#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl MultiOutputIndicator for Vwap {
    type Outputs = Vec<f64>;

    fn calculate(&self, bars: &[Bar]) -> Vec<f64> {
        let mut pv = 0.0;
        let mut volume = 0.0;
        bars.iter()
            .map(|bar| {
                pv += bar.typical_price() * bar.volume;
                volume += bar.volume;
                if volume > 0.0 {
                    pv / volume
                } else {
                    f64::NAN
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "VWAP"
    }
}
