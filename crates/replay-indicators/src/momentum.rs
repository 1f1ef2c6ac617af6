//! Momentum indicators.

use replay_core::traits::{Indicator, MultiOutputIndicator};
use replay_core::types::Bar;
use serde::{Deserialize, Serialize};

use crate::moving_average::{Ema, Sma};
use crate::rolling::diff;

/// Relative Strength Index (RSI).
///
/// Gains and losses are averaged with a plain rolling mean over `period`
/// changes, so the first value appears at index `period`. A window with
/// neither gains nor losses has no defined RSI and stays NaN.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let changes = diff(data, 1);
        let gains: Vec<f64> = changes
            .iter()
            .map(|&c| if c.is_nan() { c } else { c.max(0.0) })
            .collect();
        let losses: Vec<f64> = changes
            .iter()
            .map(|&c| if c.is_nan() { c } else { (-c).max(0.0) })
            .collect();

        let sma = Sma::new(self.period);
        let avg_gains = sma.calculate(&gains);
        let avg_losses = sma.calculate(&losses);

        avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(&gain, &loss)| {
                if gain.is_nan() || loss.is_nan() || (gain == 0.0 && loss == 0.0) {
                    f64::NAN
                } else if loss == 0.0 {
                    100.0
                } else {
                    100.0 - (100.0 / (1.0 + gain / loss))
                }
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD output series, aligned with the input bars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacdLines {
    /// MACD line (fast EMA - slow EMA)
    pub macd: Vec<f64>,
    /// Signal line (EMA of MACD)
    pub signal: Vec<f64>,
    /// Histogram (MACD - Signal)
    pub histogram: Vec<f64>,
}

/// MACD indicator over closing prices.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    adjust: bool,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
            adjust: false,
        }
    }

    /// Use bias-adjusted EMAs for all three averages.
    pub fn adjusted(mut self) -> Self {
        self.adjust = true;
        self
    }

    fn ema(&self, span: usize) -> Ema {
        let ema = Ema::new(span);
        if self.adjust {
            ema.adjusted()
        } else {
            ema
        }
    }

    /// Compute the three lines over an arbitrary series.
    pub fn lines(&self, data: &[f64]) -> MacdLines {
        let fast = self.ema(self.fast_period).calculate(data);
        let slow = self.ema(self.slow_period).calculate(data);

        let macd: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
        let signal = self.ema(self.signal_period).calculate(&macd);
        let histogram = macd.iter().zip(signal.iter()).map(|(m, s)| m - s).collect();

        MacdLines {
            macd,
            signal,
            histogram,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiOutputIndicator for Macd {
    type Outputs = MacdLines;

    fn calculate(&self, bars: &[Bar]) -> MacdLines {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.lines(&closes)
    }

    fn period(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rsi_warmup_and_bounds() {
        let data: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0).collect();
        let rsi = Rsi::new(14).calculate(&data);

        assert_eq!(rsi.len(), data.len());
        assert!(rsi[..14].iter().all(|v| v.is_nan()));
        for &v in &rsi[14..] {
            assert!((0.0..=100.0).contains(&v), "RSI out of range: {v}");
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let data: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let rsi = Rsi::new(5).calculate(&data);
        assert_relative_eq!(rsi[10], 100.0);
    }

    #[test]
    fn test_rsi_known_value() {
        // changes: +1, -1, +2 -> avg gain 1, avg loss 1/3 -> RS 3 -> RSI 75
        let rsi = Rsi::new(3).calculate(&[10.0, 11.0, 10.0, 12.0]);
        assert_relative_eq!(rsi[3], 75.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rsi_flat_is_undefined() {
        let rsi = Rsi::new(3).calculate(&[5.0; 10]);
        assert!(rsi.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_macd_lengths_and_identity() {
        let data: Vec<f64> = (0..100).map(|i| 100.0 + i as f64 * 0.5).collect();
        let lines = Macd::new().lines(&data);

        assert_eq!(lines.macd.len(), 100);
        assert_eq!(lines.signal.len(), 100);
        assert_relative_eq!(lines.macd[0], 0.0);
        for i in 0..100 {
            assert_relative_eq!(lines.histogram[i], lines.macd[i] - lines.signal[i]);
        }
        // Rising prices keep the fast EMA above the slow one.
        assert!(lines.macd[99] > 0.0);
    }
}
