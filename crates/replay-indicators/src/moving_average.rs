//! Moving average indicators.

use replay_core::traits::Indicator;

/// Simple Moving Average (SMA).
///
/// Arithmetic mean of the last N values. The first `period - 1` outputs are
/// NaN, as is any window that contains a NaN input.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        let period_f64 = self.period as f64;

        // Each window is summed from scratch: identical windows must give
        // bit-identical means, which a running sum does not guarantee.
        for (offset, window) in data.windows(self.period).enumerate() {
            if window.iter().any(|v| v.is_nan()) {
                continue;
            }
            result[offset + self.period - 1] = window.iter().sum::<f64>() / period_f64;
        }

        result
    }

    fn period(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the first non-NaN input, so it produces a value from the
/// first bar on. With `adjust` the output is the weighted mean of all past
/// inputs with weights `(1 - alpha)^k`; without it the plain recursive form
/// `alpha * x + (1 - alpha) * prev` is used. A NaN input repeats the
/// previous output.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    adjust: bool,
}

impl Ema {
    /// EMA with smoothing `2 / (span + 1)`, recursive form.
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        Self {
            alpha: 2.0 / (span as f64 + 1.0),
            adjust: false,
        }
    }

    /// EMA with an explicit smoothing factor, e.g. `1 / n` for Wilder.
    pub fn with_alpha(alpha: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha <= 1.0,
            "Alpha must be in (0, 1]"
        );
        Self { alpha, adjust: false }
    }

    /// Switch to the bias-adjusted weighted form.
    pub fn adjusted(mut self) -> Self {
        self.adjust = true;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        let decay = 1.0 - self.alpha;

        let mut prev: Option<f64> = None;
        let (mut num, mut den) = (0.0, 0.0);

        for (i, &x) in data.iter().enumerate() {
            if x.is_nan() {
                if let Some(p) = prev {
                    result[i] = p;
                }
                continue;
            }

            let value = if self.adjust {
                num = x + decay * num;
                den = 1.0 + decay * den;
                num / den
            } else {
                match prev {
                    Some(p) => self.alpha * x + decay * p,
                    None => x,
                }
            };

            result[i] = value;
            prev = Some(value);
        }

        result
    }

    fn period(&self) -> usize {
        0
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_is_nan_padded() {
        let sma = Sma::new(3);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma.calculate(&data);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_relative_eq!(result[2], 2.0);
        assert_relative_eq!(result[3], 3.0);
        assert_relative_eq!(result[4], 4.0);
    }

    #[test]
    fn test_sma_window_with_nan() {
        let sma = Sma::new(2);
        let result = sma.calculate(&[f64::NAN, 2.0, 4.0, f64::NAN, 6.0, 8.0]);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_relative_eq!(result[2], 3.0);
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
        assert_relative_eq!(result[5], 7.0);
    }

    #[test]
    fn test_sma_short_input() {
        let result = Sma::new(5).calculate(&[1.0, 2.0]);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_ema_recursive() {
        let ema = Ema::new(3); // alpha = 0.5
        let result = ema.calculate(&[2.0, 4.0, 8.0]);

        assert_relative_eq!(result[0], 2.0);
        assert_relative_eq!(result[1], 3.0);
        assert_relative_eq!(result[2], 5.5);
    }

    #[test]
    fn test_ema_adjusted() {
        let ema = Ema::new(3).adjusted(); // alpha = 0.5
        let result = ema.calculate(&[2.0, 4.0]);

        assert_relative_eq!(result[0], 2.0);
        // (4 + 0.5 * 2) / (1 + 0.5)
        assert_relative_eq!(result[1], 5.0 / 1.5);
    }

    #[test]
    fn test_ema_skips_leading_nan() {
        let result = Ema::with_alpha(0.5).calculate(&[f64::NAN, 4.0, f64::NAN, 8.0]);

        assert!(result[0].is_nan());
        assert_relative_eq!(result[1], 4.0);
        assert_relative_eq!(result[2], 4.0);
        assert_relative_eq!(result[3], 6.0);
    }
}
