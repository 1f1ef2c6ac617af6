//! Rolling extremes and index shifts.

use replay_core::traits::Indicator;

/// Difference between each value and the one `lag` positions earlier.
pub fn diff(data: &[f64], lag: usize) -> Vec<f64> {
    (0..data.len())
        .map(|i| {
            if i >= lag {
                data[i] - data[i - lag]
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Move values `lag` positions later, filling the front with NaN.
///
/// `shift(x, 1)[i]` is `x[i - 1]`, the value as of the previous bar.
pub fn shift(data: &[f64], lag: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; data.len()];
    if lag < data.len() {
        result[lag..].copy_from_slice(&data[..data.len() - lag]);
    }
    result
}

fn rolling(data: &[f64], period: usize, pick: fn(f64, f64) -> f64) -> Vec<f64> {
    let mut result = vec![f64::NAN; data.len()];
    for (offset, window) in data.windows(period).enumerate() {
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[offset + period - 1] = window.iter().copied().fold(window[0], pick);
    }
    result
}

/// Highest value over the last N inputs.
#[derive(Debug, Clone)]
pub struct RollingMax {
    period: usize,
}

impl RollingMax {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for RollingMax {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        rolling(data, self.period, f64::max)
    }

    fn period(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "MAX"
    }
}

/// Lowest value over the last N inputs.
#[derive(Debug, Clone)]
pub struct RollingMin {
    period: usize,
}

impl RollingMin {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for RollingMin {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        rolling(data, self.period, f64::min)
    }

    fn period(&self) -> usize {
        self.period - 1
    }

    fn name(&self) -> &str {
        "MIN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff() {
        let d = diff(&[1.0, 4.0, 2.0], 1);
        assert!(d[0].is_nan());
        assert_eq!(&d[1..], &[3.0, -2.0]);
    }

    #[test]
    fn test_shift() {
        let s = shift(&[1.0, 2.0, 3.0], 1);
        assert!(s[0].is_nan());
        assert_eq!(&s[1..], &[1.0, 2.0]);

        let s = shift(&[1.0, 2.0], 5);
        assert!(s.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_rolling_extremes() {
        let data = [3.0, 1.0, 4.0, 1.0, 5.0];
        let max = RollingMax::new(3).calculate(&data);
        let min = RollingMin::new(3).calculate(&data);

        assert!(max[1].is_nan());
        assert_eq!(&max[2..], &[4.0, 4.0, 5.0]);
        assert_eq!(&min[2..], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_prior_window_excludes_current_bar() {
        // Rolling max shifted by one is the resistance level known before today.
        let highs = [10.0, 12.0, 11.0, 15.0];
        let prior = shift(&RollingMax::new(2).calculate(&highs), 1);
        assert!(prior[1].is_nan());
        assert_eq!(prior[2], 12.0);
        assert_eq!(prior[3], 12.0);
    }
}
