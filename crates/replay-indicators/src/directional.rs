//! Directional movement: ADX with +DI and -DI.

use replay_core::traits::{Indicator, MultiOutputIndicator};
use replay_core::types::Bar;
use serde::{Deserialize, Serialize};

use crate::moving_average::Ema;

/// ADX output series, aligned with the input bars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdxLines {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

/// Average Directional Index.
///
/// True range and directional movement are smoothed with Wilder's
/// exponential average (`alpha = 1 / period`). The first `period` values of
/// every line are NaN while the smoothing settles.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Default for Adx {
    fn default() -> Self {
        Self::new(14)
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 || den.is_nan() || num.is_nan() {
        f64::NAN
    } else {
        num / den
    }
}

impl MultiOutputIndicator for Adx {
    type Outputs = AdxLines;

    fn calculate(&self, bars: &[Bar]) -> AdxLines {
        let n = bars.len();
        let mut tr = vec![f64::NAN; n];
        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];

        for (i, bar) in bars.iter().enumerate() {
            match i.checked_sub(1).map(|p| &bars[p]) {
                Some(prev) => {
                    tr[i] = bar
                        .range()
                        .max((bar.high - prev.close).abs())
                        .max((bar.low - prev.close).abs());
                    plus_dm[i] = (bar.high - prev.high).max(0.0);
                    minus_dm[i] = (prev.low - bar.low).max(0.0);
                }
                None => tr[i] = bar.range(),
            }
        }

        let wilder = Ema::with_alpha(1.0 / self.period as f64);
        let atr = wilder.calculate(&tr);
        let plus_smoothed = wilder.calculate(&plus_dm);
        let minus_smoothed = wilder.calculate(&minus_dm);

        let mut plus_di: Vec<f64> = (0..n).map(|i| 100.0 * ratio(plus_smoothed[i], atr[i])).collect();
        let mut minus_di: Vec<f64> = (0..n).map(|i| 100.0 * ratio(minus_smoothed[i], atr[i])).collect();
        let dx: Vec<f64> = (0..n)
            .map(|i| 100.0 * ratio((plus_di[i] - minus_di[i]).abs(), plus_di[i] + minus_di[i]))
            .collect();
        let mut adx = wilder.calculate(&dx);

        let warmup = self.period.min(n);
        for line in [&mut adx, &mut plus_di, &mut minus_di] {
            line[..warmup].fill(f64::NAN);
        }

        AdxLines {
            adx,
            plus_di,
            minus_di,
        }
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "ADX"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_bars(n: usize, step: f64) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let c = 100.0 + i as f64 * step;
                Bar::new(i as i64, c, c + 1.0, c - 1.0, c, 1000.0)
            })
            .collect()
    }

    #[test]
    fn test_adx_warmup_and_length() {
        let bars = trending_bars(60, 1.0);
        let lines = Adx::new(14).calculate(&bars);

        assert_eq!(lines.adx.len(), 60);
        assert!(lines.adx[..14].iter().all(|v| v.is_nan()));
        assert!(lines.plus_di[14..].iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_uptrend_has_dominant_plus_di() {
        let bars = trending_bars(80, 1.0);
        let lines = Adx::new(14).calculate(&bars);

        let last = 79;
        assert!(lines.plus_di[last] > lines.minus_di[last]);
        assert!(lines.adx[last] > 25.0);
    }

    #[test]
    fn test_downtrend_has_dominant_minus_di() {
        let bars = trending_bars(80, -0.5);
        let lines = Adx::new(14).calculate(&bars);
        assert!(lines.minus_di[79] > lines.plus_di[79]);
    }
}
