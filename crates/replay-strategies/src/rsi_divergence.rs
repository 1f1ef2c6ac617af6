//! RSI divergence strategy.
//!
//! A bullish divergence is a fresh RSI trough that is higher than an
//! earlier trough while price made a lower low. The bearish case mirrors
//! it with peaks. Troughs and peaks are confirmed one bar late: the pivot
//! is the previous bar, lower (higher) than both neighbours.

use replay_core::traits::Indicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorLine, IndicatorSet, OrderIntent, PriceSeries, SeriesView},
};
use replay_indicators::Rsi;
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_period};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiDivergenceConfig {
    pub rsi_period: usize,
    /// How far back to search for the earlier pivot
    pub lookback: usize,
    /// A trough only counts below this RSI
    pub trough_below: f64,
    /// A peak only counts above this RSI
    pub peak_above: f64,
}

impl Default for RsiDivergenceConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            lookback: 30,
            trough_below: 40.0,
            peak_above: 60.0,
        }
    }
}

impl StrategyConfig for RsiDivergenceConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("rsi_period", self.rsi_period)?;
        if self.lookback <= 5 {
            return Err(StrategyError::InvalidConfig(
                "lookback must be greater than 5".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pivot {
    Trough,
    Peak,
}

impl Pivot {
    /// Whether `a` is beyond `b` in this pivot's direction.
    fn beyond(self, a: f64, b: f64) -> bool {
        match self {
            Pivot::Trough => a < b,
            Pivot::Peak => a > b,
        }
    }

    /// `ago(k)` is a pivot relative to `ago(k - 1)` and `ago(k + 1)`.
    fn at(self, rsi: &IndicatorLine<'_>, k: usize) -> Option<f64> {
        let mid = rsi.ago(k)?;
        let newer = rsi.ago(k.checked_sub(1)?)?;
        let older = rsi.ago(k + 1)?;
        (self.beyond(mid, newer) && self.beyond(mid, older)).then_some(mid)
    }
}

/// Detects RSI/price divergences to time entries and exits.
pub struct RsiDivergenceStrategy {
    config: RsiDivergenceConfig,
}

impl RsiDivergenceStrategy {
    pub fn new(config: RsiDivergenceConfig) -> Self {
        Self { config }
    }

    /// A divergence in `pivot` direction confirmed on this bar.
    fn diverges(&self, pivot: Pivot, rsi: &IndicatorLine<'_>, prices: &SeriesView<'_>) -> bool {
        let Some(current_rsi) = pivot.at(rsi, 1) else {
            return false;
        };
        let threshold_ok = match pivot {
            Pivot::Trough => current_rsi < self.config.trough_below,
            Pivot::Peak => current_rsi > self.config.peak_above,
        };
        if !threshold_ok {
            return false;
        }
        let Some(current_close) = prices.ago(1).map(|b| b.close) else {
            return false;
        };

        // Nearest earlier pivot at least four bars before the current one.
        let earlier = (4..self.config.lookback - 1)
            .find_map(|k| pivot.at(rsi, k).map(|value| (k, value)));

        match earlier {
            Some((k, earlier_rsi)) => {
                let Some(earlier_close) = prices.ago(k).map(|b| b.close) else {
                    return false;
                };
                // RSI pivot is less extreme while price pivot is more extreme.
                pivot.beyond(earlier_rsi, current_rsi) && pivot.beyond(current_close, earlier_close)
            }
            None => false,
        }
    }
}

impl Strategy for RsiDivergenceStrategy {
    fn name(&self) -> &str {
        "rsi_div"
    }

    fn description(&self) -> &str {
        "Bullish RSI divergence entries, bearish divergence exits"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let rsi = Rsi::new(self.config.rsi_period).calculate(&series.closes());
        Ok(IndicatorSet::new().with("rsi", rsi))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        if ctx.prices.len() < self.config.lookback + 5 {
            return Ok(Vec::new());
        }
        let rsi = ctx.indicators.line("rsi")?;

        let mut intents = Vec::new();
        if self.diverges(Pivot::Trough, &rsi, &ctx.prices) {
            intents.extend(enter(ctx));
        }
        if self.diverges(Pivot::Peak, &rsi, &ctx.prices) {
            intents.extend(exit(ctx));
        }
        Ok(intents)
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        self.config.lookback + 5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_detection() {
        let values = [50.0, 30.0, 45.0];
        let line = IndicatorLine::from_slice(&values);
        assert_eq!(Pivot::Trough.at(&line, 1), Some(30.0));
        assert_eq!(Pivot::Peak.at(&line, 1), None);
        assert_eq!(Pivot::Trough.at(&line, 0), None);
    }

    #[test]
    fn test_bullish_divergence() {
        let strategy = RsiDivergenceStrategy::new(RsiDivergenceConfig::default());

        // Oldest first. Earlier trough: RSI 20 at close 100. Current trough:
        // RSI 30 (higher) at close 90 (lower).
        let mut rsi = vec![50.0; 40];
        let mut closes = vec![110.0; 40];
        rsi[30] = 20.0;
        closes[30] = 100.0;
        rsi[38] = 30.0;
        closes[38] = 90.0;

        let bars: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| replay_core::types::Bar::new(i as i64, c, c, c, c, 1.0))
            .collect();
        let series = PriceSeries::new("T", bars).unwrap();
        let view = series.up_to(39).unwrap();
        let line = IndicatorLine::from_slice(&rsi);

        assert!(strategy.diverges(Pivot::Trough, &line, &view));
        assert!(!strategy.diverges(Pivot::Peak, &line, &view));
    }

    #[test]
    fn test_no_divergence_when_rsi_confirms() {
        let strategy = RsiDivergenceStrategy::new(RsiDivergenceConfig::default());

        let mut rsi = vec![50.0; 40];
        let mut closes = vec![110.0; 40];
        rsi[30] = 35.0;
        closes[30] = 100.0;
        rsi[38] = 30.0;
        closes[38] = 90.0;

        let bars: Vec<_> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| replay_core::types::Bar::new(i as i64, c, c, c, c, 1.0))
            .collect();
        let series = PriceSeries::new("T", bars).unwrap();
        let line = IndicatorLine::from_slice(&rsi);

        assert!(!strategy.diverges(Pivot::Trough, &line, &series.up_to(39).unwrap()));
    }
}
