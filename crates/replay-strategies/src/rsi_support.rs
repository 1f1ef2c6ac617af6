//! Buy-the-dip inside an uptrend: short SMA above long SMA, RSI cooled
//! into a support band and a bullish candle.

use replay_core::traits::Indicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::{Rsi, Sma};
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_ordered, require_period};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiSupportConfig {
    pub short_period: usize,
    pub long_period: usize,
    pub rsi_period: usize,
    pub support_low: f64,
    pub support_high: f64,
    /// Take profit once RSI reaches this level
    pub overbought: f64,
}

impl Default for RsiSupportConfig {
    fn default() -> Self {
        Self {
            short_period: 20,
            long_period: 60,
            rsi_period: 14,
            support_low: 40.0,
            support_high: 50.0,
            overbought: 70.0,
        }
    }
}

impl StrategyConfig for RsiSupportConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("short_period", self.short_period)?;
        require_period("rsi_period", self.rsi_period)?;
        require_ordered(self.short_period, self.long_period)?;
        if self.support_low > self.support_high || self.support_high > self.overbought {
            return Err(StrategyError::InvalidConfig(
                "RSI levels must satisfy support_low <= support_high <= overbought".into(),
            ));
        }
        Ok(())
    }
}

pub struct RsiSupportStrategy {
    config: RsiSupportConfig,
}

impl RsiSupportStrategy {
    pub fn new(config: RsiSupportConfig) -> Self {
        Self { config }
    }
}

impl Strategy for RsiSupportStrategy {
    fn name(&self) -> &str {
        "rsi_support"
    }

    fn description(&self) -> &str {
        "SMA20 > SMA60 uptrend, RSI 40-50 and a bullish candle; exits on RSI 70 or a break of SMA60"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let c = &self.config;
        let closes = series.closes();
        Ok(IndicatorSet::new()
            .with("sma_short", Sma::new(c.short_period).calculate(&closes))
            .with("sma_long", Sma::new(c.long_period).calculate(&closes))
            .with("rsi", Rsi::new(c.rsi_period).calculate(&closes))
            .with("close", closes))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let bar = ctx.prices.current();
        let close = ctx.indicators.line("close")?;
        let long = ctx.indicators.line("sma_long")?;
        let (Some(short_now), Some(long_now), Some(rsi)) = (
            ctx.indicators.value("sma_short")?,
            long.current(),
            ctx.indicators.value("rsi")?,
        ) else {
            return Ok(Vec::new());
        };

        let uptrend = short_now > long_now;
        let at_support = (self.config.support_low..=self.config.support_high).contains(&rsi);

        if uptrend && at_support && bar.is_bullish() {
            Ok(enter(ctx))
        } else if rsi >= self.config.overbought || close.crossed_below(&long) {
            Ok(exit(ctx))
        } else {
            Ok(Vec::new())
        }
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        self.config.long_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::testing::{decide_at, series_from_closes};
    use replay_core::types::{Bar, Side};

    fn indicators(short: f64, long: f64, rsi: f64, closes: &[f64]) -> IndicatorSet {
        let n = closes.len();
        IndicatorSet::new()
            .with("sma_short", vec![short; n])
            .with("sma_long", vec![long; n])
            .with("rsi", vec![rsi; n])
            .with("close", closes.to_vec())
    }

    #[test]
    fn test_enters_on_bullish_candle_at_support() {
        let bars = vec![
            Bar::new(0, 100.0, 101.0, 99.0, 100.0, 1.0),
            Bar::new(1, 99.0, 103.0, 98.0, 102.0, 1.0),
        ];
        let series = PriceSeries::new("T", bars).unwrap();
        let set = indicators(98.0, 95.0, 45.0, &[100.0, 102.0]);
        let mut strategy = RsiSupportStrategy::new(RsiSupportConfig::default());

        let intents = decide_at(&mut strategy, &series, &set, 1, false);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].side, Side::Buy);
    }

    #[test]
    fn test_bearish_candle_does_not_enter() {
        let bars = vec![
            Bar::new(0, 100.0, 101.0, 99.0, 100.0, 1.0),
            Bar::new(1, 103.0, 104.0, 98.0, 102.0, 1.0),
        ];
        let series = PriceSeries::new("T", bars).unwrap();
        let set = indicators(98.0, 95.0, 45.0, &[100.0, 102.0]);
        let mut strategy = RsiSupportStrategy::new(RsiSupportConfig::default());

        assert!(decide_at(&mut strategy, &series, &set, 1, false).is_empty());
    }

    #[test]
    fn test_exits_when_close_breaks_long_sma() {
        let closes = [100.0, 94.0];
        let series = series_from_closes(&closes);
        let set = indicators(98.0, 95.0, 55.0, &closes);
        let mut strategy = RsiSupportStrategy::new(RsiSupportConfig::default());

        let intents = decide_at(&mut strategy, &series, &set, 1, true);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].side, Side::Sell);
    }

    #[test]
    fn test_exits_on_overbought() {
        let closes = [100.0, 101.0];
        let series = series_from_closes(&closes);
        let set = indicators(98.0, 95.0, 72.0, &closes);
        let mut strategy = RsiSupportStrategy::new(RsiSupportConfig::default());

        let intents = decide_at(&mut strategy, &series, &set, 1, true);
        assert_eq!(intents[0].side, Side::Sell);
        // Flat portfolios never get a close.
        assert!(decide_at(&mut strategy, &series, &set, 1, false).is_empty());
    }
}
