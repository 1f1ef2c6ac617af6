//! Fibonacci retracement strategy.
//!
//! Levels are measured from the highest high down to the lowest low of the
//! previous `lookback` bars. A bullish bar whose low dips into the golden
//! zone (0.382 to 0.618 retracement) is bought; the position is closed near
//! the prior high or on a break below the 0.786 level.

use replay_core::traits::Indicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::{shift, RollingMax, RollingMin};
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_period};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FibonacciConfig {
    pub lookback: usize,
    /// Take profit once close reaches this fraction of the prior high
    pub take_profit_ratio: f64,
}

impl Default for FibonacciConfig {
    fn default() -> Self {
        Self {
            lookback: 50,
            take_profit_ratio: 0.98,
        }
    }
}

impl StrategyConfig for FibonacciConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("lookback", self.lookback)?;
        if !(self.take_profit_ratio > 0.0 && self.take_profit_ratio <= 1.0) {
            return Err(StrategyError::InvalidConfig(
                "take_profit_ratio must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}

/// Retracement levels between a swing high and low.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibLevels {
    pub high: f64,
    pub low: f64,
}

impl FibLevels {
    /// Price `ratio` of the way back down from the high.
    pub fn retrace(&self, ratio: f64) -> f64 {
        self.high - (self.high - self.low) * ratio
    }
}

pub struct FibonacciStrategy {
    config: FibonacciConfig,
}

impl FibonacciStrategy {
    pub fn new(config: FibonacciConfig) -> Self {
        Self { config }
    }
}

impl Strategy for FibonacciStrategy {
    fn name(&self) -> &str {
        "fibonacci"
    }

    fn description(&self) -> &str {
        "Buys a bullish bar in the 0.382-0.618 retracement zone; exits near the prior high or under 0.786"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let n = self.config.lookback;
        let highest = RollingMax::new(n).calculate(&series.highs());
        let lowest = RollingMin::new(n).calculate(&series.lows());
        Ok(IndicatorSet::new()
            .with("swing_high", shift(&highest, 1))
            .with("swing_low", shift(&lowest, 1)))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let (Some(high), Some(low)) = (
            ctx.indicators.value("swing_high")?,
            ctx.indicators.value("swing_low")?,
        ) else {
            return Ok(Vec::new());
        };
        if high - low == 0.0 {
            return Ok(Vec::new());
        }

        let levels = FibLevels { high, low };
        let bar = ctx.prices.current();

        // Lower bound is the deeper retracement.
        let in_zone = (levels.retrace(0.618)..=levels.retrace(0.382)).contains(&bar.low);
        if in_zone && bar.is_bullish() {
            return Ok(enter(ctx));
        }

        let take_profit = bar.close >= high * self.config.take_profit_ratio;
        let stop = bar.close < levels.retrace(0.786);
        if take_profit || stop {
            return Ok(exit(ctx));
        }
        Ok(Vec::new())
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        self.config.lookback
    }
}
