//! Trend pullback strategy.
//!
//! In an uptrend (close and SMA20 above SMA60) a bar that dips to the
//! short SMA and closes back above it is treated as a bounce off support.

use replay_core::traits::Indicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::Sma;
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_ordered, require_period};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PullbackConfig {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for PullbackConfig {
    fn default() -> Self {
        Self {
            short_period: 20,
            long_period: 60,
        }
    }
}

impl StrategyConfig for PullbackConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("short_period", self.short_period)?;
        require_ordered(self.short_period, self.long_period)
    }
}

pub struct PullbackStrategy {
    config: PullbackConfig,
}

impl PullbackStrategy {
    pub fn new(config: PullbackConfig) -> Self {
        Self { config }
    }
}

impl Strategy for PullbackStrategy {
    fn name(&self) -> &str {
        "pullback"
    }

    fn description(&self) -> &str {
        "Buys a dip to SMA20 inside an SMA60 uptrend; exits when close falls below SMA20"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let closes = series.closes();
        Ok(IndicatorSet::new()
            .with("sma_short", Sma::new(self.config.short_period).calculate(&closes))
            .with("sma_long", Sma::new(self.config.long_period).calculate(&closes))
            .with("close", closes))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let bar = ctx.prices.current();
        let short = ctx.indicators.line("sma_short")?;
        let close = ctx.indicators.line("close")?;
        let (Some(short_now), Some(long_now)) = (short.current(), ctx.indicators.value("sma_long")?)
        else {
            return Ok(Vec::new());
        };

        let uptrend = bar.close > long_now && short_now > long_now;
        let bounced = bar.low <= short_now && bar.close > short_now;

        if uptrend && bounced {
            Ok(enter(ctx))
        } else if short.crossed_above(&close) {
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
