//! Moving Average Crossover Strategy.
//!
//! Buys when the fast SMA crosses above the slow SMA and closes when it
//! crosses back below.

use replay_core::traits::Indicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::Sma;
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_ordered, require_period};

/// Configuration for the SMA crossover strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaCrossConfig {
    /// Fast moving average period
    pub fast_period: usize,
    /// Slow moving average period
    pub slow_period: usize,
}

impl Default for SmaCrossConfig {
    fn default() -> Self {
        Self {
            fast_period: 5,
            slow_period: 20,
        }
    }
}

impl StrategyConfig for SmaCrossConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("fast_period", self.fast_period)?;
        require_ordered(self.fast_period, self.slow_period)
    }
}

/// Moving Average Crossover Strategy.
pub struct SmaCrossStrategy {
    config: SmaCrossConfig,
}

impl SmaCrossStrategy {
    /// Create a new SMA crossover strategy.
    pub fn new(config: SmaCrossConfig) -> Self {
        Self { config }
    }
}

impl Strategy for SmaCrossStrategy {
    fn name(&self) -> &str {
        "cross"
    }

    fn description(&self) -> &str {
        "Golden cross / dead cross of a fast and a slow SMA"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let closes = series.closes();
        Ok(IndicatorSet::new()
            .with("sma_fast", Sma::new(self.config.fast_period).calculate(&closes))
            .with("sma_slow", Sma::new(self.config.slow_period).calculate(&closes)))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let fast = ctx.indicators.line("sma_fast")?;
        let slow = ctx.indicators.line("sma_slow")?;

        if fast.crossed_above(&slow) {
            Ok(enter(ctx))
        } else if fast.crossed_below(&slow) {
            Ok(exit(ctx))
        } else {
            Ok(Vec::new())
        }
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        self.config.slow_period
    }
}
