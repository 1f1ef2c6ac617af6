//! RSI Overbought/Oversold Strategy.
//!
//! Buys when RSI recovers above the oversold level and closes when it
//! falls back below the overbought level.

use replay_core::traits::Indicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::Rsi;
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_period};

/// Configuration for the RSI strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    /// RSI period
    pub period: usize,
    /// Oversold threshold
    pub oversold: f64,
    /// Overbought threshold
    pub overbought: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

impl StrategyConfig for RsiConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("period", self.period)?;
        if self.oversold >= self.overbought {
            return Err(StrategyError::InvalidConfig(
                "Oversold must be less than overbought".into(),
            ));
        }
        if self.oversold < 0.0 || self.overbought > 100.0 {
            return Err(StrategyError::InvalidConfig(
                "Thresholds must be between 0 and 100".into(),
            ));
        }
        Ok(())
    }
}

/// RSI-based trading strategy.
pub struct RsiStrategy {
    config: RsiConfig,
}

impl RsiStrategy {
    /// Create a new RSI strategy.
    pub fn new(config: RsiConfig) -> Self {
        Self { config }
    }
}

impl Strategy for RsiStrategy {
    fn name(&self) -> &str {
        "rsi"
    }

    fn description(&self) -> &str {
        "Buys when RSI crosses up through oversold, exits when it crosses down through overbought"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let rsi = Rsi::new(self.config.period).calculate(&series.closes());
        Ok(IndicatorSet::new().with("rsi", rsi))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let rsi = ctx.indicators.line("rsi")?;

        if rsi.crossed_above_level(self.config.oversold) {
            Ok(enter(ctx))
        } else if rsi.crossed_below_level(self.config.overbought) {
            Ok(exit(ctx))
        } else {
            Ok(Vec::new())
        }
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        self.config.period + 1
    }
}
