//! MACD signal-line crossover strategy.

use replay_core::traits::MultiOutputIndicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::Macd;
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_ordered, require_period};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl StrategyConfig for MacdConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("fast_period", self.fast_period)?;
        require_period("signal_period", self.signal_period)?;
        require_ordered(self.fast_period, self.slow_period)
    }
}

/// Buys on a MACD golden cross, closes on a dead cross.
pub struct MacdStrategy {
    config: MacdConfig,
}

impl MacdStrategy {
    pub fn new(config: MacdConfig) -> Self {
        Self { config }
    }
}

impl Strategy for MacdStrategy {
    fn name(&self) -> &str {
        "macd"
    }

    fn description(&self) -> &str {
        "MACD line crossing its signal line"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let c = &self.config;
        let lines = Macd::with_periods(c.fast_period, c.slow_period, c.signal_period)
            .calculate(series.full());
        Ok(IndicatorSet::new()
            .with("macd", lines.macd)
            .with("macd_signal", lines.signal)
            .with("macd_hist", lines.histogram))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let macd = ctx.indicators.line("macd")?;
        let signal = ctx.indicators.line("macd_signal")?;

        if macd.crossed_above(&signal) {
            Ok(enter(ctx))
        } else if macd.crossed_below(&signal) {
            Ok(exit(ctx))
        } else {
            Ok(Vec::new())
        }
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        self.config.slow_period + self.config.signal_period
    }
}
