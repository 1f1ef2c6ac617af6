//! SMA Slope Reversal Strategy.
//!
//! Tracks the sign of the moving average's one-bar slope. Buys when the
//! slope turns from falling to rising and closes when it turns back down.

use replay_core::traits::Indicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::Sma;
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_period};

/// Configuration for the SMA slope strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaSlopeConfig {
    /// Moving average period
    pub period: usize,
    /// Treat the first rising slope after warm-up as a reversal
    pub enter_on_first_rise: bool,
}

impl Default for SmaSlopeConfig {
    fn default() -> Self {
        Self {
            period: 20,
            enter_on_first_rise: true,
        }
    }
}

impl StrategyConfig for SmaSlopeConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("period", self.period)
    }
}

/// Direction of the moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlopeState {
    /// No slope observed yet.
    Warmup,
    Falling,
    Rising,
}

/// SMA slope reversal strategy.
pub struct SmaSlopeStrategy {
    config: SmaSlopeConfig,
    state: SlopeState,
}

impl SmaSlopeStrategy {
    pub fn new(config: SmaSlopeConfig) -> Self {
        Self {
            config,
            state: SlopeState::Warmup,
        }
    }

    pub fn state(&self) -> SlopeState {
        self.state
    }
}

impl Strategy for SmaSlopeStrategy {
    fn name(&self) -> &str {
        "slope"
    }

    fn description(&self) -> &str {
        "Buys when the SMA slope turns from negative to positive, exits on the reverse turn"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let sma = Sma::new(self.config.period).calculate(&series.closes());
        Ok(IndicatorSet::new().with("sma", sma))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let sma = ctx.indicators.line("sma")?;
        let slope = match (sma.ago(0), sma.ago(1)) {
            (Some(now), Some(prev)) => now - prev,
            _ => return Ok(Vec::new()),
        };

        let next = if slope > 0.0 {
            SlopeState::Rising
        } else if slope < 0.0 {
            SlopeState::Falling
        } else {
            self.state
        };

        let previous = std::mem::replace(&mut self.state, next);
        let intents = match (previous, next) {
            (SlopeState::Falling, SlopeState::Rising) => enter(ctx),
            (SlopeState::Warmup, SlopeState::Rising) if self.config.enter_on_first_rise => enter(ctx),
            (SlopeState::Rising, SlopeState::Falling) => exit(ctx),
            _ => Vec::new(),
        };
        Ok(intents)
    }

    fn reset(&mut self) {
        self.state = SlopeState::Warmup;
    }

    fn warmup_period(&self) -> usize {
        self.config.period
    }
}
