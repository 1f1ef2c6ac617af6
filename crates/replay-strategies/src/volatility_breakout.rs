//! Volatility breakout (Larry Williams style).
//!
//! The breakout level is today's open plus `k` times yesterday's range.
//! When today's high clears it, a day-only limit buy is queued at that
//! level for the next bar. A held position is closed on every bar, so
//! holdings last one session.

use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries, TimeInForce},
};
use replay_indicators::shift;
use serde::{Deserialize, Serialize};

use crate::signals::exit;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityBreakoutConfig {
    /// Fraction of the previous range added to the open
    pub k: f64,
}

impl Default for VolatilityBreakoutConfig {
    fn default() -> Self {
        Self { k: 0.5 }
    }
}

impl StrategyConfig for VolatilityBreakoutConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if !(self.k > 0.0 && self.k.is_finite()) {
            return Err(StrategyError::InvalidConfig(format!(
                "k must be positive, got {}",
                self.k
            )));
        }
        Ok(())
    }
}

pub struct VolatilityBreakoutStrategy {
    config: VolatilityBreakoutConfig,
}

impl VolatilityBreakoutStrategy {
    pub fn new(config: VolatilityBreakoutConfig) -> Self {
        Self { config }
    }
}

impl Strategy for VolatilityBreakoutStrategy {
    fn name(&self) -> &str {
        "v_breakout"
    }

    fn description(&self) -> &str {
        "Limit buy at open + k * previous range after a breakout; exits on the next bar"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let ranges: Vec<f64> = series.full().iter().map(|bar| bar.range()).collect();
        Ok(IndicatorSet::new().with("prev_range", shift(&ranges, 1)))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let Some(prev_range) = ctx.indicators.value("prev_range")? else {
            return Ok(Vec::new());
        };

        if ctx.portfolio.can_exit() {
            return Ok(exit(ctx));
        }

        let bar = ctx.prices.current();
        let target = bar.open + prev_range * self.config.k;
        if ctx.portfolio.can_enter() && prev_range > 0.0 && bar.high >= target {
            return Ok(vec![
                OrderIntent::limit_buy(target).with_time_in_force(TimeInForce::Day)
            ]);
        }
        Ok(Vec::new())
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        1
    }
}
