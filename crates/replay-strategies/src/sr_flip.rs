//! Support/resistance flip strategy.
//!
//! A close above the prior `lookback`-bar high marks a breakout. When price
//! later comes back to test the broken level and holds it, the old
//! resistance has become support: the strategy buys the next close above
//! the level. The position is stopped out a little below the level or
//! closed at a fixed profit target.

use replay_core::money;
use replay_core::traits::Indicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::{shift, RollingMax};
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_period};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SrFlipConfig {
    pub lookback: usize,
    /// How close to the level a low must come to count as a retest
    pub retest_tolerance: f64,
    /// Breakout is abandoned below `level * (1 - failure_pct)`
    pub failure_pct: f64,
    /// Stop below `level * (1 - stop_pct)`
    pub stop_pct: f64,
    /// Take profit above `entry * (1 + target_pct)`
    pub target_pct: f64,
}

impl Default for SrFlipConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            retest_tolerance: 0.005,
            failure_pct: 0.03,
            stop_pct: 0.02,
            target_pct: 0.10,
        }
    }
}

impl StrategyConfig for SrFlipConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("lookback", self.lookback)?;
        for (name, value) in [
            ("retest_tolerance", self.retest_tolerance),
            ("failure_pct", self.failure_pct),
            ("stop_pct", self.stop_pct),
            ("target_pct", self.target_pct),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(StrategyError::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Where the strategy is in the breakout/retest cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlipState {
    Idle,
    /// Closed above `level`, waiting for a pullback to it.
    Breakout { level: f64 },
    /// Pullback held the level, waiting for a close above it.
    Retest { level: f64 },
    /// Entry issued; managed against `level`.
    Long { level: f64 },
}

pub struct SrFlipStrategy {
    config: SrFlipConfig,
    state: FlipState,
}

impl SrFlipStrategy {
    pub fn new(config: SrFlipConfig) -> Self {
        Self {
            config,
            state: FlipState::Idle,
        }
    }

    pub fn state(&self) -> FlipState {
        self.state
    }
}

impl Strategy for SrFlipStrategy {
    fn name(&self) -> &str {
        "sr_flip"
    }

    fn description(&self) -> &str {
        "Breakout above the 20-bar high, retest of the level, entry on the bounce"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let highest = RollingMax::new(self.config.lookback).calculate(&series.highs());
        Ok(IndicatorSet::new().with("resistance", shift(&highest, 1)))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let bar = ctx.prices.current();
        let c = &self.config;
        let mut intents = Vec::new();

        self.state = match self.state {
            FlipState::Idle => match ctx.indicators.value("resistance")? {
                Some(level) if bar.close > level => FlipState::Breakout { level },
                _ => FlipState::Idle,
            },
            FlipState::Breakout { level } => {
                if bar.low <= level * (1.0 + c.retest_tolerance)
                    && bar.close >= level * (1.0 - c.retest_tolerance)
                {
                    FlipState::Retest { level }
                } else if bar.close < level * (1.0 - c.failure_pct) {
                    FlipState::Idle
                } else {
                    FlipState::Breakout { level }
                }
            }
            FlipState::Retest { level } => {
                if bar.close > level {
                    intents = enter(ctx);
                }
                if intents.is_empty() {
                    FlipState::Retest { level }
                } else {
                    FlipState::Long { level }
                }
            }
            FlipState::Long { level } => match &ctx.portfolio.position {
                // Entry never filled.
                None if ctx.portfolio.pending.is_none() => FlipState::Idle,
                None => FlipState::Long { level },
                Some(position) => {
                    let entry = money::to_f64(position.entry_price);
                    let stopped = bar.close < level * (1.0 - c.stop_pct);
                    let target_hit = bar.close > entry * (1.0 + c.target_pct);
                    if stopped || target_hit {
                        intents = exit(ctx);
                        FlipState::Idle
                    } else {
                        FlipState::Long { level }
                    }
                }
            },
        };
        Ok(intents)
    }

    fn reset(&mut self) {
        self.state = FlipState::Idle;
    }

    fn warmup_period(&self) -> usize {
        self.config.lookback + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::testing::{bars_with, replay, series_from_closes};
    use replay_core::types::Side;

    fn base() -> Vec<f64> {
        vec![100.0; 25]
    }

    #[test]
    fn test_breakout_retest_entry_and_target() {
        let mut closes = base();
        // Breakout, retest, bounce, hold, target.
        closes.extend([105.0, 101.5, 103.0, 104.0, 120.0]);
        let series = series_from_closes(&closes);
        let mut strategy = SrFlipStrategy::new(SrFlipConfig::default());

        let intents = replay(&mut strategy, &series);
        assert_eq!(bars_with(&intents, Side::Buy), vec![27]);
        assert_eq!(bars_with(&intents, Side::Sell), vec![29]);
        assert_eq!(strategy.state(), FlipState::Idle);
    }

    #[test]
    fn test_failed_breakout_returns_to_idle() {
        let mut closes = base();
        closes.extend([105.0, 106.0, 95.0]);
        let series = series_from_closes(&closes);
        let mut strategy = SrFlipStrategy::new(SrFlipConfig::default());

        let intents = replay(&mut strategy, &series);
        assert!(intents.iter().all(|v| v.is_empty()));
        assert_eq!(strategy.state(), FlipState::Idle);
    }

    #[test]
    fn test_stop_below_level() {
        let mut closes = base();
        closes.extend([105.0, 101.5, 103.0, 102.0, 98.0]);
        let series = series_from_closes(&closes);
        let mut strategy = SrFlipStrategy::new(SrFlipConfig::default());

        let intents = replay(&mut strategy, &series);
        assert_eq!(bars_with(&intents, Side::Sell), vec![29]);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut closes = base();
        closes.push(105.0);
        let series = series_from_closes(&closes);
        let mut strategy = SrFlipStrategy::new(SrFlipConfig::default());

        replay(&mut strategy, &series);
        assert!(matches!(strategy.state(), FlipState::Breakout { .. }));
        strategy.reset();
        assert_eq!(strategy.state(), FlipState::Idle);
    }
}
