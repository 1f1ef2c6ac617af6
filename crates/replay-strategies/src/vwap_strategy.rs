//! VWAP crossover strategy.

use replay_core::traits::MultiOutputIndicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::Vwap;
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit};

/// VWAP has no tunable parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VwapConfig {}

impl StrategyConfig for VwapConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        Ok(())
    }
}

/// Buys when close crosses above the cumulative VWAP, closes on the
/// cross back below.
pub struct VwapStrategy {
    #[allow(dead_code)]
    config: VwapConfig,
}

impl VwapStrategy {
    pub fn new(config: VwapConfig) -> Self {
        Self { config }
    }
}

impl Strategy for VwapStrategy {
    fn name(&self) -> &str {
        "vwap"
    }

    fn description(&self) -> &str {
        "Close crossing the cumulative volume-weighted average price"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        Ok(IndicatorSet::new()
            .with("vwap", Vwap::new().calculate(series.full()))
            .with("close", series.closes()))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let close = ctx.indicators.line("close")?;
        let vwap = ctx.indicators.line("vwap")?;

        if close.crossed_above(&vwap) {
            Ok(enter(ctx))
        } else if close.crossed_below(&vwap) {
            Ok(exit(ctx))
        } else {
            Ok(Vec::new())
        }
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        1
    }
}
