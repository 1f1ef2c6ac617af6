//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{IndicatorSet, IndicatorView, OrderIntent, PortfolioSnapshot, PriceSeries, SeriesView};

/// Configuration trait for strategy parameter structs.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Everything a strategy may look at on one bar.
///
/// Both views end at `bar_index`, so nothing here exposes a later bar.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub bar_index: usize,
    pub prices: SeriesView<'a>,
    pub indicators: IndicatorView<'a>,
    pub portfolio: &'a PortfolioSnapshot,
}

/// Core strategy trait.
///
/// The engine calls `setup` once with the full series to precompute
/// indicators, then `decide` once per bar in increasing order. Intents
/// returned from `decide` are executed on a later bar.
pub trait Strategy: Send + Sync {
    /// Registry name of this strategy.
    fn name(&self) -> &str;

    /// Register indicator series computed over the full history.
    ///
    /// Every returned series must have one value per bar, NaN where the
    /// indicator is still warming up.
    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError>;

    /// Decide what to do at the current bar.
    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError>;

    /// Reset internal state before a new run.
    fn reset(&mut self);

    /// Bars needed before the first actionable indicator value.
    fn warmup_period(&self) -> usize;

    fn is_warmed_up(&self, bars_available: usize) -> bool {
        bars_available >= self.warmup_period()
    }

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }
}
