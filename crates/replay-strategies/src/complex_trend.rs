//! Trend confluence strategy: long-term SMA filter, RSI band and MACD cross.

use replay_core::traits::{Indicator, MultiOutputIndicator};
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::{Macd, Rsi, Sma};
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_ordered, require_period};

/// Configuration for the trend confluence strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplexTrendConfig {
    pub sma_period: usize,
    pub rsi_period: usize,
    pub rsi_lower: f64,
    pub rsi_upper: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
}

impl Default for ComplexTrendConfig {
    fn default() -> Self {
        Self {
            sma_period: 200,
            rsi_period: 14,
            rsi_lower: 50.0,
            rsi_upper: 60.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
        }
    }
}

impl StrategyConfig for ComplexTrendConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("sma_period", self.sma_period)?;
        require_period("rsi_period", self.rsi_period)?;
        require_period("macd_fast", self.macd_fast)?;
        require_period("macd_signal", self.macd_signal)?;
        require_ordered(self.macd_fast, self.macd_slow)?;
        if !(0.0..=100.0).contains(&self.rsi_lower) || self.rsi_lower > self.rsi_upper || self.rsi_upper > 100.0 {
            return Err(StrategyError::InvalidConfig(
                "RSI band must satisfy 0 <= lower <= upper <= 100".into(),
            ));
        }
        Ok(())
    }
}

/// Buys when price is above the long SMA, RSI sits in a moderate band and
/// MACD crosses above its signal line; closes on the opposite MACD cross.
pub struct ComplexTrendStrategy {
    config: ComplexTrendConfig,
}

impl ComplexTrendStrategy {
    pub fn new(config: ComplexTrendConfig) -> Self {
        Self { config }
    }
}

impl Strategy for ComplexTrendStrategy {
    fn name(&self) -> &str {
        "complex"
    }

    fn description(&self) -> &str {
        "SMA200 trend filter + RSI 50-60 + MACD golden cross; exits on MACD dead cross"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let c = &self.config;
        let closes = series.closes();
        let macd = Macd::with_periods(c.macd_fast, c.macd_slow, c.macd_signal)
            .adjusted()
            .calculate(series.full());

        Ok(IndicatorSet::new()
            .with("sma", Sma::new(c.sma_period).calculate(&closes))
            .with("rsi", Rsi::new(c.rsi_period).calculate(&closes))
            .with("macd", macd.macd)
            .with("macd_signal", macd.signal))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let close = ctx.prices.current().close;
        let macd = ctx.indicators.line("macd")?;
        let signal = ctx.indicators.line("macd_signal")?;

        let above_sma = ctx
            .indicators
            .value("sma")?
            .is_some_and(|sma| close > sma);
        let rsi_in_band = ctx
            .indicators
            .value("rsi")?
            .is_some_and(|rsi| (self.config.rsi_lower..=self.config.rsi_upper).contains(&rsi));

        if above_sma && rsi_in_band && macd.crossed_above(&signal) {
            Ok(enter(ctx))
        } else if macd.crossed_below(&signal) {
            Ok(exit(ctx))
        } else {
            Ok(Vec::new())
        }
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        self.config.sma_period
    }
}
