//! ADX trend-strength strategy with directional indicator crossovers.

use replay_core::traits::MultiOutputIndicator;
use replay_core::{
    error::StrategyError,
    traits::{DecisionContext, Strategy, StrategyConfig},
    types::{IndicatorSet, OrderIntent, PriceSeries},
};
use replay_indicators::Adx;
use serde::{Deserialize, Serialize};

use crate::signals::{enter, exit, require_period};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdxConfig {
    /// Wilder smoothing period
    pub period: usize,
    /// Minimum ADX for a trend to count as strong
    pub threshold: f64,
}

impl Default for AdxConfig {
    fn default() -> Self {
        Self {
            period: 14,
            threshold: 25.0,
        }
    }
}

impl StrategyConfig for AdxConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        require_period("period", self.period)?;
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(StrategyError::InvalidConfig(
                "ADX threshold must be within [0, 100]".into(),
            ));
        }
        Ok(())
    }
}

/// Buys when ADX shows a strong trend and +DI crosses above -DI; closes
/// when -DI crosses above +DI.
pub struct AdxStrategy {
    config: AdxConfig,
}

impl AdxStrategy {
    pub fn new(config: AdxConfig) -> Self {
        Self { config }
    }
}

impl Strategy for AdxStrategy {
    fn name(&self) -> &str {
        "adx"
    }

    fn description(&self) -> &str {
        "ADX above threshold with +DI/-DI golden cross; exits when -DI crosses above +DI"
    }

    fn setup(&mut self, series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        let lines = Adx::new(self.config.period).calculate(series.full());
        Ok(IndicatorSet::new()
            .with("adx", lines.adx)
            .with("plus_di", lines.plus_di)
            .with("minus_di", lines.minus_di))
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        let plus = ctx.indicators.line("plus_di")?;
        let minus = ctx.indicators.line("minus_di")?;
        let strong = ctx
            .indicators
            .value("adx")?
            .is_some_and(|adx| adx > self.config.threshold);

        let mut intents = Vec::new();
        if strong && plus.crossed_above(&minus) {
            intents.extend(enter(ctx));
        }
        if minus.crossed_above(&plus) {
            intents.extend(exit(ctx));
        }
        Ok(intents)
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        self.config.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::testing::{bars_with, replay, series_from_closes};
    use replay_core::types::Side;

    #[test]
    fn test_reversal_into_uptrend() {
        let closes: Vec<f64> = (0..100)
            .map(|i| if i < 50 { 150.0 - i as f64 } else { 100.0 + (i - 50) as f64 * 1.5 })
            .collect();
        let series = series_from_closes(&closes);
        let mut strategy = AdxStrategy::new(AdxConfig::default());

        let intents = replay(&mut strategy, &series);
        let buys = bars_with(&intents, Side::Buy);
        assert_eq!(buys.len(), 1);
        assert!(buys[0] > 50 && buys[0] < 70, "entry at {}", buys[0]);
    }

    #[test]
    fn test_warmup_is_silent() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        let series = series_from_closes(&closes);
        let mut strategy = AdxStrategy::new(AdxConfig::default());

        let intents = replay(&mut strategy, &series);
        assert!(intents.iter().all(|v| v.is_empty()));
    }
}
