//! Strategy registry for name-based strategy selection.

use crate::{
    AdxStrategy, ComplexTrendStrategy, FibonacciStrategy, MacdStrategy, PullbackStrategy,
    RsiDivergenceStrategy, RsiStrategy, RsiSupportStrategy, SmaCrossStrategy, SmaSlopeStrategy,
    SrFlipStrategy, VolatilityBreakoutStrategy, VwapStrategy,
};
use replay_core::{error::StrategyError, traits::Strategy, traits::StrategyConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Strategy used when none is named.
pub const DEFAULT_STRATEGY: &str = "slope";

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key
    pub name: String,
    /// One-line summary of the rules
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Parse, validate and construct one strategy.
fn build<C, S>(
    config: serde_json::Value,
    ctor: fn(C) -> S,
) -> Result<Box<dyn Strategy>, StrategyError>
where
    C: StrategyConfig + DeserializeOwned,
    S: Strategy + 'static,
{
    let config = match config {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    let config: C =
        serde_json::from_value(config).map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(Box::new(ctor(config)))
}

type Builder =
    Box<dyn Fn(serde_json::Value) -> Result<Box<dyn Strategy>, StrategyError> + Send + Sync>;

struct Entry {
    info: StrategyInfo,
    build: Builder,
}

/// Registry of the bundled strategies, keyed by name.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Entry>,
}

impl StrategyRegistry {
    /// Create a registry with all built-in strategies.
    pub fn new() -> Self {
        let mut registry = Self {
            strategies: BTreeMap::new(),
        };

        registry.register("slope", SmaSlopeStrategy::new);
        registry.register("cross", SmaCrossStrategy::new);
        registry.register("complex", ComplexTrendStrategy::new);
        registry.register("adx", AdxStrategy::new);
        registry.register("macd", MacdStrategy::new);
        registry.register("rsi", RsiStrategy::new);
        registry.register("rsi_div", RsiDivergenceStrategy::new);
        registry.register("rsi_support", RsiSupportStrategy::new);
        registry.register("pullback", PullbackStrategy::new);
        registry.register("v_breakout", VolatilityBreakoutStrategy::new);
        registry.register("fibonacci", FibonacciStrategy::new);
        registry.register("sr_flip", SrFlipStrategy::new);
        registry.register("vwap", VwapStrategy::new);

        registry
    }

    fn register<C, S>(&mut self, name: &str, ctor: fn(C) -> S)
    where
        C: StrategyConfig + Serialize + DeserializeOwned + Default + 'static,
        S: Strategy + 'static,
    {
        let config = C::default();
        let default_config = serde_json::to_value(&config).unwrap_or_default();
        let strategy = ctor(config);
        self.strategies.insert(
            name.to_string(),
            Entry {
                info: StrategyInfo {
                    name: name.to_string(),
                    description: strategy.description().to_string(),
                    default_config,
                },
                build: Box::new(move |config| build(config, ctor)),
            },
        );
    }

    /// List all available strategies, sorted by name.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().map(|entry| &entry.info).collect()
    }

    /// Get strategy info by name.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        self.strategies.get(name).map(|entry| &entry.info)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Get all strategy names.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    /// Create a strategy instance from JSON parameters. Missing fields take
    /// their defaults; `null` means all defaults.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        let entry = self
            .strategies
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        (entry.build)(config)
    }

    /// Create a strategy with default configuration.
    pub fn create_default(&self, name: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        let info = self
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        self.create(name, info.default_config.clone())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = StrategyRegistry::new();
        assert_eq!(registry.list().len(), 13);
        assert!(registry.exists(DEFAULT_STRATEGY));
    }

    #[test]
    fn test_every_entry_builds_with_its_name() {
        let registry = StrategyRegistry::new();
        for name in registry.names() {
            let strategy = registry.create_default(name).unwrap();
            assert_eq!(strategy.name(), name);
            assert!(!strategy.description().is_empty());
        }
    }

    #[test]
    fn test_create_with_partial_config() {
        let registry = StrategyRegistry::new();

        let config = serde_json::json!({ "fast_period": 10 });
        assert!(registry.create("cross", config).is_ok());
        assert!(registry.create("rsi", serde_json::Value::Null).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let registry = StrategyRegistry::new();

        let config = serde_json::json!({ "fast_period": 30, "slow_period": 10 });
        assert!(matches!(
            registry.create("cross", config),
            Err(StrategyError::InvalidConfig(_))
        ));

        let config = serde_json::json!({ "period": "fourteen" });
        assert!(matches!(
            registry.create("rsi", config),
            Err(StrategyError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_create_unknown_strategy() {
        let registry = StrategyRegistry::new();

        assert!(matches!(
            registry.create_default("unknown"),
            Err(StrategyError::NotFound(_))
        ));
        assert!(matches!(
            registry.create("unknown", serde_json::Value::Null),
            Err(StrategyError::NotFound(_))
        ));
    }

    #[test]
    fn test_registered_name_is_creatable() {
        let mut registry = StrategyRegistry::new();
        registry.register("slope_fast", SmaSlopeStrategy::new);

        assert!(registry.exists("slope_fast"));
        let config = serde_json::json!({ "period": 5 });
        assert_eq!(registry.create("slope_fast", config).unwrap().name(), "slope");
        assert!(registry.create_default("slope_fast").is_ok());
    }
}
