//! Configuration structures.

use replay_core::error::ConfigError;
use replay_core::types::{BacktestConfig, FundingPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub strategy: StrategySettings,
}

impl AppConfig {
    /// Check every section that can be checked without touching the disk.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backtest.to_backtest_config()?;
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidParameter {
                name: "logging.format".into(),
                reason: format!("expected `pretty` or `json`, got `{}`", self.logging.format),
            });
        }
        if self.strategy.name.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "strategy.name".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "replay".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Also write logs to this file
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

/// Where price files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// A CSV file or a directory of `<symbol>.csv` files
    pub path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            path: "data".to_string(),
        }
    }
}

/// Backtest settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    pub initial_cash: Decimal,
    pub commission_rate: Decimal,
    pub funding_policy: FundingPolicy,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        let defaults = BacktestConfig::default();
        Self {
            initial_cash: defaults.initial_cash,
            commission_rate: defaults.commission_rate,
            funding_policy: defaults.funding_policy,
        }
    }
}

impl BacktestSettings {
    /// Validate into the engine's run configuration.
    pub fn to_backtest_config(&self) -> Result<BacktestConfig, ConfigError> {
        Ok(BacktestConfig::new(self.initial_cash, self.commission_rate)?
            .with_funding_policy(self.funding_policy))
    }
}

/// Default strategy and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    pub name: String,
    /// Parameters passed to the strategy's config struct
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            name: "slope".to_string(),
            params: serde_json::Map::new(),
        }
    }
}

impl StrategySettings {
    pub fn params_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.params.clone())
    }
}
