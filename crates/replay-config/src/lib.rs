//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BacktestSettings, DataSettings, LoggingConfig, StrategySettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment prefix; `REPLAY__BACKTEST__INITIAL_CASH=5000` overrides
/// `backtest.initial_cash`.
pub const ENV_PREFIX: &str = "REPLAY";

/// Load configuration from file and environment.
///
/// A missing file is not an error: defaults plus environment apply.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
