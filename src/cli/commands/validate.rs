//! Validate configuration command.

use anyhow::{Context, Result};
use replay_config::AppConfig;
use replay_strategies::StrategyRegistry;
use std::path::Path;

pub async fn run(config_path: Option<&Path>, config: &AppConfig) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {:?}", path),
        None => println!("Validating defaults and REPLAY__* environment overrides"),
    }

    config.validate().context("Configuration error")?;
    StrategyRegistry::new()
        .create(&config.strategy.name, config.strategy.params_value())
        .with_context(|| format!("Invalid strategy section '{}'", config.strategy.name))?;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Log level: {}", config.logging.level);
    println!("Data path: {}", config.data.path);
    println!("Initial cash: {}", config.backtest.initial_cash);
    println!("Commission rate: {}", config.backtest.commission_rate);
    println!("Strategy: {}", config.strategy.name);
    println!();
    println!("Effective configuration:");
    println!("{}", config.to_toml()?);

    Ok(())
}
