//! Backtest command implementation.

use anyhow::{Context, Result};
use replay_backtest::BacktestEngine;
use replay_config::AppConfig;
use replay_strategies::StrategyRegistry;
use tracing::info;

use super::{backtest_config, load_series, strategy_params};
use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, app: &AppConfig) -> Result<()> {
    let name = args
        .strategy
        .clone()
        .unwrap_or_else(|| app.strategy.name.clone());
    info!("Starting backtest for strategy: {}", name);

    // Create strategy
    let registry = StrategyRegistry::new();
    let params = strategy_params(&name, args.params.as_deref(), app)?;
    let mut strategy = registry.create(&name, params).with_context(|| {
        format!(
            "Failed to create strategy '{}' (available: {})",
            name,
            registry.names().join(", ")
        )
    })?;

    let config = backtest_config(&args.run, app)?;
    let series = load_series(&args.run, app).await?;

    // The engine is synchronous and CPU-bound.
    let engine = BacktestEngine::new(config).with_decision_log(args.decisions);
    let report = tokio::task::spawn_blocking(move || engine.run(&series, strategy.as_mut()))
        .await
        .context("Backtest task panicked")?
        .context("Backtest failed")?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }
    if let Some(path) = &args.equity_csv {
        std::fs::write(path, report.equity_to_csv()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Equity ledger saved to {:?}", path);
    }
    if let Some(path) = &args.trades_csv {
        std::fs::write(path, report.trades_to_csv()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Trade log saved to {:?}", path);
    }

    Ok(())
}
