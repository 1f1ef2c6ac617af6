//! Compare command: one series, several strategies, one blocking task each.

use anyhow::{Context, Result};
use futures::future::join_all;
use replay_backtest::{BacktestEngine, BacktestStats};
use replay_config::AppConfig;
use replay_strategies::StrategyRegistry;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use super::{backtest_config, load_series, strategy_params};
use crate::cli::{CompareArgs, OutputFormat};

#[derive(Serialize)]
struct Row {
    strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<BacktestStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn run(args: CompareArgs, app: &AppConfig) -> Result<()> {
    let registry = StrategyRegistry::new();
    // Fail before loading data if any name is unknown.
    let mut strategies = Vec::with_capacity(args.strategies.len());
    for name in &args.strategies {
        let params = strategy_params(name, None, app)?;
        let strategy = registry
            .create(name, params)
            .with_context(|| format!("Failed to create strategy '{name}'"))?;
        strategies.push((name.clone(), strategy));
    }

    let config = backtest_config(&args.run, app)?;
    let series = Arc::new(load_series(&args.run, app).await?);
    let limit = Duration::from_secs(args.timeout_secs);
    info!(strategies = strategies.len(), "Running comparison");

    let tasks = strategies.into_iter().map(|(name, mut strategy)| {
        let series = Arc::clone(&series);
        let engine = BacktestEngine::new(config.clone());
        let handle =
            tokio::task::spawn_blocking(move || engine.run(&series, strategy.as_mut()));
        async move {
            let outcome = match timeout(limit, handle).await {
                Err(_) => Err(format!("timed out after {}s", limit.as_secs())),
                Ok(Err(join)) => Err(format!("task failed: {join}")),
                Ok(Ok(Err(e))) => Err(e.to_string()),
                Ok(Ok(Ok(report))) => Ok(report.stats),
            };
            match outcome {
                Ok(stats) => Row {
                    strategy: name,
                    stats: Some(stats),
                    error: None,
                },
                Err(error) => {
                    warn!(strategy = %name, %error, "strategy run failed");
                    Row {
                        strategy: name,
                        stats: None,
                        error: Some(error),
                    }
                }
            }
        }
    });

    let mut rows = join_all(tasks).await;
    rows.sort_by(|a, b| {
        let ret = |r: &Row| r.stats.as_ref().map(|s| s.total_return_pct);
        ret(b).cmp(&ret(a))
    });

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => print_table(&rows, series.symbol()),
    }
    Ok(())
}

fn print_table(rows: &[Row], symbol: &str) {
    println!("Strategy comparison: {symbol}");
    println!("═══════════════════════════════════════════════════════════════════════════");
    println!(
        "  {:<14}{:>12}{:>12}{:>10}{:>10}{:>10}",
        "Strategy", "Return %", "Max DD %", "Sharpe", "Trades", "Win %"
    );
    println!("───────────────────────────────────────────────────────────────────────────");
    for row in rows {
        match (&row.stats, &row.error) {
            (Some(s), _) => println!(
                "  {:<14}{:>12.2}{:>12.2}{:>10.2}{:>10}{:>10.2}",
                row.strategy,
                s.total_return_pct,
                s.max_drawdown_pct,
                s.sharpe_ratio,
                s.total_trades,
                s.win_rate_pct
            ),
            (None, error) => println!(
                "  {:<14}  error: {}",
                row.strategy,
                error.as_deref().unwrap_or("unknown")
            ),
        }
    }
    println!("═══════════════════════════════════════════════════════════════════════════");
}
