//! CLI command implementations.

pub mod backtest;
pub mod compare;
pub mod strategies;
pub mod validate;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use replay_config::AppConfig;
use replay_core::types::{BacktestConfig, FundingPolicy, PriceSeries};
use std::path::PathBuf;
use tracing::info;

use crate::cli::RunArgs;

/// Run configuration from the config file, with command-line overrides.
fn backtest_config(args: &RunArgs, app: &AppConfig) -> Result<BacktestConfig> {
    let mut settings = app.backtest.clone();
    if let Some(cash) = args.cash {
        settings.initial_cash = cash;
    }
    if let Some(rate) = args.commission {
        settings.commission_rate = rate;
    }
    if args.size_down {
        settings.funding_policy = FundingPolicy::SizeDown;
    }
    settings
        .to_backtest_config()
        .context("Invalid backtest settings")
}

fn parse_date(value: &str, time: NaiveTime) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))?;
    Ok(date.and_time(time).and_utc())
}

async fn load_series(args: &RunArgs, app: &AppConfig) -> Result<PriceSeries> {
    let path = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&app.data.path));
    if !path.exists() {
        anyhow::bail!(
            "Data path '{}' does not exist. Provide a CSV file or directory containing CSV files (e.g. --data ./data)",
            path.display()
        );
    }

    let start = args
        .start
        .as_deref()
        .map(|s| parse_date(s, NaiveTime::MIN))
        .transpose()?;
    // The end date is inclusive.
    let end = args
        .end
        .as_deref()
        .map(|s| parse_date(s, NaiveTime::MIN))
        .transpose()?
        .map(|d| d + Duration::days(1) - Duration::milliseconds(1));

    let series = replay_data::load_series(&path.to_string_lossy(), &args.symbol, start, end)
        .await
        .with_context(|| format!("Failed to load {} from {}", args.symbol, path.display()))?;
    info!(symbol = %args.symbol, bars = series.len(), "Loaded price data");
    Ok(series)
}

/// Parameters for `name`: the JSON file if given, else the config file's
/// parameters when it names the same strategy, else defaults.
fn strategy_params(
    name: &str,
    file: Option<&std::path::Path>,
    app: &AppConfig,
) -> Result<serde_json::Value> {
    if let Some(path) = file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in {}", path.display()));
    }
    if app.strategy.name == name {
        return Ok(app.strategy.params_value());
    }
    Ok(serde_json::Value::Null)
}
