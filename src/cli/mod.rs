//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "replay")]
#[command(author, version, about = "Bar-by-bar strategy backtester")]
pub struct Cli {
    /// Configuration file path (defaults plus REPLAY__* variables when absent)
    #[arg(short, long, env = "REPLAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one strategy over one symbol
    Backtest(BacktestArgs),
    /// Run several strategies over the same data concurrently
    Compare(CompareArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
}

/// Data and run settings shared by `backtest` and `compare`.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Symbol to load
    #[arg(short = 'S', long)]
    pub symbol: String,

    /// CSV file or directory of `<symbol>.csv` files
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Initial cash
    #[arg(long)]
    pub cash: Option<Decimal>,

    /// Commission rate per fill, e.g. 0.002
    #[arg(long)]
    pub commission: Option<Decimal>,

    /// Buy what the cash covers instead of rejecting under-funded entries
    #[arg(long)]
    pub size_down: bool,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Strategy to backtest
    #[arg(short, long)]
    pub strategy: Option<String>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Strategy parameters (JSON file)
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the JSON report to file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Write the equity ledger as CSV
    #[arg(long)]
    pub equity_csv: Option<PathBuf>,

    /// Write the trade log as CSV
    #[arg(long)]
    pub trades_csv: Option<PathBuf>,

    /// Include every bar's order intents in the report
    #[arg(long)]
    pub decisions: bool,
}

#[derive(clap::Args)]
pub struct CompareArgs {
    /// Strategies to run (comma-separated)
    #[arg(short = 's', long, value_delimiter = ',', required = true)]
    pub strategies: Vec<String>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Give up on a strategy after this many seconds
    #[arg(long, default_value = "60")]
    pub timeout_secs: u64,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}
