//! Backtesting engine.
//!
//! [`BacktestEngine::run`] replays one [`PriceSeries`](replay_core::types::PriceSeries)
//! through one strategy and returns a [`BacktestReport`] holding the equity
//! ledger, the trade log and [`BacktestStats`].

mod engine;
mod report;
mod statistics;

pub use engine::{BacktestEngine, BarDecision};
pub use report::BacktestReport;
pub use statistics::BacktestStats;
