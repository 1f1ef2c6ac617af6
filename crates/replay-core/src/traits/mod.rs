//! Core traits for the backtester.

mod data_source;
mod indicator;
mod strategy;

pub use data_source::DataSource;
pub use indicator::{Indicator, MultiOutputIndicator};
pub use strategy::{DecisionContext, Strategy, StrategyConfig};
