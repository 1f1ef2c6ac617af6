//! Core types and traits for the bar-replay backtester.
//!
//! This crate provides the foundational building blocks including:
//! - Validated price series and the look-ahead-safe views over it
//! - Indicator registration and bounded indicator access
//! - Order intents, positions, trades and equity points
//! - The `Strategy` and `DataSource` traits

pub mod error;
pub mod money;
pub mod traits;
pub mod types;

pub use error::{BrokerError, ConfigError, DataError, EngineError, EngineResult, StrategyError};
pub use traits::*;
pub use types::*;
