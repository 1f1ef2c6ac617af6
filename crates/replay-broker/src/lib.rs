//! Simulated broker for bar-by-bar backtests.
//!
//! The broker owns cash and the single long position of a run. Strategy
//! intents are queued on one bar and settled against a later bar's prices.

pub mod simulated;
pub mod sizing;

pub use simulated::{PositionState, SimBroker};
pub use sizing::EntrySizer;
