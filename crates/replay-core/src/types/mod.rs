//! Core data types for the backtester.

mod config;
mod indicator;
mod ledger;
mod ohlcv;
mod order;
mod position;
mod series;

pub use config::{BacktestConfig, FundingPolicy};
pub use indicator::{IndicatorLine, IndicatorSet, IndicatorView};
pub use ledger::{EquityPoint, ExitReason, Trade};
pub use ohlcv::Bar;
pub use order::{Fill, Order, OrderIntent, OrderKind, RejectReason, RejectedIntent, Side, Size, TimeInForce};
pub use position::{PendingOrderSummary, PortfolioSnapshot, Position};
pub use series::{PriceSeries, SeriesView};
