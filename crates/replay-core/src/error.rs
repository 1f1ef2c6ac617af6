//! Error types for the backtester.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level error returned by a backtest run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Strategy failure, with the bar being processed (`None` during setup).
    #[error("Strategy error at {}: {source}", bar_label(.bar))]
    Strategy {
        bar: Option<usize>,
        #[source]
        source: StrategyError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

fn bar_label(bar: &Option<usize>) -> String {
    match bar {
        Some(i) => format!("bar {i}"),
        None => "setup".to_string(),
    }
}

impl EngineError {
    /// Wrap a strategy error with the bar it happened on.
    pub fn strategy_at(bar: usize, source: StrategyError) -> Self {
        Self::Strategy {
            bar: Some(bar),
            source,
        }
    }

    /// Wrap a strategy error raised while registering indicators.
    pub fn strategy_setup(source: StrategyError) -> Self {
        Self::Strategy { bar: None, source }
    }
}

/// Price data errors. Always fatal and raised before the first bar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Price series is empty")]
    EmptySeries,

    #[error("Bar {index}: {field} is not a finite number")]
    NonFinite { index: usize, field: &'static str },

    #[error("Bar {index}: {field} is negative")]
    NegativeValue { index: usize, field: &'static str },

    #[error("Bar {index}: high/low do not bracket open and close")]
    InconsistentRange { index: usize },

    #[error("Bar {index}: timestamp {current} does not follow {prev}")]
    NonMonotonicTime { index: usize, prev: i64, current: i64 },

    #[error("Index {index} out of range for series of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Invalid run configuration, rejected before anything is simulated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Initial cash must be positive, got {value}")]
    NonPositiveCash { value: Decimal },

    #[error("Commission rate must be in [0, 1), got {value}")]
    InvalidCommission { value: Decimal },

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: String, reason: String },
}

/// Strategy-specific errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),

    #[error("Indicator `{name}` has {actual} values, expected {expected}")]
    IndicatorLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Indicator `{0}` was not registered")]
    MissingIndicator(String),

    #[error("Strategy error: {0}")]
    Internal(String),
}

/// Broker-side failures. These are recorded per intent and never abort a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrokerError {
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("No open position to close")]
    NoPosition,

    #[error("Already holding a position")]
    AlreadyLong,

    #[error("Invalid order: {0}")]
    InvalidOrder(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
