//! Trading strategy implementations.
//!
//! Every strategy registers its indicators once over the full history and
//! then decides bar by bar from bounded views:
//! - Moving averages: SMA slope reversal, SMA crossover, pullback to SMA20
//! - Momentum: MACD crossover, RSI thresholds, RSI divergence, RSI support
//! - Trend: ADX with directional crossovers, SMA200/RSI/MACD confluence
//! - Price structure: volatility breakout, Fibonacci retracement,
//!   support/resistance flip, VWAP crossover

mod adx_strategy;
mod complex_trend;
mod fibonacci;
mod ma_crossover;
mod macd_strategy;
mod pullback;
mod registry;
mod rsi_divergence;
mod rsi_strategy;
mod rsi_support;
mod signals;
mod sma_slope;
mod sr_flip;
mod volatility_breakout;
mod vwap_strategy;

pub use adx_strategy::{AdxConfig, AdxStrategy};
pub use complex_trend::{ComplexTrendConfig, ComplexTrendStrategy};
pub use fibonacci::{FibLevels, FibonacciConfig, FibonacciStrategy};
pub use ma_crossover::{SmaCrossConfig, SmaCrossStrategy};
pub use macd_strategy::{MacdConfig, MacdStrategy};
pub use pullback::{PullbackConfig, PullbackStrategy};
pub use registry::{StrategyInfo, StrategyRegistry, DEFAULT_STRATEGY};
pub use rsi_divergence::{RsiDivergenceConfig, RsiDivergenceStrategy};
pub use rsi_strategy::{RsiConfig, RsiStrategy};
pub use rsi_support::{RsiSupportConfig, RsiSupportStrategy};
pub use sma_slope::{SlopeState, SmaSlopeConfig, SmaSlopeStrategy};
pub use sr_flip::{FlipState, SrFlipConfig, SrFlipStrategy};
pub use volatility_breakout::{VolatilityBreakoutConfig, VolatilityBreakoutStrategy};
pub use vwap_strategy::{VwapConfig, VwapStrategy};
