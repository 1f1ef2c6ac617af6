//! Technical indicators used by the bundled strategies.
//!
//! Every indicator is a batch computation over the full history, run once
//! before the replay loop starts:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Directional movement (ADX, +DI, -DI)
//! - Volume-weighted average price
//! - Rolling extremes and shifts
//!
//! Outputs always have the input's length, with `NaN` wherever a value is
//! not yet defined.

pub mod directional;
pub mod momentum;
pub mod moving_average;
pub mod rolling;
pub mod volume;

pub use directional::{Adx, AdxLines};
pub use momentum::{Macd, MacdLines, Rsi};
pub use moving_average::{Ema, Sma};
pub use rolling::{diff, shift, RollingMax, RollingMin};
pub use volume::Vwap;
