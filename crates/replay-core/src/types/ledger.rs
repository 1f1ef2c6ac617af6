//! Completed trades and per-bar equity points.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Closed by a strategy sell order.
    Signal,
    /// Force-closed at the last bar's close.
    EndOfData,
}

/// A round trip. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_bar: usize,
    pub entry_time: i64,
    pub entry_price: Decimal,
    pub exit_bar: usize,
    pub exit_time: i64,
    pub exit_price: Decimal,
    pub units: u64,
    /// Entry plus exit commission.
    pub commission: Decimal,
    /// Net of both commissions.
    pub pnl: Decimal,
    /// `pnl` relative to the entry cost basis, in percent.
    pub return_pct: Decimal,
    pub exit_reason: ExitReason,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar - self.entry_bar
    }
}

/// Portfolio value at one bar's close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub bar: usize,
    pub timestamp: i64,
    pub cash: Decimal,
    pub position_value: Decimal,
    pub equity: Decimal,
}
