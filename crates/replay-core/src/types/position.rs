//! Open position and the read-only portfolio snapshot handed to strategies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Order, Side};

/// The single long position a run may hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub entry_bar: usize,
    pub entry_time: i64,
    pub entry_price: Decimal,
    pub units: u64,
    /// Commission paid on entry, carried into the closing trade's P&L.
    pub entry_commission: Decimal,
}

impl Position {
    pub fn cost_basis(&self) -> Decimal {
        self.entry_price * Decimal::from(self.units)
    }

    pub fn market_value(&self, price: Decimal) -> Decimal {
        price * Decimal::from(self.units)
    }

    /// Gross unrealized P&L at `price`, before any commission.
    pub fn unrealized_pnl(&self, price: Decimal) -> Decimal {
        self.market_value(price) - self.cost_basis()
    }

    /// Bars held as of bar `index`.
    pub fn bars_held(&self, index: usize) -> usize {
        index.saturating_sub(self.entry_bar)
    }
}

/// Summary of the order waiting for a later bar, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingOrderSummary {
    pub order_id: u64,
    pub side: Side,
    pub placed_bar: usize,
}

impl From<&Order> for PendingOrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            side: order.intent.side,
            placed_bar: order.placed_bar,
        }
    }
}

/// Copy of the broker's state at the current bar's close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub cash: Decimal,
    pub equity: Decimal,
    pub position: Option<Position>,
    pub pending: Option<PendingOrderSummary>,
}

impl PortfolioSnapshot {
    /// Empty portfolio holding `cash`.
    pub fn flat(cash: Decimal) -> Self {
        Self {
            cash,
            equity: cash,
            position: None,
            pending: None,
        }
    }

    pub fn is_long(&self) -> bool {
        self.position.is_some()
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Flat with nothing queued.
    pub fn can_enter(&self) -> bool {
        self.position.is_none() && self.pending.is_none()
    }

    /// Long with no exit queued yet.
    pub fn can_exit(&self) -> bool {
        self.position.is_some() && self.pending.is_none()
    }
}
