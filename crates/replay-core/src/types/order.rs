//! Order intents, queued orders, fills and rejections.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BrokerError;

/// Order side. `Sell` always closes the whole long position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// How many units an entry should buy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Size {
    /// Fixed whole units.
    Units(u64),
    /// Fraction of current equity, in (0, 1].
    EquityFraction(f64),
    /// All available equity.
    #[default]
    All,
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum OrderKind {
    /// Fill at the next bar's open.
    Market,
    /// Fill at `price` on the first later bar whose range contains it.
    Limit { price: f64 },
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Limit { price } => write!(f, "LIMIT@{price}"),
        }
    }
}

/// Lifetime of an unfilled limit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good til canceled.
    #[default]
    Gtc,
    /// Expires after the first bar it could have filled on.
    Day,
}

/// What a strategy asks the broker to do. Never executed on the bar it is
/// issued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub side: Side,
    #[serde(default)]
    pub size: Size,
    pub kind: OrderKind,
    #[serde(default)]
    pub time_in_force: TimeInForce,
}

impl OrderIntent {
    /// Market buy using all available equity.
    pub fn buy() -> Self {
        Self {
            side: Side::Buy,
            size: Size::All,
            kind: OrderKind::Market,
            time_in_force: TimeInForce::Gtc,
        }
    }

    /// Market order closing the open position.
    pub fn close() -> Self {
        Self {
            side: Side::Sell,
            size: Size::All,
            kind: OrderKind::Market,
            time_in_force: TimeInForce::Gtc,
        }
    }

    /// Limit buy at `price`.
    pub fn limit_buy(price: f64) -> Self {
        Self {
            kind: OrderKind::Limit { price },
            ..Self::buy()
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Check the intent's own fields, independent of portfolio state.
    pub fn validate(&self) -> Result<(), String> {
        if let OrderKind::Limit { price } = self.kind {
            if !price.is_finite() || price <= 0.0 {
                return Err(format!("limit price must be positive, got {price}"));
            }
        }
        match self.size {
            Size::Units(0) => Err("unit size must be at least 1".to_string()),
            Size::EquityFraction(f) if !(f > 0.0 && f <= 1.0) => {
                Err(format!("equity fraction must be in (0, 1], got {f}"))
            }
            _ => Ok(()),
        }
    }
}

/// An accepted intent waiting for a later bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Sequential per broker, so reruns produce identical ids.
    pub id: u64,
    pub intent: OrderIntent,
    /// Bar on which the intent was issued.
    pub placed_bar: usize,
}

/// An executed order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub order_id: u64,
    pub side: Side,
    pub bar: usize,
    pub timestamp: i64,
    pub price: Decimal,
    pub units: u64,
    pub commission: Decimal,
}

impl Fill {
    pub fn notional(&self) -> Decimal {
        self.price * Decimal::from(self.units)
    }
}

/// Why an intent or pending order did not execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum RejectReason {
    InsufficientFunds { required: Decimal, available: Decimal },
    NoPosition,
    AlreadyLong,
    InvalidOrder { message: String },
    /// A day limit order that did not fill on its first bar.
    Expired,
    /// Replaced by a newer intent before it filled.
    Replaced,
    /// Canceled by a sell while the entry was still pending.
    Canceled,
    /// Still pending when the series ended.
    EndOfData,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::InsufficientFunds { required, available } => {
                write!(f, "insufficient funds (required {required}, available {available})")
            }
            RejectReason::NoPosition => write!(f, "no position to close"),
            RejectReason::AlreadyLong => write!(f, "already long"),
            RejectReason::InvalidOrder { message } => write!(f, "invalid order: {message}"),
            RejectReason::Expired => write!(f, "expired"),
            RejectReason::Replaced => write!(f, "replaced"),
            RejectReason::Canceled => write!(f, "canceled"),
            RejectReason::EndOfData => write!(f, "end of data"),
        }
    }
}

impl From<BrokerError> for RejectReason {
    fn from(err: BrokerError) -> Self {
        match err {
            BrokerError::InsufficientFunds { required, available } => {
                RejectReason::InsufficientFunds { required, available }
            }
            BrokerError::NoPosition => RejectReason::NoPosition,
            BrokerError::AlreadyLong => RejectReason::AlreadyLong,
            BrokerError::InvalidOrder(message) => RejectReason::InvalidOrder { message },
        }
    }
}

/// A skipped intent, kept in the run's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedIntent {
    pub bar: usize,
    pub timestamp: i64,
    pub intent: OrderIntent,
    #[serde(flatten)]
    pub reason: RejectReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_constructors() {
        let buy = OrderIntent::limit_buy(10.5).with_time_in_force(TimeInForce::Day);
        assert_eq!(buy.side, Side::Buy);
        assert_eq!(buy.kind, OrderKind::Limit { price: 10.5 });
        assert_eq!(buy.time_in_force, TimeInForce::Day);

        let close = OrderIntent::close();
        assert_eq!(close.side, Side::Sell);
        assert_eq!(close.kind, OrderKind::Market);
    }

    #[test]
    fn test_intent_validation() {
        assert!(OrderIntent::buy().validate().is_ok());
        assert!(OrderIntent::limit_buy(-1.0).validate().is_err());
        assert!(OrderIntent::limit_buy(f64::NAN).validate().is_err());
        assert!(OrderIntent::buy().with_size(Size::Units(0)).validate().is_err());
        assert!(OrderIntent::buy().with_size(Size::EquityFraction(1.5)).validate().is_err());
        assert!(OrderIntent::buy().with_size(Size::EquityFraction(0.5)).validate().is_ok());
    }

    #[test]
    fn test_intent_json() {
        let json = r#"{"side":"buy","kind":{"type":"limit","price":12.0}}"#;
        let intent: OrderIntent = serde_json::from_str(json).unwrap();
        assert_eq!(intent, OrderIntent::limit_buy(12.0));
    }

    #[test]
    fn test_fill_notional() {
        let fill = Fill {
            order_id: 1,
            side: Side::Buy,
            bar: 1,
            timestamp: 0,
            price: Decimal::new(1000, 1),
            units: 3,
            commission: Decimal::ZERO,
        };
        assert_eq!(fill.notional(), Decimal::new(300, 0));
    }
}
