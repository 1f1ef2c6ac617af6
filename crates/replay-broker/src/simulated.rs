//! Simulated broker: one long position, orders queued for later bars.

use replay_core::error::BrokerError;
use replay_core::money::to_decimal;
use replay_core::types::{
    BacktestConfig, Bar, EquityPoint, ExitReason, Fill, Order, OrderIntent, OrderKind,
    PendingOrderSummary, PortfolioSnapshot, Position, RejectReason, RejectedIntent, Side,
    TimeInForce, Trade,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::sizing::EntrySizer;

/// Where the run's single position stands.
///
/// `Flat -> PendingEntry -> Long -> PendingExit -> Flat`, with cancel and
/// replace edges back to the same or previous state.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionState {
    Flat,
    PendingEntry(Order),
    Long(Position),
    PendingExit { position: Position, order: Order },
}

impl PositionState {
    pub fn position(&self) -> Option<&Position> {
        match self {
            PositionState::Long(position) | PositionState::PendingExit { position, .. } => {
                Some(position)
            }
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&Order> {
        match self {
            PositionState::PendingEntry(order) | PositionState::PendingExit { order, .. } => {
                Some(order)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PositionState::Flat => "flat",
            PositionState::PendingEntry(_) => "pending_entry",
            PositionState::Long(_) => "long",
            PositionState::PendingExit { .. } => "pending_exit",
        }
    }
}

/// Execution simulator owned by a single run.
///
/// Fill rules:
/// - market orders fill at the open of the first bar after they were placed
/// - limit orders fill at their limit price on the first later bar with
///   `low <= limit <= high`; unfilled `Day` orders expire after that bar
/// - every fill pays `notional * commission_rate` out of cash
#[derive(Debug)]
pub struct SimBroker {
    config: BacktestConfig,
    sizer: EntrySizer,
    cash: Decimal,
    state: PositionState,
    next_order_id: u64,
    trades: Vec<Trade>,
    rejected: Vec<RejectedIntent>,
}

impl SimBroker {
    /// Create a broker holding `config.initial_cash`.
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            sizer: EntrySizer::new(config.commission_rate, config.funding_policy),
            cash: config.initial_cash,
            config,
            state: PositionState::Flat,
            next_order_id: 1,
            trades: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn state(&self) -> &PositionState {
        &self.state
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn rejected(&self) -> &[RejectedIntent] {
        &self.rejected
    }

    /// Consume the broker, returning the trade log and rejected intents.
    pub fn into_logs(self) -> (Vec<Trade>, Vec<RejectedIntent>) {
        (self.trades, self.rejected)
    }

    /// Value of the open position marked at `price`.
    pub fn position_value(&self, price: f64) -> Decimal {
        self.state
            .position()
            .map(|p| p.market_value(to_decimal(price)))
            .unwrap_or(Decimal::ZERO)
    }

    /// Cash plus the position marked at `price`.
    pub fn equity(&self, price: f64) -> Decimal {
        self.cash + self.position_value(price)
    }

    /// Equity point at `bar`'s close.
    pub fn mark(&self, index: usize, bar: &Bar) -> EquityPoint {
        let position_value = self.position_value(bar.close);
        EquityPoint {
            bar: index,
            timestamp: bar.timestamp,
            cash: self.cash,
            position_value,
            equity: self.cash + position_value,
        }
    }

    /// Read-only copy of the portfolio marked at `price`.
    pub fn snapshot(&self, price: f64) -> PortfolioSnapshot {
        PortfolioSnapshot {
            cash: self.cash,
            equity: self.equity(price),
            position: self.state.position().copied(),
            pending: self.state.pending().map(PendingOrderSummary::from),
        }
    }

    /// Queue `intent`, issued at bar `index`, for a later bar.
    ///
    /// Intents that make no sense in the current state are recorded as
    /// rejected; the run continues either way.
    pub fn submit(&mut self, intent: OrderIntent, index: usize, timestamp: i64) {
        if let Err(err) = self.accept(intent, index, timestamp) {
            debug!(bar = index, side = %intent.side, error = %err, "intent rejected");
            self.reject(index, timestamp, intent, err.into());
        }
    }

    fn accept(&mut self, intent: OrderIntent, index: usize, timestamp: i64) -> Result<(), BrokerError> {
        intent.validate().map_err(BrokerError::InvalidOrder)?;

        let state = std::mem::replace(&mut self.state, PositionState::Flat);
        let (next, result) = match (state, intent.side) {
            (PositionState::Flat, Side::Buy) => {
                (PositionState::PendingEntry(self.new_order(intent, index)), Ok(()))
            }
            (PositionState::Flat, Side::Sell) => (PositionState::Flat, Err(BrokerError::NoPosition)),
            (PositionState::PendingEntry(old), Side::Buy) => {
                self.reject(index, timestamp, old.intent, RejectReason::Replaced);
                (PositionState::PendingEntry(self.new_order(intent, index)), Ok(()))
            }
            (PositionState::PendingEntry(old), Side::Sell) => {
                self.reject(index, timestamp, old.intent, RejectReason::Canceled);
                (PositionState::Flat, Ok(()))
            }
            (PositionState::Long(position), Side::Sell) => {
                let order = self.new_order(intent, index);
                (PositionState::PendingExit { position, order }, Ok(()))
            }
            (PositionState::PendingExit { position, order: old }, Side::Sell) => {
                self.reject(index, timestamp, old.intent, RejectReason::Replaced);
                let order = self.new_order(intent, index);
                (PositionState::PendingExit { position, order }, Ok(()))
            }
            (state @ (PositionState::Long(_) | PositionState::PendingExit { .. }), Side::Buy) => {
                (state, Err(BrokerError::AlreadyLong))
            }
        };

        self.state = next;
        result
    }

    fn new_order(&mut self, intent: OrderIntent, index: usize) -> Order {
        let id = self.next_order_id;
        self.next_order_id += 1;
        Order {
            id,
            intent,
            placed_bar: index,
        }
    }

    fn reject(&mut self, index: usize, timestamp: i64, intent: OrderIntent, reason: RejectReason) {
        self.rejected.push(RejectedIntent {
            bar: index,
            timestamp,
            intent,
            reason,
        });
    }

    /// Price `order` would execute at on `bar`, if any.
    fn execution_price(order: &Order, bar: &Bar) -> Option<f64> {
        match order.intent.kind {
            OrderKind::Market => Some(bar.open),
            OrderKind::Limit { price } => bar.contains(price).then_some(price),
        }
    }

    /// Settle the pending order, if any, against bar `index`.
    ///
    /// Every bar settles the same way, the final one included, so the
    /// outcome at a bar never depends on whether later bars exist.
    pub fn settle(&mut self, index: usize, bar: &Bar) -> Option<Fill> {
        let state = std::mem::replace(&mut self.state, PositionState::Flat);
        match state {
            PositionState::PendingEntry(order) if order.placed_bar < index => {
                match Self::execution_price(&order, bar) {
                    Some(price) => self.open_position(order, index, bar, price),
                    None => {
                        self.expire_or_keep(index, bar, PositionState::PendingEntry(order), PositionState::Flat);
                        None
                    }
                }
            }
            PositionState::PendingExit { position, order } if order.placed_bar < index => {
                match Self::execution_price(&order, bar) {
                    Some(price) => {
                        let fill = self.close_position(&position, order.id, index, bar.timestamp, to_decimal(price), ExitReason::Signal);
                        Some(fill)
                    }
                    None => {
                        self.expire_or_keep(
                            index,
                            bar,
                            PositionState::PendingExit { position, order },
                            PositionState::Long(position),
                        );
                        None
                    }
                }
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Keep a missed limit order pending, or expire it if it is a day order.
    fn expire_or_keep(&mut self, index: usize, bar: &Bar, pending: PositionState, expired: PositionState) {
        let order = pending.pending().copied();
        match order {
            Some(order) if order.intent.time_in_force == TimeInForce::Day => {
                debug!(bar = index, order_id = order.id, "day order expired");
                self.reject(index, bar.timestamp, order.intent, RejectReason::Expired);
                self.state = expired;
            }
            _ => self.state = pending,
        }
    }

    fn open_position(&mut self, order: Order, index: usize, bar: &Bar, price: f64) -> Option<Fill> {
        let price = to_decimal(price);
        // Flat while an entry is pending, so equity is just cash.
        let units = match self.sizer.units(order.intent.size, price, self.cash, self.cash) {
            Ok(units) => units,
            Err(err) => {
                warn!(bar = index, order_id = order.id, error = %err, "entry not funded");
                self.reject(index, bar.timestamp, order.intent, err.into());
                self.state = PositionState::Flat;
                return None;
            }
        };

        let cost = price
            .checked_mul(Decimal::from(units))
            .and_then(|notional| {
                let commission = notional.checked_mul(self.config.commission_rate)?;
                Some((notional, commission))
            });
        let Some((notional, commission)) = cost else {
            let err = BrokerError::InvalidOrder(format!("notional of {units} units at {price} overflows"));
            warn!(bar = index, order_id = order.id, error = %err, "entry not filled");
            self.reject(index, bar.timestamp, order.intent, err.into());
            self.state = PositionState::Flat;
            return None;
        };
        self.cash -= notional + commission;

        let fill = Fill {
            order_id: order.id,
            side: Side::Buy,
            bar: index,
            timestamp: bar.timestamp,
            price,
            units,
            commission,
        };
        debug!(bar = index, order_id = order.id, %price, units, %commission, "entry filled");

        self.state = PositionState::Long(Position {
            entry_bar: index,
            entry_time: bar.timestamp,
            entry_price: price,
            units,
            entry_commission: commission,
        });
        Some(fill)
    }

    fn close_position(
        &mut self,
        position: &Position,
        order_id: u64,
        index: usize,
        timestamp: i64,
        price: Decimal,
        reason: ExitReason,
    ) -> Fill {
        let notional = position.market_value(price);
        let commission = notional * self.config.commission_rate;
        self.cash += notional - commission;

        let cost_basis = position.cost_basis();
        let pnl = notional - commission - cost_basis - position.entry_commission;
        let return_pct = if cost_basis > Decimal::ZERO {
            pnl / cost_basis * dec!(100)
        } else {
            Decimal::ZERO
        };

        self.trades.push(Trade {
            entry_bar: position.entry_bar,
            entry_time: position.entry_time,
            entry_price: position.entry_price,
            exit_bar: index,
            exit_time: timestamp,
            exit_price: price,
            units: position.units,
            commission: position.entry_commission + commission,
            pnl,
            return_pct,
            exit_reason: reason,
        });

        let fill = Fill {
            order_id,
            side: Side::Sell,
            bar: index,
            timestamp,
            price,
            units: position.units,
            commission,
        };
        debug!(bar = index, order_id, %price, %pnl, ?reason, "position closed");

        self.state = PositionState::Flat;
        fill
    }

    /// End the run at bar `index`: drop any pending order and close any
    /// open position at the bar's close, commission included.
    ///
    /// An entry filled at this bar's open is closed at its close, giving a
    /// round trip inside the final bar.
    pub fn finish(&mut self, index: usize, bar: &Bar) -> Option<Trade> {
        let state = std::mem::replace(&mut self.state, PositionState::Flat);
        let position = match state {
            PositionState::Flat => return None,
            PositionState::PendingEntry(order) => {
                self.reject(index, bar.timestamp, order.intent, RejectReason::EndOfData);
                return None;
            }
            PositionState::Long(position) => position,
            PositionState::PendingExit { position, order } => {
                self.reject(index, bar.timestamp, order.intent, RejectReason::EndOfData);
                position
            }
        };

        let order_id = self.next_order_id;
        self.next_order_id += 1;
        self.close_position(&position, order_id, index, bar.timestamp, to_decimal(bar.close), ExitReason::EndOfData);
        self.trades.last().cloned()
    }
}
