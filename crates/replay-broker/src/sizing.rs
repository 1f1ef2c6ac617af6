//! Entry sizing under a funding policy.

use num_traits::ToPrimitive;
use replay_core::error::BrokerError;
use replay_core::money::to_decimal;
use replay_core::types::{FundingPolicy, Size};
use rust_decimal::Decimal;

/// Turns a requested `Size` into whole units at a known fill price.
///
/// A unit costs `price * (1 + commission_rate)`, so a funded entry never
/// leaves cash negative once its commission is paid.
#[derive(Debug, Clone, Copy)]
pub struct EntrySizer {
    commission_rate: Decimal,
    policy: FundingPolicy,
}

impl EntrySizer {
    pub fn new(commission_rate: Decimal, policy: FundingPolicy) -> Self {
        Self {
            commission_rate,
            policy,
        }
    }

    pub fn policy(&self) -> FundingPolicy {
        self.policy
    }

    /// Cash needed for one unit including commission, `None` on overflow.
    pub fn unit_cost(&self, price: Decimal) -> Option<Decimal> {
        price.checked_mul(Decimal::ONE + self.commission_rate)
    }

    /// Whole units `budget` buys at `price`.
    fn affordable(&self, budget: Decimal, price: Decimal) -> u64 {
        let Some(unit_cost) = self.unit_cost(price) else {
            return 0;
        };
        if unit_cost <= Decimal::ZERO || budget <= Decimal::ZERO {
            return 0;
        }
        (budget / unit_cost).floor().to_u64().unwrap_or(0)
    }

    /// Units to buy for `size` at `price`, given current `cash` and `equity`.
    pub fn units(
        &self,
        size: Size,
        price: Decimal,
        cash: Decimal,
        equity: Decimal,
    ) -> Result<u64, BrokerError> {
        if price <= Decimal::ZERO {
            return Err(BrokerError::InvalidOrder(format!(
                "cannot size an entry at price {price}"
            )));
        }

        let requested = match size {
            Size::Units(n) => n,
            Size::EquityFraction(f) => self.affordable(equity * to_decimal(f), price),
            Size::All => self.affordable(equity, price),
        };

        let funded = self.affordable(cash, price);
        let units = match self.policy {
            FundingPolicy::Reject if requested > funded => 0,
            FundingPolicy::Reject => requested,
            FundingPolicy::SizeDown => requested.min(funded),
        };

        if units == 0 {
            let required = self
                .unit_cost(price)
                .and_then(|cost| cost.checked_mul(Decimal::from(requested.max(1))))
                .ok_or_else(|| {
                    BrokerError::InvalidOrder(format!(
                        "cost of {requested} units at {price} overflows"
                    ))
                })?;
            return Err(BrokerError::InsufficientFunds {
                required,
                available: cash,
            });
        }
        Ok(units)
    }
}
