//! Run configuration shared by the broker and the engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What to do with an entry the available cash cannot fully fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FundingPolicy {
    /// Skip the order and record it as rejected.
    #[default]
    Reject,
    /// Buy as many whole units as the cash covers; reject only if none.
    SizeDown,
}

/// Immutable settings for one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub initial_cash: Decimal,
    /// Proportional fee charged on the notional of every fill.
    pub commission_rate: Decimal,
    #[serde(default)]
    pub funding_policy: FundingPolicy,
}

impl BacktestConfig {
    /// Build and validate a configuration.
    pub fn new(initial_cash: Decimal, commission_rate: Decimal) -> Result<Self, ConfigError> {
        let config = Self {
            initial_cash,
            commission_rate,
            funding_policy: FundingPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_funding_policy(mut self, policy: FundingPolicy) -> Self {
        self.funding_policy = policy;
        self
    }

    /// Cash must be positive and the commission rate in `[0, 1)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_cash <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveCash {
                value: self.initial_cash,
            });
        }
        if self.commission_rate < Decimal::ZERO || self.commission_rate >= Decimal::ONE {
            return Err(ConfigError::InvalidCommission {
                value: self.commission_rate,
            });
        }
        Ok(())
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_cash: dec!(10000000),
            commission_rate: dec!(0.002),
            funding_policy: FundingPolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(BacktestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_cash() {
        assert_eq!(
            BacktestConfig::new(dec!(0), dec!(0.002)).unwrap_err(),
            ConfigError::NonPositiveCash { value: dec!(0) }
        );
        assert!(BacktestConfig::new(dec!(-5), dec!(0)).is_err());
    }

    #[test]
    fn test_rejects_bad_commission() {
        assert!(BacktestConfig::new(dec!(1000), dec!(1)).is_err());
        assert!(BacktestConfig::new(dec!(1000), dec!(-0.001)).is_err());
        assert!(BacktestConfig::new(dec!(1000), dec!(0)).is_ok());
        assert!(BacktestConfig::new(dec!(1000), dec!(0.999)).is_ok());
    }

    #[test]
    fn test_deserialize_defaults_policy() {
        let json = r#"{"initial_cash":"1000000","commission_rate":"0.002"}"#;
        let config: BacktestConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.funding_policy, FundingPolicy::Reject);
        assert_eq!(config.initial_cash, dec!(1000000));
    }
}
