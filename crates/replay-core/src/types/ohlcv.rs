//! OHLCV (Open, High, Low, Close, Volume) bar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single daily bar. Prices are `f64` for indicator math; money
/// amounts derived from them are converted to `Decimal` at fill time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Bar range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Whether `price` lies inside this bar's traded range, inclusive.
    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }

    /// The timestamp as a `DateTime`. Out-of-range values map to the epoch.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }

    /// Fields in declaration order, for validation messages.
    pub(crate) fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_calculations() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000.0);

        assert!((bar.typical_price() - 103.333333).abs() < 0.001);
        assert!((bar.range() - 15.0).abs() < 0.001);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bar = Bar::new(0, 100.0, 110.0, 95.0, 105.0, 1.0);
        assert!(bar.contains(95.0));
        assert!(bar.contains(110.0));
        assert!(!bar.contains(110.01));
        assert!(!bar.contains(94.99));
    }

    #[test]
    fn test_datetime() {
        let bar = Bar::new(86_400_000, 1.0, 1.0, 1.0, 1.0, 0.0);
        assert_eq!(bar.datetime().timestamp(), 86_400);
    }
}
