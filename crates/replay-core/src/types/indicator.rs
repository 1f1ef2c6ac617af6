//! Precomputed indicator series and the bounded view strategies read from.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::StrategyError;

/// Named indicator series registered by a strategy during setup.
///
/// Every series is full length and NaN-padded during warm-up. A `BTreeMap`
/// keeps iteration order stable across runs.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    series: BTreeMap<String, Arc<[f64]>>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a series, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values.into());
    }

    /// Builder-style `insert`.
    pub fn with(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|s| &s[..])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Check that every series has exactly `expected` values.
    pub fn validate_lengths(&self, expected: usize) -> Result<(), StrategyError> {
        for (name, values) in &self.series {
            if values.len() != expected {
                return Err(StrategyError::IndicatorLength {
                    name: name.clone(),
                    expected,
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }

    /// View bounded at bar `index`.
    pub fn view(&self, index: usize) -> IndicatorView<'_> {
        IndicatorView { set: self, index }
    }
}

/// All registered indicators, bounded at the current bar.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorView<'a> {
    set: &'a IndicatorSet,
    index: usize,
}

impl<'a> IndicatorView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// The series `name`, cut off after the current bar.
    pub fn line(&self, name: &str) -> Result<IndicatorLine<'a>, StrategyError> {
        let values = self
            .set
            .series
            .get(name)
            .ok_or_else(|| StrategyError::MissingIndicator(name.to_string()))?;
        let end = (self.index + 1).min(values.len());
        Ok(IndicatorLine {
            values: &values[..end],
        })
    }

    /// Current value of `name`, `None` while it is NaN.
    pub fn value(&self, name: &str) -> Result<Option<f64>, StrategyError> {
        Ok(self.line(name)?.current())
    }
}

/// One indicator series ending at the current bar.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorLine<'a> {
    values: &'a [f64],
}

impl<'a> IndicatorLine<'a> {
    /// Wrap a slice that already ends at the current bar.
    pub fn from_slice(values: &'a [f64]) -> Self {
        Self { values }
    }

    /// Current value, `None` if NaN.
    pub fn current(&self) -> Option<f64> {
        self.ago(0)
    }

    /// Value `k` bars back, `None` before the start or when NaN.
    pub fn ago(&self, k: usize) -> Option<f64> {
        let len = self.values.len();
        if k >= len {
            return None;
        }
        let v = self.values[len - 1 - k];
        (!v.is_nan()).then_some(v)
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `self` was below `other` on the previous bar and is above it now.
    pub fn crossed_above(&self, other: &IndicatorLine<'_>) -> bool {
        match (self.ago(1), self.ago(0), other.ago(1), other.ago(0)) {
            (Some(a0), Some(a1), Some(b0), Some(b1)) => a0 < b0 && a1 > b1,
            _ => false,
        }
    }

    /// `self` was above `other` on the previous bar and is below it now.
    pub fn crossed_below(&self, other: &IndicatorLine<'_>) -> bool {
        other.crossed_above(self)
    }

    /// Crossed upward through a constant level.
    pub fn crossed_above_level(&self, level: f64) -> bool {
        match (self.ago(1), self.ago(0)) {
            (Some(prev), Some(cur)) => prev < level && cur > level,
            _ => false,
        }
    }

    /// Crossed downward through a constant level.
    pub fn crossed_below_level(&self, level: f64) -> bool {
        match (self.ago(1), self.ago(0)) {
            (Some(prev), Some(cur)) => prev > level && cur < level,
            _ => false,
        }
    }
}
