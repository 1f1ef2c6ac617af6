//! Validated price history and its look-ahead-safe view.

use std::sync::Arc;

use crate::error::DataError;

use super::Bar;

/// An immutable, validated sequence of bars for one symbol.
///
/// Bars are shared through an `Arc<[Bar]>`, so cloning the series is cheap
/// and nothing downstream can mutate the history.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Arc<[Bar]>,
}

impl PriceSeries {
    /// Validate `bars` and build a series.
    ///
    /// Rejects an empty input, non-finite or negative values, bars whose
    /// high/low do not bracket open and close, and timestamps that are not
    /// strictly increasing.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        if bars.is_empty() {
            return Err(DataError::EmptySeries);
        }

        let mut prev_ts: Option<i64> = None;
        for (index, bar) in bars.iter().enumerate() {
            for (field, value) in bar.fields() {
                if !value.is_finite() {
                    return Err(DataError::NonFinite { index, field });
                }
                if value < 0.0 {
                    return Err(DataError::NegativeValue { index, field });
                }
            }
            if bar.low > bar.open.min(bar.close) || bar.high < bar.open.max(bar.close) {
                return Err(DataError::InconsistentRange { index });
            }
            if let Some(prev) = prev_ts {
                if bar.timestamp <= prev {
                    return Err(DataError::NonMonotonicTime {
                        index,
                        prev,
                        current: bar.timestamp,
                    });
                }
            }
            prev_ts = Some(bar.timestamp);
        }

        Ok(Self {
            symbol: symbol.into(),
            bars: bars.into(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Every bar. Only for indicator precomputation before the replay loop.
    pub fn full(&self) -> &[Bar] {
        &self.bars
    }

    /// A view of bars `0..=index`. O(1), no copy.
    pub fn up_to(&self, index: usize) -> Result<SeriesView<'_>, DataError> {
        if index >= self.bars.len() {
            return Err(DataError::IndexOutOfRange {
                index,
                len: self.bars.len(),
            });
        }
        Ok(SeriesView {
            bars: &self.bars[..=index],
        })
    }

    /// A new series holding only bars `0..=index`.
    pub fn truncated(&self, index: usize) -> Result<Self, DataError> {
        let view = self.up_to(index)?;
        Ok(Self {
            symbol: self.symbol.clone(),
            bars: view.bars.into(),
        })
    }

    pub fn first(&self) -> &Bar {
        &self.bars[0]
    }

    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

/// Read-only window over bars `0..=current`.
///
/// The underlying slice ends at the current bar, so no method can reach a
/// future bar.
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    bars: &'a [Bar],
}

impl<'a> SeriesView<'a> {
    /// Index of the current bar.
    pub fn index(&self) -> usize {
        self.bars.len() - 1
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn current(&self) -> &'a Bar {
        &self.bars[self.bars.len() - 1]
    }

    /// Bar at absolute index `i`, `None` past the current bar.
    pub fn get(&self, i: usize) -> Option<&'a Bar> {
        self.bars.get(i)
    }

    /// Bar `k` steps before the current one (`ago(0)` is the current bar).
    pub fn ago(&self, k: usize) -> Option<&'a Bar> {
        self.index().checked_sub(k).map(|i| &self.bars[i])
    }

    /// The last `n` bars up to and including the current one.
    pub fn window(&self, n: usize) -> &'a [Bar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    pub fn bars(&self) -> &'a [Bar] {
        self.bars
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Bar> {
        self.bars.iter()
    }

    /// Closes up to and including the current bar.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}
