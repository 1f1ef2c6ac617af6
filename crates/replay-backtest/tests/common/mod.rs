//! Shared fixtures for the engine integration tests.

#![allow(dead_code)]

use replay_core::error::StrategyError;
use replay_core::traits::{DecisionContext, Strategy};
use replay_core::types::{Bar, IndicatorSet, OrderIntent, PriceSeries};

const DAY_MS: i64 = 86_400_000;

/// Bars whose open is the previous close, with a small range around the body.
pub fn series_from_returns(returns: &[f64]) -> PriceSeries {
    let mut prev = 100.0;
    let bars = returns
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let close = prev * (1.0 + r);
            let open = prev;
            prev = close;
            Bar::new(
                i as i64 * DAY_MS,
                open,
                open.max(close) * 1.005,
                open.min(close) * 0.995,
                close,
                1000.0 + i as f64 * 10.0,
            )
        })
        .collect();
    PriceSeries::new("WALK", bars).unwrap()
}

/// Deterministic pseudo-random walk of `n` bars.
pub fn random_walk(n: usize, seed: u64) -> PriceSeries {
    let mut state = seed;
    let returns: Vec<f64> = (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) % 600) as f64 / 10_000.0 - 0.03
        })
        .collect();
    series_from_returns(&returns)
}

/// Open equals close, range of one percent either side.
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(i as i64 * DAY_MS, c, c * 1.01, c * 0.99, c, 1000.0))
        .collect();
    PriceSeries::new("TEST", bars).unwrap()
}

/// Explicit OHLC tuples.
pub fn series_from_ohlc(bars: &[(f64, f64, f64, f64)]) -> PriceSeries {
    let bars = bars
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Bar::new(i as i64 * DAY_MS, o, h, l, c, 1000.0))
        .collect();
    PriceSeries::new("TEST", bars).unwrap()
}

/// Emits fixed intents on fixed bars regardless of the portfolio.
pub struct Scripted {
    pub script: Vec<(usize, OrderIntent)>,
}

impl Scripted {
    pub fn new(script: Vec<(usize, OrderIntent)>) -> Self {
        Self { script }
    }
}

impl Strategy for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn setup(&mut self, _series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        Ok(IndicatorSet::new())
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        Ok(self
            .script
            .iter()
            .filter(|(bar, _)| *bar == ctx.bar_index)
            .map(|(_, intent)| *intent)
            .collect())
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        0
    }
}
