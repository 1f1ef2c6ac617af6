//! Property tests for engine invariants.
//!
//! Over random walks and every bundled strategy:
//! 1. Ledger length: one equity point per bar
//! 2. Conservation: final equity equals initial cash plus realised P&L
//! 3. Solvency: cash never goes negative
//! 4. No look-ahead: decisions before bar k survive truncation after k

mod common;

use common::series_from_returns;
use proptest::prelude::*;
use replay_backtest::BacktestEngine;
use replay_core::types::{BacktestConfig, FundingPolicy};
use replay_strategies::StrategyRegistry;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_returns() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.04..0.04_f64, 30..220)
}

fn arb_strategy_name() -> impl Strategy<Value = String> {
    let names: Vec<String> = StrategyRegistry::new()
        .names()
        .into_iter()
        .map(String::from)
        .collect();
    prop::sample::select(names)
}

fn arb_policy() -> impl Strategy<Value = FundingPolicy> {
    prop_oneof![Just(FundingPolicy::Reject), Just(FundingPolicy::SizeDown)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn ledger_and_conservation(
        returns in arb_returns(),
        name in arb_strategy_name(),
        policy in arb_policy(),
    ) {
        let series = series_from_returns(&returns);
        let config = BacktestConfig::new(dec!(1000000), dec!(0.002))
            .unwrap()
            .with_funding_policy(policy);
        let mut strategy = StrategyRegistry::new().create_default(&name).unwrap();

        let report = BacktestEngine::new(config).run(&series, strategy.as_mut()).unwrap();

        prop_assert_eq!(report.equity_curve.len(), series.len());
        prop_assert_eq!(report.stats.bars_processed, series.len());

        let realised: Decimal = report.trades.iter().map(|t| t.pnl).sum();
        let drift = (report.stats.final_equity - (dec!(1000000) + realised)).abs();
        prop_assert!(drift < dec!(0.000001), "drift {}", drift);

        prop_assert!(report.equity_curve.iter().all(|p| p.cash >= Decimal::ZERO));
        for trade in &report.trades {
            prop_assert!(trade.entry_bar <= trade.exit_bar);
            prop_assert!(trade.exit_bar < series.len());
        }
        let winners = report.trades.iter().filter(|t| t.is_winner()).count();
        prop_assert_eq!(report.stats.winning_trades, winners);
    }

    #[test]
    fn truncation_keeps_earlier_decisions(
        returns in arb_returns(),
        name in arb_strategy_name(),
        cut in 0.1..0.9_f64,
    ) {
        let series = series_from_returns(&returns);
        let k = ((series.len() as f64) * cut) as usize;
        let engine = BacktestEngine::new(BacktestConfig::default()).with_decision_log(true);
        let registry = StrategyRegistry::new();

        let full = engine
            .run(&series, registry.create_default(&name).unwrap().as_mut())
            .unwrap();
        let cut_series = series.truncated(k).unwrap();
        let truncated = engine
            .run(&cut_series, registry.create_default(&name).unwrap().as_mut())
            .unwrap();

        let through_k = |bar: usize| bar <= k;
        let full_decisions: Vec<_> = full.decisions.iter().filter(|d| through_k(d.bar)).collect();
        let cut_decisions: Vec<_> = truncated.decisions.iter().filter(|d| through_k(d.bar)).collect();
        prop_assert_eq!(full_decisions, cut_decisions);
        prop_assert_eq!(&full.equity_curve[..=k], &truncated.equity_curve[..=k]);
    }
}
