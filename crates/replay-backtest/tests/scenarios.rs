//! End-to-end runs of the engine on hand-built series.

mod common;

use common::{random_walk, series_from_closes, series_from_ohlc, Scripted};
use replay_backtest::BacktestEngine;
use replay_core::error::{ConfigError, EngineError, StrategyError};
use replay_core::traits::{DecisionContext, Strategy};
use replay_core::types::{
    BacktestConfig, ExitReason, FundingPolicy, IndicatorSet, OrderIntent, PriceSeries,
    RejectReason, Size, TimeInForce,
};
use replay_strategies::StrategyRegistry;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn engine() -> BacktestEngine {
    BacktestEngine::new(BacktestConfig::default())
}

#[test]
fn constant_series_with_crossover_has_no_trades() {
    let series = series_from_closes(&[100.37; 120]);
    let mut strategy = StrategyRegistry::new().create_default("cross").unwrap();

    let report = engine().run(&series, strategy.as_mut()).unwrap();

    assert_eq!(report.stats.total_trades, 0);
    assert_eq!(report.stats.win_rate_pct, Decimal::ZERO);
    assert_eq!(report.stats.total_return_pct, Decimal::ZERO);
    assert_eq!(report.stats.final_equity, dec!(10000000));
    assert_eq!(report.equity_curve.len(), 120);
}

#[test]
fn rising_series_with_slope_enters_once_and_exits_at_end() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let series = series_from_closes(&closes);
    let mut strategy = StrategyRegistry::new().create_default("slope").unwrap();

    let report = engine().run(&series, strategy.as_mut()).unwrap();

    assert_eq!(report.trades.len(), 1);
    let trade = &report.trades[0];
    // Decided on bar 20, the first bar with a slope, filled at bar 21's open.
    assert_eq!(trade.entry_bar, 21);
    assert_eq!(trade.entry_price, dec!(121));
    assert_eq!(trade.exit_bar, 59);
    assert_eq!(trade.exit_reason, ExitReason::EndOfData);
    assert!(report.stats.total_return_pct > Decimal::ZERO);
    assert_eq!(report.stats.win_rate_pct, dec!(100));
}

#[test]
fn three_bar_series_fills_at_second_open() {
    let series = series_from_ohlc(&[
        (10.0, 10.5, 9.5, 10.0),
        (11.0, 11.5, 10.5, 11.2),
        (12.0, 12.5, 11.5, 12.0),
    ]);
    let mut strategy = Scripted::new(vec![(0, OrderIntent::buy())]);

    let report = engine().run(&series, &mut strategy).unwrap();

    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].entry_price, dec!(11));
    assert_ne!(report.trades[0].entry_price, dec!(10));
}

#[test]
fn round_trip_pays_commission_on_both_legs() {
    let config = BacktestConfig::new(dec!(1000000), dec!(0.002)).unwrap();
    let series = series_from_ohlc(&[(100.0, 100.0, 100.0, 100.0); 4]);
    let mut strategy = Scripted::new(vec![
        (0, OrderIntent::buy().with_size(Size::Units(1000))),
        (1, OrderIntent::close()),
    ]);

    let report = BacktestEngine::new(config).run(&series, &mut strategy).unwrap();

    let trade = &report.trades[0];
    assert_eq!(trade.exit_reason, ExitReason::Signal);
    assert_eq!(trade.commission, dec!(200) + dec!(200));
    assert_eq!(report.stats.final_equity, dec!(1000000) - dec!(400));
}

#[test]
fn funding_policy_reject_vs_size_down() {
    let series = series_from_ohlc(&[(100.0, 100.0, 100.0, 100.0); 4]);
    let intent = OrderIntent::buy().with_size(Size::Units(200));

    let config = BacktestConfig::new(dec!(10000), dec!(0.002)).unwrap();
    let report = BacktestEngine::new(config.clone())
        .run(&series, &mut Scripted::new(vec![(0, intent)]))
        .unwrap();
    assert!(report.trades.is_empty());
    assert!(matches!(
        report.rejected_intents[0].reason,
        RejectReason::InsufficientFunds { .. }
    ));
    assert_eq!(report.stats.final_equity, dec!(10000));

    let config = config.with_funding_policy(FundingPolicy::SizeDown);
    let report = BacktestEngine::new(config)
        .run(&series, &mut Scripted::new(vec![(0, intent)]))
        .unwrap();
    // 10,000 / (100 * 1.002) = 99.8
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].units, 99);
    assert!(report.equity_curve.iter().all(|p| p.cash >= Decimal::ZERO));
}

#[test]
fn gtc_limit_waits_for_price_and_day_limit_expires() {
    let series = series_from_ohlc(&[
        (100.0, 101.0, 99.0, 100.0),
        (100.0, 102.0, 98.0, 101.0),
        (97.0, 99.0, 94.0, 96.0),
        (96.0, 97.0, 95.0, 96.0),
        (96.0, 97.0, 95.0, 96.0),
    ]);

    let mut gtc = Scripted::new(vec![(0, OrderIntent::limit_buy(95.0))]);
    let report = engine().run(&series, &mut gtc).unwrap();
    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].entry_bar, 2);
    assert_eq!(report.trades[0].entry_price, dec!(95));

    let day = OrderIntent::limit_buy(95.0).with_time_in_force(TimeInForce::Day);
    let report = engine().run(&series, &mut Scripted::new(vec![(0, day)])).unwrap();
    assert!(report.trades.is_empty());
    assert_eq!(report.rejected_intents.len(), 1);
    assert_eq!(report.rejected_intents[0].bar, 1);
    assert_eq!(report.rejected_intents[0].reason, RejectReason::Expired);
}

#[test]
fn zero_trade_run_reports_zero_win_rate() {
    let series = random_walk(80, 7);
    let mut strategy = Scripted::new(Vec::new());

    let report = engine().run(&series, &mut strategy).unwrap();

    assert_eq!(report.stats.total_trades, 0);
    assert_eq!(report.stats.win_rate_pct, Decimal::ZERO);
    assert_eq!(report.stats.exposure_pct, Decimal::ZERO);
}

#[test]
fn identical_runs_produce_identical_reports() {
    let series = random_walk(400, 42);
    let registry = StrategyRegistry::new();

    for name in registry.names() {
        let first = engine()
            .run(&series, registry.create_default(name).unwrap().as_mut())
            .unwrap();
        let second = engine()
            .run(&series, registry.create_default(name).unwrap().as_mut())
            .unwrap();
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap(), "{name}");
    }
}

#[test]
fn reusing_a_strategy_instance_resets_its_state() {
    let series = random_walk(300, 3);
    let mut strategy = StrategyRegistry::new().create_default("sr_flip").unwrap();

    let first = engine().run(&series, strategy.as_mut()).unwrap();
    let second = engine().run(&series, strategy.as_mut()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn invalid_config_is_rejected_before_any_bar() {
    let config = BacktestConfig {
        initial_cash: dec!(-1),
        ..BacktestConfig::default()
    };
    let series = random_walk(10, 1);

    let err = BacktestEngine::new(config)
        .run(&series, &mut Scripted::new(Vec::new()))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Config(ConfigError::NonPositiveCash { .. })
    ));
}

struct FailsAt(usize);

impl Strategy for FailsAt {
    fn name(&self) -> &str {
        "fails"
    }

    fn setup(&mut self, _series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        Ok(IndicatorSet::new())
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        if ctx.bar_index == self.0 {
            return Err(StrategyError::MissingIndicator("sma".into()));
        }
        Ok(Vec::new())
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        0
    }
}

#[test]
fn strategy_error_carries_the_bar_index() {
    let series = random_walk(20, 5);
    let err = engine().run(&series, &mut FailsAt(7)).unwrap_err();

    assert!(matches!(err, EngineError::Strategy { bar: Some(7), .. }));
    assert!(err.to_string().contains("bar 7"));
}

/// Buys whenever it is flat with nothing pending.
struct AlwaysIn;

impl Strategy for AlwaysIn {
    fn name(&self) -> &str {
        "always_in"
    }

    fn setup(&mut self, _series: &PriceSeries) -> Result<IndicatorSet, StrategyError> {
        Ok(IndicatorSet::new())
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> Result<Vec<OrderIntent>, StrategyError> {
        if ctx.portfolio.position.is_none() && ctx.portfolio.pending.is_none() {
            return Ok(vec![OrderIntent::buy()]);
        }
        Ok(Vec::new())
    }

    fn reset(&mut self) {}

    fn warmup_period(&self) -> usize {
        0
    }
}

#[test]
fn final_bar_of_a_cut_run_matches_the_full_run() {
    let series = series_from_ohlc(&[(100.0, 100.0, 100.0, 100.0); 5]);
    let engine = engine().with_decision_log(true);

    let full = engine.run(&series, &mut AlwaysIn).unwrap();
    let cut = engine.run(&series.truncated(1).unwrap(), &mut AlwaysIn).unwrap();

    let through_1 = |d: &&replay_backtest::BarDecision| d.bar <= 1;
    let full_decisions: Vec<_> = full.decisions.iter().filter(through_1).collect();
    let cut_decisions: Vec<_> = cut.decisions.iter().filter(through_1).collect();
    assert_eq!(full_decisions, cut_decisions);
    assert_eq!(full.equity_curve[..=1], cut.equity_curve[..=1]);

    // The entry fills on the cut run's last bar and is closed at its close.
    assert!(cut.rejected_intents.is_empty());
    assert_eq!(cut.trades.len(), 1);
    assert_eq!((cut.trades[0].entry_bar, cut.trades[0].exit_bar), (1, 1));
    assert_eq!(cut.trades[0].exit_reason, ExitReason::EndOfData);
}
