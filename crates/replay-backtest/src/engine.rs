//! Backtesting engine.

use replay_broker::SimBroker;
use replay_core::error::{DataError, EngineError, EngineResult};
use replay_core::traits::{DecisionContext, Strategy};
use replay_core::types::{BacktestConfig, OrderIntent, PriceSeries};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::report::BacktestReport;
use crate::statistics::BacktestStats;

/// Intents a strategy emitted on one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDecision {
    pub bar: usize,
    pub intents: Vec<OrderIntent>,
}

/// Replays a price series through a strategy and a simulated broker.
///
/// Each bar is processed in a fixed order:
/// 1. settle orders queued on earlier bars against this bar
/// 2. record the equity point at the close
/// 3. ask the strategy for intents, seeing bars `0..=i` only
/// 4. queue those intents for a later bar
///
/// After the last bar any open position is force-closed at its close.
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: BacktestConfig,
    record_decisions: bool,
}

impl BacktestEngine {
    /// Create a new backtest engine.
    pub fn new(config: BacktestConfig) -> Self {
        Self {
            config,
            record_decisions: false,
        }
    }

    /// Keep every non-empty decision in the report.
    pub fn with_decision_log(mut self, enabled: bool) -> Self {
        self.record_decisions = enabled;
        self
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run a backtest. Runs are deterministic: the same inputs give the same
    /// report.
    pub fn run(
        &self,
        series: &PriceSeries,
        strategy: &mut dyn Strategy,
    ) -> EngineResult<BacktestReport> {
        self.config.validate()?;
        if series.is_empty() {
            return Err(DataError::EmptySeries.into());
        }

        info!(
            strategy = strategy.name(),
            symbol = series.symbol(),
            bars = series.len(),
            "Starting backtest"
        );

        strategy.reset();
        let indicators = strategy.setup(series).map_err(EngineError::strategy_setup)?;
        indicators
            .validate_lengths(series.len())
            .map_err(EngineError::strategy_setup)?;
        debug!(indicators = indicators.len(), "indicators registered");

        let mut broker = SimBroker::new(self.config.clone());
        let mut ledger = Vec::with_capacity(series.len());
        let mut decisions = Vec::new();
        let last = series.len() - 1;

        for (i, bar) in series.full().iter().enumerate() {
            if let Some(fill) = broker.settle(i, bar) {
                debug!(bar = i, side = %fill.side, price = %fill.price, units = fill.units, "fill");
            }

            ledger.push(broker.mark(i, bar));

            let portfolio = broker.snapshot(bar.close);
            let ctx = DecisionContext {
                bar_index: i,
                prices: series.up_to(i)?,
                indicators: indicators.view(i),
                portfolio: &portfolio,
            };
            let intents = strategy
                .decide(&ctx)
                .map_err(|e| EngineError::strategy_at(i, e))?;

            if self.record_decisions && !intents.is_empty() {
                decisions.push(BarDecision {
                    bar: i,
                    intents: intents.clone(),
                });
            }
            for intent in intents {
                broker.submit(intent, i, bar.timestamp);
            }
        }

        if let Some(trade) = broker.finish(last, series.last()) {
            debug!(pnl = %trade.pnl, "open position closed at end of data");
        }

        let final_equity = broker.cash();
        let (trades, rejected_intents) = broker.into_logs();
        let stats = BacktestStats::compute(
            self.config.initial_cash,
            final_equity,
            series,
            &ledger,
            &trades,
            rejected_intents.len(),
        );

        info!(
            strategy = strategy.name(),
            trades = stats.total_trades,
            return_pct = %stats.total_return_pct.round_dp(2),
            "Backtest complete"
        );

        Ok(BacktestReport {
            strategy: strategy.name().to_string(),
            symbol: series.symbol().to_string(),
            config: self.config.clone(),
            stats,
            equity_curve: ledger,
            trades,
            rejected_intents,
            decisions,
        })
    }
}
