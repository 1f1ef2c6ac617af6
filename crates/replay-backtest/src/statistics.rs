//! Backtest statistics.

use replay_core::money::{to_decimal, to_f64};
use replay_core::types::{EquityPoint, PriceSeries, Trade};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const TRADING_DAYS: f64 = 252.0;

/// Summary metrics reduced from the equity ledger and trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    /// Initial capital
    pub initial_cash: Decimal,
    /// Cash after the forced close
    pub final_equity: Decimal,
    /// Total return percentage
    pub total_return_pct: Decimal,
    /// Annualized return percentage, assuming daily bars
    pub annualized_return_pct: Decimal,
    /// Maximum peak-to-trough drawdown of the ledger, in percent
    pub max_drawdown_pct: Decimal,
    /// Sharpe ratio (assuming risk-free rate of 0)
    pub sharpe_ratio: f64,
    /// Sortino ratio
    pub sortino_ratio: f64,
    /// Total number of round trips
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Win rate percentage, 0 without trades
    pub win_rate_pct: Decimal,
    /// Average profit per winning trade
    pub avg_win: Decimal,
    /// Average loss per losing trade, as a positive amount
    pub avg_loss: Decimal,
    /// Gross profit / gross loss, 0 without losses
    pub profit_factor: Decimal,
    pub best_trade_pct: Decimal,
    pub worst_trade_pct: Decimal,
    pub avg_trade_pct: Decimal,
    /// Share of bars that closed with a position held
    pub exposure_pct: Decimal,
    pub total_commission: Decimal,
    /// Return of buying at the first close and holding to the last
    pub buy_and_hold_return_pct: Decimal,
    pub rejected_intents: usize,
    pub bars_processed: usize,
}

impl BacktestStats {
    /// Reduce one run's outputs.
    pub fn compute(
        initial_cash: Decimal,
        final_equity: Decimal,
        series: &PriceSeries,
        ledger: &[EquityPoint],
        trades: &[Trade],
        rejected_intents: usize,
    ) -> Self {
        let total_return_pct = percent_change(initial_cash, final_equity);

        let mut stats = Self {
            initial_cash,
            final_equity,
            total_return_pct,
            annualized_return_pct: annualize(total_return_pct, ledger.len()),
            max_drawdown_pct: max_drawdown_pct(ledger),
            sharpe_ratio: 0.0,
            sortino_ratio: 0.0,
            total_trades: trades.len(),
            winning_trades: 0,
            losing_trades: 0,
            win_rate_pct: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            profit_factor: Decimal::ZERO,
            best_trade_pct: Decimal::ZERO,
            worst_trade_pct: Decimal::ZERO,
            avg_trade_pct: Decimal::ZERO,
            exposure_pct: Decimal::ZERO,
            total_commission: trades.iter().map(|t| t.commission).sum(),
            buy_and_hold_return_pct: percent_change(
                to_decimal(series.first().close),
                to_decimal(series.last().close),
            ),
            rejected_intents,
            bars_processed: ledger.len(),
        };

        stats.trade_statistics(trades);
        stats.risk_ratios(ledger);

        if !ledger.is_empty() {
            let held = ledger
                .iter()
                .filter(|p| p.position_value > Decimal::ZERO)
                .count();
            stats.exposure_pct = Decimal::from(held * 100) / Decimal::from(ledger.len());
        }

        stats
    }

    fn trade_statistics(&mut self, trades: &[Trade]) {
        let mut total_profit = Decimal::ZERO;
        let mut total_loss = Decimal::ZERO;

        for trade in trades {
            if trade.pnl > Decimal::ZERO {
                self.winning_trades += 1;
                total_profit += trade.pnl;
            } else if trade.pnl < Decimal::ZERO {
                self.losing_trades += 1;
                total_loss += trade.pnl.abs();
            }
        }

        if self.total_trades > 0 {
            self.win_rate_pct =
                Decimal::from(self.winning_trades * 100) / Decimal::from(self.total_trades);

            let returns = trades.iter().map(|t| t.return_pct);
            self.best_trade_pct = returns.clone().max().unwrap_or_default();
            self.worst_trade_pct = returns.clone().min().unwrap_or_default();
            self.avg_trade_pct = returns.sum::<Decimal>() / Decimal::from(self.total_trades);
        }

        if self.winning_trades > 0 {
            self.avg_win = total_profit / Decimal::from(self.winning_trades);
        }
        if self.losing_trades > 0 {
            self.avg_loss = total_loss / Decimal::from(self.losing_trades);
        }
        if total_loss > Decimal::ZERO {
            self.profit_factor = total_profit / total_loss;
        }
    }

    fn risk_ratios(&mut self, ledger: &[EquityPoint]) {
        let daily_returns: Vec<f64> = ledger
            .windows(2)
            .filter(|w| w[0].equity > Decimal::ZERO)
            .map(|w| to_f64((w[1].equity - w[0].equity) / w[0].equity))
            .collect();
        if daily_returns.is_empty() {
            return;
        }

        let n = daily_returns.len() as f64;
        let mean = daily_returns.iter().sum::<f64>() / n;
        let variance = daily_returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        if std_dev > 0.0 {
            self.sharpe_ratio = mean * TRADING_DAYS.sqrt() / std_dev;
        }

        // Downside deviation over losing days only.
        let negative: Vec<f64> = daily_returns.iter().copied().filter(|&r| r < 0.0).collect();
        if !negative.is_empty() {
            let downside_dev =
                (negative.iter().map(|r| r.powi(2)).sum::<f64>() / negative.len() as f64).sqrt();
            if downside_dev > 0.0 {
                self.sortino_ratio = mean * TRADING_DAYS.sqrt() / downside_dev;
            }
        }
    }
}

/// `(to / from - 1) * 100`, 0 when `from` is not positive.
fn percent_change(from: Decimal, to: Decimal) -> Decimal {
    if from <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (to / from - Decimal::ONE) * dec!(100)
}

fn annualize(total_return_pct: Decimal, bars: usize) -> Decimal {
    if bars == 0 {
        return Decimal::ZERO;
    }
    let growth = 1.0 + to_f64(total_return_pct) / 100.0;
    if growth <= 0.0 {
        return dec!(-100);
    }
    let annualized = (growth.powf(TRADING_DAYS / bars as f64) - 1.0) * 100.0;
    Decimal::try_from(annualized).unwrap_or_default()
}

fn max_drawdown_pct(ledger: &[EquityPoint]) -> Decimal {
    let mut peak = Decimal::ZERO;
    let mut worst = Decimal::ZERO;
    for point in ledger {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > Decimal::ZERO {
            let drawdown = (peak - point.equity) / peak * dec!(100);
            if drawdown > worst {
                worst = drawdown;
            }
        }
    }
    worst
}
