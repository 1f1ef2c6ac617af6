//! Backtest report generation.

use chrono::DateTime;
use replay_core::types::{BacktestConfig, EquityPoint, RejectedIntent, Trade};
use serde::{Deserialize, Serialize};

use crate::engine::BarDecision;
use crate::statistics::BacktestStats;

/// Everything one run produced: the equity ledger, the trade log and the
/// statistics reduced from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub strategy: String,
    pub symbol: String,
    /// Configuration used
    pub config: BacktestConfig,
    pub stats: BacktestStats,
    /// One point per bar, at the close, before the final forced exit
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub rejected_intents: Vec<RejectedIntent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<BarDecision>,
}

fn date(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

impl BacktestReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let stats = &self.stats;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Strategy:            {}\n", self.strategy));
        s.push_str(&format!("  Symbol:              {}\n", self.symbol));
        if let (Some(first), Some(last)) = (self.equity_curve.first(), self.equity_curve.last()) {
            s.push_str(&format!(
                "  Period:              {} .. {}\n",
                date(first.timestamp),
                date(last.timestamp)
            ));
        }
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Initial Cash:        {:.2}\n", stats.initial_cash));
        s.push_str(&format!("  Final Equity:        {:.2}\n", stats.final_equity));
        s.push_str(&format!("  Total Return:        {:.2}%\n", stats.total_return_pct));
        s.push_str(&format!("  Annualized Return:   {:.2}%\n", stats.annualized_return_pct));
        s.push_str(&format!("  Buy & Hold Return:   {:.2}%\n", stats.buy_and_hold_return_pct));
        s.push_str(&format!("  Max Drawdown:        {:.2}%\n", stats.max_drawdown_pct));
        s.push('\n');

        s.push_str("RISK METRICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Sharpe Ratio:        {:.2}\n", stats.sharpe_ratio));
        s.push_str(&format!("  Sortino Ratio:       {:.2}\n", stats.sortino_ratio));
        s.push_str(&format!("  Profit Factor:       {:.2}\n", stats.profit_factor));
        s.push_str(&format!("  Exposure:            {:.2}%\n", stats.exposure_pct));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total Trades:        {}\n", stats.total_trades));
        s.push_str(&format!("  Winning Trades:      {}\n", stats.winning_trades));
        s.push_str(&format!("  Losing Trades:       {}\n", stats.losing_trades));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", stats.win_rate_pct));
        s.push_str(&format!("  Avg Win:             {:.2}\n", stats.avg_win));
        s.push_str(&format!("  Avg Loss:            {:.2}\n", stats.avg_loss));
        s.push_str(&format!("  Best Trade:          {:.2}%\n", stats.best_trade_pct));
        s.push_str(&format!("  Worst Trade:         {:.2}%\n", stats.worst_trade_pct));
        s.push('\n');

        s.push_str("EXECUTION\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Bars Processed:      {}\n", stats.bars_processed));
        s.push_str(&format!("  Total Commission:    {:.2}\n", stats.total_commission));
        s.push_str(&format!("  Rejected Intents:    {}\n", stats.rejected_intents));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Equity ledger as CSV, one row per bar.
    pub fn equity_to_csv(&self) -> Result<String, csv::Error> {
        to_csv(
            &["bar", "timestamp", "cash", "position_value", "equity"],
            &self.equity_curve,
        )
    }

    /// Trade log as CSV, one row per round trip.
    pub fn trades_to_csv(&self) -> Result<String, csv::Error> {
        to_csv(
            &[
                "entry_bar",
                "entry_time",
                "entry_price",
                "exit_bar",
                "exit_time",
                "exit_price",
                "units",
                "commission",
                "pnl",
                "return_pct",
                "exit_reason",
            ],
            &self.trades,
        )
    }
}

/// Header is written explicitly so empty logs still produce one line.
fn to_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
