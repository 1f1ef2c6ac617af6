//! Price data sources for the backtester.

mod csv_source;

pub use csv_source::CsvDataSource;

use chrono::{DateTime, Utc};
use replay_core::error::DataError;
use replay_core::traits::DataSource;
use replay_core::types::PriceSeries;

/// Load a validated series for `symbol` from a CSV file or a directory of
/// `<symbol>.csv` files. Missing bounds mean the whole file.
pub async fn load_series(
    path: &str,
    symbol: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<PriceSeries, DataError> {
    let source = CsvDataSource::new(path)?;
    source
        .load_series(
            symbol,
            start.unwrap_or(DateTime::<Utc>::MIN_UTC),
            end.unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
        .await
}
