//! CSV data source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use replay_core::error::DataError;
use replay_core::traits::DataSource;
use replay_core::types::Bar;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "DATE", alias = "timestamp", alias = "Timestamp", alias = "Datetime")]
    date: String,
    #[serde(alias = "Open", alias = "OPEN")]
    open: f64,
    #[serde(alias = "High", alias = "HIGH")]
    high: f64,
    #[serde(alias = "Low", alias = "LOW")]
    low: f64,
    #[serde(alias = "Close", alias = "CLOSE", default)]
    close: Option<f64>,
    #[serde(rename = "Adj Close", alias = "adj_close", alias = "adj close", default)]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", alias = "VOLUME", default)]
    volume: Option<f64>,
}

/// Reads daily bars from CSV files.
///
/// `path` is either a single file, used for every symbol, or a directory
/// holding one `<symbol>.csv` per symbol. Numeric symbols also match
/// `<symbol>.KS.csv`, the Korea Exchange suffix.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::Internal(format!(
                "data path does not exist: {}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// File holding `symbol`'s bars.
    pub fn resolve(&self, symbol: &str) -> Result<PathBuf, DataError> {
        if self.path.is_file() {
            return Ok(self.path.clone());
        }

        let mut candidates = vec![self.path.join(format!("{symbol}.csv"))];
        if !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_digit()) {
            candidates.push(self.path.join(format!("{symbol}.KS.csv")));
        }
        candidates
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }

    /// Load all bars from `path`, sorted by timestamp.
    pub fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = Vec::new();
        let mut missing_volume = 0usize;

        for (line, result) in reader.deserialize().enumerate() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let close = record.close.or(record.adj_close).ok_or_else(|| {
                DataError::ParseError(format!("row {}: no Close or Adj Close column", line + 1))
            })?;
            let volume = record.volume.unwrap_or_else(|| {
                missing_volume += 1;
                0.0
            });

            bars.push(Bar::new(
                parse_timestamp(&record.date)?,
                record.open,
                record.high,
                record.low,
                close,
                volume,
            ));
        }

        if missing_volume > 0 {
            warn!(
                path = %path.display(),
                rows = missing_volume,
                "csv rows without volume, using 0"
            );
        }

        bars.sort_by_key(|b| b.timestamp);
        debug!(path = %path.display(), bars = bars.len(), "csv loaded");

        Ok(bars)
    }
}

/// Parse the date formats found in exported price files, or Unix
/// seconds/milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y", "%d-%m-%Y", "%Y.%m.%d"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    if let Ok(ts) = date_str.parse::<i64>() {
        // More than 10 digits means milliseconds.
        return Ok(if ts.abs() > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn get_historical_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, DataError> {
        let path = self.resolve(symbol)?;
        let (from, to) = (start.timestamp_millis(), end.timestamp_millis());

        let bars: Vec<Bar> = Self::read_bars(&path)?
            .into_iter()
            .filter(|b| b.timestamp >= from && b.timestamp <= to)
            .collect();

        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
