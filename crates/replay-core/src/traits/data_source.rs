//! Historical price data provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DataError;
use crate::types::{Bar, PriceSeries};

/// Trait for historical data sources.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch daily bars for `symbol` within `[start, end]`, oldest first.
    ///
    /// An empty result is `DataError::NoDataAvailable`, never an empty vec.
    async fn get_historical_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, DataError>;

    /// Fetch bars and validate them into a `PriceSeries`.
    async fn load_series(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, DataError> {
        let bars = self.get_historical_bars(symbol, start, end).await?;
        PriceSeries::new(symbol, bars)
    }

    /// Get the data source name.
    fn name(&self) -> &str;
}
