//! Append-only stores for published readings.

mod firestore;
mod jsonl;
mod memory;
mod stdout;

use std::sync::Arc;

use async_trait::async_trait;

pub use firestore::FirestoreSink;
pub use jsonl::JsonlSink;
pub use memory::MemorySink;
pub use stdout::StdoutSink;

use crate::config::SinkConfig;
use crate::error::SinkError;
use crate::reading::TouReading;
use crate::tariff::ConsumerCategory;

/// Write side of a time-series store.
///
/// Appends only: no read, update or transaction is needed by the scheduler.
#[async_trait]
pub trait RateSink: Send + Sync {
    /// Appends `reading` to `collection`.
    async fn append(&self, collection: &str, reading: &TouReading) -> Result<(), SinkError>;

    /// Short name used in logs.
    fn kind(&self) -> &'static str;
}

/// Read side of stores that can list what was appended.
#[async_trait]
pub trait ReadingLog: Send + Sync {
    /// The `limit` most recent readings of `collection`, oldest first,
    /// optionally restricted to one category.
    async fn recent(
        &self,
        collection: &str,
        category: Option<ConsumerCategory>,
        limit: usize,
    ) -> Result<Vec<TouReading>, SinkError>;
}

/// Builds the sink described by `config`.
///
/// # Errors
///
/// Returns `SinkError::Config` when Firestore credentials are missing or the
/// HTTP client cannot be built.
pub fn from_config(config: &SinkConfig) -> Result<Arc<dyn RateSink>, SinkError> {
    Ok(match config {
        SinkConfig::Jsonl { dir } => Arc::new(JsonlSink::new(dir)),
        SinkConfig::Firestore(fs) => Arc::new(FirestoreSink::from_config(fs)?),
        SinkConfig::Stdout => Arc::new(StdoutSink),
    })
}

/// Keeps the most recent `limit` readings matching `category`, sorted by timestamp.
pub(crate) fn most_recent(
    mut readings: Vec<TouReading>,
    category: Option<ConsumerCategory>,
    limit: usize,
) -> Vec<TouReading> {
    readings.retain(|r| category.is_none_or(|c| r.category == c));
    readings.sort_by_key(|r| r.timestamp);
    let skip = readings.len().saturating_sub(limit);
    readings.split_off(skip)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn reading(category: ConsumerCategory, hour: u32) -> TouReading {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap();
        TouReading::new(category, f64::from(hour), at)
    }

    #[test]
    fn most_recent_sorts_filters_and_limits() {
        let readings = vec![
            reading(ConsumerCategory::Domestic, 5),
            reading(ConsumerCategory::Industrial, 4),
            reading(ConsumerCategory::Domestic, 1),
            reading(ConsumerCategory::Domestic, 3),
        ];
        let recent = most_recent(readings, Some(ConsumerCategory::Domestic), 2);
        let hours: Vec<f64> = recent.iter().map(|r| r.rate).collect();
        assert_eq!(hours, vec![3.0, 5.0]);
    }

    #[test]
    fn most_recent_with_large_limit_keeps_everything() {
        let readings = vec![
            reading(ConsumerCategory::Domestic, 2),
            reading(ConsumerCategory::Industrial, 1),
        ];
        assert_eq!(most_recent(readings, None, 100).len(), 2);
    }
}
