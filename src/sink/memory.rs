use async_trait::async_trait;
use parking_lot::Mutex;

use super::{RateSink, ReadingLog, most_recent};
use crate::error::SinkError;
use crate::reading::TouReading;
use crate::tariff::ConsumerCategory;

/// Keeps appended readings in memory, tagged with their collection.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(String, TouReading)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every reading appended to `collection`, in append order.
    pub fn readings(&self, collection: &str) -> Vec<TouReading> {
        self.entries
            .lock()
            .iter()
            .filter(|(c, _)| c == collection)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl RateSink for MemorySink {
    async fn append(&self, collection: &str, reading: &TouReading) -> Result<(), SinkError> {
        self.entries
            .lock()
            .push((collection.to_string(), reading.clone()));
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl ReadingLog for MemorySink {
    async fn recent(
        &self,
        collection: &str,
        category: Option<ConsumerCategory>,
        limit: usize,
    ) -> Result<Vec<TouReading>, SinkError> {
        Ok(most_recent(self.readings(collection), category, limit))
    }
}
