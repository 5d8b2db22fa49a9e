use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use super::{RateSink, ReadingLog, most_recent};
use crate::error::SinkError;
use crate::reading::TouReading;
use crate::tariff::ConsumerCategory;

/// Append-only JSON-lines store: one file per collection under `dir`.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    dir: PathBuf,
}

impl JsonlSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File backing `collection`.
    pub fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.jsonl"))
    }
}

#[async_trait]
impl RateSink for JsonlSink {
    async fn append(&self, collection: &str, reading: &TouReading) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(reading)?;
        line.push(b'\n');

        fs::create_dir_all(&self.dir).await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(collection))
            .await?;
        // One write call per line keeps concurrent appends from interleaving.
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "jsonl"
    }
}

#[async_trait]
impl ReadingLog for JsonlSink {
    async fn recent(
        &self,
        collection: &str,
        category: Option<ConsumerCategory>,
        limit: usize,
    ) -> Result<Vec<TouReading>, SinkError> {
        let path = self.path_for(collection);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut readings = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<TouReading>(line) {
                Ok(reading) => readings.push(reading),
                Err(e) => warn!(path = %path.display(), line = index + 1, error = %e, "skipping unparsable reading"),
            }
        }
        Ok(most_recent(readings, category, limit))
    }
}
