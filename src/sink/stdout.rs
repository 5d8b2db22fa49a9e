use async_trait::async_trait;
use tokio::io::{self, AsyncWriteExt};

use super::RateSink;
use crate::error::SinkError;
use crate::reading::TouReading;

/// Prints each reading as one JSON line. Used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

#[async_trait]
impl RateSink for StdoutSink {
    async fn append(&self, _collection: &str, reading: &TouReading) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(reading)?;
        line.push(b'\n');
        let mut out = io::stdout();
        out.write_all(&line).await?;
        out.flush().await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "stdout"
    }
}
