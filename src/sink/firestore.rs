use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use super::RateSink;
use crate::config::FirestoreConfig;
use crate::error::SinkError;
use crate::reading::TouReading;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE: &str = "(default)";

/// Appends readings as new documents through the Firestore REST API.
///
/// Each append is a `POST` to
/// `{base_url}/v1/projects/{project}/databases/{database}/documents/{collection}`,
/// letting Firestore assign the document id.
#[derive(Debug, Clone)]
pub struct FirestoreSink {
    client: Client,
    base_url: String,
    project_id: String,
    database: String,
    api_key: Option<String>,
}

impl FirestoreSink {
    /// # Errors
    ///
    /// Returns `SinkError::Config` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        database: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SinkError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            database: database.into(),
            api_key,
        })
    }

    /// Builds the sink from configuration, falling back to environment
    /// variables for the project id and API key.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Config` when no project id is configured.
    pub fn from_config(config: &FirestoreConfig) -> Result<Self, SinkError> {
        let project_id = config
            .project_id
            .clone()
            .or_else(|| env_first(&["FIREBASE_PROJECT_ID", "NEXT_PUBLIC_FIREBASE_PROJECT_ID"]))
            .ok_or_else(|| {
                SinkError::Config(
                    "Firestore project id not found in config or FIREBASE_PROJECT_ID".to_string(),
                )
            })?;
        let api_key = config
            .api_key
            .clone()
            .or_else(|| env_first(&["FIREBASE_API_KEY", "NEXT_PUBLIC_FIREBASE_API_KEY"]));

        Self::new(
            config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            project_id,
            config.database.as_deref().unwrap_or(DEFAULT_DATABASE),
            api_key,
        )
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents/{collection}",
            self.base_url, self.project_id, self.database
        )
    }
}

fn env_first(names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
}

/// Firestore typed-value document for `reading`.
pub fn document_body(reading: &TouReading) -> Value {
    json!({
        "fields": {
            "category": { "stringValue": reading.category.as_str() },
            "rate": { "doubleValue": reading.rate },
            "timestamp": { "stringValue": reading.timestamp_iso() },
        }
    })
}

#[async_trait]
impl RateSink for FirestoreSink {
    async fn append(&self, collection: &str, reading: &TouReading) -> Result<(), SinkError> {
        let url = self.documents_url(collection);
        debug!(%url, category = %reading.category, "appending Firestore document");

        let mut request = self.client.post(&url).json(&document_body(reading));
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(SinkError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn kind(&self) -> &'static str {
        "firestore"
    }
}
