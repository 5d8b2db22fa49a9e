//! API response and query types.

use serde::{Deserialize, Serialize};

/// Query parameters for `GET /readings`.
///
/// Both are kept as raw values so the handler can answer bad input with a
/// JSON error body instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ReadingsQuery {
    /// Category name, case-insensitive.
    pub category: Option<String>,
    /// Number of readings, 1 to [`super::MAX_LIMIT`].
    pub limit: Option<String>,
}

/// `GET /health` body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub collection: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "bad request".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"], "bad request");
    }

    #[test]
    fn health_response_shape() {
        let resp = HealthResponse {
            status: "ok".into(),
            collection: "tou-rates".into(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"status":"ok","collection":"tou-rates"}"#);
    }
}
