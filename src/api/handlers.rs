//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::error;

use super::types::{ErrorResponse, HealthResponse, ReadingsQuery};
use super::{AppState, DEFAULT_LIMIT, MAX_LIMIT};
use crate::reading::TouReading;
use crate::tariff::ConsumerCategory;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

/// `GET /health` → 200 + `HealthResponse`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        collection: state.collection.clone(),
    })
}

/// Returns the most recent readings, oldest first.
///
/// `GET /readings` → 200 + last 24 readings
/// `GET /readings?category=INDUSTRIAL&limit=5` → filtered
/// `GET /readings?limit=0` → 400 + `ErrorResponse`
pub async fn get_readings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReadingsQuery>,
) -> Result<Json<Vec<TouReading>>, ApiError> {
    let category = query
        .category
        .as_deref()
        .map(str::parse::<ConsumerCategory>)
        .transpose()
        .map_err(bad_request)?;

    let limit = match query.limit.as_deref() {
        None => DEFAULT_LIMIT,
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if (1..=MAX_LIMIT).contains(&n) => n,
            _ => {
                return Err(bad_request(format!(
                    "`limit` must be an integer between 1 and {MAX_LIMIT}, got \"{raw}\""
                )));
            }
        },
    };

    match state.log.recent(&state.collection, category, limit).await {
        Ok(readings) => Ok(Json(readings)),
        Err(e) => {
            error!(error = %e, "failed to list readings");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to read stored readings".to_string(),
                }),
            ))
        }
    }
}
