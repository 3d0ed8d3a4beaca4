//! API route definitions

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::health::{health_report, HealthReport};
use video_mapper::{MapError, RequestContext, VideoMapper};
use video_mapper_broker::{ConnectivityCheck, MESSAGE_TIMESTAMP_HEADER, REQUEST_ID_HEADER};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The mapping pipeline, shared read-only
    pub mapper: Arc<VideoMapper>,
    /// Broker connectivity probe backing the health endpoints
    pub connectivity: Arc<dyn ConnectivityCheck>,
}

/// Create API routes
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/map", post(map_video))
        .route("/__health", get(health))
        .route("/__gtg", get(good_to_go))
        .with_state(state)
}

/// Machine-readable rejection body for `POST /map`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of what was rejected
    pub error: String,
}

/// Synchronous mapping endpoint.
///
/// Rejections are always explicit: malformed bodies, missing metadata
/// headers, and failed field validation all return 400 with a JSON reason.
async fn map_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let context = match request_context(&headers) {
        Ok(context) => context,
        Err(error) => {
            tracing::warn!(%error, "rejecting map request");
            return reject(error);
        }
    };

    match state.mapper.map_json(&body, &context) {
        Ok(mapped) => (
            [(header::CONTENT_TYPE, "application/json")],
            mapped.body,
        )
            .into_response(),
        Err(error) => {
            tracing::warn!(%error, "rejecting map request");
            reject(error)
        }
    }
}

/// Build the request context from the metadata headers.
fn request_context(headers: &HeaderMap) -> Result<RequestContext, MapError> {
    let publish_reference = header_value(headers, REQUEST_ID_HEADER)?;
    let last_modified = header_value(headers, MESSAGE_TIMESTAMP_HEADER)?;
    Ok(RequestContext::new(publish_reference, last_modified))
}

/// Look up a required header, treating empty or non-UTF-8 values as absent.
fn header_value(headers: &HeaderMap, name: &str) -> Result<String, MapError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| MapError::missing_header(name))
}

fn reject(error: MapError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Health report endpoint
async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let connectivity = Arc::clone(&state.connectivity);
    let report = tokio::task::spawn_blocking(move || health_report(connectivity.as_ref()))
        .await
        .unwrap_or_else(|_| HealthReport {
            name: "video-mapper".to_string(),
            ok: false,
            checks: Vec::new(),
        });
    Json(report)
}

/// Good-to-go readiness probe
async fn good_to_go(State(state): State<AppState>) -> Response {
    let connectivity = Arc::clone(&state.connectivity);
    match tokio::task::spawn_blocking(move || connectivity.check()).await {
        Ok(Ok(())) => (StatusCode::OK, "OK").into_response(),
        Ok(Err(output)) => (StatusCode::SERVICE_UNAVAILABLE, output).into_response(),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "gtg check failed".to_string()).into_response(),
    }
}
