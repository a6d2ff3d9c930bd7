//! HTTP gateway (Axum) over the matcher.
//!
//! This module is primarily used by the `career-match serve` command.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    categories_handler, category_stats_handler, db_stats_handler, match_jobs_handler,
    match_resumes_handler,
};
pub use state::HandlerState;

use crate::embedding::TextEmbedder;
use crate::vectordb::VectorIndex;

/// Response header carrying a short machine-readable outcome.
pub const CAREER_STATUS_HEADER: &str = "x-career-status";
pub const CAREER_STATUS_HEALTHY: &str = "healthy";
pub const CAREER_STATUS_READY: &str = "ready";
pub const CAREER_STATUS_ERROR: &str = "error";

pub fn create_router_with_state<E, I>(state: HandlerState<E, I>) -> Router
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E, I>))
        .route("/v1/match/jobs", post(match_jobs_handler::<E, I>))
        .route("/v1/match/resumes", post(match_resumes_handler::<E, I>))
        .route("/v1/categories", get(categories_handler::<E, I>))
        .route("/v1/categories/stats", get(category_stats_handler::<E, I>))
        .route("/v1/stats", get(db_stats_handler::<E, I>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub vectordb: &'static str,
    pub embedding: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        CAREER_STATUS_HEADER,
        HeaderValue::from_static(CAREER_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<E, I>(State(state): State<HandlerState<E, I>>) -> Response
where
    E: TextEmbedder + 'static,
    I: VectorIndex + 'static,
{
    let vectordb_status = match state.matcher.index().health_check().await {
        Ok(()) => CAREER_STATUS_READY,
        Err(e) => {
            tracing::warn!(error = %e, "Vector index health check failed");
            CAREER_STATUS_ERROR
        }
    };

    let embedder_mode = if state.matcher.embedder().is_stub() {
        "stub"
    } else {
        "real"
    };

    let components = ComponentStatus {
        http: CAREER_STATUS_READY,
        vectordb: vectordb_status,
        embedding: CAREER_STATUS_READY,
        embedder_mode,
    };

    let is_ready = components.vectordb == CAREER_STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(CAREER_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
