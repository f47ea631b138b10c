//! System endpoints: health checks and the client-facing constants.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::{CATEGORIES, PAYMENT_MODES};
use crate::error::ApiError;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service liveness.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service status, version, and current timestamp. Does not touch the database.",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Database health response.
#[derive(Debug, Serialize, ToSchema)]
struct DbHealthResponse {
    status: String,
    database: String,
}

/// `GET /health/db` — Database connectivity.
///
/// # Errors
///
/// Returns a 500 when the database round trip fails.
#[utoipa::path(
    get,
    path = "/health/db",
    tag = "System",
    summary = "Database health check",
    description = "Round-trips a trivial query to verify the database connection.",
    responses(
        (status = 200, description = "Database reachable", body = DbHealthResponse),
        (status = 500, description = "Database unreachable"),
    )
)]
pub async fn db_health_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.ping().await?;
    Ok((
        StatusCode::OK,
        Json(DbHealthResponse {
            status: "healthy".to_string(),
            database: "connected".to_string(),
        }),
    ))
}

/// Fixed vocabularies the client builds its pickers from.
#[derive(Debug, Serialize, ToSchema)]
struct ConstantsResponse {
    categories: Vec<&'static str>,
    payment_modes: Vec<&'static str>,
    transaction_types: Vec<&'static str>,
}

/// `GET /api/v1/constants` — Category and payment-mode vocabularies.
#[utoipa::path(
    get,
    path = "/api/v1/constants",
    tag = "System",
    summary = "Client constants",
    description = "Returns the closed category, payment-mode, and transaction-type vocabularies.",
    responses(
        (status = 200, description = "Vocabulary catalog", body = ConstantsResponse),
    )
)]
pub async fn constants_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ConstantsResponse {
            categories: CATEGORIES.to_vec(),
            payment_modes: PAYMENT_MODES.to_vec(),
            transaction_types: vec!["INCOME", "EXPENSE"],
        }),
    )
}

/// Health routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/db", get(db_health_handler))
}
