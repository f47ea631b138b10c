//! Handler for AI-backed transaction extraction from free text.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{ExtractRequest, ExtractResponse, ExtractedTransactionDto};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};
use crate::service::extraction::ExtractionService;

/// `POST /extract-transactions` — Turn free-form text into transaction
/// drafts.
///
/// The drafts are suggestions only; nothing is written to the ledger.
///
/// # Errors
///
/// Returns [`ApiError::Upstream`] when the AI service fails and
/// [`ApiError::Validation`] when the reply contains nothing usable.
#[utoipa::path(
    post,
    path = "/api/v1/extract-transactions",
    tag = "Extraction",
    summary = "Extract transactions from text",
    description = "Sends the text to the AI completion API and returns validated transaction drafts. Invalid drafts are dropped silently.",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Extracted drafts", body = ExtractResponse),
        (status = 400, description = "Empty input or unusable AI reply", body = ErrorResponse),
        (status = 502, description = "AI service failure", body = ErrorResponse),
    )
)]
pub async fn extract_transactions(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(req): Json<ExtractRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let drafts = ExtractionService::new(state.ai.clone())
        .extract(&req.text)
        .await?;
    let count = drafts.len();
    Ok(Json(ExtractResponse {
        transactions: drafts.into_iter().map(ExtractedTransactionDto::from).collect(),
        count,
    }))
}

/// Extraction routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/extract-transactions", post(extract_transactions))
}
