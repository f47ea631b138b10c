//! Archive and recycle-bin handlers: listing, restore, purge.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    ArchivedTransactionDto, ArchivedTransactionListResponse, DeletedTransactionDto,
    DeletedTransactionListResponse, MessageResponse, PaginationMeta, PaginationParams,
    TransactionDto,
};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};
use crate::service::archive::ArchiveService;

fn archive_service(state: &AppState) -> ArchiveService {
    ArchiveService::new(state.store.clone())
}

/// `GET /transactions/archived` — Transactions the caller has archived.
///
/// # Errors
///
/// Returns [`ApiError::Database`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/transactions/archived",
    tag = "Archive",
    summary = "List archived transactions",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of archived transactions", body = ArchivedTransactionListResponse),
    )
)]
pub async fn list_archived(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let params = params.clamped();
    let (rows, total) = archive_service(&state)
        .list_archived(&user, params.skip, params.limit)
        .await?;
    Ok(Json(ArchivedTransactionListResponse {
        transactions: rows.into_iter().map(ArchivedTransactionDto::from).collect(),
        pagination: PaginationMeta::new(&params, total),
    }))
}

/// `POST /transactions/archived/{id}/restore` — Restore an archived
/// transaction into its group.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] if the original group no longer exists.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/archived/{id}/restore",
    tag = "Archive",
    summary = "Restore an archived transaction",
    params(("id" = i64, Path, description = "Archive row id")),
    responses(
        (status = 200, description = "Restored transaction (fresh id)", body = TransactionDto),
        (status = 404, description = "No such archived transaction", body = ErrorResponse),
        (status = 409, description = "Original group no longer exists", body = ErrorResponse),
    )
)]
pub async fn restore_archived(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let restored = archive_service(&state).restore_archived(&user, id).await?;
    Ok(Json(TransactionDto::from(restored)))
}

/// `DELETE /transactions/archived/{id}` — Permanently remove an archived
/// transaction.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the caller has no such row.
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/archived/{id}",
    tag = "Archive",
    summary = "Purge an archived transaction",
    params(("id" = i64, Path, description = "Archive row id")),
    responses(
        (status = 200, description = "Removed for good", body = MessageResponse),
        (status = 404, description = "No such archived transaction", body = ErrorResponse),
    )
)]
pub async fn purge_archived(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    archive_service(&state).purge_archived(&user, id).await?;
    Ok(Json(MessageResponse::new("archived transaction removed")))
}

/// `GET /transactions/deleted` — The caller's recycle bin.
///
/// # Errors
///
/// Returns [`ApiError::Database`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/transactions/deleted",
    tag = "Archive",
    summary = "List recycled transactions",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of recycled transactions", body = DeletedTransactionListResponse),
    )
)]
pub async fn list_deleted(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let params = params.clamped();
    let (rows, total) = archive_service(&state)
        .list_deleted(&user, params.skip, params.limit)
        .await?;
    Ok(Json(DeletedTransactionListResponse {
        transactions: rows.into_iter().map(DeletedTransactionDto::from).collect(),
        pagination: PaginationMeta::new(&params, total),
    }))
}

/// `POST /transactions/deleted/{id}/restore` — Restore a recycled
/// transaction into its group.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] if the original group no longer exists.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/deleted/{id}/restore",
    tag = "Archive",
    summary = "Restore a recycled transaction",
    params(("id" = i64, Path, description = "Recycle-bin row id")),
    responses(
        (status = 200, description = "Restored transaction (fresh id)", body = TransactionDto),
        (status = 404, description = "No such recycled transaction", body = ErrorResponse),
        (status = 409, description = "Original group no longer exists", body = ErrorResponse),
    )
)]
pub async fn restore_deleted(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let restored = archive_service(&state).restore_deleted(&user, id).await?;
    Ok(Json(TransactionDto::from(restored)))
}

/// `DELETE /transactions/deleted/{id}` — Permanently remove a recycled
/// transaction.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the caller has no such row.
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/deleted/{id}",
    tag = "Archive",
    summary = "Purge a recycled transaction",
    params(("id" = i64, Path, description = "Recycle-bin row id")),
    responses(
        (status = 200, description = "Removed for good", body = MessageResponse),
        (status = 404, description = "No such recycled transaction", body = ErrorResponse),
    )
)]
pub async fn purge_deleted(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    archive_service(&state).purge_deleted(&user, id).await?;
    Ok(Json(MessageResponse::new("deleted transaction removed")))
}

/// Archive routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/archived", get(list_archived))
        .route(
            "/transactions/archived/{id}",
            axum::routing::delete(purge_archived),
        )
        .route("/transactions/archived/{id}/restore", post(restore_archived))
        .route("/transactions/deleted", get(list_deleted))
        .route(
            "/transactions/deleted/{id}",
            axum::routing::delete(purge_deleted),
        )
        .route("/transactions/deleted/{id}/restore", post(restore_deleted))
}
