//! Transaction handlers: create, list, update, hard delete, bulk insert,
//! CSV import, and the archive/recycle-bin moves for single rows.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{
    ArchivedTransactionDto, BulkTransactionsRequest, BulkTransactionsResponse,
    CreateTransactionRequest, DeletedTransactionDto, ImportCsvRequest, MessageResponse,
    PaginationMeta, PaginationParams, TransactionDto, TransactionListQuery,
    TransactionListResponse,
};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};
use crate::service::archive::ArchiveService;
use crate::service::transaction::{TransactionInput, TransactionService};

fn transaction_service(state: &AppState) -> TransactionService {
    TransactionService::new(state.store.clone())
}

/// `POST /transactions` — Record a transaction.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] on out-of-range or out-of-vocabulary
/// fields.
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "Transactions",
    summary = "Record a transaction",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = TransactionDto),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 403, description = "Not a member of the group", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
    )
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tx = transaction_service(&state)
        .create(&user, &TransactionInput::from(req))
        .await?;
    Ok((StatusCode::CREATED, Json(TransactionDto::from(tx))))
}

/// `GET /transactions` — Paginated listing, newest date first. Scoped to
/// one group with `group_id`; otherwise spans every group the caller
/// belongs to.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the caller cannot see the
/// requested group.
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "Transactions",
    summary = "List transactions",
    params(TransactionListQuery, PaginationParams),
    responses(
        (status = 200, description = "Page of transactions", body = TransactionListResponse),
        (status = 404, description = "Group not found or not a member", body = ErrorResponse),
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<TransactionListQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let params = params.clamped();
    let (rows, total) = transaction_service(&state)
        .list(&user, filter.group_id, params.skip, params.limit)
        .await?;
    Ok(Json(TransactionListResponse {
        transactions: rows.into_iter().map(TransactionDto::from).collect(),
        pagination: PaginationMeta::new(&params, total),
    }))
}

/// `POST /transactions/bulk` — Atomic batch insert into one group.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] naming the first bad row; nothing is
/// inserted in that case.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/bulk",
    tag = "Transactions",
    summary = "Record transactions in bulk",
    description = "Inserts all rows in one unit. Every row must carry the same group_id; a single bad row rejects the whole batch.",
    request_body = BulkTransactionsRequest,
    responses(
        (status = 201, description = "All rows inserted", body = BulkTransactionsResponse),
        (status = 400, description = "A row failed validation", body = ErrorResponse),
        (status = 403, description = "Not a member of the group", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
    )
)]
pub async fn bulk_create_transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<BulkTransactionsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let inputs: Vec<TransactionInput> = req
        .transactions
        .into_iter()
        .map(TransactionInput::from)
        .collect();
    let rows = transaction_service(&state).create_bulk(&user, &inputs).await?;
    let count = rows.len();
    Ok((
        StatusCode::CREATED,
        Json(BulkTransactionsResponse {
            transactions: rows.into_iter().map(TransactionDto::from).collect(),
            count,
        }),
    ))
}

/// `POST /transactions/import` — CSV import into one group.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] with a row number for any bad row;
/// the import is all-or-nothing.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/import",
    tag = "Transactions",
    summary = "Import transactions from CSV",
    description = "Accepts CSV text with header `date,description,amount,type,category,payment_mode` plus an optional `paid_by` column resolved through `paid_by_mapping`; any bad row aborts the whole import.",
    request_body = ImportCsvRequest,
    responses(
        (status = 201, description = "All rows imported", body = BulkTransactionsResponse),
        (status = 400, description = "Unreadable CSV, missing columns, or a bad row", body = ErrorResponse),
        (status = 403, description = "Not a member of the group", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
    )
)]
pub async fn import_transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ImportCsvRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = transaction_service(&state)
        .import_csv(
            &user,
            req.group_id,
            req.csv_data.as_bytes(),
            &req.paid_by_mapping,
        )
        .await?;
    let count = rows.len();
    Ok((
        StatusCode::CREATED,
        Json(BulkTransactionsResponse {
            transactions: rows.into_iter().map(TransactionDto::from).collect(),
            count,
        }),
    ))
}

/// `GET /transactions/{id}` — One transaction.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if missing or invisible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{id}",
    tag = "Transactions",
    summary = "Get a transaction",
    params(("id" = i64, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "The transaction", body = TransactionDto),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let tx = transaction_service(&state).get(&user, id).await?;
    Ok(Json(TransactionDto::from(tx)))
}

/// `PUT /transactions/{id}` — Replace a transaction's mutable fields,
/// moving it to another group when the body's `group_id` differs.
///
/// # Errors
///
/// Same validation as create; same visibility as get.
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{id}",
    tag = "Transactions",
    summary = "Update a transaction",
    params(("id" = i64, Path, description = "Transaction id")),
    request_body = CreateTransactionRequest,
    responses(
        (status = 200, description = "Updated transaction", body = TransactionDto),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 403, description = "Not a member of the target group", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn update_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tx = transaction_service(&state)
        .update(&user, id, &TransactionInput::from(req))
        .await?;
    Ok(Json(TransactionDto::from(tx)))
}

/// `DELETE /transactions/{id}` — Hard-delete a transaction.
///
/// Unlike `DELETE /transactions/{id}/delete`, the row is gone for good.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if missing or invisible to the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{id}",
    tag = "Transactions",
    summary = "Hard-delete a transaction",
    params(("id" = i64, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Removed permanently", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn hard_delete_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    transaction_service(&state).delete(&user, id).await?;
    Ok(Json(MessageResponse::new("transaction deleted")))
}

/// `DELETE /transactions/{id}/delete` — Move a transaction to the recycle
/// bin.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if missing or invisible to the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{id}/delete",
    tag = "Transactions",
    summary = "Move a transaction to the recycle bin",
    description = "Moves the row to the recycle bin with provenance; it can be restored later.",
    params(("id" = i64, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Moved to the recycle bin", body = DeletedTransactionDto),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn recycle_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = ArchiveService::new(state.store.clone()).delete(&user, id).await?;
    Ok(Json(DeletedTransactionDto::from(deleted)))
}

/// `POST /transactions/{id}/archive` — Move a transaction to the archive.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if missing or invisible to the caller.
#[utoipa::path(
    post,
    path = "/api/v1/transactions/{id}/archive",
    tag = "Transactions",
    summary = "Archive a transaction",
    description = "Moves the row out of the live ledger into the archive with provenance.",
    params(("id" = i64, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Archived", body = ArchivedTransactionDto),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn archive_transaction(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let archived = ArchiveService::new(state.store.clone()).archive(&user, id).await?;
    Ok(Json(ArchivedTransactionDto::from(archived)))
}

/// Transaction routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            post(create_transaction).get(list_transactions),
        )
        .route("/transactions/bulk", post(bulk_create_transactions))
        .route("/transactions/import", post(import_transactions))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(hard_delete_transaction),
        )
        .route("/transactions/{id}/delete", delete(recycle_transaction))
        .route("/transactions/{id}/archive", post(archive_transaction))
}
