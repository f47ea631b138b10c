//! Transaction DTOs: create, update, bulk insert, CSV import, listing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common_dto::PaginationMeta;
use crate::persistence::models::Transaction;
use crate::service::transaction::TransactionInput;

/// Request body for creating or replacing a transaction.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateTransactionRequest {
    /// Group the row belongs to; on update, a different group moves the
    /// row there.
    pub group_id: i64,
    /// Monetary amount; must be within the accepted range.
    pub amount: f64,
    /// Free-text note (max 500 chars).
    #[serde(default)]
    pub note: Option<String>,
    /// Category from the fixed vocabulary.
    #[serde(default)]
    pub category: Option<String>,
    /// Payment mode from the fixed vocabulary.
    #[serde(default)]
    pub payment_mode: Option<String>,
    /// `INCOME`/`EXPENSE`; defaults to `EXPENSE`.
    #[serde(default, rename = "type")]
    pub tx_type: Option<String>,
    /// Transaction date; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Member the money is attributed to.
    #[serde(default)]
    pub paid_by: Option<i64>,
}

impl From<CreateTransactionRequest> for TransactionInput {
    fn from(req: CreateTransactionRequest) -> Self {
        Self {
            group_id: req.group_id,
            amount: req.amount,
            note: req.note,
            category: req.category,
            payment_mode: req.payment_mode,
            tx_type: req.tx_type,
            date: req.date,
            paid_by: req.paid_by,
        }
    }
}

/// Request body for `POST /transactions/bulk`. Every row must carry the
/// same `group_id`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BulkTransactionsRequest {
    /// Rows to insert atomically.
    pub transactions: Vec<CreateTransactionRequest>,
}

/// Request body for `POST /transactions/import`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ImportCsvRequest {
    /// Group the imported rows belong to.
    pub group_id: i64,
    /// CSV text with header `date,description,amount,type,category,payment_mode`
    /// and an optional `paid_by` column.
    pub csv_data: String,
    /// Maps `paid_by` display names in the CSV to member user ids.
    #[serde(default)]
    pub paid_by_mapping: std::collections::HashMap<String, i64>,
}

/// Query filter for `GET /transactions`.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
pub struct TransactionListQuery {
    /// Scope the listing to one group; absent means every group the
    /// caller belongs to.
    #[serde(default)]
    pub group_id: Option<i64>,
}

/// One live transaction as returned by the API.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TransactionDto {
    /// Transaction id.
    pub id: i64,
    /// Owning group.
    pub group_id: i64,
    /// User who recorded it.
    pub created_by: i64,
    /// Attributed member.
    pub paid_by: Option<i64>,
    /// Monetary amount.
    pub amount: f64,
    /// Free-text note.
    pub note: Option<String>,
    /// Category.
    pub category: Option<String>,
    /// Payment mode.
    pub payment_mode: Option<String>,
    /// `"INCOME"` or `"EXPENSE"`.
    #[serde(rename = "type")]
    pub tx_type: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionDto {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            group_id: tx.group_id,
            created_by: tx.created_by,
            paid_by: tx.paid_by,
            amount: tx.amount,
            note: tx.note,
            category: tx.category,
            payment_mode: tx.payment_mode,
            tx_type: tx.tx_type,
            date: tx.date,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}

/// Paginated transaction list.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TransactionListResponse {
    /// The page of transactions.
    pub transactions: Vec<TransactionDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for bulk insert and CSV import.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BulkTransactionsResponse {
    /// Rows inserted, in request order.
    pub transactions: Vec<TransactionDto>,
    /// Number of rows inserted.
    pub count: usize,
}
