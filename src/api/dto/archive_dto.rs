//! Archive and recycle-bin DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::common_dto::PaginationMeta;
use crate::persistence::models::{ArchivedTransaction, DeletedTransaction};

/// An archived transaction with its provenance.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ArchivedTransactionDto {
    /// Archive row id (used for restore/purge).
    pub id: i64,
    /// Id the row had while live.
    pub original_transaction_id: i64,
    /// Group id at archive time.
    pub group_id: i64,
    /// Group name at archive time; survives group deletion.
    pub group_name: Option<String>,
    /// User who recorded the original row.
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
    /// Who archived it.
    pub archived_by: i64,
    /// `"manual_archive"` or `"group_deleted"`.
    pub archive_reason: String,
    /// When the move happened.
    pub archived_at: DateTime<Utc>,
}

impl From<ArchivedTransaction> for ArchivedTransactionDto {
    fn from(row: ArchivedTransaction) -> Self {
        Self {
            id: row.id,
            original_transaction_id: row.original_transaction_id,
            group_id: row.group_id,
            group_name: row.group_name,
            created_by: row.created_by,
            paid_by: row.paid_by,
            amount: row.amount,
            note: row.note,
            category: row.category,
            payment_mode: row.payment_mode,
            tx_type: row.tx_type,
            date: row.date,
            archived_by: row.archived_by,
            archive_reason: row.archive_reason,
            archived_at: row.archived_at,
        }
    }
}

/// A recycled transaction with its provenance.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DeletedTransactionDto {
    /// Recycle-bin row id (used for restore/purge).
    pub id: i64,
    /// Id the row had while live.
    pub original_transaction_id: i64,
    /// Group id at deletion time.
    pub group_id: i64,
    /// Group name at deletion time.
    pub group_name: Option<String>,
    /// User who recorded the original row.
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
    /// Who deleted it.
    pub deleted_by: i64,
    /// Why it was removed.
    pub deletion_reason: String,
    /// When the move happened.
    pub deleted_at: DateTime<Utc>,
}

impl From<DeletedTransaction> for DeletedTransactionDto {
    fn from(row: DeletedTransaction) -> Self {
        Self {
            id: row.id,
            original_transaction_id: row.original_transaction_id,
            group_id: row.group_id,
            group_name: row.group_name,
            created_by: row.created_by,
            paid_by: row.paid_by,
            amount: row.amount,
            note: row.note,
            category: row.category,
            payment_mode: row.payment_mode,
            tx_type: row.tx_type,
            date: row.date,
            deleted_by: row.deleted_by,
            deletion_reason: row.deletion_reason,
            deleted_at: row.deleted_at,
        }
    }
}

/// Paginated archive list.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ArchivedTransactionListResponse {
    /// The page of archived transactions.
    pub transactions: Vec<ArchivedTransactionDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Paginated recycle-bin list.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DeletedTransactionListResponse {
    /// The page of recycled transactions.
    pub transactions: Vec<DeletedTransactionDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
