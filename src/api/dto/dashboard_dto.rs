//! Dashboard DTOs: headline figures and recent activity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::models::{DashboardStats, GroupSummary, TransactionWithGroup};

/// Response body for `GET /dashboard/stats`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DashboardStatsResponse {
    /// Groups the caller belongs to.
    pub total_groups: i64,
    /// Live transactions across those groups.
    pub total_transactions: i64,
    /// Sum of all live transaction amounts.
    pub total_amount: f64,
    /// Transactions recorded in the last seven days.
    pub recent_activity_count: i64,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_groups: stats.total_groups,
            total_transactions: stats.total_transactions,
            total_amount: stats.total_amount,
            recent_activity_count: stats.recent_activity_count,
        }
    }
}

/// One group summarized for the dashboard overview.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct GroupSummaryDto {
    /// Group id.
    pub id: i64,
    /// Group name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creator's user id.
    pub created_by: i64,
    /// Creator's username.
    pub owner_name: String,
    /// Number of members.
    pub member_count: i64,
    /// Number of live transactions.
    pub transaction_count: i64,
    /// Sum of live transaction amounts.
    pub total_amount: f64,
}

impl From<GroupSummary> for GroupSummaryDto {
    fn from(s: GroupSummary) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            created_by: s.created_by,
            owner_name: s.owner_name,
            member_count: s.member_count,
            transaction_count: s.transaction_count,
            total_amount: s.total_amount,
        }
    }
}

/// Response body for `GET /dashboard/groups`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct GroupSummariesResponse {
    /// Every group the caller belongs to, newest first.
    pub groups: Vec<GroupSummaryDto>,
}

/// Query parameters for `GET /dashboard/recent-transactions`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RecentQuery {
    /// Rows to return (default 10, max 50).
    #[serde(default)]
    pub limit: Option<i64>,
}

/// One recent transaction with its group name.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct RecentTransactionDto {
    /// Transaction id.
    pub id: i64,
    /// Owning group.
    pub group_id: i64,
    /// Owning group's name.
    pub group_name: String,
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
}

impl From<TransactionWithGroup> for RecentTransactionDto {
    fn from(tx: TransactionWithGroup) -> Self {
        Self {
            id: tx.id,
            group_id: tx.group_id,
            group_name: tx.group_name,
            created_by: tx.created_by,
            paid_by: tx.paid_by,
            amount: tx.amount,
            note: tx.note,
            category: tx.category,
            payment_mode: tx.payment_mode,
            tx_type: tx.tx_type,
            date: tx.date,
            created_at: tx.created_at,
        }
    }
}

/// Response body for `GET /dashboard/recent-transactions`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RecentTransactionsResponse {
    /// Recent transactions across all of the caller's groups.
    pub transactions: Vec<RecentTransactionDto>,
}
