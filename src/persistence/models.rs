//! Row types mapped from the database schema.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// A registered account.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Primary key.
    pub id: i64,
    /// Unique login email.
    pub email: String,
    /// Unique display handle.
    pub username: String,
    /// Full display name.
    pub full_name: Option<String>,
    /// Bcrypt hash; `None` for accounts created through Google.
    pub password_hash: Option<String>,
    /// Google account id, when linked.
    pub google_id: Option<String>,
    /// Profile picture URL.
    pub avatar_url: Option<String>,
    /// `"email"` or `"google"`.
    pub auth_provider: String,
    /// Deactivated accounts cannot authenticate.
    pub is_active: bool,
    /// Administrative flag.
    pub is_superuser: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A shared-expense group.
#[derive(Debug, Clone, FromRow)]
pub struct Group {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// The creating user; owner for permission checks.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A user's membership in a group.
#[derive(Debug, Clone, FromRow)]
pub struct GroupMember {
    /// Primary key.
    pub id: i64,
    /// Member user id.
    pub user_id: i64,
    /// Group id.
    pub group_id: i64,
    /// `"admin"` or `"member"`.
    pub role: String,
    /// When the user joined.
    pub joined_at: DateTime<Utc>,
}

/// A group member joined with account fields, as shown in member lists.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithUser {
    /// Member user id.
    pub user_id: i64,
    /// Member username.
    pub username: String,
    /// Member email.
    pub email: String,
    /// Member full name.
    pub full_name: Option<String>,
    /// Member avatar URL.
    pub avatar_url: Option<String>,
    /// `"admin"` or `"member"`.
    pub role: String,
    /// When the user joined.
    pub joined_at: DateTime<Utc>,
}

/// A live transaction row.
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    /// Primary key.
    pub id: i64,
    /// Owning group.
    pub group_id: i64,
    /// The user who recorded the row.
    pub created_by: i64,
    /// The member the money is attributed to; `None` means unattributed.
    pub paid_by: Option<i64>,
    /// Monetary amount, always positive.
    pub amount: f64,
    /// Free-text note.
    pub note: Option<String>,
    /// Spending category.
    pub category: Option<String>,
    /// Payment instrument.
    pub payment_mode: Option<String>,
    /// `"INCOME"` or `"EXPENSE"`.
    pub tx_type: String,
    /// Transaction date (not the insertion time).
    pub date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Field set for inserting a live transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Owning group.
    pub group_id: i64,
    /// The user recording the row.
    pub created_by: i64,
    /// Attribution, already validated as a group member.
    pub paid_by: Option<i64>,
    /// Monetary amount, already range-validated.
    pub amount: f64,
    /// Free-text note.
    pub note: Option<String>,
    /// Spending category.
    pub category: Option<String>,
    /// Payment instrument.
    pub payment_mode: Option<String>,
    /// `"INCOME"` or `"EXPENSE"`.
    pub tx_type: String,
    /// Transaction date.
    pub date: NaiveDate,
}

/// A transaction moved to the archive, with provenance.
#[derive(Debug, Clone, FromRow)]
pub struct ArchivedTransaction {
    /// Primary key in the archive table.
    pub id: i64,
    /// The id the row had while live.
    pub original_transaction_id: i64,
    /// Group id at archive time; the group may no longer exist.
    pub group_id: i64,
    /// Group name snapshot taken at archive time.
    pub group_name: Option<String>,
    /// The user who recorded the original row.
    pub created_by: i64,
    /// Attribution carried over from the live row.
    pub paid_by: Option<i64>,
    /// Monetary amount.
    pub amount: f64,
    /// Free-text note.
    pub note: Option<String>,
    /// Spending category.
    pub category: Option<String>,
    /// Payment instrument.
    pub payment_mode: Option<String>,
    /// `"INCOME"` or `"EXPENSE"`.
    pub tx_type: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Original creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Who performed the archive.
    pub archived_by: i64,
    /// `"manual_archive"` or `"group_deleted"`.
    pub archive_reason: String,
    /// When the move happened.
    pub archived_at: DateTime<Utc>,
}

/// A transaction moved to the recycle bin, with provenance.
#[derive(Debug, Clone, FromRow)]
pub struct DeletedTransaction {
    /// Primary key in the recycle-bin table.
    pub id: i64,
    /// The id the row had while live.
    pub original_transaction_id: i64,
    /// Group id at deletion time; the group may no longer exist.
    pub group_id: i64,
    /// Group name snapshot taken at deletion time.
    pub group_name: Option<String>,
    /// The user who recorded the original row.
    pub created_by: i64,
    /// Attribution carried over from the live row.
    pub paid_by: Option<i64>,
    /// Monetary amount.
    pub amount: f64,
    /// Free-text note.
    pub note: Option<String>,
    /// Spending category.
    pub category: Option<String>,
    /// Payment instrument.
    pub payment_mode: Option<String>,
    /// `"INCOME"` or `"EXPENSE"`.
    pub tx_type: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Original creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Who performed the deletion.
    pub deleted_by: i64,
    /// Why the row was removed.
    pub deletion_reason: String,
    /// When the move happened.
    pub deleted_at: DateTime<Utc>,
}

/// A notification delivered to one user.
#[derive(Debug, Clone, FromRow)]
pub struct Notification {
    /// Primary key.
    pub id: i64,
    /// Recipient.
    pub user_id: i64,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Kind tag, e.g. `"group_invitation"`.
    pub notification_type: String,
    /// Whether the recipient has seen it.
    pub is_read: bool,
    /// Whether the client should render accept/decline actions.
    pub is_actionable: bool,
    /// Structured payload for actionable notifications.
    pub action_data: Option<serde_json::Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Per-group aggregate figures for the group stats endpoint.
#[derive(Debug, Clone, FromRow)]
pub struct GroupStats {
    /// Number of live transactions in the group.
    pub transaction_count: i64,
    /// Sum of EXPENSE amounts.
    pub total_expense: f64,
    /// Sum of INCOME amounts.
    pub total_income: f64,
    /// Number of members.
    pub member_count: i64,
}

/// Cross-group aggregate figures for the dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct DashboardStats {
    /// Groups the user belongs to.
    pub total_groups: i64,
    /// Live transactions across those groups.
    pub total_transactions: i64,
    /// Sum of all live transaction amounts across those groups.
    pub total_amount: f64,
    /// Transactions recorded in the last seven days.
    pub recent_activity_count: i64,
}

/// One group with its owner name and headline figures, as shown on the
/// dashboard group overview.
#[derive(Debug, Clone, FromRow)]
pub struct GroupSummary {
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

/// A transaction joined with its group name, as shown on the dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionWithGroup {
    /// Primary key.
    pub id: i64,
    /// Owning group.
    pub group_id: i64,
    /// Owning group's name.
    pub group_name: String,
    /// The user who recorded the row.
    pub created_by: i64,
    /// Attribution.
    pub paid_by: Option<i64>,
    /// Monetary amount.
    pub amount: f64,
    /// Free-text note.
    pub note: Option<String>,
    /// Spending category.
    pub category: Option<String>,
    /// Payment instrument.
    pub payment_mode: Option<String>,
    /// `"INCOME"` or `"EXPENSE"`.
    pub tx_type: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
