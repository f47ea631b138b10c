//! Group DTOs: CRUD, membership, invitations, stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::models::{Group, GroupStats, MemberWithUser};

/// Request body for `POST /groups`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateGroupRequest {
    /// Display name (1-100 chars).
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for `PUT /groups/{id}`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateGroupRequest {
    /// New display name.
    pub name: String,
    /// New description; `null` clears it.
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for `POST /groups/{id}/invite`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct InviteRequest {
    /// Email of the account to invite.
    pub email: String,
}

/// Request body for `POST /groups/{id}/members`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddMemberRequest {
    /// Email of the account to enroll directly.
    pub email: String,
}

/// One group as returned by the API.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct GroupDto {
    /// Group id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Description, if set.
    pub description: Option<String>,
    /// Creating user.
    pub created_by: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Group> for GroupDto {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            description: group.description,
            created_by: group.created_by,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

/// Response body for `GET /groups`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct GroupListResponse {
    /// Every group the caller belongs to.
    pub groups: Vec<GroupDto>,
}

/// Response body for `GET /groups/{id}/stats`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct GroupStatsResponse {
    /// Number of live transactions.
    pub transaction_count: i64,
    /// Sum of expenses.
    pub total_expense: f64,
    /// Sum of income.
    pub total_income: f64,
    /// Income minus expenses.
    pub net_balance: f64,
    /// Number of members.
    pub member_count: i64,
}

impl From<GroupStats> for GroupStatsResponse {
    fn from(stats: GroupStats) -> Self {
        Self {
            transaction_count: stats.transaction_count,
            total_expense: stats.total_expense,
            total_income: stats.total_income,
            net_balance: stats.total_income - stats.total_expense,
            member_count: stats.member_count,
        }
    }
}

/// One group member with account fields.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct MemberDto {
    /// Member user id.
    pub user_id: i64,
    /// Display handle.
    pub username: String,
    /// Email.
    pub email: String,
    /// Full name, if set.
    pub full_name: Option<String>,
    /// Avatar URL, if set.
    pub avatar_url: Option<String>,
    /// `"admin"` or `"member"`.
    pub role: String,
    /// When the user joined.
    pub joined_at: DateTime<Utc>,
}

impl From<MemberWithUser> for MemberDto {
    fn from(member: MemberWithUser) -> Self {
        Self {
            user_id: member.user_id,
            username: member.username,
            email: member.email,
            full_name: member.full_name,
            avatar_url: member.avatar_url,
            role: member.role,
            joined_at: member.joined_at,
        }
    }
}

/// Response body for `GET /groups/{id}/members`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MemberListResponse {
    /// The group's members, oldest join first.
    pub members: Vec<MemberDto>,
}

/// Response body for `DELETE /groups/{id}`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DeleteGroupResponse {
    /// Outcome message.
    pub message: String,
    /// Live transactions moved to the archive by the deletion.
    pub archived_transactions: u64,
}
