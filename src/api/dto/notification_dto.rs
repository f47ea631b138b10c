//! Notification DTOs: inbox listing, read state, invitation actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common_dto::PaginationMeta;
use super::group_dto::GroupDto;
use crate::persistence::models::Notification;

/// One notification as returned by the API.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct NotificationDto {
    /// Notification id.
    pub id: i64,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Kind tag, e.g. `"group_invitation"`.
    pub notification_type: String,
    /// Whether the recipient has seen it.
    pub is_read: bool,
    /// Whether accept/decline actions apply.
    pub is_actionable: bool,
    /// Structured payload for actionable notifications.
    pub action_data: Option<serde_json::Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            is_read: n.is_read,
            is_actionable: n.is_actionable,
            action_data: n.action_data,
            created_at: n.created_at,
        }
    }
}

/// Query filter for `GET /notifications`.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
pub struct UnreadFilter {
    /// When true, only unread notifications are returned.
    #[serde(default)]
    pub unread_only: bool,
}

/// Paginated inbox listing with counts.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct NotificationListResponse {
    /// The page of notifications, newest first.
    pub notifications: Vec<NotificationDto>,
    /// Unread notifications across the whole inbox.
    pub unread_count: i64,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `GET /notifications/unread-count`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UnreadCountResponse {
    /// Unread notifications.
    pub unread_count: i64,
}

/// Response body for `POST /notifications/mark-all-read`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MarkAllReadResponse {
    /// Notifications flipped to read.
    pub marked: u64,
}

/// Response body for accepting a group invitation.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AcceptInvitationResponse {
    /// Outcome message.
    pub message: String,
    /// The group the caller just joined.
    pub group: GroupDto,
}
