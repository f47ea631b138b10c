//! Notification service: listing, read state, and invitation actions.

use crate::error::ApiError;
use crate::persistence::models::{Group, Notification, User};
use crate::persistence::postgres::InvitationOutcome;
use crate::persistence::PostgresStore;
use crate::service::group::INVITATION_TYPE;

/// Orchestrates the notification inbox.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: PostgresStore,
}

impl NotificationService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Lists the caller's notifications with total and unread counts,
    /// optionally restricted to unread rows.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list(
        &self,
        user: &User,
        skip: i64,
        limit: i64,
        unread_only: bool,
    ) -> Result<(Vec<Notification>, i64, i64), ApiError> {
        self.store
            .list_notifications(user.id, skip, limit, unread_only)
            .await
    }

    /// Counts the caller's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn unread_count(&self, user: &User) -> Result<i64, ApiError> {
        self.store.unread_notification_count(user.id).await
    }

    /// Marks one notification as read.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the caller has no such
    /// notification.
    pub async fn mark_read(&self, user: &User, id: i64) -> Result<(), ApiError> {
        if !self.store.mark_notification_read(id, user.id).await? {
            return Err(notification_not_found());
        }
        Ok(())
    }

    /// Marks every unread notification as read, returning the count.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn mark_all_read(&self, user: &User) -> Result<u64, ApiError> {
        self.store.mark_all_notifications_read(user.id).await
    }

    /// Deletes one notification.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the caller has no such
    /// notification.
    pub async fn delete(&self, user: &User, id: i64) -> Result<(), ApiError> {
        if !self.store.delete_notification(id, user.id).await? {
            return Err(notification_not_found());
        }
        Ok(())
    }

    /// Accepts a group invitation: the caller joins the group and the
    /// notification is consumed, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for a missing notification,
    /// [`ApiError::Validation`] when the notification is not an actionable
    /// invitation or its payload is malformed, and [`ApiError::Conflict`]
    /// when the caller already belongs to the group (the notification is
    /// still consumed).
    pub async fn accept_invitation(&self, user: &User, id: i64) -> Result<Group, ApiError> {
        let notification = self.require_invitation(user, id).await?;
        let group_id = invitation_group_id(&notification)?;

        let Some(group) = self.store.find_group(group_id).await? else {
            // The group was deleted while the invitation sat unread.
            self.store.delete_notification(id, user.id).await?;
            return Err(ApiError::NotFound(
                "the invited group no longer exists".to_string(),
            ));
        };

        match self
            .store
            .accept_group_invitation(id, user.id, group_id)
            .await?
        {
            InvitationOutcome::Joined => {
                tracing::info!(group_id, user_id = user.id, "invitation accepted");
                Ok(group)
            }
            InvitationOutcome::AlreadyMember => Err(ApiError::Conflict(
                "already a member of this group".to_string(),
            )),
        }
    }

    /// Declines a group invitation by consuming the notification.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for a missing notification and
    /// [`ApiError::Validation`] when it is not an actionable invitation.
    pub async fn decline_invitation(&self, user: &User, id: i64) -> Result<(), ApiError> {
        self.require_invitation(user, id).await?;
        self.store.delete_notification(id, user.id).await?;
        tracing::info!(notification_id = id, user_id = user.id, "invitation declined");
        Ok(())
    }

    async fn require_invitation(&self, user: &User, id: i64) -> Result<Notification, ApiError> {
        let notification = self
            .store
            .find_notification(id, user.id)
            .await?
            .ok_or_else(notification_not_found)?;
        if notification.notification_type != INVITATION_TYPE || !notification.is_actionable {
            return Err(ApiError::Validation(
                "notification is not a group invitation".to_string(),
            ));
        }
        Ok(notification)
    }
}

fn notification_not_found() -> ApiError {
    ApiError::NotFound("notification not found".to_string())
}

/// Pulls the target group id out of the invitation payload.
fn invitation_group_id(notification: &Notification) -> Result<i64, ApiError> {
    notification
        .action_data
        .as_ref()
        .and_then(|data| data.get("group_id"))
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| ApiError::Validation("invitation payload is malformed".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn invitation(action_data: Option<serde_json::Value>) -> Notification {
        Notification {
            id: 1,
            user_id: 7,
            title: "Group invitation".into(),
            message: "ana invited you to join 'Flat 4B'".into(),
            notification_type: INVITATION_TYPE.into(),
            is_read: false,
            is_actionable: true,
            action_data,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn group_id_is_read_from_payload() {
        let n = invitation(Some(serde_json::json!({"group_id": 42, "group_name": "Flat 4B"})));
        assert_eq!(invitation_group_id(&n).unwrap(), 42);
    }

    #[test]
    fn missing_or_non_numeric_group_id_is_invalid() {
        assert!(invitation_group_id(&invitation(None)).is_err());
        assert!(
            invitation_group_id(&invitation(Some(serde_json::json!({"group_id": "42"})))).is_err()
        );
    }
}
