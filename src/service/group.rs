//! Group service: membership, permissions, invitations, lifecycle.

use crate::error::ApiError;
use crate::persistence::models::{
    ArchivedTransaction, Group, GroupMember, GroupStats, MemberWithUser, User,
};
use crate::persistence::PostgresStore;

/// Notification kind for an actionable group invitation.
pub const INVITATION_TYPE: &str = "group_invitation";
/// Notification kind announcing a direct enrollment.
pub const MEMBER_ADDED_TYPE: &str = "group_added";

/// Orchestrates group CRUD and membership rules.
///
/// Permission model: any member may read; inviting and adding members
/// requires the `admin` role; renaming, clearing, and deleting require
/// being the group's creator.
#[derive(Debug, Clone)]
pub struct GroupService {
    store: PostgresStore,
}

impl GroupService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Creates a group; the creator becomes its admin member.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on an empty or oversized name.
    pub async fn create(
        &self,
        user: &User,
        name: &str,
        description: Option<&str>,
    ) -> Result<Group, ApiError> {
        validate_group_name(name)?;
        let group = self.store.create_group(name, description, user.id).await?;
        tracing::info!(group_id = group.id, user_id = user.id, "group created");
        Ok(group)
    }

    /// Lists the groups the user belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list(&self, user: &User) -> Result<Vec<Group>, ApiError> {
        self.store.list_groups_for_user(user.id).await
    }

    /// Fetches one group the user belongs to.
    ///
    /// Non-members get the same 404 as a missing group, so group ids are
    /// not probeable.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the group is missing or the user
    /// is not a member.
    pub async fn get(&self, user: &User, group_id: i64) -> Result<Group, ApiError> {
        let group = self
            .store
            .find_group(group_id)
            .await?
            .ok_or_else(group_not_found)?;
        if !self.store.is_member(user.id, group_id).await? {
            return Err(group_not_found());
        }
        Ok(group)
    }

    /// Aggregated transaction and member figures for a group.
    ///
    /// # Errors
    ///
    /// Same visibility rules as [`GroupService::get`].
    pub async fn stats(&self, user: &User, group_id: i64) -> Result<GroupStats, ApiError> {
        self.get(user, group_id).await?;
        self.store.group_stats(group_id).await
    }

    /// Lists a group's members with their account fields.
    ///
    /// # Errors
    ///
    /// Same visibility rules as [`GroupService::get`].
    pub async fn members(&self, user: &User, group_id: i64) -> Result<Vec<MemberWithUser>, ApiError> {
        self.get(user, group_id).await?;
        self.store.group_members(group_id).await
    }

    /// Sends an actionable invitation notification to a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] unless the caller is a group admin,
    /// [`ApiError::NotFound`] if no account has that email, and
    /// [`ApiError::Conflict`] if the invitee already belongs to the group.
    pub async fn invite(&self, user: &User, group_id: i64, email: &str) -> Result<(), ApiError> {
        let group = self.require_admin(user, group_id).await?;
        let invitee = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
        if self.store.is_member(invitee.id, group_id).await? {
            return Err(ApiError::Conflict(
                "user is already a member of this group".to_string(),
            ));
        }

        let action_data = serde_json::json!({
            "group_id": group.id,
            "group_name": group.name,
            "invited_by": user.username,
        });
        self.store
            .insert_notification(
                invitee.id,
                "Group invitation",
                &format!("{} invited you to join '{}'", user.username, group.name),
                INVITATION_TYPE,
                true,
                Some(&action_data),
            )
            .await?;
        tracing::info!(group_id, invitee_id = invitee.id, "invitation sent");
        Ok(())
    }

    /// Directly enrolls a user (by email) as a member, with a courtesy
    /// notification.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] unless the caller is a group admin,
    /// [`ApiError::NotFound`] if no account has that email, and
    /// [`ApiError::Conflict`] if the user already belongs to the group.
    pub async fn add_member(
        &self,
        user: &User,
        group_id: i64,
        email: &str,
    ) -> Result<GroupMember, ApiError> {
        let group = self.require_admin(user, group_id).await?;
        let new_member = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
        if self.store.is_member(new_member.id, group_id).await? {
            return Err(ApiError::Conflict(
                "user is already a member of this group".to_string(),
            ));
        }

        let member = self.store.add_member(group_id, new_member.id, "member").await?;
        self.store
            .insert_notification(
                new_member.id,
                "Added to group",
                &format!("{} added you to '{}'", user.username, group.name),
                MEMBER_ADDED_TYPE,
                false,
                None,
            )
            .await?;
        tracing::info!(group_id, member_id = new_member.id, "member added");
        Ok(member)
    }

    /// Renames a group and replaces its description.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] unless the caller created the group.
    pub async fn update(
        &self,
        user: &User,
        group_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Group, ApiError> {
        validate_group_name(name)?;
        self.require_creator(user, group_id).await?;
        self.store.update_group(group_id, name, description).await
    }

    /// Hard-deletes every transaction in the group, returning the count.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] unless the caller created the group.
    pub async fn clear_transactions(&self, user: &User, group_id: i64) -> Result<u64, ApiError> {
        self.require_creator(user, group_id).await?;
        let removed = self.store.clear_group_transactions(group_id).await?;
        tracing::info!(group_id, removed, "group transactions cleared");
        Ok(removed)
    }

    /// Deletes a group. Its live transactions move to the archive first so
    /// nothing is silently lost; memberships and the group row go away.
    /// Returns the archived transactions.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] unless the caller created the group.
    pub async fn delete(
        &self,
        user: &User,
        group_id: i64,
    ) -> Result<Vec<ArchivedTransaction>, ApiError> {
        self.require_creator(user, group_id).await?;
        let archived = self.store.delete_group(group_id, user.id).await?;
        tracing::info!(group_id, archived = archived.len(), "group deleted");
        Ok(archived)
    }

    /// Loads the group and requires the caller to hold the admin role.
    async fn require_admin(&self, user: &User, group_id: i64) -> Result<Group, ApiError> {
        let group = self
            .store
            .find_group(group_id)
            .await?
            .ok_or_else(group_not_found)?;
        match self.store.member_role(user.id, group_id).await?.as_deref() {
            Some("admin") => Ok(group),
            Some(_) => Err(ApiError::Forbidden(
                "only group admins can manage members".to_string(),
            )),
            None => Err(group_not_found()),
        }
    }

    /// Loads the group and requires the caller to be its creator.
    async fn require_creator(&self, user: &User, group_id: i64) -> Result<Group, ApiError> {
        let group = self
            .store
            .find_group(group_id)
            .await?
            .ok_or_else(group_not_found)?;
        if !self.store.is_member(user.id, group_id).await? {
            return Err(group_not_found());
        }
        if group.created_by != user.id {
            return Err(ApiError::Forbidden(
                "only the group creator can do this".to_string(),
            ));
        }
        Ok(group)
    }
}

fn group_not_found() -> ApiError {
    ApiError::NotFound("group not found".to_string())
}

const MAX_GROUP_NAME_LENGTH: usize = 100;

fn validate_group_name(name: &str) -> Result<(), ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_GROUP_NAME_LENGTH {
        return Err(ApiError::Validation(format!(
            "group name must be 1-{MAX_GROUP_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_name_must_be_nonempty_and_bounded() {
        assert!(validate_group_name("Flat 4B").is_ok());
        assert!(validate_group_name("   ").is_err());
        assert!(validate_group_name(&"x".repeat(101)).is_err());
    }
}
