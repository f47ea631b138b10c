//! Archive and recycle-bin service.
//!
//! Archiving and deleting are moves, not flag flips: the row leaves the
//! live table and lands in a side table with provenance (who, when, why,
//! and the group name at the time). Restores are the inverse move and
//! fail if the original group no longer exists.

use crate::error::ApiError;
use crate::persistence::models::{ArchivedTransaction, DeletedTransaction, Transaction, User};
use crate::persistence::postgres::{REASON_MANUAL_ARCHIVE, REASON_USER_DELETED};
use crate::persistence::PostgresStore;

/// Orchestrates transaction lifecycle moves.
#[derive(Debug, Clone)]
pub struct ArchiveService {
    store: PostgresStore,
}

impl ArchiveService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Moves a live transaction into the archive.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the row is missing or invisible
    /// to the caller.
    pub async fn archive(
        &self,
        user: &User,
        transaction_id: i64,
    ) -> Result<ArchivedTransaction, ApiError> {
        self.require_visible(user, transaction_id).await?;
        let archived = self
            .store
            .archive_transaction(transaction_id, user.id, REASON_MANUAL_ARCHIVE)
            .await?;
        tracing::info!(transaction_id, user_id = user.id, "transaction archived");
        Ok(archived)
    }

    /// Moves a live transaction into the recycle bin.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the row is missing or invisible
    /// to the caller.
    pub async fn delete(
        &self,
        user: &User,
        transaction_id: i64,
    ) -> Result<DeletedTransaction, ApiError> {
        self.require_visible(user, transaction_id).await?;
        let deleted = self
            .store
            .recycle_transaction(transaction_id, user.id, REASON_USER_DELETED)
            .await?;
        tracing::info!(transaction_id, user_id = user.id, "transaction deleted");
        Ok(deleted)
    }

    /// Lists transactions the caller has archived, newest move first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list_archived(
        &self,
        user: &User,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<ArchivedTransaction>, i64), ApiError> {
        self.store.list_archived(user.id, skip, limit).await
    }

    /// Lists transactions the caller has recycled, newest move first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list_deleted(
        &self,
        user: &User,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<DeletedTransaction>, i64), ApiError> {
        self.store.list_recycled(user.id, skip, limit).await
    }

    /// Restores an archived transaction back into its group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the caller has no such archived
    /// row, and [`ApiError::Conflict`] if the original group has since
    /// been deleted.
    pub async fn restore_archived(&self, user: &User, id: i64) -> Result<Transaction, ApiError> {
        let row = self
            .store
            .find_archived(id, user.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("archived transaction not found".to_string()))?;
        self.require_group_exists(row.group_id).await?;
        let restored = self.store.restore_archived(id).await?;
        tracing::info!(archived_id = id, restored_id = restored.id, "archive restore");
        Ok(restored)
    }

    /// Restores a recycled transaction back into its group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the caller has no such recycled
    /// row, and [`ApiError::Conflict`] if the original group has since
    /// been deleted.
    pub async fn restore_deleted(&self, user: &User, id: i64) -> Result<Transaction, ApiError> {
        let row = self
            .store
            .find_recycled(id, user.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("deleted transaction not found".to_string()))?;
        self.require_group_exists(row.group_id).await?;
        let restored = self.store.restore_recycled(id).await?;
        tracing::info!(deleted_id = id, restored_id = restored.id, "recycle restore");
        Ok(restored)
    }

    /// Permanently removes an archived transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the caller has no such row.
    pub async fn purge_archived(&self, user: &User, id: i64) -> Result<(), ApiError> {
        self.store
            .find_archived(id, user.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("archived transaction not found".to_string()))?;
        self.store.purge_archived(id).await?;
        tracing::info!(archived_id = id, "archive purge");
        Ok(())
    }

    /// Permanently removes a recycled transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the caller has no such row.
    pub async fn purge_deleted(&self, user: &User, id: i64) -> Result<(), ApiError> {
        self.store
            .find_recycled(id, user.id)
            .await?
            .ok_or_else(|| ApiError::NotFound("deleted transaction not found".to_string()))?;
        self.store.purge_recycled(id).await?;
        tracing::info!(deleted_id = id, "recycle purge");
        Ok(())
    }

    async fn require_visible(&self, user: &User, transaction_id: i64) -> Result<(), ApiError> {
        let tx = self
            .store
            .find_transaction(transaction_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("transaction not found".to_string()))?;
        if !self.store.is_member(user.id, tx.group_id).await? {
            return Err(ApiError::NotFound("transaction not found".to_string()));
        }
        Ok(())
    }

    async fn require_group_exists(&self, group_id: i64) -> Result<(), ApiError> {
        if self.store.find_group(group_id).await?.is_none() {
            return Err(ApiError::Conflict(
                "the original group no longer exists".to_string(),
            ));
        }
        Ok(())
    }
}
