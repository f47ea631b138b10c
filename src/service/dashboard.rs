//! Dashboard service: cross-group aggregates for the landing screen.

use crate::error::ApiError;
use crate::persistence::models::{DashboardStats, GroupSummary, TransactionWithGroup, User};
use crate::persistence::PostgresStore;

const DEFAULT_RECENT_LIMIT: i64 = 10;
const MAX_RECENT_LIMIT: i64 = 50;

/// Read-only aggregates across every group the user belongs to.
#[derive(Debug, Clone)]
pub struct DashboardService {
    store: PostgresStore,
}

impl DashboardService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Headline figures: group count, transaction count, total amount, and
    /// activity over the last seven days.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn stats(&self, user: &User) -> Result<DashboardStats, ApiError> {
        self.store.dashboard_stats(user.id).await
    }

    /// Every group the user belongs to, summarized with owner name and
    /// headline figures.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn group_summaries(&self, user: &User) -> Result<Vec<GroupSummary>, ApiError> {
        self.store.group_summaries(user.id).await
    }

    /// Most recent transactions across the user's groups, with group
    /// names. `limit` defaults to 10 and is capped at 50.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn recent_transactions(
        &self,
        user: &User,
        limit: Option<i64>,
    ) -> Result<Vec<TransactionWithGroup>, ApiError> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);
        self.store.recent_transactions(user.id, limit).await
    }
}
