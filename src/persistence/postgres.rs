//! PostgreSQL implementation of the persistence layer.

use chrono::NaiveDate;
use sqlx::PgPool;

use super::models::{
    ArchivedTransaction, DashboardStats, DeletedTransaction, Group, GroupMember, GroupStats,
    GroupSummary, MemberWithUser, NewTransaction, Notification, Transaction, TransactionWithGroup,
    User,
};
use crate::error::ApiError;

/// Reason recorded when a user archives a transaction by hand.
pub const REASON_MANUAL_ARCHIVE: &str = "manual_archive";
/// Reason recorded when a user sends a transaction to the recycle bin.
pub const REASON_USER_DELETED: &str = "user_deleted";
/// Reason recorded when transactions are archived as part of a group
/// deletion.
pub const REASON_GROUP_DELETED: &str = "group_deleted";

const TRANSACTION_COLUMNS: &str = "id, group_id, created_by, paid_by, amount, note, category, \
     payment_mode, tx_type, date, created_at, updated_at";

const ARCHIVE_COLUMNS: &str = "id, original_transaction_id, group_id, group_name, created_by, \
     paid_by, amount, note, category, payment_mode, tx_type, date, created_at, archived_by, \
     archive_reason, archived_at";

const RECYCLE_COLUMNS: &str = "id, original_transaction_id, group_id, group_name, created_by, \
     paid_by, amount, note, category, payment_mode, tx_type, date, created_at, deleted_by, \
     deletion_reason, deleted_at";

/// Outcome of accepting a group invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationOutcome {
    /// Membership was created and the notification consumed.
    Joined,
    /// The user was already a member; the notification was consumed anyway.
    AlreadyMember,
}

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// All multi-row operations run inside a single database transaction.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store around an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trips a trivial query to check database connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] if the database is unreachable.
    pub async fn ping(&self) -> Result<(), ApiError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    // users

    /// Inserts a new account row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure, including unique
    /// violations that slipped past the service-level duplicate check.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user(
        &self,
        email: &str,
        username: &str,
        full_name: Option<&str>,
        password_hash: Option<&str>,
        google_id: Option<&str>,
        avatar_url: Option<&str>,
        auth_provider: &str,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, username, full_name, password_hash, google_id, avatar_url, auth_provider) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(email)
        .bind(username)
        .bind(full_name)
        .bind(password_hash)
        .bind(google_id)
        .bind(avatar_url)
        .bind(auth_provider)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Looks up a user by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Looks up a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Looks up a user by username.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Looks up a user by linked Google account id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = $1")
            .bind(google_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Attaches a Google account to an existing email account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn link_google_account(
        &self,
        user_id: i64,
        google_id: &str,
        avatar_url: Option<&str>,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET google_id = $2, avatar_url = COALESCE($3, avatar_url), \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(google_id)
        .bind(avatar_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    // groups

    /// Creates a group and enrolls the creator as its admin, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: i64,
    ) -> Result<Group, ApiError> {
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, Group>(
            "INSERT INTO groups (name, description, created_by) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO group_members (user_id, group_id, role) VALUES ($1, $2, 'admin')")
            .bind(created_by)
            .bind(group.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(group)
    }

    /// Lists the groups a user belongs to, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list_groups_for_user(&self, user_id: i64) -> Result<Vec<Group>, ApiError> {
        let groups = sqlx::query_as::<_, Group>(
            "SELECT g.* FROM groups g \
             JOIN group_members gm ON gm.group_id = g.id \
             WHERE gm.user_id = $1 ORDER BY g.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(groups)
    }

    /// Looks up a group by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn find_group(&self, group_id: i64) -> Result<Option<Group>, ApiError> {
        let group = sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(group)
    }

    /// Returns the user's role in the group, or `None` if not a member.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn member_role(
        &self,
        user_id: i64,
        group_id: i64,
    ) -> Result<Option<String>, ApiError> {
        let role = sqlx::query_scalar::<_, String>(
            "SELECT role FROM group_members WHERE user_id = $1 AND group_id = $2",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    /// Whether the user belongs to the group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn is_member(&self, user_id: i64, group_id: i64) -> Result<bool, ApiError> {
        Ok(self.member_role(user_id, group_id).await?.is_some())
    }

    /// Updates a group's name and description.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn update_group(
        &self,
        group_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Group, ApiError> {
        let group = sqlx::query_as::<_, Group>(
            "UPDATE groups SET name = $2, description = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(group_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(group)
    }

    /// Lists group members joined with their account fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn group_members(&self, group_id: i64) -> Result<Vec<MemberWithUser>, ApiError> {
        let members = sqlx::query_as::<_, MemberWithUser>(
            "SELECT u.id AS user_id, u.username, u.email, u.full_name, u.avatar_url, \
             gm.role, gm.joined_at \
             FROM group_members gm JOIN users u ON u.id = gm.user_id \
             WHERE gm.group_id = $1 ORDER BY gm.joined_at ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    /// Enrolls a user into a group with the given role.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure, including the
    /// unique violation raised when the user is already a member.
    pub async fn add_member(
        &self,
        group_id: i64,
        user_id: i64,
        role: &str,
    ) -> Result<GroupMember, ApiError> {
        let member = sqlx::query_as::<_, GroupMember>(
            "INSERT INTO group_members (user_id, group_id, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(user_id)
        .bind(group_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(member)
    }

    /// Aggregates transaction and member counts for one group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn group_stats(&self, group_id: i64) -> Result<GroupStats, ApiError> {
        let stats = sqlx::query_as::<_, GroupStats>(
            "SELECT \
               (SELECT COUNT(*) FROM transactions WHERE group_id = $1) AS transaction_count, \
               (SELECT COALESCE(SUM(amount), 0.0) FROM transactions \
                 WHERE group_id = $1 AND tx_type = 'EXPENSE') AS total_expense, \
               (SELECT COALESCE(SUM(amount), 0.0) FROM transactions \
                 WHERE group_id = $1 AND tx_type = 'INCOME') AS total_income, \
               (SELECT COUNT(*) FROM group_members WHERE group_id = $1) AS member_count",
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Deletes a group: archives its live transactions under
    /// [`REASON_GROUP_DELETED`], then removes transactions, memberships, and
    /// the group row, all atomically. Returns the archived rows.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn delete_group(
        &self,
        group_id: i64,
        deleted_by: i64,
    ) -> Result<Vec<ArchivedTransaction>, ApiError> {
        let mut tx = self.pool.begin().await?;

        let archived = sqlx::query_as::<_, ArchivedTransaction>(&format!(
            "INSERT INTO archived_transactions \
               (original_transaction_id, group_id, group_name, created_by, paid_by, amount, \
                note, category, payment_mode, tx_type, date, created_at, archived_by, archive_reason) \
             SELECT t.id, t.group_id, g.name, t.created_by, t.paid_by, t.amount, \
                t.note, t.category, t.payment_mode, t.tx_type, t.date, t.created_at, $2, $3 \
             FROM transactions t JOIN groups g ON g.id = t.group_id \
             WHERE t.group_id = $1 RETURNING {ARCHIVE_COLUMNS}"
        ))
        .bind(group_id)
        .bind(deleted_by)
        .bind(REASON_GROUP_DELETED)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM transactions WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM group_members WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(archived)
    }

    /// Hard-deletes every live transaction in a group, returning the count.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn clear_group_transactions(&self, group_id: i64) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM transactions WHERE group_id = $1")
            .bind(group_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // transactions

    /// Inserts one live transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn insert_transaction(&self, new: &NewTransaction) -> Result<Transaction, ApiError> {
        let tx = Self::bind_new_transaction(
            sqlx::query_as::<_, Transaction>(
                "INSERT INTO transactions \
                   (group_id, created_by, paid_by, amount, note, category, payment_mode, tx_type, date) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
            ),
            new,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(tx)
    }

    /// Inserts several transactions as one unit: either all rows land or
    /// none do.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn insert_transactions_bulk(
        &self,
        rows: &[NewTransaction],
    ) -> Result<Vec<Transaction>, ApiError> {
        let mut db_tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(rows.len());

        for new in rows {
            let row = Self::bind_new_transaction(
                sqlx::query_as::<_, Transaction>(
                    "INSERT INTO transactions \
                       (group_id, created_by, paid_by, amount, note, category, payment_mode, tx_type, date) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
                ),
                new,
            )
            .fetch_one(&mut *db_tx)
            .await?;
            inserted.push(row);
        }

        db_tx.commit().await?;
        Ok(inserted)
    }

    /// Lists a group's live transactions, newest date first, with the total
    /// row count for pagination.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list_group_transactions(
        &self,
        group_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<Transaction>, i64), ApiError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE group_id = $1")
                .bind(group_id)
                .fetch_one(&self.pool)
                .await?;

        let rows = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE group_id = $1 \
             ORDER BY date DESC, id DESC OFFSET $2 LIMIT $3",
        )
        .bind(group_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Lists live transactions across every group the user belongs to,
    /// newest date first, with the total row count for pagination.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list_user_transactions(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<Transaction>, i64), ApiError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM transactions t \
             JOIN group_members gm ON gm.group_id = t.group_id WHERE gm.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, Transaction>(
            "SELECT t.* FROM transactions t \
             JOIN group_members gm ON gm.group_id = t.group_id \
             WHERE gm.user_id = $1 \
             ORDER BY t.date DESC, t.id DESC OFFSET $2 LIMIT $3",
        )
        .bind(user_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Hard-deletes a live transaction. Returns `false` if no matching row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn delete_transaction_row(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Looks up a live transaction by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn find_transaction(&self, id: i64) -> Result<Option<Transaction>, ApiError> {
        let tx = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tx)
    }

    /// Overwrites the mutable fields of a live transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_transaction(
        &self,
        id: i64,
        group_id: i64,
        paid_by: Option<i64>,
        amount: f64,
        note: Option<&str>,
        category: Option<&str>,
        payment_mode: Option<&str>,
        tx_type: &str,
        date: NaiveDate,
    ) -> Result<Transaction, ApiError> {
        let tx = sqlx::query_as::<_, Transaction>(
            "UPDATE transactions SET group_id = $2, paid_by = $3, amount = $4, note = $5, \
             category = $6, payment_mode = $7, tx_type = $8, date = $9, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(group_id)
        .bind(paid_by)
        .bind(amount)
        .bind(note)
        .bind(category)
        .bind(payment_mode)
        .bind(tx_type)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(tx)
    }

    fn bind_new_transaction<'q>(
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, Transaction, sqlx::postgres::PgArguments>,
        new: &'q NewTransaction,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Transaction, sqlx::postgres::PgArguments> {
        query
            .bind(new.group_id)
            .bind(new.created_by)
            .bind(new.paid_by)
            .bind(new.amount)
            .bind(new.note.as_deref())
            .bind(new.category.as_deref())
            .bind(new.payment_mode.as_deref())
            .bind(new.tx_type.as_str())
            .bind(new.date)
    }

    // archive / recycle bin

    /// Moves a live transaction into the archive, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the row vanished between the
    /// service-level check and the move, or [`ApiError::Database`] on other
    /// failures.
    pub async fn archive_transaction(
        &self,
        transaction_id: i64,
        archived_by: i64,
        reason: &str,
    ) -> Result<ArchivedTransaction, ApiError> {
        let mut tx = self.pool.begin().await?;

        let archived = sqlx::query_as::<_, ArchivedTransaction>(&format!(
            "INSERT INTO archived_transactions \
               (original_transaction_id, group_id, group_name, created_by, paid_by, amount, \
                note, category, payment_mode, tx_type, date, created_at, archived_by, archive_reason) \
             SELECT t.id, t.group_id, g.name, t.created_by, t.paid_by, t.amount, \
                t.note, t.category, t.payment_mode, t.tx_type, t.date, t.created_at, $2, $3 \
             FROM transactions t JOIN groups g ON g.id = t.group_id \
             WHERE t.id = $1 RETURNING {ARCHIVE_COLUMNS}"
        ))
        .bind(transaction_id)
        .bind(archived_by)
        .bind(reason)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("transaction not found".to_string()))?;

        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(archived)
    }

    /// Moves a live transaction into the recycle bin, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the row vanished between the
    /// service-level check and the move, or [`ApiError::Database`] on other
    /// failures.
    pub async fn recycle_transaction(
        &self,
        transaction_id: i64,
        deleted_by: i64,
        reason: &str,
    ) -> Result<DeletedTransaction, ApiError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query_as::<_, DeletedTransaction>(&format!(
            "INSERT INTO deleted_transactions \
               (original_transaction_id, group_id, group_name, created_by, paid_by, amount, \
                note, category, payment_mode, tx_type, date, created_at, deleted_by, deletion_reason) \
             SELECT t.id, t.group_id, g.name, t.created_by, t.paid_by, t.amount, \
                t.note, t.category, t.payment_mode, t.tx_type, t.date, t.created_at, $2, $3 \
             FROM transactions t JOIN groups g ON g.id = t.group_id \
             WHERE t.id = $1 RETURNING {RECYCLE_COLUMNS}"
        ))
        .bind(transaction_id)
        .bind(deleted_by)
        .bind(reason)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("transaction not found".to_string()))?;

        sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted)
    }

    /// Lists transactions a user has archived, newest move first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list_archived(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<ArchivedTransaction>, i64), ApiError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM archived_transactions WHERE archived_by = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ArchivedTransaction>(
            "SELECT * FROM archived_transactions WHERE archived_by = $1 \
             ORDER BY archived_at DESC, id DESC OFFSET $2 LIMIT $3",
        )
        .bind(user_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Lists transactions a user has recycled, newest move first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list_recycled(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<DeletedTransaction>, i64), ApiError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM deleted_transactions WHERE deleted_by = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, DeletedTransaction>(
            "SELECT * FROM deleted_transactions WHERE deleted_by = $1 \
             ORDER BY deleted_at DESC, id DESC OFFSET $2 LIMIT $3",
        )
        .bind(user_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Looks up an archived transaction owned by the given archiver.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn find_archived(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<ArchivedTransaction>, ApiError> {
        let row = sqlx::query_as::<_, ArchivedTransaction>(
            "SELECT * FROM archived_transactions WHERE id = $1 AND archived_by = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Looks up a recycled transaction owned by the given deleter.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn find_recycled(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<DeletedTransaction>, ApiError> {
        let row = sqlx::query_as::<_, DeletedTransaction>(
            "SELECT * FROM deleted_transactions WHERE id = $1 AND deleted_by = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Moves an archived transaction back into its group, atomically.
    ///
    /// The restored row gets a fresh id; the archive row is removed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the archive row vanished, or
    /// [`ApiError::Database`] on other failures.
    pub async fn restore_archived(&self, id: i64) -> Result<Transaction, ApiError> {
        let mut tx = self.pool.begin().await?;

        let restored = sqlx::query_as::<_, Transaction>(&format!(
            "INSERT INTO transactions \
               (group_id, created_by, paid_by, amount, note, category, payment_mode, tx_type, date) \
             SELECT a.group_id, a.created_by, a.paid_by, a.amount, a.note, a.category, \
                a.payment_mode, a.tx_type, a.date \
             FROM archived_transactions a WHERE a.id = $1 RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("archived transaction not found".to_string()))?;

        sqlx::query("DELETE FROM archived_transactions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(restored)
    }

    /// Moves a recycled transaction back into its group, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the recycle-bin row vanished, or
    /// [`ApiError::Database`] on other failures.
    pub async fn restore_recycled(&self, id: i64) -> Result<Transaction, ApiError> {
        let mut tx = self.pool.begin().await?;

        let restored = sqlx::query_as::<_, Transaction>(&format!(
            "INSERT INTO transactions \
               (group_id, created_by, paid_by, amount, note, category, payment_mode, tx_type, date) \
             SELECT d.group_id, d.created_by, d.paid_by, d.amount, d.note, d.category, \
                d.payment_mode, d.tx_type, d.date \
             FROM deleted_transactions d WHERE d.id = $1 RETURNING {TRANSACTION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("deleted transaction not found".to_string()))?;

        sqlx::query("DELETE FROM deleted_transactions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(restored)
    }

    /// Permanently removes an archived transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn purge_archived(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM archived_transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently removes a recycled transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn purge_recycled(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM deleted_transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // notifications

    /// Delivers a notification to one user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn insert_notification(
        &self,
        user_id: i64,
        title: &str,
        message: &str,
        notification_type: &str,
        is_actionable: bool,
        action_data: Option<&serde_json::Value>,
    ) -> Result<Notification, ApiError> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, title, message, notification_type, is_actionable, action_data) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .bind(message)
        .bind(notification_type)
        .bind(is_actionable)
        .bind(action_data)
        .fetch_one(&self.pool)
        .await?;
        Ok(notification)
    }

    /// Lists a user's notifications, newest first, with total and unread
    /// counts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn list_notifications(
        &self,
        user_id: i64,
        skip: i64,
        limit: i64,
        unread_only: bool,
    ) -> Result<(Vec<Notification>, i64, i64), ApiError> {
        let filter = if unread_only {
            "user_id = $1 AND is_read = FALSE"
        } else {
            "user_id = $1"
        };

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM notifications WHERE {filter}"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        let unread = self.unread_notification_count(user_id).await?;

        let rows = sqlx::query_as::<_, Notification>(&format!(
            "SELECT * FROM notifications WHERE {filter} \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3"
        ))
        .bind(user_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total, unread))
    }

    /// Counts a user's unread notifications.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn unread_notification_count(&self, user_id: i64) -> Result<i64, ApiError> {
        let unread = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(unread)
    }

    /// Looks up a notification belonging to the given recipient.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn find_notification(
        &self,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Notification>, ApiError> {
        let notification = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(notification)
    }

    /// Marks one notification as read. Returns `false` if no matching row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<bool, ApiError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Marks all of a user's notifications as read, returning the count.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64, ApiError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Deletes one notification. Returns `false` if no matching row.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn delete_notification(&self, id: i64, user_id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Accepts a group invitation: creates the membership and consumes the
    /// notification in one unit. If the user already belongs to the group
    /// the notification is still consumed and
    /// [`InvitationOutcome::AlreadyMember`] is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn accept_group_invitation(
        &self,
        notification_id: i64,
        user_id: i64,
        group_id: i64,
    ) -> Result<InvitationOutcome, ApiError> {
        let mut tx = self.pool.begin().await?;

        let already_member = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM group_members WHERE user_id = $1 AND group_id = $2",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_optional(&mut *tx)
        .await?
        .is_some();

        if !already_member {
            sqlx::query(
                "INSERT INTO group_members (user_id, group_id, role) VALUES ($1, $2, 'member')",
            )
            .bind(user_id)
            .bind(group_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(notification_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(if already_member {
            InvitationOutcome::AlreadyMember
        } else {
            InvitationOutcome::Joined
        })
    }

    // dashboard

    /// Aggregates cross-group figures for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn dashboard_stats(&self, user_id: i64) -> Result<DashboardStats, ApiError> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            "SELECT \
               (SELECT COUNT(*) FROM group_members WHERE user_id = $1) AS total_groups, \
               (SELECT COUNT(*) FROM transactions t \
                  JOIN group_members gm ON gm.group_id = t.group_id \
                  WHERE gm.user_id = $1) AS total_transactions, \
               (SELECT COALESCE(SUM(t.amount), 0.0) FROM transactions t \
                  JOIN group_members gm ON gm.group_id = t.group_id \
                  WHERE gm.user_id = $1) AS total_amount, \
               (SELECT COUNT(*) FROM transactions t \
                  JOIN group_members gm ON gm.group_id = t.group_id \
                  WHERE gm.user_id = $1 AND t.created_at > NOW() - INTERVAL '7 days') \
                  AS recent_activity_count",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Summarizes every group the user belongs to: owner name plus member,
    /// transaction, and amount figures.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn group_summaries(&self, user_id: i64) -> Result<Vec<GroupSummary>, ApiError> {
        let rows = sqlx::query_as::<_, GroupSummary>(
            "SELECT g.id, g.name, g.description, g.created_by, u.username AS owner_name, \
               (SELECT COUNT(*) FROM group_members m WHERE m.group_id = g.id) AS member_count, \
               (SELECT COUNT(*) FROM transactions t WHERE t.group_id = g.id) \
                  AS transaction_count, \
               (SELECT COALESCE(SUM(t.amount), 0.0) FROM transactions t \
                  WHERE t.group_id = g.id) AS total_amount \
             FROM groups g \
             JOIN group_members gm ON gm.group_id = g.id \
             JOIN users u ON u.id = g.created_by \
             WHERE gm.user_id = $1 \
             ORDER BY g.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Lists the most recent transactions across all of a user's groups.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Database`] on database failure.
    pub async fn recent_transactions(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<TransactionWithGroup>, ApiError> {
        let rows = sqlx::query_as::<_, TransactionWithGroup>(
            "SELECT t.id, t.group_id, g.name AS group_name, t.created_by, t.paid_by, t.amount, \
                t.note, t.category, t.payment_mode, t.tx_type, t.date, t.created_at \
             FROM transactions t \
             JOIN groups g ON g.id = t.group_id \
             JOIN group_members gm ON gm.group_id = t.group_id \
             WHERE gm.user_id = $1 \
             ORDER BY t.created_at DESC, t.id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
