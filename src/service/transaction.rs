//! Transaction service: create, list, update, delete, bulk insert, CSV
//! import.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};

use crate::domain::{
    validate_amount, validate_category, validate_payment_mode, TransactionType, MAX_NOTE_LENGTH,
};
use crate::error::ApiError;
use crate::persistence::models::{NewTransaction, Transaction, User};
use crate::persistence::PostgresStore;

/// Upper bound on rows accepted by one bulk or CSV request.
pub const MAX_BULK_ROWS: usize = 500;

/// One incoming transaction, before validation.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    /// Group the row belongs to.
    pub group_id: i64,
    /// Monetary amount.
    pub amount: f64,
    /// Free-text note.
    pub note: Option<String>,
    /// Spending category.
    pub category: Option<String>,
    /// Payment instrument.
    pub payment_mode: Option<String>,
    /// `INCOME`/`EXPENSE`; defaults to `EXPENSE` when absent.
    pub tx_type: Option<String>,
    /// Transaction date; defaults to today when absent.
    pub date: Option<NaiveDate>,
    /// Member the money is attributed to.
    pub paid_by: Option<i64>,
}

/// Orchestrates live-transaction operations.
///
/// Visibility: on reads, a missing group and a group the caller does not
/// belong to both come back as 404, and single rows in invisible groups
/// read as 404 too. On writes the group's existence is already conceded by
/// the request, so non-membership is a plain 403.
#[derive(Debug, Clone)]
pub struct TransactionService {
    store: PostgresStore,
}

impl TransactionService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: PostgresStore) -> Self {
        Self { store }
    }

    /// Records one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on out-of-vocabulary or
    /// out-of-range fields, [`ApiError::NotFound`] if the group does not
    /// exist, and [`ApiError::Forbidden`] if the caller is not a member.
    pub async fn create(&self, user: &User, input: &TransactionInput) -> Result<Transaction, ApiError> {
        self.require_membership(user, input.group_id).await?;
        let new = self.validated(user, input).await?;
        let tx = self.store.insert_transaction(&new).await?;
        tracing::info!(group_id = tx.group_id, transaction_id = tx.id, "transaction recorded");
        Ok(tx)
    }

    /// Records several transactions atomically. Every row must target the
    /// same group; any invalid row rejects the whole batch with its row
    /// number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] naming the first offending row.
    pub async fn create_bulk(
        &self,
        user: &User,
        inputs: &[TransactionInput],
    ) -> Result<Vec<Transaction>, ApiError> {
        if inputs.is_empty() {
            return Err(ApiError::Validation("no transactions provided".to_string()));
        }
        if inputs.len() > MAX_BULK_ROWS {
            return Err(ApiError::Validation(format!(
                "at most {MAX_BULK_ROWS} transactions per request"
            )));
        }
        let group_id = inputs[0].group_id;
        if inputs.iter().any(|input| input.group_id != group_id) {
            return Err(ApiError::Validation(
                "all rows must target the same group".to_string(),
            ));
        }
        self.require_membership(user, group_id).await?;

        let mut rows = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            let new = self
                .validated(user, input)
                .await
                .map_err(|e| prefix_row(index + 1, e))?;
            rows.push(new);
        }

        let inserted = self.store.insert_transactions_bulk(&rows).await?;
        tracing::info!(group_id, count = inserted.len(), "bulk insert");
        Ok(inserted)
    }

    /// Imports transactions from CSV bytes. The header row must carry
    /// `date,description,amount,type,category,payment_mode` (`note` is
    /// accepted in place of `description`), in any order, plus an optional
    /// `paid_by` column of display names resolved through
    /// `paid_by_mapping`. Any bad row aborts the import with its row
    /// number; nothing is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for unreadable CSV, missing
    /// columns, or invalid rows.
    pub async fn import_csv(
        &self,
        user: &User,
        group_id: i64,
        csv_bytes: &[u8],
        paid_by_mapping: &HashMap<String, i64>,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.require_membership(user, group_id).await?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(csv_bytes);
        let headers = reader
            .headers()
            .map_err(|e| ApiError::Validation(format!("unreadable CSV: {e}")))?
            .clone();
        validate_csv_headers(&headers)?;

        let mut inputs = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let row_number = index + 1;
            let record =
                record.map_err(|e| ApiError::Validation(format!("row {row_number}: {e}")))?;
            let input = csv_row_to_input(&headers, &record, group_id, paid_by_mapping)
                .map_err(|e| prefix_row(row_number, e))?;
            inputs.push(input);
        }

        let imported = self.create_bulk(user, &inputs).await?;
        tracing::info!(group_id, count = imported.len(), "csv import");
        Ok(imported)
    }

    /// Lists transactions, newest date first. With a group id the listing
    /// is scoped to that group; without one it spans every group the
    /// caller belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] when the caller cannot see the
    /// requested group.
    pub async fn list(
        &self,
        user: &User,
        group_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> Result<(Vec<Transaction>, i64), ApiError> {
        match group_id {
            Some(group_id) => {
                self.require_visible(user, group_id).await?;
                self.store.list_group_transactions(group_id, skip, limit).await
            }
            None => self.store.list_user_transactions(user.id, skip, limit).await,
        }
    }

    /// Fetches one transaction the caller may see.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the row is missing or belongs to
    /// a group the caller is not in.
    pub async fn get(&self, user: &User, transaction_id: i64) -> Result<Transaction, ApiError> {
        let tx = self
            .store
            .find_transaction(transaction_id)
            .await?
            .ok_or_else(transaction_not_found)?;
        if !self.store.is_member(user.id, tx.group_id).await? {
            return Err(transaction_not_found());
        }
        Ok(tx)
    }

    /// Replaces every mutable field of a transaction, moving it to another
    /// group when `input.group_id` differs. `paid_by` is validated against
    /// the target group's member set.
    ///
    /// # Errors
    ///
    /// Same validation as [`TransactionService::create`]; visibility as
    /// [`TransactionService::get`].
    pub async fn update(
        &self,
        user: &User,
        transaction_id: i64,
        input: &TransactionInput,
    ) -> Result<Transaction, ApiError> {
        let existing = self.get(user, transaction_id).await?;
        if input.group_id != existing.group_id {
            self.require_membership(user, input.group_id).await?;
        }
        let new = self.validated(user, input).await?;
        self.store
            .update_transaction(
                transaction_id,
                new.group_id,
                new.paid_by,
                new.amount,
                new.note.as_deref(),
                new.category.as_deref(),
                new.payment_mode.as_deref(),
                &new.tx_type,
                new.date,
            )
            .await
    }

    /// Hard-deletes a transaction the caller may see. Unlike the recycle
    /// bin, this leaves no provenance behind.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if missing or invisible to the
    /// caller.
    pub async fn delete(&self, user: &User, transaction_id: i64) -> Result<(), ApiError> {
        let existing = self.get(user, transaction_id).await?;
        if !self.store.delete_transaction_row(existing.id).await? {
            return Err(transaction_not_found());
        }
        tracing::info!(transaction_id, "transaction hard-deleted");
        Ok(())
    }

    /// Validates one input into an insertable row.
    async fn validated(&self, user: &User, input: &TransactionInput) -> Result<NewTransaction, ApiError> {
        validate_amount(input.amount)?;
        if !validate_category(input.category.as_deref()) {
            return Err(ApiError::Validation(format!(
                "unknown category: {}",
                input.category.as_deref().unwrap_or_default()
            )));
        }
        if !validate_payment_mode(input.payment_mode.as_deref()) {
            return Err(ApiError::Validation(format!(
                "unknown payment mode: {}",
                input.payment_mode.as_deref().unwrap_or_default()
            )));
        }
        if input.note.as_deref().is_some_and(|n| n.len() > MAX_NOTE_LENGTH) {
            return Err(ApiError::Validation(format!(
                "note must be at most {MAX_NOTE_LENGTH} characters"
            )));
        }

        let tx_type = match input.tx_type.as_deref() {
            Some(raw) => TransactionType::parse(raw)?,
            None => TransactionType::Expense,
        };

        if let Some(paid_by) = input.paid_by {
            if !self.store.is_member(paid_by, input.group_id).await? {
                return Err(ApiError::Validation(
                    "paid_by must be a member of the group".to_string(),
                ));
            }
        }

        Ok(NewTransaction {
            group_id: input.group_id,
            created_by: user.id,
            paid_by: input.paid_by,
            amount: input.amount,
            note: input.note.clone(),
            category: input.category.clone(),
            payment_mode: input.payment_mode.clone(),
            tx_type: tx_type.as_str().to_string(),
            date: input.date.unwrap_or_else(|| Utc::now().date_naive()),
        })
    }

    /// Membership gate for the write paths: a missing group is 404, an
    /// existing group the caller is not in is 403.
    async fn require_membership(&self, user: &User, group_id: i64) -> Result<(), ApiError> {
        let group_exists = self.store.find_group(group_id).await?.is_some();
        if group_exists && self.store.is_member(user.id, group_id).await? {
            return Ok(());
        }
        Err(membership_write_error(group_exists))
    }

    /// Group reads hide non-membership behind the same 404 as absence.
    async fn require_visible(&self, user: &User, group_id: i64) -> Result<(), ApiError> {
        if self.store.find_group(group_id).await?.is_none()
            || !self.store.is_member(user.id, group_id).await?
        {
            return Err(ApiError::NotFound("group not found".to_string()));
        }
        Ok(())
    }
}

fn membership_write_error(group_exists: bool) -> ApiError {
    if group_exists {
        ApiError::Forbidden("not a member of this group".to_string())
    } else {
        ApiError::NotFound("group not found".to_string())
    }
}

fn transaction_not_found() -> ApiError {
    ApiError::NotFound("transaction not found".to_string())
}

fn prefix_row(row_number: usize, error: ApiError) -> ApiError {
    match error {
        ApiError::Validation(message) => ApiError::Validation(format!("row {row_number}: {message}")),
        other => other,
    }
}

/// Columns every import must carry; `note` satisfies `description`.
const REQUIRED_CSV_HEADERS: [&str; 6] = [
    "date",
    "description",
    "amount",
    "type",
    "category",
    "payment_mode",
];

/// Rejects a CSV whose header row lacks any required column, naming the
/// missing ones.
fn validate_csv_headers(headers: &csv::StringRecord) -> Result<(), ApiError> {
    let has = |name: &str| headers.iter().any(|h| h.eq_ignore_ascii_case(name));
    let missing: Vec<&str> = REQUIRED_CSV_HEADERS
        .iter()
        .copied()
        .filter(|&name| !has(name) && !(name == "description" && has("note")))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "missing CSV columns: {}",
            missing.join(", ")
        )))
    }
}

/// Maps one CSV record onto an input using the header row, so column order
/// does not matter. `description` and `note` are interchangeable headers;
/// a `paid_by` cell holds a display name resolved through the mapping.
/// Unknown columns are ignored.
fn csv_row_to_input(
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
    group_id: i64,
    paid_by_mapping: &HashMap<String, i64>,
) -> Result<TransactionInput, ApiError> {
    let field = |name: &str| -> Option<String> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let amount = field("amount")
        .ok_or_else(|| ApiError::Validation("missing amount".to_string()))?
        .parse::<f64>()
        .map_err(|_| ApiError::Validation("amount is not a number".to_string()))?;

    let date = field("date")
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| ApiError::Validation(format!("bad date: {raw} (expected YYYY-MM-DD)")))
        })
        .transpose()?;

    let paid_by = field("paid_by")
        .map(|name| {
            paid_by_mapping
                .get(&name)
                .copied()
                .ok_or_else(|| ApiError::Validation(format!("unknown paid_by name: {name}")))
        })
        .transpose()?;

    Ok(TransactionInput {
        group_id,
        amount,
        note: field("description").or_else(|| field("note")),
        category: field("category"),
        payment_mode: field("payment_mode"),
        tx_type: field("type"),
        date,
        paid_by,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_csv_with(
        data: &str,
        mapping: &HashMap<String, i64>,
    ) -> Result<Vec<TransactionInput>, ApiError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        let headers = reader.headers().unwrap().clone();
        validate_csv_headers(&headers)?;
        reader
            .records()
            .enumerate()
            .map(|(i, r)| {
                let record = r.map_err(|e| ApiError::Validation(e.to_string()))?;
                csv_row_to_input(&headers, &record, 1, mapping).map_err(|e| prefix_row(i + 1, e))
            })
            .collect()
    }

    fn parse_csv(data: &str) -> Result<Vec<TransactionInput>, ApiError> {
        parse_csv_with(data, &HashMap::new())
    }

    #[test]
    fn csv_rows_map_by_header_name() {
        let rows = parse_csv(
            "amount,date,description,category,payment_mode,type\n\
             50.0,2026-08-01,lunch,Food & Dining,UPI,EXPENSE\n\
             1200,2026-08-02,salary,Salary,Bank Transfer,INCOME\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, 50.0);
        assert_eq!(rows[0].note.as_deref(), Some("lunch"));
        assert_eq!(rows[1].tx_type.as_deref(), Some("INCOME"));
    }

    #[test]
    fn csv_column_order_does_not_matter() {
        let rows = parse_csv(
            "note,amount,type,category,payment_mode,date\n\
             coffee,3.5,,,,\n",
        )
        .unwrap();
        assert_eq!(rows[0].amount, 3.5);
        assert_eq!(rows[0].note.as_deref(), Some("coffee"));
        assert!(rows[0].date.is_none());
    }

    #[test]
    fn csv_missing_columns_are_rejected_by_name() {
        let err = parse_csv("amount,date\n5.0,2026-08-01\n").unwrap_err();
        match err {
            ApiError::Validation(message) => {
                assert!(message.contains("missing CSV columns"));
                assert!(message.contains("type"));
                assert!(message.contains("category"));
                assert!(message.contains("payment_mode"));
                assert!(message.contains("description"));
                assert!(!message.contains("date"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn csv_note_header_satisfies_description() {
        assert!(parse_csv("date,note,amount,type,category,payment_mode\n2026-08-01,groceries,12.0,,,\n").is_ok());
    }

    #[test]
    fn csv_bad_amount_is_rejected_with_row_number() {
        let err = parse_csv(
            "date,description,amount,type,category,payment_mode\n\
             2026-08-01,lunch,fifty,,,\n",
        )
        .unwrap_err();
        match err {
            ApiError::Validation(message) => assert!(message.starts_with("row 1:")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn csv_bad_date_is_rejected() {
        assert!(parse_csv(
            "date,description,amount,type,category,payment_mode\n\
             01/08/2026,lunch,5.0,,,\n"
        )
        .is_err());
    }

    #[test]
    fn csv_description_header_maps_to_note() {
        let rows = parse_csv(
            "date,description,amount,type,category,payment_mode\n\
             2026-08-01,groceries,12.0,,,\n",
        )
        .unwrap();
        assert_eq!(rows[0].note.as_deref(), Some("groceries"));
    }

    #[test]
    fn csv_paid_by_names_resolve_through_mapping() {
        let mapping = HashMap::from([("alice".to_string(), 7_i64)]);
        let header = "date,description,amount,type,category,payment_mode,paid_by\n";
        let rows =
            parse_csv_with(&format!("{header}2026-08-01,dinner,9.0,,,,alice\n"), &mapping).unwrap();
        assert_eq!(rows[0].paid_by, Some(7));

        let err = parse_csv_with(&format!("{header}2026-08-01,dinner,9.0,,,,bob\n"), &mapping)
            .unwrap_err();
        match err {
            ApiError::Validation(message) => assert!(message.contains("bob")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn write_membership_failure_is_forbidden_when_group_exists() {
        match membership_write_error(true) {
            ApiError::Forbidden(message) => assert!(message.contains("member")),
            other => panic!("unexpected error: {other:?}"),
        }
        match membership_write_error(false) {
            ApiError::NotFound(message) => assert!(message.contains("group")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
