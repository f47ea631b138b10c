//! Transaction vocabulary: type discriminator, category and payment-mode
//! enumerations, and field bounds shared by the API boundary, the CSV
//! importer, and the AI extraction validator.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Income/expense discriminator stored with every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money coming into the group ledger (salary, payment received).
    Income,
    /// Money going out of the group ledger.
    Expense,
}

impl TransactionType {
    /// Returns the canonical string form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Parses the canonical string form (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for anything other than
    /// `INCOME`/`EXPENSE`.
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(ApiError::Validation(format!(
                "unknown transaction type: {other}"
            ))),
        }
    }

    /// Lenient parse used for AI output: unknown or missing types default
    /// to [`TransactionType::Expense`].
    #[must_use]
    pub fn parse_or_expense(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Expense)
    }
}

/// Fixed category vocabulary (mirrors the frontend picker).
pub const CATEGORIES: [&str; 12] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Healthcare",
    "Education",
    "Utilities",
    "Rent",
    "Salary",
    "Freelance",
    "Investment",
    "Other",
];

/// Fixed payment-mode vocabulary (mirrors the frontend picker).
pub const PAYMENT_MODES: [&str; 7] = [
    "Cash",
    "UPI",
    "Credit Card",
    "Debit Card",
    "Bank Transfer",
    "Digital Wallet",
    "Other",
];

/// Smallest accepted transaction amount.
pub const MIN_AMOUNT: f64 = 0.01;
/// Largest accepted transaction amount.
pub const MAX_AMOUNT: f64 = 999_999_999.99;
/// Longest accepted free-text note.
pub const MAX_NOTE_LENGTH: usize = 500;

/// Checks that an optional category is in the fixed vocabulary.
///
/// An absent category is valid; only a present-but-unknown value fails.
#[must_use]
pub fn validate_category(category: Option<&str>) -> bool {
    match category {
        None => true,
        Some(value) => CATEGORIES.contains(&value),
    }
}

/// Checks that an optional payment mode is in the fixed vocabulary.
#[must_use]
pub fn validate_payment_mode(payment_mode: Option<&str>) -> bool {
    match payment_mode {
        None => true,
        Some(value) => PAYMENT_MODES.contains(&value),
    }
}

/// Validates an amount against the accepted range.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the amount is not a positive
/// finite number within bounds.
pub fn validate_amount(amount: f64) -> Result<(), ApiError> {
    if !amount.is_finite() || amount < MIN_AMOUNT || amount > MAX_AMOUNT {
        return Err(ApiError::Validation(format!(
            "amount must be between {MIN_AMOUNT} and {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_round_trips_canonical_strings() {
        assert_eq!(TransactionType::parse("INCOME").unwrap().as_str(), "INCOME");
        assert_eq!(
            TransactionType::parse("expense").unwrap(),
            TransactionType::Expense
        );
        assert!(TransactionType::parse("TRANSFER").is_err());
    }

    #[test]
    fn unknown_type_defaults_to_expense() {
        assert_eq!(
            TransactionType::parse_or_expense("refund"),
            TransactionType::Expense
        );
        assert_eq!(
            TransactionType::parse_or_expense("income"),
            TransactionType::Income
        );
    }

    #[test]
    fn category_vocabulary_is_closed() {
        assert!(validate_category(None));
        assert!(validate_category(Some("Food & Dining")));
        assert!(!validate_category(Some("Groceries")));
    }

    #[test]
    fn payment_mode_vocabulary_is_closed() {
        assert!(validate_payment_mode(Some("UPI")));
        assert!(!validate_payment_mode(Some("Cheque")));
    }

    #[test]
    fn amount_bounds_are_enforced() {
        assert!(validate_amount(50.0).is_ok());
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(1_000_000_000.0).is_err());
    }
}
