//! DTOs for the AI text-extraction endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ExtractedTransaction;

/// Request body for `POST /extract`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ExtractRequest {
    /// Free-form text describing one or more transactions.
    pub text: String,
}

/// One transaction draft extracted from text. Drafts are suggestions; the
/// client records them through the normal transaction endpoints.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ExtractedTransactionDto {
    /// Monetary amount.
    pub amount: f64,
    /// Description of the transaction.
    pub note: String,
    /// Category from the fixed vocabulary.
    pub category: Option<String>,
    /// Payment mode from the fixed vocabulary.
    pub payment_mode: Option<String>,
    /// `"INCOME"` or `"EXPENSE"`.
    #[serde(rename = "type")]
    pub tx_type: String,
    /// Resolved transaction date.
    pub date: NaiveDate,
}

impl From<ExtractedTransaction> for ExtractedTransactionDto {
    fn from(draft: ExtractedTransaction) -> Self {
        Self {
            amount: draft.amount,
            note: draft.note,
            category: draft.category,
            payment_mode: draft.payment_mode,
            tx_type: draft.tx_type.as_str().to_string(),
            date: draft.date,
        }
    }
}

/// Response body for `POST /extract`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ExtractResponse {
    /// Extracted drafts.
    pub transactions: Vec<ExtractedTransactionDto>,
    /// Number of drafts.
    pub count: usize,
}
