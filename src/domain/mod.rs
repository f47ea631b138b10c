//! Pure domain types: transaction vocabulary and AI-extraction validation.
//!
//! Nothing in this module touches the database or the network; it is the
//! layer both the services and the API boundary validate against.

pub mod extraction;
pub mod transaction;

pub use extraction::{
    ExtractedTransaction, build_prompt, clean_json_payload, parse_extraction_response, resolve_date,
};
pub use transaction::{
    CATEGORIES, MAX_AMOUNT, MAX_NOTE_LENGTH, MIN_AMOUNT, PAYMENT_MODES, TransactionType,
    validate_amount, validate_category, validate_payment_mode,
};
