//! Request identity and credential handling.
//!
//! Password hashing, JWT issuance/verification, and the [`CurrentUser`]
//! extractor that every authenticated handler takes as an argument.

pub mod extractor;
pub mod google;
pub mod password;
pub mod token;

pub use extractor::CurrentUser;
pub use token::{AccessClaims, GoogleClaims, TokenPair};
