//! # tally-api
//!
//! REST API backend for Tally, a shared-expense tracker. Users form
//! groups, record income and expense transactions against them, and move
//! rows through an archive/recycle-bin lifecycle instead of destroying
//! them. Free-form text can be turned into transaction drafts through an
//! external AI completion API.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers + DTOs (api/)
//!     ├── CurrentUser extractor (auth/)
//!     │
//!     ├── Services (service/): permissions, validation, orchestration
//!     ├── Domain vocabulary + AI parsing (domain/)
//!     ├── CompletionClient (ai/)
//!     │
//!     └── PostgresStore (persistence/)
//! ```

pub mod ai;
pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
