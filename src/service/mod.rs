//! Service layer: orchestrates validation, permission checks, and storage.
//!
//! Handlers stay thin; every rule about who may do what, and every
//! cross-entity unit of work, lives here.

pub mod account;
pub mod archive;
pub mod dashboard;
pub mod extraction;
pub mod group;
pub mod health_poller;
pub mod notification;
pub mod transaction;
