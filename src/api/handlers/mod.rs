//! REST endpoint handlers organized by resource.

pub mod archive;
pub mod auth;
pub mod dashboard;
pub mod extract;
pub mod group;
pub mod notification;
pub mod system;
pub mod transaction;

use axum::routing::get;
use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(group::routes())
        .merge(transaction::routes())
        .merge(archive::routes())
        .merge(notification::routes())
        .merge(dashboard::routes())
        .merge(extract::routes())
        .route("/constants", get(system::constants_handler))
}
