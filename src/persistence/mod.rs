//! Persistence layer: PostgreSQL storage for every entity.
//!
//! [`PostgresStore`](postgres::PostgresStore) is the only writer of rows.
//! Multi-row units of work (archive/delete/restore moves, group creation
//! and deletion cascades, bulk inserts, invitation acceptance) each run
//! inside one database transaction so no partial state is ever observable.

pub mod models;
pub mod postgres;

pub use postgres::PostgresStore;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::AppConfig;

/// Builds the connection pool from configuration.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if the database is unreachable.
pub async fn create_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(std::time::Duration::from_secs(
            config.database_connect_timeout_secs,
        ))
        .connect(&config.database_url)
        .await
}
