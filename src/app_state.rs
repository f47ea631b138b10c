//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::ai::CompletionClient;
use crate::config::AppConfig;
use crate::persistence::PostgresStore;

/// Cheap-to-clone handle bundling the store, configuration, and the AI
/// completion client.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database access.
    pub store: PostgresStore,
    /// Runtime configuration.
    pub config: Arc<AppConfig>,
    /// Outbound AI completion API client.
    pub ai: CompletionClient,
}

impl AppState {
    /// Assembles the state from its parts.
    #[must_use]
    pub fn new(store: PostgresStore, config: AppConfig, ai: CompletionClient) -> Self {
        Self {
            store,
            config: Arc::new(config),
            ai,
        }
    }
}
