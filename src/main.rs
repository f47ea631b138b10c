//! tally-api server entry point.
//!
//! Loads configuration, runs migrations, and starts the Axum HTTP server.

use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tally_api::ai::CompletionClient;
use tally_api::api;
use tally_api::app_state::AppState;
use tally_api::config::AppConfig;
use tally_api::persistence::{self, PostgresStore};
use tally_api::service::health_poller;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting tally-api");

    // Database: pool + migrations
    let pool = persistence::create_pool(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("migrations applied");

    // Outbound AI client
    let ai = CompletionClient::new(
        &config.ai_api_url,
        config.ai_api_key.as_deref(),
        Duration::from_secs(config.ai_timeout_secs),
    )?;

    // Application state
    let listen_addr = config.listen_addr;
    let poller = config.health_poll_enabled.then(|| health_poller::spawn(&config));
    let app_state = AppState::new(PostgresStore::new(pool), config, ai);

    // Router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&app_state))
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app).await?;

    if let Some(poller) = poller {
        poller.abort();
    }
    Ok(())
}

/// Builds the CORS layer: permissive when no allow-list is configured,
/// otherwise restricted to the configured origins.
fn cors_layer(state: &AppState) -> CorsLayer {
    match &state.config.cors_allowed_origins {
        None => CorsLayer::permissive(),
        Some(origins) => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any)
        }
    }
}
