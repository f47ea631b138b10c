//! Periodic self-health poller.
//!
//! Hits the service's own `/health` and `/health/db` endpoints on an
//! interval and logs the outcome. Failures are log-only; the poller never
//! takes the service down.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::AppConfig;

/// Spawns the poller task. Returns the handle so shutdown can abort it.
pub fn spawn(config: &AppConfig) -> JoinHandle<()> {
    let base_url = config.self_base_url();
    let period = Duration::from_secs(config.health_poll_interval_secs.max(1));

    tokio::spawn(async move {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "health poller could not build its client");
                return;
            }
        };

        let mut ticker = tokio::time::interval(period);
        // The first tick fires immediately; skip it so the server is up.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            for path in ["/health", "/health/db"] {
                check(&client, &base_url, path).await;
            }
        }
    })
}

async fn check(client: &reqwest::Client, base_url: &str, path: &str) {
    let url = format!("{base_url}{path}");
    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::debug!(%url, "health poll ok");
        }
        Ok(response) => {
            tracing::warn!(%url, status = %response.status(), "health poll failed");
        }
        Err(e) => {
            tracing::warn!(%url, error = %e, "health poll unreachable");
        }
    }
}
