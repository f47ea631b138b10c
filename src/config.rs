//! Backend configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). `DATABASE_URL` and `JWT_SECRET` are
//! required; everything else falls back to a development default.

use std::net::SocketAddr;

/// Top-level backend configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// HMAC secret for signing access and refresh tokens.
    pub jwt_secret: String,

    /// Access token lifetime in minutes.
    pub access_token_expire_minutes: i64,

    /// Refresh token lifetime in days.
    pub refresh_token_expire_days: i64,

    /// Google OAuth client id.
    pub google_client_id: String,

    /// Google OAuth client secret.
    pub google_client_secret: String,

    /// Redirect URI registered with the OAuth client.
    pub google_redirect_uri: String,

    /// CORS origin allow-list; `None` means allow any origin.
    pub cors_allowed_origins: Option<Vec<String>>,

    /// Base URL of the external AI completion API.
    pub ai_api_url: String,

    /// Optional bearer key forwarded to the AI completion API.
    pub ai_api_key: Option<String>,

    /// Timeout in seconds for a single AI completion call.
    pub ai_timeout_secs: u64,

    /// Whether the periodic self-health poller runs.
    pub health_poll_enabled: bool,

    /// Seconds between self-health polls.
    pub health_poll_interval_secs: u64,

    /// Whether auth cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `JWT_SECRET` is missing, or
    /// if `LISTEN_ADDR` is set but cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".into()));

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
            database_min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 2),
            database_connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5),
            jwt_secret,
            access_token_expire_minutes: parse_env("ACCESS_TOKEN_EXPIRE_MINUTES", 30),
            refresh_token_expire_days: parse_env("REFRESH_TOKEN_EXPIRE_DAYS", 7),
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            google_redirect_uri: std::env::var("GOOGLE_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:3000/auth/callback".to_string()),
            cors_allowed_origins,
            ai_api_url: std::env::var("AI_API_URL")
                .unwrap_or_else(|_| "http://localhost:9000/chat".to_string()),
            ai_api_key: std::env::var("AI_API_KEY").ok(),
            ai_timeout_secs: parse_env("AI_TIMEOUT_SECS", 120),
            health_poll_enabled: parse_env_bool("HEALTH_POLL_ENABLED", false),
            health_poll_interval_secs: parse_env("HEALTH_POLL_INTERVAL_SECS", 300),
            cookie_secure: parse_env_bool("COOKIE_SECURE", false),
        })
    }

    /// Base URL the self-health poller targets, derived from the listen
    /// address (a wildcard bind is polled via loopback).
    #[must_use]
    pub fn self_base_url(&self) -> String {
        let ip = self.listen_addr.ip();
        let host = if ip.is_unspecified() {
            "localhost".to_string()
        } else {
            ip.to_string()
        };
        format!("http://{host}:{}", self.listen_addr.port())
    }
}

#[cfg(test)]
impl AppConfig {
    /// A fixed configuration for unit tests; no environment access.
    pub(crate) fn for_tests() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".parse().unwrap(),
            database_url: String::new(),
            database_max_connections: 10,
            database_min_connections: 2,
            database_connect_timeout_secs: 5,
            jwt_secret: "unit-test-secret".into(),
            access_token_expire_minutes: 30,
            refresh_token_expire_days: 7,
            google_client_id: String::new(),
            google_client_secret: String::new(),
            google_redirect_uri: String::new(),
            cors_allowed_origins: None,
            ai_api_url: String::new(),
            ai_api_key: None,
            ai_timeout_secs: 120,
            health_poll_enabled: false,
            health_poll_interval_secs: 300,
            cookie_secure: false,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}

/// Parses the CORS origin list: `"*"` means any origin, otherwise a
/// comma-separated allow-list.
fn parse_origins(raw: &str) -> Option<Vec<String>> {
    let value = raw.trim();
    if value == "*" || value.is_empty() {
        return None;
    }
    Some(
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_origins_mean_any() {
        assert!(parse_origins("*").is_none());
        assert!(parse_origins("").is_none());
    }

    #[test]
    fn origin_list_is_split_and_trimmed() {
        let origins = parse_origins("http://localhost:3000, https://tally.app");
        assert_eq!(
            origins,
            Some(vec![
                "http://localhost:3000".to_string(),
                "https://tally.app".to_string()
            ])
        );
    }

    #[test]
    fn self_base_url_rewrites_wildcard_bind() {
        let mut config = AppConfig::for_tests();
        config.listen_addr = "0.0.0.0:8000".parse().unwrap();
        assert_eq!(config.self_base_url(), "http://localhost:8000");
    }
}
