//! Google OAuth 2.0 authorization-code flow.

use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::ApiError;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

/// Builds the Google consent-screen URL the client should redirect to.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the endpoint URL cannot be built.
pub fn authorization_url(config: &AppConfig) -> Result<String, ApiError> {
    let url = reqwest::Url::parse_with_params(
        AUTH_ENDPOINT,
        &[
            ("client_id", config.google_client_id.as_str()),
            ("redirect_uri", config.google_redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("access_type", "offline"),
            ("prompt", "select_account"),
        ],
    )
    .map_err(|e| ApiError::Internal(format!("failed to build Google auth URL: {e}")))?;
    Ok(url.to_string())
}

/// Exchanges an authorization code for the Google ID token.
///
/// # Errors
///
/// Returns [`ApiError::Upstream`] when Google is unreachable or rejects the
/// code.
pub async fn exchange_code(config: &AppConfig, code: &str) -> Result<String, ApiError> {
    let response = reqwest::Client::new()
        .post(TOKEN_ENDPOINT)
        .form(&[
            ("code", code),
            ("client_id", config.google_client_id.as_str()),
            ("client_secret", config.google_client_secret.as_str()),
            ("redirect_uri", config.google_redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("Google token endpoint unreachable: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Upstream(format!(
            "Google rejected the authorization code (status {status})"
        )));
    }

    let tokens: TokenResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Upstream(format!("unexpected Google token reply: {e}")))?;
    Ok(tokens.id_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn authorization_url_encodes_parameters() {
        let mut config = AppConfig::for_tests();
        config.google_client_id = "client-123".into();
        config.google_redirect_uri = "http://localhost:8000/api/v1/auth/google/callback".into();

        let url = authorization_url(&config).unwrap();
        assert!(url.starts_with(AUTH_ENDPOINT));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("scope=openid+email+profile") || url.contains("scope=openid%20email%20profile"));
        assert!(!url.contains("http://localhost:8000/api"));
    }
}
