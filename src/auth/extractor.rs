//! Axum extractor resolving the authenticated user for a request.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::app_state::AppState;
use crate::auth::token;
use crate::error::ApiError;
use crate::persistence::models::User;

/// Name of the cookie carrying the access token for browser clients.
pub const AUTH_COOKIE: &str = "auth_token";

/// Name of the cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// The authenticated user behind the current request.
///
/// Resolved from the `Authorization: Bearer` header, falling back to the
/// `auth_token` cookie. Rejection is a 401 in the standard error envelope.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// The user's id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or_else(|| ApiError::Unauthorized("not authenticated".to_string()))?;

        let user_id = token::verify_access_token(&token, &state.config)?;
        let user = state
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("user not found".to_string()))?;
        if !user.is_active {
            return Err(ApiError::Unauthorized("inactive user".to_string()));
        }
        Ok(Self(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
}

fn cookie_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_name: &str, header_value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .header(header_name, header_value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn bearer_header_wins() {
        let parts = parts_with("authorization", "Bearer abc123");
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc123"));
    }

    #[test]
    fn non_bearer_scheme_is_ignored() {
        let parts = parts_with("authorization", "Basic dXNlcjpwYXNz");
        assert!(bearer_token(&parts).is_none());
    }

    #[test]
    fn cookie_fallback_reads_auth_token() {
        let parts = parts_with("cookie", "auth_token=tok-from-cookie; other=1");
        assert_eq!(cookie_token(&parts).as_deref(), Some("tok-from-cookie"));
    }
}
