//! Auth DTOs: registration, login, refresh, and Google sign-in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::models::User;

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Login email; must be unique.
    pub email: String,
    /// Display handle; must be unique.
    pub username: String,
    /// Optional full name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Plaintext password (min 8 chars); hashed before storage.
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Request body for `POST /auth/refresh`. The token may instead arrive in
/// the `refresh_token` cookie.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RefreshRequest {
    /// The refresh token, when not sent as a cookie.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Request body for `POST /auth/google/callback`: the code the client
/// received from Google's redirect.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct GoogleCallbackRequest {
    /// The authorization code to exchange.
    pub code: String,
}

/// Response body for `GET /auth/google/url`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct GoogleUrlResponse {
    /// Consent-screen URL the client should redirect to.
    pub auth_url: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct UserDto {
    /// User id.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Display handle.
    pub username: String,
    /// Full name, if set.
    pub full_name: Option<String>,
    /// Avatar URL, if set.
    pub avatar_url: Option<String>,
    /// `"email"` or `"google"`.
    pub auth_provider: String,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            auth_provider: user.auth_provider,
            created_at: user.created_at,
        }
    }
}

/// Response body for every endpoint that signs the user in.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    /// The signed-in account.
    pub user: UserDto,
}

impl AuthResponse {
    /// Bundles a token pair with the account it belongs to.
    #[must_use]
    pub fn new(tokens: crate::auth::TokenPair, user: User) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "bearer".to_string(),
            user: user.into(),
        }
    }
}
