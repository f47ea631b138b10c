//! Account service: registration, login, Google sign-in, token refresh.

use std::sync::Arc;

use crate::auth::token::{self, GoogleClaims, TokenPair};
use crate::auth::{google, password};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::persistence::models::User;
use crate::persistence::PostgresStore;

const MIN_PASSWORD_LENGTH: usize = 8;
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;

/// Orchestrates everything that issues or refreshes credentials.
#[derive(Debug, Clone)]
pub struct AccountService {
    store: PostgresStore,
    config: Arc<AppConfig>,
}

impl AccountService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: PostgresStore, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// Registers an email/password account and signs the user in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] on malformed input and
    /// [`ApiError::Conflict`] when the email or username is taken.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        full_name: Option<&str>,
        plain_password: &str,
    ) -> Result<(User, TokenPair), ApiError> {
        validate_email(email)?;
        validate_username(username)?;
        if plain_password.len() < MIN_PASSWORD_LENGTH {
            return Err(ApiError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(ApiError::Conflict("email already registered".to_string()));
        }
        if self.store.find_user_by_username(username).await?.is_some() {
            return Err(ApiError::Conflict("username already taken".to_string()));
        }

        let hash = password::hash_password(plain_password)?;
        let user = self
            .store
            .create_user(email, username, full_name, Some(&hash), None, None, "email")
            .await?;
        let tokens = token::issue_token_pair(user.id, &self.config)?;

        tracing::info!(user_id = user.id, "account registered");
        Ok((user, tokens))
    }

    /// Verifies email/password credentials and issues a token pair.
    ///
    /// The same 401 is returned for an unknown email, a wrong password, and
    /// a password-less Google account, so login never confirms whether an
    /// email is registered.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] on any credential failure.
    pub async fn login(
        &self,
        email: &str,
        plain_password: &str,
    ) -> Result<(User, TokenPair), ApiError> {
        let invalid = || ApiError::Unauthorized("incorrect email or password".to_string());

        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(invalid)?;
        let hash = user.password_hash.as_deref().ok_or_else(invalid)?;
        if !password::verify_password(plain_password, hash) {
            return Err(invalid());
        }
        if !user.is_active {
            return Err(ApiError::Unauthorized("inactive user".to_string()));
        }

        let tokens = token::issue_token_pair(user.id, &self.config)?;
        tracing::info!(user_id = user.id, "login");
        Ok((user, tokens))
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] if the token is invalid or the
    /// account no longer exists or is inactive.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(User, TokenPair), ApiError> {
        let user_id = token::verify_refresh_token(refresh_token, &self.config)?;
        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("user not found".to_string()))?;
        if !user.is_active {
            return Err(ApiError::Unauthorized("inactive user".to_string()));
        }
        let tokens = token::issue_token_pair(user.id, &self.config)?;
        Ok((user, tokens))
    }

    /// Returns the consent-screen URL to start the Google sign-in flow.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the URL cannot be built.
    pub fn google_authorization_url(&self) -> Result<String, ApiError> {
        google::authorization_url(&self.config)
    }

    /// Completes the Google sign-in flow from an authorization code.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Upstream`] if the code exchange fails and
    /// [`ApiError::Validation`] if Google's ID token is undecodable.
    pub async fn google_callback(&self, code: &str) -> Result<(User, TokenPair), ApiError> {
        let id_token = google::exchange_code(&self.config, code).await?;
        let claims = token::decode_google_claims(&id_token)?;
        let user = self.upsert_google_user(&claims).await?;
        if !user.is_active {
            return Err(ApiError::Unauthorized("inactive user".to_string()));
        }
        let tokens = token::issue_token_pair(user.id, &self.config)?;
        tracing::info!(user_id = user.id, "google login");
        Ok((user, tokens))
    }

    /// Finds or creates the account behind a set of Google claims.
    ///
    /// Resolution order: existing Google link, then email match (which
    /// links the Google id to the account), then a fresh account with a
    /// username derived from the email.
    async fn upsert_google_user(&self, claims: &GoogleClaims) -> Result<User, ApiError> {
        if let Some(user) = self.store.find_user_by_google_id(&claims.sub).await? {
            return Ok(user);
        }
        if let Some(user) = self.store.find_user_by_email(&claims.email).await? {
            return self
                .store
                .link_google_account(user.id, &claims.sub, claims.picture.as_deref())
                .await;
        }

        let username = self.available_username(&claims.email).await?;
        self.store
            .create_user(
                &claims.email,
                &username,
                claims.name.as_deref(),
                None,
                Some(&claims.sub),
                claims.picture.as_deref(),
                "google",
            )
            .await
    }

    /// Derives a free username from the email's local part, appending a
    /// numeric suffix on collision.
    async fn available_username(&self, email: &str) -> Result<String, ApiError> {
        let base = sanitize_username(email.split('@').next().unwrap_or("user"));
        if self.store.find_user_by_username(&base).await?.is_none() {
            return Ok(base);
        }
        for suffix in 1..100 {
            let candidate = format!("{base}{suffix}");
            if self.store.find_user_by_username(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(ApiError::Conflict("could not derive a username".to_string()))
    }
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let looks_valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if looks_valid {
        Ok(())
    } else {
        Err(ApiError::Validation("invalid email address".to_string()))
    }
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    let length_ok = (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&username.len());
    let charset_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-');
    if length_ok && charset_ok {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters of letters, digits, '_', '.', or '-'"
        )))
    }
}

fn sanitize_username(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.' || *c == '-')
        .collect();
    if cleaned.len() < MIN_USERNAME_LENGTH {
        format!("user{cleaned}")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_requires_at_and_domain_dot() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@localhost").is_err());
    }

    #[test]
    fn username_validation_enforces_length_and_charset() {
        assert!(validate_username("ana_92").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn sanitize_username_strips_and_pads() {
        assert_eq!(sanitize_username("ana.silva"), "ana.silva");
        assert_eq!(sanitize_username("a!b"), "userab");
        assert_eq!(sanitize_username("ñ"), "user");
    }
}
