//! JWT access/refresh token issuance and verification (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::ApiError;

/// Marker distinguishing refresh tokens from access tokens.
const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims embedded in every token this service signs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject — user id as a decimal string.
    pub sub: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
    /// `"refresh"` on refresh tokens; absent on access tokens.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// An access/refresh token pair as issued at login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Long-lived token accepted only by the refresh endpoint.
    pub refresh_token: String,
}

/// Issues a signed access + refresh token pair for a user.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if signing fails.
pub fn issue_token_pair(user_id: i64, config: &AppConfig) -> Result<TokenPair, ApiError> {
    let access_token = sign(
        user_id,
        Duration::minutes(config.access_token_expire_minutes),
        None,
        config,
    )?;
    let refresh_token = sign(
        user_id,
        Duration::days(config.refresh_token_expire_days),
        Some(REFRESH_TOKEN_TYPE.to_string()),
        config,
    )?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Decodes and verifies an access token, returning the user id.
///
/// Refresh tokens are rejected here: they are only valid at the refresh
/// endpoint.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] on any signature, expiry, or claim
/// failure.
pub fn verify_access_token(token: &str, config: &AppConfig) -> Result<i64, ApiError> {
    let claims = decode(token, config)?;
    if claims.token_type.as_deref() == Some(REFRESH_TOKEN_TYPE) {
        return Err(ApiError::Unauthorized(
            "refresh token used as access token".to_string(),
        ));
    }
    parse_subject(&claims)
}

/// Decodes and verifies a refresh token, returning the user id.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] if the token is invalid, expired, or
/// not a refresh token.
pub fn verify_refresh_token(token: &str, config: &AppConfig) -> Result<i64, ApiError> {
    let claims = decode(token, config)?;
    if claims.token_type.as_deref() != Some(REFRESH_TOKEN_TYPE) {
        return Err(ApiError::Unauthorized("not a refresh token".to_string()));
    }
    parse_subject(&claims)
}

fn sign(
    user_id: i64,
    lifetime: Duration,
    token_type: Option<String>,
    config: &AppConfig,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        jti: Uuid::new_v4().to_string(),
        token_type,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

fn decode(token: &str, config: &AppConfig) -> Result<AccessClaims, ApiError> {
    jsonwebtoken::decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized("could not validate credentials".to_string()))
}

fn parse_subject(claims: &AccessClaims) -> Result<i64, ApiError> {
    claims
        .sub
        .parse::<i64>()
        .map_err(|_| ApiError::Unauthorized("could not validate credentials".to_string()))
}

/// Identity claims carried by a Google ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleClaims {
    /// Google account id.
    pub sub: String,
    /// Account email.
    pub email: String,
    /// Display name, if Google supplied one.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL, if Google supplied one.
    #[serde(default)]
    pub picture: Option<String>,
}

/// Decodes the claims of a Google ID token without verifying its
/// signature. The token comes straight from Google's code exchange over
/// TLS and is treated purely as a claims carrier.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] if the token is not a decodable JWT or
/// lacks the expected claims.
pub fn decode_google_claims(id_token: &str) -> Result<GoogleClaims, ApiError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    jsonwebtoken::decode::<GoogleClaims>(id_token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|_| ApiError::Validation("failed to decode Google ID token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig::for_tests()
    }

    #[test]
    fn access_token_round_trip() {
        let config = test_config();
        let pair = issue_token_pair(42, &config).unwrap();
        assert_eq!(verify_access_token(&pair.access_token, &config).unwrap(), 42);
    }

    #[test]
    fn refresh_token_is_rejected_as_access_token() {
        let config = test_config();
        let pair = issue_token_pair(42, &config).unwrap();
        assert!(verify_access_token(&pair.refresh_token, &config).is_err());
        assert_eq!(
            verify_refresh_token(&pair.refresh_token, &config).unwrap(),
            42
        );
        assert!(verify_refresh_token(&pair.access_token, &config).is_err());
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let config = test_config();
        let pair = issue_token_pair(7, &config).unwrap();
        let mut other = test_config();
        other.jwt_secret = "a-different-secret".into();
        assert!(verify_access_token(&pair.access_token, &other).is_err());
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let config = test_config();
        assert!(matches!(
            verify_access_token("not.a.jwt", &config),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
