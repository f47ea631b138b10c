//! Auth handlers: register, login, refresh, logout, Google sign-in.
//!
//! Every endpoint that signs the user in also sets `auth_token` and
//! `refresh_token` cookies, so browser clients work without storing
//! tokens in script-visible storage.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::dto::{
    AuthResponse, GoogleCallbackRequest, GoogleUrlResponse, LoginRequest, MessageResponse,
    RefreshRequest, RegisterRequest, UserDto,
};
use crate::app_state::AppState;
use crate::auth::extractor::{AUTH_COOKIE, REFRESH_COOKIE};
use crate::auth::{CurrentUser, TokenPair};
use crate::error::{ApiError, ErrorResponse};
use crate::service::account::AccountService;

fn account_service(state: &AppState) -> AccountService {
    AccountService::new(state.store.clone(), state.config.clone())
}

/// Builds the pair of auth cookies for a fresh token pair.
fn auth_cookies(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    let build = |name: &'static str, value: String| {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure)
            .build()
    };
    jar.add(build(AUTH_COOKIE, tokens.access_token.clone()))
        .add(build(REFRESH_COOKIE, tokens.refresh_token.clone()))
}

fn clear_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .build()
}

/// `POST /auth/register` — Create an email/password account.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input or a duplicate email/username.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    summary = "Register an account",
    description = "Creates an email/password account, signs the user in, and sets auth cookies.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email or username taken", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, tokens) = account_service(&state)
        .register(
            &req.email,
            &req.username,
            req.full_name.as_deref(),
            &req.password,
        )
        .await?;
    let jar = auth_cookies(jar, &tokens, state.config.cookie_secure);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse::new(tokens, user)),
    ))
}

/// `POST /auth/login` — Email/password login.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] on bad credentials.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Verifies email/password credentials, returns a token pair, and sets auth cookies.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 401, description = "Bad credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, tokens) = account_service(&state).login(&req.email, &req.password).await?;
    let jar = auth_cookies(jar, &tokens, state.config.cookie_secure);
    Ok((StatusCode::OK, jar, Json(AuthResponse::new(tokens, user))))
}

/// `POST /auth/refresh` — Exchange a refresh token for a new pair.
///
/// The token comes from the request body or the `refresh_token` cookie.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] on a missing or invalid token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Auth",
    summary = "Refresh tokens",
    description = "Exchanges a refresh token (body or cookie) for a fresh token pair.",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = AuthResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RefreshRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = req
        .refresh_token
        .or_else(|| jar.get(REFRESH_COOKIE).map(|c| c.value().to_owned()))
        .ok_or_else(|| ApiError::Unauthorized("refresh token missing".to_string()))?;
    let (user, tokens) = account_service(&state).refresh(&token).await?;
    let jar = auth_cookies(jar, &tokens, state.config.cookie_secure);
    Ok((StatusCode::OK, jar, Json(AuthResponse::new(tokens, user))))
}

/// `POST /auth/logout` — Clear the auth cookies.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    summary = "Log out",
    description = "Clears the auth cookies. Bearer tokens simply expire.",
    responses(
        (status = 200, description = "Cookies cleared", body = MessageResponse),
    )
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .remove(clear_cookie(AUTH_COOKIE))
        .remove(clear_cookie(REFRESH_COOKIE));
    (
        StatusCode::OK,
        jar,
        Json(MessageResponse::new("logged out")),
    )
}

/// `GET /auth/me` — The authenticated account.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] without a valid token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    summary = "Current account",
    responses(
        (status = 200, description = "The signed-in account", body = UserDto),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    (StatusCode::OK, Json(UserDto::from(user)))
}

/// `GET /auth/google/url` — Start the Google sign-in flow.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the URL cannot be built.
#[utoipa::path(
    get,
    path = "/api/v1/auth/google/url",
    tag = "Auth",
    summary = "Google consent URL",
    responses(
        (status = 200, description = "URL to redirect the client to", body = GoogleUrlResponse),
    )
)]
pub async fn google_url(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let auth_url = account_service(&state).google_authorization_url()?;
    Ok((StatusCode::OK, Json(GoogleUrlResponse { auth_url })))
}

/// `POST /auth/google/callback` — Complete the Google sign-in flow.
///
/// The client forwards the authorization code it received from Google's
/// redirect.
///
/// # Errors
///
/// Returns [`ApiError::Upstream`] when the code exchange fails.
#[utoipa::path(
    post,
    path = "/api/v1/auth/google/callback",
    tag = "Auth",
    summary = "Google OAuth callback",
    request_body = GoogleCallbackRequest,
    responses(
        (status = 200, description = "Signed in via Google", body = AuthResponse),
        (status = 400, description = "Undecodable ID token", body = ErrorResponse),
        (status = 502, description = "Google rejected the code", body = ErrorResponse),
    )
)]
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<GoogleCallbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, tokens) = account_service(&state).google_callback(&req.code).await?;
    let jar = auth_cookies(jar, &tokens, state.config.cookie_secure);
    Ok((StatusCode::OK, jar, Json(AuthResponse::new(tokens, user))))
}

/// Auth routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/google/url", get(google_url))
        .route("/auth/google/callback", post(google_callback))
}
