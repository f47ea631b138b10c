//! Dashboard handlers: headline figures and recent activity.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    DashboardStatsResponse, GroupSummariesResponse, RecentQuery, RecentTransactionsResponse,
};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::service::dashboard::DashboardService;

/// `GET /dashboard/stats` — Cross-group headline figures.
///
/// # Errors
///
/// Returns [`ApiError::Database`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    tag = "Dashboard",
    summary = "Dashboard statistics",
    description = "Group count, transaction count, total amount, and seven-day activity across every group the caller belongs to.",
    responses(
        (status = 200, description = "Headline figures", body = DashboardStatsResponse),
    )
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let stats = DashboardService::new(state.store.clone()).stats(&user).await?;
    Ok(Json(DashboardStatsResponse::from(stats)))
}

/// `GET /dashboard/groups` — Group overview with owner names and figures.
///
/// # Errors
///
/// Returns [`ApiError::Database`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/groups",
    tag = "Dashboard",
    summary = "Group overview",
    description = "Every group the caller belongs to, with the owner's username and member/transaction/amount figures.",
    responses(
        (status = 200, description = "Group summaries", body = GroupSummariesResponse),
    )
)]
pub async fn dashboard_groups(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let groups = DashboardService::new(state.store.clone())
        .group_summaries(&user)
        .await?;
    Ok(Json(GroupSummariesResponse {
        groups: groups.into_iter().map(Into::into).collect(),
    }))
}

/// `GET /dashboard/recent-transactions` — Latest activity with group names.
///
/// # Errors
///
/// Returns [`ApiError::Database`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/recent-transactions",
    tag = "Dashboard",
    summary = "Recent transactions",
    params(RecentQuery),
    responses(
        (status = 200, description = "Most recent transactions", body = RecentTransactionsResponse),
    )
)]
pub async fn recent_transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = DashboardService::new(state.store.clone())
        .recent_transactions(&user, query.limit)
        .await?;
    Ok(Json(RecentTransactionsResponse {
        transactions: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Dashboard routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/dashboard/groups", get(dashboard_groups))
        .route("/dashboard/recent-transactions", get(recent_transactions))
}
