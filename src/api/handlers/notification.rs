//! Notification handlers: inbox, read state, invitation actions.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};

use crate::api::dto::{
    AcceptInvitationResponse, MarkAllReadResponse, MessageResponse, NotificationDto,
    NotificationListResponse, PaginationMeta, PaginationParams, UnreadCountResponse, UnreadFilter,
};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};
use crate::service::notification::NotificationService;

fn notification_service(state: &AppState) -> NotificationService {
    NotificationService::new(state.store.clone())
}

/// `GET /notifications` — The caller's inbox, newest first.
///
/// # Errors
///
/// Returns [`ApiError::Database`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "Notifications",
    summary = "List notifications",
    params(PaginationParams, UnreadFilter),
    responses(
        (status = 200, description = "Page of notifications with counts", body = NotificationListResponse),
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<UnreadFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let params = params.clamped();
    let (rows, total, unread) = notification_service(&state)
        .list(&user, params.skip, params.limit, filter.unread_only)
        .await?;
    Ok(Json(NotificationListResponse {
        notifications: rows.into_iter().map(NotificationDto::from).collect(),
        unread_count: unread,
        pagination: PaginationMeta::new(&params, total),
    }))
}

/// `GET /notifications/unread-count` — Badge counter.
///
/// # Errors
///
/// Returns [`ApiError::Database`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    tag = "Notifications",
    summary = "Unread count",
    responses(
        (status = 200, description = "Unread notifications", body = UnreadCountResponse),
    )
)]
pub async fn unread_count(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let unread = notification_service(&state).unread_count(&user).await?;
    Ok(Json(UnreadCountResponse {
        unread_count: unread,
    }))
}

/// `PUT /notifications/{id}/read` — Mark one notification read.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the caller has no such notification.
#[utoipa::path(
    put,
    path = "/api/v1/notifications/{id}/read",
    tag = "Notifications",
    summary = "Mark as read",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read", body = MessageResponse),
        (status = 404, description = "No such notification", body = ErrorResponse),
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    notification_service(&state).mark_read(&user, id).await?;
    Ok(Json(MessageResponse::new("notification marked read")))
}

/// `PUT /notifications/mark-all-read` — Flush the unread badge.
///
/// # Errors
///
/// Returns [`ApiError::Database`] on storage failure.
#[utoipa::path(
    put,
    path = "/api/v1/notifications/mark-all-read",
    tag = "Notifications",
    summary = "Mark all as read",
    responses(
        (status = 200, description = "All unread notifications flipped", body = MarkAllReadResponse),
    )
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let marked = notification_service(&state).mark_all_read(&user).await?;
    Ok(Json(MarkAllReadResponse { marked }))
}

/// `DELETE /notifications/{id}` — Remove one notification.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the caller has no such notification.
#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    tag = "Notifications",
    summary = "Delete a notification",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Removed", body = MessageResponse),
        (status = 404, description = "No such notification", body = ErrorResponse),
    )
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    notification_service(&state).delete(&user, id).await?;
    Ok(Json(MessageResponse::new("notification deleted")))
}

/// `POST /notifications/{id}/accept-invitation` — Accept a group invitation.
///
/// Joining the group and consuming the notification happen atomically.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] if the caller already belongs to the
/// group (the notification is still consumed).
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/accept-invitation",
    tag = "Notifications",
    summary = "Accept a group invitation",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Joined the group", body = AcceptInvitationResponse),
        (status = 400, description = "Not an invitation or malformed payload", body = ErrorResponse),
        (status = 404, description = "Notification or group gone", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse),
    )
)]
pub async fn accept_invitation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let group = notification_service(&state).accept_invitation(&user, id).await?;
    Ok(Json(AcceptInvitationResponse {
        message: format!("joined '{}'", group.name),
        group: group.into(),
    }))
}

/// `POST /notifications/{id}/decline-invitation` — Decline a group invitation.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] when the notification is not an
/// actionable invitation.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/decline-invitation",
    tag = "Notifications",
    summary = "Decline a group invitation",
    params(("id" = i64, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Invitation declined", body = MessageResponse),
        (status = 400, description = "Not an invitation", body = ErrorResponse),
        (status = 404, description = "No such notification", body = ErrorResponse),
    )
)]
pub async fn decline_invitation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    notification_service(&state).decline_invitation(&user, id).await?;
    Ok(Json(MessageResponse::new("invitation declined")))
}

/// Notification routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/mark-all-read", put(mark_all_read))
        .route(
            "/notifications/{id}",
            delete(delete_notification),
        )
        .route("/notifications/{id}/read", put(mark_read))
        .route("/notifications/{id}/accept-invitation", post(accept_invitation))
        .route("/notifications/{id}/decline-invitation", post(decline_invitation))
}
