//! Group handlers: CRUD, membership, invitations, stats.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AddMemberRequest, CreateGroupRequest, DeleteGroupResponse, GroupDto, GroupListResponse,
    GroupStatsResponse, InviteRequest, MemberDto, MemberListResponse, MessageResponse,
    UpdateGroupRequest,
};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};
use crate::service::group::GroupService;

fn group_service(state: &AppState) -> GroupService {
    GroupService::new(state.store.clone())
}

/// `POST /groups` — Create a group.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] on a bad name.
#[utoipa::path(
    post,
    path = "/api/v1/groups",
    tag = "Groups",
    summary = "Create a group",
    description = "Creates a group; the creator becomes its admin member.",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupDto),
        (status = 400, description = "Invalid name", body = ErrorResponse),
    )
)]
pub async fn create_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let group = group_service(&state)
        .create(&user, &req.name, req.description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(GroupDto::from(group))))
}

/// `GET /groups` — The caller's groups.
///
/// # Errors
///
/// Returns [`ApiError::Database`] on storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/groups",
    tag = "Groups",
    summary = "List my groups",
    responses(
        (status = 200, description = "Groups the caller belongs to", body = GroupListResponse),
    )
)]
pub async fn list_groups(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let groups = group_service(&state).list(&user).await?;
    Ok(Json(GroupListResponse {
        groups: groups.into_iter().map(GroupDto::from).collect(),
    }))
}

/// `GET /groups/{id}` — One group.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for missing groups and non-members alike.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}",
    tag = "Groups",
    summary = "Get a group",
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "The group", body = GroupDto),
        (status = 404, description = "Not found or not a member", body = ErrorResponse),
    )
)]
pub async fn get_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let group = group_service(&state).get(&user, id).await?;
    Ok(Json(GroupDto::from(group)))
}

/// `PUT /groups/{id}` — Rename a group.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] unless the caller created the group.
#[utoipa::path(
    put,
    path = "/api/v1/groups/{id}",
    tag = "Groups",
    summary = "Update a group",
    params(("id" = i64, Path, description = "Group id")),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Updated group", body = GroupDto),
        (status = 403, description = "Not the group creator", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn update_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let group = group_service(&state)
        .update(&user, id, &req.name, req.description.as_deref())
        .await?;
    Ok(Json(GroupDto::from(group)))
}

/// `DELETE /groups/{id}` — Delete a group.
///
/// Live transactions are archived before the group disappears.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] unless the caller created the group.
#[utoipa::path(
    delete,
    path = "/api/v1/groups/{id}",
    tag = "Groups",
    summary = "Delete a group",
    description = "Archives the group's live transactions, then removes memberships and the group.",
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group deleted", body = DeleteGroupResponse),
        (status = 403, description = "Not the group creator", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn delete_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let archived = group_service(&state).delete(&user, id).await?;
    Ok(Json(DeleteGroupResponse {
        message: "group deleted".to_string(),
        archived_transactions: archived.len() as u64,
    }))
}

/// `DELETE /groups/{id}/transactions` — Hard-delete every transaction in
/// a group.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] unless the caller created the group.
#[utoipa::path(
    delete,
    path = "/api/v1/groups/{id}/transactions",
    tag = "Groups",
    summary = "Clear group transactions",
    description = "Removes every live transaction in the group permanently. The archive and recycle bin are untouched.",
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "Transactions removed", body = MessageResponse),
        (status = 403, description = "Not the group creator", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn clear_group_transactions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = group_service(&state).clear_transactions(&user, id).await?;
    Ok(Json(MessageResponse::new(format!(
        "removed {removed} transactions"
    ))))
}

/// `GET /groups/{id}/stats` — Aggregate figures for a group.
///
/// # Errors
///
/// Same visibility rules as `GET /groups/{id}`.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/stats",
    tag = "Groups",
    summary = "Group statistics",
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "Aggregate figures", body = GroupStatsResponse),
        (status = 404, description = "Not found or not a member", body = ErrorResponse),
    )
)]
pub async fn group_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = group_service(&state).stats(&user, id).await?;
    Ok(Json(GroupStatsResponse::from(stats)))
}

/// `GET /groups/{id}/members` — Member list.
///
/// # Errors
///
/// Same visibility rules as `GET /groups/{id}`.
#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/members",
    tag = "Groups",
    summary = "List group members",
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "The group's members", body = MemberListResponse),
        (status = 404, description = "Not found or not a member", body = ErrorResponse),
    )
)]
pub async fn list_members(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let members = group_service(&state).members(&user, id).await?;
    Ok(Json(MemberListResponse {
        members: members.into_iter().map(MemberDto::from).collect(),
    }))
}

/// `POST /groups/{id}/members` — Directly enroll a user by email.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] unless the caller is a group admin.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/members",
    tag = "Groups",
    summary = "Add a member",
    description = "Enrolls an existing account as a member without an invitation round trip.",
    params(("id" = i64, Path, description = "Group id")),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = MessageResponse),
        (status = 403, description = "Not a group admin", body = ErrorResponse),
        (status = 404, description = "Group or user not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse),
    )
)]
pub async fn add_member(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    group_service(&state).add_member(&user, id, &req.email).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("member added")),
    ))
}

/// `POST /groups/{id}/invite` — Send an invitation notification.
///
/// # Errors
///
/// Returns [`ApiError::Forbidden`] unless the caller is a group admin.
#[utoipa::path(
    post,
    path = "/api/v1/groups/{id}/invite",
    tag = "Groups",
    summary = "Invite a user",
    description = "Sends an actionable invitation notification; the invitee joins on accept.",
    params(("id" = i64, Path, description = "Group id")),
    request_body = InviteRequest,
    responses(
        (status = 200, description = "Invitation sent", body = MessageResponse),
        (status = 403, description = "Not a group admin", body = ErrorResponse),
        (status = 404, description = "Group or user not found", body = ErrorResponse),
        (status = 409, description = "Already a member", body = ErrorResponse),
    )
)]
pub async fn invite_member(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(req): Json<InviteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    group_service(&state).invite(&user, id, &req.email).await?;
    Ok(Json(MessageResponse::new("invitation sent")))
}

/// Group routes, mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", post(create_group).get(list_groups))
        .route(
            "/groups/{id}",
            get(get_group).put(update_group).delete(delete_group),
        )
        .route(
            "/groups/{id}/transactions",
            axum::routing::delete(clear_group_transactions),
        )
        .route("/groups/{id}/stats", get(group_stats))
        .route("/groups/{id}/members", get(list_members).post(add_member))
        .route("/groups/{id}/invite", post(invite_member))
}
