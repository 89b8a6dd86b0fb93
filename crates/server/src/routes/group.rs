use crate::{
    dtos::{
        envelope::{Reply, ok},
        group::{CreateGroupRequest, GroupQueryParams, GroupResponse, UpdateGroupRequest},
    },
    error::AppError,
    routes::auth::CurrentUser,
    state::AppState,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use database::services::group::GroupService;
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(list_groups, add_group))
        .routes(routes!(get_group, update_group))
}

/// List the groups visible to the caller
#[utoipa::path(
    get,
    path = "/groups",
    params(GroupQueryParams),
    responses(
        (status = 200, description = "Groups visible to the caller", body = [GroupResponse]),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    query: Result<Query<GroupQueryParams>, QueryRejection>,
) -> Result<Reply<Vec<GroupResponse>>, AppError> {
    let Query(params) = query?;

    let groups = GroupService::list(&state.db, &user.actor(), params.try_into()?).await?;
    Ok(ok(groups.into_iter().map(Into::into).collect()))
}

/// Create a group in a course the caller coordinates or a lab they run
#[utoipa::path(
    post,
    path = "/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 200, description = "Group created", body = GroupResponse),
        (status = 400, description = "Invalid group, or course and lab not writable"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn add_group(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<Reply<GroupResponse>, AppError> {
    let Json(req) = body?;

    let created = GroupService::add(&state.db, &user.actor(), req.try_into()?).await?;
    Ok(ok(created.into()))
}

/// Get a group by ID
#[utoipa::path(
    get,
    path = "/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group found", body = GroupResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Group not found")
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn get_group(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Reply<GroupResponse>, AppError> {
    let Path(id) = id?;

    let group = GroupService::get(&state.db, &user.actor(), id).await?;
    Ok(ok(group.into()))
}

/// Update a group by ID
#[utoipa::path(
    patch,
    path = "/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Group updated", body = GroupResponse),
        (status = 400, description = "Invalid changes"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Group not found or not writable")
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn update_group(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateGroupRequest>, JsonRejection>,
) -> Result<Reply<GroupResponse>, AppError> {
    let Path(id) = id?;
    let Json(req) = body?;

    let group = GroupService::update(&state.db, &user.actor(), id, req.try_into()?).await?;
    Ok(ok(group.into()))
}
