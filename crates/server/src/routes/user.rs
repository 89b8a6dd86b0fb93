use crate::{
    dtos::{
        envelope::{Reply, ok},
        user::{CreateUserRequest, UpdateUserRequest, UserInfoResponse, UserQueryParams, UserResponse},
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
use database::services::{Lookup, user::UserService};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(user_info))
        .routes(routes!(list_users, add_user))
        .routes(routes!(get_user, update_user))
}

/// The caller's own account and the ids of everything they are attached to
#[utoipa::path(
    get,
    path = "/user_info",
    responses(
        (status = 200, description = "Current user", body = UserInfoResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn user_info(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Reply<UserInfoResponse>, AppError> {
    let info = UserService::user_info(&state.db, &user.actor()).await?;
    Ok(ok(info.into()))
}

/// List the users visible to the caller
#[utoipa::path(
    get,
    path = "/users",
    params(UserQueryParams),
    responses(
        (status = 200, description = "Users visible to the caller", body = [UserResponse]),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    query: Result<Query<UserQueryParams>, QueryRejection>,
) -> Result<Reply<Vec<UserResponse>>, AppError> {
    let Query(params) = query?;

    let users = UserService::list(&state.db, &user.actor(), params.into()).await?;
    Ok(ok(users.into_iter().map(Into::into).collect()))
}

/// Create a user; staff or superusers only
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid user or duplicate username"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn add_user(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Reply<UserResponse>, AppError> {
    let Json(req) = body?;

    let created = UserService::add(&state.db, &user.actor(), req.into()).await?;
    Ok(ok(created.into()))
}

/// Get a user by id or username
#[utoipa::path(
    get,
    path = "/users/{key}",
    params(("key" = String, Path, description = "User id or username")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    key: Result<Path<String>, PathRejection>,
) -> Result<Reply<UserResponse>, AppError> {
    let Path(key) = key?;

    let found = UserService::get(&state.db, &user.actor(), Lookup::from(key.as_str())).await?;
    Ok(ok(found.into()))
}

/// Update a user by id or username
#[utoipa::path(
    patch,
    path = "/users/{key}",
    params(("key" = String, Path, description = "User id or username")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid changes"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found or not writable")
    ),
    security(("jwt" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    key: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Reply<UserResponse>, AppError> {
    let Path(key) = key?;
    let Json(req) = body?;

    let updated = UserService::update(
        &state.db,
        &user.actor(),
        Lookup::from(key.as_str()),
        req.into(),
    )
    .await?;
    Ok(ok(updated.into()))
}
