use crate::{
    dtos::{
        envelope::{Reply, ok},
        make_up::{CreateMakeUpRequest, MakeUpQueryParams, MakeUpResponse},
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
use database::services::make_up::MakeUpService;
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(list_make_ups, add_make_up))
        .routes(routes!(get_make_up))
}

/// List the make-up sessions visible to the caller
#[utoipa::path(
    get,
    path = "/make_up_sessions",
    params(MakeUpQueryParams),
    responses(
        (status = 200, description = "Make-up sessions visible to the caller", body = [MakeUpResponse]),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Make-up sessions"
)]
pub async fn list_make_ups(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    query: Result<Query<MakeUpQueryParams>, QueryRejection>,
) -> Result<Reply<Vec<MakeUpResponse>>, AppError> {
    let Query(params) = query?;

    let make_ups = MakeUpService::list(&state.db, &user.actor(), params.into()).await?;
    Ok(ok(make_ups.into_iter().map(Into::into).collect()))
}

/// Let a student attend another session in place of one they miss
#[utoipa::path(
    post,
    path = "/make_up_sessions",
    request_body = CreateMakeUpRequest,
    responses(
        (status = 200, description = "Make-up session created", body = MakeUpResponse),
        (status = 400, description = "Invalid make-up, or original session not writable"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Make-up sessions"
)]
pub async fn add_make_up(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<CreateMakeUpRequest>, JsonRejection>,
) -> Result<Reply<MakeUpResponse>, AppError> {
    let Json(req) = body?;

    let make_up = MakeUpService::add(&state.db, &user.actor(), req.into()).await?;
    Ok(ok(make_up.into()))
}

/// Get a make-up session by ID
#[utoipa::path(
    get,
    path = "/make_up_sessions/{id}",
    params(("id" = Uuid, Path, description = "Make-up session ID")),
    responses(
        (status = 200, description = "Make-up session found", body = MakeUpResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Make-up session not found")
    ),
    security(("jwt" = [])),
    tag = "Make-up sessions"
)]
pub async fn get_make_up(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Reply<MakeUpResponse>, AppError> {
    let Path(id) = id?;

    let make_up = MakeUpService::get(&state.db, &user.actor(), id).await?;
    Ok(ok(make_up.into()))
}
