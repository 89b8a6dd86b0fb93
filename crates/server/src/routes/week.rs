use crate::{
    dtos::{
        envelope::{Reply, ok},
        week::{CreateWeekRequest, WeekQueryParams, WeekResponse},
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
use database::services::{Lookup, week::WeekService};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(list_weeks, add_week))
        .routes(routes!(get_week))
}

/// List weeks, most recent first
#[utoipa::path(
    get,
    path = "/weeks",
    params(WeekQueryParams),
    responses(
        (status = 200, description = "Weeks", body = [WeekResponse]),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Weeks"
)]
pub async fn list_weeks(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    query: Result<Query<WeekQueryParams>, QueryRejection>,
) -> Result<Reply<Vec<WeekResponse>>, AppError> {
    let Query(params) = query?;

    let weeks = WeekService::list(&state.db, &user.actor(), params.into()).await?;
    Ok(ok(weeks.into_iter().map(Into::into).collect()))
}

/// Create a week starting on the given Monday; staff or superusers only
#[utoipa::path(
    post,
    path = "/weeks",
    request_body = CreateWeekRequest,
    responses(
        (status = 200, description = "Week created", body = WeekResponse),
        (status = 400, description = "Not a Monday, or the week already exists"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Weeks"
)]
pub async fn add_week(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<CreateWeekRequest>, JsonRejection>,
) -> Result<Reply<WeekResponse>, AppError> {
    let Json(req) = body?;

    let week = WeekService::add(&state.db, &user.actor(), req.into()).await?;
    Ok(ok(week.into()))
}

/// Get a week by id or Monday date
#[utoipa::path(
    get,
    path = "/weeks/{key}",
    params(("key" = String, Path, description = "Week id or Monday date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Week found", body = WeekResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Week not found")
    ),
    security(("jwt" = [])),
    tag = "Weeks"
)]
pub async fn get_week(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    key: Result<Path<String>, PathRejection>,
) -> Result<Reply<WeekResponse>, AppError> {
    let Path(key) = key?;

    let week = WeekService::get(&state.db, &user.actor(), Lookup::from(key.as_str())).await?;
    Ok(ok(week.into()))
}
