use crate::{
    dtos::{
        envelope::{Reply, ok},
        lab::{CreateLabRequest, LabQueryParams, LabResponse, UpdateLabRequest},
        today::LabTodayResponse,
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
use database::{
    clock::Moment,
    services::{Lookup, lab::LabService, today::TodayService},
};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(list_labs, add_lab))
        .routes(routes!(get_lab, update_lab))
        .routes(routes!(lab_today))
}

/// List the labs visible to the caller
#[utoipa::path(
    get,
    path = "/labs",
    params(LabQueryParams),
    responses(
        (status = 200, description = "Labs visible to the caller", body = [LabResponse]),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Labs"
)]
pub async fn list_labs(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    query: Result<Query<LabQueryParams>, QueryRejection>,
) -> Result<Reply<Vec<LabResponse>>, AppError> {
    let Query(params) = query?;

    let labs = LabService::list(&state.db, &user.actor(), params.into()).await?;
    Ok(ok(labs.into_iter().map(Into::into).collect()))
}

/// Create a lab; staff or superusers only
#[utoipa::path(
    post,
    path = "/labs",
    request_body = CreateLabRequest,
    responses(
        (status = 200, description = "Lab created", body = LabResponse),
        (status = 400, description = "Invalid lab or duplicate name"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Labs"
)]
pub async fn add_lab(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<CreateLabRequest>, JsonRejection>,
) -> Result<Reply<LabResponse>, AppError> {
    let Json(req) = body?;

    let created = LabService::add(&state.db, &user.actor(), req.into()).await?;
    Ok(ok(created.into()))
}

/// Get a lab by id or name
#[utoipa::path(
    get,
    path = "/labs/{key}",
    params(("key" = String, Path, description = "Lab id or name")),
    responses(
        (status = 200, description = "Lab found", body = LabResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Lab not found")
    ),
    security(("jwt" = [])),
    tag = "Labs"
)]
pub async fn get_lab(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    key: Result<Path<String>, PathRejection>,
) -> Result<Reply<LabResponse>, AppError> {
    let Path(key) = key?;

    let lab = LabService::get(&state.db, &user.actor(), Lookup::from(key.as_str())).await?;
    Ok(ok(lab.into()))
}

/// Update a lab by id or name
#[utoipa::path(
    patch,
    path = "/labs/{key}",
    params(("key" = String, Path, description = "Lab id or name")),
    request_body = UpdateLabRequest,
    responses(
        (status = 200, description = "Lab updated", body = LabResponse),
        (status = 400, description = "Invalid changes"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Lab not found or not writable")
    ),
    security(("jwt" = [])),
    tag = "Labs"
)]
pub async fn update_lab(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    key: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateLabRequest>, JsonRejection>,
) -> Result<Reply<LabResponse>, AppError> {
    let Path(key) = key?;
    let Json(req) = body?;

    let lab = LabService::update(
        &state.db,
        &user.actor(),
        Lookup::from(key.as_str()),
        req.into(),
    )
    .await?;
    Ok(ok(lab.into()))
}

/// Today's sessions in a lab, with a check-in record for every expected attendee
///
/// Records missing for today's sessions are created as absent on the way.
#[utoipa::path(
    get,
    path = "/labs/{id}/today",
    params(("id" = Uuid, Path, description = "Lab ID")),
    responses(
        (status = 200, description = "Today's sessions and records", body = LabTodayResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Lab not found")
    ),
    security(("jwt" = [])),
    tag = "Labs"
)]
pub async fn lab_today(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Reply<LabTodayResponse>, AppError> {
    let Path(id) = id?;

    let today = TodayService::lab_today(&state.db, &user.actor(), id, Moment::now()).await?;
    Ok(ok(today.into()))
}
