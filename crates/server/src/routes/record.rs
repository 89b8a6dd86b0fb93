use crate::{
    dtos::{
        envelope::{Reply, ok},
        record::{CreateRecordRequest, RecordQueryParams, RecordResponse, UpdateRecordRequest},
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
use database::{clock::Moment, services::record::RecordService};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(list_records, add_record))
        .routes(routes!(get_record, update_record))
}

/// List the check-in records visible to the caller
#[utoipa::path(
    get,
    path = "/records",
    params(RecordQueryParams),
    responses(
        (status = 200, description = "Records visible to the caller", body = [RecordResponse]),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Records"
)]
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    query: Result<Query<RecordQueryParams>, QueryRejection>,
) -> Result<Reply<Vec<RecordResponse>>, AppError> {
    let Query(params) = query?;

    let records = RecordService::list(&state.db, &user.actor(), params.into()).await?;
    Ok(ok(records.into_iter().map(Into::into).collect()))
}

/// Create a check-in record in a session the caller may modify
#[utoipa::path(
    post,
    path = "/records",
    request_body = CreateRecordRequest,
    responses(
        (status = 200, description = "Record created", body = RecordResponse),
        (status = 400, description = "Invalid record, duplicate, or session not writable"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Records"
)]
pub async fn add_record(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<CreateRecordRequest>, JsonRejection>,
) -> Result<Reply<RecordResponse>, AppError> {
    let Json(req) = body?;

    let record = RecordService::add(&state.db, &user.actor(), req.into(), Moment::now()).await?;
    Ok(ok(record.into()))
}

/// Get a check-in record by ID
#[utoipa::path(
    get,
    path = "/records/{id}",
    params(("id" = Uuid, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record found", body = RecordResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Record not found")
    ),
    security(("jwt" = [])),
    tag = "Records"
)]
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Reply<RecordResponse>, AppError> {
    let Path(id) = id?;

    let record = RecordService::get(&state.db, &user.actor(), id).await?;
    Ok(ok(record.into()))
}

/// Update a check-in record
///
/// Applies only if the record has not changed since the `last_modify_time`
/// the caller supplies; a stale update answers 404 and changes nothing.
#[utoipa::path(
    patch,
    path = "/records/{id}",
    params(("id" = Uuid, Path, description = "Record ID")),
    request_body = UpdateRecordRequest,
    responses(
        (status = 200, description = "Record updated", body = RecordResponse),
        (status = 400, description = "Invalid changes"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Record not found, not writable, or modified since")
    ),
    security(("jwt" = [])),
    tag = "Records"
)]
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateRecordRequest>, JsonRejection>,
) -> Result<Reply<RecordResponse>, AppError> {
    let Path(id) = id?;
    let Json(req) = body?;

    let record =
        RecordService::update(&state.db, &user.actor(), id, req.into(), Moment::now()).await?;
    Ok(ok(record.into()))
}
