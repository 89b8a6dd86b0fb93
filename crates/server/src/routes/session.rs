use crate::{
    dtos::{
        envelope::{Reply, ok},
        record::RecordResponse,
        session::{CreateSessionRequest, SessionQueryParams, SessionResponse, UpdateSessionRequest},
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
use database::{clock::Moment, services::session::SessionService};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(list_sessions, add_session))
        .routes(routes!(get_session, update_session))
        .routes(routes!(check_in))
}

/// List the sessions visible to the caller
#[utoipa::path(
    get,
    path = "/sessions",
    params(SessionQueryParams),
    responses(
        (status = 200, description = "Sessions visible to the caller", body = [SessionResponse]),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Sessions"
)]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    query: Result<Query<SessionQueryParams>, QueryRejection>,
) -> Result<Reply<Vec<SessionResponse>>, AppError> {
    let Query(params) = query?;

    let sessions = SessionService::list(&state.db, &user.actor(), params.into()).await?;
    Ok(ok(sessions.into_iter().map(Into::into).collect()))
}

/// Create a regular or special session for a group the caller may modify
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid session, or group not writable"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Sessions"
)]
pub async fn add_session(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Reply<SessionResponse>, AppError> {
    let Json(req) = body?;

    let created = SessionService::add(&state.db, &user.actor(), req.try_into()?).await?;
    Ok(ok(created.into()))
}

/// Get a session by ID
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session found", body = SessionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Session not found")
    ),
    security(("jwt" = [])),
    tag = "Sessions"
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Reply<SessionResponse>, AppError> {
    let Path(id) = id?;

    let session = SessionService::get(&state.db, &user.actor(), id).await?;
    Ok(ok(session.into()))
}

/// Update a session by ID
#[utoipa::path(
    patch,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session updated", body = SessionResponse),
        (status = 400, description = "Invalid changes"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Session not found or not writable")
    ),
    security(("jwt" = [])),
    tag = "Sessions"
)]
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateSessionRequest>, JsonRejection>,
) -> Result<Reply<SessionResponse>, AppError> {
    let Path(id) = id?;
    let Json(req) = body?;

    let session = SessionService::update(&state.db, &user.actor(), id, req.into()).await?;
    Ok(ok(session.into()))
}

/// Check the caller in to a session
///
/// The caller's record must already exist; it becomes `attended` within the
/// deadline, `late` after it when late check-in is allowed.
#[utoipa::path(
    post,
    path = "/sessions/{id}/check_in",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Checked in", body = RecordResponse),
        (status = 400, description = "Session inactive, not started, or deadline passed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No record for the caller in this session")
    ),
    security(("jwt" = [])),
    tag = "Sessions"
)]
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Reply<RecordResponse>, AppError> {
    let Path(id) = id?;

    let record = SessionService::check_in(&state.db, &user.actor(), id, Moment::now()).await?;
    Ok(ok(record.into()))
}
