use crate::{
    dtos::{
        course::{CourseQueryParams, CourseResponse, CreateCourseRequest, UpdateCourseRequest},
        envelope::{Reply, ok},
        group::{GroupResponse, UpdateGroupRequest},
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
use database::services::{Lookup, course::CourseService, group::GroupService};
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(list_courses, add_course))
        .routes(routes!(get_course, update_course))
        .routes(routes!(get_course_group, update_course_group))
}

/// List the courses visible to the caller
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "Courses visible to the caller", body = [CourseResponse]),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    query: Result<Query<CourseQueryParams>, QueryRejection>,
) -> Result<Reply<Vec<CourseResponse>>, AppError> {
    let Query(params) = query?;

    let courses = CourseService::list(&state.db, &user.actor(), params.into()).await?;
    Ok(ok(courses.into_iter().map(Into::into).collect()))
}

/// Create a course; staff or superusers only
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 200, description = "Course created", body = CourseResponse),
        (status = 400, description = "Invalid course or duplicate code"),
        (status = 401, description = "Unauthorized")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn add_course(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    body: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<Reply<CourseResponse>, AppError> {
    let Json(req) = body?;

    let created = CourseService::add(&state.db, &user.actor(), req.into()).await?;
    Ok(ok(created.into()))
}

/// Get a course by id or course code
#[utoipa::path(
    get,
    path = "/courses/{key}",
    params(("key" = String, Path, description = "Course id or course code")),
    responses(
        (status = 200, description = "Course found", body = CourseResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    key: Result<Path<String>, PathRejection>,
) -> Result<Reply<CourseResponse>, AppError> {
    let Path(key) = key?;

    let course = CourseService::get(&state.db, &user.actor(), Lookup::from(key.as_str())).await?;
    Ok(ok(course.into()))
}

/// Update a course by id or course code
#[utoipa::path(
    patch,
    path = "/courses/{key}",
    params(("key" = String, Path, description = "Course id or course code")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Invalid changes"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Course not found or not writable")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    key: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> Result<Reply<CourseResponse>, AppError> {
    let Path(key) = key?;
    let Json(req) = body?;

    let course = CourseService::update(
        &state.db,
        &user.actor(),
        Lookup::from(key.as_str()),
        req.into(),
    )
    .await?;
    Ok(ok(course.into()))
}

/// Get a group by its course code and group name
#[utoipa::path(
    get,
    path = "/courses/{code}/groups/{name}",
    params(
        ("code" = String, Path, description = "Course code"),
        ("name" = String, Path, description = "Group name")
    ),
    responses(
        (status = 200, description = "Group found", body = GroupResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Group not found")
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn get_course_group(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    key: Result<Path<(String, String)>, PathRejection>,
) -> Result<Reply<GroupResponse>, AppError> {
    let Path((code, name)) = key?;

    let group = GroupService::get_by_name(&state.db, &user.actor(), &code, &name).await?;
    Ok(ok(group.into()))
}

/// Update a group addressed by its course code and group name
#[utoipa::path(
    patch,
    path = "/courses/{code}/groups/{name}",
    params(
        ("code" = String, Path, description = "Course code"),
        ("name" = String, Path, description = "Group name")
    ),
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
pub async fn update_course_group(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    key: Result<Path<(String, String)>, PathRejection>,
    body: Result<Json<UpdateGroupRequest>, JsonRejection>,
) -> Result<Reply<GroupResponse>, AppError> {
    let Path((code, name)) = key?;
    let Json(req) = body?;
    let actor = user.actor();

    let group = GroupService::get_by_name(&state.db, &actor, &code, &name).await?;
    let updated = GroupService::update(&state.db, &actor, group.group.id, req.try_into()?).await?;
    Ok(ok(updated.into()))
}
