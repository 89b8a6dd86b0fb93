use crate::{
    dtos::envelope::{Reply, ok},
    error::AppError,
    routes::auth::CurrentUser,
};
use axum::http::StatusCode;

/// Simple endpoint that returns "OK" when the service is running properly
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", content_type = "text/plain", body = String)
    ),
    tag = "Health"
)]
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Answers "pong" to any authenticated user
#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Authenticated", body = String),
        (status = 401, description = "Unauthorized - invalid or missing JWT, or unknown user")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Health"
)]
pub async fn ping(_user: CurrentUser) -> Result<Reply<&'static str>, AppError> {
    Ok(ok("pong"))
}
