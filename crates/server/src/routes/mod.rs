pub mod auth;
pub mod course;
pub mod group;
pub mod health;
pub mod lab;
pub mod make_up;
pub mod record;
pub mod session;
pub mod user;
pub mod week;

use crate::state::AppState;
use std::sync::Arc;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Routes reachable without a bearer token
pub fn public() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new().routes(routes!(health::health))
}

/// Routes behind the OAuth2 resource server layer
pub fn protected() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(health::ping))
        .merge(user::router())
        .merge(lab::router())
        .merge(course::router())
        .merge(group::router())
        .merge(week::router())
        .merge(session::router())
        .merge(record::router())
        .merge(make_up::router())
}
