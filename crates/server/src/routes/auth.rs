use crate::{error::AppError, state::AppState};
use axum::{extract::FromRequestParts, http::request::Parts};
use database::{entities::user, services::user::UserService};
use log::debug;
use models::scope::Actor;
use std::sync::Arc;
use tower_oauth2_resource_server::claims::DefaultClaims;

/// The active user named by the bearer token's subject
pub struct CurrentUser(pub user::Model);

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<DefaultClaims>()
            .ok_or(AppError::Unauthorized)?;
        let username = claims.sub.as_deref().ok_or(AppError::Unauthorized)?;

        match UserService::resolve_actor(&state.db, username).await? {
            Some(user) => Ok(Self(user)),
            None => {
                debug!("Rejecting token for unknown or inactive user {username}");
                Err(AppError::Unauthorized)
            }
        }
    }
}
