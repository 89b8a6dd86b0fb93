use crate::dtos::envelope::{ErrorBody, ErrorEnvelope};
use axum::{
    Json,
    body::HttpBody,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::error;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self::Service(err.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Service(ServiceError::Validation(_) | ServiceError::Constraint(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Service(ServiceError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Service(ServiceError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the caller; store failures stay in the log
    pub fn message(&self) -> String {
        match self {
            AppError::Service(ServiceError::Database(_)) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Service(ServiceError::Database(err)) = &self {
            error!("Database error while handling request: {err:?}");
        }

        let body = ErrorEnvelope {
            ok: false,
            error: ErrorBody {
                code: status.as_u16(),
                msg: self.message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Gives a body-less 401 from the token layer the same envelope as every other error
///
/// The `WWW-Authenticate` challenge is carried over.
pub async fn envelope_unauthorized(response: Response) -> Response {
    let empty = response.body().size_hint().exact() == Some(0);
    if response.status() != StatusCode::UNAUTHORIZED || !empty {
        return response;
    }

    let mut wrapped = AppError::Unauthorized.into_response();
    if let Some(challenge) = response.headers().get(WWW_AUTHENTICATE) {
        wrapped
            .headers_mut()
            .insert(WWW_AUTHENTICATE, challenge.clone());
    }
    wrapped
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dtos::envelope::ok;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::from(ServiceError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ServiceError::validation("bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ServiceError::constraint("dup")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(DbErr::Custom("boom".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_envelope_hides_store_details() {
        let err = AppError::from(DbErr::Custom("password=hunter2".to_string()));
        let body = ErrorEnvelope {
            ok: false,
            error: ErrorBody {
                code: err.status().as_u16(),
                msg: err.message(),
            },
        };

        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({
                "ok": false,
                "error": { "code": 500, "msg": "Internal server error" }
            })
        );
    }

    #[test]
    fn test_constraint_message_is_passed_through() {
        let err = AppError::from(ServiceError::constraint(
            "start time must be earlier than end time",
        ));
        assert_eq!(err.message(), "start time must be earlier than end time");
    }

    #[test]
    fn test_success_envelope() {
        let body = ok(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&body.0).unwrap(),
            serde_json::json!({ "ok": true, "data": [1, 2] })
        );

        let empty = crate::dtos::envelope::Envelope::<()> {
            ok: true,
            data: None,
        };
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            serde_json::json!({ "ok": true })
        );
    }

    #[tokio::test]
    async fn test_bare_unauthorized_gets_an_envelope() {
        let bare = Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .header(WWW_AUTHENTICATE, "Bearer")
            .body(axum::body::Body::empty())
            .unwrap();

        let response = envelope_unauthorized(bare).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "ok": false,
                "error": { "code": 401, "msg": "Authentication required" }
            })
        );
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let found = AppError::from(ServiceError::NotFound).into_response();
        let response = envelope_unauthorized(found).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let success = (StatusCode::OK, "fine").into_response();
        let response = envelope_unauthorized(success).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"fine");
    }

    #[tokio::test]
    async fn test_into_response_status() {
        let response = AppError::from(ServiceError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
