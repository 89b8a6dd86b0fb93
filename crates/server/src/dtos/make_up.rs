use database::{
    entities::make_up_session,
    services::make_up::{MakeUpFilter, NewMakeUp},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct MakeUpResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub original_session_id: Uuid,
    pub make_up_session_id: Uuid,
}

impl From<make_up_session::Model> for MakeUpResponse {
    fn from(make_up: make_up_session::Model) -> Self {
        Self {
            id: make_up.id,
            student_id: make_up.student_id,
            original_session_id: make_up.original_session_id,
            make_up_session_id: make_up.make_up_session_id,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MakeUpQueryParams {
    pub student_id: Option<Uuid>,
    pub original_session_id: Option<Uuid>,
    pub make_up_session_id: Option<Uuid>,
}

impl From<MakeUpQueryParams> for MakeUpFilter {
    fn from(params: MakeUpQueryParams) -> Self {
        Self {
            student_id: params.student_id,
            original_session_id: params.original_session_id,
            make_up_session_id: params.make_up_session_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMakeUpRequest {
    pub student_id: Uuid,
    /// The session the student missed
    pub original_session_id: Uuid,
    /// The session the student attends instead
    pub make_up_session_id: Uuid,
}

impl From<CreateMakeUpRequest> for NewMakeUp {
    fn from(req: CreateMakeUpRequest) -> Self {
        Self {
            student_id: req.student_id,
            original_session_id: req.original_session_id,
            make_up_session_id: req.make_up_session_id,
        }
    }
}
