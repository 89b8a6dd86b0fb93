use chrono::{DateTime, Utc};
use database::{
    entities::check_in_record,
    services::record::{NewRecord, RecordChanges, RecordFilter},
};
use models::attendance::{CheckInState, UserType};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    /// `student` or `TA`
    #[schema(value_type = String)]
    pub user_type: UserType,
    /// `absent`, `late` or `attended`
    #[schema(value_type = String)]
    pub check_in_state: CheckInState,
    pub check_in_time: Option<DateTime<Utc>>,
    /// Send this back unchanged when updating the record
    pub last_modify_time: DateTime<Utc>,
    pub remark: String,
}

impl From<check_in_record::Model> for RecordResponse {
    fn from(record: check_in_record::Model) -> Self {
        Self {
            id: record.id,
            session_id: record.session_id,
            user_id: record.user_id,
            user_type: record.user_type,
            check_in_state: record.check_in_state,
            check_in_time: record.check_in_time,
            last_modify_time: record.last_modify_time,
            remark: record.remark,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecordQueryParams {
    pub session_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub user_type: Option<UserType>,
    #[param(value_type = Option<String>)]
    pub check_in_state: Option<CheckInState>,
}

impl From<RecordQueryParams> for RecordFilter {
    fn from(params: RecordQueryParams) -> Self {
        Self {
            session_id: params.session_id,
            user_id: params.user_id,
            user_type: params.user_type,
            check_in_state: params.check_in_state,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRecordRequest {
    pub session_id: Uuid,
    pub user_id: Uuid,
    #[schema(value_type = String)]
    pub user_type: UserType,
    #[schema(value_type = Option<String>)]
    pub check_in_state: Option<CheckInState>,
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub remark: String,
}

impl From<CreateRecordRequest> for NewRecord {
    fn from(req: CreateRecordRequest) -> Self {
        Self {
            session_id: req.session_id,
            user_id: req.user_id,
            user_type: req.user_type,
            check_in_state: req.check_in_state.unwrap_or(CheckInState::Absent),
            check_in_time: req.check_in_time,
            remark: req.remark,
        }
    }
}

/// Changes to a record, guarded by the `last_modify_time` the caller last saw
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRecordRequest {
    pub last_modify_time: DateTime<Utc>,
    #[schema(value_type = Option<String>)]
    pub user_type: Option<UserType>,
    #[schema(value_type = Option<String>)]
    pub check_in_state: Option<CheckInState>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub remark: Option<String>,
}

impl From<UpdateRecordRequest> for RecordChanges {
    fn from(req: UpdateRecordRequest) -> Self {
        Self {
            last_modify_time: req.last_modify_time,
            user_type: req.user_type,
            check_in_state: req.check_in_state,
            check_in_time: req.check_in_time,
            remark: req.remark,
        }
    }
}
