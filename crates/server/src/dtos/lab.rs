use database::services::lab::{LabChanges, LabFilter, LabRecord, NewLab};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct LabResponse {
    pub id: Uuid,
    pub lab_name: String,
    pub room_count: i32,
    pub active: bool,
    pub executives: Vec<Uuid>,
}

impl From<LabRecord> for LabResponse {
    fn from(record: LabRecord) -> Self {
        Self {
            id: record.lab.id,
            lab_name: record.lab.lab_name,
            room_count: record.lab.room_count,
            active: record.lab.active,
            executives: record.executives,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LabQueryParams {
    /// Case-insensitive substring of the lab name
    pub lab_name: Option<String>,
    pub active: Option<bool>,
}

impl From<LabQueryParams> for LabFilter {
    fn from(params: LabQueryParams) -> Self {
        Self {
            lab_name: params.lab_name,
            active: params.active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLabRequest {
    pub lab_name: String,
    pub room_count: i32,
    #[serde(default)]
    pub executives: Vec<Uuid>,
}

impl From<CreateLabRequest> for NewLab {
    fn from(req: CreateLabRequest) -> Self {
        Self {
            lab_name: req.lab_name,
            room_count: req.room_count,
            executives: req.executives,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLabRequest {
    pub lab_name: Option<String>,
    pub room_count: Option<i32>,
    pub active: Option<bool>,
    /// Replaces the whole executive list when present
    pub executives: Option<Vec<Uuid>>,
}

impl From<UpdateLabRequest> for LabChanges {
    fn from(req: UpdateLabRequest) -> Self {
        Self {
            lab_name: req.lab_name,
            room_count: req.room_count,
            active: req.active,
            executives: req.executives,
        }
    }
}
