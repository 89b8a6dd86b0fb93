use crate::error::AppError;
use chrono::NaiveTime;
use database::{
    entities::group,
    services::group::{GroupChanges, GroupFilter, GroupRecord, NewGroup},
};
use models::weekday::DayOfWeek;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub group_name: String,
    pub lab_id: Uuid,
    pub lab_room: i32,
    /// 1 (Monday) to 7 (Sunday)
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub active: bool,
    pub students: Vec<Uuid>,
    pub teaching_assistants: Vec<Uuid>,
}

impl From<GroupRecord> for GroupResponse {
    fn from(record: GroupRecord) -> Self {
        Self {
            students: record.students,
            teaching_assistants: record.teaching_assistants,
            ..record.group.into()
        }
    }
}

impl From<group::Model> for GroupResponse {
    fn from(group: group::Model) -> Self {
        Self {
            id: group.id,
            course_id: group.course_id,
            group_name: group.group_name,
            lab_id: group.lab_id,
            lab_room: group.lab_room,
            day_of_week: group.day_of_week,
            start_time: group.start_time,
            end_time: group.end_time,
            active: group.active,
            students: Vec::new(),
            teaching_assistants: Vec::new(),
        }
    }
}

fn day_of_week(day: i32) -> Result<DayOfWeek, AppError> {
    DayOfWeek::try_from(day).map_err(AppError::BadRequest)
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GroupQueryParams {
    pub course_id: Option<Uuid>,
    pub lab_id: Option<Uuid>,
    /// 1 (Monday) to 7 (Sunday)
    pub day_of_week: Option<i32>,
    /// Case-insensitive substring of the group name
    pub group_name: Option<String>,
    pub active: Option<bool>,
}

impl TryFrom<GroupQueryParams> for GroupFilter {
    type Error = AppError;

    fn try_from(params: GroupQueryParams) -> Result<Self, Self::Error> {
        Ok(Self {
            course_id: params.course_id,
            lab_id: params.lab_id,
            day_of_week: params.day_of_week.map(day_of_week).transpose()?,
            group_name: params.group_name,
            active: params.active,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub course_id: Uuid,
    pub group_name: String,
    pub lab_id: Uuid,
    pub lab_room: i32,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub students: Vec<Uuid>,
    #[serde(default)]
    pub teaching_assistants: Vec<Uuid>,
}

impl TryFrom<CreateGroupRequest> for NewGroup {
    type Error = AppError;

    fn try_from(req: CreateGroupRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            course_id: req.course_id,
            group_name: req.group_name,
            lab_id: req.lab_id,
            lab_room: req.lab_room,
            day_of_week: day_of_week(req.day_of_week)?,
            start_time: req.start_time,
            end_time: req.end_time,
            students: req.students,
            teaching_assistants: req.teaching_assistants,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateGroupRequest {
    pub group_name: Option<String>,
    pub lab_id: Option<Uuid>,
    pub lab_room: Option<i32>,
    pub day_of_week: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub active: Option<bool>,
    /// Replaces the whole student list when present
    pub students: Option<Vec<Uuid>>,
    /// Replaces the whole teaching assistant list when present
    pub teaching_assistants: Option<Vec<Uuid>>,
}

impl TryFrom<UpdateGroupRequest> for GroupChanges {
    type Error = AppError;

    fn try_from(req: UpdateGroupRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            group_name: req.group_name,
            lab_id: req.lab_id,
            lab_room: req.lab_room,
            day_of_week: req.day_of_week.map(day_of_week).transpose()?,
            start_time: req.start_time,
            end_time: req.end_time,
            active: req.active,
            students: req.students,
            teaching_assistants: req.teaching_assistants,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_day_of_week_is_validated() {
        let req: CreateGroupRequest = serde_json::from_value(serde_json::json!({
            "course_id": Uuid::new_v4(),
            "group_name": "G1",
            "lab_id": Uuid::new_v4(),
            "lab_room": 1,
            "day_of_week": 8,
            "start_time": "14:00:00",
            "end_time": "16:00:00",
        }))
        .unwrap();

        let err = NewGroup::try_from(req).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "day of week must be 1~7"));
    }
}
