use crate::error::AppError;
use chrono::{NaiveDate, NaiveTime};
use database::{
    entities::session::SessionDetails,
    services::session::{NewSession, SessionChanges, SessionFilter, SessionRecord},
};
use models::attendance::SessionKind;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    /// `regular` or `special`
    #[schema(value_type = String)]
    pub kind: SessionKind,
    pub group_id: Uuid,
    pub check_in_ddl_mins: i32,
    pub allow_late_check_in: bool,
    pub compulsory: bool,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_room: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
}

impl From<SessionRecord> for SessionResponse {
    fn from(record: SessionRecord) -> Self {
        let mut response = Self {
            id: record.id,
            kind: record.details.kind(),
            group_id: record.group_id,
            check_in_ddl_mins: record.check_in_ddl_mins,
            allow_late_check_in: record.allow_late_check_in,
            compulsory: record.compulsory,
            active: record.active,
            week_id: None,
            lab_id: None,
            lab_room: None,
            lab_date: None,
            start_time: None,
            end_time: None,
        };

        match record.details {
            SessionDetails::Regular { week_id } => response.week_id = Some(week_id),
            SessionDetails::Special {
                lab_id,
                lab_room,
                lab_date,
                start_time,
                end_time,
            } => {
                response.lab_id = Some(lab_id);
                response.lab_room = Some(lab_room);
                response.lab_date = Some(lab_date);
                response.start_time = Some(start_time);
                response.end_time = Some(end_time);
            }
        }

        response
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SessionQueryParams {
    pub group_id: Option<Uuid>,
    /// `regular` or `special`
    #[param(value_type = Option<String>)]
    pub kind: Option<SessionKind>,
    pub week_id: Option<Uuid>,
    pub lab_id: Option<Uuid>,
    pub lab_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

impl From<SessionQueryParams> for SessionFilter {
    fn from(params: SessionQueryParams) -> Self {
        Self {
            group_id: params.group_id,
            kind: params.kind,
            week_id: params.week_id,
            lab_id: params.lab_id,
            lab_date: params.lab_date,
            active: params.active,
        }
    }
}

/// A new session; `week_id` is required for regular sessions, the lab,
/// room, date and times for special ones
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    #[schema(value_type = String)]
    pub kind: SessionKind,
    pub group_id: Uuid,
    pub check_in_ddl_mins: i32,
    pub allow_late_check_in: Option<bool>,
    pub compulsory: Option<bool>,
    pub week_id: Option<Uuid>,
    pub lab_id: Option<Uuid>,
    pub lab_room: Option<i32>,
    pub lab_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

fn field<T>(value: Option<T>, name: &str, kind: SessionKind) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("{name} is required for {kind} sessions")))
}

impl TryFrom<CreateSessionRequest> for NewSession {
    type Error = AppError;

    fn try_from(req: CreateSessionRequest) -> Result<Self, Self::Error> {
        let details = match req.kind {
            SessionKind::Regular => SessionDetails::Regular {
                week_id: field(req.week_id, "week_id", req.kind)?,
            },
            SessionKind::Special => SessionDetails::Special {
                lab_id: field(req.lab_id, "lab_id", req.kind)?,
                lab_room: field(req.lab_room, "lab_room", req.kind)?,
                lab_date: field(req.lab_date, "lab_date", req.kind)?,
                start_time: field(req.start_time, "start_time", req.kind)?,
                end_time: field(req.end_time, "end_time", req.kind)?,
            },
        };

        Ok(Self {
            group_id: req.group_id,
            check_in_ddl_mins: req.check_in_ddl_mins,
            allow_late_check_in: req.allow_late_check_in.unwrap_or(true),
            compulsory: req.compulsory.unwrap_or(true),
            details,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSessionRequest {
    pub check_in_ddl_mins: Option<i32>,
    pub allow_late_check_in: Option<bool>,
    pub compulsory: Option<bool>,
    pub active: Option<bool>,
    pub week_id: Option<Uuid>,
    pub lab_id: Option<Uuid>,
    pub lab_room: Option<i32>,
    pub lab_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl From<UpdateSessionRequest> for SessionChanges {
    fn from(req: UpdateSessionRequest) -> Self {
        Self {
            check_in_ddl_mins: req.check_in_ddl_mins,
            allow_late_check_in: req.allow_late_check_in,
            compulsory: req.compulsory,
            active: req.active,
            week_id: req.week_id,
            lab_id: req.lab_id,
            lab_room: req.lab_room,
            lab_date: req.lab_date,
            start_time: req.start_time,
            end_time: req.end_time,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_special_session_requires_its_place_and_time() {
        let req: CreateSessionRequest = serde_json::from_value(json!({
            "kind": "special",
            "group_id": Uuid::new_v4(),
            "check_in_ddl_mins": 10,
            "lab_id": Uuid::new_v4(),
            "lab_room": 2,
            "lab_date": "2026-10-15",
            "start_time": "09:00:00",
        }))
        .unwrap();

        let err = NewSession::try_from(req).unwrap_err();
        assert!(
            matches!(err, AppError::BadRequest(msg) if msg == "end_time is required for special sessions")
        );
    }

    #[test]
    fn test_regular_session_defaults() {
        let week_id = Uuid::new_v4();
        let req: CreateSessionRequest = serde_json::from_value(json!({
            "kind": "regular",
            "group_id": Uuid::new_v4(),
            "check_in_ddl_mins": 15,
            "week_id": week_id,
        }))
        .unwrap();

        let new = NewSession::try_from(req).unwrap();
        assert!(new.allow_late_check_in);
        assert!(new.compulsory);
        assert_eq!(new.details, SessionDetails::Regular { week_id });
    }

    #[test]
    fn test_response_only_carries_its_variant_fields() {
        let week_id = Uuid::new_v4();
        let response = SessionResponse::from(SessionRecord {
            id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            check_in_ddl_mins: 15,
            allow_late_check_in: true,
            compulsory: false,
            active: true,
            details: SessionDetails::Regular { week_id },
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["kind"], "regular");
        assert_eq!(value["week_id"], json!(week_id));
        assert!(value.get("lab_id").is_none());
    }
}
