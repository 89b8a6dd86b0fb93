use super::{
    course::CourseResponse, group::GroupResponse, record::RecordResponse,
    session::SessionResponse, user::PublicUserResponse, week::WeekResponse,
};
use database::services::today::LabToday;
use serde::Serialize;
use utoipa::ToSchema;

/// Everything a lab needs for today's sessions
#[derive(Debug, Serialize, ToSchema)]
pub struct LabTodayResponse {
    /// The week covering today, if one exists
    pub week: Option<WeekResponse>,
    /// One record per expected attendee, created on first request
    pub records: Vec<RecordResponse>,
    pub sessions: Vec<SessionResponse>,
    pub groups: Vec<GroupResponse>,
    pub courses: Vec<CourseResponse>,
    pub users: Vec<PublicUserResponse>,
}

impl From<LabToday> for LabTodayResponse {
    fn from(today: LabToday) -> Self {
        Self {
            week: today.week.map(Into::into),
            records: today.records.into_iter().map(Into::into).collect(),
            sessions: today.sessions.into_iter().map(Into::into).collect(),
            groups: today.groups.into_iter().map(Into::into).collect(),
            courses: today.courses.into_iter().map(Into::into).collect(),
            users: today.users.into_iter().map(Into::into).collect(),
        }
    }
}
