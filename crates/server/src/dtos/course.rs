use database::{
    entities::course,
    services::course::{CourseChanges, CourseFilter, CourseRecord, NewCourse},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub course_code: String,
    pub title: String,
    pub active: bool,
    pub coordinators: Vec<Uuid>,
}

impl From<CourseRecord> for CourseResponse {
    fn from(record: CourseRecord) -> Self {
        Self {
            coordinators: record.coordinators,
            ..record.course.into()
        }
    }
}

// Coordinators are omitted where only the course itself is shown
impl From<course::Model> for CourseResponse {
    fn from(course: course::Model) -> Self {
        Self {
            id: course.id,
            course_code: course.course_code,
            title: course.title,
            active: course.active,
            coordinators: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CourseQueryParams {
    /// Case-insensitive substring of the course code
    pub course_code: Option<String>,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    pub active: Option<bool>,
}

impl From<CourseQueryParams> for CourseFilter {
    fn from(params: CourseQueryParams) -> Self {
        Self {
            course_code: params.course_code,
            title: params.title,
            active: params.active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub course_code: String,
    pub title: String,
    #[serde(default)]
    pub coordinators: Vec<Uuid>,
}

impl From<CreateCourseRequest> for NewCourse {
    fn from(req: CreateCourseRequest) -> Self {
        Self {
            course_code: req.course_code,
            title: req.title,
            coordinators: req.coordinators,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    pub course_code: Option<String>,
    pub title: Option<String>,
    pub active: Option<bool>,
    /// Replaces the whole coordinator list when present
    pub coordinators: Option<Vec<Uuid>>,
}

impl From<UpdateCourseRequest> for CourseChanges {
    fn from(req: UpdateCourseRequest) -> Self {
        Self {
            course_code: req.course_code,
            title: req.title,
            active: req.active,
            coordinators: req.coordinators,
        }
    }
}
