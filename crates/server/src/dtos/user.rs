use chrono::{DateTime, Utc};
use database::services::user::{NewUser, PublicUser, UserChanges, UserFilter, UserInfo, UserRecord};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_ta: bool,
    pub active: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        let user = record.user;
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            is_ta: record.is_ta,
            active: user.active,
            date_joined: user.date_joined,
        }
    }
}

/// Names only, for users related to something the caller can see
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicUserResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<PublicUser> for PublicUserResponse {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfoResponse {
    pub user: UserResponse,
    /// Labs the user is an executive of
    pub lab_executive_of: Vec<Uuid>,
    /// Courses the user coordinates
    pub course_coordinator_of: Vec<Uuid>,
    /// Groups the user assists in
    pub teaching_assistant_of: Vec<Uuid>,
    /// Groups the user is a student of
    pub student_of: Vec<Uuid>,
}

impl From<UserInfo> for UserInfoResponse {
    fn from(info: UserInfo) -> Self {
        Self {
            user: info.user.into(),
            lab_executive_of: info.lab_executive_of,
            course_coordinator_of: info.course_coordinator_of,
            teaching_assistant_of: info.teaching_assistant_of,
            student_of: info.student_of,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UserQueryParams {
    /// Case-insensitive substring of the username
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_staff: Option<bool>,
    pub active: Option<bool>,
}

impl From<UserQueryParams> for UserFilter {
    fn from(params: UserQueryParams) -> Self {
        Self {
            username: params.username,
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            is_staff: params.is_staff,
            active: params.active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_ta: bool,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            is_staff: req.is_staff,
            is_superuser: req.is_superuser,
            is_ta: req.is_ta,
        }
    }
}

/// Fields left out are unchanged; status flags need a superuser
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_ta: Option<bool>,
    pub active: Option<bool>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            is_staff: req.is_staff,
            is_superuser: req.is_superuser,
            active: req.active,
            is_ta: req.is_ta,
        }
    }
}
