use chrono::NaiveDate;
use database::{
    entities::week,
    services::week::{NewWeek, WeekFilter},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct WeekResponse {
    pub id: Uuid,
    pub monday_date: NaiveDate,
}

impl From<week::Model> for WeekResponse {
    fn from(week: week::Model) -> Self {
        Self {
            id: week.id,
            monday_date: week.monday_date,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WeekQueryParams {
    pub monday_date: Option<NaiveDate>,
    /// Only weeks starting on or after this date
    pub since: Option<NaiveDate>,
}

impl From<WeekQueryParams> for WeekFilter {
    fn from(params: WeekQueryParams) -> Self {
        Self {
            monday_date: params.monday_date,
            since: params.since,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWeekRequest {
    /// Must be a Monday
    pub monday_date: NaiveDate,
}

impl From<CreateWeekRequest> for NewWeek {
    fn from(req: CreateWeekRequest) -> Self {
        Self {
            monday_date: req.monday_date,
        }
    }
}
