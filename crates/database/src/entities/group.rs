use models::weekday::DayOfWeek;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A lab group of a course, meeting weekly in one lab room
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub group_name: String,
    pub lab_id: Uuid,
    pub lab_room: i32,
    pub day_of_week: i32, // 1 (Monday) to 7 (Sunday)
    pub start_time: Time,
    pub end_time: Time,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::lab::Entity",
        from = "Column::LabId",
        to = "super::lab::Column::Id"
    )]
    Lab,
    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::group_student::Entity")]
    GroupStudents,
    #[sea_orm(has_many = "super::group_teaching_assistant::Entity")]
    GroupTeachingAssistants,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::lab::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lab.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::group_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupStudents.def()
    }
}

impl Related<super::group_teaching_assistant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupTeachingAssistants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn day_of_week(&self) -> Result<DayOfWeek, DbErr> {
        DayOfWeek::new(self.day_of_week).ok_or_else(|| {
            DbErr::Type(format!(
                "Invalid day of week {} for group {}",
                self.day_of_week, self.id
            ))
        })
    }
}
