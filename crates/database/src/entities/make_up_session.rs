use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Excuses a student's absence at one session through attendance at another
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "make_up_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub original_session_id: Uuid,
    pub make_up_session_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::OriginalSessionId",
        to = "super::session::Column::Id"
    )]
    OriginalSession,
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::MakeUpSessionId",
        to = "super::session::Column::Id"
    )]
    MakeUpSession,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
