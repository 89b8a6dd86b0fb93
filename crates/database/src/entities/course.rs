use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub course_code: String,
    pub title: String,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::group::Entity")]
    Groups,
    #[sea_orm(has_many = "super::course_coordinator::Entity")]
    CourseCoordinators,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::course_coordinator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseCoordinators.def()
    }
}

// Many-to-many relationship with coordinators
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::course_coordinator::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::course_coordinator::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
