use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "labs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub lab_name: String,
    pub room_count: i32,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::group::Entity")]
    Groups,
    #[sea_orm(has_many = "super::lab_executive::Entity")]
    LabExecutives,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::lab_executive::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabExecutives.def()
    }
}

// Many-to-many relationship with executives
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::lab_executive::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::lab_executive::Relation::Lab.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
