use models::scope::Actor;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub active: bool,
    pub date_joined: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
    #[sea_orm(has_many = "super::check_in_record::Entity")]
    CheckInRecords,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::check_in_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckInRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The acting-user context for requests made by this user
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }
}
