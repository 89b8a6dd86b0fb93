use models::attendance::SessionKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Regular and special sessions, sharing one table and one id space.
///
/// The variant columns are only populated for the matching `kind`; use
/// [`Model::details`] to read them as a [`SessionDetails`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: SessionKind,
    pub group_id: Uuid,
    pub check_in_ddl_mins: i32,
    pub allow_late_check_in: bool,
    pub compulsory: bool,
    pub active: bool,
    pub week_id: Option<Uuid>,
    pub lab_id: Option<Uuid>,
    pub lab_room: Option<i32>,
    pub lab_date: Option<Date>,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::week::Entity",
        from = "Column::WeekId",
        to = "super::week::Column::Id"
    )]
    Week,
    #[sea_orm(
        belongs_to = "super::lab::Entity",
        from = "Column::LabId",
        to = "super::lab::Column::Id"
    )]
    Lab,
    #[sea_orm(has_many = "super::check_in_record::Entity")]
    CheckInRecords,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::week::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Week.def()
    }
}

impl Related<super::check_in_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckInRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Variant-specific part of a session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SessionDetails {
    /// The weekly session of a group in the given week
    Regular { week_id: Uuid },
    /// A one-off session with its own place and time
    Special {
        lab_id: Uuid,
        lab_room: i32,
        lab_date: Date,
        start_time: Time,
        end_time: Time,
    },
}

impl SessionDetails {
    pub fn kind(&self) -> SessionKind {
        match self {
            Self::Regular { .. } => SessionKind::Regular,
            Self::Special { .. } => SessionKind::Special,
        }
    }
}

impl Model {
    pub fn details(&self) -> Result<SessionDetails, DbErr> {
        let malformed = || DbErr::Type(format!("Session {} is missing {} columns", self.id, self.kind));

        match self.kind {
            SessionKind::Regular => Ok(SessionDetails::Regular {
                week_id: self.week_id.ok_or_else(malformed)?,
            }),
            SessionKind::Special => Ok(SessionDetails::Special {
                lab_id: self.lab_id.ok_or_else(malformed)?,
                lab_room: self.lab_room.ok_or_else(malformed)?,
                lab_date: self.lab_date.ok_or_else(malformed)?,
                start_time: self.start_time.ok_or_else(malformed)?,
                end_time: self.end_time.ok_or_else(malformed)?,
            }),
        }
    }
}
