use super::{
    Lookup, contains,
    membership::{members_of, replace_members},
    required_text,
    scope::scope_condition,
};
use crate::{
    entities::{lab, lab_executive},
    error::ServiceError,
};
use models::scope::{Actor, EntityKind, read_scope, write_scope};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

pub const MAX_LAB_NAME_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabRecord {
    #[serde(flatten)]
    pub lab: lab::Model,
    pub executives: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct LabFilter {
    pub lab_name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewLab {
    pub lab_name: String,
    pub room_count: i32,
    pub executives: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct LabChanges {
    pub lab_name: Option<String>,
    pub room_count: Option<i32>,
    pub active: Option<bool>,
    pub executives: Option<Vec<Uuid>>,
}

pub struct LabService;

impl LabService {
    pub async fn get(
        db: &DatabaseConnection,
        actor: &Actor,
        key: Lookup,
    ) -> Result<LabRecord, ServiceError> {
        let lab = lab::Entity::find()
            .filter(Self::key_condition(key))
            .filter(scope_condition::<lab::Entity>(&read_scope(EntityKind::Lab, actor)))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let mut records = Self::with_executives(db, vec![lab]).await?;
        records.pop().ok_or(ServiceError::NotFound)
    }

    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: LabFilter,
    ) -> Result<Vec<LabRecord>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(lab_name) = filter.lab_name {
            condition = condition.add(contains(lab::Column::LabName, &lab_name));
        }
        if let Some(active) = filter.active {
            condition = condition.add(lab::Column::Active.eq(active));
        }

        let labs = lab::Entity::find()
            .filter(condition)
            .filter(scope_condition::<lab::Entity>(&read_scope(EntityKind::Lab, actor)))
            .order_by_asc(lab::Column::LabName)
            .all(db)
            .await?;

        Ok(Self::with_executives(db, labs).await?)
    }

    pub async fn add(
        db: &DatabaseConnection,
        actor: &Actor,
        new: NewLab,
    ) -> Result<LabRecord, ServiceError> {
        if !actor.is_privileged() {
            return Err(ServiceError::validation("Only staff may create labs"));
        }
        let lab_name = required_text("lab_name", &new.lab_name, MAX_LAB_NAME_LEN)?;
        Self::check_room_count(new.room_count)?;

        let txn = db.begin().await?;

        let lab = lab::ActiveModel {
            id: Set(Uuid::new_v4()),
            lab_name: Set(lab_name),
            room_count: Set(new.room_count),
            active: Set(true),
        }
        .insert(&txn)
        .await?;
        replace_members::<lab_executive::Entity, _>(&txn, lab.id, &new.executives).await?;

        let mut records = Self::with_executives(&txn, vec![lab]).await?;
        txn.commit().await?;

        records.pop().ok_or(ServiceError::NotFound)
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        key: Lookup,
        changes: LabChanges,
    ) -> Result<LabRecord, ServiceError> {
        let scope = write_scope(EntityKind::Lab, actor);
        let txn = db.begin().await?;

        let lab = lab::Entity::find()
            .filter(Self::key_condition(key))
            .filter(scope_condition::<lab::Entity>(&scope))
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound)?;
        let lab_id = lab.id;

        let mut active_lab: lab::ActiveModel = lab.into();
        if let Some(lab_name) = changes.lab_name {
            active_lab.lab_name = Set(required_text("lab_name", &lab_name, MAX_LAB_NAME_LEN)?);
        }
        if let Some(room_count) = changes.room_count {
            Self::check_room_count(room_count)?;
            active_lab.room_count = Set(room_count);
        }
        if let Some(active) = changes.active {
            active_lab.active = Set(active);
        }
        let lab = active_lab.update(&txn).await?;

        if let Some(executives) = changes.executives {
            replace_members::<lab_executive::Entity, _>(&txn, lab_id, &executives).await?;
        }

        let mut records = Self::with_executives(&txn, vec![lab]).await?;
        txn.commit().await?;

        records.pop().ok_or(ServiceError::NotFound)
    }

    fn key_condition(key: Lookup) -> Condition {
        key.condition(lab::Column::Id, lab::Column::LabName)
    }

    fn check_room_count(room_count: i32) -> Result<(), ServiceError> {
        if room_count <= 0 {
            return Err(ServiceError::constraint("room number should be greater than 0"));
        }
        Ok(())
    }

    async fn with_executives<C: ConnectionTrait>(
        conn: &C,
        labs: Vec<lab::Model>,
    ) -> Result<Vec<LabRecord>, DbErr> {
        let lab_ids: Vec<Uuid> = labs.iter().map(|l| l.id).collect();
        let mut executives = members_of::<lab_executive::Entity, _>(conn, &lab_ids).await?;

        Ok(labs
            .into_iter()
            .map(|lab| LabRecord {
                executives: executives.remove(&lab.id).unwrap_or_default(),
                lab,
            })
            .collect())
    }
}
