use super::scope::{find_in_scope, scope_condition};
use crate::{
    entities::{make_up_session, session},
    error::ServiceError,
};
use models::scope::{Actor, EntityKind, read_scope, write_scope};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, TransactionTrait,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct MakeUpFilter {
    pub student_id: Option<Uuid>,
    pub original_session_id: Option<Uuid>,
    pub make_up_session_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewMakeUp {
    pub student_id: Uuid,
    pub original_session_id: Uuid,
    pub make_up_session_id: Uuid,
}

pub struct MakeUpService;

impl MakeUpService {
    pub async fn get(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
    ) -> Result<make_up_session::Model, ServiceError> {
        let scope = read_scope(EntityKind::MakeUpSession, actor);

        find_in_scope::<make_up_session::Entity, _>(db, &scope, id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: MakeUpFilter,
    ) -> Result<Vec<make_up_session::Model>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(student_id) = filter.student_id {
            condition = condition.add(make_up_session::Column::StudentId.eq(student_id));
        }
        if let Some(original) = filter.original_session_id {
            condition = condition.add(make_up_session::Column::OriginalSessionId.eq(original));
        }
        if let Some(make_up) = filter.make_up_session_id {
            condition = condition.add(make_up_session::Column::MakeUpSessionId.eq(make_up));
        }

        let scope = read_scope(EntityKind::MakeUpSession, actor);
        Ok(make_up_session::Entity::find()
            .filter(condition)
            .filter(scope_condition::<make_up_session::Entity>(&scope))
            .all(db)
            .await?)
    }

    pub async fn add(
        db: &DatabaseConnection,
        actor: &Actor,
        new: NewMakeUp,
    ) -> Result<make_up_session::Model, ServiceError> {
        if new.original_session_id == new.make_up_session_id {
            return Err(ServiceError::constraint(
                "the make-up session must differ from the original session",
            ));
        }

        let txn = db.begin().await?;

        let session_scope = write_scope(EntityKind::Session, actor);
        if find_in_scope::<session::Entity, _>(&txn, &session_scope, new.original_session_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::validation(
                "original session does not exist or is not writable",
            ));
        }

        let make_up = make_up_session::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(new.student_id),
            original_session_id: Set(new.original_session_id),
            make_up_session_id: Set(new.make_up_session_id),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(make_up)
    }
}
