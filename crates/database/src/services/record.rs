use super::scope::{find_in_scope, scope_condition};
use crate::{
    clock::Moment,
    entities::{check_in_record, session},
    error::ServiceError,
};
use chrono::{DateTime, Utc};
use models::{
    attendance::{CheckInState, UserType},
    scope::{Actor, EntityKind, read_scope, write_scope},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, TransactionTrait,
};
use uuid::Uuid;

pub const MAX_REMARK_LEN: usize = 256;

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub session_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub user_type: Option<UserType>,
    pub check_in_state: Option<CheckInState>,
}

#[derive(Debug, Clone)]
pub struct NewRecord {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub user_type: UserType,
    pub check_in_state: CheckInState,
    pub check_in_time: Option<DateTime<Utc>>,
    pub remark: String,
}

/// Changes to a record, made against the version the caller last saw
#[derive(Debug, Clone)]
pub struct RecordChanges {
    /// The `last_modify_time` the caller observed
    pub last_modify_time: DateTime<Utc>,
    pub user_type: Option<UserType>,
    pub check_in_state: Option<CheckInState>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub remark: Option<String>,
}

pub struct RecordService;

impl RecordService {
    pub async fn get(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
    ) -> Result<check_in_record::Model, ServiceError> {
        let scope = read_scope(EntityKind::CheckInRecord, actor);

        find_in_scope::<check_in_record::Entity, _>(db, &scope, id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: RecordFilter,
    ) -> Result<Vec<check_in_record::Model>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(session_id) = filter.session_id {
            condition = condition.add(check_in_record::Column::SessionId.eq(session_id));
        }
        if let Some(user_id) = filter.user_id {
            condition = condition.add(check_in_record::Column::UserId.eq(user_id));
        }
        if let Some(user_type) = filter.user_type {
            condition = condition.add(check_in_record::Column::UserType.eq(user_type));
        }
        if let Some(check_in_state) = filter.check_in_state {
            condition = condition.add(check_in_record::Column::CheckInState.eq(check_in_state));
        }

        let scope = read_scope(EntityKind::CheckInRecord, actor);
        Ok(check_in_record::Entity::find()
            .filter(condition)
            .filter(scope_condition::<check_in_record::Entity>(&scope))
            .all(db)
            .await?)
    }

    pub async fn add(
        db: &DatabaseConnection,
        actor: &Actor,
        new: NewRecord,
        now: Moment,
    ) -> Result<check_in_record::Model, ServiceError> {
        Self::check_remark(&new.remark)?;

        let txn = db.begin().await?;

        let session_scope = write_scope(EntityKind::Session, actor);
        if find_in_scope::<session::Entity, _>(&txn, &session_scope, new.session_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::validation(
                "session does not exist or is not writable",
            ));
        }

        let record = check_in_record::ActiveModel {
            id: Set(Uuid::new_v4()),
            session_id: Set(new.session_id),
            user_id: Set(new.user_id),
            user_type: Set(new.user_type),
            check_in_state: Set(new.check_in_state),
            check_in_time: Set(Self::arrival_time(new.check_in_state, new.check_in_time, now)),
            last_modify_time: Set(now.utc),
            remark: Set(new.remark),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(record)
    }

    /// Updates a record unless it changed after the caller's `last_modify_time`
    ///
    /// A stale version is reported as [`ServiceError::NotFound`] and nothing is written.
    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        changes: RecordChanges,
        now: Moment,
    ) -> Result<check_in_record::Model, ServiceError> {
        if let Some(remark) = &changes.remark {
            Self::check_remark(remark)?;
        }

        let scope = write_scope(EntityKind::CheckInRecord, actor);
        let txn = db.begin().await?;

        let record = find_in_scope::<check_in_record::Entity, _>(&txn, &scope, id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        if record.last_modify_time > changes.last_modify_time {
            return Err(ServiceError::NotFound);
        }
        let observed = record.last_modify_time;
        let stored_time = record.check_in_time;

        let mut active_record: check_in_record::ActiveModel = record.into();
        if let Some(user_type) = changes.user_type {
            active_record.user_type = Set(user_type);
        }
        if let Some(check_in_state) = changes.check_in_state {
            active_record.check_in_state = Set(check_in_state);
            if !check_in_state.is_checked_in() {
                active_record.check_in_time = Set(None);
            } else if stored_time.is_none() {
                active_record.check_in_time = Set(Some(now.utc));
            }
        }
        if let Some(check_in_time) = changes.check_in_time {
            active_record.check_in_time = Set(Some(check_in_time));
        }
        if let Some(remark) = changes.remark {
            active_record.remark = Set(remark);
        }
        active_record.last_modify_time = Set(now.utc);

        // Compare-and-swap on the version read above
        let result = check_in_record::Entity::update_many()
            .set(active_record)
            .filter(check_in_record::Column::Id.eq(id))
            .filter(check_in_record::Column::LastModifyTime.eq(observed))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound);
        }

        let record = check_in_record::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound)?;

        txn.commit().await?;
        Ok(record)
    }

    /// Checked-in records always carry a time, absent ones never do
    fn arrival_time(
        state: CheckInState,
        time: Option<DateTime<Utc>>,
        now: Moment,
    ) -> Option<DateTime<Utc>> {
        if state.is_checked_in() {
            time.or(Some(now.utc))
        } else {
            None
        }
    }

    fn check_remark(remark: &str) -> Result<(), ServiceError> {
        if remark.chars().count() > MAX_REMARK_LEN {
            return Err(ServiceError::validation(format!(
                "remark must be at most {MAX_REMARK_LEN} characters"
            )));
        }
        Ok(())
    }
}
