use super::scope::{find_in_scope, scope_condition};
use crate::{
    clock::Moment,
    entities::{
        check_in_record, group,
        session::{self, SessionDetails},
        week,
    },
    error::ServiceError,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use models::{
    attendance::{CheckInState, SessionKind},
    calendar::regular_session_start,
    scope::{Actor, EntityKind, read_scope, write_scope},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

/// A session of either kind, with its variant fields resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub group_id: Uuid,
    pub check_in_ddl_mins: i32,
    pub allow_late_check_in: bool,
    pub compulsory: bool,
    pub active: bool,
    #[serde(flatten)]
    pub details: SessionDetails,
}

impl TryFrom<session::Model> for SessionRecord {
    type Error = DbErr;

    fn try_from(session: session::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            details: session.details()?,
            id: session.id,
            group_id: session.group_id,
            check_in_ddl_mins: session.check_in_ddl_mins,
            allow_late_check_in: session.allow_late_check_in,
            compulsory: session.compulsory,
            active: session.active,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub group_id: Option<Uuid>,
    pub kind: Option<SessionKind>,
    pub week_id: Option<Uuid>,
    pub lab_id: Option<Uuid>,
    pub lab_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub group_id: Uuid,
    pub check_in_ddl_mins: i32,
    pub allow_late_check_in: bool,
    pub compulsory: bool,
    pub details: SessionDetails,
}

#[derive(Debug, Clone, Default)]
pub struct SessionChanges {
    pub check_in_ddl_mins: Option<i32>,
    pub allow_late_check_in: Option<bool>,
    pub compulsory: Option<bool>,
    pub active: Option<bool>,
    // Regular sessions only
    pub week_id: Option<Uuid>,
    // Special sessions only
    pub lab_id: Option<Uuid>,
    pub lab_room: Option<i32>,
    pub lab_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl SessionChanges {
    /// Applies the variant fields to `details`, refusing fields of the other variant
    fn apply_to(&self, details: SessionDetails) -> Result<SessionDetails, ServiceError> {
        match details {
            SessionDetails::Regular { week_id } => {
                if self.lab_id.is_some()
                    || self.lab_room.is_some()
                    || self.lab_date.is_some()
                    || self.start_time.is_some()
                    || self.end_time.is_some()
                {
                    return Err(ServiceError::validation(
                        "lab, room, date and times only apply to special sessions",
                    ));
                }
                Ok(SessionDetails::Regular {
                    week_id: self.week_id.unwrap_or(week_id),
                })
            }
            SessionDetails::Special {
                lab_id,
                lab_room,
                lab_date,
                start_time,
                end_time,
            } => {
                if self.week_id.is_some() {
                    return Err(ServiceError::validation(
                        "week only applies to regular sessions",
                    ));
                }
                Ok(SessionDetails::Special {
                    lab_id: self.lab_id.unwrap_or(lab_id),
                    lab_room: self.lab_room.unwrap_or(lab_room),
                    lab_date: self.lab_date.unwrap_or(lab_date),
                    start_time: self.start_time.unwrap_or(start_time),
                    end_time: self.end_time.unwrap_or(end_time),
                })
            }
        }
    }
}

pub struct SessionService;

impl SessionService {
    pub async fn get(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
    ) -> Result<SessionRecord, ServiceError> {
        let scope = read_scope(EntityKind::Session, actor);
        let session = find_in_scope::<session::Entity, _>(db, &scope, id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        Ok(session.try_into()?)
    }

    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: SessionFilter,
    ) -> Result<Vec<SessionRecord>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(group_id) = filter.group_id {
            condition = condition.add(session::Column::GroupId.eq(group_id));
        }
        if let Some(kind) = filter.kind {
            condition = condition.add(session::Column::Kind.eq(kind));
        }
        if let Some(week_id) = filter.week_id {
            condition = condition.add(session::Column::WeekId.eq(week_id));
        }
        if let Some(lab_id) = filter.lab_id {
            condition = condition.add(session::Column::LabId.eq(lab_id));
        }
        if let Some(lab_date) = filter.lab_date {
            condition = condition.add(session::Column::LabDate.eq(lab_date));
        }
        if let Some(active) = filter.active {
            condition = condition.add(session::Column::Active.eq(active));
        }

        let sessions = session::Entity::find()
            .filter(condition)
            .filter(scope_condition::<session::Entity>(&read_scope(EntityKind::Session, actor)))
            .all(db)
            .await?;

        Ok(sessions
            .into_iter()
            .map(SessionRecord::try_from)
            .collect::<Result<_, _>>()?)
    }

    pub async fn add(
        db: &DatabaseConnection,
        actor: &Actor,
        new: NewSession,
    ) -> Result<SessionRecord, ServiceError> {
        Self::check_deadline(new.check_in_ddl_mins)?;
        Self::check_details(&new.details)?;

        let txn = db.begin().await?;

        let group_scope = write_scope(EntityKind::Group, actor);
        if find_in_scope::<group::Entity, _>(&txn, &group_scope, new.group_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::validation(
                "group does not exist or is not writable",
            ));
        }

        let mut session = session::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(new.details.kind()),
            group_id: Set(new.group_id),
            check_in_ddl_mins: Set(new.check_in_ddl_mins),
            allow_late_check_in: Set(new.allow_late_check_in),
            compulsory: Set(new.compulsory),
            active: Set(true),
            ..Default::default()
        };
        Self::set_details(&mut session, new.details);
        let session = session.insert(&txn).await?;

        txn.commit().await?;
        Ok(session.try_into()?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        changes: SessionChanges,
    ) -> Result<SessionRecord, ServiceError> {
        let scope = write_scope(EntityKind::Session, actor);
        let txn = db.begin().await?;

        let session = find_in_scope::<session::Entity, _>(&txn, &scope, id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let details = changes.apply_to(session.details()?)?;
        Self::check_details(&details)?;

        let mut active_session: session::ActiveModel = session.into();
        if let Some(check_in_ddl_mins) = changes.check_in_ddl_mins {
            Self::check_deadline(check_in_ddl_mins)?;
            active_session.check_in_ddl_mins = Set(check_in_ddl_mins);
        }
        if let Some(allow_late_check_in) = changes.allow_late_check_in {
            active_session.allow_late_check_in = Set(allow_late_check_in);
        }
        if let Some(compulsory) = changes.compulsory {
            active_session.compulsory = Set(compulsory);
        }
        if let Some(active) = changes.active {
            active_session.active = Set(active);
        }
        Self::set_details(&mut active_session, details);
        let session = active_session.update(&txn).await?;

        txn.commit().await?;
        Ok(session.try_into()?)
    }

    /// Records the actor's own arrival at a session
    ///
    /// The actor's record must already exist. A record that is already checked in
    /// is returned as is.
    pub async fn check_in(
        db: &DatabaseConnection,
        actor: &Actor,
        session_id: Uuid,
        now: Moment,
    ) -> Result<check_in_record::Model, ServiceError> {
        let txn = db.begin().await?;

        let record = check_in_record::Entity::find()
            .filter(check_in_record::Column::SessionId.eq(session_id))
            .filter(check_in_record::Column::UserId.eq(actor.id))
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if record.check_in_state.is_checked_in() {
            return Ok(record);
        }

        let session = session::Entity::find_by_id(session_id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound)?;
        if !session.active {
            return Err(ServiceError::validation("session is not active"));
        }

        let start = Self::start_of(&txn, &session).await?;
        let state = CheckInState::for_arrival(
            start,
            session.check_in_ddl_mins,
            session.allow_late_check_in,
            now.local,
        )
        .map_err(|refusal| ServiceError::validation(refusal.to_string()))?;

        let mut active_record: check_in_record::ActiveModel = record.into();
        active_record.check_in_state = Set(state);
        active_record.check_in_time = Set(Some(now.utc));
        active_record.last_modify_time = Set(now.utc);
        let record = active_record.update(&txn).await?;

        txn.commit().await?;
        Ok(record)
    }

    /// When a session starts, in local wall-clock time
    pub async fn start_of<C: ConnectionTrait>(
        conn: &C,
        session: &session::Model,
    ) -> Result<NaiveDateTime, ServiceError> {
        match session.details()? {
            SessionDetails::Regular { week_id } => {
                let week = week::Entity::find_by_id(week_id)
                    .one(conn)
                    .await?
                    .ok_or(ServiceError::NotFound)?;
                let group = group::Entity::find_by_id(session.group_id)
                    .one(conn)
                    .await?
                    .ok_or(ServiceError::NotFound)?;

                Ok(regular_session_start(
                    week.monday_date,
                    group.day_of_week()?,
                    group.start_time,
                ))
            }
            SessionDetails::Special {
                lab_date,
                start_time,
                ..
            } => Ok(lab_date.and_time(start_time)),
        }
    }

    fn check_deadline(check_in_ddl_mins: i32) -> Result<(), ServiceError> {
        if check_in_ddl_mins <= 0 {
            return Err(ServiceError::constraint(
                "check in deadline should be greater than 0 minutes",
            ));
        }
        Ok(())
    }

    fn check_details(details: &SessionDetails) -> Result<(), ServiceError> {
        if let SessionDetails::Special {
            lab_room,
            start_time,
            end_time,
            ..
        } = details
        {
            if *lab_room <= 0 {
                return Err(ServiceError::constraint("invalid lab room number"));
            }
            if start_time >= end_time {
                return Err(ServiceError::constraint(
                    "start time must be earlier than end time",
                ));
            }
        }
        Ok(())
    }

    /// Writes the variant columns, clearing those of the other variant
    fn set_details(session: &mut session::ActiveModel, details: SessionDetails) {
        match details {
            SessionDetails::Regular { week_id } => {
                session.week_id = Set(Some(week_id));
                session.lab_id = Set(None);
                session.lab_room = Set(None);
                session.lab_date = Set(None);
                session.start_time = Set(None);
                session.end_time = Set(None);
            }
            SessionDetails::Special {
                lab_id,
                lab_room,
                lab_date,
                start_time,
                end_time,
            } => {
                session.week_id = Set(None);
                session.lab_id = Set(Some(lab_id));
                session.lab_room = Set(Some(lab_room));
                session.lab_date = Set(Some(lab_date));
                session.start_time = Set(Some(start_time));
                session.end_time = Set(Some(end_time));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn special() -> SessionDetails {
        SessionDetails::Special {
            lab_id: Uuid::new_v4(),
            lab_room: 2,
            lab_date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_changes_keep_the_variant() {
        let week_id = Uuid::new_v4();
        let changes = SessionChanges {
            week_id: Some(week_id),
            ..Default::default()
        };
        let regular = SessionDetails::Regular {
            week_id: Uuid::new_v4(),
        };

        assert_eq!(
            changes.apply_to(regular).unwrap(),
            SessionDetails::Regular { week_id }
        );
        assert!(matches!(
            changes.apply_to(special()),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_special_schedule_is_checked() {
        let changes = SessionChanges {
            end_time: NaiveTime::from_hms_opt(8, 0, 0),
            ..Default::default()
        };
        let details = changes.apply_to(special()).unwrap();

        assert!(matches!(
            SessionService::check_details(&details),
            Err(ServiceError::Constraint(_))
        ));
        assert!(SessionService::check_details(&special()).is_ok());
    }
}
