//! The "today" view of a lab, seeding absent records for every expected participant.

use super::{
    course::CourseService,
    group::GroupService,
    membership::members_of,
    scope::{find_in_scope, scope_condition},
    session::SessionRecord,
    user::{PublicUser, UserService},
    week::WeekService,
};
use crate::{
    clock::Moment,
    entities::{
        check_in_record, course, group, group_student, group_teaching_assistant, lab,
        make_up_session, session, user, week,
    },
    error::{ServiceError, is_unique_violation},
};
use log::{debug, info, warn};
use models::{
    attendance::{CheckInState, SessionKind, UserType},
    scope::{Actor, EntityKind, read_scope},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

/// What the actor may see of a lab's sessions today
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabToday {
    pub week: Option<week::Model>,
    pub records: Vec<check_in_record::Model>,
    pub sessions: Vec<SessionRecord>,
    pub groups: Vec<group::Model>,
    pub courses: Vec<course::Model>,
    pub users: Vec<PublicUser>,
}

/// An expected participant of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Attendee {
    session_id: Uuid,
    user_id: Uuid,
    user_type: UserType,
}

pub struct TodayService;

impl TodayService {
    /// Materializes today's records for `lab_id`, then returns what `actor` may see
    pub async fn lab_today(
        db: &DatabaseConnection,
        actor: &Actor,
        lab_id: Uuid,
        now: Moment,
    ) -> Result<LabToday, ServiceError> {
        lab::Entity::find_by_id(lab_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let week = WeekService::covering(db, now.today).await?;
        let candidates = Self::candidates(db, lab_id, week.as_ref(), now).await?;
        let attendees = Self::attendees(db, &candidates).await?;
        if !Self::may_view(db, actor, lab_id, &candidates, &attendees).await? {
            return Err(ServiceError::NotFound);
        }

        let created = Self::materialize(db, &candidates, attendees, now).await?;
        if created > 0 {
            info!("Materialized {created} check-in records for lab {lab_id}");
        }

        let session_ids: Vec<Uuid> = candidates.iter().map(|s| s.id).collect();
        Self::visible(db, actor, week, session_ids).await
    }

    /// Active sessions held in the lab today: the regular sessions of its groups in
    /// the current week, and its special sessions dated today
    async fn candidates(
        db: &DatabaseConnection,
        lab_id: Uuid,
        week: Option<&week::Model>,
        now: Moment,
    ) -> Result<Vec<session::Model>, DbErr> {
        let special = Condition::all()
            .add(session::Column::Kind.eq(SessionKind::Special))
            .add(session::Column::LabId.eq(lab_id))
            .add(session::Column::LabDate.eq(now.today));

        let mut held_today = Condition::any().add(special);
        if let Some(week) = week {
            let lab_groups = group::Entity::find()
                .select_only()
                .column(group::Column::Id)
                .filter(group::Column::LabId.eq(lab_id))
                .into_query();

            held_today = held_today.add(
                Condition::all()
                    .add(session::Column::Kind.eq(SessionKind::Regular))
                    .add(session::Column::WeekId.eq(week.id))
                    .add(session::Column::GroupId.in_subquery(lab_groups)),
            );
        }

        session::Entity::find()
            .filter(held_today)
            .filter(session::Column::Active.eq(true))
            .all(db)
            .await
    }

    /// Everyone expected at `sessions`: active students and TAs of each session's
    /// group, and active students making up another session
    async fn attendees(
        db: &DatabaseConnection,
        sessions: &[session::Model],
    ) -> Result<Vec<Attendee>, DbErr> {
        if sessions.is_empty() {
            return Ok(Vec::new());
        }

        let group_ids: Vec<Uuid> = sessions
            .iter()
            .map(|s| s.group_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let session_ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();

        let students = members_of::<group_student::Entity, _>(db, &group_ids).await?;
        let teaching_assistants =
            members_of::<group_teaching_assistant::Entity, _>(db, &group_ids).await?;

        let make_ups: Vec<(Uuid, Uuid)> = make_up_session::Entity::find()
            .select_only()
            .column(make_up_session::Column::MakeUpSessionId)
            .column(make_up_session::Column::StudentId)
            .filter(make_up_session::Column::MakeUpSessionId.is_in(session_ids))
            .into_tuple()
            .all(db)
            .await?;

        let mut user_ids: HashSet<Uuid> = students.values().flatten().copied().collect();
        user_ids.extend(teaching_assistants.values().flatten().copied());
        user_ids.extend(make_ups.iter().map(|&(_, student)| student));
        let active_users: HashSet<Uuid> = if user_ids.is_empty() {
            HashSet::new()
        } else {
            user::Entity::find()
                .select_only()
                .column(user::Column::Id)
                .filter(user::Column::Id.is_in(user_ids))
                .filter(user::Column::Active.eq(true))
                .into_tuple::<Uuid>()
                .all(db)
                .await?
                .into_iter()
                .collect()
        };

        let mut attendees = Vec::new();
        for session in sessions {
            let members = [
                (UserType::Student, students.get(&session.group_id)),
                (
                    UserType::TeachingAssistant,
                    teaching_assistants.get(&session.group_id),
                ),
            ];
            for (user_type, users) in members {
                for &user_id in users.into_iter().flatten() {
                    attendees.push(Attendee {
                        session_id: session.id,
                        user_id,
                        user_type,
                    });
                }
            }
        }
        for (session_id, user_id) in make_ups {
            attendees.push(Attendee {
                session_id,
                user_id,
                user_type: UserType::Student,
            });
        }

        attendees.retain(|a| active_users.contains(&a.user_id));
        Ok(attendees)
    }

    /// Whether `actor` has any business with the lab today: they can read the lab,
    /// one of its groups or one of today's sessions, or they are expected at or
    /// already hold a record in one of today's sessions
    ///
    /// Anyone else is told the lab does not exist.
    async fn may_view(
        db: &DatabaseConnection,
        actor: &Actor,
        lab_id: Uuid,
        candidates: &[session::Model],
        attendees: &[Attendee],
    ) -> Result<bool, DbErr> {
        if attendees.iter().any(|a| a.user_id == actor.id) {
            return Ok(true);
        }

        let lab_scope = read_scope(EntityKind::Lab, actor);
        if find_in_scope::<lab::Entity, _>(db, &lab_scope, lab_id)
            .await?
            .is_some()
        {
            return Ok(true);
        }

        let readable_group = group::Entity::find()
            .filter(group::Column::LabId.eq(lab_id))
            .filter(scope_condition::<group::Entity>(&read_scope(
                EntityKind::Group,
                actor,
            )))
            .one(db)
            .await?;
        if readable_group.is_some() {
            return Ok(true);
        }

        if candidates.is_empty() {
            return Ok(false);
        }
        let session_ids: Vec<Uuid> = candidates.iter().map(|s| s.id).collect();

        let readable_session = session::Entity::find()
            .filter(session::Column::Id.is_in(session_ids.clone()))
            .filter(scope_condition::<session::Entity>(&read_scope(
                EntityKind::Session,
                actor,
            )))
            .one(db)
            .await?;
        if readable_session.is_some() {
            return Ok(true);
        }

        let own_record = check_in_record::Entity::find()
            .filter(check_in_record::Column::SessionId.is_in(session_ids))
            .filter(check_in_record::Column::UserId.eq(actor.id))
            .one(db)
            .await?;
        Ok(own_record.is_some())
    }

    /// Inserts an absent record for every attendee that has none yet
    ///
    /// Each insert stands alone. Losing a race to a concurrent call shows up as a
    /// uniqueness violation and is skipped, as is any other failing row.
    async fn materialize(
        db: &DatabaseConnection,
        sessions: &[session::Model],
        attendees: Vec<Attendee>,
        now: Moment,
    ) -> Result<usize, DbErr> {
        if sessions.is_empty() {
            return Ok(0);
        }

        let session_ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
        let mut seen: HashSet<(Uuid, Uuid)> = check_in_record::Entity::find()
            .select_only()
            .column(check_in_record::Column::SessionId)
            .column(check_in_record::Column::UserId)
            .filter(check_in_record::Column::SessionId.is_in(session_ids))
            .into_tuple::<(Uuid, Uuid)>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let mut created = 0;
        for attendee in attendees {
            if !seen.insert((attendee.session_id, attendee.user_id)) {
                continue;
            }

            let result = check_in_record::ActiveModel {
                id: Set(Uuid::new_v4()),
                session_id: Set(attendee.session_id),
                user_id: Set(attendee.user_id),
                user_type: Set(attendee.user_type),
                check_in_state: Set(CheckInState::Absent),
                check_in_time: Set(None),
                last_modify_time: Set(now.utc),
                remark: Set(String::new()),
            }
            .insert(db)
            .await;

            match result {
                Ok(_) => created += 1,
                Err(e) if is_unique_violation(&e) => debug!(
                    "Record of user {} for session {} already exists",
                    attendee.user_id, attendee.session_id
                ),
                Err(e) => warn!(
                    "Failed to create record of user {} for session {}: {e}",
                    attendee.user_id, attendee.session_id
                ),
            }
        }

        Ok(created)
    }

    async fn visible(
        db: &DatabaseConnection,
        actor: &Actor,
        week: Option<week::Model>,
        session_ids: Vec<Uuid>,
    ) -> Result<LabToday, ServiceError> {
        if session_ids.is_empty() {
            return Ok(LabToday {
                week,
                records: Vec::new(),
                sessions: Vec::new(),
                groups: Vec::new(),
                courses: Vec::new(),
                users: Vec::new(),
            });
        }

        let records = check_in_record::Entity::find()
            .filter(check_in_record::Column::SessionId.is_in(session_ids.clone()))
            .filter(scope_condition::<check_in_record::Entity>(&read_scope(
                EntityKind::CheckInRecord,
                actor,
            )))
            .order_by_asc(check_in_record::Column::SessionId)
            .order_by_asc(check_in_record::Column::UserId)
            .all(db)
            .await?;

        let sessions = session::Entity::find()
            .filter(session::Column::Id.is_in(session_ids))
            .filter(scope_condition::<session::Entity>(&read_scope(
                EntityKind::Session,
                actor,
            )))
            .all(db)
            .await?;

        let group_ids: BTreeSet<Uuid> = sessions.iter().map(|s| s.group_id).collect();
        let groups = GroupService::visible(db, actor, group_ids.into_iter().collect()).await?;

        let course_ids: BTreeSet<Uuid> = groups.iter().map(|g| g.course_id).collect();
        let courses = CourseService::visible(db, actor, course_ids.into_iter().collect()).await?;

        let user_ids: BTreeSet<Uuid> = records.iter().map(|r| r.user_id).collect();
        let users = UserService::public_users(db, user_ids.into_iter().collect()).await?;

        Ok(LabToday {
            week,
            records,
            sessions: sessions
                .into_iter()
                .map(SessionRecord::try_from)
                .collect::<Result<_, _>>()?,
            groups,
            courses,
            users,
        })
    }
}
