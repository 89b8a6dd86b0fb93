use super::{
    contains,
    membership::{members_of, replace_members},
    required_text,
    scope::{find_in_scope, scope_condition},
};
use crate::{
    entities::{course, group, group_student, group_teaching_assistant, lab},
    error::{ServiceError, is_unique_violation},
};
use chrono::NaiveTime;
use models::{
    scope::{Actor, EntityKind, read_scope, write_scope},
    weekday::DayOfWeek,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

pub const MAX_GROUP_NAME_LEN: usize = 16;

/// A group with the ids of its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRecord {
    #[serde(flatten)]
    pub group: group::Model,
    pub students: Vec<Uuid>,
    pub teaching_assistants: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    pub course_id: Option<Uuid>,
    pub lab_id: Option<Uuid>,
    pub day_of_week: Option<DayOfWeek>,
    pub group_name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub course_id: Uuid,
    pub group_name: String,
    pub lab_id: Uuid,
    pub lab_room: i32,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub students: Vec<Uuid>,
    pub teaching_assistants: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupChanges {
    pub group_name: Option<String>,
    pub lab_id: Option<Uuid>,
    pub lab_room: Option<i32>,
    pub day_of_week: Option<DayOfWeek>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub active: Option<bool>,
    pub students: Option<Vec<Uuid>>,
    pub teaching_assistants: Option<Vec<Uuid>>,
}

pub struct GroupService;

impl GroupService {
    pub async fn get(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
    ) -> Result<GroupRecord, ServiceError> {
        Self::get_where(db, actor, Condition::all().add(group::Column::Id.eq(id))).await
    }

    /// Looks a group up by its natural key, the course code and group name
    pub async fn get_by_name(
        db: &DatabaseConnection,
        actor: &Actor,
        course_code: &str,
        group_name: &str,
    ) -> Result<GroupRecord, ServiceError> {
        let course = course::Entity::find()
            .filter(course::Column::CourseCode.eq(course_code))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let condition = Condition::all()
            .add(group::Column::CourseId.eq(course.id))
            .add(group::Column::GroupName.eq(group_name));
        Self::get_where(db, actor, condition).await
    }

    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: GroupFilter,
    ) -> Result<Vec<GroupRecord>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(course_id) = filter.course_id {
            condition = condition.add(group::Column::CourseId.eq(course_id));
        }
        if let Some(lab_id) = filter.lab_id {
            condition = condition.add(group::Column::LabId.eq(lab_id));
        }
        if let Some(day_of_week) = filter.day_of_week {
            condition = condition.add(group::Column::DayOfWeek.eq(day_of_week.number()));
        }
        if let Some(group_name) = filter.group_name {
            condition = condition.add(contains(group::Column::GroupName, &group_name));
        }
        if let Some(active) = filter.active {
            condition = condition.add(group::Column::Active.eq(active));
        }

        let groups = group::Entity::find()
            .filter(condition)
            .filter(scope_condition::<group::Entity>(&read_scope(EntityKind::Group, actor)))
            .order_by_asc(group::Column::DayOfWeek)
            .order_by_asc(group::Column::StartTime)
            .order_by_asc(group::Column::GroupName)
            .all(db)
            .await?;

        Ok(Self::with_members(db, groups).await?)
    }

    /// Groups by id, restricted to those `actor` may read
    pub async fn visible<C: ConnectionTrait>(
        conn: &C,
        actor: &Actor,
        ids: Vec<Uuid>,
    ) -> Result<Vec<group::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        group::Entity::find()
            .filter(group::Column::Id.is_in(ids))
            .filter(scope_condition::<group::Entity>(&read_scope(EntityKind::Group, actor)))
            .order_by_asc(group::Column::StartTime)
            .all(conn)
            .await
    }

    pub async fn add(
        db: &DatabaseConnection,
        actor: &Actor,
        new: NewGroup,
    ) -> Result<GroupRecord, ServiceError> {
        let group_name = required_text("group_name", &new.group_name, MAX_GROUP_NAME_LEN)?;
        Self::check_schedule(new.lab_room, new.start_time, new.end_time)?;

        let txn = db.begin().await?;

        // A new group must hang off a course or lab the actor may write
        let course_scope = write_scope(EntityKind::Course, actor);
        let lab_scope = write_scope(EntityKind::Lab, actor);
        let writable_course = find_in_scope::<course::Entity, _>(&txn, &course_scope, new.course_id)
            .await?
            .is_some();
        let writable_lab = find_in_scope::<lab::Entity, _>(&txn, &lab_scope, new.lab_id)
            .await?
            .is_some();
        if !writable_course && !writable_lab {
            return Err(ServiceError::validation(
                "course or lab does not exist or is not writable",
            ));
        }

        let group = group::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(new.course_id),
            group_name: Set(group_name),
            lab_id: Set(new.lab_id),
            lab_room: Set(new.lab_room),
            day_of_week: Set(new.day_of_week.number()),
            start_time: Set(new.start_time),
            end_time: Set(new.end_time),
            active: Set(true),
        }
        .insert(&txn)
        .await
        .map_err(Self::duplicate_name)?;

        replace_members::<group_student::Entity, _>(&txn, group.id, &new.students).await?;
        replace_members::<group_teaching_assistant::Entity, _>(
            &txn,
            group.id,
            &new.teaching_assistants,
        )
        .await?;

        let mut records = Self::with_members(&txn, vec![group]).await?;
        txn.commit().await?;

        records.pop().ok_or(ServiceError::NotFound)
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        changes: GroupChanges,
    ) -> Result<GroupRecord, ServiceError> {
        let scope = write_scope(EntityKind::Group, actor);
        let txn = db.begin().await?;

        let group = find_in_scope::<group::Entity, _>(&txn, &scope, id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        Self::check_schedule(
            changes.lab_room.unwrap_or(group.lab_room),
            changes.start_time.unwrap_or(group.start_time),
            changes.end_time.unwrap_or(group.end_time),
        )?;

        let mut active_group: group::ActiveModel = group.into();
        if let Some(group_name) = changes.group_name {
            active_group.group_name =
                Set(required_text("group_name", &group_name, MAX_GROUP_NAME_LEN)?);
        }
        if let Some(lab_id) = changes.lab_id {
            active_group.lab_id = Set(lab_id);
        }
        if let Some(lab_room) = changes.lab_room {
            active_group.lab_room = Set(lab_room);
        }
        if let Some(day_of_week) = changes.day_of_week {
            active_group.day_of_week = Set(day_of_week.number());
        }
        if let Some(start_time) = changes.start_time {
            active_group.start_time = Set(start_time);
        }
        if let Some(end_time) = changes.end_time {
            active_group.end_time = Set(end_time);
        }
        if let Some(active) = changes.active {
            active_group.active = Set(active);
        }
        let group = active_group
            .update(&txn)
            .await
            .map_err(Self::duplicate_name)?;

        if let Some(students) = changes.students {
            replace_members::<group_student::Entity, _>(&txn, id, &students).await?;
        }
        if let Some(teaching_assistants) = changes.teaching_assistants {
            replace_members::<group_teaching_assistant::Entity, _>(&txn, id, &teaching_assistants)
                .await?;
        }

        let mut records = Self::with_members(&txn, vec![group]).await?;
        txn.commit().await?;

        records.pop().ok_or(ServiceError::NotFound)
    }

    async fn get_where(
        db: &DatabaseConnection,
        actor: &Actor,
        condition: Condition,
    ) -> Result<GroupRecord, ServiceError> {
        let group = group::Entity::find()
            .filter(condition)
            .filter(scope_condition::<group::Entity>(&read_scope(EntityKind::Group, actor)))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let mut records = Self::with_members(db, vec![group]).await?;
        records.pop().ok_or(ServiceError::NotFound)
    }

    fn check_schedule(
        lab_room: i32,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<(), ServiceError> {
        if lab_room <= 0 {
            return Err(ServiceError::constraint("invalid lab room number"));
        }
        if start_time >= end_time {
            return Err(ServiceError::constraint(
                "start time must be earlier than end time",
            ));
        }
        Ok(())
    }

    fn duplicate_name(err: DbErr) -> ServiceError {
        if is_unique_violation(&err) {
            ServiceError::constraint("a course cannot have two groups with the same name")
        } else {
            err.into()
        }
    }

    async fn with_members<C: ConnectionTrait>(
        conn: &C,
        groups: Vec<group::Model>,
    ) -> Result<Vec<GroupRecord>, DbErr> {
        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let mut students = members_of::<group_student::Entity, _>(conn, &group_ids).await?;
        let mut teaching_assistants =
            members_of::<group_teaching_assistant::Entity, _>(conn, &group_ids).await?;

        Ok(groups
            .into_iter()
            .map(|group| GroupRecord {
                students: students.remove(&group.id).unwrap_or_default(),
                teaching_assistants: teaching_assistants.remove(&group.id).unwrap_or_default(),
                group,
            })
            .collect())
    }
}
