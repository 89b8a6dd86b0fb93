use super::{
    Lookup, contains,
    membership::{members_of, replace_members},
    required_text,
    scope::scope_condition,
};
use crate::{
    entities::{course, course_coordinator},
    error::ServiceError,
};
use models::scope::{Actor, EntityKind, read_scope, write_scope};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

pub const MAX_COURSE_CODE_LEN: usize = 32;
pub const MAX_TITLE_LEN: usize = 128;

/// A course with the ids of its coordinators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseRecord {
    #[serde(flatten)]
    pub course: course::Model,
    pub coordinators: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub course_code: Option<String>,
    pub title: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub course_code: String,
    pub title: String,
    pub coordinators: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub course_code: Option<String>,
    pub title: Option<String>,
    pub active: Option<bool>,
    pub coordinators: Option<Vec<Uuid>>,
}

pub struct CourseService;

impl CourseService {
    pub async fn get(
        db: &DatabaseConnection,
        actor: &Actor,
        key: Lookup,
    ) -> Result<CourseRecord, ServiceError> {
        let course = course::Entity::find()
            .filter(Self::key_condition(key))
            .filter(scope_condition::<course::Entity>(&read_scope(EntityKind::Course, actor)))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let mut records = Self::with_coordinators(db, vec![course]).await?;
        records.pop().ok_or(ServiceError::NotFound)
    }

    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: CourseFilter,
    ) -> Result<Vec<CourseRecord>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(course_code) = filter.course_code {
            condition = condition.add(contains(course::Column::CourseCode, &course_code));
        }
        if let Some(title) = filter.title {
            condition = condition.add(contains(course::Column::Title, &title));
        }
        if let Some(active) = filter.active {
            condition = condition.add(course::Column::Active.eq(active));
        }

        let courses = course::Entity::find()
            .filter(condition)
            .filter(scope_condition::<course::Entity>(&read_scope(EntityKind::Course, actor)))
            .order_by_asc(course::Column::CourseCode)
            .all(db)
            .await?;

        Ok(Self::with_coordinators(db, courses).await?)
    }

    /// Courses by id, restricted to those `actor` may read
    pub async fn visible<C: ConnectionTrait>(
        conn: &C,
        actor: &Actor,
        ids: Vec<Uuid>,
    ) -> Result<Vec<course::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        course::Entity::find()
            .filter(course::Column::Id.is_in(ids))
            .filter(scope_condition::<course::Entity>(&read_scope(EntityKind::Course, actor)))
            .order_by_asc(course::Column::CourseCode)
            .all(conn)
            .await
    }

    pub async fn add(
        db: &DatabaseConnection,
        actor: &Actor,
        new: NewCourse,
    ) -> Result<CourseRecord, ServiceError> {
        if !actor.is_privileged() {
            return Err(ServiceError::validation("Only staff may create courses"));
        }
        let course_code = required_text("course_code", &new.course_code, MAX_COURSE_CODE_LEN)?;
        let title = required_text("title", &new.title, MAX_TITLE_LEN)?;

        let txn = db.begin().await?;

        let course = course::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_code: Set(course_code),
            title: Set(title),
            active: Set(true),
        }
        .insert(&txn)
        .await?;
        replace_members::<course_coordinator::Entity, _>(&txn, course.id, &new.coordinators)
            .await?;

        let mut records = Self::with_coordinators(&txn, vec![course]).await?;
        txn.commit().await?;

        records.pop().ok_or(ServiceError::NotFound)
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        key: Lookup,
        changes: CourseChanges,
    ) -> Result<CourseRecord, ServiceError> {
        let scope = write_scope(EntityKind::Course, actor);
        let txn = db.begin().await?;

        let course = course::Entity::find()
            .filter(Self::key_condition(key))
            .filter(scope_condition::<course::Entity>(&scope))
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound)?;
        let course_id = course.id;

        let mut active_course: course::ActiveModel = course.into();
        if let Some(course_code) = changes.course_code {
            active_course.course_code =
                Set(required_text("course_code", &course_code, MAX_COURSE_CODE_LEN)?);
        }
        if let Some(title) = changes.title {
            active_course.title = Set(required_text("title", &title, MAX_TITLE_LEN)?);
        }
        if let Some(active) = changes.active {
            active_course.active = Set(active);
        }
        let course = active_course.update(&txn).await?;

        if let Some(coordinators) = changes.coordinators {
            replace_members::<course_coordinator::Entity, _>(&txn, course_id, &coordinators)
                .await?;
        }

        let mut records = Self::with_coordinators(&txn, vec![course]).await?;
        txn.commit().await?;

        records.pop().ok_or(ServiceError::NotFound)
    }

    fn key_condition(key: Lookup) -> Condition {
        key.condition(course::Column::Id, course::Column::CourseCode)
    }

    async fn with_coordinators<C: ConnectionTrait>(
        conn: &C,
        courses: Vec<course::Model>,
    ) -> Result<Vec<CourseRecord>, DbErr> {
        let course_ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();
        let mut coordinators =
            members_of::<course_coordinator::Entity, _>(conn, &course_ids).await?;

        Ok(courses
            .into_iter()
            .map(|course| CourseRecord {
                coordinators: coordinators.remove(&course.id).unwrap_or_default(),
                course,
            })
            .collect())
    }
}
