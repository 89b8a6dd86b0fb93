use super::{Lookup, scope::scope_condition};
use crate::{entities::week, error::ServiceError};
use chrono::NaiveDate;
use models::{
    calendar::{is_monday, week_window},
    scope::{Actor, EntityKind, read_scope},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct WeekFilter {
    pub monday_date: Option<NaiveDate>,
    /// Only weeks starting on or after this date
    pub since: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewWeek {
    pub monday_date: NaiveDate,
}

pub struct WeekService;

impl WeekService {
    pub async fn get(
        db: &DatabaseConnection,
        actor: &Actor,
        key: Lookup,
    ) -> Result<week::Model, ServiceError> {
        let key_condition = match key {
            Lookup::Id(id) => week::Column::Id.eq(id),
            Lookup::Name(key) => match (key.parse::<NaiveDate>(), Uuid::parse_str(&key)) {
                (Ok(monday_date), _) => week::Column::MondayDate.eq(monday_date),
                (_, Ok(id)) => week::Column::Id.eq(id),
                _ => return Err(ServiceError::NotFound),
            },
        };

        week::Entity::find()
            .filter(key_condition)
            .filter(scope_condition::<week::Entity>(&read_scope(EntityKind::Week, actor)))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: WeekFilter,
    ) -> Result<Vec<week::Model>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(monday_date) = filter.monday_date {
            condition = condition.add(week::Column::MondayDate.eq(monday_date));
        }
        if let Some(since) = filter.since {
            condition = condition.add(week::Column::MondayDate.gte(since));
        }

        Ok(week::Entity::find()
            .filter(condition)
            .filter(scope_condition::<week::Entity>(&read_scope(EntityKind::Week, actor)))
            .order_by_desc(week::Column::MondayDate)
            .all(db)
            .await?)
    }

    pub async fn add(
        db: &DatabaseConnection,
        actor: &Actor,
        new: NewWeek,
    ) -> Result<week::Model, ServiceError> {
        if !actor.is_privileged() {
            return Err(ServiceError::validation("Only staff may create weeks"));
        }
        if !is_monday(new.monday_date) {
            return Err(ServiceError::constraint("monday_date must be a Monday"));
        }

        Ok(week::ActiveModel {
            id: Set(Uuid::new_v4()),
            monday_date: Set(new.monday_date),
        }
        .insert(db)
        .await?)
    }

    /// The latest week whose Monday lies in `(today - 7 days, today]`
    pub async fn covering<C: ConnectionTrait>(
        conn: &C,
        today: NaiveDate,
    ) -> Result<Option<week::Model>, DbErr> {
        let (after, until) = week_window(today);

        week::Entity::find()
            .filter(week::Column::MondayDate.gt(after))
            .filter(week::Column::MondayDate.lte(until))
            .order_by_desc(week::Column::MondayDate)
            .one(conn)
            .await
    }
}
