//! Translates storage-independent [`Scope`]s into SQL conditions.

use crate::entities::{
    check_in_record, course, course_coordinator, group, group_teaching_assistant, lab,
    lab_executive, make_up_session, session, user, week,
};
use models::scope::{Role, Scope};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    QueryTrait,
    prelude::Expr,
    sea_query::{SelectStatement, SimpleExpr},
};
use uuid::Uuid;

/// An entity whose rows can be filtered by a [`Scope`]
pub trait Scoped: EntityTrait {
    /// Rows on which `user` holds `role`
    fn role_condition(role: Role, user: Uuid) -> Condition;

    fn id_column() -> Self::Column;

    /// Ids of the rows on which `user` holds `role`
    fn ids_with_role(role: Role, user: Uuid) -> SelectStatement {
        Self::find()
            .select_only()
            .column(Self::id_column())
            .filter(Self::role_condition(role, user))
            .into_query()
    }
}

/// The SQL condition selecting exactly the rows of `E` that `scope` admits
pub fn scope_condition<E: Scoped>(scope: &Scope) -> Condition {
    match scope {
        Scope::Everything => always(),
        Scope::Nothing => never(),
        Scope::Rule { role, user } => E::role_condition(*role, *user),
        Scope::Any(scopes) => scopes
            .iter()
            .fold(Condition::any(), |cond, scope| cond.add(scope_condition::<E>(scope))),
        Scope::All(scopes) => scopes
            .iter()
            .fold(Condition::all(), |cond, scope| cond.add(scope_condition::<E>(scope))),
    }
}

fn always() -> Condition {
    Condition::all().add(Expr::val(1).eq(1))
}

fn never() -> Condition {
    Condition::all().add(Expr::val(1).eq(0))
}

fn holds(expr: SimpleExpr) -> Condition {
    Condition::all().add(expr)
}

fn executed_labs(user: Uuid) -> SelectStatement {
    lab_executive::Entity::find()
        .select_only()
        .column(lab_executive::Column::LabId)
        .filter(lab_executive::Column::UserId.eq(user))
        .into_query()
}

fn coordinated_courses(user: Uuid) -> SelectStatement {
    course_coordinator::Entity::find()
        .select_only()
        .column(course_coordinator::Column::CourseId)
        .filter(course_coordinator::Column::UserId.eq(user))
        .into_query()
}

fn taught_groups(user: Uuid) -> SelectStatement {
    group_teaching_assistant::Entity::find()
        .select_only()
        .column(group_teaching_assistant::Column::GroupId)
        .filter(group_teaching_assistant::Column::UserId.eq(user))
        .into_query()
}

impl Scoped for user::Entity {
    fn role_condition(role: Role, user: Uuid) -> Condition {
        match role {
            Role::Oneself => holds(user::Column::Id.eq(user)),
            _ => never(),
        }
    }

    fn id_column() -> Self::Column {
        user::Column::Id
    }
}

impl Scoped for week::Entity {
    fn role_condition(_role: Role, _user: Uuid) -> Condition {
        never()
    }

    fn id_column() -> Self::Column {
        week::Column::Id
    }
}

impl Scoped for lab::Entity {
    fn role_condition(role: Role, user: Uuid) -> Condition {
        match role {
            Role::LabExecutive => holds(lab::Column::Id.in_subquery(executed_labs(user))),
            _ => never(),
        }
    }

    fn id_column() -> Self::Column {
        lab::Column::Id
    }
}

impl Scoped for course::Entity {
    fn role_condition(role: Role, user: Uuid) -> Condition {
        match role {
            Role::CourseCoordinator => {
                holds(course::Column::Id.in_subquery(coordinated_courses(user)))
            }
            Role::TeachingAssistant => {
                let courses_taught = group::Entity::find()
                    .select_only()
                    .column(group::Column::CourseId)
                    .filter(group::Column::Id.in_subquery(taught_groups(user)))
                    .into_query();
                holds(course::Column::Id.in_subquery(courses_taught))
            }
            _ => never(),
        }
    }

    fn id_column() -> Self::Column {
        course::Column::Id
    }
}

impl Scoped for group::Entity {
    fn role_condition(role: Role, user: Uuid) -> Condition {
        match role {
            Role::CourseCoordinator => {
                holds(group::Column::CourseId.in_subquery(coordinated_courses(user)))
            }
            Role::LabExecutive => holds(group::Column::LabId.in_subquery(executed_labs(user))),
            Role::TeachingAssistant => holds(group::Column::Id.in_subquery(taught_groups(user))),
            _ => never(),
        }
    }

    fn id_column() -> Self::Column {
        group::Column::Id
    }
}

// Sessions inherit every relationship from their group
impl Scoped for session::Entity {
    fn role_condition(role: Role, user: Uuid) -> Condition {
        match role {
            Role::CourseCoordinator | Role::LabExecutive | Role::TeachingAssistant => holds(
                session::Column::GroupId.in_subquery(group::Entity::ids_with_role(role, user)),
            ),
            _ => never(),
        }
    }

    fn id_column() -> Self::Column {
        session::Column::Id
    }
}

impl Scoped for check_in_record::Entity {
    fn role_condition(role: Role, user: Uuid) -> Condition {
        match role {
            Role::Owner => holds(check_in_record::Column::UserId.eq(user)),
            Role::CourseCoordinator | Role::LabExecutive | Role::TeachingAssistant => {
                holds(check_in_record::Column::SessionId.in_subquery(
                    session::Entity::ids_with_role(role, user),
                ))
            }
            Role::Oneself => never(),
        }
    }

    fn id_column() -> Self::Column {
        check_in_record::Column::Id
    }
}

impl Scoped for make_up_session::Entity {
    fn role_condition(role: Role, user: Uuid) -> Condition {
        match role {
            Role::Owner => holds(make_up_session::Column::StudentId.eq(user)),
            Role::CourseCoordinator | Role::LabExecutive | Role::TeachingAssistant => {
                holds(make_up_session::Column::OriginalSessionId.in_subquery(
                    session::Entity::ids_with_role(role, user),
                ))
            }
            Role::Oneself => never(),
        }
    }

    fn id_column() -> Self::Column {
        make_up_session::Column::Id
    }
}

/// Fetches the row with `id`, provided `scope` admits it
pub async fn find_in_scope<E, C>(conn: &C, scope: &Scope, id: Uuid) -> Result<Option<E::Model>, DbErr>
where
    E: Scoped,
    C: ConnectionTrait,
{
    E::find()
        .filter(E::id_column().eq(id))
        .filter(scope_condition::<E>(scope))
        .one(conn)
        .await
}
