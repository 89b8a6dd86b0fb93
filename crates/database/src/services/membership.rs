//! Many-to-many links between users and labs, courses or groups.

use crate::entities::{course_coordinator, group_student, group_teaching_assistant, lab_executive};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QuerySelect,
};
use std::collections::HashMap;
use uuid::Uuid;

/// A junction table between an owning row and its member users
pub trait Membership: EntityTrait {
    fn owner_column() -> Self::Column;
    fn user_column() -> Self::Column;
    fn link(owner: Uuid, user: Uuid) -> Self::ActiveModel;
}

/// Member ids of each owner in `owners`; owners without members are absent
pub async fn members_of<M, C>(conn: &C, owners: &[Uuid]) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr>
where
    M: Membership,
    C: ConnectionTrait,
{
    if owners.is_empty() {
        return Ok(HashMap::new());
    }

    let links = M::find()
        .select_only()
        .column(M::owner_column())
        .column(M::user_column())
        .filter(M::owner_column().is_in(owners.iter().copied()))
        .into_tuple::<(Uuid, Uuid)>()
        .all(conn)
        .await?;

    let mut members: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (owner, user) in links {
        members.entry(owner).or_default().push(user);
    }
    Ok(members)
}

/// Owners that `user` is a member of
pub async fn owners_of<M, C>(conn: &C, user: Uuid) -> Result<Vec<Uuid>, DbErr>
where
    M: Membership,
    C: ConnectionTrait,
{
    M::find()
        .select_only()
        .column(M::owner_column())
        .filter(M::user_column().eq(user))
        .into_tuple::<Uuid>()
        .all(conn)
        .await
}

/// Replaces the member set of `owner` with `users`
pub async fn replace_members<M, C>(conn: &C, owner: Uuid, users: &[Uuid]) -> Result<(), DbErr>
where
    M: Membership,
    M::ActiveModel: ActiveModelTrait<Entity = M>,
    M::Model: IntoActiveModel<M::ActiveModel>,
    C: ConnectionTrait,
{
    M::delete_many()
        .filter(M::owner_column().eq(owner))
        .exec(conn)
        .await?;

    let mut users = users.to_vec();
    users.sort_unstable();
    users.dedup();

    if !users.is_empty() {
        M::insert_many(users.into_iter().map(|user| M::link(owner, user)))
            .exec_without_returning(conn)
            .await?;
    }
    Ok(())
}

impl Membership for lab_executive::Entity {
    fn owner_column() -> Self::Column {
        lab_executive::Column::LabId
    }

    fn user_column() -> Self::Column {
        lab_executive::Column::UserId
    }

    fn link(owner: Uuid, user: Uuid) -> Self::ActiveModel {
        lab_executive::ActiveModel {
            id: Set(Uuid::new_v4()),
            lab_id: Set(owner),
            user_id: Set(user),
        }
    }
}

impl Membership for course_coordinator::Entity {
    fn owner_column() -> Self::Column {
        course_coordinator::Column::CourseId
    }

    fn user_column() -> Self::Column {
        course_coordinator::Column::UserId
    }

    fn link(owner: Uuid, user: Uuid) -> Self::ActiveModel {
        course_coordinator::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(owner),
            user_id: Set(user),
        }
    }
}

impl Membership for group_student::Entity {
    fn owner_column() -> Self::Column {
        group_student::Column::GroupId
    }

    fn user_column() -> Self::Column {
        group_student::Column::UserId
    }

    fn link(owner: Uuid, user: Uuid) -> Self::ActiveModel {
        group_student::ActiveModel {
            id: Set(Uuid::new_v4()),
            group_id: Set(owner),
            user_id: Set(user),
        }
    }
}

impl Membership for group_teaching_assistant::Entity {
    fn owner_column() -> Self::Column {
        group_teaching_assistant::Column::GroupId
    }

    fn user_column() -> Self::Column {
        group_teaching_assistant::Column::UserId
    }

    fn link(owner: Uuid, user: Uuid) -> Self::ActiveModel {
        group_teaching_assistant::ActiveModel {
            id: Set(Uuid::new_v4()),
            group_id: Set(owner),
            user_id: Set(user),
        }
    }
}
