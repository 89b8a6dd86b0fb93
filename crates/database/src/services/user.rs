use super::{
    Lookup, contains,
    membership::owners_of,
    scope::scope_condition,
};
use crate::{
    entities::{course_coordinator, group_student, group_teaching_assistant, lab_executive, profile, user},
    error::ServiceError,
};
use chrono::Utc;
use models::scope::{Actor, EntityKind, read_scope, write_scope};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// The longest username accepted
const MAX_USERNAME_LEN: usize = 150;

/// A user together with their profile flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: user::Model,
    pub is_ta: bool,
}

/// The fields of a user that anyone related to them may see
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<user::Model> for PublicUser {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Everything the current user needs to know about themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    #[serde(flatten)]
    pub user: UserRecord,
    pub lab_executive_of: Vec<Uuid>,
    pub course_coordinator_of: Vec<Uuid>,
    pub teaching_assistant_of: Vec<Uuid>,
    pub student_of: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_staff: Option<bool>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_ta: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub active: Option<bool>,
    pub is_ta: Option<bool>,
}

impl UserChanges {
    fn touches_privileges(&self) -> bool {
        self.is_staff.is_some()
            || self.is_superuser.is_some()
            || self.active.is_some()
            || self.is_ta.is_some()
    }
}

pub struct UserService;

impl UserService {
    /// The active user authenticated as `username`, if any
    pub async fn resolve_actor(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::Active.eq(true))
            .one(db)
            .await
    }

    pub async fn get(
        db: &DatabaseConnection,
        actor: &Actor,
        key: Lookup,
    ) -> Result<UserRecord, ServiceError> {
        let scope = read_scope(EntityKind::User, actor);

        let user = user::Entity::find()
            .filter(Self::key_condition(key))
            .filter(scope_condition::<user::Entity>(&scope))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let mut records = Self::with_profiles(db, vec![user]).await?;
        records.pop().ok_or(ServiceError::NotFound)
    }

    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: UserFilter,
    ) -> Result<Vec<UserRecord>, ServiceError> {
        let scope = read_scope(EntityKind::User, actor);
        let mut condition = Condition::all();

        if let Some(username) = filter.username {
            condition = condition.add(contains(user::Column::Username, &username));
        }
        if let Some(first_name) = filter.first_name {
            condition = condition.add(contains(user::Column::FirstName, &first_name));
        }
        if let Some(last_name) = filter.last_name {
            condition = condition.add(contains(user::Column::LastName, &last_name));
        }
        if let Some(email) = filter.email {
            condition = condition.add(contains(user::Column::Email, &email));
        }
        if let Some(is_staff) = filter.is_staff {
            condition = condition.add(user::Column::IsStaff.eq(is_staff));
        }
        if let Some(active) = filter.active {
            condition = condition.add(user::Column::Active.eq(active));
        }

        let users = user::Entity::find()
            .filter(condition)
            .filter(scope_condition::<user::Entity>(&scope))
            .order_by_asc(user::Column::Username)
            .all(db)
            .await?;

        Ok(Self::with_profiles(db, users).await?)
    }

    pub async fn add(
        db: &DatabaseConnection,
        actor: &Actor,
        new: NewUser,
    ) -> Result<UserRecord, ServiceError> {
        if !actor.is_privileged() {
            return Err(ServiceError::validation("Only staff may create users"));
        }
        if !actor.is_superuser && (new.is_staff || new.is_superuser || new.is_ta) {
            return Err(ServiceError::validation(
                "Only superusers may grant staff, superuser or TA status",
            ));
        }

        let username = new.username.trim().to_string();
        if username.is_empty() {
            return Err(ServiceError::validation("username is required"));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(ServiceError::validation(format!(
                "username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }

        let txn = db.begin().await?;

        let user = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            email: Set(new.email),
            is_staff: Set(new.is_staff),
            is_superuser: Set(new.is_superuser),
            active: Set(true),
            date_joined: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        profile::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            is_ta: Set(new.is_ta),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(UserRecord {
            user,
            is_ta: new.is_ta,
        })
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        key: Lookup,
        changes: UserChanges,
    ) -> Result<UserRecord, ServiceError> {
        if !actor.is_superuser && changes.touches_privileges() {
            return Err(ServiceError::validation(
                "Only superusers may change staff, superuser, TA or active status",
            ));
        }

        let scope = write_scope(EntityKind::User, actor);
        let txn = db.begin().await?;

        let user = user::Entity::find()
            .filter(Self::key_condition(key))
            .filter(scope_condition::<user::Entity>(&scope))
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound)?;
        let user_id = user.id;

        let mut active_user: user::ActiveModel = user.into();
        if let Some(first_name) = changes.first_name {
            active_user.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active_user.last_name = Set(last_name);
        }
        if let Some(email) = changes.email {
            active_user.email = Set(email);
        }
        if let Some(is_staff) = changes.is_staff {
            active_user.is_staff = Set(is_staff);
        }
        if let Some(is_superuser) = changes.is_superuser {
            active_user.is_superuser = Set(is_superuser);
        }
        if let Some(active) = changes.active {
            active_user.active = Set(active);
        }
        let user = active_user.update(&txn).await?;

        if let Some(is_ta) = changes.is_ta {
            Self::set_is_ta(&txn, user_id, is_ta).await?;
        }

        let mut records = Self::with_profiles(&txn, vec![user]).await?;
        txn.commit().await?;

        records.pop().ok_or(ServiceError::NotFound)
    }

    /// The actor's own user row and every relationship they hold
    pub async fn user_info(db: &DatabaseConnection, actor: &Actor) -> Result<UserInfo, ServiceError> {
        let user = user::Entity::find_by_id(actor.id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound)?;
        let mut records = Self::with_profiles(db, vec![user]).await?;
        let user = records.pop().ok_or(ServiceError::NotFound)?;

        Ok(UserInfo {
            user,
            lab_executive_of: owners_of::<lab_executive::Entity, _>(db, actor.id).await?,
            course_coordinator_of: owners_of::<course_coordinator::Entity, _>(db, actor.id).await?,
            teaching_assistant_of: owners_of::<group_teaching_assistant::Entity, _>(db, actor.id)
                .await?,
            student_of: owners_of::<group_student::Entity, _>(db, actor.id).await?,
        })
    }

    /// Public views of `ids`, in no particular order
    pub async fn public_users<C: ConnectionTrait>(
        conn: &C,
        ids: Vec<Uuid>,
    ) -> Result<Vec<PublicUser>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(ids))
            .order_by_asc(user::Column::Username)
            .all(conn)
            .await?;

        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    fn key_condition(key: Lookup) -> Condition {
        key.condition(user::Column::Id, user::Column::Username)
    }

    async fn set_is_ta<C: ConnectionTrait>(conn: &C, user_id: Uuid, is_ta: bool) -> Result<(), DbErr> {
        let existing = profile::Entity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(conn)
            .await?;

        match existing {
            Some(profile) => {
                let mut profile: profile::ActiveModel = profile.into();
                profile.is_ta = Set(is_ta);
                profile.update(conn).await?;
            }
            None => {
                profile::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(user_id),
                    is_ta: Set(is_ta),
                }
                .insert(conn)
                .await?;
            }
        }
        Ok(())
    }

    /// Attaches profile flags to each user, treating a missing profile as default
    async fn with_profiles<C: ConnectionTrait>(
        conn: &C,
        users: Vec<user::Model>,
    ) -> Result<Vec<UserRecord>, DbErr> {
        let user_ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();

        let is_ta: HashMap<Uuid, bool> = profile::Entity::find()
            .filter(profile::Column::UserId.is_in(user_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|p| (p.user_id, p.is_ta))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| UserRecord {
                is_ta: is_ta.get(&user.id).copied().unwrap_or(false),
                user,
            })
            .collect())
    }
}
