//! Row-level access scopes.
//!
//! A [`Scope`] is a boolean expression over named relationship rules between the
//! acting user and a row. It says nothing about how a row is stored: the database
//! layer translates each [`Role`] into a filter for its tables, and
//! [`Scope::permits`] evaluates the same expression against in-memory facts.

use uuid::Uuid;

/// The user on whose behalf an operation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Actor {
    /// Root entities (users, weeks, labs, courses) may only be created by privileged actors
    pub fn is_privileged(&self) -> bool {
        self.is_staff || self.is_superuser
    }
}

/// Entity types whose rows are subject to a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Week,
    Lab,
    Course,
    Group,
    Session,
    CheckInRecord,
    MakeUpSession,
}

impl EntityKind {
    pub const ALL: [Self; 8] = [
        Self::User,
        Self::Week,
        Self::Lab,
        Self::Course,
        Self::Group,
        Self::Session,
        Self::CheckInRecord,
        Self::MakeUpSession,
    ];

    /// Whether a staff actor may read every row of this entity
    fn staff_reads_all(self) -> bool {
        matches!(
            self,
            Self::User | Self::Week | Self::Course | Self::Group | Self::Session
        )
    }
}

/// A relationship between a user and a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The row is the user
    Oneself,
    /// The row belongs to the user (their check-in record or make-up session)
    Owner,
    /// The user is an executive of the row's lab
    LabExecutive,
    /// The user coordinates the row's course
    CourseCoordinator,
    /// The user is a teaching assistant of the row's group
    TeachingAssistant,
}

/// Answers which roles a user holds on one particular row
pub trait RoleFacts {
    fn holds(&self, role: Role, user: Uuid) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Everything,
    Nothing,
    Rule { role: Role, user: Uuid },
    Any(Vec<Scope>),
    All(Vec<Scope>),
}

impl Scope {
    pub fn rule(role: Role, user: Uuid) -> Self {
        Self::Rule { role, user }
    }

    /// Disjunction, collapsing trivially true or false members
    pub fn any(scopes: impl IntoIterator<Item = Scope>) -> Self {
        let mut members = Vec::new();
        for scope in scopes {
            match scope {
                Self::Everything => return Self::Everything,
                Self::Nothing => {}
                other => members.push(other),
            }
        }

        match members.len() {
            0 => Self::Nothing,
            1 => members.remove(0),
            _ => Self::Any(members),
        }
    }

    /// Conjunction, collapsing trivially true or false members
    pub fn all(scopes: impl IntoIterator<Item = Scope>) -> Self {
        let mut members = Vec::new();
        for scope in scopes {
            match scope {
                Self::Nothing => return Self::Nothing,
                Self::Everything => {}
                other => members.push(other),
            }
        }

        match members.len() {
            0 => Self::Everything,
            1 => members.remove(0),
            _ => Self::All(members),
        }
    }

    pub fn roles(user: Uuid, roles: &[Role]) -> Self {
        Self::any(roles.iter().map(|&role| Self::rule(role, user)))
    }

    pub fn is_everything(&self) -> bool {
        matches!(self, Self::Everything)
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    pub fn permits<F: RoleFacts + ?Sized>(&self, facts: &F) -> bool {
        match self {
            Self::Everything => true,
            Self::Nothing => false,
            Self::Rule { role, user } => facts.holds(*role, *user),
            Self::Any(scopes) => scopes.iter().any(|scope| scope.permits(facts)),
            Self::All(scopes) => scopes.iter().all(|scope| scope.permits(facts)),
        }
    }
}

/// Rows of `kind` that `actor` may see
pub fn read_scope(kind: EntityKind, actor: &Actor) -> Scope {
    if actor.is_superuser || (actor.is_staff && kind.staff_reads_all()) {
        return Scope::Everything;
    }

    let me = actor.id;
    match kind {
        EntityKind::User => Scope::rule(Role::Oneself, me),
        EntityKind::Week => Scope::Everything,
        EntityKind::Lab => Scope::rule(Role::LabExecutive, me),
        EntityKind::Course => {
            Scope::roles(me, &[Role::CourseCoordinator, Role::TeachingAssistant])
        }
        EntityKind::Group | EntityKind::Session => Scope::roles(
            me,
            &[
                Role::CourseCoordinator,
                Role::LabExecutive,
                Role::TeachingAssistant,
            ],
        ),
        EntityKind::CheckInRecord | EntityKind::MakeUpSession => Scope::roles(
            me,
            &[
                Role::Owner,
                Role::CourseCoordinator,
                Role::LabExecutive,
                Role::TeachingAssistant,
            ],
        ),
    }
}

/// Rows of `kind` that `actor` may modify
///
/// Staff status and teaching assistantships never widen this scope; only
/// superusers write everywhere.
pub fn write_scope(kind: EntityKind, actor: &Actor) -> Scope {
    if actor.is_superuser {
        return Scope::Everything;
    }

    let me = actor.id;
    match kind {
        EntityKind::User => Scope::rule(Role::Oneself, me),
        EntityKind::Week => Scope::Nothing,
        EntityKind::Lab => Scope::rule(Role::LabExecutive, me),
        EntityKind::Course => Scope::rule(Role::CourseCoordinator, me),
        EntityKind::Group
        | EntityKind::Session
        | EntityKind::CheckInRecord
        | EntityKind::MakeUpSession => {
            Scope::roles(me, &[Role::CourseCoordinator, Role::LabExecutive])
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    /// Roles held on a single row, e.g. one group
    #[derive(Default)]
    struct Facts(HashSet<(Role, Uuid)>);

    impl Facts {
        fn with(mut self, role: Role, user: Uuid) -> Self {
            self.0.insert((role, user));
            self
        }
    }

    impl RoleFacts for Facts {
        fn holds(&self, role: Role, user: Uuid) -> bool {
            self.0.contains(&(role, user))
        }
    }

    fn actor(is_staff: bool, is_superuser: bool) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            is_staff,
            is_superuser,
        }
    }

    #[test]
    fn test_any_and_all_collapse() {
        let user = Uuid::new_v4();
        let rule = Scope::rule(Role::Owner, user);

        assert_eq!(Scope::any([]), Scope::Nothing);
        assert_eq!(Scope::any([Scope::Nothing, rule.clone()]), rule);
        assert_eq!(
            Scope::any([rule.clone(), Scope::Everything]),
            Scope::Everything
        );
        assert_eq!(Scope::all([]), Scope::Everything);
        assert_eq!(Scope::all([rule.clone(), Scope::Nothing]), Scope::Nothing);
        assert_eq!(Scope::all([Scope::Everything, rule.clone()]), rule);
    }

    #[test]
    fn test_group_read_requires_a_relationship() {
        let me = actor(false, false);
        let scope = read_scope(EntityKind::Group, &me);

        assert!(!scope.permits(&Facts::default()));
        assert!(!scope.permits(&Facts::default().with(Role::TeachingAssistant, Uuid::new_v4())));

        for role in [
            Role::CourseCoordinator,
            Role::LabExecutive,
            Role::TeachingAssistant,
        ] {
            assert!(scope.permits(&Facts::default().with(role, me.id)));
        }
    }

    #[test]
    fn test_teaching_assistant_never_writes() {
        let me = actor(false, false);
        let ta = Facts::default().with(Role::TeachingAssistant, me.id);

        for kind in EntityKind::ALL {
            assert!(!write_scope(kind, &me).permits(&ta), "{kind:?}");
        }
        assert!(read_scope(EntityKind::Session, &me).permits(&ta));
        assert!(read_scope(EntityKind::Course, &me).permits(&ta));
        assert!(!read_scope(EntityKind::Lab, &me).permits(&ta));
    }

    #[test]
    fn test_coordinator_writes_groups_and_sessions() {
        let me = actor(false, false);
        let coordinator = Facts::default().with(Role::CourseCoordinator, me.id);

        for kind in [
            EntityKind::Course,
            EntityKind::Group,
            EntityKind::Session,
            EntityKind::CheckInRecord,
        ] {
            assert!(read_scope(kind, &me).permits(&coordinator), "{kind:?}");
            assert!(write_scope(kind, &me).permits(&coordinator), "{kind:?}");
        }
    }

    #[test]
    fn test_staff_broadens_read_only() {
        let staff = actor(true, false);

        for kind in [
            EntityKind::User,
            EntityKind::Course,
            EntityKind::Group,
            EntityKind::Session,
        ] {
            assert!(read_scope(kind, &staff).is_everything(), "{kind:?}");
        }
        for kind in [EntityKind::Lab, EntityKind::CheckInRecord] {
            assert!(!read_scope(kind, &staff).is_everything(), "{kind:?}");
        }
        for kind in EntityKind::ALL {
            assert!(!write_scope(kind, &staff).is_everything(), "{kind:?}");
        }
    }

    #[test]
    fn test_superuser_reads_and_writes_everything() {
        let root = actor(false, true);

        for kind in EntityKind::ALL {
            assert!(read_scope(kind, &root).is_everything(), "{kind:?}");
            assert!(write_scope(kind, &root).is_everything(), "{kind:?}");
        }
    }

    #[test]
    fn test_own_records_are_readable_but_not_writable() {
        let me = actor(false, false);
        let own = Facts::default().with(Role::Owner, me.id);

        assert!(read_scope(EntityKind::CheckInRecord, &me).permits(&own));
        assert!(!write_scope(EntityKind::CheckInRecord, &me).permits(&own));
    }

    #[test]
    fn test_users_only_see_themselves() {
        let me = actor(false, false);
        let scope = read_scope(EntityKind::User, &me);

        assert!(scope.permits(&Facts::default().with(Role::Oneself, me.id)));
        assert!(!scope.permits(&Facts::default().with(Role::Oneself, Uuid::new_v4())));
        assert_eq!(write_scope(EntityKind::User, &me), scope);
        assert!(write_scope(EntityKind::Week, &me).is_nothing());
    }
}
