#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use database::{
    clock::Moment,
    entities::{course, group, lab, session::SessionDetails, week},
    services::{
        course::{CourseService, NewCourse},
        group::{GroupService, NewGroup},
        lab::{LabService, NewLab},
        session::{NewSession, SessionRecord, SessionService},
        user::{NewUser, UserService},
        week::{NewWeek, WeekService},
    },
};
use migration::{Migrator, MigratorTrait};
use models::{scope::Actor, weekday::DayOfWeek};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::PathBuf;
use uuid::Uuid;

/// A fresh, fully migrated in-memory database
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to sqlite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// A fully migrated database in a temporary file, served by a pool of several
/// connections so that calls can interleave
pub async fn setup_pooled_test_db() -> (DatabaseConnection, PathBuf) {
    let path = std::env::temp_dir().join(format!("attendance-{}.db", Uuid::new_v4()));
    let mut options = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    options.max_connections(4).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to sqlite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    (db, path)
}

pub fn root() -> Actor {
    Actor {
        id: Uuid::new_v4(),
        is_staff: true,
        is_superuser: true,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    day.and_time(time(h, m))
}

pub fn moment(day: NaiveDate, h: u32, m: u32) -> Moment {
    Moment::at(at(day, h, m))
}

/// Monday of the week the fixture's regular session belongs to
pub fn monday() -> NaiveDate {
    date(2026, 10, 12)
}

/// The day the fixture's group meets (a Thursday)
pub fn lab_day() -> NaiveDate {
    date(2026, 10, 15)
}

pub async fn add_user(db: &DatabaseConnection, username: &str) -> Actor {
    let record = UserService::add(
        db,
        &root(),
        NewUser {
            username: username.to_string(),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            email: format!("{username}@example.com"),
            is_staff: false,
            is_superuser: false,
            is_ta: false,
        },
    )
    .await
    .expect("Failed to add user");

    record.user.actor()
}

pub async fn add_lab(db: &DatabaseConnection, lab_name: &str, executives: Vec<Uuid>) -> lab::Model {
    LabService::add(
        db,
        &root(),
        NewLab {
            lab_name: lab_name.to_string(),
            room_count: 4,
            executives,
        },
    )
    .await
    .expect("Failed to add lab")
    .lab
}

pub async fn add_course(
    db: &DatabaseConnection,
    course_code: &str,
    coordinators: Vec<Uuid>,
) -> course::Model {
    CourseService::add(
        db,
        &root(),
        NewCourse {
            course_code: course_code.to_string(),
            title: format!("{course_code} Laboratory"),
            coordinators,
        },
    )
    .await
    .expect("Failed to add course")
    .course
}

pub fn new_group(course_id: Uuid, lab_id: Uuid, group_name: &str) -> NewGroup {
    NewGroup {
        course_id,
        group_name: group_name.to_string(),
        lab_id,
        lab_room: 1,
        day_of_week: DayOfWeek::THURSDAY,
        start_time: time(14, 0),
        end_time: time(16, 0),
        students: Vec::new(),
        teaching_assistants: Vec::new(),
    }
}

pub async fn add_week(db: &DatabaseConnection, monday_date: NaiveDate) -> week::Model {
    WeekService::add(db, &root(), NewWeek { monday_date })
        .await
        .expect("Failed to add week")
}

pub async fn add_regular_session(
    db: &DatabaseConnection,
    group_id: Uuid,
    week_id: Uuid,
) -> SessionRecord {
    SessionService::add(
        db,
        &root(),
        NewSession {
            group_id,
            check_in_ddl_mins: 15,
            allow_late_check_in: true,
            compulsory: true,
            details: SessionDetails::Regular { week_id },
        },
    )
    .await
    .expect("Failed to add regular session")
}

pub async fn add_special_session(
    db: &DatabaseConnection,
    group_id: Uuid,
    lab_id: Uuid,
    lab_date: NaiveDate,
    allow_late_check_in: bool,
) -> SessionRecord {
    SessionService::add(
        db,
        &root(),
        NewSession {
            group_id,
            check_in_ddl_mins: 10,
            allow_late_check_in,
            compulsory: false,
            details: SessionDetails::Special {
                lab_id,
                lab_room: 2,
                lab_date,
                start_time: time(9, 0),
                end_time: time(11, 0),
            },
        },
    )
    .await
    .expect("Failed to add special session")
}

/// One lab, course and Thursday group with a regular session in the week of [`monday`]
pub struct Fixture {
    pub lab: lab::Model,
    pub course: course::Model,
    pub group: group::Model,
    pub week: week::Model,
    pub session: SessionRecord,
    pub coordinator: Actor,
    pub executive: Actor,
    pub ta: Actor,
    pub student: Actor,
    pub outsider: Actor,
}

pub async fn fixture(db: &DatabaseConnection) -> Fixture {
    let coordinator = add_user(db, "coordinator").await;
    let executive = add_user(db, "executive").await;
    let ta = add_user(db, "ta").await;
    let student = add_user(db, "student").await;
    let outsider = add_user(db, "outsider").await;

    let lab = add_lab(db, "L1", vec![executive.id]).await;
    let course = add_course(db, "CS101", vec![coordinator.id]).await;

    let mut group = new_group(course.id, lab.id, "G1");
    group.students = vec![student.id];
    group.teaching_assistants = vec![ta.id];
    let group = GroupService::add(db, &root(), group)
        .await
        .expect("Failed to add group")
        .group;

    let week = add_week(db, monday()).await;
    let session = add_regular_session(db, group.id, week.id).await;

    Fixture {
        lab,
        course,
        group,
        week,
        session,
        coordinator,
        executive,
        ta,
        student,
        outsider,
    }
}
