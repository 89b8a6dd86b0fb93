mod common;

use common::*;
use database::{
    entities::{group, session::SessionDetails},
    error::ServiceError,
    services::{
        Lookup,
        course::CourseService,
        group::{GroupChanges, GroupService},
        lab::LabService,
        session::{SessionChanges, SessionFilter, SessionService},
        today::TodayService,
        user::UserService,
    },
};
use models::attendance::{CheckInState, SessionKind};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use uuid::Uuid;

#[tokio::test]
async fn test_teaching_assistant_lists_but_cannot_update_sessions() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let filter = SessionFilter {
        group_id: Some(f.group.id),
        ..Default::default()
    };
    let sessions = SessionService::list(&db, &f.ta, filter).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, f.session.id);

    let changes = SessionChanges {
        check_in_ddl_mins: Some(30),
        ..Default::default()
    };
    let err = SessionService::update(&db, &f.ta, f.session.id, changes.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));

    let updated = SessionService::update(&db, &f.coordinator, f.session.id, changes)
        .await
        .unwrap();
    assert_eq!(updated.check_in_ddl_mins, 30);
    assert!(SessionService::get(&db, &f.coordinator, f.session.id).await.is_ok());
    assert!(SessionService::list(&db, &f.outsider, SessionFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_session_kind_filter() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let special = add_special_session(&db, f.group.id, f.lab.id, lab_day(), true).await;

    let filter = SessionFilter {
        kind: Some(SessionKind::Special),
        ..Default::default()
    };
    let sessions = SessionService::list(&db, &f.executive, filter).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, special.id);
    assert_eq!(sessions[0].details.kind(), SessionKind::Special);
}

#[tokio::test]
async fn test_session_variant_fields_are_enforced() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let changes = SessionChanges {
        lab_room: Some(3),
        ..Default::default()
    };
    let err = SessionService::update(&db, &root(), f.session.id, changes)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let changes = SessionChanges {
        check_in_ddl_mins: Some(0),
        ..Default::default()
    };
    let err = SessionService::update(&db, &root(), f.session.id, changes)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Constraint(_)));
}

#[tokio::test]
async fn test_check_in_within_deadline_is_attended() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    TodayService::lab_today(&db, &root(), f.lab.id, moment(lab_day(), 13, 0))
        .await
        .unwrap();

    let now = moment(lab_day(), 14, 10);
    let record = SessionService::check_in(&db, &f.student, f.session.id, now)
        .await
        .unwrap();
    assert_eq!(record.check_in_state, CheckInState::Attended);
    assert_eq!(record.check_in_time, Some(now.utc));
    assert_eq!(record.last_modify_time, now.utc);

    // Checking in again changes nothing
    let again = SessionService::check_in(&db, &f.student, f.session.id, moment(lab_day(), 15, 0))
        .await
        .unwrap();
    assert_eq!(again, record);
}

#[tokio::test]
async fn test_check_in_after_deadline() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let lenient = add_special_session(&db, f.group.id, f.lab.id, lab_day(), true).await;
    let strict = add_special_session(&db, f.group.id, f.lab.id, lab_day(), false).await;
    TodayService::lab_today(&db, &root(), f.lab.id, moment(lab_day(), 8, 0))
        .await
        .unwrap();

    // Special sessions start at 9:00 with a 10 minute deadline
    let now = moment(lab_day(), 9, 30);
    let late = SessionService::check_in(&db, &f.student, lenient.id, now)
        .await
        .unwrap();
    assert_eq!(late.check_in_state, CheckInState::Late);

    let err = SessionService::check_in(&db, &f.student, strict.id, now)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(msg) if msg.contains("deadline")));
}

#[tokio::test]
async fn test_check_in_needs_a_started_session_and_a_record() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    TodayService::lab_today(&db, &root(), f.lab.id, moment(lab_day(), 13, 0))
        .await
        .unwrap();

    let day_before = lab_day().pred_opt().unwrap();
    let err = SessionService::check_in(&db, &f.student, f.session.id, moment(day_before, 14, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let err = SessionService::check_in(&db, &f.outsider, f.session.id, moment(lab_day(), 14, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));

    let err = SessionService::check_in(&db, &f.student, Uuid::new_v4(), moment(lab_day(), 14, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));
}

#[tokio::test]
async fn test_group_times_are_checked() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let mut backwards = new_group(f.course.id, f.lab.id, "G2");
    backwards.start_time = time(16, 0);
    backwards.end_time = time(14, 0);
    let err = GroupService::add(&db, &root(), backwards).await.unwrap_err();
    assert!(matches!(err, ServiceError::Constraint(_)));

    let mut empty = new_group(f.course.id, f.lab.id, "G3");
    empty.end_time = empty.start_time;
    let err = GroupService::add(&db, &root(), empty).await.unwrap_err();
    assert!(matches!(err, ServiceError::Constraint(_)));

    let changes = GroupChanges {
        end_time: Some(time(13, 0)),
        ..Default::default()
    };
    let err = GroupService::update(&db, &f.coordinator, f.group.id, changes)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Constraint(_)));

    // The store enforces the same rule on its own
    let raw = group::ActiveModel {
        id: Set(Uuid::new_v4()),
        course_id: Set(f.course.id),
        group_name: Set("G4".to_string()),
        lab_id: Set(f.lab.id),
        lab_room: Set(1),
        day_of_week: Set(4),
        start_time: Set(time(16, 0)),
        end_time: Set(time(14, 0)),
        active: Set(true),
    };
    let err = raw.insert(&db).await.unwrap_err();
    assert!(matches!(ServiceError::from(err), ServiceError::Constraint(_)));

    let valid = GroupService::add(&db, &root(), new_group(f.course.id, f.lab.id, "G5"))
        .await
        .unwrap();
    assert_eq!(valid.group.group_name, "G5");

    let err = GroupService::add(&db, &root(), new_group(f.course.id, f.lab.id, "G5"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Constraint(_)));
}

#[tokio::test]
async fn test_natural_key_lookups() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let lab = LabService::get(&db, &f.executive, Lookup::Name("L1".to_string()))
        .await
        .unwrap();
    assert_eq!(lab.lab.id, f.lab.id);

    let course = CourseService::get(&db, &f.ta, Lookup::from("CS101")).await.unwrap();
    assert_eq!(course.course.id, f.course.id);

    let group = GroupService::get_by_name(&db, &f.coordinator, "CS101", "G1")
        .await
        .unwrap();
    assert_eq!(group.group.id, f.group.id);
    assert!(matches!(
        GroupService::get_by_name(&db, &f.outsider, "CS101", "G1").await,
        Err(ServiceError::NotFound)
    ));

    let user = UserService::get(&db, &root(), Lookup::from("student")).await.unwrap();
    assert_eq!(user.user.id, f.student.id);

    let session = SessionService::get(&db, &f.ta, f.session.id).await.unwrap();
    assert_eq!(session.details, SessionDetails::Regular { week_id: f.week.id });
}
