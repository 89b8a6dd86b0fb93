mod common;

use common::*;
use database::{
    entities::{check_in_record, session::SessionDetails},
    error::ServiceError,
    services::{
        group::GroupService,
        make_up::{MakeUpService, NewMakeUp},
        record::{NewRecord, RecordService},
        today::TodayService,
    },
};
use models::attendance::{CheckInState, UserType};
use sea_orm::{EntityTrait, PaginatorTrait};
use std::collections::HashSet;
use uuid::Uuid;

#[tokio::test]
async fn test_today_seeds_absent_records() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let now = moment(lab_day(), 13, 30);

    let today = TodayService::lab_today(&db, &f.coordinator, f.lab.id, now)
        .await
        .unwrap();

    assert_eq!(today.week.as_ref().map(|w| w.id), Some(f.week.id));
    assert_eq!(today.sessions.len(), 1);
    assert_eq!(today.sessions[0].id, f.session.id);
    assert_eq!(today.groups.len(), 1);
    assert_eq!(today.courses.len(), 1);
    assert_eq!(today.records.len(), 2);
    assert_eq!(today.users.len(), 2);

    // Lab executives see the lab's groups but not the courses behind them
    let today = TodayService::lab_today(&db, &f.executive, f.lab.id, now)
        .await
        .unwrap();
    assert_eq!(today.groups.len(), 1);
    assert!(today.courses.is_empty());

    for record in &today.records {
        assert_eq!(record.check_in_state, CheckInState::Absent);
        assert_eq!(record.check_in_time, None);
        assert_eq!(record.last_modify_time, now.utc);
        assert_eq!(record.remark, "");
        let expected = if record.user_id == f.student.id {
            UserType::Student
        } else {
            assert_eq!(record.user_id, f.ta.id);
            UserType::TeachingAssistant
        };
        assert_eq!(record.user_type, expected);
    }
}

#[tokio::test]
async fn test_today_is_idempotent() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let first = TodayService::lab_today(&db, &f.coordinator, f.lab.id, moment(lab_day(), 13, 0))
        .await
        .unwrap();
    let count = check_in_record::Entity::find().count(&db).await.unwrap();

    let second = TodayService::lab_today(&db, &f.coordinator, f.lab.id, moment(lab_day(), 15, 0))
        .await
        .unwrap();

    assert_eq!(check_in_record::Entity::find().count(&db).await.unwrap(), count);
    assert_eq!(count, 2);
    assert_eq!(first.records, second.records);
}

#[tokio::test]
async fn test_today_without_a_week_only_has_special_sessions() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let day = date(2026, 11, 5);

    let special = add_special_session(&db, f.group.id, f.lab.id, day, true).await;
    let today = TodayService::lab_today(&db, &root(), f.lab.id, moment(day, 8, 0))
        .await
        .unwrap();

    assert!(today.week.is_none());
    let ids: Vec<Uuid> = today.sessions.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![special.id]);
    assert!(matches!(today.sessions[0].details, SessionDetails::Special { .. }));
    assert!(today.records.iter().all(|r| r.session_id == special.id));
    assert_eq!(today.records.len(), 2);
}

#[tokio::test]
async fn test_inactive_members_and_sessions_are_skipped() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    database::services::user::UserService::update(
        &db,
        &root(),
        f.ta.id.into(),
        database::services::user::UserChanges {
            active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let today = TodayService::lab_today(&db, &root(), f.lab.id, moment(lab_day(), 13, 0))
        .await
        .unwrap();
    assert_eq!(today.records.len(), 1);
    assert_eq!(today.records[0].user_id, f.student.id);

    let inactive = add_special_session(&db, f.group.id, f.lab.id, lab_day(), true).await;
    database::services::session::SessionService::update(
        &db,
        &root(),
        inactive.id,
        database::services::session::SessionChanges {
            active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let today = TodayService::lab_today(&db, &root(), f.lab.id, moment(lab_day(), 13, 0))
        .await
        .unwrap();
    assert!(today.sessions.iter().all(|s| s.id != inactive.id));
}

#[tokio::test]
async fn test_existing_records_are_kept() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let existing = RecordService::add(
        &db,
        &f.coordinator,
        NewRecord {
            session_id: f.session.id,
            user_id: f.student.id,
            user_type: UserType::Student,
            check_in_state: CheckInState::Attended,
            check_in_time: None,
            remark: "early bird".to_string(),
        },
        moment(lab_day(), 13, 0),
    )
    .await
    .unwrap();

    // A second record for the same participant is refused
    let err = RecordService::add(
        &db,
        &f.coordinator,
        NewRecord {
            session_id: f.session.id,
            user_id: f.student.id,
            user_type: UserType::Student,
            check_in_state: CheckInState::Absent,
            check_in_time: None,
            remark: String::new(),
        },
        moment(lab_day(), 13, 0),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Constraint(_)));
    assert_eq!(existing.check_in_time, Some(moment(lab_day(), 13, 0).utc));

    let today = TodayService::lab_today(&db, &f.coordinator, f.lab.id, moment(lab_day(), 13, 30))
        .await
        .unwrap();
    assert_eq!(today.records.len(), 2);
    let kept = today
        .records
        .iter()
        .find(|r| r.user_id == f.student.id)
        .unwrap();
    assert_eq!(kept, &existing);
}

#[tokio::test]
async fn test_make_up_students_are_expected() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let visitor = add_user(&db, "visitor").await;

    let mut other = new_group(f.course.id, f.lab.id, "G2");
    other.students = vec![visitor.id];
    let other = GroupService::add(&db, &root(), other).await.unwrap();
    let missed = add_regular_session(&db, other.group.id, f.week.id).await;
    let special = add_special_session(&db, f.group.id, f.lab.id, lab_day(), true).await;

    MakeUpService::add(
        &db,
        &f.coordinator,
        NewMakeUp {
            student_id: visitor.id,
            original_session_id: missed.id,
            make_up_session_id: special.id,
        },
    )
    .await
    .unwrap();

    TodayService::lab_today(&db, &root(), f.lab.id, moment(lab_day(), 8, 0))
        .await
        .unwrap();

    let visits = RecordService::list(
        &db,
        &root(),
        database::services::record::RecordFilter {
            user_id: Some(visitor.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let mut sessions: Vec<Uuid> = visits.iter().map(|r| r.session_id).collect();
    sessions.sort();
    let mut expected = vec![missed.id, special.id];
    expected.sort();
    assert_eq!(sessions, expected);
}

#[tokio::test]
async fn test_students_only_see_their_own_record() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let today = TodayService::lab_today(&db, &f.student, f.lab.id, moment(lab_day(), 13, 0))
        .await
        .unwrap();

    assert_eq!(today.records.len(), 1);
    assert_eq!(today.records[0].user_id, f.student.id);
    assert!(today.sessions.is_empty());
    assert_eq!(today.users.len(), 1);
    assert_eq!(today.users[0].username, "student");

    // Yet everyone expected was materialized
    assert_eq!(check_in_record::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_unknown_lab_is_not_found() {
    let db = setup_test_db().await;

    let err = TodayService::lab_today(&db, &root(), Uuid::new_v4(), moment(lab_day(), 9, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));
}

#[tokio::test]
async fn test_outsider_cannot_see_or_seed_a_lab() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let err = TodayService::lab_today(&db, &f.outsider, f.lab.id, moment(lab_day(), 13, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));

    // Nothing is written on behalf of someone who cannot see the lab
    assert_eq!(check_in_record::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_staff_of_the_lab_pass_the_gate() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let now = moment(lab_day(), 13, 0);

    for actor in [&f.executive, &f.coordinator, &f.ta, &f.student] {
        assert!(TodayService::lab_today(&db, actor, f.lab.id, now).await.is_ok());
    }
}

#[tokio::test]
async fn test_concurrent_calls_seed_each_record_once() {
    let (db, path) = setup_pooled_test_db().await;
    let f = fixture(&db).await;
    let now = moment(lab_day(), 13, 0);

    let (root_a, root_b) = (root(), root());
    let (first, second) = tokio::join!(
        TodayService::lab_today(&db, &root_a, f.lab.id, now),
        TodayService::lab_today(&db, &root_b, f.lab.id, now),
    );
    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first.records.len(), second.records.len());

    let records = check_in_record::Entity::find().all(&db).await.unwrap();
    assert_eq!(records.len(), 2);
    let pairs: HashSet<_> = records.iter().map(|r| (r.session_id, r.user_id)).collect();
    assert_eq!(pairs.len(), records.len());

    db.close().await.unwrap();
    let _ = std::fs::remove_file(path);
}
