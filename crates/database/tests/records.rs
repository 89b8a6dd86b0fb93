mod common;

use chrono::TimeDelta;
use common::*;
use database::{
    entities::check_in_record,
    error::ServiceError,
    services::{
        record::{RecordChanges, RecordFilter, RecordService},
        today::TodayService,
    },
};
use models::attendance::CheckInState;
use sea_orm::{ActiveValue::Set, EntityTrait};
use uuid::Uuid;

/// Materializes the fixture's records and returns the student's
async fn student_record(
    db: &sea_orm::DatabaseConnection,
    f: &Fixture,
) -> check_in_record::Model {
    TodayService::lab_today(db, &root(), f.lab.id, moment(lab_day(), 13, 0))
        .await
        .unwrap();

    let filter = RecordFilter {
        user_id: Some(f.student.id),
        ..Default::default()
    };
    RecordService::list(db, &root(), filter)
        .await
        .unwrap()
        .pop()
        .unwrap()
}

fn mark_attended(last_modify_time: chrono::DateTime<chrono::Utc>) -> RecordChanges {
    RecordChanges {
        last_modify_time,
        user_type: None,
        check_in_state: Some(CheckInState::Attended),
        check_in_time: None,
        remark: Some("seen at the door".to_string()),
    }
}

#[tokio::test]
async fn test_stale_update_is_rejected() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let record = student_record(&db, &f).await;

    let stale = record.last_modify_time - TimeDelta::seconds(1);
    let err = RecordService::update(
        &db,
        &f.coordinator,
        record.id,
        mark_attended(stale),
        moment(lab_day(), 14, 5),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));

    let unchanged = check_in_record::Entity::find_by_id(record.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, record);
}

#[tokio::test]
async fn test_current_update_advances_last_modify_time() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let record = student_record(&db, &f).await;
    let later = moment(lab_day(), 14, 5);

    let updated = RecordService::update(
        &db,
        &f.coordinator,
        record.id,
        mark_attended(record.last_modify_time),
        later,
    )
    .await
    .unwrap();
    assert_eq!(updated.check_in_state, CheckInState::Attended);
    assert_eq!(updated.remark, "seen at the door");
    assert_eq!(updated.check_in_time, Some(later.utc));
    assert_eq!(updated.last_modify_time, later.utc);
    assert!(updated.last_modify_time > record.last_modify_time);

    // The version just replaced is now stale
    let err = RecordService::update(
        &db,
        &f.executive,
        record.id,
        mark_attended(record.last_modify_time),
        moment(lab_day(), 14, 10),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));

    // A caller whose view is newer than the stored one still wins
    let newer = updated.last_modify_time + TimeDelta::minutes(1);
    let mut absent = mark_attended(newer);
    absent.check_in_state = Some(CheckInState::Absent);
    let reverted = RecordService::update(
        &db,
        &f.executive,
        record.id,
        absent,
        moment(lab_day(), 14, 20),
    )
    .await
    .unwrap();
    assert_eq!(reverted.check_in_state, CheckInState::Absent);
    assert_eq!(reverted.check_in_time, None);
}

#[tokio::test]
async fn test_checked_in_records_keep_an_arrival_time() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let record = student_record(&db, &f).await;

    let arrived = moment(lab_day(), 14, 3).utc;
    let mut changes = mark_attended(record.last_modify_time);
    changes.check_in_time = Some(arrived);
    let attended = RecordService::update(
        &db,
        &f.coordinator,
        record.id,
        changes,
        moment(lab_day(), 14, 30),
    )
    .await
    .unwrap();
    assert_eq!(attended.check_in_time, Some(arrived));

    // Moving between checked-in states keeps the first arrival
    let mut late = mark_attended(attended.last_modify_time);
    late.check_in_state = Some(CheckInState::Late);
    let late = RecordService::update(
        &db,
        &f.coordinator,
        record.id,
        late,
        moment(lab_day(), 14, 40),
    )
    .await
    .unwrap();
    assert_eq!(late.check_in_state, CheckInState::Late);
    assert_eq!(late.check_in_time, Some(arrived));
}

#[tokio::test]
async fn test_teaching_assistants_read_but_do_not_write_records() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let record = student_record(&db, &f).await;

    let seen = RecordService::get(&db, &f.ta, record.id).await.unwrap();
    assert_eq!(seen, record);
    assert_eq!(
        RecordService::get(&db, &f.student, record.id).await.unwrap(),
        record
    );
    assert!(matches!(
        RecordService::get(&db, &f.outsider, record.id).await,
        Err(ServiceError::NotFound)
    ));

    for actor in [f.ta, f.student] {
        let err = RecordService::update(
            &db,
            &actor,
            record.id,
            mark_attended(record.last_modify_time),
            moment(lab_day(), 14, 5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));
    }
}

#[tokio::test]
async fn test_store_rejects_duplicate_records() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let record = student_record(&db, &f).await;

    let duplicate = check_in_record::ActiveModel {
        id: Set(Uuid::new_v4()),
        session_id: Set(record.session_id),
        user_id: Set(record.user_id),
        user_type: Set(record.user_type),
        check_in_state: Set(CheckInState::Absent),
        check_in_time: Set(None),
        last_modify_time: Set(record.last_modify_time),
        remark: Set(String::new()),
    };
    let err = check_in_record::Entity::insert(duplicate)
        .exec(&db)
        .await
        .unwrap_err();

    assert!(database::error::is_unique_violation(&err));
    assert!(matches!(ServiceError::from(err), ServiceError::Constraint(_)));
}
