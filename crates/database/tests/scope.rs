mod common;

use common::*;
use database::{
    error::ServiceError,
    services::{
        Lookup,
        course::{CourseFilter, CourseService},
        group::{GroupChanges, GroupFilter, GroupService},
        lab::{LabFilter, LabService},
        user::{UserChanges, UserFilter, UserService},
    },
};
use models::scope::Actor;

#[tokio::test]
async fn test_group_list_only_returns_related_groups() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    // A second group in another course and lab, unrelated to anyone in the fixture
    let other_lab = add_lab(&db, "L2", Vec::new()).await;
    let other_course = add_course(&db, "CS202", Vec::new()).await;
    GroupService::add(&db, &root(), new_group(other_course.id, other_lab.id, "G9"))
        .await
        .unwrap();

    for actor in [f.coordinator, f.executive, f.ta] {
        let groups = GroupService::list(&db, &actor, GroupFilter::default())
            .await
            .unwrap();
        let ids: Vec<_> = groups.iter().map(|g| g.group.id).collect();
        assert_eq!(ids, vec![f.group.id]);
    }

    for actor in [f.student, f.outsider] {
        let groups = GroupService::list(&db, &actor, GroupFilter::default())
            .await
            .unwrap();
        assert!(groups.is_empty());
    }

    let all = GroupService::list(&db, &root(), GroupFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_filters_combine_with_scope() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let filter = GroupFilter {
        group_name: Some("g1".to_string()),
        ..Default::default()
    };
    let groups = GroupService::list(&db, &f.coordinator, filter).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].students, vec![f.student.id]);
    assert_eq!(groups[0].teaching_assistants, vec![f.ta.id]);

    let filter = GroupFilter {
        group_name: Some("nope".to_string()),
        ..Default::default()
    };
    assert!(GroupService::list(&db, &f.coordinator, filter).await.unwrap().is_empty());

    let filter = CourseFilter {
        title: Some("cs101 lab".to_string()),
        ..Default::default()
    };
    let courses = CourseService::list(&db, &f.ta, filter).await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].coordinators, vec![f.coordinator.id]);
}

#[tokio::test]
async fn test_name_filters_match_wildcards_literally() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let other_lab = add_lab(&db, "L2", Vec::new()).await;
    let other_course = add_course(&db, "CS202", Vec::new()).await;
    let marked = GroupService::add(&db, &root(), new_group(other_course.id, other_lab.id, "A_B%"))
        .await
        .unwrap();

    let names = |needle: &str| GroupFilter {
        group_name: Some(needle.to_string()),
        ..Default::default()
    };

    assert!(GroupService::list(&db, &root(), names("G_")).await.unwrap().is_empty());

    for needle in ["%", "_", "b%", "a_b"] {
        let groups = GroupService::list(&db, &root(), names(needle)).await.unwrap();
        let ids: Vec<_> = groups.iter().map(|g| g.group.id).collect();
        assert_eq!(ids, vec![marked.group.id], "filter {needle:?}");
    }

    let groups = GroupService::list(&db, &root(), names("g1")).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].group.id, f.group.id);
}

#[tokio::test]
async fn test_uuid_shaped_natural_key_still_resolves() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let name = uuid::Uuid::new_v4().to_string();
    let named = add_user(&db, &name).await;

    let found = UserService::get(&db, &root(), Lookup::from(name.as_str()))
        .await
        .unwrap();
    assert_eq!(found.user.id, named.id);
    assert_eq!(found.user.username, name);

    // An id given as text still resolves too
    let by_id = UserService::get(&db, &root(), Lookup::from(f.student.id.to_string().as_str()))
        .await
        .unwrap();
    assert_eq!(by_id.user.username, "student");
}

#[tokio::test]
async fn test_out_of_scope_get_is_not_found() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let err = GroupService::get(&db, &f.outsider, f.group.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));

    let err = LabService::get(&db, &f.ta, f.lab.id.into()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));

    let lab = LabService::get(&db, &f.executive, f.lab.id.into()).await.unwrap();
    assert_eq!(lab.executives, vec![f.executive.id]);
}

#[tokio::test]
async fn test_staff_read_is_broad_but_write_is_not() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;
    let staff = Actor {
        is_staff: true,
        ..add_user(&db, "staff").await
    };

    let groups = GroupService::list(&db, &staff, GroupFilter::default()).await.unwrap();
    assert_eq!(groups.len(), 1);
    let users = UserService::list(&db, &staff, UserFilter::default()).await.unwrap();
    assert_eq!(users.len(), 6);
    assert!(LabService::list(&db, &staff, LabFilter::default()).await.unwrap().is_empty());

    let changes = GroupChanges {
        lab_room: Some(3),
        ..Default::default()
    };
    let err = GroupService::update(&db, &staff, f.group.id, changes.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));

    let updated = GroupService::update(&db, &root(), f.group.id, changes).await.unwrap();
    assert_eq!(updated.group.lab_room, 3);
}

#[tokio::test]
async fn test_users_see_and_edit_only_themselves() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let users = UserService::list(&db, &f.student, UserFilter::default()).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user.id, f.student.id);

    let changes = UserChanges {
        first_name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let err = UserService::update(&db, &f.student, Lookup::Name("ta".to_string()), changes.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound));

    let me = UserService::update(&db, &f.student, Lookup::Name("student".to_string()), changes)
        .await
        .unwrap();
    assert_eq!(me.user.first_name, "Renamed");

    // Privilege flags are reserved for superusers
    let promote = UserChanges {
        is_staff: Some(true),
        ..Default::default()
    };
    let err = UserService::update(&db, &f.student, f.student.id.into(), promote)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test]
async fn test_user_info_lists_relationships() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let info = UserService::user_info(&db, &f.ta).await.unwrap();
    assert_eq!(info.user.user.username, "ta");
    assert_eq!(info.teaching_assistant_of, vec![f.group.id]);
    assert!(info.student_of.is_empty());
    assert!(info.course_coordinator_of.is_empty());

    let info = UserService::user_info(&db, &f.coordinator).await.unwrap();
    assert_eq!(info.course_coordinator_of, vec![f.course.id]);

    let active = UserService::resolve_actor(&db, "executive").await.unwrap();
    assert_eq!(active.map(|u| u.id), Some(f.executive.id));
    assert!(UserService::resolve_actor(&db, "nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_root_entities_need_privilege() {
    let db = setup_test_db().await;
    let f = fixture(&db).await;

    let err = CourseService::add(
        &db,
        &f.coordinator,
        database::services::course::NewCourse {
            course_code: "CS999".to_string(),
            title: "Nope".to_string(),
            coordinators: Vec::new(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    // The coordinator may add groups to their own course, but not to others
    let group = GroupService::add(&db, &f.coordinator, new_group(f.course.id, f.lab.id, "G2"))
        .await
        .unwrap();
    assert_eq!(group.group.course_id, f.course.id);

    let other_lab = add_lab(&db, "L2", Vec::new()).await;
    let other_course = add_course(&db, "CS202", Vec::new()).await;
    let err = GroupService::add(
        &db,
        &f.coordinator,
        new_group(other_course.id, other_lab.id, "G3"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}
