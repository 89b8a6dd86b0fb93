pub mod check_in_record;
pub mod course;
pub mod course_coordinator;
pub mod group;
pub mod group_student;
pub mod group_teaching_assistant;
pub mod lab;
pub mod lab_executive;
pub mod make_up_session;
pub mod profile;
pub mod session;
pub mod user;
pub mod week;
