pub mod course;
pub mod envelope;
pub mod group;
pub mod lab;
pub mod make_up;
pub mod record;
pub mod session;
pub mod today;
pub mod user;
pub mod week;
