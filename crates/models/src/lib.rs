pub mod attendance;
pub mod calendar;
pub mod scope;
pub mod weekday;

#[cfg(feature = "database")]
mod value;
