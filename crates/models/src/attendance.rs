use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The capacity in which a user is expected at a session
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum UserType {
    #[serde(rename = "student")]
    #[strum(serialize = "student")]
    Student,
    #[serde(rename = "TA")]
    #[strum(serialize = "TA")]
    TeachingAssistant,
}

impl UserType {
    pub fn code(self) -> i32 {
        match self {
            Self::Student => 0,
            Self::TeachingAssistant => 1,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Student),
            1 => Some(Self::TeachingAssistant),
            _ => None,
        }
    }
}

/// Attendance outcome of a check-in record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CheckInState {
    Absent,
    Late,
    Attended,
}

impl CheckInState {
    pub fn code(self) -> i32 {
        match self {
            Self::Absent => 0,
            Self::Late => 1,
            Self::Attended => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Absent),
            1 => Some(Self::Late),
            2 => Some(Self::Attended),
            _ => None,
        }
    }

    pub fn is_checked_in(self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Decides the state of a self check-in at `now` for a session starting at `start`
    pub fn for_arrival(
        start: NaiveDateTime,
        check_in_ddl_mins: i32,
        allow_late_check_in: bool,
        now: NaiveDateTime,
    ) -> Result<Self, CheckInRefusal> {
        if now.date() < start.date() {
            return Err(CheckInRefusal::NotStarted);
        }

        let deadline = start + TimeDelta::minutes(check_in_ddl_mins.into());
        if now <= deadline {
            Ok(Self::Attended)
        } else if allow_late_check_in {
            Ok(Self::Late)
        } else {
            Err(CheckInRefusal::DeadlinePassed)
        }
    }
}

/// Why a self check-in was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CheckInRefusal {
    #[strum(serialize = "session has not started yet")]
    NotStarted,
    #[strum(serialize = "check-in deadline has passed")]
    DeadlinePassed,
}

/// Discriminant of the session variants sharing one identity space
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionKind {
    /// Weekly session of a group, tied to a week
    Regular,
    /// One-off session with its own lab, room, date and time
    Special,
}

impl SessionKind {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 12)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn test_codes_match_storage_values() {
        assert_eq!(UserType::Student.code(), 0);
        assert_eq!(UserType::from_code(1), Some(UserType::TeachingAssistant));
        assert_eq!(UserType::from_code(2), None);
        assert_eq!(CheckInState::Attended.code(), 2);
        assert_eq!(CheckInState::from_code(1), Some(CheckInState::Late));
        assert_eq!(CheckInState::from_code(-1), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(UserType::TeachingAssistant.to_string(), "TA");
        assert_eq!(CheckInState::from_str("late"), Ok(CheckInState::Late));
        assert_eq!(SessionKind::Special.as_str(), "special");
        assert_eq!(
            serde_json::to_string(&CheckInState::Absent).unwrap(),
            "\"absent\""
        );
    }

    #[test]
    fn test_arrival_within_deadline_is_attended() {
        let state = CheckInState::for_arrival(at(14, 0), 15, true, at(14, 15));
        assert_eq!(state, Ok(CheckInState::Attended));

        // Arriving early on the same day still counts
        let state = CheckInState::for_arrival(at(14, 0), 15, false, at(13, 30));
        assert_eq!(state, Ok(CheckInState::Attended));
    }

    #[test]
    fn test_arrival_after_deadline() {
        let state = CheckInState::for_arrival(at(14, 0), 15, true, at(14, 16));
        assert_eq!(state, Ok(CheckInState::Late));

        let state = CheckInState::for_arrival(at(14, 0), 15, false, at(14, 16));
        assert_eq!(state, Err(CheckInRefusal::DeadlinePassed));
    }

    #[test]
    fn test_arrival_before_session_day() {
        let previous_day = at(14, 0) - TimeDelta::days(1);
        let state = CheckInState::for_arrival(at(14, 0), 15, true, previous_day);
        assert_eq!(state, Err(CheckInRefusal::NotStarted));
    }
}
