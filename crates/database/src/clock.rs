use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SubsecRound, Utc};

/// The current moment as seen by the attendance rules
///
/// Schedules (group times, special session dates) are wall-clock values in the
/// server's local time zone, while stored timestamps are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub today: NaiveDate,
    pub local: NaiveDateTime,
    pub utc: DateTime<Utc>,
}

impl Moment {
    pub fn now() -> Self {
        let now = Local::now();

        Self {
            today: now.date_naive(),
            local: now.naive_local(),
            utc: now.with_timezone(&Utc).trunc_subsecs(6),
        }
    }

    /// A fixed moment, treating the local wall clock as UTC
    pub fn at(local: NaiveDateTime) -> Self {
        Self {
            today: local.date(),
            local,
            utc: local.and_utc().trunc_subsecs(6),
        }
    }
}
