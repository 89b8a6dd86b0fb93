use crate::weekday::DayOfWeek;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// The number of days in a week.
const WEEK_DAYS: Days = Days::new(7);

/// The Monday that starts the week containing `date`
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Days::new(date.weekday().num_days_from_monday().into())
}

pub fn is_monday(date: NaiveDate) -> bool {
    monday_of(date) == date
}

/// Bounds of the Monday dates whose week covers `today`, as `(exclusive, inclusive)`
pub fn week_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - WEEK_DAYS, today)
}

/// Start of a regular session, given the Monday of its week and its group's schedule
pub fn regular_session_start(
    monday_date: NaiveDate,
    day_of_week: DayOfWeek,
    start_time: NaiveTime,
) -> NaiveDateTime {
    (monday_date + Days::new(day_of_week.offset_from_monday())).and_time(start_time)
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_of() {
        // 2026-10-16 is a Friday
        assert_eq!(monday_of(date(2026, 10, 16)), date(2026, 10, 12));
        assert_eq!(monday_of(date(2026, 10, 12)), date(2026, 10, 12));
        assert_eq!(monday_of(date(2026, 10, 18)), date(2026, 10, 12));
        assert!(is_monday(date(2026, 10, 19)));
        assert!(!is_monday(date(2026, 10, 20)));
    }

    #[test]
    fn test_week_window_excludes_last_week_monday() {
        let (after, until) = week_window(date(2026, 10, 19));
        assert_eq!(after, date(2026, 10, 12));
        assert_eq!(until, date(2026, 10, 19));
    }

    #[test]
    fn test_regular_session_start() {
        let start = regular_session_start(
            date(2026, 10, 12),
            DayOfWeek::THURSDAY,
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        );
        assert_eq!(start, date(2026, 10, 15).and_hms_opt(14, 0, 0).unwrap());
    }
}
