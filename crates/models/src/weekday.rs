use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// The day of the week a group meets, stored as 1 (Monday) through 7 (Sunday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(transparent)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub const MONDAY: Self = DayOfWeek(1);
    pub const TUESDAY: Self = DayOfWeek(2);
    pub const WEDNESDAY: Self = DayOfWeek(3);
    pub const THURSDAY: Self = DayOfWeek(4);
    pub const FRIDAY: Self = DayOfWeek(5);
    pub const SATURDAY: Self = DayOfWeek(6);
    pub const SUNDAY: Self = DayOfWeek(7);

    /// Day-to-char mapping for parsing and display
    const DAY_CHARS: [(Self, char); 7] = [
        (Self::MONDAY, 'M'),
        (Self::TUESDAY, 'T'),
        (Self::WEDNESDAY, 'W'),
        (Self::THURSDAY, 'R'),
        (Self::FRIDAY, 'F'),
        (Self::SATURDAY, 'S'),
        (Self::SUNDAY, 'U'),
    ];

    pub fn new(day: i32) -> Option<Self> {
        (1..=7).contains(&day).then_some(DayOfWeek(day as u8))
    }

    pub fn number(self) -> i32 {
        self.0 as i32
    }

    /// Days elapsed since the Monday of the same week
    pub fn offset_from_monday(self) -> u64 {
        (self.0 - 1) as u64
    }

    pub fn weekday(self) -> Weekday {
        Weekday::try_from(self.0 - 1).unwrap_or(Weekday::Mon)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        DayOfWeek(weekday.number_from_monday() as u8)
    }
}

impl TryFrom<i32> for DayOfWeek {
    type Error = String;

    fn try_from(day: i32) -> Result<Self, Self::Error> {
        Self::new(day).ok_or_else(|| "day of week must be 1~7".to_string())
    }
}

impl From<DayOfWeek> for i32 {
    fn from(day: DayOfWeek) -> Self {
        day.number()
    }
}

impl FromStr for DayOfWeek {
    type Err = ();

    fn from_str(day: &str) -> Result<Self, Self::Err> {
        let day = day.trim();

        if let Ok(number) = day.parse::<i32>() {
            return Self::new(number).ok_or(());
        }

        let mut chars = day.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::DAY_CHARS
                .iter()
                .find(|&&(_, day_char)| day_char == c.to_ascii_uppercase())
                .map(|&(day, _)| day)
                .ok_or(()),
            _ => Err(()),
        }
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let day_char = Self::DAY_CHARS[(self.0 - 1) as usize].1;
        write!(f, "{day_char}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_day_of_week_bounds() {
        assert!(DayOfWeek::new(0).is_none());
        assert_eq!(DayOfWeek::new(1), Some(DayOfWeek::MONDAY));
        assert_eq!(DayOfWeek::new(7), Some(DayOfWeek::SUNDAY));
        assert!(DayOfWeek::new(8).is_none());
    }

    #[test]
    fn test_day_of_week_from_str() {
        assert_eq!(DayOfWeek::from_str("3"), Ok(DayOfWeek::WEDNESDAY));
        assert_eq!(DayOfWeek::from_str("R"), Ok(DayOfWeek::THURSDAY));
        assert_eq!(DayOfWeek::from_str("u"), Ok(DayOfWeek::SUNDAY));
        assert!(DayOfWeek::from_str("9").is_err());
        assert!(DayOfWeek::from_str("MW").is_err());
    }

    #[test]
    fn test_day_of_week_chrono_mapping() {
        assert_eq!(DayOfWeek::from(Weekday::Mon), DayOfWeek::MONDAY);
        assert_eq!(DayOfWeek::from(Weekday::Sun), DayOfWeek::SUNDAY);
        assert_eq!(DayOfWeek::FRIDAY.weekday(), Weekday::Fri);
        assert_eq!(DayOfWeek::FRIDAY.offset_from_monday(), 4);
        assert_eq!(DayOfWeek::THURSDAY.to_string(), "R");
    }
}
