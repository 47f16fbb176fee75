//! Wall-clock calendar record shared by several messages.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

/// Broken-down wall-clock time as the boards store it.
///
/// Encodes to 8 bytes: six single-byte fields followed by a big-endian year.
/// `day_of_week` counts days since Sunday (Sunday = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Calendar {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day_of_week: u8,
    pub day_of_month: u8,
    pub month: u8,
    pub year: u16,
}

impl Calendar {
    /// Encoded size in bytes.
    pub const WIRE_SIZE: usize = 8;

    /// Builds a calendar from any timezone-aware datetime.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            seconds: dt.second() as u8,
            minutes: dt.minute() as u8,
            hours: dt.hour() as u8,
            day_of_week: dt.weekday().num_days_from_sunday() as u8,
            day_of_month: dt.day() as u8,
            month: dt.month() as u8,
            year: dt.year() as u16,
        }
    }

    /// Builds a calendar from the current local time.
    ///
    /// Used when pushing the host clock to a board after connecting.
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_from_datetime_extracts_all_fields() {
        // 2024-07-09 was a Tuesday
        let dt = Utc.with_ymd_and_hms(2024, 7, 9, 12, 45, 30).unwrap();

        let cal = Calendar::from_datetime(&dt);

        assert_eq!(cal.seconds, 30);
        assert_eq!(cal.minutes, 45);
        assert_eq!(cal.hours, 12);
        assert_eq!(cal.day_of_week, 2);
        assert_eq!(cal.day_of_month, 9);
        assert_eq!(cal.month, 7);
        assert_eq!(cal.year, 2024);
    }

    #[test]
    fn test_day_of_week_is_zero_on_sunday() {
        let dt = Utc.with_ymd_and_hms(2024, 7, 7, 0, 0, 0).unwrap();

        let cal = Calendar::from_datetime(&dt);

        assert_eq!(cal.day_of_week, 0);
    }

    #[test]
    fn test_default_is_all_zero() {
        let cal = Calendar::default();
        assert_eq!(cal.year, 0);
        assert_eq!(cal.month, 0);
        assert_eq!(cal.day_of_month, 0);
    }
}
