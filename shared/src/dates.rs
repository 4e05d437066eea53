use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Full month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("January")
}

/// Parse the date formats the backend emits.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]` and full
/// RFC 3339 timestamps. Date-only values land at midnight; RFC 3339 values keep
/// their wall-clock time and drop the offset.
pub fn parse_flexible_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    parse_date_string(value).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a `YYYY-MM-DD` prefix into a date
pub fn parse_date_string(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days in a month (accounting for leap years)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) { 29 } else { 28 }
        }
        _ => 30,
    }
}

/// Weekday of the first day of a month (0 = Sunday, 1 = Monday, etc.)
pub fn first_weekday_of_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Move a date by whole months, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    add_months(date, years * 12)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let last = days_in_month(date.year(), date.month());
    date.with_day(last).unwrap_or(date)
}

/// Move a (year, 1-based month) pair by `direction` months, wrapping the year
pub fn shift_month(year: i32, month: u32, direction: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + direction;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

/// Type of calendar cell for explicit rendering logic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarDayType {
    /// Empty padding cell before the first of the month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
    /// Empty padding cell completing the last week
    PaddingAfter,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarCell {
    /// Day of month, 0 for padding
    pub day: u32,
    pub day_type: CalendarDayType,
}

/// Sunday-first grid of whole weeks covering a month
pub fn month_grid(year: i32, month: u32) -> Vec<CalendarCell> {
    let leading = first_weekday_of_month(year, month);
    let days = days_in_month(year, month);
    let padding = |day_type| CalendarCell { day: 0, day_type };

    let mut cells: Vec<CalendarCell> = (0..leading).map(|_| padding(CalendarDayType::PaddingBefore)).collect();
    cells.extend((1..=days).map(|day| CalendarCell { day, day_type: CalendarDayType::MonthDay }));
    while cells.len() % 7 != 0 {
        cells.push(padding(CalendarDayType::PaddingAfter));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flexible_datetime_formats() {
        let date_only = parse_flexible_datetime("2024-03-05").unwrap();
        assert_eq!(date_only.to_string(), "2024-03-05 00:00:00");

        let spaced = parse_flexible_datetime("2024-03-05 14:30:00").unwrap();
        assert_eq!(spaced.to_string(), "2024-03-05 14:30:00");

        let rfc = parse_flexible_datetime("2024-03-05T09:15:00-05:00").unwrap();
        assert_eq!(rfc.to_string(), "2024-03-05 09:15:00");

        let short = parse_flexible_datetime("2024-03-05T07:45").unwrap();
        assert_eq!(short.to_string(), "2024-03-05 07:45:00");

        assert!(parse_flexible_datetime("not a date").is_none());
        assert!(parse_flexible_datetime("").is_none());
    }

    #[test]
    fn test_days_in_month_and_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_first_weekday_of_month() {
        // March 1st 2024 was a Friday
        assert_eq!(first_weekday_of_month(2024, 3), 5);
        // September 1st 2024 was a Sunday
        assert_eq!(first_weekday_of_month(2024, 9), 0);
    }

    #[test]
    fn test_add_months_clamps_day() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(add_months(jan31, 1), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(add_months(jan31, -2), NaiveDate::from_ymd_opt(2023, 11, 30).unwrap());
        assert_eq!(add_years(jan31, 5), NaiveDate::from_ymd_opt(2029, 1, 31).unwrap());
    }

    #[test]
    fn test_shift_month_wraps_year() {
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
        assert_eq!(shift_month(2024, 6, 0), (2024, 6));
    }

    #[test]
    fn test_month_grid_padding() {
        // March 2024 starts on a Friday and needs six weeks
        let cells = month_grid(2024, 3);
        assert_eq!(cells.len(), 42);
        assert!(cells[..5].iter().all(|c| c.day_type == CalendarDayType::PaddingBefore));
        assert_eq!(cells[5], CalendarCell { day: 1, day_type: CalendarDayType::MonthDay });
        assert_eq!(cells[35].day, 31);
        assert_eq!(cells[41].day_type, CalendarDayType::PaddingAfter);

        // February 2026 fits exactly in four weeks
        let cells = month_grid(2026, 2);
        assert_eq!(cells.len(), 28);
        assert!(cells.iter().all(|c| c.day_type == CalendarDayType::MonthDay));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "January");
    }
}
