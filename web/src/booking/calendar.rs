use std::fmt;

use chrono::{Datelike, NaiveDate};

/// A calendar month. Ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1 = January.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Moves by `delta` months, wrapping December and January into the
    /// neighbouring year.
    pub fn shift(self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.shift(1).first_day();
        next.signed_duration_since(self.first_day()).num_days() as u32
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Empty cells before day 1 in a Monday-first week.
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_monday()
    }

    pub fn name(&self) -> &'static str {
        match self.month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Unknown",
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.name(), self.year)
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

pub const WEEKDAY_HEADERS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn january_minus_one_is_previous_december() {
        let january = MonthCursor::new(2025, 1).unwrap();
        assert_eq!(january.shift(-1), MonthCursor::new(2024, 12).unwrap());
    }

    #[test]
    fn december_plus_one_is_next_january() {
        let december = MonthCursor::new(2025, 12).unwrap();
        assert_eq!(december.shift(1), MonthCursor::new(2026, 1).unwrap());
    }

    #[test]
    fn shift_within_year_and_multiple_months() {
        let june = MonthCursor::new(2025, 6).unwrap();
        assert_eq!(june.shift(1), MonthCursor::new(2025, 7).unwrap());
        assert_eq!(june.shift(-18), MonthCursor::new(2023, 12).unwrap());
        assert_eq!(june.shift(0), june);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(MonthCursor::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthCursor::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthCursor::new(2100, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthCursor::new(2025, 12).unwrap().days_in_month(), 31);
        assert_eq!(MonthCursor::new(2025, 4).unwrap().days_in_month(), 30);
    }

    #[test]
    fn leading_blanks_are_monday_based() {
        // 1 September 2025 is a Monday, 1 June 2025 a Sunday
        assert_eq!(MonthCursor::new(2025, 9).unwrap().leading_blanks(), 0);
        assert_eq!(MonthCursor::new(2025, 6).unwrap().leading_blanks(), 6);
    }

    #[test]
    fn ordering_is_chronological() {
        let dec = MonthCursor::new(2024, 12).unwrap();
        let jan = MonthCursor::new(2025, 1).unwrap();
        assert!(dec < jan);
        assert_eq!(jan.to_string(), "2025-01");
        assert_eq!(jan.label(), "January 2025");
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(MonthCursor::new(2025, 13).is_none());
        assert!(MonthCursor::new(2025, 0).is_none());
    }
}
