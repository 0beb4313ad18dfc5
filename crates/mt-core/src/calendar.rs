//! Month grid and per-day occupancy tiers for the calendar view.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::timesheet::is_weekday;

/// Minutes for a full day.
pub const FULL_DAY_MINUTES: u32 = 8 * 60;
/// Minutes for a mostly-full day.
pub const PARTIAL_DAY_MINUTES: u32 = 6 * 60;

/// How full a calendar day is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayTier {
    /// 8h or more.
    Done,
    /// 6h up to 8h.
    Partial,
    /// Some time, under 6h.
    Light,
    /// A past or current weekday with nothing logged.
    Off,
    /// Weekend or future day with nothing logged.
    Neutral,
}

impl DayTier {
    pub fn classify(day: NaiveDate, minutes: u32, today: NaiveDate) -> Self {
        match minutes {
            m if m >= FULL_DAY_MINUTES => Self::Done,
            m if m >= PARTIAL_DAY_MINUTES => Self::Partial,
            m if m > 0 => Self::Light,
            _ if is_weekday(day) && day <= today => Self::Off,
            _ => Self::Neutral,
        }
    }
}

/// A week row, Monday first. Days outside the month are `None`.
pub type Week = [Option<NaiveDate>; 7];

/// Weeks of the month containing `day`, Monday to Sunday.
pub fn month_grid(day: NaiveDate) -> Vec<Week> {
    let Some(first) = day.with_day(1) else {
        return Vec::new();
    };

    let mut weeks = Vec::new();
    let mut week: Week = [None; 7];
    for date in first.iter_days().take_while(|d| d.month() == first.month()) {
        let column = date.weekday().num_days_from_monday() as usize;
        week[column] = Some(date);
        if column == 6 {
            weeks.push(week);
            week = [None; 7];
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tiers_follow_fixed_thresholds() {
        let wednesday = date(2025, 1, 8);
        let today = date(2025, 1, 31);
        assert_eq!(DayTier::classify(wednesday, 480, today), DayTier::Done);
        assert_eq!(DayTier::classify(wednesday, 600, today), DayTier::Done);
        assert_eq!(DayTier::classify(wednesday, 479, today), DayTier::Partial);
        assert_eq!(DayTier::classify(wednesday, 360, today), DayTier::Partial);
        assert_eq!(DayTier::classify(wednesday, 359, today), DayTier::Light);
        assert_eq!(DayTier::classify(wednesday, 1, today), DayTier::Light);
        assert_eq!(DayTier::classify(wednesday, 0, today), DayTier::Off);
    }

    #[test]
    fn weekends_and_future_days_are_neutral() {
        let today = date(2025, 1, 15);
        // Saturday
        assert_eq!(DayTier::classify(date(2025, 1, 11), 0, today), DayTier::Neutral);
        // Future weekday
        assert_eq!(DayTier::classify(date(2025, 1, 16), 0, today), DayTier::Neutral);
        // Today counts as off when empty
        assert_eq!(DayTier::classify(today, 0, today), DayTier::Off);
        // Weekend work still counts
        assert_eq!(DayTier::classify(date(2025, 1, 12), 500, today), DayTier::Done);
    }

    #[test]
    fn january_2025_grid() {
        // 1 January 2025 is a Wednesday; 31 January a Friday
        let weeks = month_grid(date(2025, 1, 17));
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0][0], None);
        assert_eq!(weeks[0][2], Some(date(2025, 1, 1)));
        assert_eq!(weeks[0][6], Some(date(2025, 1, 5)));
        assert_eq!(weeks[4][4], Some(date(2025, 1, 31)));
        assert_eq!(weeks[4][5], None);
    }

    #[test]
    fn month_starting_monday_ending_sunday() {
        // September 2025: Mon 1 .. Tue 30
        let weeks = month_grid(date(2025, 9, 1));
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0][0], Some(date(2025, 9, 1)));

        // February 2021: Mon 1 .. Sun 28, exactly four rows
        let weeks = month_grid(date(2021, 2, 10));
        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[3][6], Some(date(2021, 2, 28)));
    }
}
