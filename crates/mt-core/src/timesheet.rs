//! Timesheet aggregation.
//!
//! A [`Timesheet`] is built in a single pass over the entries returned by
//! the service and is not modified afterwards. It holds everything the
//! renderers need: per-day and per-category totals, the entries grouped by
//! day, and the derived statistics (off days, averages, percentage shares).

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::TimeEntry;

/// Aggregated view over a list of time entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timesheet {
    /// Minutes per day, ascending. Entries without a date share the `None` bucket.
    pub daily_totals: BTreeMap<Option<NaiveDate>, u32>,
    /// Minutes per project name.
    pub by_project: BTreeMap<String, u32>,
    /// Minutes per service name.
    pub by_service: BTreeMap<String, u32>,
    pub total_minutes: u32,
    /// Entries per day, each list in the order the service returned them.
    pub entries_by_date: BTreeMap<Option<NaiveDate>, Vec<TimeEntry>>,
}

/// One row of a percentage breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub name: String,
    pub minutes: u32,
    pub percent: f64,
}

impl Timesheet {
    /// Aggregates entries in order.
    pub fn from_entries(entries: impl IntoIterator<Item = TimeEntry>) -> Self {
        entries.into_iter().fold(Self::default(), Self::with_entry)
    }

    fn with_entry(mut self, entry: TimeEntry) -> Self {
        let minutes = entry.minutes;

        add_minutes(self.daily_totals.entry(entry.date).or_default(), minutes);
        add_minutes(
            self.by_project
                .entry(entry.project_label().to_string())
                .or_default(),
            minutes,
        );
        add_minutes(
            self.by_service
                .entry(entry.service_label().to_string())
                .or_default(),
            minutes,
        );
        add_minutes(&mut self.total_minutes, minutes);

        self.entries_by_date
            .entry(entry.date)
            .or_default()
            .push(entry);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries_by_date.is_empty()
    }

    /// Number of distinct days with at least one entry.
    pub fn days_worked(&self) -> usize {
        self.daily_totals.len()
    }

    /// Total minutes divided by days worked, truncated.
    pub fn average_minutes_per_day(&self) -> u32 {
        match u32::try_from(self.days_worked()) {
            Ok(0) => 0,
            Ok(days) => self.total_minutes / days,
            Err(_) => 0,
        }
    }

    /// Earliest and latest dated day with entries.
    pub fn dated_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.daily_totals.keys().filter_map(|d| *d);
        let first = dates.next()?;
        let last = dates.next_back().unwrap_or(first);
        Some((first, last))
    }

    /// Weekdays without entries between the first entry and the last entry
    /// (capped at `today`).
    ///
    /// The span is the range of dates actually observed in the entries, not
    /// the range that was requested.
    pub fn off_days(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let Some((start, last)) = self.dated_range() else {
            return Vec::new();
        };
        let end = last.min(today);

        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| is_weekday(*day) && !self.daily_totals.contains_key(&Some(*day)))
            .collect()
    }

    /// Per-project shares, or `None` when all time went to a single project.
    pub fn project_breakdown(&self) -> Option<Vec<Share>> {
        breakdown(&self.by_project, self.total_minutes)
    }

    /// Per-service shares, or `None` when all time went to a single service.
    pub fn service_breakdown(&self) -> Option<Vec<Share>> {
        breakdown(&self.by_service, self.total_minutes)
    }
}

fn add_minutes(slot: &mut u32, minutes: u32) {
    *slot = slot.saturating_add(minutes);
}

/// Monday through Friday.
pub fn is_weekday(day: NaiveDate) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

fn breakdown(totals: &BTreeMap<String, u32>, total_minutes: u32) -> Option<Vec<Share>> {
    if totals.len() < 2 {
        return None;
    }

    let mut shares: Vec<Share> = totals
        .iter()
        .map(|(name, &minutes)| Share {
            name: name.clone(),
            minutes,
            percent: percent(minutes, total_minutes),
        })
        .collect();
    // BTreeMap iteration is already by name; the stable sort keeps that for ties
    shares.sort_by_key(|s| std::cmp::Reverse(s.minutes));
    Some(shares)
}

fn percent(minutes: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(minutes) / f64::from(total) * 100.0
}
