//! Report periods and view selection.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::ValidationError;

/// Explicit ranges covering more than this many calendar days are shown as a
/// calendar. Both ends count, so `2025-01-01..2025-01-05` covers 5 days.
pub const CALENDAR_SPAN_DAYS: i64 = 20;

/// Named relative range, resolved by the server (`at=` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AtFilter {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
}

impl AtFilter {
    /// Value of the `at` query parameter.
    #[must_use]
    pub const fn as_param(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::ThisWeek => "this_week",
            Self::LastWeek => "last_week",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
        }
    }

    /// Human-readable name for report headers.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This week",
            Self::LastWeek => "Last week",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
        }
    }
}

/// The time span a timesheet query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Period {
    At { at: AtFilter },
    Range {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl Period {
    /// Builds an explicit range, rejecting `from > to`.
    pub fn range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, ValidationError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ValidationError::InvalidRange { from, to });
            }
        }
        Ok(Self::Range { from, to })
    }

    /// Calendar days covered by the range, both ends included, when both are given.
    pub fn span_days(&self) -> Option<i64> {
        match *self {
            Self::Range {
                from: Some(from),
                to: Some(to),
            } => Some((to - from).num_days() + 1),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At { at } => f.write_str(at.title()),
            Self::Range { from, to } => {
                let fmt_date = |d: &Option<NaiveDate>| {
                    d.map_or_else(|| "…".to_string(), |d| d.format("%Y-%m-%d").to_string())
                };
                write!(f, "{} to {}", fmt_date(from), fmt_date(to))
            }
        }
    }
}

/// The two report layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportView {
    /// One row per entry, grouped by date.
    DailyTable,
    /// Mon–Sun grid of the month with an occupancy marker per day.
    MonthlyCalendar,
}

/// Chooses the report layout for a query.
///
/// Month filters and explicit ranges longer than [`CALENDAR_SPAN_DAYS`]
/// get the calendar; everything else gets the daily table.
pub fn select_view(period: &Period) -> ReportView {
    match period {
        Period::At {
            at: AtFilter::ThisMonth | AtFilter::LastMonth,
        } => ReportView::MonthlyCalendar,
        Period::At { .. } => ReportView::DailyTable,
        Period::Range { .. } => {
            if period.span_days().is_some_and(|days| days > CALENDAR_SPAN_DAYS) {
                ReportView::MonthlyCalendar
            } else {
                ReportView::DailyTable
            }
        }
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidDate {
            input: input.to_string(),
        }
    })
}
