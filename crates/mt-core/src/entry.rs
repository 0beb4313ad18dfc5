//! Time entry type.

use chrono::NaiveDate;
use serde::Serialize;

/// Label used when an entry has no note.
pub const NO_DESCRIPTION: &str = "No description";
/// Category used when an entry has no project.
pub const NO_PROJECT: &str = "No project";
/// Category used when an entry has no service.
pub const NO_SERVICE: &str = "No service";

/// A single logged block of work, as fetched from the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    /// Day the time was logged on; `None` when the payload had no usable date.
    pub date: Option<NaiveDate>,
    pub minutes: u32,
    pub note: String,
    pub project: Option<String>,
    pub service: Option<String>,
}

impl TimeEntry {
    /// Project name, or [`NO_PROJECT`].
    pub fn project_label(&self) -> &str {
        self.project.as_deref().unwrap_or(NO_PROJECT)
    }

    /// Service name, or [`NO_SERVICE`].
    pub fn service_label(&self) -> &str {
        self.service.as_deref().unwrap_or(NO_SERVICE)
    }

    /// Date as `YYYY-MM-DD`, or `N/A`.
    pub fn date_label(&self) -> String {
        date_label(self.date)
    }
}

/// Formats an optional entry date for display.
pub fn date_label(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "N/A".to_string(), |d| d.format("%Y-%m-%d").to_string())
}
