//! Core domain logic for the Mite time-tracking CLI.
//!
//! This crate contains the fundamental types and logic for:
//! - Durations: parsing `1h30m`-style input and formatting minutes for display
//! - Name resolution: mapping project/service names to ids
//! - Timesheets: aggregating entries into daily and per-category totals
//! - Periods: at-filters, explicit ranges and report view selection

pub mod calendar;
pub mod duration;
mod entry;
mod error;
pub mod period;
pub mod resolver;
pub mod timesheet;

pub use duration::{format_duration, parse_duration};
pub use entry::{NO_DESCRIPTION, NO_PROJECT, NO_SERVICE, TimeEntry};
pub use error::{CANDIDATE_PREVIEW_LEN, UnknownName, ValidationError};
pub use period::{AtFilter, Period, ReportView, parse_date, select_view};
pub use resolver::{Candidate, resolve};
pub use timesheet::{Share, Timesheet};
