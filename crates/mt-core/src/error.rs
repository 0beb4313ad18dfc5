//! Validation errors for user input.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

/// Number of candidate names shown when a lookup fails.
pub const CANDIDATE_PREVIEW_LEN: usize = 10;

/// Validation errors for user-supplied values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The duration string matched none of the accepted forms.
    #[error("Invalid duration format: {input} (use e.g. 2h, 90m, 1h30m, 1.5h or 90)")]
    InvalidDuration { input: String },

    /// The date was not in `YYYY-MM-DD` format.
    #[error("Date must be in YYYY-MM-DD format, got '{input}'")]
    InvalidDate { input: String },

    /// The explicit range ends before it starts.
    #[error("--from {from} is after --to {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    /// No project or service matched the given name.
    #[error("{0}")]
    UnknownName(UnknownName),
}

/// A failed name lookup, with a preview of what was available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName {
    /// `"project"` or `"service"`.
    pub kind: &'static str,
    pub query: String,
    /// The first [`CANDIDATE_PREVIEW_LEN`] candidate names, in API order.
    pub preview: Vec<String>,
    /// Candidates not included in `preview`.
    pub remaining: usize,
}

impl UnknownName {
    pub fn new<'a>(
        kind: &'static str,
        query: impl Into<String>,
        names: impl ExactSizeIterator<Item = &'a str>,
    ) -> Self {
        let total = names.len();
        let preview: Vec<String> = names
            .take(CANDIDATE_PREVIEW_LEN)
            .map(str::to_string)
            .collect();
        let remaining = total - preview.len();
        Self {
            kind,
            query: query.into(),
            preview,
            remaining,
        }
    }
}

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No {} found matching '{}'", self.kind, self.query)?;
        if self.preview.is_empty() {
            return write!(f, " (no {}s available)", self.kind);
        }
        write!(f, "\nAvailable {}s:", self.kind)?;
        for name in &self.preview {
            write!(f, "\n  - {name}")?;
        }
        if self.remaining > 0 {
            write!(f, "\n  ... and {} more", self.remaining)?;
        }
        Ok(())
    }
}
