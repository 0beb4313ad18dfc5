//! Shared utilities for CLI commands.

use anyhow::{Context, Result};
use mt_api::{ApiError, Client};
use mt_core::{Candidate, UnknownName, ValidationError, resolve};

/// Resolve a `--project` value (numeric id or name) to a project id.
pub fn project_id(client: &Client, value: &str) -> Result<u64> {
    lookup_id("project", value, || client.projects())
}

/// Resolve a `--service` value (numeric id or name) to a service id.
pub fn service_id(client: &Client, value: &str) -> Result<u64> {
    lookup_id("service", value, || client.services())
}

/// Numeric values are ids and are used as-is. Anything else is matched
/// against a freshly fetched candidate list.
fn lookup_id(
    kind: &'static str,
    value: &str,
    fetch: impl FnOnce() -> Result<Vec<Candidate>, ApiError>,
) -> Result<u64> {
    if let Ok(id) = value.trim().parse::<u64>() {
        return Ok(id);
    }

    let candidates = fetch().with_context(|| format!("failed to fetch {kind}s"))?;
    if let Some(id) = resolve(value, &candidates) {
        return Ok(id);
    }

    let names = candidates.iter().map(|c| c.name.as_str());
    Err(ValidationError::UnknownName(UnknownName::new(kind, value, names)).into())
}

/// Truncates by characters, not bytes, to avoid panics on multi-byte UTF-8.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let keep = width.saturating_sub(3);
        format!("{}...", text.chars().take(keep).collect::<String>())
    } else {
        text.to_string()
    }
}
