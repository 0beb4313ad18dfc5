//! List command for projects and services.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use mt_api::Client;
use mt_core::Candidate;

use crate::Resource;

/// Formats candidates as `ID: <id> - <name>` lines under a heading.
pub fn format_candidates(resource: Resource, candidates: &[Candidate]) -> String {
    let (title, noun) = match resource {
        Resource::Projects => ("Projects", "projects"),
        Resource::Services => ("Services", "services"),
    };

    let mut output = String::new();
    if candidates.is_empty() {
        writeln!(output, "No {noun} found.").unwrap();
        return output;
    }

    writeln!(output, "Available {title}:").unwrap();
    for candidate in candidates {
        writeln!(output, "  ID: {} - {}", candidate.id, candidate.name).unwrap();
    }
    output
}

/// Runs the list command.
pub fn run<W: Write>(writer: &mut W, client: &Client, resource: Resource) -> Result<()> {
    let candidates = match resource {
        Resource::Projects => client.projects().context("failed to fetch projects")?,
        Resource::Services => client.services().context("failed to fetch services")?,
    };
    write!(writer, "{}", format_candidates(resource, &candidates))?;
    Ok(())
}
