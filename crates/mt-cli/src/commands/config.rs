//! Config command for storing credentials.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::config::save_credentials;

/// Runs the config command.
pub fn run<W: Write>(writer: &mut W, path: &Path, account: &str, api_key: &str) -> Result<()> {
    save_credentials(path, account.trim(), api_key.trim())?;
    tracing::debug!(path = %path.display(), "saved credentials");
    writeln!(writer, "Configuration saved to {}", path.display())?;
    Ok(())
}
