//! CLI subcommand implementations.

pub mod add;
pub mod config;
pub mod list;
pub mod timesheet;
mod util;
