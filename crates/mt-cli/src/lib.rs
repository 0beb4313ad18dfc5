//! Mite time-tracking CLI library.
//!
//! This crate provides the CLI interface for the `mt` binary.

mod cli;
pub mod commands;
pub mod config;

pub use cli::{AddArgs, Cli, Commands, PeriodFlags, Resource, TimesheetArgs};
pub use config::{Config, ConfigError, Credentials};
