//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mt_core::AtFilter;

const EXAMPLES: &str = "\
Examples:
  # Add 2 hours of work with a note
  mt add 2h \"Worked on feature X\"

  # Add 90 minutes for a specific date and project
  mt add 90m \"Bug fixing\" --date 2025-01-15 --project acme

  # Configure your account
  mt config --account yourcompany --api-key your-api-key

  # Show this month as a calendar
  mt timesheet --month";

/// Command-line client for the Mite time-tracking service.
///
/// Adds time entries, looks up projects and services, and renders
/// timesheet reports.
#[derive(Debug, Parser)]
#[command(name = "mt", version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the credential file (default: ~/.mite_config.json).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a new time entry.
    Add(AddArgs),

    /// Save Mite credentials.
    Config {
        /// Your Mite account subdomain.
        #[arg(long)]
        account: String,

        /// Your Mite API key.
        #[arg(long)]
        api_key: String,
    },

    /// List projects or services.
    List {
        /// Resource to list.
        #[arg(value_enum)]
        resource: Resource,
    },

    /// Show time entries as a table or monthly calendar with statistics.
    Timesheet(TimesheetArgs),
}

/// Arguments for `mt add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Duration (e.g., 2h, 90m, 1h30m, 1.5h, 90).
    pub duration: String,

    /// Description of work done.
    pub note: String,

    /// Date in YYYY-MM-DD format (default: today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Project ID or name.
    #[arg(long)]
    pub project: Option<String>,

    /// Service ID or name.
    #[arg(long)]
    pub service: Option<String>,
}

/// Resources that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Projects,
    Services,
}

/// Arguments for `mt timesheet`.
#[derive(Debug, Args)]
pub struct TimesheetArgs {
    #[command(flatten)]
    pub period: PeriodFlags,

    /// Start date (YYYY-MM-DD).
    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "period")]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD).
    #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "period")]
    pub to: Option<String>,

    /// Only entries for this project (ID or name).
    #[arg(long)]
    pub project: Option<String>,

    /// Only entries for this service (ID or name).
    #[arg(long)]
    pub service: Option<String>,

    /// Maximum number of entries to fetch.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Named periods. At most one may be given.
#[derive(Debug, Default, Args)]
#[group(id = "period", multiple = false)]
pub struct PeriodFlags {
    /// Today's entries.
    #[arg(long)]
    pub today: bool,

    /// Yesterday's entries.
    #[arg(long)]
    pub yesterday: bool,

    /// This week's entries (default).
    #[arg(long)]
    pub week: bool,

    /// Last week's entries.
    #[arg(long)]
    pub last_week: bool,

    /// This month's entries, shown as a calendar.
    #[arg(long)]
    pub month: bool,

    /// Last month's entries, shown as a calendar.
    #[arg(long)]
    pub last_month: bool,
}

impl PeriodFlags {
    /// The selected at-filter, if any flag was given.
    pub const fn at_filter(&self) -> Option<AtFilter> {
        if self.today {
            Some(AtFilter::Today)
        } else if self.yesterday {
            Some(AtFilter::Yesterday)
        } else if self.week {
            Some(AtFilter::ThisWeek)
        } else if self.last_week {
            Some(AtFilter::LastWeek)
        } else if self.month {
            Some(AtFilter::ThisMonth)
        } else if self.last_month {
            Some(AtFilter::LastMonth)
        } else {
            None
        }
    }
}
