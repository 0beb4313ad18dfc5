use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use mt_cli::commands::{add, config, list, timesheet};
use mt_cli::config::{default_config_path, load_dotenv};
use mt_cli::{Cli, Commands, Config};

/// Load credentials from every source and build an API client.
fn open_client(config_path: Option<&Path>) -> Result<mt_api::Client> {
    load_dotenv();

    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let credentials = config.credentials()?;
    credentials
        .client()
        .context("failed to create API client")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so report output stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Config { account, api_key }) => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => default_config_path().context("could not determine home directory")?,
            };
            config::run(&mut stdout, &path, account, api_key)?;
        }
        Some(Commands::List { resource }) => {
            let client = open_client(cli.config.as_deref())?;
            list::run(&mut stdout, &client, *resource)?;
        }
        Some(Commands::Add(args)) => {
            let client = open_client(cli.config.as_deref())?;
            add::run(&mut stdout, &client, args)?;
        }
        Some(Commands::Timesheet(args)) => {
            let client = open_client(cli.config.as_deref())?;
            let today = Local::now().date_naive();
            timesheet::run(&mut stdout, &client, args, today)?;
        }
        None => {
            // No subcommand, show help
            Cli::command().print_help()?;
            println!();
            std::process::exit(1);
        }
    }

    Ok(())
}
