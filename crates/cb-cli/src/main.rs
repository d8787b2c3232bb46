use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use cb_core::{Action, Handler, Message};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cb_cli::commands::{clock, report, say, stats, status, users};
use cb_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(cb_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = cb_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (db, config) = open_database(cli.config.as_deref())?;
    let now = Utc::now();
    let mut stdout = io::stdout().lock();

    match command {
        Commands::ClockIn { user } => {
            let handler = Handler::new(db, config.admins);
            clock::run(&mut stdout, &handler, user, Action::In, now)?;
        }
        Commands::ClockOut { user } => {
            let handler = Handler::new(db, config.admins);
            clock::run(&mut stdout, &handler, user, Action::Out, now)?;
        }
        Commands::Stats { period, user, json } => {
            stats::run(&mut stdout, &db, period, user.as_deref(), *json, now)?;
        }
        Commands::Report {
            user,
            spec,
            requester,
        } => {
            let handler = Handler::new(db, config.admins);
            report::run(&mut stdout, &handler, requester, user, spec, now)?;
        }
        Commands::Say { name, email, text } => {
            let handler = Handler::new(db, config.admins);
            let message = Message {
                content: text.join(" "),
                sender_name: name.clone(),
                sender_email: email.clone(),
            };
            say::run(&mut stdout, &handler, &message, now)?;
        }
        Commands::Users => users::run(&mut stdout, &db)?,
        Commands::Status => status::run(&mut stdout, &db, &config.database_path)?,
    }

    Ok(())
}
