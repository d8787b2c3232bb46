//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Clock-in/clock-out tracker.
///
/// Records when people start and stop working and reconciles the log into
/// hour totals per day, week, month, year or all time.
#[derive(Debug, Parser)]
#[command(name = "cb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a clock-in.
    #[command(name = "in")]
    ClockIn {
        /// Who is clocking in.
        #[arg(long)]
        user: String,
    },

    /// Record a clock-out.
    #[command(name = "out")]
    ClockOut {
        /// Who is clocking out.
        #[arg(long)]
        user: String,
    },

    /// Show hour totals for a period.
    Stats {
        /// One of day, week, month, year, all.
        #[arg(default_value = "day")]
        period: String,

        /// Only report this user.
        #[arg(long)]
        user: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Individual report (admins only).
    Report {
        /// The user to report on.
        user: String,

        /// A period keyword, or a count and unit such as `2 weeks`.
        #[arg(required = true, num_args = 1..=2)]
        spec: Vec<String>,

        /// Email of the person asking, checked against the admin list.
        #[arg(long = "as", value_name = "EMAIL")]
        requester: String,
    },

    /// Run a chat message through the bot and print its reply.
    Say {
        /// Display name of the sender.
        #[arg(long)]
        name: String,

        /// Email of the sender.
        #[arg(long)]
        email: String,

        /// The message text.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// List everyone with recorded events.
    Users,

    /// Show database location and the latest event.
    Status,
}
