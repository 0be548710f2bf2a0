//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Personal time tracker.
///
/// Start and stop named sessions, then total the hours per label for a month.
#[derive(Debug, Parser)]
#[command(name = "timekeep", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start timing a label.
    Start {
        /// Label for the time entry (defaults to the configured label, "work").
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Stop timing a label.
    Stop {
        /// Label for the time entry (defaults to the configured label, "work").
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Show total hours per label for a month.
    Hours {
        /// Month number (1-12). Defaults to the current month.
        #[arg(short, long)]
        month: Option<u32>,

        /// Only count sessions started in this year. Without it, the month is
        /// matched across all years.
        #[arg(short, long)]
        year: Option<i32>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show open sessions.
    Status,
}
