//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::log::LogArgs;
use crate::commands::sleep_end::SleepEndArgs;

/// Caregiver activity log.
///
/// Logs meals, sleep, behavior, hydration, location check-ins and activities
/// for a child, and shows them as one combined feed.
#[derive(Debug, Parser)]
#[command(name = "carelog", version, about, long_about = None)]
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
    /// List children, or add and remove them.
    Children {
        #[command(subcommand)]
        action: Option<ChildrenAction>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Refresh every log kind and show the combined feed.
    Feed {
        /// Child ID (defaults to `default_child`, then the first child).
        #[arg(long)]
        child: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Log a new record.
    Log(LogArgs),

    /// Close a sleep log that is still in progress.
    SleepEnd(SleepEndArgs),

    /// Show the weekly summary.
    Insights {
        /// Child ID (defaults to `default_child`, then the first child).
        #[arg(long)]
        child: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the shift-change handoff summary.
    Handoff {
        /// Child ID (defaults to `default_child`, then the first child).
        #[arg(long)]
        child: Option<String>,
    },

    /// Describe what happened in plain words; the server turns it into logs.
    Voice {
        /// What happened, e.g. "had apple slices and water at 3pm".
        text: String,

        /// Child ID (defaults to `default_child`, then the first child).
        #[arg(long)]
        child: Option<String>,
    },
}

/// Children management actions.
#[derive(Debug, Subcommand)]
pub enum ChildrenAction {
    /// Register a child.
    Add {
        /// Display name.
        name: String,

        /// Birthdate as YYYY-MM-DD.
        #[arg(long)]
        birthdate: Option<String>,
    },

    /// Delete a child and all of its logs.
    Remove {
        /// Child ID.
        id: String,
    },
}
