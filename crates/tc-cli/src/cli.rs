//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::add_entry::AddEntryArgs;
use crate::commands::entries::EntriesArgs;
use crate::commands::remove_entry::RemoveEntryArgs;
use crate::commands::start::StartArgs;
use crate::commands::stop::StopArgs;
use crate::commands::tasks::TasksArgs;
use crate::commands::update_entry::UpdateEntryArgs;

/// TimeCamp command-line client.
///
/// Starts and stops timers, manages time entries, and lists tasks. Task
/// selectors accept a task id or part of a task name; the task list is
/// cached locally for ten minutes. Durations accept seconds or 1h/30m/45s.
/// Every command needs TIMECAMP_API_KEY.
#[derive(Debug, Parser)]
#[command(name = "timecamp", version)]
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
    /// Start a timer.
    Start(StartArgs),

    /// Stop the current timer.
    Stop(StopArgs),

    /// Show current timer status.
    #[command(visible_alias = "current")]
    Status,

    /// List time entries (default today).
    Entries(EntriesArgs),

    /// Add a time entry.
    AddEntry(AddEntryArgs),

    /// Update a time entry.
    UpdateEntry(UpdateEntryArgs),

    /// Remove a time entry.
    RemoveEntry(RemoveEntryArgs),

    /// List tasks (cached for 10 minutes).
    Tasks(TasksArgs),
}
