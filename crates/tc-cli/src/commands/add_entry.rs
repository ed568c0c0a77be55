//! Add-entry command for recording a finished time entry.

use anyhow::{Result, bail};
use clap::Args;
use serde_json::Value;

use tc_api::TimeCampApi;
use tc_core::time::{today, validate_date};
use tc_core::{TimeEntry, compute_duration_seconds, normalize_time, parse_duration_seconds};

use crate::cache::TaskCacheStore;
use crate::commands::util::{present, resolve_task_id};

#[derive(Debug, Clone, Default, Args)]
pub struct AddEntryArgs {
    /// Entry date YYYY-MM-DD (default today).
    #[arg(long)]
    pub date: Option<String>,

    /// Start time HH:MM or HH:MM:SS.
    #[arg(long, visible_alias = "start-time", alias = "start_time")]
    pub start: Option<String>,

    /// End time HH:MM or HH:MM:SS.
    #[arg(long, visible_alias = "end-time", alias = "end_time")]
    pub end: Option<String>,

    /// Duration in seconds or 1h/30m/45s (default end minus start).
    #[arg(long)]
    pub duration: Option<String>,

    /// Entry note.
    #[arg(long, visible_alias = "description")]
    pub note: Option<String>,

    /// Task id or name.
    #[arg(long, visible_alias = "task-id", alias = "task_id")]
    pub task: Option<String>,

    /// Refresh tasks cache before resolving task.
    #[arg(long)]
    pub refresh: bool,
}

/// Runs the add-entry command.
pub async fn run<A: TimeCampApi>(api: &A, cache: &TaskCacheStore, args: &AddEntryArgs) -> Result<Value> {
    let date = match present(args.date.as_deref()) {
        Some(date) => validate_date(date)?,
        None => today(),
    };
    let (Some(start), Some(end)) = (present(args.start.as_deref()), present(args.end.as_deref()))
    else {
        bail!("add-entry requires --start and --end.");
    };

    let start_time = normalize_time(start)?;
    let end_time = normalize_time(end)?;
    let duration = match args.duration.as_deref() {
        Some(raw) => parse_duration_seconds(raw)?,
        None => compute_duration_seconds(&date, &start_time, &end_time)?,
    };

    let task_id = resolve_task_id(api, cache, present(args.task.as_deref()), args.refresh).await?;
    let entry = TimeEntry {
        date,
        duration,
        start_time,
        end_time,
        description: present(args.note.as_deref()).map(String::from),
        task_id,
    };

    Ok(api.create_entry(&entry).await?)
}
