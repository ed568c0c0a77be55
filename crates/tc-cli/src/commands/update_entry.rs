//! Update-entry command for changing fields of an existing time entry.

use anyhow::{Result, bail};
use clap::Args;
use serde_json::Value;

use tc_api::TimeCampApi;
use tc_core::time::validate_date;
use tc_core::{EntryUpdate, compute_duration_seconds, normalize_time, parse_duration_seconds};

use crate::cache::TaskCacheStore;
use crate::commands::util::{EntryIdArgs, present, resolve_task_id};

#[derive(Debug, Clone, Default, Args)]
pub struct UpdateEntryArgs {
    #[command(flatten)]
    pub id: EntryIdArgs,

    /// Entry date YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<String>,

    /// Start time HH:MM or HH:MM:SS.
    #[arg(long, visible_alias = "start-time", alias = "start_time")]
    pub start: Option<String>,

    /// End time HH:MM or HH:MM:SS.
    #[arg(long, visible_alias = "end-time", alias = "end_time")]
    pub end: Option<String>,

    /// Duration in seconds or 1h/30m/45s.
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

/// Runs the update-entry command.
///
/// Start and end travel together. With a date as well, the duration is
/// recomputed from them; an explicit duration still takes precedence.
pub async fn run<A: TimeCampApi>(api: &A, cache: &TaskCacheStore, args: &UpdateEntryArgs) -> Result<Value> {
    let id = args.id.require("update-entry")?;

    let mut changes = EntryUpdate {
        date: present(args.date.as_deref()).map(validate_date).transpose()?,
        ..EntryUpdate::default()
    };

    match (present(args.start.as_deref()), present(args.end.as_deref())) {
        (None, None) => {}
        (Some(start), Some(end)) => {
            let start_time = normalize_time(start)?;
            let end_time = normalize_time(end)?;
            if let Some(date) = &changes.date {
                changes.duration = Some(compute_duration_seconds(date, &start_time, &end_time)?);
            }
            changes.start_time = Some(start_time);
            changes.end_time = Some(end_time);
        }
        _ => bail!("update-entry requires both --start and --end."),
    }

    if let Some(raw) = args.duration.as_deref() {
        changes.duration = Some(parse_duration_seconds(raw)?);
    }

    changes.description = present(args.note.as_deref()).map(String::from);
    changes.task_id = resolve_task_id(api, cache, present(args.task.as_deref()), args.refresh).await?;

    if changes.is_empty() {
        bail!("update-entry requires at least one field to update.");
    }

    Ok(api.update_entry(id, &changes).await?)
}
