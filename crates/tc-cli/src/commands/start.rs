//! Start command for starting a timer.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use tc_api::{NotedTimerStart, StartTimer, TimeCampApi};
use tc_core::time::local_timestamp;

use crate::cache::TaskCacheStore;
use crate::commands::util::{present, resolve_task_id};

#[derive(Debug, Clone, Default, Args)]
pub struct StartArgs {
    /// Task id or name.
    #[arg(long, visible_alias = "task-id", alias = "task_id")]
    pub task: Option<String>,

    /// Timer note.
    #[arg(long, visible_alias = "description")]
    pub note: Option<String>,

    /// Start time (YYYY-MM-DD HH:MM:SS).
    #[arg(long, alias = "started_at")]
    pub started_at: Option<String>,

    /// Refresh tasks cache before resolving task.
    #[arg(long)]
    pub refresh: bool,
}

/// Runs the start command.
///
/// A note forces the lower-level timer request, since the plain start
/// carries no note; that request always has a start time, defaulting to now.
pub async fn run<A: TimeCampApi>(api: &A, cache: &TaskCacheStore, args: &StartArgs) -> Result<Value> {
    let task_id = resolve_task_id(api, cache, present(args.task.as_deref()), args.refresh).await?;
    let started_at = present(args.started_at.as_deref()).map(String::from);

    let response = match present(args.note.as_deref()) {
        Some(note) => {
            let request = NotedTimerStart::new(
                task_id,
                started_at.unwrap_or_else(local_timestamp),
                note.to_string(),
                api.client_name().to_string(),
            );
            api.start_timer_with_note(&request).await?
        }
        None => api.start_timer(&StartTimer { task_id, started_at }).await?,
    };
    Ok(response)
}
