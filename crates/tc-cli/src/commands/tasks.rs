//! Tasks command for listing the (cached) task list.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use tc_api::TimeCampApi;

use crate::cache::TaskCacheStore;
use crate::commands::util::get_tasks;

#[derive(Debug, Clone, Default, Args)]
pub struct TasksArgs {
    /// Refresh tasks cache.
    #[arg(long)]
    pub refresh: bool,

    /// Print full task payload.
    #[arg(long)]
    pub raw: bool,

    /// List every task in the account instead of your active ones (not cached).
    #[arg(long)]
    pub all_users: bool,
}

/// Runs the tasks command.
pub async fn run<A: TimeCampApi>(api: &A, cache: &TaskCacheStore, args: &TasksArgs) -> Result<Value> {
    let tasks = get_tasks(api, cache, args.refresh, args.all_users).await?;
    let value = if args.raw {
        serde_json::to_value(&tasks)
    } else {
        serde_json::to_value(tasks.iter().map(tc_core::Task::summary).collect::<Vec<_>>())
    };
    value.context("failed to serialize tasks")
}
