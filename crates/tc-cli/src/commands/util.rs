//! Shared utilities for CLI commands.

use anyhow::{Result, bail};
use clap::Args;

use tc_api::TimeCampApi;
use tc_core::{Task, resolve_task};

use crate::cache::TaskCacheStore;

/// Entry id given either as `--id` or as the first positional argument.
#[derive(Debug, Clone, Default, Args)]
pub struct EntryIdArgs {
    /// Entry id.
    #[arg(long = "id", value_name = "ENTRY_ID")]
    pub id_flag: Option<String>,

    /// Entry id.
    #[arg(value_name = "ID")]
    pub id: Option<String>,
}

impl EntryIdArgs {
    /// The flag wins over the positional when both are given.
    pub fn entry_id(&self) -> Option<&str> {
        present(self.id_flag.as_deref()).or_else(|| present(self.id.as_deref()))
    }

    /// Parses the entry id as a positive integer.
    pub fn require(&self, command: &str) -> Result<u64> {
        let Some(raw) = self.entry_id() else {
            bail!("{command} requires --id <entryId>.");
        };
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            bail!("{command} requires --id <entryId>.");
        }
        match raw.parse::<u64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => bail!("{command} requires --id <entryId>."),
        }
    }
}

/// Treats an empty flag value the same as an absent flag.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Returns the task list, from the cache when it is fresh.
///
/// `all_users` always goes to the service and leaves the cache alone.
/// Otherwise a fresh cache is used unless `refresh` is set; a fetched list
/// replaces the cache wholesale. A failed fetch fails the call even when a
/// stale cache exists.
pub async fn get_tasks<A: TimeCampApi>(
    api: &A,
    cache: &TaskCacheStore,
    refresh: bool,
    all_users: bool,
) -> Result<Vec<Task>> {
    if all_users {
        tracing::debug!("fetching tasks for all users");
        return Ok(api.all_tasks().await?);
    }

    if !refresh {
        if let Some(cached) = cache.read_fresh() {
            tracing::debug!(count = cached.tasks.len(), "using cached tasks");
            return Ok(cached.tasks);
        }
    }

    tracing::debug!(refresh, "fetching active tasks");
    let tasks = api.active_user_tasks().await?;
    if let Err(err) = cache.write(&tasks) {
        tracing::warn!(error = %format!("{err:#}"), "failed to update task cache");
    }
    Ok(tasks)
}

/// Resolves a task selector to a task id.
///
/// The task list is only loaded when a selector was actually given.
pub async fn resolve_task_id<A: TimeCampApi>(
    api: &A,
    cache: &TaskCacheStore,
    query: Option<&str>,
    refresh: bool,
) -> Result<Option<u64>> {
    let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
        return Ok(None);
    };
    let tasks = get_tasks(api, cache, refresh, false).await?;
    let task = resolve_task(&tasks, Some(query))?;
    Ok(task.map(|task| task.task_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use crate::testing::FakeApi;

    fn ids(id_flag: Option<&str>, id: Option<&str>) -> EntryIdArgs {
        EntryIdArgs {
            id_flag: id_flag.map(String::from),
            id: id.map(String::from),
        }
    }

    #[test]
    fn entry_id_prefers_flag_over_positional() {
        assert_eq!(ids(Some("5"), Some("6")).entry_id(), Some("5"));
        assert_eq!(ids(None, Some("6")).entry_id(), Some("6"));
        assert_eq!(ids(Some(""), Some("6")).entry_id(), Some("6"));
        assert_eq!(ids(None, None).entry_id(), None);
    }

    #[test]
    fn require_accepts_positive_integers_only() {
        assert_eq!(ids(Some("42"), None).require("remove-entry").unwrap(), 42);
        for bad in ["abc", "0", "-3", "4.2", "99999999999999999999999"] {
            let err = ids(Some(bad), None).require("remove-entry").unwrap_err();
            assert_eq!(err.to_string(), "remove-entry requires --id <entryId>.");
        }
        assert!(ids(None, None).require("update-entry").is_err());
    }

    #[tokio::test]
    async fn fresh_cache_avoids_remote_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        cache.write(&[Task::new(1, "Cached")]).unwrap();
        let api = FakeApi::with_tasks(vec![Task::new(2, "Remote")]);

        let tasks = get_tasks(&api, &cache, false, false).await.unwrap();

        assert_eq!(tasks, vec![Task::new(1, "Cached")]);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn refresh_bypasses_and_overwrites_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        cache.write(&[Task::new(1, "Cached")]).unwrap();
        let api = FakeApi::with_tasks(vec![Task::new(2, "Remote")]);

        let tasks = get_tasks(&api, &cache, true, false).await.unwrap();

        assert_eq!(tasks, vec![Task::new(2, "Remote")]);
        assert_eq!(api.calls(), vec!["active_user_tasks".to_string()]);
        assert_eq!(cache.read().unwrap().tasks, vec![Task::new(2, "Remote")]);
    }

    #[tokio::test]
    async fn missing_cache_fetches_and_stores() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        let api = FakeApi::with_tasks(vec![Task::new(3, "Remote")]);

        let tasks = get_tasks(&api, &cache, false, false).await.unwrap();

        assert_eq!(tasks, vec![Task::new(3, "Remote")]);
        assert_eq!(cache.read_fresh().unwrap().tasks, tasks);
    }

    #[tokio::test]
    async fn unwritable_cache_still_returns_fetched_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let cache = TaskCacheStore::new(&blocker.join("cache"), Duration::from_secs(600));
        let api = FakeApi::with_tasks(vec![Task::new(3, "Remote")]);

        let tasks = get_tasks(&api, &cache, false, false).await.unwrap();

        assert_eq!(tasks, vec![Task::new(3, "Remote")]);
        assert!(cache.read().is_none());
    }

    #[tokio::test]
    async fn all_users_bypasses_cache_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        cache.write(&[Task::new(1, "Cached")]).unwrap();
        let api = FakeApi::with_tasks(vec![Task::new(2, "Mine")])
            .with_all_tasks(vec![Task::new(2, "Mine"), Task::new(9, "Theirs")]);

        let tasks = get_tasks(&api, &cache, false, true).await.unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(api.calls(), vec!["all_tasks".to_string()]);
        assert_eq!(cache.read().unwrap().tasks, vec![Task::new(1, "Cached")]);
    }

    #[tokio::test]
    async fn failed_fetch_does_not_fall_back_to_stale_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::ZERO);
        cache.write(&[Task::new(1, "Stale")]).unwrap();
        let api = FakeApi::failing("Failed to fetch tasks.");

        let err = get_tasks(&api, &cache, false, false).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch tasks.");
    }

    #[tokio::test]
    async fn resolve_task_id_skips_fetch_without_selector() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        let api = FakeApi::with_tasks(vec![Task::new(1, "Alpha")]);

        assert_eq!(resolve_task_id(&api, &cache, None, false).await.unwrap(), None);
        assert_eq!(resolve_task_id(&api, &cache, Some(" "), false).await.unwrap(), None);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn resolve_task_id_resolves_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        let api = FakeApi::with_tasks(vec![Task::new(1, "Alpha"), Task::new(2, "Beta")]);

        let id = resolve_task_id(&api, &cache, Some("bet"), false).await.unwrap();
        assert_eq!(id, Some(2));
    }

    #[tokio::test]
    async fn resolve_task_id_reports_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        let api = FakeApi::with_tasks(vec![Task::new(1, "Alpha")]);

        let err = resolve_task_id(&api, &cache, Some("gamma"), false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No task matches \"gamma\".");
    }
}
