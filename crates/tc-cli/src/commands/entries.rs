//! Entries command for listing time entries in a date range.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use tc_api::TimeCampApi;
use tc_core::EntryQuery;
use tc_core::time::{today, validate_date};

use crate::cache::TaskCacheStore;
use crate::commands::util::{present, resolve_task_id};

#[derive(Debug, Clone, Default, Args)]
pub struct EntriesArgs {
    /// Date in YYYY-MM-DD (overrides from/to).
    #[arg(long)]
    pub date: Option<String>,

    /// Start date YYYY-MM-DD.
    #[arg(long, visible_alias = "date-from", alias = "date_from")]
    pub from: Option<String>,

    /// End date YYYY-MM-DD.
    #[arg(long, visible_alias = "date-to", alias = "date_to")]
    pub to: Option<String>,

    /// Task id or name.
    #[arg(long, visible_alias = "task-id", alias = "task_id")]
    pub task: Option<String>,

    /// Refresh tasks cache before resolving task.
    #[arg(long)]
    pub refresh: bool,
}

/// Works out the inclusive date range to list.
///
/// `date` pins both ends. Otherwise a missing end copies the other one, and
/// with neither given both default to `today`.
pub fn date_range(
    date: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    today: &str,
) -> (String, String) {
    if let Some(date) = date {
        return (date.to_string(), date.to_string());
    }
    match (from, to) {
        (Some(from), Some(to)) => (from.to_string(), to.to_string()),
        (Some(one), None) | (None, Some(one)) => (one.to_string(), one.to_string()),
        (None, None) => (today.to_string(), today.to_string()),
    }
}

/// Runs the entries command.
pub async fn run<A: TimeCampApi>(api: &A, cache: &TaskCacheStore, args: &EntriesArgs) -> Result<Value> {
    let (from, to) = date_range(
        present(args.date.as_deref()),
        present(args.from.as_deref()),
        present(args.to.as_deref()),
        &today(),
    );
    let mut query = EntryQuery::for_me(validate_date(&from)?, validate_date(&to)?);

    let task_id = resolve_task_id(api, cache, present(args.task.as_deref()), args.refresh).await?;
    query.task_id = task_id.map(|id| id.to_string());

    Ok(api.list_entries(&query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;
    use tc_core::Task;

    use crate::testing::FakeApi;

    const TODAY: &str = "2024-05-10";

    #[test]
    fn single_date_sets_both_ends() {
        assert_eq!(
            date_range(Some("2024-03-01"), Some("2024-01-01"), None, TODAY),
            ("2024-03-01".to_string(), "2024-03-01".to_string())
        );
    }

    #[test]
    fn from_alone_extends_to_itself() {
        assert_eq!(
            date_range(None, Some("2024-03-01"), None, TODAY),
            ("2024-03-01".to_string(), "2024-03-01".to_string())
        );
    }

    #[test]
    fn to_alone_extends_to_itself() {
        assert_eq!(
            date_range(None, None, Some("2024-03-09"), TODAY),
            ("2024-03-09".to_string(), "2024-03-09".to_string())
        );
    }

    #[test]
    fn no_dates_default_to_today() {
        assert_eq!(
            date_range(None, None, None, TODAY),
            (TODAY.to_string(), TODAY.to_string())
        );
    }

    #[test]
    fn explicit_range_is_kept() {
        assert_eq!(
            date_range(None, Some("2024-03-01"), Some("2024-03-31"), TODAY),
            ("2024-03-01".to_string(), "2024-03-31".to_string())
        );
    }

    #[tokio::test]
    async fn entries_query_targets_current_user() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        let api = FakeApi::default();
        let args = EntriesArgs {
            from: Some("2024-03-01".to_string()),
            ..EntriesArgs::default()
        };

        run(&api, &cache, &args).await.unwrap();

        assert_eq!(
            api.single_request().1,
            json!({
                "user_id": "me",
                "user_ids": "me",
                "date_from": "2024-03-01",
                "date_to": "2024-03-01"
            })
        );
    }

    #[tokio::test]
    async fn entries_default_to_today() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        let api = FakeApi::default();

        let response = run(&api, &cache, &EntriesArgs::default()).await.unwrap();

        let today = today();
        assert_eq!(response["payload"]["date_from"], json!(today));
        assert_eq!(response["payload"]["date_to"], json!(today));
    }

    #[tokio::test]
    async fn entries_filter_by_resolved_task_as_string() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        let api = FakeApi::with_tasks(vec![Task::new(44, "Research")]);
        let args = EntriesArgs {
            date: Some("2024-03-01".to_string()),
            task: Some("research".to_string()),
            ..EntriesArgs::default()
        };

        let response = run(&api, &cache, &args).await.unwrap();

        assert_eq!(response["payload"]["task_id"], json!("44"));
    }

    #[tokio::test]
    async fn invalid_date_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        let api = FakeApi::default();
        let args = EntriesArgs {
            date: Some("yesterday".to_string()),
            ..EntriesArgs::default()
        };

        let err = run(&api, &cache, &args).await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid date: yesterday. Use YYYY-MM-DD.");
        assert!(api.calls().is_empty());
    }
}
