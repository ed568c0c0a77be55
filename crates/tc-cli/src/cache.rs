//! On-disk cache of the most recently fetched task list.
//!
//! The cache is a single JSON file `{ "fetchedAt": <epoch ms>, "tasks": [...] }`.
//! It is an optimization only: anything that cannot be read back as that
//! shape is treated as no cache at all, and a lost update between two
//! concurrent invocations costs one extra fetch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use tc_core::Task;

const CACHE_FILE_NAME: &str = "tasks-cache.json";

/// A task list together with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCache {
    /// Fetch time in milliseconds since the Unix epoch.
    #[serde(rename = "fetchedAt", default)]
    pub fetched_at: i64,
    #[serde(deserialize_with = "tc_core::de_task_list")]
    pub tasks: Vec<Task>,
}

impl TaskCache {
    /// True when the cache is younger than `ttl` at `now_ms`.
    pub fn is_fresh_at(&self, ttl: Duration, now_ms: i64) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.fetched_at) < ttl_ms
    }

    /// True when the cache is younger than `ttl` right now.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.is_fresh_at(ttl, now_millis())
    }
}

/// Location and freshness window of the task cache.
#[derive(Debug, Clone)]
pub struct TaskCacheStore {
    path: PathBuf,
    ttl: Duration,
}

impl TaskCacheStore {
    pub fn new(dir: &Path, ttl: Duration) -> Self {
        Self {
            path: dir.join(CACHE_FILE_NAME),
            ttl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Reads the cache, returning `None` if it is missing or malformed.
    pub fn read(&self) -> Option<TaskCache> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), %err, "task cache unavailable");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(cache) => Some(cache),
            Err(err) => {
                tracing::debug!(path = %self.path.display(), %err, "ignoring malformed task cache");
                None
            }
        }
    }

    /// Reads the cache only if it is still within the freshness window.
    pub fn read_fresh(&self) -> Option<TaskCache> {
        self.read().filter(|cache| cache.is_fresh(self.ttl))
    }

    /// Replaces the cache with `tasks`, stamped with the current time.
    ///
    /// Writes go to a sibling file that is then renamed over the cache, so a
    /// reader never sees a half-written file.
    pub fn write(&self, tasks: &[Task]) -> Result<TaskCache> {
        let cache = TaskCache {
            fetched_at: now_millis(),
            tasks: tasks.to_vec(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("failed to create cache directory")?;
        }
        let json = serde_json::to_string_pretty(&cache).context("failed to serialize task cache")?;
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, json)
            .with_context(|| format!("failed to write {}", staging.display()))?;
        std::fs::rename(&staging, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), count = cache.tasks.len(), "task cache written");
        Ok(cache)
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
