//! Resolution of user-supplied task selectors.
//!
//! A selector is either a numeric task id or a fragment of a task name. Ids
//! are tried first and win outright; anything not resolved by id falls back
//! to a case-insensitive substring match that must be unique.

use thiserror::Error;

use crate::Task;

/// Maximum number of candidates listed in an ambiguity error.
pub const AMBIGUOUS_PREVIEW_LIMIT: usize = 10;

/// Task resolution failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No task matches \"{query}\".")]
    NoMatch { query: String },

    /// `preview` holds one `- <id>: <name>` line per listed candidate.
    #[error("Task query matched multiple tasks:\n{preview}\nRefine your query.")]
    Ambiguous { query: String, preview: String },
}

/// Picks exactly one task for `query`.
///
/// Returns `Ok(None)` for an absent or blank query, meaning no task was
/// requested.
pub fn resolve_task<'a>(tasks: &'a [Task], query: Option<&str>) -> Result<Option<&'a Task>, ResolveError> {
    let Some(raw) = query else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        // Ids too large for u64 cannot match and fall through to names.
        if let Ok(id) = trimmed.parse::<u64>() {
            if let Some(task) = tasks.iter().find(|task| task.task_id == id) {
                tracing::debug!(task_id = id, "resolved task by id");
                return Ok(Some(task));
            }
        }
    }

    let needle = trimmed.to_lowercase();
    let matches: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.name.to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [] => Err(ResolveError::NoMatch {
            query: raw.to_string(),
        }),
        [task] => {
            tracing::debug!(task_id = task.task_id, "resolved task by name");
            Ok(Some(task))
        }
        many => Err(ResolveError::Ambiguous {
            query: raw.to_string(),
            preview: many
                .iter()
                .take(AMBIGUOUS_PREVIEW_LIMIT)
                .map(|task| format!("- {}: {}", task.task_id, task.name))
                .collect::<Vec<_>>()
                .join("\n"),
        }),
    }
}
