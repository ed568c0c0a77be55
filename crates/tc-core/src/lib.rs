//! Core domain logic for the TimeCamp CLI.
//!
//! This crate contains:
//! - Types: tasks, time entries, and entry queries as exchanged with the service
//! - Time: normalization of times of day, durations, and dates
//! - Resolution: turning a task selector into exactly one task

pub mod resolve;
pub mod time;
mod types;

pub use resolve::{ResolveError, resolve_task};
pub use time::{InputError, compute_duration_seconds, normalize_time, parse_duration_seconds};
pub use types::{EntryQuery, EntryUpdate, Task, TaskSummary, TimeEntry, de_task_list};
