//! Domain types exchanged with the TimeCamp service.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Value, json};

/// A task as known to the remote service.
///
/// The service encodes ids as either numbers or numeric strings and
/// `archived` as either booleans or `0`/`1`. The typed fields are a lenient
/// view over the payload; the payload itself is kept untouched and is what
/// gets serialized, so a task prints back exactly as the service sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub task_id: u64,
    pub name: String,
    pub parent_id: Option<u64>,
    pub archived: bool,
    raw: Value,
}

impl Task {
    /// Creates a task with no other payload fields.
    pub fn new(task_id: u64, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            raw: json!({ "task_id": task_id, "name": name }),
            task_id,
            name,
            parent_id: None,
            archived: false,
        }
    }

    /// Reads a task payload, or `None` when it has no usable `task_id`.
    ///
    /// Every other field is best effort: a `name` that is not a string reads
    /// as empty, an unreadable parent as `None`, an unreadable flag as `false`.
    pub fn from_value(raw: Value) -> Option<Self> {
        Self::read(raw).ok()
    }

    fn read(raw: Value) -> Result<Self, Value> {
        let Some(fields) = raw.as_object() else {
            return Err(raw);
        };
        let Some(task_id) = fields.get("task_id").and_then(loose_id) else {
            return Err(raw);
        };
        let name = fields
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let parent_id = fields.get("parent_id").and_then(loose_id);
        let archived = fields.get("archived").is_some_and(loose_flag);
        Ok(Self {
            task_id,
            name,
            parent_id,
            archived,
            raw,
        })
    }

    /// Reads a list of task payloads, skipping entries without a usable id.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Vec<Self> {
        values
            .into_iter()
            .filter_map(|value| match Self::read(value) {
                Ok(task) => Some(task),
                Err(value) => {
                    tracing::debug!(%value, "skipping task without a usable id");
                    None
                }
            })
            .collect()
    }

    /// The payload as received.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Returns the projection printed by the `tasks` command.
    pub fn summary(&self) -> TaskSummary<'_> {
        TaskSummary {
            task_id: self.task_id,
            name: &self.name,
            parent_id: self.parent_id,
            archived: self.archived,
        }
    }
}

impl Serialize for Task {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Task {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::from_value(Value::deserialize(deserializer)?)
            .ok_or_else(|| serde::de::Error::custom("task without a usable task_id"))
    }
}

/// Deserializes a task list, skipping entries without a usable id.
pub fn de_task_list<'de, D>(deserializer: D) -> Result<Vec<Task>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Task::from_values(Vec::<Value>::deserialize(deserializer)?))
}

/// The four task fields shown when the raw payload is not requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskSummary<'a> {
    pub task_id: u64,
    pub name: &'a str,
    pub parent_id: Option<u64>,
    pub archived: bool,
}

/// A new time entry, built locally from command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    pub date: String,
    pub duration: u64,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
}

/// A partial update to an existing time entry. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
}

impl EntryUpdate {
    /// True when no field would be changed.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Query parameters for listing time entries of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryQuery {
    pub user_id: String,
    pub user_ids: String,
    pub date_from: String,
    pub date_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl EntryQuery {
    /// Entries of the authenticated user between two inclusive dates.
    pub fn for_me(date_from: impl Into<String>, date_to: impl Into<String>) -> Self {
        Self {
            user_id: "me".to_string(),
            user_ids: "me".to_string(),
            date_from: date_from.into(),
            date_to: date_to.into(),
            task_id: None,
        }
    }
}

fn loose_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn loose_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_i64().is_some_and(|n| n != 0),
        Value::String(text) => matches!(text.trim(), "1" | "true"),
        _ => false,
    }
}
