//! TimeCamp HTTP API client.
//!
//! [`TimeCampApi`] names every remote operation the CLI needs; [`Client`]
//! implements it over HTTPS. Responses are returned as raw JSON because the
//! CLI prints them verbatim, except task listings which are normalized into
//! [`Task`] values for resolution and caching.

use std::fmt;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use tc_core::{EntryQuery, EntryUpdate, Task, TimeEntry};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_API_URL: &str = "https://app.timecamp.com/third_party/api";
pub const DEFAULT_CLIENT_NAME: &str = "timecamp-cli";
const REQUEST_FALLBACK: &str = "Request failed.";
const TASKS_FALLBACK: &str = "Failed to fetch tasks.";

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// A request payload could not be encoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The service reported a failure.
    #[error("{message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Payload for the plain timer start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StartTimer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
}

/// Payload for a timer start that carries a note.
///
/// The plain start operation has no note field, so this goes through the
/// lower-level timer request with an explicit action and client identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotedTimerStart {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    pub started_at: String,
    pub note: String,
    pub service: String,
}

impl NotedTimerStart {
    pub fn new(task_id: Option<u64>, started_at: String, note: String, service: String) -> Self {
        Self {
            action: "start",
            task_id,
            started_at,
            note,
            service,
        }
    }
}

/// Payload for stopping the running timer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StopTimer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<String>,
}

/// Remote operations offered by the time-tracking service.
#[expect(
    async_fn_in_trait,
    reason = "handlers run on a single-threaded runtime and never need Send futures"
)]
pub trait TimeCampApi {
    /// Identifier this client reports to the service.
    fn client_name(&self) -> &str;

    async fn start_timer(&self, request: &StartTimer) -> Result<Value, ApiError>;

    async fn start_timer_with_note(&self, request: &NotedTimerStart) -> Result<Value, ApiError>;

    async fn stop_timer(&self, request: &StopTimer) -> Result<Value, ApiError>;

    async fn timer_status(&self) -> Result<Value, ApiError>;

    async fn list_entries(&self, query: &EntryQuery) -> Result<Value, ApiError>;

    async fn create_entry(&self, entry: &TimeEntry) -> Result<Value, ApiError>;

    async fn update_entry(&self, id: u64, changes: &EntryUpdate) -> Result<Value, ApiError>;

    async fn delete_entry(&self, id: u64) -> Result<Value, ApiError>;

    /// Active tasks visible to the authenticated user.
    async fn active_user_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// Every task in the account, regardless of user.
    async fn all_tasks(&self) -> Result<Vec<Task>, ApiError>;
}

/// TimeCamp API client.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    client_name: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("client_name", &self.client_name)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(ApiError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(ApiError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_API_URL.to_string(),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
        })
    }

    /// Points the client at a different service root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the identifier reported on noted timer starts.
    #[must_use]
    pub fn with_client_name(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        tracing::debug!(%method, path, "sending request");
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn fetch_tasks(&self, query: &[(&str, &str)]) -> Result<Vec<Task>, ApiError> {
        let request = self.request(Method::GET, "tasks").query(query);
        extract_tasks(execute(request, TASKS_FALLBACK).await?)
    }
}

impl TimeCampApi for Client {
    fn client_name(&self) -> &str {
        &self.client_name
    }

    async fn start_timer(&self, request: &StartTimer) -> Result<Value, ApiError> {
        let mut body = to_object(request)?;
        body.insert("action".to_string(), json!("start"));
        let request = self.request(Method::POST, "timer").json(&body);
        execute(request, REQUEST_FALLBACK).await
    }

    async fn start_timer_with_note(&self, request: &NotedTimerStart) -> Result<Value, ApiError> {
        let request = self.request(Method::POST, "timer").json(request);
        execute(request, REQUEST_FALLBACK).await
    }

    async fn stop_timer(&self, request: &StopTimer) -> Result<Value, ApiError> {
        let mut body = to_object(request)?;
        body.insert("action".to_string(), json!("stop"));
        let request = self.request(Method::POST, "timer").json(&body);
        execute(request, REQUEST_FALLBACK).await
    }

    async fn timer_status(&self) -> Result<Value, ApiError> {
        let request = self
            .request(Method::POST, "timer")
            .json(&json!({ "action": "status" }));
        execute(request, REQUEST_FALLBACK).await
    }

    async fn list_entries(&self, query: &EntryQuery) -> Result<Value, ApiError> {
        let request = self.request(Method::GET, "entries").query(query);
        execute(request, REQUEST_FALLBACK).await
    }

    async fn create_entry(&self, entry: &TimeEntry) -> Result<Value, ApiError> {
        let request = self.request(Method::POST, "entries").json(entry);
        execute(request, REQUEST_FALLBACK).await
    }

    async fn update_entry(&self, id: u64, changes: &EntryUpdate) -> Result<Value, ApiError> {
        let mut body = to_object(changes)?;
        body.insert("id".to_string(), json!(id));
        let request = self.request(Method::PUT, "entries").json(&body);
        execute(request, REQUEST_FALLBACK).await
    }

    async fn delete_entry(&self, id: u64) -> Result<Value, ApiError> {
        let request = self
            .request(Method::DELETE, "entries")
            .json(&json!({ "id": id }));
        execute(request, REQUEST_FALLBACK).await
    }

    async fn active_user_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.fetch_tasks(&[
            ("user", "me"),
            ("status", "active"),
            ("includeFullBreadcrumb", "true"),
        ])
        .await
    }

    async fn all_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.fetch_tasks(&[]).await
    }
}

async fn execute(request: reqwest::RequestBuilder, fallback: &str) -> Result<Value, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    tracing::debug!(%status, bytes = body.len(), "received response");
    check_response(status, &body, fallback)
}

fn to_object<T: Serialize>(value: &T) -> Result<serde_json::Map<String, Value>, ApiError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ApiError::InvalidRequest(format!(
            "expected an object payload, got {other}"
        ))),
        Err(err) => Err(ApiError::InvalidRequest(err.to_string())),
    }
}

/// Turns a raw HTTP response into the JSON body or the service's failure.
///
/// A response fails when its body is empty, its status is not a success, or
/// it carries `"success": false`. The failure message is taken from the
/// body's `message` field, then `error`, then `fallback`.
pub fn check_response(status: StatusCode, body: &str, fallback: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        if status.is_success() {
            return Err(ApiError::Api {
                message: fallback.to_string(),
            });
        }
        return Err(ApiError::Api {
            message: format!("status {status}"),
        });
    }

    let parsed: Result<Value, _> = serde_json::from_str(body);
    let value = match parsed {
        Ok(value) => value,
        Err(_) if !status.is_success() => {
            return Err(ApiError::Api {
                message: format!("status {status}: {body}"),
            });
        }
        Err(err) => return Err(ApiError::InvalidResponse(err.to_string())),
    };

    let failed = !status.is_success() || value.get("success") == Some(&Value::Bool(false));
    if failed {
        let message = failure_message(&value).unwrap_or_else(|| {
            if status.is_success() {
                fallback.to_string()
            } else {
                format!("status {status}: {body}")
            }
        });
        return Err(ApiError::Api { message });
    }

    Ok(value)
}

fn failure_message(value: &Value) -> Option<String> {
    ["message", "error"].iter().find_map(|key| match value.get(key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    })
}

/// Extracts the task list from a task listing response.
///
/// The list lives under `data` when the response is wrapped, and may be
/// either an array or an object keyed by task id. Entries without a usable
/// task id are skipped, as are non-object values of an id-keyed map (such as
/// envelope fields of an unwrapped response).
pub fn extract_tasks(response: Value) -> Result<Vec<Task>, ApiError> {
    let payload = match response {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or_default(),
        other => other,
    };
    let items: Vec<Value> = match payload {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(map) => map
            .into_iter()
            .map(|(_, task)| task)
            .filter(Value::is_object)
            .collect(),
        other => {
            return Err(ApiError::InvalidResponse(format!(
                "expected a task list, got {other}"
            )));
        }
    };
    Ok(Task::from_values(items))
}
