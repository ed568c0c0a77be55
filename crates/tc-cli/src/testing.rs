//! In-memory stand-in for the TimeCamp service used by command tests.

use std::cell::RefCell;

use serde::Serialize;
use serde_json::{Value, json};

use tc_api::{ApiError, NotedTimerStart, StartTimer, StopTimer, TimeCampApi};
use tc_core::{EntryQuery, EntryUpdate, Task, TimeEntry};

/// Records every call and echoes its payload back as the response.
#[derive(Debug, Default)]
pub struct FakeApi {
    tasks: Vec<Task>,
    all_tasks: Vec<Task>,
    failure: Option<String>,
    requests: RefCell<Vec<(String, Value)>>,
}

impl FakeApi {
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            all_tasks: tasks.clone(),
            tasks,
            ..Self::default()
        }
    }

    pub fn with_all_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.all_tasks = tasks;
        self
    }

    /// Every operation fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|(name, _)| name.clone()).collect()
    }

    /// The payload of the only call made so far.
    pub fn single_request(&self) -> (String, Value) {
        let requests = self.requests.borrow();
        assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
        requests[0].clone()
    }

    fn record<T: Serialize + ?Sized>(&self, name: &str, payload: &T) -> Result<Value, ApiError> {
        let payload = serde_json::to_value(payload).unwrap();
        self.requests
            .borrow_mut()
            .push((name.to_string(), payload.clone()));
        if let Some(message) = &self.failure {
            return Err(ApiError::Api {
                message: message.clone(),
            });
        }
        Ok(json!({ "operation": name, "payload": payload }))
    }
}

impl TimeCampApi for FakeApi {
    fn client_name(&self) -> &str {
        "timecamp-cli"
    }

    async fn start_timer(&self, request: &StartTimer) -> Result<Value, ApiError> {
        self.record("start_timer", request)
    }

    async fn start_timer_with_note(&self, request: &NotedTimerStart) -> Result<Value, ApiError> {
        self.record("start_timer_with_note", request)
    }

    async fn stop_timer(&self, request: &StopTimer) -> Result<Value, ApiError> {
        self.record("stop_timer", request)
    }

    async fn timer_status(&self) -> Result<Value, ApiError> {
        self.record("timer_status", &Value::Null)
    }

    async fn list_entries(&self, query: &EntryQuery) -> Result<Value, ApiError> {
        self.record("list_entries", query)
    }

    async fn create_entry(&self, entry: &TimeEntry) -> Result<Value, ApiError> {
        self.record("create_entry", entry)
    }

    async fn update_entry(&self, id: u64, changes: &EntryUpdate) -> Result<Value, ApiError> {
        self.record("update_entry", &json!({ "id": id, "changes": changes }))
    }

    async fn delete_entry(&self, id: u64) -> Result<Value, ApiError> {
        self.record("delete_entry", &json!({ "id": id }))
    }

    async fn active_user_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.record("active_user_tasks", &Value::Null)?;
        Ok(self.tasks.clone())
    }

    async fn all_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.record("all_tasks", &Value::Null)?;
        Ok(self.all_tasks.clone())
    }
}
