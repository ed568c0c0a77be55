//! Status command for showing the running timer.

use anyhow::Result;
use serde_json::Value;

use tc_api::TimeCampApi;

/// Runs the status command.
pub async fn run<A: TimeCampApi>(api: &A) -> Result<Value> {
    Ok(api.timer_status().await?)
}
