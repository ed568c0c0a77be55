//! Stop command for stopping the running timer.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use tc_api::{StopTimer, TimeCampApi};

use crate::commands::util::present;

#[derive(Debug, Clone, Default, Args)]
pub struct StopArgs {
    /// Stop time (YYYY-MM-DD HH:MM:SS).
    #[arg(long, alias = "stopped_at")]
    pub stopped_at: Option<String>,
}

/// Runs the stop command.
pub async fn run<A: TimeCampApi>(api: &A, args: &StopArgs) -> Result<Value> {
    let request = StopTimer {
        stopped_at: present(args.stopped_at.as_deref()).map(String::from),
    };
    Ok(api.stop_timer(&request).await?)
}
