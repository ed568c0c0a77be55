//! Remove-entry command for deleting a time entry.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use tc_api::TimeCampApi;

use crate::commands::util::EntryIdArgs;

#[derive(Debug, Clone, Default, Args)]
pub struct RemoveEntryArgs {
    #[command(flatten)]
    pub id: EntryIdArgs,
}

/// Runs the remove-entry command.
pub async fn run<A: TimeCampApi>(api: &A, args: &RemoveEntryArgs) -> Result<Value> {
    let id = args.id.require("remove-entry")?;
    Ok(api.delete_entry(id).await?)
}
