//! CLI subcommand implementations.
//!
//! Every handler turns its parsed arguments into one remote request and
//! returns the JSON to print.

pub mod add_entry;
pub mod entries;
pub mod remove_entry;
pub mod start;
pub mod status;
pub mod stop;
pub mod tasks;
pub mod update_entry;
pub mod util;

use anyhow::Result;
use serde_json::Value;

use tc_api::TimeCampApi;

use crate::Commands;
use crate::cache::TaskCacheStore;

/// Runs `command` against `api` and returns its printable result.
pub async fn dispatch<A: TimeCampApi>(command: &Commands, api: &A, cache: &TaskCacheStore) -> Result<Value> {
    match command {
        Commands::Start(args) => start::run(api, cache, args).await,
        Commands::Stop(args) => stop::run(api, args).await,
        Commands::Status => status::run(api).await,
        Commands::Entries(args) => entries::run(api, cache, args).await,
        Commands::AddEntry(args) => add_entry::run(api, cache, args).await,
        Commands::UpdateEntry(args) => update_entry::run(api, cache, args).await,
        Commands::RemoveEntry(args) => remove_entry::run(api, args).await,
        Commands::Tasks(args) => tasks::run(api, cache, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use clap::Parser;

    use crate::Cli;
    use crate::testing::FakeApi;

    async fn dispatch_args(args: &[&str], api: &FakeApi) -> Result<Value> {
        let dir = tempfile::tempdir().unwrap();
        let cache = TaskCacheStore::new(dir.path(), Duration::from_secs(600));
        let cli = Cli::try_parse_from(std::iter::once("timecamp").chain(args.iter().copied())).unwrap();
        dispatch(cli.command.as_ref().unwrap(), api, &cache).await
    }

    #[tokio::test]
    async fn dispatch_routes_each_command() {
        let cases: [(&[&str], &str); 8] = [
            (&["start"], "start_timer"),
            (&["stop"], "stop_timer"),
            (&["current"], "timer_status"),
            (&["entries", "--date", "2024-03-01"], "list_entries"),
            (&["add-entry", "--start", "09:00", "--end", "10:00"], "create_entry"),
            (&["update-entry", "5", "--note", "x"], "update_entry"),
            (&["remove-entry", "--id", "5"], "delete_entry"),
            (&["tasks"], "active_user_tasks"),
        ];
        for (args, operation) in cases {
            let api = FakeApi::default();
            dispatch_args(args, &api).await.unwrap();
            assert_eq!(api.calls(), vec![operation], "{args:?}");
        }
    }

    #[tokio::test]
    async fn dispatch_surfaces_service_errors() {
        let api = FakeApi::failing("Invalid token");
        let err = dispatch_args(&["status"], &api).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid token");
    }
}
