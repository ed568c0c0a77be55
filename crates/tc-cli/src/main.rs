use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tc_cli::{Cli, Commands, Config, commands};

/// Load config and build the API client, failing early without a key.
fn connect(config_path: Option<&Path>) -> Result<(tc_api::Client, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let api_key = config.require_api_key()?;
    let client = tc_api::Client::new(api_key)?
        .with_base_url(&config.api_url)
        .with_client_name(&config.client_name);
    Ok((client, config))
}

fn run(cli: &Cli, command: &Commands) -> Result<()> {
    let (client, config) = connect(cli.config.as_deref())?;
    let cache = config.task_cache();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize tokio runtime")?;
    let response = runtime.block_on(commands::dispatch(command, &client, &cache))?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout stays valid JSON
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let result = match &cli.command {
        Some(command) => run(&cli, command),
        None => print_help(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_help() -> Result<()> {
    use clap::CommandFactory;
    Cli::command().print_help()?;
    println!();
    Ok(())
}
