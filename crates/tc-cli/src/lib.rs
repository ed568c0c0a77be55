//! TimeCamp CLI library.
//!
//! This crate provides the CLI interface, configuration, and the local task
//! cache for the TimeCamp command-line client.

pub mod cache;
mod cli;
pub mod commands;
mod config;
#[cfg(test)]
mod testing;

pub use cli::{Cli, Commands};
pub use config::Config;
