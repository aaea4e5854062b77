// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `drenv`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "drenv",
    version,
    about = "Start, stop and delete multi-cluster test environments.",
    long_about = None
)]
pub struct CliArgs {
    /// Be more verbose (same as `--log-level debug`).
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Takes precedence over `--verbose`. If neither is given, `DRENV_LOG`
    /// or `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Prefix profile names.
    #[arg(long, value_name = "PREFIX")]
    pub name_prefix: Option<String>,

    /// Command to run.
    #[arg(value_enum)]
    pub command: Command,

    /// Environment filename (TOML).
    #[arg(value_name = "FILENAME")]
    pub filename: String,
}

/// The closed set of commands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Command {
    /// Start all clusters, then run start and test hooks.
    Start,
    /// Run stop hooks in reverse order, then stop all clusters.
    Stop,
    /// Delete all clusters and their local config.
    Delete,
    /// Print the resolved environment.
    Dump,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
