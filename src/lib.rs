// src/lib.rs

pub mod cli;
pub mod config;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod lifecycle;
pub mod logging;
pub mod types;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::engine::{Context, Orchestrator, OrchestratorOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - environment file loading (with the optional name prefix)
/// - the production driver, condition query, command runner and filesystem
/// - dispatch of the requested command
pub async fn run(args: CliArgs) -> Result<()> {
    let env = load_and_validate(&args.filename, args.name_prefix.as_deref())?;
    debug!(
        env = %env.name,
        profiles = env.profiles.len(),
        workers = env.workers.len(),
        "environment loaded"
    );

    let ctx = Context::production(OrchestratorOptions::default());
    let orchestrator = Orchestrator::new(ctx);

    orchestrator.run(args.command, &env).await?;
    Ok(())
}
