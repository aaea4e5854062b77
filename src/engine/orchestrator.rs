// src/engine/orchestrator.rs

//! Top-level command handlers.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{error, info};

use crate::cli::Command;
use crate::config::{dump_to_string, Environment, Profile, Worker};
use crate::errors::Result;
use crate::lifecycle::{ClusterLifecycle, HookOptions};

use super::parallel::ParallelExecutor;
use super::Context;

pub struct Orchestrator {
    ctx: Arc<Context>,
}

impl Orchestrator {
    pub fn new(ctx: Context) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Dispatch `command` to its handler.
    pub async fn run(&self, command: Command, env: &Environment) -> Result<()> {
        match command {
            Command::Start => self.start(env).await,
            Command::Stop => self.stop(env).await,
            Command::Delete => self.delete(env).await,
            Command::Dump => {
                print!("{}", dump_to_string(env)?);
                Ok(())
            }
        }
    }

    /// Start all clusters (staggered), then run the environment's own
    /// workers.
    ///
    /// Environment workers usually span several clusters, so they only run
    /// once every cluster started.
    pub async fn start(&self, env: &Environment) -> Result<()> {
        let start = Instant::now();
        info!(env = %env.name, "[{}] Starting environment", env.name);

        let lifecycle = ClusterLifecycle::new(self.ctx.clone());
        let clusters = ParallelExecutor::staggered(self.ctx.options.stagger)
            .execute(&env.profiles, move |profile: Arc<Profile>| {
                let lifecycle = lifecycle.clone();
                async move { lifecycle.start(&profile).await }
            })
            .await;

        if clusters.is_err() {
            return finish(env, "started", start, clusters);
        }

        let hooks = self.ctx.hooks.clone();
        let workers = ParallelExecutor::new()
            .execute(&env.workers, move |worker: Arc<Worker>| {
                let hooks = hooks.clone();
                async move { hooks.run(&worker, &HookOptions::start()).await }
            })
            .await;

        finish(env, "started", start, workers)
    }

    pub async fn stop(&self, env: &Environment) -> Result<()> {
        let start = Instant::now();
        info!(env = %env.name, "[{}] Stopping environment", env.name);

        let lifecycle = ClusterLifecycle::new(self.ctx.clone());
        let result = ParallelExecutor::new()
            .execute(&env.profiles, move |profile: Arc<Profile>| {
                let lifecycle = lifecycle.clone();
                async move { lifecycle.stop(&profile).await }
            })
            .await;

        finish(env, "stopped", start, result)
    }

    pub async fn delete(&self, env: &Environment) -> Result<()> {
        let start = Instant::now();
        info!(env = %env.name, "[{}] Deleting environment", env.name);

        let lifecycle = ClusterLifecycle::new(self.ctx.clone());
        let result = ParallelExecutor::new()
            .execute(&env.profiles, move |profile: Arc<Profile>| {
                let lifecycle = lifecycle.clone();
                async move { lifecycle.delete(&profile).await }
            })
            .await;

        finish(env, "deleted", start, result)
    }
}

fn finish(env: &Environment, verb: &str, start: Instant, result: Result<()>) -> Result<()> {
    let elapsed = start.elapsed().as_secs_f64();
    match &result {
        Ok(()) => info!(
            env = %env.name,
            elapsed_secs = elapsed,
            "[{}] Environment {} in {:.2} seconds",
            env.name,
            verb,
            elapsed
        ),
        Err(err) => error!(
            env = %env.name,
            elapsed_secs = elapsed,
            error = %err,
            "[{}] Environment not {} after {:.2} seconds",
            env.name,
            verb,
            elapsed
        ),
    }
    result
}
