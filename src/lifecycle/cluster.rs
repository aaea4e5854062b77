// src/lifecycle/cluster.rs

//! Start, stop and delete for one profile.
//!
//! Each operation runs as the per-item operation of a
//! [`ParallelExecutor`] over the environment's profiles, and fans out again
//! over the profile's own workers.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::{Profile, Worker};
use crate::engine::{Context, ParallelExecutor};
use crate::errors::{DrenvError, Result};
use crate::types::ClusterState;

use super::hooks::HookOptions;
use super::readiness::ReadinessWaiter;

#[derive(Clone)]
pub struct ClusterLifecycle {
    ctx: Arc<Context>,
}

impl ClusterLifecycle {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    /// Create or restart the cluster, then run its workers' `start` and
    /// `test` hooks.
    ///
    /// Only a restart waits for readiness: a fresh cluster has no stale
    /// deployment status to wait out.
    pub async fn start(&self, profile: &Profile) -> Result<()> {
        let start = Instant::now();
        info!(profile = %profile.name, "[{}] Starting cluster", profile.name);

        let is_restart = self
            .ctx
            .driver
            .exists(&profile.name)
            .await
            .map_err(|e| DrenvError::driver(&profile.name, "status", e))?;

        debug!(
            profile = %profile.name,
            is_restart,
            state = %ClusterState::Starting,
            "invoking driver"
        );

        self.ctx
            .driver
            .start(profile)
            .await
            .map_err(|e| DrenvError::driver(&profile.name, "start", e))?;

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            profile = %profile.name,
            elapsed_secs = elapsed,
            "[{}] Cluster started in {:.2} seconds",
            profile.name,
            elapsed
        );

        if is_restart {
            ReadinessWaiter::new(self.ctx.query.clone(), self.ctx.options.readiness)
                .wait(&profile.name)
                .await?;
        }

        self.run_workers(&profile.workers, HookOptions::start()).await
    }

    /// Run the workers' `stop` hooks if the API server is up, then stop the
    /// cluster if the host is up.
    ///
    /// Hook failures are only logged; a failing driver call is an error.
    pub async fn stop(&self, profile: &Profile) -> Result<()> {
        let status = self
            .ctx
            .driver
            .status(&profile.name)
            .await
            .map_err(|e| DrenvError::driver(&profile.name, "status", e))?;

        debug!(
            profile = %profile.name,
            host = %status.host,
            apiserver = %status.apiserver,
            "cluster status"
        );

        if status.apiserver_running() {
            self.run_workers(&profile.workers, HookOptions::stop()).await?;
        }

        if status.host_running() {
            let start = Instant::now();
            info!(
                profile = %profile.name,
                state = %ClusterState::Stopping,
                "[{}] Stopping cluster",
                profile.name
            );

            self.ctx
                .driver
                .stop(&profile.name)
                .await
                .map_err(|e| DrenvError::driver(&profile.name, "stop", e))?;

            let elapsed = start.elapsed().as_secs_f64();
            info!(
                profile = %profile.name,
                elapsed_secs = elapsed,
                "[{}] Cluster stopped in {:.2} seconds",
                profile.name,
                elapsed
            );
        }

        Ok(())
    }

    /// Delete the cluster and its local config directory.
    pub async fn delete(&self, profile: &Profile) -> Result<()> {
        let start = Instant::now();
        info!(
            profile = %profile.name,
            state = %ClusterState::Deleting,
            "[{}] Deleting cluster",
            profile.name
        );

        self.ctx
            .driver
            .delete(&profile.name)
            .await
            .map_err(|e| DrenvError::driver(&profile.name, "delete", e))?;

        let config_dir = self.ctx.options.profile_config_dir(&profile.name);
        if self.ctx.fs.is_dir(&config_dir) {
            info!(
                profile = %profile.name,
                "[{}] Removing config {}",
                profile.name,
                config_dir.display()
            );
            self.ctx.fs.remove_dir_all(&config_dir)?;
        }

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            profile = %profile.name,
            elapsed_secs = elapsed,
            "[{}] Cluster deleted in {:.2} seconds",
            profile.name,
            elapsed
        );

        Ok(())
    }

    async fn run_workers(&self, workers: &[Arc<Worker>], options: HookOptions) -> Result<()> {
        let hooks = self.ctx.hooks.clone();
        ParallelExecutor::new()
            .execute(workers, move |worker: Arc<Worker>| {
                let hooks = hooks.clone();
                let options = options.clone();
                async move { hooks.run(&worker, &options).await }
            })
            .await
    }
}
