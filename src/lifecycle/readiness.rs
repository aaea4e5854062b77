// src/lifecycle/readiness.rs

//! Waiting for a restarted cluster to become usable.
//!
//! After a restart the API server keeps reporting the stale status from
//! before the stop for a while, so "all deployments available" is true
//! immediately and means nothing. We sleep `initial_wait` first to let
//! liveness and readiness probes fail, then wait once for the condition.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;

use crate::driver::ConditionQuery;
use crate::errors::{DrenvError, Result};

const RESOURCE_KIND: &str = "deployments";
const CONDITION: &str = "available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessOptions {
    /// Unconditional grace delay before the first query.
    pub initial_wait: Duration,
    /// Budget for the condition query itself.
    pub timeout: Duration,
}

impl Default for ReadinessOptions {
    fn default() -> Self {
        Self {
            initial_wait: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Clone)]
pub struct ReadinessWaiter {
    query: Arc<dyn ConditionQuery>,
    options: ReadinessOptions,
}

impl ReadinessWaiter {
    pub fn new(query: Arc<dyn ConditionQuery>, options: ReadinessOptions) -> Self {
        Self { query, options }
    }

    /// Sleep, then wait until all deployments of `profile` are available.
    pub async fn wait(&self, profile: &str) -> Result<()> {
        let start = Instant::now();
        info!(profile, "[{}] Waiting until all deployments are available", profile);

        tokio::time::sleep(self.options.initial_wait).await;

        let timeout = self.options.timeout;
        let query = self
            .query
            .wait_for_condition(profile, RESOURCE_KIND, CONDITION, timeout);

        match tokio::time::timeout(timeout, query).await {
            Ok(result) => result?,
            Err(_elapsed) => {
                return Err(DrenvError::ReadinessTimeout {
                    profile: profile.to_string(),
                    timeout,
                });
            }
        }

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            profile,
            elapsed_secs = elapsed,
            "[{}] Deployments are available in {:.2} seconds",
            profile,
            elapsed
        );

        Ok(())
    }
}
