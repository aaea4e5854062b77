// src/engine/parallel.rs

//! Fan-out primitive used at every level of the environment tree.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::config::{Profile, Worker};
use crate::errors::{DrenvError, Result};

/// Anything the executor can report failures for.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Profile {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Worker {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<T: Named + ?Sized> Named for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Runs one operation per item concurrently and aggregates the failures.
///
/// Every submitted task runs to completion: a failing item never cancels or
/// short-circuits its siblings. A fresh set of tasks is created for each
/// call, so nested fan-outs (profiles, then each profile's workers) never
/// share failure state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelExecutor {
    delay: Duration,
}

impl ParallelExecutor {
    /// Submit all items at once.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep `delay` between successive submissions.
    pub fn staggered(delay: Duration) -> Self {
        Self { delay }
    }

    /// Run `operation` for every item and wait for all of them.
    ///
    /// Returns `DrenvError::AggregateFailure` naming every failed item if at
    /// least one operation failed (or panicked).
    pub async fn execute<T, F, Fut>(&self, items: &[T], operation: F) -> Result<()>
    where
        T: Named + Clone + Send + 'static,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let mut handles: Vec<(String, JoinHandle<Result<()>>)> = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let name = item.name().to_string();
            debug!(name = %name, "submitting task");
            handles.push((name, tokio::spawn(operation(item.clone()))));
        }

        let mut failed = Vec::new();

        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!(name = %name, error = %err, "[{}] failed", name);
                    failed.push(name);
                }
                Err(join_err) => {
                    error!(name = %name, error = %join_err, "[{}] task panicked", name);
                    failed.push(name);
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(DrenvError::AggregateFailure { failed })
        }
    }
}
