// src/lifecycle/hooks.rs

//! Runs a worker's lifecycle hooks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{Script, Worker};
use crate::errors::{DrenvError, Result};
use crate::exec::{CommandLine, CommandRunner};
use crate::fs::FileSystem;
use crate::types::HookStage;

/// Which hooks to run for a worker, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOptions {
    stages: Vec<HookStage>,
    reverse: bool,
    allow_failure: bool,
}

impl HookOptions {
    /// Build options, rejecting an empty or repeated stage list.
    pub fn new(stages: Vec<HookStage>, reverse: bool, allow_failure: bool) -> Result<Self> {
        if stages.is_empty() {
            return Err(DrenvError::ConfigError(
                "hook options need at least one stage".to_string(),
            ));
        }
        for (i, stage) in stages.iter().enumerate() {
            if stages[..i].contains(stage) {
                return Err(DrenvError::ConfigError(format!(
                    "hook stage '{stage}' given more than once"
                )));
            }
        }
        Ok(Self {
            stages,
            reverse,
            allow_failure,
        })
    }

    /// `start` then `test` hooks, declared order, failures propagate.
    pub fn start() -> Self {
        Self {
            stages: vec![HookStage::Start, HookStage::Test],
            reverse: false,
            allow_failure: false,
        }
    }

    /// `stop` hooks, reverse order, failures logged and skipped.
    pub fn stop() -> Self {
        Self {
            stages: vec![HookStage::Stop],
            reverse: true,
            allow_failure: true,
        }
    }

    pub fn stages(&self) -> &[HookStage] {
        &self.stages
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn allow_failure(&self) -> bool {
        self.allow_failure
    }
}

/// Runs the stage hooks of a worker's scripts, one at a time.
#[derive(Clone)]
pub struct HookRunner {
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FileSystem>,
}

impl HookRunner {
    pub fn new(runner: Arc<dyn CommandRunner>, fs: Arc<dyn FileSystem>) -> Self {
        Self { runner, fs }
    }

    /// Location of the hook for `stage` under `script`.
    pub fn hook_path(script: &Script, stage: HookStage) -> PathBuf {
        Path::new(&script.name).join(stage.file_name())
    }

    /// Run every requested stage hook of every script of `worker`.
    ///
    /// Scripts run strictly one after another, in declared order or in
    /// reverse. Missing hook files are skipped.
    pub async fn run(&self, worker: &Worker, options: &HookOptions) -> Result<()> {
        let mut scripts: Vec<&Script> = worker.scripts.iter().collect();
        if options.reverse {
            scripts.reverse();
        }

        for script in scripts {
            self.run_script(worker, script, options).await?;
        }

        Ok(())
    }

    async fn run_script(
        &self,
        worker: &Worker,
        script: &Script,
        options: &HookOptions,
    ) -> Result<()> {
        for &stage in &options.stages {
            let hook = Self::hook_path(script, stage);

            if !self.fs.is_file(&hook) {
                debug!(worker = %worker.name, hook = %hook.display(), "no hook, skipping");
                continue;
            }

            match self.run_hook(worker, &hook, &script.args).await {
                Ok(()) => {}
                Err(err) if options.allow_failure => {
                    warn!(
                        worker = %worker.name,
                        "[{}] {} failed: {}",
                        worker.name,
                        hook.display(),
                        err
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }

    async fn run_hook(&self, worker: &Worker, hook: &Path, args: &[String]) -> Result<()> {
        let start = Instant::now();
        info!(worker = %worker.name, "[{}] Running {}", worker.name, hook.display());

        let cmd = CommandLine::new(hook.to_string_lossy()).args(args.iter().cloned());

        self.runner
            .run(&worker.name, &cmd)
            .await
            .map_err(|source| DrenvError::HookError {
                worker: worker.name.clone(),
                hook: hook.to_path_buf(),
                source: Box::new(source),
            })?;

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            worker = %worker.name,
            elapsed_secs = elapsed,
            "[{}] {} completed in {:.2} seconds",
            worker.name,
            hook.display(),
            elapsed
        );

        Ok(())
    }
}
