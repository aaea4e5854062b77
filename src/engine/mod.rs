// src/engine/mod.rs

//! Orchestration engine for drenv.
//!
//! This module ties together:
//! - the fan-out primitive ([`parallel`]) used at every level of the
//!   environment tree,
//! - the command handlers ([`orchestrator`]) that compose it over profiles
//!   and workers,
//! - the shared [`Context`] holding the external collaborators.
//!
//! Per-profile and per-worker semantics live in [`crate::lifecycle`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::driver::{ClusterDriver, ConditionQuery, Kubectl, Minikube};
use crate::exec::{CommandRunner, ProcessRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::lifecycle::{HookRunner, ReadinessOptions};

pub mod orchestrator;
pub mod parallel;

pub use orchestrator::Orchestrator;
pub use parallel::{Named, ParallelExecutor};

/// Environment variable overriding the local config root.
pub const CONFIG_HOME_ENV: &str = "DRENV_CONFIG_HOME";

/// Timing and local-state options for one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Delay between successive cluster starts.
    pub stagger: Duration,
    pub readiness: ReadinessOptions,
    /// Parent of the per-profile config directories removed on delete.
    pub config_home: PathBuf,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            stagger: Duration::from_secs(1),
            readiness: ReadinessOptions::default(),
            config_home: default_config_home(),
        }
    }
}

impl OrchestratorOptions {
    pub fn profile_config_dir(&self, profile: &str) -> PathBuf {
        self.config_home.join(profile)
    }
}

/// `$DRENV_CONFIG_HOME`, else `$HOME/.config/drenv`.
pub fn default_config_home() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_HOME_ENV) {
        return PathBuf::from(dir);
    }
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("drenv")
}

/// External collaborators shared by every task of one command.
///
/// Read-only after construction; tasks hold it through an `Arc`.
pub struct Context {
    pub driver: Arc<dyn ClusterDriver>,
    pub query: Arc<dyn ConditionQuery>,
    pub hooks: HookRunner,
    pub fs: Arc<dyn FileSystem>,
    pub options: OrchestratorOptions,
}

impl Context {
    pub fn new(
        driver: Arc<dyn ClusterDriver>,
        query: Arc<dyn ConditionQuery>,
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FileSystem>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            driver,
            query,
            hooks: HookRunner::new(runner, fs.clone()),
            fs,
            options,
        }
    }

    /// `minikube` + `kubectl` + real processes and filesystem.
    pub fn production(options: OrchestratorOptions) -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new());
        Self::new(
            Arc::new(Minikube::new(runner.clone())),
            Arc::new(Kubectl::new(runner.clone())),
            runner,
            Arc::new(RealFileSystem),
            options,
        )
    }
}
