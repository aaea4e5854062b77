//! In-memory stand-ins for the driver, condition query and command runner.
//!
//! All of them write into a shared [`Journal`], so a test can assert on the
//! global order of driver calls and hook invocations.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use drenv::config::Profile;
use drenv::driver::{ClusterDriver, ConditionQuery};
use drenv::engine::{Context, OrchestratorOptions};
use drenv::errors::{DrenvError, Result};
use drenv::exec::{BoxFuture, CommandLine, CommandOutput, CommandRunner};
use drenv::fs::mock::MockFileSystem;
use drenv::lifecycle::ReadinessOptions;
use drenv::types::ClusterStatus;
use tokio::time::Instant;

/// Ordered, timestamped record of everything the fakes were asked to do.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<(Instant, String)>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap()
            .push((Instant::now(), entry.into()));
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn timed(&self) -> Vec<(Instant, String)> {
        self.entries.lock().unwrap().clone()
    }

    /// Entries starting with `prefix`, in order.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }

    pub fn time_of(&self, entry: &str) -> Option<Instant> {
        self.timed()
            .into_iter()
            .find(|(_, e)| e == entry)
            .map(|(at, _)| at)
    }

    pub fn count(&self, entry: &str) -> usize {
        self.entries().iter().filter(|e| e.as_str() == entry).count()
    }
}

fn command_failed(command: &str) -> DrenvError {
    DrenvError::CommandFailed {
        command: command.to_string(),
        exit_code: 1,
        stderr: "simulated failure".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionBehaviour {
    #[default]
    Met,
    /// The query never returns.
    Never,
    /// The query reports a timeout immediately.
    TimedOut,
}

#[derive(Debug, Default)]
struct FakeClusterState {
    statuses: HashMap<String, ClusterStatus>,
    failing: HashSet<(String, String)>,
    start_latency: Duration,
    condition: ConditionBehaviour,
}

/// Fake cluster driver and condition query.
///
/// Clusters not configured with [`FakeCluster::with_status`] do not exist.
/// `start` makes a cluster running, `stop` stops it and `delete` removes it.
#[derive(Debug, Clone)]
pub struct FakeCluster {
    journal: Journal,
    state: Arc<Mutex<FakeClusterState>>,
}

impl FakeCluster {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            state: Arc::new(Mutex::new(FakeClusterState::default())),
        }
    }

    pub fn with_status(self, profile: &str, status: ClusterStatus) -> Self {
        self.state
            .lock()
            .unwrap()
            .statuses
            .insert(profile.to_string(), status);
        self
    }

    /// Make `operation` ("status", "start", "stop" or "delete") fail for
    /// `profile`.
    pub fn fail(self, operation: &str, profile: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing
            .insert((operation.to_string(), profile.to_string()));
        self
    }

    pub fn start_latency(self, latency: Duration) -> Self {
        self.state.lock().unwrap().start_latency = latency;
        self
    }

    pub fn condition(self, behaviour: ConditionBehaviour) -> Self {
        self.state.lock().unwrap().condition = behaviour;
        self
    }

    pub fn status_of(&self, profile: &str) -> ClusterStatus {
        self.state
            .lock()
            .unwrap()
            .statuses
            .get(profile)
            .cloned()
            .unwrap_or_else(ClusterStatus::nonexistent)
    }

    fn fails(&self, operation: &str, profile: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .failing
            .contains(&(operation.to_string(), profile.to_string()))
    }

    fn set_status(&self, profile: &str, status: Option<ClusterStatus>) {
        let mut state = self.state.lock().unwrap();
        match status {
            Some(status) => state.statuses.insert(profile.to_string(), status),
            None => state.statuses.remove(profile),
        };
    }
}

impl ClusterDriver for FakeCluster {
    fn status<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<ClusterStatus>> {
        Box::pin(async move {
            self.journal.record(format!("status {profile}"));
            if self.fails("status", profile) {
                return Err(command_failed("minikube status"));
            }
            Ok(self.status_of(profile))
        })
    }

    fn start<'a>(&'a self, profile: &'a Profile) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.journal.record(format!("start {}", profile.name));
            let latency = self.state.lock().unwrap().start_latency;
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if self.fails("start", &profile.name) {
                return Err(command_failed("minikube start"));
            }
            self.set_status(&profile.name, Some(ClusterStatus::running()));
            Ok(())
        })
    }

    fn stop<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.journal.record(format!("stop {profile}"));
            if self.fails("stop", profile) {
                return Err(command_failed("minikube stop"));
            }
            self.set_status(profile, Some(ClusterStatus::stopped()));
            Ok(())
        })
    }

    fn delete<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.journal.record(format!("delete {profile}"));
            if self.fails("delete", profile) {
                return Err(command_failed("minikube delete"));
            }
            self.set_status(profile, None);
            Ok(())
        })
    }
}

impl ConditionQuery for FakeCluster {
    fn wait_for_condition<'a>(
        &'a self,
        profile: &'a str,
        kind: &'a str,
        condition: &'a str,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.journal
                .record(format!("wait {profile} {kind} {condition}"));
            let behaviour = self.state.lock().unwrap().condition;
            match behaviour {
                ConditionBehaviour::Met => Ok(()),
                ConditionBehaviour::Never => std::future::pending().await,
                ConditionBehaviour::TimedOut => Err(DrenvError::ReadinessTimeout {
                    profile: profile.to_string(),
                    timeout,
                }),
            }
        })
    }
}

/// Command runner that records `run <command line>` instead of spawning.
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    journal: Journal,
    failing: Arc<Mutex<HashSet<String>>>,
    latency: Duration,
}

impl RecordingRunner {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            failing: Arc::new(Mutex::new(HashSet::new())),
            latency: Duration::ZERO,
        }
    }

    /// Make every run of `program` exit non-zero.
    pub fn fail(self, program: &str) -> Self {
        self.failing.lock().unwrap().insert(program.to_string());
        self
    }

    /// Time every run takes.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(&'a self, _name: &'a str, cmd: &'a CommandLine) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.journal.record(format!("run {cmd}"));
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if self.failing.lock().unwrap().contains(&cmd.program) {
                return Err(command_failed(&cmd.to_string()));
            }
            Ok(())
        })
    }

    fn output<'a>(&'a self, cmd: &'a CommandLine) -> BoxFuture<'a, Result<CommandOutput>> {
        Box::pin(async move {
            self.journal.record(format!("output {cmd}"));
            Ok(CommandOutput::default())
        })
    }
}

/// Local config root used by test contexts.
pub fn test_config_home() -> PathBuf {
    PathBuf::from("/drenv-test/config")
}

/// Default timings (1 s stagger, 30 s grace, 300 s budget) with a fake
/// config root. Tests that depend on timing run on a paused clock.
pub fn test_options() -> OrchestratorOptions {
    OrchestratorOptions {
        stagger: Duration::from_secs(1),
        readiness: ReadinessOptions::default(),
        config_home: test_config_home(),
    }
}

/// Context wired to the fakes.
pub fn test_context(
    cluster: &FakeCluster,
    runner: &RecordingRunner,
    fs: &MockFileSystem,
    options: OrchestratorOptions,
) -> Context {
    Context::new(
        Arc::new(cluster.clone()),
        Arc::new(cluster.clone()),
        Arc::new(runner.clone()),
        Arc::new(fs.clone()),
        options,
    )
}
