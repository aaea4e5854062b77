// src/types.rs

use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a hook.
///
/// A hook is an executable named after its stage (`start`, `stop` or `test`)
/// inside a script directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    Start,
    Stop,
    Test,
}

impl HookStage {
    /// File name of the hook for this stage.
    pub fn file_name(&self) -> &'static str {
        match self {
            HookStage::Start => "start",
            HookStage::Stop => "stop",
            HookStage::Test => "test",
        }
    }
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for HookStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(HookStage::Start),
            "stop" => Ok(HookStage::Stop),
            "test" => Ok(HookStage::Test),
            other => Err(format!(
                "invalid hook stage: {other} (expected \"start\", \"stop\" or \"test\")"
            )),
        }
    }
}

/// State of a single cluster component as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentState {
    Running,
    Stopped,
    Nonexistent,
    Other(String),
}

impl From<&str> for ComponentState {
    fn from(s: &str) -> Self {
        match s {
            "Running" => ComponentState::Running,
            "Stopped" => ComponentState::Stopped,
            "Nonexistent" | "" => ComponentState::Nonexistent,
            other => ComponentState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentState::Running => f.write_str("Running"),
            ComponentState::Stopped => f.write_str("Stopped"),
            ComponentState::Nonexistent => f.write_str("Nonexistent"),
            ComponentState::Other(s) => f.write_str(s),
        }
    }
}

/// Raw status of a cluster: host and API server state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterStatus {
    pub host: ComponentState,
    pub apiserver: ComponentState,
}

impl ClusterStatus {
    pub fn nonexistent() -> Self {
        Self {
            host: ComponentState::Nonexistent,
            apiserver: ComponentState::Nonexistent,
        }
    }

    pub fn running() -> Self {
        Self {
            host: ComponentState::Running,
            apiserver: ComponentState::Running,
        }
    }

    pub fn stopped() -> Self {
        Self {
            host: ComponentState::Stopped,
            apiserver: ComponentState::Stopped,
        }
    }

    pub fn host_running(&self) -> bool {
        self.host == ComponentState::Running
    }

    pub fn apiserver_running(&self) -> bool {
        self.apiserver == ComponentState::Running
    }

    pub fn state(&self) -> ClusterState {
        ClusterState::from(self)
    }
}

/// Observed cluster state.
///
/// `Starting`, `Stopping` and `Deleting` are never reported by the driver;
/// they only describe a cluster while a driver call is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterState {
    NotExists,
    Stopped,
    Running,
    Starting,
    Stopping,
    Deleting,
}

impl From<&ClusterStatus> for ClusterState {
    fn from(status: &ClusterStatus) -> Self {
        match (&status.host, &status.apiserver) {
            (ComponentState::Nonexistent, _) => ClusterState::NotExists,
            (ComponentState::Running, ComponentState::Running) => ClusterState::Running,
            _ => ClusterState::Stopped,
        }
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClusterState::NotExists => "not-exists",
            ClusterState::Stopped => "stopped",
            ClusterState::Running => "running",
            ClusterState::Starting => "starting",
            ClusterState::Stopping => "stopping",
            ClusterState::Deleting => "deleting",
        };
        f.write_str(s)
    }
}
