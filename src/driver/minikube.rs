// src/driver/minikube.rs

use std::sync::Arc;

use serde_json::Value;

use crate::config::Profile;
use crate::errors::{DrenvError, Result};
use crate::exec::{BoxFuture, CommandLine, CommandRunner};
use crate::types::{ClusterStatus, ComponentState};

use super::ClusterDriver;

/// [`ClusterDriver`] backed by the `minikube` CLI.
#[derive(Clone)]
pub struct Minikube {
    runner: Arc<dyn CommandRunner>,
}

impl Minikube {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn command(cmd: &str, profile: &str) -> CommandLine {
        CommandLine::new("minikube")
            .arg(cmd)
            .arg("--profile")
            .arg(profile)
    }

    /// Command line for `minikube start` with the profile's configuration.
    ///
    /// Empty string options are left out so minikube uses its own default.
    pub fn start_command(profile: &Profile) -> CommandLine {
        let mut cmd = Self::command("start", &profile.name)
            .arg("--driver")
            .arg(&profile.driver);

        if !profile.container_runtime.is_empty() {
            cmd = cmd.arg("--container-runtime").arg(&profile.container_runtime);
        }

        cmd = cmd
            .arg("--extra-disks")
            .arg(profile.extra_disks.to_string())
            .arg("--disk-size")
            .arg(&profile.disk_size);

        if !profile.network.is_empty() {
            cmd = cmd.arg("--network").arg(&profile.network);
        }

        cmd = cmd
            .arg("--nodes")
            .arg(profile.nodes.to_string())
            .arg("--cni")
            .arg(&profile.cni)
            .arg("--cpus")
            .arg(profile.cpus.to_string())
            .arg("--memory")
            .arg(&profile.memory);

        if !profile.addons.is_empty() {
            cmd = cmd.arg("--addons").arg(profile.addons.join(","));
        }

        cmd
    }
}

impl ClusterDriver for Minikube {
    fn status<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<ClusterStatus>> {
        Box::pin(async move {
            let cmd = Self::command("status", profile).arg("--output").arg("json");
            let output = self.runner.output(&cmd).await?;
            parse_status(&output.stdout, output.success())
        })
    }

    fn start<'a>(&'a self, profile: &'a Profile) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let cmd = Self::start_command(profile);
            self.runner.run(&profile.name, &cmd).await
        })
    }

    fn stop<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let cmd = Self::command("stop", profile);
            self.runner.run(profile, &cmd).await
        })
    }

    fn delete<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let cmd = Self::command("delete", profile);
            self.runner.run(profile, &cmd).await
        })
    }
}

/// Parse `minikube status --output json`.
///
/// minikube exits non-zero whenever the cluster is not fully running, so the
/// exit code alone says nothing. A multi-node cluster reports a JSON array;
/// the first entry is the control plane. Output that is not JSON from a
/// failed call means the profile does not exist.
pub fn parse_status(stdout: &str, success: bool) -> Result<ClusterStatus> {
    let stdout = stdout.trim();

    let value: Value = match serde_json::from_str(stdout) {
        Ok(value) => value,
        Err(_) if !success => return Ok(ClusterStatus::nonexistent()),
        Err(e) => {
            return Err(DrenvError::Other(anyhow::anyhow!(
                "invalid minikube status output: {e}"
            )));
        }
    };

    let node = match &value {
        Value::Array(nodes) => match nodes.first() {
            Some(node) => node,
            None => return Ok(ClusterStatus::nonexistent()),
        },
        other => other,
    };

    let field = |key: &str| {
        ComponentState::from(node.get(key).and_then(Value::as_str).unwrap_or(""))
    };

    Ok(ClusterStatus {
        host: field("Host"),
        apiserver: field("APIServer"),
    })
}
