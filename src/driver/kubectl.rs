// src/driver/kubectl.rs

use std::sync::Arc;
use std::time::Duration;

use crate::errors::{DrenvError, Result};
use crate::exec::{BoxFuture, CommandLine, CommandRunner};

use super::ConditionQuery;

/// [`ConditionQuery`] backed by `kubectl wait`, using the profile name as
/// the kubeconfig context.
#[derive(Clone)]
pub struct Kubectl {
    runner: Arc<dyn CommandRunner>,
}

impl Kubectl {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub fn wait_command(
        profile: &str,
        kind: &str,
        condition: &str,
        timeout: Duration,
    ) -> CommandLine {
        CommandLine::new("kubectl")
            .arg("--context")
            .arg(profile)
            .arg("wait")
            .arg(kind)
            .arg("--all")
            .arg("--for")
            .arg(format!("condition={condition}"))
            .arg("--all-namespaces")
            .arg("--timeout")
            .arg(format!("{}s", timeout.as_secs()))
    }
}

impl ConditionQuery for Kubectl {
    fn wait_for_condition<'a>(
        &'a self,
        profile: &'a str,
        kind: &'a str,
        condition: &'a str,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let cmd = Self::wait_command(profile, kind, condition, timeout);
            match self.runner.run(profile, &cmd).await {
                Err(DrenvError::CommandFailed { ref stderr, .. })
                    if stderr.contains("timed out") =>
                {
                    Err(DrenvError::ReadinessTimeout {
                        profile: profile.to_string(),
                        timeout,
                    })
                }
                other => other,
            }
        })
    }
}
