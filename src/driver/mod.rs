// src/driver/mod.rs

//! External collaborators that own the clusters.
//!
//! The engine talks to a [`ClusterDriver`] for lifecycle calls and to a
//! [`ConditionQuery`] for readiness checks. Production implementations shell
//! out to `minikube` ([`minikube`]) and `kubectl` ([`kubectl`]) through a
//! [`crate::exec::CommandRunner`].

use std::time::Duration;

use crate::config::Profile;
use crate::errors::Result;
use crate::exec::BoxFuture;
use crate::types::{ClusterState, ClusterStatus};

pub mod kubectl;
pub mod minikube;

pub use kubectl::Kubectl;
pub use minikube::Minikube;

/// Creates, starts, stops and deletes clusters keyed by profile name.
pub trait ClusterDriver: Send + Sync {
    /// Current host/API server status. Never cached.
    fn status<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<ClusterStatus>>;

    /// Create the cluster if missing, otherwise start it.
    fn start<'a>(&'a self, profile: &'a Profile) -> BoxFuture<'a, Result<()>>;

    fn stop<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<()>>;

    fn delete<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<()>>;

    fn exists<'a>(&'a self, profile: &'a str) -> BoxFuture<'a, Result<bool>> {
        Box::pin(async move {
            let status = self.status(profile).await?;
            Ok(status.state() != ClusterState::NotExists)
        })
    }
}

/// Blocks until every resource of a kind satisfies a condition.
pub trait ConditionQuery: Send + Sync {
    /// Returns `DrenvError::ReadinessTimeout` if the condition was not met
    /// within `timeout`.
    fn wait_for_condition<'a>(
        &'a self,
        profile: &'a str,
        kind: &'a str,
        condition: &'a str,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<()>>;
}
