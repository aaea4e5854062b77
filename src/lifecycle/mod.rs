// src/lifecycle/mod.rs

//! Per-profile and per-worker operations.
//!
//! - [`cluster`]: state-aware start/stop/delete of one profile.
//! - [`hooks`]: stage hooks of one worker's scripts.
//! - [`readiness`]: grace delay plus bounded condition wait after restarts.

pub mod cluster;
pub mod hooks;
pub mod readiness;

pub use cluster::ClusterLifecycle;
pub use hooks::{HookOptions, HookRunner};
pub use readiness::{ReadinessOptions, ReadinessWaiter};
