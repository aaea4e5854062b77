// src/config/model.rs

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Environment file as read from disk.
///
/// ```toml
/// name = "regional-dr"
///
/// [[profiles]]
/// name = "dr1"
/// driver = "kvm2"
/// addons = ["volumesnapshots"]
///
/// [[profiles.workers]]
/// name = "rook"
/// scripts = [{ name = "rook-operator" }, { name = "rook-cluster", args = ["$name"] }]
///
/// [[workers]]
/// scripts = [{ name = "rbd-mirror", args = ["dr1", "dr2"] }]
/// ```
///
/// Only `name` is required. Profile fields not given fall back to the
/// defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEnvironment {
    pub name: String,

    #[serde(default)]
    pub profiles: Vec<RawProfile>,

    /// Workers not bound to any single cluster.
    #[serde(default)]
    pub workers: Vec<RawWorker>,
}

/// `[[profiles]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProfile {
    pub name: String,

    #[serde(default = "default_driver")]
    pub driver: String,

    #[serde(default)]
    pub container_runtime: String,

    #[serde(default)]
    pub extra_disks: u32,

    #[serde(default = "default_disk_size")]
    pub disk_size: String,

    #[serde(default = "default_nodes")]
    pub nodes: u32,

    #[serde(default = "default_cni")]
    pub cni: String,

    #[serde(default = "default_cpus")]
    pub cpus: u32,

    #[serde(default = "default_memory")]
    pub memory: String,

    #[serde(default)]
    pub network: String,

    #[serde(default)]
    pub addons: Vec<String>,

    #[serde(default)]
    pub workers: Vec<RawWorker>,
}

/// `[[workers]]` entry, either top-level or inside a profile.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawWorker {
    /// Defaults to `<scope>/<index>`.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub scripts: Vec<Script>,
}

pub fn default_driver() -> String {
    "kvm2".to_string()
}

pub fn default_disk_size() -> String {
    "20g".to_string()
}

pub fn default_nodes() -> u32 {
    1
}

pub fn default_cni() -> String {
    "auto".to_string()
}

pub fn default_cpus() -> u32 {
    2
}

pub fn default_memory() -> String {
    "4g".to_string()
}

impl RawProfile {
    /// A profile with every field at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver: default_driver(),
            container_runtime: String::new(),
            extra_disks: 0,
            disk_size: default_disk_size(),
            nodes: default_nodes(),
            cni: default_cni(),
            cpus: default_cpus(),
            memory: default_memory(),
            network: String::new(),
            addons: Vec::new(),
            workers: Vec::new(),
        }
    }
}

/// Fully resolved environment handed to the orchestrator.
///
/// Construct through [`Environment::resolve`] (or `TryFrom<RawEnvironment>`),
/// which applies the name prefix and validates the tree.
#[derive(Debug, Clone, Serialize)]
pub struct Environment {
    pub name: String,
    pub profiles: Vec<Arc<Profile>>,
    pub workers: Vec<Arc<Worker>>,
}

/// One cluster managed by the driver. `name` is the driver's instance key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub driver: String,
    pub container_runtime: String,
    pub extra_disks: u32,
    pub disk_size: String,
    pub nodes: u32,
    pub cni: String,
    pub cpus: u32,
    pub memory: String,
    pub network: String,
    pub addons: Vec<String>,
    pub workers: Vec<Arc<Worker>>,
}

/// Named, ordered group of scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Worker {
    pub name: String,
    pub scripts: Vec<Script>,
}

/// Directory holding stage hooks, plus the arguments passed to each hook.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Script {
    pub name: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl Script {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
}
