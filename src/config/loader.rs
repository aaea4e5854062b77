// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{Environment, RawEnvironment};
use crate::errors::{DrenvError, Result};

/// Load an environment file and return the raw `RawEnvironment`.
///
/// This only performs TOML deserialization; defaults are applied by `serde`
/// but names are not prefixed or validated. Use [`load_and_validate`] for
/// that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawEnvironment> {
    let contents = fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(contents: &str) -> Result<RawEnvironment> {
    let env: RawEnvironment = toml::from_str(contents)?;
    Ok(env)
}

/// Load an environment file and resolve it into the tree used by the
/// orchestrator.
pub fn load_and_validate(path: impl AsRef<Path>, name_prefix: Option<&str>) -> Result<Environment> {
    let raw = load_from_path(&path)?;
    Environment::resolve(raw, name_prefix)
}

/// Render a resolved environment back to TOML (used by `dump`).
pub fn dump_to_string(env: &Environment) -> Result<String> {
    toml::to_string(env)
        .map_err(|e| DrenvError::ConfigError(format!("serializing environment: {e}")))
}
