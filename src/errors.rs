// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrenvError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Command `{command}` failed with exit code {exit_code}{}", format_stderr(.stderr))]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("[{profile}] {operation} failed: {source}")]
    DriverError {
        profile: String,
        operation: &'static str,
        #[source]
        source: Box<DrenvError>,
    },

    #[error("[{profile}] Condition not met within {}s", .timeout.as_secs())]
    ReadinessTimeout { profile: String, timeout: Duration },

    #[error("[{worker}] {} failed: {source}", .hook.display())]
    HookError {
        worker: String,
        hook: PathBuf,
        #[source]
        source: Box<DrenvError>,
    },

    #[error("{} failed: {}", .failed.len(), .failed.join(", "))]
    AggregateFailure { failed: Vec<String> },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

impl DrenvError {
    /// Wrap an error from a driver call, keeping the profile and operation.
    pub fn driver(profile: &str, operation: &'static str, source: DrenvError) -> Self {
        DrenvError::DriverError {
            profile: profile.to_string(),
            operation,
            source: Box::new(source),
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DrenvError>;
