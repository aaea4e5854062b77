// src/exec/mod.rs

//! Process execution layer.
//!
//! Everything the engine runs (driver calls, condition queries, hooks) goes
//! through a [`CommandRunner`], which makes it easy to swap in a recording
//! runner in tests while keeping the production implementation in
//! [`process`].
//!
//! - [`runner`] defines the `CommandRunner` trait and the command/output types.
//! - [`process`] runs real OS processes with `tokio::process::Command`,
//!   streaming their output into the log line by line.

use std::future::Future;
use std::pin::Pin;

pub mod process;
pub mod runner;

pub use process::ProcessRunner;
pub use runner::{CommandLine, CommandOutput, CommandRunner};

/// Boxed, sendable future returned by the object-safe traits of this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
