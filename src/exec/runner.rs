// src/exec/runner.rs

//! Pluggable command runner abstraction.

use std::fmt;

use crate::errors::Result;

use super::BoxFuture;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of [`CommandRunner::output`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait abstracting how external commands are executed.
///
/// Production code uses [`super::ProcessRunner`]; tests provide their own
/// implementation that records invocations instead of spawning processes.
pub trait CommandRunner: Send + Sync {
    /// Run `cmd` to completion, logging each output line tagged with `name`.
    ///
    /// A non-zero exit status is returned as `DrenvError::CommandFailed`
    /// carrying the exit code and the tail of stderr.
    fn run<'a>(&'a self, name: &'a str, cmd: &'a CommandLine) -> BoxFuture<'a, Result<()>>;

    /// Run `cmd` and capture its output.
    ///
    /// A non-zero exit status is *not* an error here; callers that query
    /// state (e.g. `minikube status`) need stdout either way.
    fn output<'a>(&'a self, cmd: &'a CommandLine) -> BoxFuture<'a, Result<CommandOutput>>;
}
