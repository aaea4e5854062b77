// src/exec/process.rs

//! Runs commands as OS processes.

use std::collections::VecDeque;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::errors::{DrenvError, Result};

use super::runner::{CommandLine, CommandOutput, CommandRunner};
use super::BoxFuture;

/// Number of stderr lines kept for the error of a failed command.
const STDERR_TAIL_LINES: usize = 20;

/// Real command runner used in production.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(&'a self, name: &'a str, cmd: &'a CommandLine) -> BoxFuture<'a, Result<()>> {
        Box::pin(run_streaming(name, cmd))
    }

    fn output<'a>(&'a self, cmd: &'a CommandLine) -> BoxFuture<'a, Result<CommandOutput>> {
        Box::pin(async move {
            debug!(command = %cmd, "running command");

            let output = Command::new(&cmd.program)
                .args(&cmd.args)
                .stdin(Stdio::null())
                .output()
                .await
                .with_context(|| format!("running `{cmd}`"))?;

            Ok(CommandOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }
}

/// Spawn `cmd`, log stdout/stderr line by line at debug level, and wait for
/// it to exit.
async fn run_streaming(name: &str, cmd: &CommandLine) -> Result<()> {
    debug!(name, command = %cmd, "starting process");

    let mut child = Command::new(&cmd.program)
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawning `{cmd}`"))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Consume stderr concurrently so neither pipe fills up; keep its tail for
    // the error report.
    let stderr_task = {
        let name = name.to_string();
        tokio::spawn(async move {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).split(b'\n');
                while let Ok(Some(bytes)) = lines.next_segment().await {
                    let line = decode_line(&bytes);
                    debug!(name = %name, "{}", line);
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
            }
            tail
        })
    };

    if let Some(stdout) = stdout {
        let mut lines = BufReader::new(stdout).split(b'\n');
        while let Ok(Some(bytes)) = lines.next_segment().await {
            debug!(name, "{}", decode_line(&bytes));
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for `{cmd}`"))?;

    let tail = stderr_task.await.unwrap_or_default();

    if status.success() {
        return Ok(());
    }

    Err(DrenvError::CommandFailed {
        command: cmd.to_string(),
        exit_code: status.code().unwrap_or(-1),
        stderr: tail.into_iter().collect::<Vec<_>>().join("\n"),
    })
}

/// Decode one output line, replacing invalid UTF-8.
fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
