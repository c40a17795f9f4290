//! Tool Runner Module
//!
//! Executes an external tool with captured output and an optional deadline.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use super::{ToolError, ToolResult};
use crate::core::process::configure_tokio_command;

/// Captured result of a completed tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status
    pub status: ExitStatus,
    /// Standard output, lossily decoded as UTF-8
    pub stdout: String,
    /// Standard error, lossily decoded as UTF-8
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Runner for a single external tool binary
#[derive(Debug, Clone)]
pub struct ToolRunner {
    /// Display name used in logs and error messages
    name: String,
    /// Program path or bare name resolved through PATH
    program: PathBuf,
    /// Deadline for a single invocation (`None` waits indefinitely)
    timeout: Option<Duration>,
}

impl ToolRunner {
    /// Create a runner without a deadline
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            timeout: None,
        }
    }

    /// Set the per-invocation deadline
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the tool to completion and capture its output.
    ///
    /// A nonzero exit is not an error here; callers decide what a failed
    /// status means for their stage. When the deadline expires the child is
    /// killed and [`ToolError::TimedOut`] is returned.
    pub async fn run<I, S>(&self, args: I) -> ToolResult<ToolOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args);
        configure_tokio_command(&mut cmd);

        tracing::debug!(tool = %self.name, program = %self.program.display(), "Running tool");

        // Dropping the output future on timeout drops the child, which
        // kills it because of `kill_on_drop`.
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(ToolError::TimedOut {
                        tool: self.name.clone(),
                        timeout: limit,
                    })
                }
            },
            None => cmd.output().await,
        }
        .map_err(|source| ToolError::Spawn {
            tool: self.name.clone(),
            source,
        })?;

        let output = ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        tracing::debug!(tool = %self.name, status = %output.status, "Tool finished");
        Ok(output)
    }

    /// Run the tool and turn a nonzero exit into [`ToolError::Failed`]
    pub async fn run_checked<I, S>(&self, args: I) -> ToolResult<ToolOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.run(args).await?;
        if !output.success() {
            return Err(ToolError::Failed {
                tool: self.name.clone(),
                status: output.status.to_string(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}
