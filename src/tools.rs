// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Running external identification tools under a deadline

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Why a tool run did not succeed
///
/// The `Display` text is what ends up inside the identification result, so
/// keep it short and self-explanatory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("{program}: executable file not found")]
    NotFound { program: String },

    #[error("{program}: failed to start: {message}")]
    Spawn { program: String, message: String },

    #[error("{program}: {message}")]
    Io { program: String, message: String },

    #[error("{program}: {status}")]
    Failed { program: String, status: String },

    #[error("{program}: deadline exceeded")]
    TimedOut { program: String },
}

/// Captured output of one tool run
///
/// `output` holds what the tool printed on stdout, even when `error` is set.
/// Stderr is only logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub output: String,
    pub error: Option<ToolError>,
}

impl ToolOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self { output: output.into(), error: None }
    }

    pub fn failed(error: ToolError) -> Self {
        Self { output: String::new(), error: Some(error) }
    }
}

/// Capability to run an external tool against a file
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run `program` with `args` followed by `path`, giving up at `deadline`
    async fn run(&self, program: &str, args: &[&str], path: &Path, deadline: Instant) -> ToolOutput;
}

/// Runs tools as child processes via tokio
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRunner for SubprocessRunner {
    async fn run(&self, program: &str, args: &[&str], path: &Path, deadline: Instant) -> ToolOutput {
        debug!("Running {} {:?} {:?}", program, args, path);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return ToolOutput::failed(ToolError::NotFound { program: program.to_string() });
            }
            Err(e) => {
                return ToolOutput::failed(ToolError::Spawn {
                    program: program.to_string(),
                    message: e.to_string(),
                });
            }
        };

        // Dropping the wait future on timeout drops the child, which kills it.
        match tokio::time::timeout_at(deadline, child.wait_with_output()).await {
            Ok(Ok(out)) => {
                let output = String::from_utf8_lossy(&out.stdout).into_owned();
                if !out.stderr.is_empty() {
                    debug!("{} stderr: {}", program, String::from_utf8_lossy(&out.stderr).trim_end());
                }

                let error = if out.status.success() {
                    None
                } else {
                    Some(ToolError::Failed {
                        program: program.to_string(),
                        status: out.status.to_string(),
                    })
                };
                ToolOutput { output, error }
            }
            Ok(Err(e)) => ToolOutput::failed(ToolError::Io {
                program: program.to_string(),
                message: e.to_string(),
            }),
            Err(_) => {
                warn!("{} did not finish before the deadline, killed", program);
                ToolOutput::failed(ToolError::TimedOut { program: program.to_string() })
            }
        }
    }
}
