use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{CancellationToken, ProcessCommand, ProcessOutput, ProcessRunner};
use crate::error::{Result, BridgeError};

/// Runs programs with `tokio::process`, capturing stdout and stderr in full
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    cancellation: Option<CancellationToken>,
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill any running child once the token fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    async fn wait_for_cancellation(&self) {
        match &self.cancellation {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
        let program = command.program_name();
        if self.cancellation.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(BridgeError::Cancelled(command.description.clone()));
        }

        debug!("Executing {}: {} {:?}", command.description, program, command.args);

        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BridgeError::Launch {
                program: program.clone(),
                source,
            })?;

        // Dropping the wait future drops the child, which kills it.
        let wait = child.wait_with_output();
        let budget = async {
            match command.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending().await,
            }
        };

        let output = tokio::select! {
            output = wait => output?,
            _ = budget => {
                warn!("{} timed out, killing {}", command.description, program);
                return Err(BridgeError::Timeout {
                    program,
                    timeout: command.timeout.unwrap_or_default(),
                });
            }
            _ = self.wait_for_cancellation() => {
                warn!("{} cancelled, killing {}", command.description, program);
                return Err(BridgeError::Cancelled(command.description.clone()));
            }
        };

        debug!(
            "{} exited with {} ({} bytes stdout, {} bytes stderr)",
            command.description,
            output.status,
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
