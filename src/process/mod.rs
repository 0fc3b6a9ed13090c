// Subprocess execution
//
// Everything that crosses the process boundary goes through ProcessRunner:
// - Command: a ProcessCommand describing one invocation
// - Runner: the tokio-backed implementation with timeout and cancellation
// - Cancel: a token/handle pair that aborts a running child
//
// Tests substitute their own ProcessRunner to script stdout/stderr.

pub mod cancel;
pub mod command;
pub mod runner;

use async_trait::async_trait;

pub use cancel::{CancellationHandle, CancellationToken};
pub use command::ProcessCommand;
pub use runner::TokioProcessRunner;

use crate::error::Result;

/// Everything a terminated process wrote, decoded as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn new<S1: Into<String>, S2: Into<String>>(stdout: S1, stderr: S2) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn stdout<S: Into<String>>(stdout: S) -> Self {
        Self::new(stdout, "")
    }

    pub fn stderr<S: Into<String>>(stderr: S) -> Self {
        Self::new("", stderr)
    }
}

/// Main trait for running external programs
///
/// Implementations resolve whenever the process terminates, whatever its
/// exit status. Only a failure to start the program (or a timeout or
/// cancellation) is an error; callers classify the captured output.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput>;
}
