use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;

use crate::command::CommandArgs;
use crate::error::RunError;

/// What a finished jj invocation reported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// stdout followed by stderr
    pub output: String,
    pub success: bool,
}

impl CommandOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: false,
        }
    }
}

/// Capability to run jj. The UI only ever talks to jj through this trait, so
/// tests can hand in a scripted implementation.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run to completion, capturing the output
    async fn run(&self, args: &CommandArgs) -> Result<CommandOutput, RunError>;

    /// Process to hand the terminal to, e.g. for an editor or a pager
    fn interactive(&self, args: &CommandArgs) -> std::process::Command;
}

/// Runs the real `jj` binary inside a repository
#[derive(Debug, Clone)]
pub struct JjRunner {
    location: PathBuf,
    program: String,
}

impl JjRunner {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self::with_program(location, "jj")
    }

    pub fn with_program(location: impl Into<PathBuf>, program: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            program: program.into(),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}

#[async_trait]
impl Runner for JjRunner {
    async fn run(&self, args: &CommandArgs) -> Result<CommandOutput, RunError> {
        tracing::debug!(command = %args, "running");

        let output = tokio::process::Command::new(&self.program)
            .args(args.iter())
            .current_dir(&self.location)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RunError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        let success = output.status.success();
        if !success {
            tracing::warn!(command = %args, status = ?output.status.code(), "command failed");
        }
        Ok(CommandOutput {
            output: text,
            success,
        })
    }

    fn interactive(&self, args: &CommandArgs) -> std::process::Command {
        let mut command = std::process::Command::new(&self.program);
        command.args(args.iter()).current_dir(&self.location);
        command
    }
}
