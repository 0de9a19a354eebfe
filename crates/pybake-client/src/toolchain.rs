//! External toolchain invocation
//!
//! Runs one package-manager command to completion. Output is inherited so
//! the toolchain's own progress reaches the terminal.

use std::path::Path;
use tokio::process::Command;

use pybake_core::{Error, Result};

/// One toolchain command bound to the step that runs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainStep {
    /// Step name used in logs and errors
    pub name: String,

    /// Program followed by its arguments
    pub argv: Vec<String>,
}

impl ToolchainStep {
    /// Create a step from a command vector
    pub fn new(name: impl Into<String>, argv: Vec<String>) -> Self {
        Self {
            name: name.into(),
            argv,
        }
    }

    /// The command as a single display string
    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }

    /// Run the command in `cwd` and wait for it
    ///
    /// A spawn failure or a non-zero exit is an [`Error::ExternalToolFailure`].
    pub async fn run(&self, cwd: &Path) -> Result<()> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| self.failure("empty command"))?;

        tracing::info!(
            "Running {}: {} (in {})",
            self.name,
            self.command_line(),
            cwd.display()
        );

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .await
            .map_err(|e| self.failure(format!("failed to start {program}: {e}")))?;

        if !status.success() {
            return Err(self.failure(status.to_string()));
        }

        tracing::debug!("{} finished", self.name);
        Ok(())
    }

    fn failure(&self, message: impl Into<String>) -> Error {
        Error::ExternalToolFailure {
            step: self.name.clone(),
            command: self.command_line(),
            message: message.into(),
        }
    }
}
