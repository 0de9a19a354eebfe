//! Source-control revision probing
//!
//! Asks git for the HEAD commit. Any failure degrades to
//! [`Revision::Unknown`]: a build without provenance beats no build.

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::config::Config;

/// Text written for a revision that could not be determined
pub const UNKNOWN_REVISION: &str = "unknown";

/// Revision the build was made from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    /// Commit identifier reported by git
    Commit(String),
    /// Not a checkout, or git was unavailable
    Unknown,
}

impl Revision {
    /// Identifier text, `unknown` for the sentinel
    pub fn as_str(&self) -> &str {
        match self {
            Revision::Commit(id) => id,
            Revision::Unknown => UNKNOWN_REVISION,
        }
    }

    /// Whether a real commit was found
    pub fn is_known(&self) -> bool {
        matches!(self, Revision::Commit(_))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the current commit of a project checkout
#[derive(Debug, Clone)]
pub struct RevisionProbe {
    project_root: PathBuf,
    tool: String,
}

impl RevisionProbe {
    /// Look up revisions of `project_root` with `git`
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
            tool: "git".to_string(),
        }
    }

    /// Use the configured project root and git executable
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_path).with_tool(&config.project.revision.tool)
    }

    /// Use another git executable (a name on `PATH` or a path)
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    /// Directory the tool runs in
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Look up HEAD; never fails
    pub async fn probe(&self) -> Revision {
        let output = Command::new(&self.tool)
            .args(["rev-parse", "HEAD"])
            .current_dir(&self.project_root)
            .output()
            .await;

        let output = match output {
            Ok(o) => o,
            Err(e) => {
                tracing::warn!("Could not run {}: {}; revision is unknown", self.tool, e);
                return Revision::Unknown;
            }
        };

        if !output.status.success() {
            tracing::warn!(
                "{} rev-parse HEAD failed in {} ({}); revision is unknown",
                self.tool,
                self.project_root.display(),
                output.status
            );
            return Revision::Unknown;
        }

        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if id.is_empty() {
            tracing::warn!("{} reported an empty revision", self.tool);
            return Revision::Unknown;
        }

        tracing::debug!("Resolved revision {}", id);
        Revision::Commit(id)
    }
}
