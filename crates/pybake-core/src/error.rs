//! Error types for pybake-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pybake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a package
#[derive(Error, Debug)]
pub enum Error {
    /// No `__version__` line in the version-bearing source file
    #[error("unable to find version string in {path}")]
    VersionNotFound {
        /// File that was searched
        path: String,
    },

    /// An external program could not be run or exited unsuccessfully
    #[error("{step} failed running `{command}`: {message}")]
    ExternalToolFailure {
        /// Build step that invoked the program
        step: String,
        /// Command line that was run
        command: String,
        /// Exit status or spawn error
        message: String,
    },

    /// Client build output is missing, so there is nothing to stage
    #[error("client build output not found at {path}; run `pybake build-client` first")]
    MissingBuildOutput {
        /// Expected build output directory
        path: PathBuf,
    },

    /// Wiping, recreating or populating the staging directory failed
    #[error("staging failed at {path}: {source}")]
    DirectoryStagingFailure {
        /// Path being removed, created or written
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// A pipeline step failed
    #[error("build step '{step}' failed: {source}")]
    StepFailed {
        /// Name of the failing step
        step: String,
        /// Error raised by the step
        #[source]
        source: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an IO error raised while touching the staging directory
    pub fn staging(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::DirectoryStagingFailure {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came out of the external client toolchain
    pub fn is_tool_failure(&self) -> bool {
        match self {
            Error::ExternalToolFailure { .. } => true,
            Error::StepFailed { source, .. } => source.is_tool_failure(),
            _ => false,
        }
    }
}
