//! pybake Core Library
//!
//! This crate provides the leaf pieces of the pybake build pipeline:
//! - Project configuration (`pybake.yaml`)
//! - Version discovery from a `__version__ = "..."` line
//! - Source-control revision probing with an `unknown` fallback
//! - The shared error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use pybake_core::{Config, RevisionProbe, resolve_version};
//!
//! let config = Config::load("./pybake.yaml")?;
//! let version = resolve_version(config.version_file())?;
//! let revision = RevisionProbe::from_config(&config).probe().await;
//! println!("{} {} ({})", config.project.name, version, revision);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod revision;
pub mod version;

pub use config::{ClientConfig, Config, ProjectConfig, RevisionConfig};
pub use error::{Error, Result};
pub use revision::{Revision, RevisionProbe};
pub use version::{Version, parse_version, resolve_version};
