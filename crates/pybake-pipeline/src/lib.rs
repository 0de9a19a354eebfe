//! pybake Pipeline
//!
//! This crate composes the build: an ordered list of named steps, each run
//! against one shared [`BuildContext`].
//!
//! # Standard build
//!
//! ```text
//! ┌─────────┐     ┌────────────────┐     ┌──────────────┐     ┌──────┐
//! │ version │────▶│ stamp_revision │────▶│ copy_sources │────▶│ done │
//! └─────────┘     └────────────────┘     └──────────────┘     └──────┘
//! ```
//!
//! With `with_client`, a `build_client` step runs first.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pybake_pipeline::{BuildOptions, Orchestrator};
//!
//! let orchestrator = Orchestrator::new(config);
//! let report = orchestrator.build(BuildOptions::default()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod orchestrator;
pub mod pipeline;
pub mod step;
pub mod steps;

pub use context::{BuildContext, BuildPhase};
pub use orchestrator::{BuildOptions, BuildReport, Orchestrator};
pub use pipeline::Pipeline;
pub use step::BuildStep;
