//! pybake Client Staging
//!
//! This crate drives the external web client toolchain and stages its
//! output into the package tree.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌─────────┐     ┌─────────────┐
//! │ install │────▶│  build  │────▶│    stage    │
//! │  (npm)  │     │  (npm)  │     │ (wipe+copy) │
//! └─────────┘     └─────────┘     └─────────────┘
//! ```
//!
//! Staging is not safe to run concurrently against the same staging
//! directory; callers serialize invocations.
//!
//! # Example
//!
//! ```rust,ignore
//! use pybake_client::ClientStager;
//!
//! let stager = ClientStager::from_config(&config);
//! let report = stager.build_and_stage().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod stager;
pub mod toolchain;

pub use stager::{ClientStager, StageReport};
pub use toolchain::ToolchainStep;
