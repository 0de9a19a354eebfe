//! Built-in build steps
//!
//! Each step is a [`BuildStep`](crate::BuildStep) that can be placed into a
//! [`Pipeline`](crate::Pipeline) in any order.

pub mod client;
pub mod copy_sources;
pub mod stamp_revision;

pub use client::BuildClient;
pub use copy_sources::CopySources;
pub use stamp_revision::StampRevision;
