//! CLI command implementations

pub mod build;
pub mod client;
pub mod info;
