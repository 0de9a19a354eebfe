//! Version discovery
//!
//! Finds the first `__version__ = "..."` line in a source file. There is no
//! fallback: a file without one fails the whole build.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

static VERSION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^__version__ = ['"]([^'"]*)['"]"#).expect("version pattern is valid")
});

/// Declared version of the package
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// The version text exactly as declared
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read `path` and extract its declared version
pub fn resolve_version(path: impl AsRef<Path>) -> Result<Version> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let version = parse_version(&contents, &path.display().to_string())?;
    tracing::debug!("Resolved version {} from {}", version, path.display());
    Ok(version)
}

/// Extract the declared version from source text
///
/// `origin` names the source in the error when nothing matches.
pub fn parse_version(contents: &str, origin: &str) -> Result<Version> {
    VERSION_LINE
        .captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|m| Version(m.as_str().to_string()))
        .ok_or_else(|| Error::VersionNotFound {
            path: origin.to_string(),
        })
}
