//! Version and revision queries

use anyhow::{Context, Result};
use pybake_core::{Config, RevisionProbe, resolve_version};

/// Print the declared version
pub async fn version(config_path: &str) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let version = resolve_version(config.version_file()).context("Version lookup failed")?;
    println!("{}", version);
    Ok(())
}

/// Print the revision a build would stamp
pub async fn revision(config_path: &str) -> Result<()> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    let revision = RevisionProbe::from_config(&config).probe().await;
    println!("{}", revision);
    Ok(())
}
