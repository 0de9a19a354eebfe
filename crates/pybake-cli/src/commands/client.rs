//! Web client commands

use anyhow::{Context, Result};
use pybake_core::Config;
use pybake_pipeline::Orchestrator;

/// Build the web client, then stage it
pub async fn build(config_path: &str) -> Result<()> {
    tracing::info!("Loading configuration from {}", config_path);
    let config = Config::load(config_path).context("Failed to load configuration")?;

    let report = Orchestrator::new(config)
        .build_client()
        .await
        .context("build-client failed")?;

    tracing::info!(
        "✓ Client built and staged at {} ({} files)",
        report.destination.display(),
        report.files
    );
    Ok(())
}

/// Stage an existing web client build
pub async fn copy(config_path: &str) -> Result<()> {
    tracing::info!("Loading configuration from {}", config_path);
    let config = Config::load(config_path).context("Failed to load configuration")?;

    let report = Orchestrator::new(config)
        .copy_client()
        .context("copy-client failed")?;

    tracing::info!(
        "✓ Client staged at {} ({} files)",
        report.destination.display(),
        report.files
    );
    Ok(())
}
