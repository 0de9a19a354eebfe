//! Packaging build

use anyhow::{Context, Result};
use pybake_core::Config;
use pybake_pipeline::{BuildOptions, Orchestrator};

/// Run the build command
pub async fn run(
    config_path: &str,
    with_client: bool,
    dry_run: bool,
    build_lib: Option<&str>,
) -> Result<()> {
    tracing::info!("Loading configuration from {}", config_path);
    let config = Config::load(config_path).context("Failed to load configuration")?;

    let options = BuildOptions {
        with_client,
        dry_run,
        build_lib: build_lib.map(Into::into),
    };

    let report = Orchestrator::new(config)
        .build(options)
        .await
        .context("Build failed")?;

    match &report.revision {
        Some(revision) => tracing::info!("Revision: {}", revision),
        None => tracing::info!("Revision: not stamped (dry run)"),
    }
    tracing::info!(
        "{}: {} steps, {} files copied into {}",
        report.distribution,
        report.steps.len(),
        report.copied_files,
        report.build_lib.display()
    );
    Ok(())
}
