//! Top-level build driver
//!
//! The version is resolved before anything else runs; without it there is no
//! distribution identity and the build stops. Client building and staging
//! are also exposed as independent entry points.

use std::path::PathBuf;

use pybake_client::{ClientStager, StageReport};
use pybake_core::{Config, Result, Revision, Version, resolve_version};

use crate::context::BuildContext;
use crate::pipeline::Pipeline;

/// Options for a packaging build
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Build and stage the web client first
    pub with_client: bool,

    /// Skip every write
    pub dry_run: bool,

    /// Build output directory; relative paths are taken from the project root
    pub build_lib: Option<PathBuf>,
}

/// Outcome of a packaging build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// `<name>-<version>`
    pub distribution: String,

    /// Resolved version
    pub version: Version,

    /// Stamped revision; `None` in dry-run mode
    pub revision: Option<Revision>,

    /// Build output directory
    pub build_lib: PathBuf,

    /// Steps that ran, in order
    pub steps: Vec<String>,

    /// Files generated into the build output
    pub generated: Vec<PathBuf>,

    /// Source files copied into the build output
    pub copied_files: usize,
}

/// Drives builds for one project
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: Config,
}

impl Orchestrator {
    /// Create an orchestrator for a loaded project
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Project configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the declared version; fatal when missing
    pub fn resolve_version(&self) -> Result<Version> {
        resolve_version(self.config.version_file())
    }

    /// Run a packaging build
    pub async fn build(&self, options: BuildOptions) -> Result<BuildReport> {
        let version = self.resolve_version()?;

        let mut ctx =
            BuildContext::new(self.config.clone(), version).with_dry_run(options.dry_run);
        if let Some(build_lib) = options.build_lib {
            ctx = ctx.with_build_lib(self.config.base_path.join(build_lib));
        }

        let pipeline = if options.with_client {
            Pipeline::with_client()
        } else {
            Pipeline::standard()
        };

        tracing::info!(
            "Building {} into {} ({})",
            ctx.distribution_name(),
            ctx.build_lib.display(),
            pipeline.step_names().join(" → ")
        );
        pipeline.run(&mut ctx).await?;
        tracing::info!("✓ Built {}", ctx.distribution_name());

        Ok(BuildReport {
            distribution: ctx.distribution_name(),
            version: ctx.version,
            revision: ctx.revision,
            build_lib: ctx.build_lib,
            steps: ctx.completed,
            generated: ctx.generated,
            copied_files: ctx.copied_files,
        })
    }

    /// Build the web client and stage its output
    pub async fn build_client(&self) -> Result<StageReport> {
        ClientStager::from_config(&self.config)
            .build_and_stage()
            .await
    }

    /// Stage an existing web client build
    pub fn copy_client(&self) -> Result<StageReport> {
        ClientStager::from_config(&self.config).stage_only()
    }
}
