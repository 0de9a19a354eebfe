//! Client artifact staging
//!
//! Builds the web client with its own toolchain and copies the bundle into
//! the package tree. The staging directory is wiped and recreated before
//! every copy so nothing from an earlier build survives.
//!
//! Order inside [`ClientStager::stage_only`]: wipe, recreate, then check the
//! build output. A missing build output therefore leaves an empty staging
//! directory behind.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use pybake_core::{Config, Error, Result};

use crate::toolchain::ToolchainStep;

/// Summary of one staging run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Directory the assets were copied into
    pub destination: PathBuf,

    /// Number of files copied
    pub files: usize,

    /// Total bytes copied
    pub bytes: u64,
}

/// Builds and stages the web client
#[derive(Debug, Clone)]
pub struct ClientStager {
    client_dir: PathBuf,
    build_output: PathBuf,
    staging_dir: PathBuf,
    install: ToolchainStep,
    build: ToolchainStep,
}

impl ClientStager {
    /// Create a stager with the default npm commands
    ///
    /// The build output defaults to `<client_dir>/build`.
    pub fn new(client_dir: impl AsRef<Path>, staging_dir: impl AsRef<Path>) -> Self {
        let client_dir = client_dir.as_ref().to_path_buf();
        Self {
            build_output: client_dir.join("build"),
            client_dir,
            staging_dir: staging_dir.as_ref().to_path_buf(),
            install: ToolchainStep::new("install", vec!["npm".into(), "install".into()]),
            build: ToolchainStep::new(
                "build",
                vec!["npm".into(), "run-script".into(), "build".into()],
            ),
        }
    }

    /// Create a stager from project configuration
    pub fn from_config(config: &Config) -> Self {
        let client = &config.project.client;
        Self::new(config.client_dir(), config.staging_dir())
            .with_build_output(config.client_build_output())
            .with_install(client.install.clone())
            .with_build(client.build.clone())
    }

    /// Override the toolchain output directory
    pub fn with_build_output(mut self, path: impl AsRef<Path>) -> Self {
        self.build_output = path.as_ref().to_path_buf();
        self
    }

    /// Override the dependency install command
    pub fn with_install(mut self, argv: Vec<String>) -> Self {
        self.install = ToolchainStep::new("install", argv);
        self
    }

    /// Override the build script command
    pub fn with_build(mut self, argv: Vec<String>) -> Self {
        self.build = ToolchainStep::new("build", argv);
        self
    }

    /// Directory the assets are staged into
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Directory the toolchain writes its bundle to
    pub fn build_output(&self) -> &Path {
        &self.build_output
    }

    /// Install dependencies, run the build script, then stage the output
    ///
    /// A failing toolchain step aborts before the staging directory is
    /// touched.
    pub async fn build_and_stage(&self) -> Result<StageReport> {
        tracing::info!("Building web client in {}", self.client_dir.display());

        for step in [&self.install, &self.build] {
            step.run(&self.client_dir).await?;
        }

        self.stage_only()
    }

    /// Replace the staging directory with a copy of the build output
    pub fn stage_only(&self) -> Result<StageReport> {
        let dest = &self.staging_dir;

        remove_existing(dest)?;

        tracing::debug!("Creating output directory: {}", dest.display());
        std::fs::create_dir_all(dest).map_err(|e| Error::staging(dest, e))?;

        if !self.build_output.is_dir() {
            return Err(Error::MissingBuildOutput {
                path: self.build_output.clone(),
            });
        }

        tracing::info!(
            "Copying client: {} -> {}",
            self.build_output.display(),
            dest.display()
        );
        let report = copy_tree(&self.build_output, dest)?;

        tracing::info!(
            "✓ Staged {} files ({} bytes) into {}",
            report.files,
            report.bytes,
            dest.display()
        );
        Ok(report)
    }
}

/// Remove whatever occupies `path`: a directory tree, a file or a link
fn remove_existing(path: &Path) -> Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::staging(path, e)),
    };

    tracing::info!("Removing previous client assets: {}", path.display());
    let removed = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    removed.map_err(|e| Error::staging(path, e))
}

/// Recursively copy the contents of `src` into the existing `dest`
///
/// Symbolic links are followed, so linked directories are copied as
/// directories and linked files as files.
fn copy_tree(src: &Path, dest: &Path) -> Result<StageReport> {
    let mut report = StageReport {
        destination: dest.to_path_buf(),
        ..Default::default()
    };

    for entry in WalkDir::new(src)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            Error::staging(path, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::staging(entry.path(), std::io::Error::other(e)))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| Error::staging(&target, e))?;
        } else {
            let bytes =
                std::fs::copy(entry.path(), &target).map_err(|e| Error::staging(&target, e))?;
            tracing::debug!("Copied {}", relative.display());
            report.files += 1;
            report.bytes += bytes;
        }
    }

    Ok(report)
}
