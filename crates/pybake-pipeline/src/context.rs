//! Shared state for one build invocation

use std::path::PathBuf;

use pybake_core::{Config, Revision, Version};

/// Where a build invocation currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// Nothing has run yet
    Init,
    /// Client toolchain and staging
    ClientBuild,
    /// Asking source control for the revision
    ProbeRevision,
    /// Writing the generated revision module
    WriteRevisionFile,
    /// Copying package sources into the build output
    DelegateStandardBuild,
    /// Every step finished
    Done,
}

/// Everything the steps of one build read and write
#[derive(Debug)]
pub struct BuildContext {
    /// Project configuration
    pub config: Config,

    /// Version resolved before any step ran
    pub version: Version,

    /// Intermediate build output directory
    pub build_lib: PathBuf,

    /// Log what would happen without writing anything
    pub dry_run: bool,

    /// Revision found by the stamping step
    pub revision: Option<Revision>,

    /// Current phase
    pub phase: BuildPhase,

    /// Names of steps that finished, in order
    pub completed: Vec<String>,

    /// Files generated (not copied) into the build output
    pub generated: Vec<PathBuf>,

    /// Number of source files copied into the build output
    pub copied_files: usize,
}

impl BuildContext {
    /// Fresh context writing to the configured build directory
    pub fn new(config: Config, version: Version) -> Self {
        Self {
            build_lib: config.build_lib(),
            config,
            version,
            dry_run: false,
            revision: None,
            phase: BuildPhase::Init,
            completed: Vec::new(),
            generated: Vec::new(),
            copied_files: 0,
        }
    }

    /// Write to another build directory
    pub fn with_build_lib(mut self, build_lib: impl Into<PathBuf>) -> Self {
        self.build_lib = build_lib.into();
        self
    }

    /// Toggle dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// `<name>-<version>`
    pub fn distribution_name(&self) -> String {
        format!("{}-{}", self.config.project.name, self.version)
    }

    /// Absolute path of the generated revision module
    pub fn revision_file(&self) -> PathBuf {
        self.build_lib.join(self.config.revision_module())
    }
}
