//! Package source copying
//!
//! The standard "build python sources" behavior: every file of every
//! configured package is copied from the source tree into the build output,
//! keeping its path relative to the package directory. Byte-code caches are
//! left behind, and files generated earlier in the build are never
//! overwritten.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use pybake_core::{Error, Result};

use crate::context::{BuildContext, BuildPhase};
use crate::step::BuildStep;

/// Name of the source copying step
pub const NAME: &str = "copy_sources";

/// Copies package sources into the build output
#[derive(Debug, Default, Clone, Copy)]
pub struct CopySources;

#[async_trait]
impl BuildStep for CopySources {
    fn name(&self) -> &str {
        NAME
    }

    async fn run(&self, ctx: &mut BuildContext) -> Result<()> {
        ctx.phase = BuildPhase::DelegateStandardBuild;

        let package_dir = ctx.config.package_dir();
        let files = collect_sources(&package_dir, &ctx.config.packages())?;

        if ctx.dry_run {
            tracing::info!(
                "Dry run: would copy {} files into {}",
                files.len(),
                ctx.build_lib.display()
            );
            return Ok(());
        }

        let mut copied = 0;
        for relative in &files {
            let target = ctx.build_lib.join(relative);
            if ctx.generated.contains(&target) {
                tracing::warn!(
                    "Not overwriting generated {} with source copy",
                    relative.display()
                );
                continue;
            }
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::copy(package_dir.join(relative), &target).await?;
            tracing::debug!("Copied {}", relative.display());
            copied += 1;
        }

        tracing::info!(
            "✓ Copied {} source files into {}",
            copied,
            ctx.build_lib.display()
        );
        ctx.copied_files += copied;
        Ok(())
    }
}

/// Files under each package, relative to `package_dir`, deduplicated
pub fn collect_sources(package_dir: &Path, packages: &[String]) -> Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();

    for package in packages {
        let root = package_dir.join(package.replace('.', "/"));
        if !root.is_dir() {
            return Err(Error::ConfigInvalid {
                message: format!(
                    "package directory for '{}' does not exist: {}",
                    package,
                    root.display()
                ),
            });
        }

        for entry in WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_bytecode_cache(e))
        {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_dir() || is_bytecode(entry.path()) {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(package_dir) {
                files.insert(relative.to_path_buf());
            }
        }
    }

    Ok(files)
}

fn is_bytecode_cache(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == "__pycache__"
}

fn is_bytecode(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "pyc" || ext == "pyo")
}
