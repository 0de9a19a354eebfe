//! Revision stamping
//!
//! Writes `revision = "<id>"` into the generated module inside the build
//! output. Lookup failures become `unknown` and never fail the build.

use async_trait::async_trait;

use pybake_core::{Revision, RevisionProbe, Result};

use crate::context::{BuildContext, BuildPhase};
use crate::step::BuildStep;

/// Name of the stamping step
pub const NAME: &str = "stamp_revision";

/// Looks up the revision and writes the generated revision module
#[derive(Debug, Default, Clone, Copy)]
pub struct StampRevision;

/// Contents of the generated revision module
pub fn render(revision: &Revision) -> String {
    format!("revision = \"{}\"", revision)
}

#[async_trait]
impl BuildStep for StampRevision {
    fn name(&self) -> &str {
        NAME
    }

    async fn run(&self, ctx: &mut BuildContext) -> Result<()> {
        if ctx.dry_run {
            tracing::info!("Dry run: not writing {}", ctx.revision_file().display());
            return Ok(());
        }

        ctx.phase = BuildPhase::ProbeRevision;
        let revision = RevisionProbe::from_config(&ctx.config).probe().await;

        ctx.phase = BuildPhase::WriteRevisionFile;
        let dest = ctx.revision_file();
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, render(&revision)).await?;
        tracing::info!("Baked revision {} into {}", revision, dest.display());

        ctx.generated.push(dest);
        ctx.revision = Some(revision);
        Ok(())
    }
}
