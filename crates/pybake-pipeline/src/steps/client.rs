//! Client build step

use async_trait::async_trait;

use pybake_client::ClientStager;
use pybake_core::Result;

use crate::context::{BuildContext, BuildPhase};
use crate::step::BuildStep;

/// Name of the client build step
pub const NAME: &str = "build_client";

/// Builds the web client and stages it into the package tree
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildClient;

#[async_trait]
impl BuildStep for BuildClient {
    fn name(&self) -> &str {
        NAME
    }

    async fn run(&self, ctx: &mut BuildContext) -> Result<()> {
        ctx.phase = BuildPhase::ClientBuild;
        let stager = ClientStager::from_config(&ctx.config);

        if ctx.dry_run {
            tracing::info!(
                "Dry run: would build the client and stage it into {}",
                stager.staging_dir().display()
            );
            return Ok(());
        }

        stager.build_and_stage().await?;
        Ok(())
    }
}
