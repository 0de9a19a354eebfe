//! Build step trait

use async_trait::async_trait;

use pybake_core::Result;

use crate::context::BuildContext;

/// A named unit of work in a [`Pipeline`](crate::Pipeline)
#[async_trait]
pub trait BuildStep: Send + Sync {
    /// Name used for ordering, logs and errors
    fn name(&self) -> &str;

    /// Run against the shared context
    async fn run(&self, ctx: &mut BuildContext) -> Result<()>;
}
