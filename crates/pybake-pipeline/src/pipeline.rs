//! Ordered step composition
//!
//! A [`Pipeline`] runs its steps one after another against a single
//! [`BuildContext`]. The first failing step stops the build, and its error
//! is wrapped in [`Error::StepFailed`] so the message names the step.

use std::fmt;

use pybake_core::{Error, Result};

use crate::context::{BuildContext, BuildPhase};
use crate::step::BuildStep;
use crate::steps::{BuildClient, CopySources, StampRevision, copy_sources};

/// Ordered list of build steps
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Box<dyn BuildStep>>,
}

impl Pipeline {
    /// An empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the revision, then copy sources
    pub fn standard() -> Self {
        Self::new()
            .push(CopySources)
            .insert_before(copy_sources::NAME, StampRevision)
    }

    /// Build and stage the client, then run the standard build
    pub fn with_client() -> Self {
        let mut pipeline = Self::standard();
        pipeline.steps.insert(0, Box::new(BuildClient));
        pipeline
    }

    /// Append a step
    pub fn push(mut self, step: impl BuildStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Insert a step ahead of the step called `name`
    ///
    /// Appends when no step has that name.
    pub fn insert_before(mut self, name: &str, step: impl BuildStep + 'static) -> Self {
        let index = self
            .steps
            .iter()
            .position(|s| s.name() == name)
            .unwrap_or(self.steps.len());
        self.steps.insert(index, Box::new(step));
        self
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order
    pub async fn run(&self, ctx: &mut BuildContext) -> Result<()> {
        for step in &self.steps {
            let name = step.name();
            tracing::info!("Running step {}", name);

            step.run(ctx).await.map_err(|e| Error::StepFailed {
                step: name.to_string(),
                source: Box::new(e),
            })?;

            ctx.completed.push(name.to_string());
        }

        ctx.phase = BuildPhase::Done;
        Ok(())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}
