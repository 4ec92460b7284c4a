use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::error::SigvivalError;
use crate::pipeline::Stage;

/// Checks the request against the reference universes before any
/// expression data is read.
pub struct Stage1Reference;

impl Stage1Reference {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Reference {
    fn name(&self) -> &'static str {
        "stage1_reference"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for cohort in &ctx.request.cohorts {
            if !ctx.reference.has_cohort(cohort) {
                return Err(
                    SigvivalError::cohort_not_found(cohort, "not in the cohort universe").into(),
                );
            }
        }
        let warnings = ctx.reference.warnings.clone();
        for w in warnings {
            ctx.warn(w);
        }
        info!(
            cohorts = ctx.request.cohorts.len(),
            registry = ctx.reference.samples.len(),
            "request_matches_reference"
        );
        Ok(())
    }
}
