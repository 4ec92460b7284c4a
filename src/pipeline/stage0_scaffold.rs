use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::error::SigvivalError;
use crate::pipeline::Stage;

pub struct Stage0Scaffold;

impl Stage0Scaffold {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage0Scaffold {
    fn name(&self) -> &'static str {
        "stage0_scaffold"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.request.validate()?;

        // Nothing is created here; export writes only after every stage succeeded.
        if ctx.export {
            let out_dir = &ctx.output.out_dir;
            if out_dir.exists() && !out_dir.is_dir() {
                return Err(SigvivalError::write_error(
                    out_dir.display().to_string(),
                    "output location exists and is not a directory",
                )
                .into());
            }
        }

        info!(
            signature = %ctx.request.signature.name,
            genes = ctx.request.signature.genes.len(),
            cohorts = ctx.request.cohorts.len(),
            cut_point = %ctx.request.cut_point,
            threads = ctx.threads,
            "request_accepted"
        );
        Ok(())
    }
}
