use anyhow::Result;

use crate::ctx::Ctx;
use crate::expr::assemble_cohorts;
use crate::pipeline::Stage;

pub struct Stage2Assemble;

impl Stage2Assemble {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Assemble {
    fn name(&self) -> &'static str {
        "stage2_assemble"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let (matrix, stats) = assemble_cohorts(&ctx.reference, &ctx.request.cohorts)?;
        for w in stats.warnings() {
            ctx.warn(w);
        }
        ctx.matrix = Some(matrix);
        ctx.assemble_stats = Some(stats);
        Ok(())
    }
}
