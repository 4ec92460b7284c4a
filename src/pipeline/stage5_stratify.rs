use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::strata::stratify;

pub struct Stage5Stratify;

impl Stage5Stratify {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Stratify {
    fn name(&self) -> &'static str {
        "stage5_stratify"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let scores = ctx.scores.as_ref().context("score table missing")?;
        let groups = stratify(scores, ctx.request.cut_point)?;
        if groups.dropped_invalid > 0 {
            ctx.warn(format!(
                "{} samples without a finite score left unassigned",
                groups.dropped_invalid
            ));
        }
        ctx.groups = Some(groups);
        Ok(())
    }
}
