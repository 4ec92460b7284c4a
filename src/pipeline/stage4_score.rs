use anyhow::{Context, Result};
use tracing::debug;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::{SsgseaParams, score_signature};

pub struct Stage4Score;

impl Stage4Score {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Score {
    fn name(&self) -> &'static str {
        "stage4_score"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let signature = ctx.signature.as_ref().context("resolved signature missing")?;
        let matrix = ctx.matrix.as_ref().context("expression matrix missing")?;
        let params = SsgseaParams::from(&ctx.config.scoring);
        let table = score_signature(matrix, signature, &params, ctx.threads, &ctx.cancel)?;

        // only the score table is needed from here on
        ctx.matrix = None;
        debug!("expression matrix released");

        ctx.scores = Some(table);
        Ok(())
    }
}
