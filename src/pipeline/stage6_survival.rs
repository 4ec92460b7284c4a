use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::survival::{HazardRatio, KmFigure, compare_groups};

pub struct Stage6Survival;

impl Stage6Survival {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Survival {
    fn name(&self) -> &'static str {
        "stage6_survival"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let groups = ctx.groups.as_ref().context("group assignment missing")?;
        let reference = &ctx.reference;
        let result = compare_groups(
            &ctx.request.signature.name,
            groups,
            |sample| reference.survival_of(sample),
            &ctx.config.survival,
        )?;

        if result.excluded > 0 {
            ctx.warn(format!(
                "{} grouped samples had no survival record and were excluded",
                result.excluded
            ));
        }
        if result.log_rank.p_value.is_none() {
            ctx.warn("log-rank p-value unavailable (no events or singular covariance)");
        }
        if let HazardRatio::Unavailable { reason } = &result.hazard_ratio {
            ctx.warn(format!("hazard ratio unavailable: {}", reason));
        }

        ctx.figure = Some(KmFigure::from_comparison(&result));
        ctx.comparison = Some(result);
        Ok(())
    }
}
