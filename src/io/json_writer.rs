use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::error::SigvivalError;
use crate::schema::v1::{
    GroupSummary, HazardSummary, InputSummary, LogRankSummary, Outputs, RequestEcho,
    SCHEMA_VERSION, SigvivalV1,
};
use crate::survival::HazardRatio;

pub fn build_report(ctx: &Ctx) -> Result<SigvivalV1> {
    let scores = ctx.scores.as_ref().context("score table missing")?;
    let signature = ctx.signature.as_ref().context("resolved signature missing")?;
    let groups = ctx.groups.as_ref().context("group assignment missing")?;
    let comparison = ctx.comparison.as_ref().context("comparison result missing")?;

    let mean_by_position: Vec<(usize, Option<f64>)> = groups
        .group_sizes()
        .into_iter()
        .map(|g| (g.position, g.mean_score))
        .collect();
    let stratification = comparison
        .groups
        .iter()
        .map(|g| GroupSummary {
            label: g.label.to_string(),
            display: g.display.clone(),
            position: g.position as u64,
            size: g.size as u64,
            events: g.events as u64,
            mean_nes: mean_by_position
                .iter()
                .find(|(p, _)| *p == g.position)
                .and_then(|(_, m)| *m),
            median_survival: g.estimate.median,
        })
        .collect();

    let hazard = match &comparison.hazard_ratio {
        HazardRatio::Estimated(fit) => HazardSummary {
            available: true,
            hazard_ratio: Some(fit.hazard_ratio),
            coef: Some(fit.coef),
            se: Some(fit.se),
            ci_lower: Some(fit.ci_lower),
            ci_upper: Some(fit.ci_upper),
            p_value: Some(fit.p_value),
            reason: None,
        },
        HazardRatio::Unavailable { reason } => HazardSummary {
            available: false,
            hazard_ratio: None,
            coef: None,
            se: None,
            ci_lower: None,
            ci_upper: None,
            p_value: None,
            reason: Some(reason.clone()),
        },
    };

    let written = |path: &Path| {
        ctx.written
            .iter()
            .any(|p| p == path)
            .then(|| path.display().to_string())
    };

    Ok(SigvivalV1 {
        schema: SCHEMA_VERSION.to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: ctx.output.timestamp.clone(),
        request: RequestEcho {
            signature: ctx.request.signature.name.clone(),
            genes: ctx.request.signature.genes.clone(),
            cohorts: ctx.request.cohorts.clone(),
            cut_point: ctx.request.cut_point.to_string(),
        },
        input: InputSummary {
            genes: ctx.assemble_stats.as_ref().map_or(0, |s| s.genes as u64),
            samples: scores.len() as u64,
            signature_genes_found: signature.found() as u64,
            signature_genes_missing: signature.missing.clone(),
        },
        stratification,
        excluded_without_survival: comparison.excluded as u64,
        log_rank: LogRankSummary {
            chi_square: comparison.log_rank.chi_square,
            df: comparison.log_rank.df as u64,
            p_value: comparison.log_rank.p_value,
        },
        hazard,
        outputs: Outputs {
            scores_csv: written(&ctx.output.scores_csv),
            plot_png: written(&ctx.output.plot_png),
        },
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json(path: &Path, report: &SigvivalV1) -> crate::error::Result<()> {
    let target = path.display().to_string();
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| SigvivalError::write_error(&target, e.to_string()))?;
    std::fs::write(path, json).map_err(|e| SigvivalError::write_error(&target, e.to_string()))?;
    Ok(())
}
