use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::survival::HazardRatio;

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "NA".to_string(), |x| format!("{:.4}", x))
}

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let signature = ctx.signature.as_ref().context("resolved signature missing")?;
    let scores = ctx.scores.as_ref().context("score table missing")?;
    let comparison = ctx.comparison.as_ref().context("comparison result missing")?;

    let mut out = String::new();
    out.push_str(&format!("sigvival v{}\n", version));
    out.push_str(&format!(
        "Signature: {} ({}/{} genes found)\n",
        signature.name,
        signature.found(),
        signature.total
    ));
    out.push_str(&format!("Cohorts: {}\n", ctx.request.cohorts.join(", ")));
    out.push_str(&format!(
        "Samples: {} scored, {} compared, {} without survival\n",
        scores.len(),
        comparison.samples,
        comparison.excluded
    ));
    out.push_str(&format!("Cut point: {}\n", comparison.cut_point));
    out.push_str("Groups:\n");
    for g in &comparison.groups {
        out.push_str(&format!(
            "  {}\tn={}\tevents={}\tmedian={}\n",
            g.display,
            g.size,
            g.events,
            fmt_opt(g.estimate.median)
        ));
    }
    out.push_str(&format!(
        "Log-rank: chi2={} df={} p={}\n",
        fmt_opt(comparison.log_rank.chi_square),
        comparison.log_rank.df,
        fmt_opt(comparison.log_rank.p_value)
    ));
    match &comparison.hazard_ratio {
        HazardRatio::Estimated(fit) => out.push_str(&format!(
            "Hazard ratio: {:.4} (95% CI {:.4}-{:.4}, p={:.4})\n",
            fit.hazard_ratio, fit.ci_lower, fit.ci_upper, fit.p_value
        )),
        HazardRatio::Unavailable { reason } => {
            out.push_str(&format!("Hazard ratio: unavailable ({})\n", reason))
        }
    }
    for path in &ctx.written {
        out.push_str(&format!("Wrote: {}\n", path.display()));
    }
    Ok(out)
}
