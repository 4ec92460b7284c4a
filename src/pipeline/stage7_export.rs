use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::error::SigvivalError;
use crate::io::{json_writer, plot_png, score_csv};
use crate::pipeline::Stage;

pub struct Stage7Export;

impl Stage7Export {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage7Export {
    fn name(&self) -> &'static str {
        "stage7_export"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !ctx.export {
            return Ok(());
        }
        let out_dir = ctx.output.out_dir.clone();
        fs::create_dir_all(&out_dir).map_err(|e| {
            SigvivalError::write_error(out_dir.display().to_string(), e.to_string())
        })?;

        if let Err(err) = write_outputs(ctx) {
            // exports are all-or-nothing
            for path in ctx.written.drain(..) {
                if let Err(e) = fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %e, "failed to remove partial output");
                }
            }
            return Err(err);
        }

        info!(
            out_dir = %out_dir.display(),
            files = ctx.written.len(),
            "results_exported"
        );
        Ok(())
    }
}

fn write_outputs(ctx: &mut Ctx) -> Result<()> {
    let scores = ctx.scores.as_ref().context("score table missing")?;
    let figure = ctx.figure.as_ref().context("survival figure missing")?;

    score_csv::write_scores_csv(&ctx.output.scores_csv, scores)?;
    ctx.written.push(ctx.output.scores_csv.clone());

    plot_png::render_km_png(&ctx.output.plot_png, figure)?;
    ctx.written.push(ctx.output.plot_png.clone());

    if ctx.write_json {
        let report = json_writer::build_report(ctx)?;
        json_writer::write_json(&ctx.output.summary_json, &report)?;
        ctx.written.push(ctx.output.summary_json.clone());
    }
    Ok(())
}
