pub mod cli;
pub mod config;
pub mod ctx;
pub mod error;
pub mod expr;
pub mod geneset;
pub mod io;
pub mod math;
pub mod pipeline;
pub mod reference;
pub mod request;
pub mod schema;
pub mod scores;
pub mod strata;
pub mod survival;

use std::sync::Arc;

use anyhow::Result;

pub use config::Config;
pub use ctx::Ctx;
pub use error::{SigvivalError, kind_of};
pub use reference::{Reference, ReferenceCache};
pub use request::AnalysisRequest;

/// Runs the full analysis for one request and returns the finished context.
///
/// Analysis failures are returned as errors. An export failure is not: the
/// computed results stay available and the failure is kept in
/// `Ctx::export_error`.
pub fn run_analysis(
    request: AnalysisRequest,
    reference: Arc<Reference>,
    config: Config,
    export: bool,
) -> Result<Ctx> {
    let mut ctx = Ctx::new(request, reference, config);
    ctx.export = export;
    pipeline::Pipeline::analysis().run(&mut ctx)?;

    if let Err(err) = pipeline::Pipeline::export().run(&mut ctx) {
        let write_error = match kind_of(&err) {
            Some(domain) => domain.clone(),
            None => SigvivalError::write_error(
                ctx.output.out_dir.display().to_string(),
                format!("{:#}", err),
            ),
        };
        ctx.export_error = Some(write_error);
    }
    Ok(ctx)
}
