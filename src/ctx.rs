use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::SigvivalError;
use crate::expr::{AssembleStats, ExpressionMatrix};
use crate::geneset::ResolvedSignature;
use crate::reference::Reference;
use crate::request::AnalysisRequest;
use crate::scores::{CancelToken, ScoreTable};
use crate::strata::GroupAssignment;
use crate::survival::{ComparisonResult, KmFigure};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub timestamp: String,
    pub scores_csv: PathBuf,
    pub plot_png: PathBuf,
    pub summary_json: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: &Path, prefix: &str, timestamp: &str) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            timestamp: timestamp.to_string(),
            scores_csv: out_dir.join(format!("{}_scores_{}.csv", prefix, timestamp)),
            plot_png: out_dir.join(format!("{}_plot_{}.png", prefix, timestamp)),
            summary_json: out_dir.join(format!("{}_summary_{}.json", prefix, timestamp)),
        }
    }

    pub fn now(out_dir: &Path, prefix: &str) -> Self {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::new(out_dir, prefix, &timestamp)
    }
}

/// Per-request state threaded through the stages. The request and the
/// reference are read-only; every other field is filled by one stage.
#[derive(Debug)]
pub struct Ctx {
    pub request: AnalysisRequest,
    pub reference: Arc<Reference>,
    pub config: Config,
    pub threads: usize,
    pub export: bool,
    pub write_json: bool,
    pub cancel: CancelToken,
    pub matrix: Option<ExpressionMatrix>,
    pub assemble_stats: Option<AssembleStats>,
    pub signature: Option<ResolvedSignature>,
    pub scores: Option<ScoreTable>,
    pub groups: Option<GroupAssignment>,
    pub comparison: Option<ComparisonResult>,
    pub figure: Option<KmFigure>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub written: Vec<PathBuf>,
    /// Set when export failed; the in-memory results remain valid.
    pub export_error: Option<SigvivalError>,
}

impl Ctx {
    pub fn new(request: AnalysisRequest, reference: Arc<Reference>, config: Config) -> Self {
        let output = OutputPaths::now(&config.output.dir, &config.output.prefix);
        Self {
            request,
            reference,
            threads: config.runtime.worker_threads(),
            export: true,
            write_json: config.output.json,
            cancel: CancelToken::new(),
            matrix: None,
            assemble_stats: None,
            signature: None,
            scores: None,
            groups: None,
            comparison: None,
            figure: None,
            warnings: Vec::new(),
            output,
            written: Vec::new(),
            export_error: None,
            config,
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(warning = %message, "analysis warning");
        self.warnings.push(message);
    }
}
