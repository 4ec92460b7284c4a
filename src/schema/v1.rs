use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "sigvival.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEcho {
    pub signature: String,
    pub genes: Vec<String>,
    pub cohorts: Vec<String>,
    pub cut_point: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    pub genes: u64,
    pub samples: u64,
    pub signature_genes_found: u64,
    pub signature_genes_missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub display: String,
    pub position: u64,
    pub size: u64,
    pub events: u64,
    pub mean_nes: Option<f64>,
    pub median_survival: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRankSummary {
    pub chi_square: Option<f64>,
    pub df: u64,
    pub p_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardSummary {
    pub available: bool,
    pub hazard_ratio: Option<f64>,
    pub coef: Option<f64>,
    pub se: Option<f64>,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
    pub p_value: Option<f64>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    pub scores_csv: Option<String>,
    pub plot_png: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigvivalV1 {
    pub schema: String,
    pub tool_version: String,
    pub timestamp: String,
    pub request: RequestEcho,
    pub input: InputSummary,
    pub stratification: Vec<GroupSummary>,
    pub excluded_without_survival: u64,
    pub log_rank: LogRankSummary,
    pub hazard: HazardSummary,
    pub outputs: Outputs,
    pub warnings: Vec<String>,
}
