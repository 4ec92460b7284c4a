//! Configuration loading for sigvival.
//! Reads a TOML file when one is given; every field has a default so an
//! empty file (or no file at all) yields a usable configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub survival: SurvivalConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub expression_subdir: String,
    #[serde(default = "default_expression_prefix")]
    pub expression_prefix: String,
    #[serde(default = "default_expression_ext")]
    pub expression_ext: String,
    #[serde(default = "default_gene_map_file")]
    pub gene_map_file: String,
    #[serde(default = "default_phenotype_file")]
    pub phenotype_file: String,
    #[serde(default = "default_survival_file")]
    pub survival_file: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_gene_id_column")]
    pub gene_id_column: String,
    #[serde(default = "default_gene_symbol_column")]
    pub gene_symbol_column: String,
    #[serde(default = "default_sample_column")]
    pub sample_column: String,
    #[serde(default = "default_cohort_column")]
    pub cohort_column: String,
    #[serde(default = "default_event_column")]
    pub event_column: String,
    #[serde(default = "default_time_column")]
    pub time_column: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_expression_prefix() -> String {
    "GDC-PANCAN.htseq_fpkm-uq_".to_string()
}

fn default_expression_ext() -> String {
    "tsv".to_string()
}

fn default_gene_map_file() -> String {
    "gencode.v22.annotation.gene.probeMap".to_string()
}

fn default_phenotype_file() -> String {
    "GDC-PANCAN.basic_phenotype.tsv".to_string()
}

fn default_survival_file() -> String {
    "GDC-PANCAN.survival.tsv".to_string()
}

fn default_delimiter() -> char {
    '\t'
}

fn default_gene_id_column() -> String {
    "id".to_string()
}

fn default_gene_symbol_column() -> String {
    "gene".to_string()
}

fn default_sample_column() -> String {
    "sample".to_string()
}

fn default_cohort_column() -> String {
    "project_id".to_string()
}

fn default_event_column() -> String {
    "OS".to_string()
}

fn default_time_column() -> String {
    "OS.time".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            expression_subdir: String::new(),
            expression_prefix: default_expression_prefix(),
            expression_ext: default_expression_ext(),
            gene_map_file: default_gene_map_file(),
            phenotype_file: default_phenotype_file(),
            survival_file: default_survival_file(),
            delimiter: default_delimiter(),
            gene_id_column: default_gene_id_column(),
            gene_symbol_column: default_gene_symbol_column(),
            sample_column: default_sample_column(),
            cohort_column: default_cohort_column(),
            event_column: default_event_column(),
            time_column: default_time_column(),
        }
    }
}

impl DataConfig {
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn gene_map_path(&self) -> PathBuf {
        self.dir.join(&self.gene_map_file)
    }

    pub fn phenotype_path(&self) -> PathBuf {
        self.dir.join(&self.phenotype_file)
    }

    pub fn survival_path(&self) -> PathBuf {
        self.dir.join(&self.survival_file)
    }

    pub fn expression_dir(&self) -> PathBuf {
        if self.expression_subdir.is_empty() {
            self.dir.clone()
        } else {
            self.dir.join(&self.expression_subdir)
        }
    }

    /// Delimiter as the single byte the `csv` reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b'\t'
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_min_size")]
    pub min_size: usize,
    #[serde(default = "default_rank_scale")]
    pub rank_scale: f64,
}

fn default_weight() -> f64 {
    0.25
}

fn default_min_size() -> usize {
    1
}

fn default_rank_scale() -> f64 {
    10_000.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weight: default_weight(),
            min_size: default_min_size(),
            rank_scale: default_rank_scale(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivalConfig {
    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tol")]
    pub tol: f64,
}

fn default_min_group_size() -> usize {
    2
}

fn default_max_iter() -> usize {
    50
}

fn default_tol() -> f64 {
    1e-9
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            min_group_size: default_min_group_size(),
            max_iter: default_max_iter(),
            tol: default_tol(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub threads: usize,
    #[serde(default = "default_reserved_threads")]
    pub reserved_threads: usize,
}

fn default_reserved_threads() -> usize {
    1
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            reserved_threads: default_reserved_threads(),
        }
    }
}

impl RuntimeConfig {
    /// Worker count for per-sample scoring: the explicit setting, or the
    /// hardware concurrency minus the caller's reserved share.
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        available.saturating_sub(self.reserved_threads).max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub json: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./results")
}

fn default_prefix() -> String {
    "sigvival".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            prefix: default_prefix(),
            json: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
