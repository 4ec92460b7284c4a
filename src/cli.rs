use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::strata::CutPoint;

#[derive(Debug, Parser)]
#[command(
    name = "sigvival",
    version,
    about = "Gene-signature ssGSEA scoring and survival comparison across cancer cohorts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score a signature, stratify samples and compare survival.
    Run(RunArgs),
    /// List cohorts available in the reference data.
    Cohorts(DataArgs),
    /// List gene symbols selectable for a signature.
    Genes(GenesArgs),
    /// Load the reference tables and report their sizes.
    Validate(DataArgs),
}

#[derive(Debug, Clone, Args)]
pub struct DataArgs {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Reference data directory (overrides [data].dir)")]
    pub data_dir: Option<PathBuf>,
}

impl DataArgs {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load_or_default(self.config.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data.dir = dir.clone();
        }
        Ok(config)
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long, help = "Signature name")]
    pub signature: String,

    #[arg(
        long,
        value_delimiter = ',',
        required_unless_present = "genes_file",
        help = "Comma-separated gene symbols"
    )]
    pub genes: Vec<String>,

    #[arg(long, help = "Signature file: one gene per line, or name<TAB>gene")]
    pub genes_file: Option<PathBuf>,

    #[arg(long, value_delimiter = ',', required = true, help = "Comma-separated cohort ids")]
    pub cohorts: Vec<String>,

    #[arg(long, value_enum)]
    pub cut_point: CutPoint,

    #[arg(long, help = "Output directory (overrides [output].dir)")]
    pub out: Option<PathBuf>,

    #[arg(long, help = "Output file prefix (overrides [output].prefix)")]
    pub prefix: Option<String>,

    #[arg(long, help = "Number of threads (0 = auto)")]
    pub threads: Option<usize>,

    #[arg(long, help = "Minimum signature genes present in the matrix")]
    pub min_size: Option<usize>,

    #[arg(long, help = "Minimum samples per compared group")]
    pub min_group_size: Option<usize>,

    #[arg(long, default_value_t = false, help = "Also write a JSON summary")]
    pub json: bool,

    #[arg(long, default_value_t = false, help = "Skip writing result files")]
    pub no_export: bool,
}

impl RunArgs {
    /// Configuration file (or defaults) with command-line overrides applied.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = self.data.load_config()?;
        if let Some(out) = &self.out {
            config.output.dir = out.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.output.prefix = prefix.clone();
        }
        if let Some(threads) = self.threads {
            config.runtime.threads = threads;
        }
        if let Some(min_size) = self.min_size {
            config.scoring.min_size = min_size;
        }
        if let Some(min_group_size) = self.min_group_size {
            config.survival.min_group_size = min_group_size;
        }
        if self.json {
            config.output.json = true;
        }
        Ok(config)
    }
}

#[derive(Debug, Args)]
pub struct GenesArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long, help = "Only list symbols containing this text (case-insensitive)")]
    pub filter: Option<String>,
}
