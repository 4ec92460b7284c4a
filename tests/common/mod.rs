#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use sigvival::config::{Config, DataConfig};

pub const PREFIX: &str = "GDC-PANCAN.htseq_fpkm-uq_";
pub const COHORT_A: &str = "TCGA-AAA";
pub const COHORT_B: &str = "TCGA-BBB";
/// In the phenotype table but without any expression file.
pub const COHORT_EMPTY: &str = "TCGA-CCC";
pub const N_GENES: usize = 20;
pub const SIGNATURE: [&str; 3] = ["G1", "G2", "G3"];

pub fn gene_id(g: usize) -> String {
    format!("ENSG{:05}.1", g)
}

pub fn samples_a() -> Vec<String> {
    (0..12).map(|i| format!("A{:02}", i)).collect()
}

pub fn samples_b() -> Vec<String> {
    (0..12).map(|i| format!("B{:02}", i)).collect()
}

/// Expression of gene `g` (1-based symbol index) in the sample with global
/// index `i`. Signature genes climb through the background with `i`.
pub fn expression(g: usize, i: usize) -> f64 {
    if g <= SIGNATURE.len() {
        0.5 * i as f64 + 0.25 + 0.01 * g as f64
    } else {
        0.6 * (g - SIGNATURE.len()) as f64 + 0.3
    }
}

fn expression_table(samples: &[String], offset: usize, extra_col: Option<&str>) -> String {
    let mut out = String::from("xena_sample");
    for s in samples {
        out.push('\t');
        out.push_str(s);
    }
    if let Some(extra) = extra_col {
        out.push('\t');
        out.push_str(extra);
    }
    out.push('\n');
    for g in 1..=N_GENES {
        out.push_str(&gene_id(g));
        for i in 0..samples.len() {
            out.push_str(&format!("\t{:.4}", expression(g, offset + i)));
        }
        if extra_col.is_some() {
            out.push_str("\t1.0");
        }
        out.push('\n');
    }
    out
}

pub fn write_gz(path: &Path, content: &str) {
    let file = fs::File::create(path).unwrap();
    let mut enc = GzEncoder::new(file, Compression::default());
    enc.write_all(content.as_bytes()).unwrap();
    enc.finish().unwrap();
}

/// Writes a small two-cohort reference:
/// - cohort A in a single file, with one extra column (`A99`) that has
///   phenotype but no survival;
/// - cohort B split into `_1` (plain) and `_2` (gzip) parts;
/// - higher signature expression tends to mean shorter survival, with
///   enough overlap between halves for a finite hazards fit.
pub fn write_reference(dir: &Path) {
    let mut gene_map = String::from("id\tgene\tchrom\n");
    for g in 1..=N_GENES {
        gene_map.push_str(&format!("{}\tG{}\tchr1\n", gene_id(g), g));
    }
    fs::write(dir.join("gencode.v22.annotation.gene.probeMap"), gene_map).unwrap();

    let mut pheno = String::from("sample\tproject_id\tsample_type\n");
    let mut surv = String::from("sample\tOS\tOS.time\n");
    for (i, s) in samples_a().iter().chain(samples_b().iter()).enumerate() {
        let cohort = if s.starts_with('A') { COHORT_A } else { COHORT_B };
        pheno.push_str(&format!("{}\t{}\tPrimary Tumor\n", s, cohort));
        let time = 2000.0 - 60.0 * i as f64 + if i % 3 == 0 { 400.0 } else { 0.0 };
        let event = if i % 4 == 3 { 0 } else { 1 };
        surv.push_str(&format!("{}\t{}\t{}\n", s, event, time));
    }
    pheno.push_str(&format!("A99\t{}\tPrimary Tumor\n", COHORT_A));
    pheno.push_str(&format!("C00\t{}\tPrimary Tumor\n", COHORT_EMPTY));
    surv.push_str("C00\t1\t300\n");
    surv.push_str("Z00\tNA\t\n");
    fs::write(dir.join("GDC-PANCAN.basic_phenotype.tsv"), pheno).unwrap();
    fs::write(dir.join("GDC-PANCAN.survival.tsv"), surv).unwrap();

    let a = samples_a();
    fs::write(
        dir.join(format!("{}{}.tsv", PREFIX, COHORT_A)),
        expression_table(&a, 0, Some("A99")),
    )
    .unwrap();

    let b = samples_b();
    fs::write(
        dir.join(format!("{}{}_1.tsv", PREFIX, COHORT_B)),
        expression_table(&b[..6], 12, None),
    )
    .unwrap();
    write_gz(
        &dir.join(format!("{}{}_2.tsv.gz", PREFIX, COHORT_B)),
        &expression_table(&b[6..], 18, None),
    );
}

pub struct Fixture {
    pub data: TempDir,
    pub out: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let data = TempDir::new().unwrap();
        write_reference(data.path());
        Self {
            data,
            out: TempDir::new().unwrap(),
        }
    }

    pub fn data_config(&self) -> DataConfig {
        DataConfig::with_dir(self.data.path())
    }

    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.data = self.data_config();
        config.output.dir = self.out.path().join("results");
        config.runtime.threads = 2;
        config
    }
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
