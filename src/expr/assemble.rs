use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::error::{Result, SigvivalError};
use crate::expr::ExpressionMatrix;
use crate::io::expression::{ExpressionSlice, read_expression_slice};
use crate::reference::Reference;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembleStats {
    pub slices: usize,
    pub genes: usize,
    pub samples: usize,
    pub unmapped_ids: usize,
    pub duplicate_symbols: usize,
    pub dropped_genes: usize,
    pub dropped_samples: usize,
}

impl AssembleStats {
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.unmapped_ids > 0 {
            out.push(format!(
                "{} expression row ids not in the gene map (kept raw id)",
                self.unmapped_ids
            ));
        }
        if self.duplicate_symbols > 0 {
            out.push(format!(
                "{} expression rows shared a gene symbol (kept first)",
                self.duplicate_symbols
            ));
        }
        if self.dropped_genes > 0 {
            out.push(format!(
                "{} genes missing from at least one expression slice dropped",
                self.dropped_genes
            ));
        }
        if self.dropped_samples > 0 {
            out.push(format!(
                "{} expression columns outside the sample registry or selected cohorts dropped",
                self.dropped_samples
            ));
        }
        out
    }
}

/// Physical expression files backing `cohort`: the single file if present,
/// otherwise numbered parts `_1`, `_2`, ... up to the first gap.
pub fn discover_partitions(data: &DataConfig, cohort: &str) -> Vec<PathBuf> {
    let dir = data.expression_dir();
    let stem = format!("{}{}", data.expression_prefix, cohort);
    let existing = |base: String| -> Option<PathBuf> {
        let plain = dir.join(&base);
        if plain.is_file() {
            return Some(plain);
        }
        let gz = dir.join(format!("{}.gz", base));
        gz.is_file().then_some(gz)
    };

    if let Some(single) = existing(format!("{}.{}", stem, data.expression_ext)) {
        return vec![single];
    }
    let mut parts = Vec::new();
    for part in 1.. {
        match existing(format!("{}_{}.{}", stem, part, data.expression_ext)) {
            Some(path) => parts.push(path),
            None => break,
        }
    }
    parts
}

struct StagedSlice {
    slice: ExpressionSlice,
    symbol_rows: HashMap<String, usize>,
    symbols_in_order: Vec<String>,
    kept_cols: Vec<usize>,
}

pub fn assemble_cohorts(
    reference: &Reference,
    cohorts: &[String],
) -> Result<(ExpressionMatrix, AssembleStats)> {
    if cohorts.is_empty() {
        return Err(SigvivalError::invalid_request("no cohorts selected"));
    }
    let mut plan = Vec::with_capacity(cohorts.len());
    for cohort in cohorts {
        if !reference.has_cohort(cohort) {
            return Err(SigvivalError::cohort_not_found(
                cohort,
                "not in the cohort universe",
            ));
        }
        let parts = discover_partitions(&reference.data, cohort);
        if parts.is_empty() {
            return Err(SigvivalError::cohort_not_found(
                cohort,
                format!(
                    "no expression file under {}",
                    reference.data.expression_dir().display()
                ),
            ));
        }
        plan.push((cohort.as_str(), parts));
    }

    let selected: HashSet<&str> = cohorts.iter().map(String::as_str).collect();
    let delimiter = reference.data.delimiter_byte();
    let mut stats = AssembleStats::default();
    let mut seen_samples: HashSet<String> = HashSet::new();
    let mut staged = Vec::new();

    for (cohort, parts) in plan {
        for path in parts {
            let slice = read_expression_slice(&path, delimiter)?;
            let mut symbol_rows = HashMap::with_capacity(slice.n_rows());
            let mut symbols_in_order = Vec::with_capacity(slice.n_rows());
            for (row, raw_id) in slice.row_ids.iter().enumerate() {
                let (symbol, mapped) = reference.symbol_for(raw_id);
                if !mapped {
                    stats.unmapped_ids += 1;
                }
                if symbol_rows.contains_key(symbol) {
                    stats.duplicate_symbols += 1;
                    continue;
                }
                symbol_rows.insert(symbol.to_string(), row);
                symbols_in_order.push(symbol.to_string());
            }

            let mut kept_cols = Vec::new();
            for (col, sample) in slice.samples.iter().enumerate() {
                let wanted = reference
                    .cohort_of(sample)
                    .is_some_and(|c| selected.contains(c));
                if wanted && seen_samples.insert(sample.clone()) {
                    kept_cols.push(col);
                } else {
                    stats.dropped_samples += 1;
                }
            }
            debug!(
                cohort,
                source = %slice.source,
                genes = symbols_in_order.len(),
                samples = kept_cols.len(),
                "slice_staged"
            );
            stats.slices += 1;
            staged.push(StagedSlice {
                slice,
                symbol_rows,
                symbols_in_order,
                kept_cols,
            });
        }
    }

    let Some(first) = staged.first() else {
        return Err(SigvivalError::invalid_request("no expression slices to assemble"));
    };
    let genes: Vec<String> = first
        .symbols_in_order
        .iter()
        .filter(|g| staged[1..].iter().all(|s| s.symbol_rows.contains_key(*g)))
        .cloned()
        .collect();
    let union: HashSet<&str> = staged
        .iter()
        .flat_map(|s| s.symbols_in_order.iter().map(String::as_str))
        .collect();
    stats.dropped_genes = union.len() - genes.len();
    if genes.is_empty() {
        return Err(SigvivalError::data_unavailable(
            "expression",
            "no genes shared by all selected expression slices",
        ));
    }

    let n_samples: usize = staged.iter().map(|s| s.kept_cols.len()).sum();
    let mut samples = Vec::with_capacity(n_samples);
    let mut values = Vec::with_capacity(n_samples * genes.len());
    for staged_slice in &staged {
        let rows: Vec<usize> = genes
            .iter()
            .map(|g| staged_slice.symbol_rows[g.as_str()])
            .collect();
        for &col in &staged_slice.kept_cols {
            samples.push(staged_slice.slice.samples[col].clone());
            values.extend(rows.iter().map(|&row| staged_slice.slice.value(row, col)));
        }
    }
    drop(staged);

    if stats.dropped_genes > 0 || stats.dropped_samples > 0 {
        warn!(
            dropped_genes = stats.dropped_genes,
            dropped_samples = stats.dropped_samples,
            "assembly dropped rows or columns"
        );
    }
    info!(
        cohorts = cohorts.len(),
        slices = stats.slices,
        genes = genes.len(),
        samples = samples.len(),
        "expression_assembled"
    );

    stats.genes = genes.len();
    stats.samples = samples.len();
    let matrix = ExpressionMatrix::from_sample_major(genes, samples, values)
        .map_err(|e| SigvivalError::data_unavailable("expression", e.to_string()))?;
    Ok((matrix, stats))
}
