use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, SigvivalError};
use crate::io::table::{TableReader, is_missing, parse_f64};
use crate::survival::SurvivalRecord;

#[derive(Debug, Default)]
pub struct GeneMapTable {
    /// Raw expression row id -> gene symbol.
    pub id_to_symbol: HashMap<String, String>,
    /// Unique symbols in first-appearance order.
    pub symbols: Vec<String>,
    pub duplicate_ids: usize,
}

pub fn read_gene_map(
    path: &Path,
    delimiter: u8,
    id_column: &str,
    symbol_column: &str,
) -> Result<GeneMapTable> {
    let mut table = TableReader::open(path, delimiter)?;
    let id_col = table.column(id_column)?;
    let symbol_col = table.column(symbol_column)?;
    let source = table.source.clone();

    let mut out = GeneMapTable::default();
    let mut symbol_seen: HashMap<String, ()> = HashMap::new();

    table.for_each_record(|line_no, record| {
        let id = record.get(id_col).unwrap_or_default();
        let symbol = record.get(symbol_col).unwrap_or_default();
        if id.is_empty() || is_missing(symbol) {
            return Err(SigvivalError::data_unavailable(
                &source,
                format!("line {}: empty gene id or symbol", line_no),
            ));
        }
        if out.id_to_symbol.contains_key(id) {
            out.duplicate_ids += 1;
            return Ok(());
        }
        out.id_to_symbol.insert(id.to_string(), symbol.to_string());
        if symbol_seen.insert(symbol.to_string(), ()).is_none() {
            out.symbols.push(symbol.to_string());
        }
        Ok(())
    })?;

    if out.symbols.is_empty() {
        return Err(SigvivalError::data_unavailable(&source, "gene map has no rows"));
    }
    Ok(out)
}

#[derive(Debug, Default)]
pub struct PhenotypeTable {
    /// (sample, cohort) in file order, first occurrence per sample.
    pub rows: Vec<(String, String)>,
    pub duplicate_samples: usize,
    pub missing_cohort: usize,
}

pub fn read_phenotype(
    path: &Path,
    delimiter: u8,
    sample_column: &str,
    cohort_column: &str,
) -> Result<PhenotypeTable> {
    let mut table = TableReader::open(path, delimiter)?;
    let sample_col = table.column(sample_column)?;
    let cohort_col = table.column(cohort_column)?;
    let source = table.source.clone();

    let mut out = PhenotypeTable::default();
    let mut seen: HashMap<String, ()> = HashMap::new();

    table.for_each_record(|line_no, record| {
        let sample = record.get(sample_col).unwrap_or_default();
        let cohort = record.get(cohort_col).unwrap_or_default();
        if sample.is_empty() {
            return Err(SigvivalError::data_unavailable(
                &source,
                format!("line {}: empty sample id", line_no),
            ));
        }
        if is_missing(cohort) {
            out.missing_cohort += 1;
            return Ok(());
        }
        if seen.insert(sample.to_string(), ()).is_some() {
            out.duplicate_samples += 1;
            return Ok(());
        }
        out.rows.push((sample.to_string(), cohort.to_string()));
        Ok(())
    })?;

    if out.rows.is_empty() {
        return Err(SigvivalError::data_unavailable(&source, "phenotype table has no rows"));
    }
    Ok(out)
}

#[derive(Debug, Default)]
pub struct SurvivalTable {
    pub records: HashMap<String, SurvivalRecord>,
    pub skipped: usize,
    pub duplicate_samples: usize,
}

pub fn read_survival(
    path: &Path,
    delimiter: u8,
    sample_column: &str,
    event_column: &str,
    time_column: &str,
) -> Result<SurvivalTable> {
    let mut table = TableReader::open(path, delimiter)?;
    let sample_col = table.column(sample_column)?;
    let event_col = table.column(event_column)?;
    let time_col = table.column(time_column)?;
    let source = table.source.clone();

    let mut out = SurvivalTable::default();

    table.for_each_record(|line_no, record| {
        let sample = record.get(sample_col).unwrap_or_default();
        let event = record.get(event_col).unwrap_or_default();
        let time = record.get(time_col).unwrap_or_default();
        if sample.is_empty() {
            return Err(SigvivalError::data_unavailable(
                &source,
                format!("line {}: empty sample id", line_no),
            ));
        }
        if is_missing(event) || is_missing(time) {
            out.skipped += 1;
            return Ok(());
        }
        let event = parse_f64(event, &source, line_no, event_column)?;
        let time = parse_f64(time, &source, line_no, time_column)?;
        if !time.is_finite() || time < 0.0 || !event.is_finite() {
            out.skipped += 1;
            return Ok(());
        }
        if out.records.contains_key(sample) {
            out.duplicate_samples += 1;
            return Ok(());
        }
        out.records.insert(
            sample.to_string(),
            SurvivalRecord {
                time,
                event: event > 0.0,
            },
        );
        Ok(())
    })?;

    if out.records.is_empty() {
        return Err(SigvivalError::data_unavailable(&source, "survival table has no usable rows"));
    }
    Ok(out)
}
