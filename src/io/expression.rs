use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::error::{Result, SigvivalError};
use crate::io::table::{TableReader, is_missing};

/// One physical expression file: genes as rows, samples as columns.
/// `values` is row-major (`row * samples.len() + col`).
#[derive(Debug, Clone)]
pub struct ExpressionSlice {
    pub source: String,
    pub row_ids: Vec<String>,
    pub samples: Vec<String>,
    pub values: Vec<f32>,
}

impl ExpressionSlice {
    pub fn n_rows(&self) -> usize {
        self.row_ids.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn value(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.samples.len() + col]
    }
}

pub fn read_expression_slice(path: &Path, delimiter: u8) -> Result<ExpressionSlice> {
    let mut table = TableReader::open(path, delimiter)?;
    table.ensure_unique_headers()?;
    let source = table.source.clone();
    if table.headers.len() < 2 {
        return Err(SigvivalError::data_unavailable(
            &source,
            "expression table needs a gene id column and at least one sample column",
        ));
    }
    let samples: Vec<String> = table.headers[1..].to_vec();
    let n_samples = samples.len();

    let mut row_ids = Vec::new();
    let mut values = Vec::new();
    let mut seen_rows = HashSet::new();

    table.for_each_record(|line_no, record| {
        let row_id = record.get(0).unwrap_or_default();
        if row_id.is_empty() {
            return Err(SigvivalError::data_unavailable(
                &source,
                format!("line {}: empty gene id", line_no),
            ));
        }
        if !seen_rows.insert(row_id.to_string()) {
            return Err(SigvivalError::data_unavailable(
                &source,
                format!("line {}: duplicate gene id '{}'", line_no, row_id),
            ));
        }
        row_ids.push(row_id.to_string());
        for (col, field) in record.iter().skip(1).enumerate() {
            let v = if is_missing(field) {
                f32::NAN
            } else {
                field.parse::<f32>().map_err(|_| {
                    SigvivalError::data_unavailable(
                        &source,
                        format!(
                            "line {}: sample '{}' value is not numeric: '{}'",
                            line_no, samples[col], field
                        ),
                    )
                })?
            };
            values.push(v);
        }
        Ok(())
    })?;

    if row_ids.is_empty() {
        return Err(SigvivalError::data_unavailable(&source, "no gene rows"));
    }
    debug_assert_eq!(values.len(), row_ids.len() * n_samples);
    debug!(
        source = %source,
        genes = row_ids.len(),
        samples = n_samples,
        "expression_slice_read"
    );

    Ok(ExpressionSlice {
        source,
        row_ids,
        samples,
        values,
    })
}
