use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::info;

use crate::error::{Result, SigvivalError};
use crate::scores::{ScoreRow, ScoreTable};

/// Comma-separated `sample,signature,es,nes`, one row per sample.
pub fn write_scores_csv(path: &Path, table: &ScoreTable) -> Result<()> {
    let target = path.display().to_string();
    let werr = |e: csv::Error| SigvivalError::write_error(&target, e.to_string());
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(werr)?;
    for row in &table.rows {
        writer.serialize(row).map_err(werr)?;
    }
    writer
        .flush()
        .map_err(|e| SigvivalError::write_error(&target, e.to_string()))?;
    info!(path = %target, rows = table.rows.len(), "scores_written");
    Ok(())
}

pub fn read_scores_csv(path: &Path) -> Result<ScoreTable> {
    let source = path.display().to_string();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| SigvivalError::data_unavailable(&source, e.to_string()))?;
    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<ScoreRow>().enumerate() {
        let row = record.map_err(|e| {
            SigvivalError::data_unavailable(&source, format!("row {}: {}", idx + 1, e))
        })?;
        rows.push(row);
    }
    let signature = rows.first().map(|r| r.signature.clone()).unwrap_or_default();
    Ok(ScoreTable { signature, rows })
}
