use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Result, SigvivalError};
use crate::io::open_maybe_gz;

/// A delimited table opened for streaming, with its header row already read.
pub struct TableReader {
    pub source: String,
    pub headers: Vec<String>,
    reader: csv::Reader<Box<dyn Read>>,
}

impl TableReader {
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        let source = path.display().to_string();
        if !path.is_file() {
            return Err(SigvivalError::data_unavailable(&source, "file not found"));
        }
        let inner = open_maybe_gz(path)
            .map_err(|e| SigvivalError::data_unavailable(&source, format!("cannot open: {}", e)))?;
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .has_headers(true)
            .flexible(false)
            .from_reader(inner);
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| {
                SigvivalError::data_unavailable(&source, format!("failed to read header: {}", e))
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(SigvivalError::data_unavailable(&source, "empty header"));
        }
        Ok(Self {
            source,
            headers,
            reader,
        })
    }

    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| {
            SigvivalError::data_unavailable(
                &self.source,
                format!(
                    "required column '{}' missing (found: {})",
                    name,
                    self.headers.join(", ")
                ),
            )
        })
    }

    pub fn ensure_unique_headers(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.headers.len());
        for h in &self.headers {
            if !seen.insert(h.as_str()) {
                return Err(SigvivalError::data_unavailable(
                    &self.source,
                    format!("duplicate column '{}'", h),
                ));
            }
        }
        Ok(())
    }

    /// Visits each data row with its 1-based line number.
    pub fn for_each_record<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(usize, &StringRecord) -> Result<()>,
    {
        let mut record = StringRecord::new();
        let mut line_no = 1usize;
        loop {
            let more = self.reader.read_record(&mut record).map_err(|e| {
                SigvivalError::data_unavailable(
                    &self.source,
                    format!("line {}: {}", line_no + 1, e),
                )
            })?;
            if !more {
                break;
            }
            line_no += 1;
            f(line_no, &record)?;
        }
        Ok(())
    }
}

pub fn is_missing(field: &str) -> bool {
    field.is_empty() || field.eq_ignore_ascii_case("na") || field.eq_ignore_ascii_case("nan")
}

pub fn parse_f64(field: &str, source: &str, line_no: usize, column: &str) -> Result<f64> {
    field.parse::<f64>().map_err(|_| {
        SigvivalError::data_unavailable(
            source,
            format!("line {}: column '{}' is not numeric: '{}'", line_no, column, field),
        )
    })
}
