use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

pub mod expression;
pub mod json_writer;
pub mod plot_png;
pub mod score_csv;
pub mod summary;
pub mod table;

const IO_BUF_CAPACITY: usize = 1 << 20; // 1 MiB

pub(crate) fn open_maybe_gz(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let reader = BufReader::with_capacity(IO_BUF_CAPACITY, file);
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}
