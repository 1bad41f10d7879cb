//! Parsers for the upstream tables: factorizations, predicted introns,
//! variant annotations and exon geometry.

pub mod factorizations;
pub mod geometry;
pub mod introns;
pub mod variants;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::Error;

/// Open a table for line reading, transparently decompressing `.gz` files.
pub fn open_table(path: &Path) -> Result<Box<dyn BufRead>, Error> {
    let file = File::open(path).map_err(|source| Error::Table {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Wrap a per-line error with its 1-based line number and text.
pub(crate) fn at_line(error: Error, line_num: usize, line: &str) -> Error {
    match error {
        Error::Parse(msg) => Error::Parse(format!("{msg} (line {line_num}: {line})")),
        other => other,
    }
}
