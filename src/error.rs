//! Error types for the splicefuse library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or rendering a gene model.
///
/// Every variant is fatal for the run: the input tables are produced once by
/// the upstream toolchain, so a deviation means corrupted intermediate state.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A referenced input table is missing or unreadable.
    #[error("failed to open table {}: {source}", path.display())]
    Table {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A grammar violation in one of the input tables.
    #[error("{0}")]
    Parse(String),

    /// A contradiction between tables (support counts, exon counts, codon motifs).
    #[error("{0}")]
    Consistency(String),

    /// The model document could not be serialized or deserialized.
    #[error("model document: {0}")]
    Json(#[from] serde_json::Error),
}
