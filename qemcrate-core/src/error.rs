//! Error types for qemcrate

use thiserror::Error;

/// Fatal errors for qemcrate operations.
///
/// Per-record defects in a mesh are not errors; they are reported as
/// [`MeshDiagnostic`](crate::MeshDiagnostic) values alongside the data.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mesh source unavailable: {source_name}: {source}")]
    SourceUnavailable {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Wrap an I/O failure on a named mesh source
    pub fn source_unavailable(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Error::SourceUnavailable {
            source_name: source_name.into(),
            source,
        }
    }
}

/// Result type alias for qemcrate operations
pub type Result<T> = std::result::Result<T, Error>;
