//! Record-level parse errors

use thiserror::Error;

/// Why a single OBJ record could not be parsed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("expected 3 coordinates, found {found}")]
    MissingCoordinates { found: usize },

    #[error("invalid coordinate '{token}'")]
    InvalidCoordinate { token: String },

    #[error("invalid vertex index '{token}'")]
    InvalidIndex { token: String },
}
