//! Non-fatal diagnostics
//!
//! One bad record never aborts processing of a mesh. Loader and solver skip
//! the offending line, face or token, log it, and report it here.

use thiserror::Error;

/// A recoverable defect found while loading or solving a mesh
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshDiagnostic {
    /// A `v` line without three numeric coordinates
    #[error("line {line}: malformed vertex: {reason}")]
    MalformedVertex { line: usize, reason: String },

    /// A face token whose vertex index is not a positive integer
    #[error("line {line}: malformed face token '{token}'")]
    MalformedFaceToken { line: usize, token: String },

    /// A face with a vertex count other than three
    #[error("line {line}: skipping non-triangular face with {vertex_count} vertices")]
    UnsupportedFace { line: usize, vertex_count: usize },

    /// A face referencing a vertex that was never loaded
    #[error("line {line}: face index {index} out of range (1..={vertex_count})")]
    FaceIndexOutOfRange {
        line: usize,
        index: usize,
        vertex_count: usize,
    },

    /// A face whose corners are collinear or coincident
    #[error("face {face}: degenerate triangle has no unique plane")]
    DegenerateFace { face: usize },
}

impl MeshDiagnostic {
    /// Whether the diagnostic caused a record to be dropped during loading
    pub fn is_load_diagnostic(&self) -> bool {
        !matches!(self, MeshDiagnostic::DegenerateFace { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = MeshDiagnostic::UnsupportedFace {
            line: 12,
            vertex_count: 4,
        };
        assert_eq!(
            d.to_string(),
            "line 12: skipping non-triangular face with 4 vertices"
        );

        let d = MeshDiagnostic::DegenerateFace { face: 3 };
        assert!(d.to_string().contains("face 3"));
        assert!(!d.is_load_diagnostic());
    }
}
