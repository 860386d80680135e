//! Mesh loading for qemcrate
//!
//! This crate reads the line-oriented OBJ subset used by the quadric
//! pipeline: `v x y z` vertex lines and `f i j k` triangle lines, where each
//! face token may carry `/tex` or `/tex/normal` suffixes. Defective lines are
//! skipped and reported; only an unreadable source is fatal.

pub mod obj;
pub mod error;

#[cfg(test)]
mod tests;

pub use error::*;
pub use obj::{FaceRecord, InvalidRecord, ObjReader, ObjRecord, ObjTokenizer, VertexRecord};

use qemcrate_core::{Error, LoadedMesh, MeshDiagnostic, Result};
use std::path::Path;

/// A loaded mesh together with the records that were dropped on the way
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub mesh: LoadedMesh,
    pub diagnostics: Vec<MeshDiagnostic>,
}

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<LoadReport>;
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<LoadReport> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    match extension.as_deref() {
        Some("obj") => obj::ObjReader::read_mesh(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            path.extension()
        ))),
    }
}
