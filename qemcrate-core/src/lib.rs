//! Core data structures for qemcrate
//!
//! This crate provides the types shared by every stage of the quadric
//! pipeline: loaded vertices and faces, canonical edges, plane equations,
//! per-vertex quadrics, and the diagnostics and errors the stages report.

pub mod point;
pub mod mesh;
pub mod plane;
pub mod quadric;
pub mod diagnostics;
pub mod progress;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use plane::*;
pub use quadric::*;
pub use diagnostics::*;
pub use progress::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
