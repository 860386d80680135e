//! Plane fitting and quadric accumulation
//!
//! This crate computes the precursor data for quadric error metric
//! simplification:
//! - One normalized plane equation per face
//! - One error quadric per vertex, summed over its incident faces
//! - A pipeline chaining mesh loading, plane fitting and accumulation

pub mod config;
pub mod batch;
pub mod plane_solver;
pub mod accumulator;
pub mod pipeline;

pub use config::*;
pub use batch::StageControl;
pub use plane_solver::*;
pub use accumulator::*;
pub use pipeline::*;
