//! Load → plane fitting → quadric accumulation
//!
//! Each stage reads the previous stage's output and produces new data; the
//! result is a single immutable [`QuadricMesh`] snapshot for downstream
//! consumers such as an edge-collapse loop.

use crate::accumulator::QuadricAccumulator;
use crate::batch::StageControl;
use crate::config::QuadricConfig;
use crate::plane_solver::{PlaneEquationSolver, PlaneSet};
use qemcrate_core::{
    CancellationToken, Edge, Face, LoadedMesh, MeshDiagnostic, PlaneEquation, Point3d, Progress,
    Quadric, Result,
};
use qemcrate_io::{obj::ObjReader, read_mesh, LoadReport};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Vertices, faces, edges, planes and quadrics of one mesh
#[derive(Debug, Clone)]
pub struct QuadricMesh {
    mesh: LoadedMesh,
    planes: PlaneSet,
    quadrics: Vec<Quadric>,
    diagnostics: Vec<MeshDiagnostic>,
}

impl QuadricMesh {
    pub fn mesh(&self) -> &LoadedMesh {
        &self.mesh
    }

    pub fn vertices(&self) -> &[Point3d] {
        self.mesh.vertices()
    }

    /// Faces with their 1-based indices, as read
    pub fn faces(&self) -> &[Face] {
        self.mesh.faces()
    }

    pub fn edges(&self) -> &[Edge] {
        self.mesh.edges()
    }

    /// Per-face planes; degenerate faces have none
    pub fn planes(&self) -> &PlaneSet {
        &self.planes
    }

    /// One quadric per vertex, parallel to [`vertices`](Self::vertices)
    pub fn quadrics(&self) -> &[Quadric] {
        &self.quadrics
    }

    pub fn degenerate_faces(&self) -> Vec<usize> {
        self.planes.degenerate_faces()
    }

    /// Every dropped line, token or face, in the order found
    pub fn diagnostics(&self) -> &[MeshDiagnostic] {
        &self.diagnostics
    }

    /// Quadric error of moving the 0-based `vertex` to `point`
    pub fn vertex_error(&self, vertex: usize, point: &Point3d) -> Option<f64> {
        self.quadrics.get(vertex).map(|q| q.evaluate(point))
    }

    /// Plane of the face at `face`, if it is not degenerate
    pub fn face_plane(&self, face: usize) -> Option<&PlaneEquation> {
        self.planes.plane(face)
    }
}

/// Runs the three stages with one configuration
#[derive(Debug, Default)]
pub struct QuadricPipeline {
    config: QuadricConfig,
    control: StageControl,
}

impl QuadricPipeline {
    pub fn new(config: QuadricConfig) -> Self {
        Self {
            config,
            control: StageControl::default(),
        }
    }

    /// Report per-batch progress of the solve and accumulate stages
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.control.progress = progress;
        self
    }

    /// Stop between batches once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.control.cancellation = token;
        self
    }

    pub fn config(&self) -> &QuadricConfig {
        &self.config
    }

    /// Load a mesh file and compute its quadrics
    pub fn run_path<P: AsRef<Path>>(&self, path: P) -> Result<QuadricMesh> {
        self.run_report(read_mesh(path)?)
    }

    /// Compute quadrics for an in-memory OBJ description
    pub fn run_source(&self, source: &str) -> Result<QuadricMesh> {
        self.run_report(ObjReader::from_str_source(source)?)
    }

    /// Compute quadrics for a load result, keeping its diagnostics
    pub fn run_report(&self, report: LoadReport) -> Result<QuadricMesh> {
        let LoadReport { mesh, diagnostics } = report;
        self.run_with_diagnostics(mesh, diagnostics)
    }

    /// Compute quadrics for an already loaded mesh
    pub fn run(&self, mesh: LoadedMesh) -> Result<QuadricMesh> {
        self.run_with_diagnostics(mesh, Vec::new())
    }

    fn run_with_diagnostics(
        &self,
        mesh: LoadedMesh,
        mut diagnostics: Vec<MeshDiagnostic>,
    ) -> Result<QuadricMesh> {
        let started = Instant::now();

        let solver = PlaneEquationSolver::with_config(self.config.clone());
        let planes = solver.solve_with(&mesh, &self.control)?;

        let accumulator = QuadricAccumulator::with_config(self.config.clone());
        let quadrics =
            accumulator.accumulate_with(mesh.faces(), &planes, mesh.vertex_count(), &self.control)?;

        diagnostics.extend(planes.diagnostics());
        info!(
            "computed {} planes and {} quadrics ({} degenerate faces) in {:?}",
            planes.len(),
            quadrics.len(),
            planes.face_count() - planes.len(),
            started.elapsed()
        );

        Ok(QuadricMesh {
            mesh,
            planes,
            quadrics,
            diagnostics,
        })
    }
}
