//! Per-face plane fitting
//!
//! For a face with corners `v0, v1, v2` the plane `a·x + b·y + c·z + d = 0`
//! is found by solving `M·[a, b, c]ᵗ = [1, 1, 1]ᵗ` with the corners as the
//! rows of `M`, which fixes `d = -1`; the result is then scaled to a unit
//! normal. `M` is singular both for degenerate triangles and for planes that
//! pass through the origin, so the two cases are told apart with the edge
//! cross product before solving.

use crate::batch::{map_batched, StageControl};
use crate::config::QuadricConfig;
use nalgebra::Matrix3;
use qemcrate_core::{LoadedMesh, MeshDiagnostic, PlaneEquation, Point3d, Result, Vector3d};
use std::time::Instant;
use tracing::{debug, warn};

/// Below this ratio of origin distance to corner extent, the plane is fitted
/// from the cross product instead of the `d = -1` solve.
const ORIGIN_PLANE_RATIO: f64 = 1e-9;

/// Fit the normalized plane through three points.
///
/// Returns `None` when the points are collinear or coincident under the
/// given relative tolerance. Planes are oriented so that `d <= 0`.
pub fn fit_plane(corners: &[Point3d; 3], tolerance: f64) -> Option<PlaneEquation> {
    let [p0, p1, p2] = corners;
    let e1 = p1 - p0;
    let e2 = p2 - p0;
    let normal = e1.cross(&e2);
    let normal_length = normal.norm();

    // Written so that NaN lengths fall through to `None`
    if !(normal_length > tolerance * e1.norm() * e2.norm()) {
        return None;
    }

    let m = Matrix3::from_rows(&[
        p0.coords.transpose(),
        p1.coords.transpose(),
        p2.coords.transpose(),
    ]);
    let extent = corners
        .iter()
        .map(|p| p.coords.norm())
        .fold(0.0f64, f64::max);

    // det(M) = n·v0 = |n| · distance(origin, plane)
    if m.determinant().abs() > ORIGIN_PLANE_RATIO * normal_length * extent {
        if let Some(abc) = m.lu().solve(&Vector3d::repeat(1.0)) {
            return PlaneEquation::from_unnormalized(abc, -1.0);
        }
    }

    let plane = PlaneEquation::from_unnormalized(normal, -normal.dot(&p0.coords))?;
    Some(if plane.offset() > 0.0 { plane.flipped() } else { plane })
}

/// Plane equations for every face of a mesh, in face order.
///
/// Degenerate faces keep their slot but carry no plane, so face positions
/// stay aligned with the mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaneSet {
    planes: Vec<Option<PlaneEquation>>,
}

impl PlaneSet {
    pub fn from_planes(planes: Vec<Option<PlaneEquation>>) -> Self {
        Self { planes }
    }

    /// Number of computed (non-degenerate) planes
    pub fn len(&self) -> usize {
        self.planes.iter().filter(|p| p.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of faces the set was solved for
    pub fn face_count(&self) -> usize {
        self.planes.len()
    }

    /// The plane of the face at `face`, if it is not degenerate
    pub fn plane(&self, face: usize) -> Option<&PlaneEquation> {
        self.planes.get(face).and_then(Option::as_ref)
    }

    pub fn is_degenerate(&self, face: usize) -> bool {
        matches!(self.planes.get(face), Some(None))
    }

    /// `(face position, plane)` for every computed plane
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PlaneEquation)> + '_ {
        self.planes
            .iter()
            .enumerate()
            .filter_map(|(face, plane)| plane.as_ref().map(|p| (face, p)))
    }

    /// Positions of the faces that were rejected as degenerate
    pub fn degenerate_faces(&self) -> Vec<usize> {
        self.planes
            .iter()
            .enumerate()
            .filter_map(|(face, plane)| plane.is_none().then_some(face))
            .collect()
    }

    /// One diagnostic per degenerate face
    pub fn diagnostics(&self) -> Vec<MeshDiagnostic> {
        self.degenerate_faces()
            .into_iter()
            .map(|face| MeshDiagnostic::DegenerateFace { face })
            .collect()
    }
}

/// Plane equation solver
#[derive(Debug, Clone, Default)]
pub struct PlaneEquationSolver {
    pub config: QuadricConfig,
}

impl PlaneEquationSolver {
    /// Create a solver with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QuadricConfig) -> Self {
        Self { config }
    }

    /// Fit one plane per face
    pub fn solve(&self, mesh: &LoadedMesh) -> Result<PlaneSet> {
        self.solve_with(mesh, &StageControl::default())
    }

    /// Fit one plane per face, reporting progress and honouring cancellation
    pub fn solve_with(&self, mesh: &LoadedMesh, control: &StageControl) -> Result<PlaneSet> {
        self.config.validate()?;
        let started = Instant::now();
        let tolerance = self.config.degeneracy_tolerance;

        let planes = map_batched(
            mesh.face_count(),
            &self.config,
            control,
            "Calculating plane equations",
            |i| {
                let face = &mesh.faces()[i];
                let plane = fit_plane(&mesh.face_corners(face), tolerance);
                if plane.is_none() {
                    warn!("face {} {:?}: degenerate triangle, excluded from quadrics", i, face.indices());
                }
                plane
            },
        )?;

        let planes = PlaneSet::from_planes(planes);
        debug!(
            "solved {} planes ({} degenerate) in {:?}",
            planes.len(),
            planes.face_count() - planes.len(),
            started.elapsed()
        );
        Ok(planes)
    }
}
