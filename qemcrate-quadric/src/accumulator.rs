//! Per-vertex quadric accumulation
//!
//! Each vertex's quadric is the sum of `p·pᵗ` over the planes of the
//! non-degenerate faces that reference it. The vertex→face relation is built
//! once in a compressed layout so the sum visits only incident faces.

use crate::batch::{map_batched, StageControl};
use crate::config::QuadricConfig;
use crate::plane_solver::PlaneSet;
use qemcrate_core::{Error, Face, Quadric, Result};
use std::time::Instant;
use tracing::debug;

/// Vertex → incident face positions, stored as one flat list with offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceAdjacency {
    offsets: Vec<usize>,
    faces: Vec<usize>,
}

impl FaceAdjacency {
    /// Build the adjacency for `vertex_count` vertices in O(faces).
    ///
    /// A face naming the same vertex twice is listed once for it. Fails if
    /// a face references a vertex outside `1..=vertex_count`.
    pub fn build(faces: &[Face], vertex_count: usize) -> Result<Self> {
        let mut counts = vec![0usize; vertex_count + 1];
        for (position, face) in faces.iter().enumerate() {
            if !face.resolves_within(vertex_count) {
                return Err(Error::InvalidData(format!(
                    "face {} references {:?} but only {} vertices exist",
                    position,
                    face.indices(),
                    vertex_count
                )));
            }
            for vertex in distinct_vertices(face) {
                counts[vertex + 1] += 1;
            }
        }

        // Prefix sums: offsets[v]..offsets[v + 1] is the slice for vertex v
        for v in 0..vertex_count {
            counts[v + 1] += counts[v];
        }
        let offsets = counts;

        let mut cursor = offsets.clone();
        let mut incident = vec![0usize; offsets[vertex_count]];
        for (position, face) in faces.iter().enumerate() {
            for vertex in distinct_vertices(face) {
                incident[cursor[vertex]] = position;
                cursor[vertex] += 1;
            }
        }

        Ok(Self {
            offsets,
            faces: incident,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Positions of the faces referencing the 0-based vertex, in face order
    pub fn faces_of(&self, vertex: usize) -> &[usize] {
        match (self.offsets.get(vertex), self.offsets.get(vertex + 1)) {
            (Some(&start), Some(&end)) => &self.faces[start..end],
            _ => &[],
        }
    }
}

fn distinct_vertices(face: &Face) -> impl Iterator<Item = usize> {
    let [a, b, c] = face.storage_indices();
    let b = (b != a).then_some(b);
    let c = (c != a && Some(c) != b).then_some(c);
    std::iter::once(a).chain(b).chain(c)
}

/// Quadric accumulator
#[derive(Debug, Clone, Default)]
pub struct QuadricAccumulator {
    pub config: QuadricConfig,
}

impl QuadricAccumulator {
    /// Create an accumulator with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QuadricConfig) -> Self {
        Self { config }
    }

    /// One quadric per vertex, indexed by storage position
    pub fn accumulate(
        &self,
        faces: &[Face],
        planes: &PlaneSet,
        vertex_count: usize,
    ) -> Result<Vec<Quadric>> {
        self.accumulate_with(faces, planes, vertex_count, &StageControl::default())
    }

    /// Like [`accumulate`](Self::accumulate), reporting progress and
    /// honouring cancellation
    pub fn accumulate_with(
        &self,
        faces: &[Face],
        planes: &PlaneSet,
        vertex_count: usize,
        control: &StageControl,
    ) -> Result<Vec<Quadric>> {
        if planes.face_count() != faces.len() {
            return Err(Error::InvalidData(format!(
                "plane set covers {} faces but the mesh has {}",
                planes.face_count(),
                faces.len()
            )));
        }

        let started = Instant::now();
        let adjacency = FaceAdjacency::build(faces, vertex_count)?;
        debug!("built vertex adjacency in {:?}", started.elapsed());

        let quadrics = map_batched(
            vertex_count,
            &self.config,
            control,
            "Calculating quadrics",
            |vertex| {
                adjacency
                    .faces_of(vertex)
                    .iter()
                    .filter_map(|&face| planes.plane(face))
                    .map(Quadric::from_plane)
                    .sum::<Quadric>()
            },
        )?;

        debug!("accumulated {} quadrics in {:?}", quadrics.len(), started.elapsed());
        Ok(quadrics)
    }
}
