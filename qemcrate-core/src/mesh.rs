//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A triangular face holding three 1-based vertex indices, as written in
/// the mesh file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face([usize; 3]);

impl Face {
    /// Create a face from three 1-based vertex indices
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self([v0, v1, v2])
    }

    /// The 1-based vertex indices, as read
    pub fn indices(&self) -> [usize; 3] {
        self.0
    }

    /// The 0-based storage indices of the three vertices.
    ///
    /// This is the only place the 1-based file convention is converted.
    /// Faces inside a [`LoadedMesh`] always resolve, so this never underflows
    /// for them.
    pub fn storage_indices(&self) -> [usize; 3] {
        [self.0[0] - 1, self.0[1] - 1, self.0[2] - 1]
    }

    /// Whether every index refers to one of `vertex_count` loaded vertices
    pub fn resolves_within(&self, vertex_count: usize) -> bool {
        self.0.iter().all(|&i| i >= 1 && i <= vertex_count)
    }

    /// The three sides of the face as canonical edges: (v0,v1), (v1,v2), (v0,v2)
    pub fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.0;
        [Edge::new(a, b), Edge::new(b, c), Edge::new(a, c)]
    }
}

impl From<[usize; 3]> for Face {
    fn from(indices: [usize; 3]) -> Self {
        Self(indices)
    }
}

/// An undirected edge between two 1-based vertex indices.
///
/// The smaller index is always stored first, so the two windings of a shared
/// edge compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    a: usize,
    b: usize,
}

impl Edge {
    /// Create the canonical edge between `u` and `v`
    pub fn new(u: usize, v: usize) -> Self {
        Self {
            a: u.min(v),
            b: u.max(v),
        }
    }

    /// The endpoints, smaller index first
    pub fn endpoints(&self) -> (usize, usize) {
        (self.a, self.b)
    }
}

/// Derive the deduplicated, sorted edge set of a face list
pub fn derive_edges(faces: &[Face]) -> Vec<Edge> {
    faces
        .iter()
        .flat_map(|face| face.edges())
        .sorted_unstable()
        .dedup()
        .collect()
}

/// The immutable output of the load phase: vertex positions, triangular
/// faces and the edge set derived from them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadedMesh {
    vertices: Vec<Point3d>,
    faces: Vec<Face>,
    edges: Vec<Edge>,
}

impl LoadedMesh {
    /// Build a mesh from vertices and faces, deriving its edges.
    ///
    /// Fails if any face references a vertex that does not exist.
    pub fn new(vertices: Vec<Point3d>, faces: Vec<Face>) -> Result<Self> {
        if let Some((position, face)) = faces
            .iter()
            .enumerate()
            .find(|(_, face)| !face.resolves_within(vertices.len()))
        {
            return Err(Error::InvalidData(format!(
                "face {} references {:?} but only {} vertices exist",
                position,
                face.indices(),
                vertices.len()
            )));
        }

        let edges = derive_edges(&faces);
        Ok(Self {
            vertices,
            faces,
            edges,
        })
    }

    /// Vertex positions in storage order
    pub fn vertices(&self) -> &[Point3d] {
        &self.vertices
    }

    /// Triangular faces in load order
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Deduplicated undirected edges
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Positions of the three corners of a face
    pub fn face_corners(&self, face: &Face) -> [Point3d; 3] {
        let [i0, i1, i2] = face.storage_indices();
        [self.vertices[i0], self.vertices[i1], self.vertices[i2]]
    }

    /// Split the mesh back into its parts
    pub fn into_parts(self) -> (Vec<Point3d>, Vec<Face>, Vec<Edge>) {
        (self.vertices, self.faces, self.edges)
    }
}
