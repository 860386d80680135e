//! Integration tests for qemcrate-quadric
//!
//! These tests run the whole pipeline on known solids and on random triangle
//! soups and check the geometric properties the output must satisfy.

use approx::assert_relative_eq;
use nalgebra::Vector4;
use qemcrate_core::{Face, LoadedMesh, MeshDiagnostic, Point3d, Quadric};
use qemcrate_quadric::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPSILON: f64 = 1e-9;

/// Regular tetrahedron inscribed in the cube [-1, 1]³.
/// Face `k` is the face opposite vertex `k`.
const TETRAHEDRON_OBJ: &str = "\
v 1 1 1
v 1 -1 -1
v -1 1 -1
v -1 -1 1
f 2 3 4
f 1 4 3
f 1 2 4
f 1 3 2
";

const CUBE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
f 1 3 2
f 1 4 3
f 5 6 7
f 5 7 8
f 1 2 6
f 1 6 5
f 2 3 7
f 2 7 6
f 3 4 8
f 3 8 7
f 4 1 5
f 4 5 8
";

fn tetrahedron_vertices() -> [Point3d; 4] {
    [
        Point3d::new(1.0, 1.0, 1.0),
        Point3d::new(1.0, -1.0, -1.0),
        Point3d::new(-1.0, 1.0, -1.0),
        Point3d::new(-1.0, -1.0, 1.0),
    ]
}

/// The face opposite vertex `v` lies on `v·x = -1`, so with `d < 0` its
/// normalized plane is `(-v, -1) / √3`.
fn analytic_tetrahedron_plane(opposite: &Point3d) -> Vector4<f64> {
    Vector4::new(-opposite.x, -opposite.y, -opposite.z, -1.0) / 3f64.sqrt()
}

/// Random soup of `face_count` triangles over `vertex_count` vertices, with
/// a collinear triple appended at the end of the vertex list.
fn random_soup(seed: u64, vertex_count: usize, face_count: usize) -> LoadedMesh {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut vertices: Vec<Point3d> = (0..vertex_count)
        .map(|_| {
            Point3d::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            )
        })
        .collect();
    vertices.push(Point3d::new(0.0, 0.0, 0.0));
    vertices.push(Point3d::new(1.0, 0.0, 0.0));
    vertices.push(Point3d::new(2.0, 0.0, 0.0));

    let mut faces: Vec<Face> = (0..face_count)
        .map(|_| {
            let a = rng.gen_range(1..=vertex_count);
            let mut b = rng.gen_range(1..=vertex_count);
            while b == a {
                b = rng.gen_range(1..=vertex_count);
            }
            let mut c = rng.gen_range(1..=vertex_count);
            while c == a || c == b {
                c = rng.gen_range(1..=vertex_count);
            }
            Face::new(a, b, c)
        })
        .collect();
    faces.push(Face::new(vertex_count + 1, vertex_count + 2, vertex_count + 3));

    LoadedMesh::new(vertices, faces).unwrap()
}

fn assert_symmetric_psd(q: &Quadric) {
    assert!(q.is_symmetric(EPSILON), "quadric is not symmetric: {:?}", q);
    let scale = q.matrix().norm().max(1.0);
    let eigen = q.matrix().symmetric_eigen();
    for &value in eigen.eigenvalues.iter() {
        assert!(value >= -EPSILON * scale, "negative eigenvalue {} in {:?}", value, q);
    }
}

#[test]
fn test_tetrahedron_planes_match_analytic() {
    let result = QuadricPipeline::default().run_source(TETRAHEDRON_OBJ).unwrap();
    let vertices = tetrahedron_vertices();

    assert_eq!(result.planes().len(), 4);
    for (face, opposite) in vertices.iter().enumerate() {
        let plane = result.face_plane(face).unwrap();
        assert_relative_eq!(
            plane.coefficients(),
            analytic_tetrahedron_plane(opposite),
            epsilon = EPSILON
        );
    }
}

#[test]
fn test_tetrahedron_quadrics_match_analytic() {
    let result = QuadricPipeline::default().run_source(TETRAHEDRON_OBJ).unwrap();
    let vertices = tetrahedron_vertices();

    for (v, quadric) in result.quadrics().iter().enumerate() {
        // Every face except the opposite one touches the vertex
        let expected = vertices
            .iter()
            .enumerate()
            .filter(|(face, _)| *face != v)
            .map(|(_, opposite)| {
                let p = analytic_tetrahedron_plane(opposite);
                p * p.transpose()
            })
            .fold(nalgebra::Matrix4::zeros(), |acc, m| acc + m);

        assert_relative_eq!(*quadric.matrix(), expected, epsilon = EPSILON);
        // The vertex lies on all three of its planes
        assert!(quadric.evaluate(&vertices[v]).abs() < EPSILON);
    }
}

#[test]
fn test_cube_edges_and_planes() {
    let result = QuadricPipeline::default().run_source(CUBE_OBJ).unwrap();
    assert_eq!(result.vertices().len(), 8);
    assert_eq!(result.faces().len(), 12);
    assert_eq!(result.edges().len(), 18);

    // Three sides of the cube pass through the origin
    assert_eq!(result.planes().len(), 12);
    assert!(result.degenerate_faces().is_empty());

    for (face, plane) in result.planes().iter() {
        for corner in result.mesh().face_corners(&result.faces()[face]) {
            assert!(plane.signed_distance(&corner).abs() < EPSILON);
        }
    }

    // Each corner touches three sides, so its quadric pins it exactly
    for (v, quadric) in result.quadrics().iter().enumerate() {
        assert!(quadric.evaluate(&result.vertices()[v]).abs() < EPSILON);
        assert!(quadric.evaluate(&Point3d::new(0.5, 0.5, 0.5)) > 0.1);
    }
}

#[test]
fn test_collinear_face_contributes_to_no_quadric() {
    let source = "\
v 0 0 0
v 1 0 0
v 2 0 0
v 0 1 3
f 1 2 3
f 1 2 4
";
    let result = QuadricPipeline::default().run_source(source).unwrap();
    assert_eq!(result.degenerate_faces(), vec![0]);
    assert_eq!(result.planes().len(), 1);

    let plane = result.face_plane(1).unwrap().quadric();
    assert_relative_eq!(*result.quadrics()[0].matrix(), *plane.matrix());
    assert_relative_eq!(*result.quadrics()[1].matrix(), *plane.matrix());
    // Vertex 3 only belongs to the collinear face
    assert!(result.quadrics()[2].is_zero());
}

#[test]
fn test_malformed_records_reduce_counts() {
    let source = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 not-a-number
v 0 0 1
f 1 2 3
f 1 2 3 4
f 1 3 4
";
    let result = QuadricPipeline::default().run_source(source).unwrap();
    assert_eq!(result.vertices().len(), 4);
    assert_eq!(result.faces().len(), 2);
    assert_eq!(result.quadrics().len(), 4);
    assert!(matches!(
        result.diagnostics()[0],
        MeshDiagnostic::MalformedVertex { line: 4, .. }
    ));
    assert!(matches!(
        result.diagnostics()[1],
        MeshDiagnostic::UnsupportedFace { line: 7, vertex_count: 4 }
    ));
}

#[test]
fn test_random_soup_properties() {
    for seed in 0..8 {
        let mesh = random_soup(seed, 40, 120);
        let face_count = mesh.face_count();
        let vertex_count = mesh.vertex_count();
        let result = QuadricPipeline::default().run(mesh).unwrap();

        assert_eq!(
            result.planes().len() + result.degenerate_faces().len(),
            face_count
        );
        assert!(result.degenerate_faces().contains(&(face_count - 1)));
        assert_eq!(result.quadrics().len(), vertex_count);

        for (face, plane) in result.planes().iter() {
            let normal_length = plane.normal().norm_squared();
            assert!((normal_length - 1.0).abs() < EPSILON);
            for corner in result.mesh().face_corners(&result.faces()[face]) {
                assert!(
                    plane.signed_distance(&corner).abs() < EPSILON,
                    "seed {} face {}: corner off plane",
                    seed,
                    face
                );
            }
        }

        for quadric in result.quadrics() {
            assert_symmetric_psd(quadric);
        }
    }
}

#[test]
fn test_quadrics_equal_direct_sum_over_incident_faces() {
    let mesh = random_soup(42, 30, 80);
    let result = QuadricPipeline::default().run(mesh).unwrap();

    for (v, quadric) in result.quadrics().iter().enumerate() {
        let expected: Quadric = result
            .faces()
            .iter()
            .enumerate()
            .filter(|(_, face)| face.storage_indices().contains(&v))
            .filter_map(|(f, _)| result.face_plane(f))
            .map(Quadric::from_plane)
            .sum();
        assert_relative_eq!(*quadric.matrix(), *expected.matrix(), epsilon = EPSILON);
    }
}

#[test]
fn test_sequential_and_parallel_agree() {
    let mesh = random_soup(7, 50, 150);
    let parallel = QuadricPipeline::default().run(mesh.clone()).unwrap();
    let sequential = QuadricPipeline::new(
        QuadricConfig::new().with_parallel(false).with_batch_size(16),
    )
    .run(mesh)
    .unwrap();

    assert_eq!(parallel.planes(), sequential.planes());
    assert_eq!(parallel.quadrics(), sequential.quadrics());
}

#[test]
fn test_progress_reaches_total() {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let pipeline = QuadricPipeline::new(QuadricConfig::new().with_batch_size(5)).with_progress(
        qemcrate_core::Progress::new(move |current, total, message| {
            sink.lock().unwrap().push((current, total, message.to_string()));
        }),
    );
    pipeline.run_source(CUBE_OBJ).unwrap();

    let seen = seen.lock().unwrap();
    assert!(seen.contains(&(12, 12, "Calculating plane equations".to_string())));
    assert!(seen.contains(&(8, 8, "Calculating quadrics".to_string())));
}

#[test]
fn test_empty_mesh_produces_empty_outputs() {
    let result = QuadricPipeline::default().run_source("# nothing here\n").unwrap();
    assert!(result.vertices().is_empty());
    assert!(result.planes().is_empty());
    assert!(result.quadrics().is_empty());

    let result = QuadricPipeline::default().run_source("v 1 2 3\n").unwrap();
    assert_eq!(result.quadrics().len(), 1);
    assert!(result.quadrics()[0].is_zero());
}

#[test]
fn test_run_path_missing_file() {
    let path = std::env::temp_dir().join("qemcrate-quadric-missing.obj");
    assert!(matches!(
        QuadricPipeline::default().run_path(&path),
        Err(qemcrate_core::Error::SourceUnavailable { .. })
    ));
}
