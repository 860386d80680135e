//! Point and vector aliases

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A homogeneous 4-vector with double precision components
pub type Vector4d = Vector4<f64>;

/// A 4x4 matrix with double precision entries
pub type Matrix4d = Matrix4<f64>;
