//! Plane equations

use crate::point::*;
use crate::quadric::Quadric;
use serde::{Deserialize, Serialize};

/// The implicit plane `a·x + b·y + c·z + d = 0` with a unit normal `(a, b, c)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneEquation {
    coefficients: Vector4d,
}

impl PlaneEquation {
    /// Normalize `(a, b, c, d)` by the length of `(a, b, c)`.
    ///
    /// Returns `None` when the normal has zero or non-finite length.
    pub fn from_unnormalized(normal: Vector3d, d: f64) -> Option<Self> {
        let length = normal.norm();
        if !(length.is_finite() && length > 0.0) || !d.is_finite() {
            return None;
        }
        Some(Self {
            coefficients: Vector4d::new(normal.x, normal.y, normal.z, d) / length,
        })
    }

    /// The coefficients `(a, b, c, d)`
    pub fn coefficients(&self) -> Vector4d {
        self.coefficients
    }

    /// The unit normal `(a, b, c)`
    pub fn normal(&self) -> Vector3d {
        self.coefficients.xyz()
    }

    /// The offset `d`
    pub fn offset(&self) -> f64 {
        self.coefficients.w
    }

    /// Signed distance from `point` to the plane
    pub fn signed_distance(&self, point: &Point3d) -> f64 {
        self.normal().dot(&point.coords) + self.offset()
    }

    /// Flip the orientation of the plane
    pub fn flipped(&self) -> Self {
        Self {
            coefficients: -self.coefficients,
        }
    }

    /// The fundamental error quadric `p·pᵗ` of this plane
    pub fn quadric(&self) -> Quadric {
        Quadric::from_plane(self)
    }
}
