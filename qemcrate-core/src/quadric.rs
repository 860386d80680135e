//! Quadric error matrices
//!
//! A quadric is the symmetric 4x4 matrix `Σ p·pᵗ` over a set of planes `p`.
//! For a homogeneous point `v = [x, y, z, 1]` the product `vᵗ·Q·v` is the sum
//! of squared distances from the point to those planes.

use crate::plane::PlaneEquation;
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Per-vertex quadric error matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadric {
    matrix: Matrix4d,
}

impl Quadric {
    /// The zero quadric, contributed by no planes
    pub fn zero() -> Self {
        Self {
            matrix: Matrix4d::zeros(),
        }
    }

    /// The outer product `p·pᵗ` of a plane's coefficient vector
    pub fn from_plane(plane: &PlaneEquation) -> Self {
        let p = plane.coefficients();
        Self {
            matrix: p * p.transpose(),
        }
    }

    /// The underlying matrix
    pub fn matrix(&self) -> &Matrix4d {
        &self.matrix
    }

    /// Whether no plane has contributed to this quadric
    pub fn is_zero(&self) -> bool {
        self.matrix.iter().all(|&x| x == 0.0)
    }

    /// Sum of squared distances from `point` to the contributing planes
    pub fn evaluate(&self, point: &Point3d) -> f64 {
        let v = point.to_homogeneous();
        (v.transpose() * self.matrix * v)[0]
    }

    /// Whether `Q == Qᵗ` within `epsilon`
    pub fn is_symmetric(&self, epsilon: f64) -> bool {
        (0..4).all(|i| (0..i).all(|j| (self.matrix[(i, j)] - self.matrix[(j, i)]).abs() <= epsilon))
    }
}

impl Default for Quadric {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Quadric {
    type Output = Quadric;

    fn add(self, rhs: Quadric) -> Quadric {
        Quadric {
            matrix: self.matrix + rhs.matrix,
        }
    }
}

impl AddAssign for Quadric {
    fn add_assign(&mut self, rhs: Quadric) {
        self.matrix += rhs.matrix;
    }
}

impl Sum for Quadric {
    fn sum<I: Iterator<Item = Quadric>>(iter: I) -> Quadric {
        iter.fold(Quadric::zero(), |acc, q| acc + q)
    }
}
