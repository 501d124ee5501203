#![warn(missing_docs)]

//! Math types for the shapekit modeling kernel.
//!
//! nalgebra aliases for points and vectors, an affine [`Transform`] for
//! placing finished meshes, and the immutable [`LocalFrame`] every shape is
//! built in.

use nalgebra::{Matrix4, Unit, Vector3, Vector4};

pub mod frame;
pub mod solver;
pub mod vec_ops;

pub use frame::{FrameError, LocalFrame};
pub use solver::{bisect, SolverError};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// Affine map applied to finished meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Homogeneous matrix; the bottom row is `0 0 0 1`.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// The identity map.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(0, 3)] = dx;
        matrix[(1, 3)] = dy;
        matrix[(2, 3)] = dz;
        Self { matrix }
    }

    /// Per-axis scale about the origin.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)),
        }
    }

    /// Map a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
