#![warn(missing_docs)]

//! Parametric base shapes for the shapekit kernel.
//!
//! Every mesh shape maps three ratios to a surface point and builds a closed
//! [`TriangleMesh`] by walking its faces as ratio grids with
//! [`quad_walk`](shapekit_mesh::quad_walk). Lattice shapes emit
//! [`Lattice`](shapekit_mesh::Lattice) beams instead.
//!
//! | Shape | `surface_point` ratios |
//! |-------|------------------------|
//! | [`BaseBox`] | length, width `[-1, 1]`, depth `[-1, 1]` |
//! | [`BaseCylinder`], [`BasePipe`], [`BasePipeSegment`] | length, phi, radius |
//! | [`BaseLens`] | height, phi, radius |
//! | [`BaseRing`] | phi, alpha, radius |
//! | [`BaseSphere`] | phi, theta, radius |
//! | [`BaseRevolve`] | length, phi, radius |

use std::sync::Arc;

use shapekit_frames::FramesError;
use shapekit_math::{FrameError, Point3};
use shapekit_mesh::{MeshBuilder, TriangleMesh};
use thiserror::Error;
use tracing::debug;

pub mod base_box;
pub mod cylinder;
pub mod lattice_pipe;
pub mod lens;
pub mod pipe;
pub mod revolve;
pub mod ring;
pub mod sphere;

pub use base_box::BaseBox;
pub use cylinder::BaseCylinder;
pub use lattice_pipe::{teardrop, LatticeManifold, LatticePipe, Teardrop, TipMode};
pub use lens::BaseLens;
pub use pipe::{BasePipe, BasePipeSegment, PipeSegmentRange};
pub use revolve::BaseRevolve;
pub use ring::BaseRing;
pub use sphere::BaseSphere;

/// Lower bound for every per-axis step count.
pub const MIN_STEPS: usize = 5;

/// Default step count per axis.
pub const DEFAULT_STEPS: usize = 32;

/// Final remap applied to every generated surface point.
pub type VertexTransform = Arc<dyn Fn(Point3) -> Point3 + Send + Sync>;

/// Errors from shape construction.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// Frame sampling failed.
    #[error(transparent)]
    Frames(#[from] FramesError),

    /// A local frame could not be built.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A dimension is non-positive or non-finite.
    #[error("{name} must be positive and finite, got {value}")]
    InvalidDimension {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// An overhang angle outside `(0, PI / 2)`.
    #[error("overhang angle must lie strictly between 0 and PI/2 radians, got {0}")]
    InvalidAngle(f64),
}

/// Result type for shape construction.
pub type Result<T> = std::result::Result<T, ShapeError>;

/// A shape that assembles into a closed triangle mesh.
pub trait BaseShape: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Surface point for three ratios; the meaning of each is per shape.
    fn surface_point(&self, a: f64, b: f64, c: f64) -> Point3;

    /// Emit every face into `builder`.
    fn emit(&self, builder: &mut MeshBuilder);

    /// Assemble the closed mesh with the default weld tolerance.
    fn construct(&self) -> TriangleMesh {
        let mut builder = MeshBuilder::new();
        self.emit(&mut builder);
        finish_outward(self.name(), builder)
    }
}

/// Finish `builder` and reverse the winding if the enclosed volume came out
/// negative, which happens for mirrored frames or inverted modulations.
pub fn finish_outward(name: &str, builder: MeshBuilder) -> TriangleMesh {
    let mut mesh = builder.finish();
    let volume = mesh.volume();
    if volume < 0.0 {
        debug!(shape = name, volume, "reversing inward winding");
        mesh.reverse_winding();
    }
    debug!(
        shape = name,
        triangles = mesh.num_triangles(),
        vertices = mesh.num_vertices(),
        "shape constructed"
    );
    mesh
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ShapeError::InvalidDimension { name, value })
    }
}

pub(crate) fn steps(n: usize) -> usize {
    n.max(MIN_STEPS)
}

pub(crate) fn unit(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

pub(crate) fn centered(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(-1.0, 1.0)
    }
}

pub(crate) fn apply(transform: &Option<VertexTransform>, p: Point3) -> Point3 {
    match transform {
        Some(f) => f(p),
        None => p,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_floor_and_clamps() {
        assert_eq!(steps(2), MIN_STEPS);
        assert_eq!(steps(40), 40);
        assert_eq!(unit(1.5), 1.0);
        assert_eq!(unit(f64::NAN), 0.0);
        assert_eq!(centered(-3.0), -1.0);
        assert_eq!(centered(0.25), 0.25);
    }

    #[test]
    fn test_positive() {
        assert!(positive("length", 1.0).is_ok());
        let err = positive("length", 0.0).unwrap_err();
        assert!(err.to_string().contains("length"));
        assert!(positive("length", f64::INFINITY).is_err());
    }

    #[test]
    fn test_apply_transform() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(apply(&None, p), p);
        let shift: VertexTransform = Arc::new(|q: Point3| q + shapekit_math::Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(apply(&Some(shift), p), Point3::new(1.0, 2.0, 4.0));
    }
}
