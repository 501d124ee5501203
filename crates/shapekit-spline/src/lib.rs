#![warn(missing_docs)]

//! Spline evaluation for the shapekit kernel.
//!
//! - [`ControlPointSpline`]: open (clamped) or closed (periodic) uniform
//!   B-spline over a list of control points, evaluated with De Boor basis
//!   functions.
//! - [`polyline`]: arc-length measurement and uniform reparametrization of
//!   point lists, plus small point-list transforms.

use thiserror::Error;

pub mod bspline;
pub mod polyline;

pub use bspline::{ControlPointSpline, SplineEnds};
pub use polyline::{
    linear_spine, polyline_length, resample_by_arc_length, rotate_points_about_z,
    sample_count_for_spacing, translate_points,
};

/// Errors that can occur while building splines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplineError {
    /// Fewer points than the operation needs.
    #[error("need at least {required} points, got {actual}")]
    TooFewPoints {
        /// Minimum number of points.
        required: usize,
        /// Number of points supplied.
        actual: usize,
    },

    /// A point has a NaN or infinite coordinate.
    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),

    /// Requested sample count below two.
    #[error("sample count must be at least 2, got {0}")]
    InvalidSampleCount(usize),
}

/// Result type for spline operations.
pub type Result<T> = std::result::Result<T, SplineError>;
