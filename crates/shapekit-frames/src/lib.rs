#![warn(missing_docs)]

//! Moving local frames along spine curves.
//!
//! A [`Frames`] instance owns an arc-length-uniform resampling of a spine and
//! one orthonormal frame per sample. Queries take a length ratio in `[0, 1]`
//! and interpolate linearly between the two bracketing samples, so smooth
//! orientation needs a dense sampling.
//!
//! Four ways to build one:
//!
//! - [`Frames::extrude`]: a constant frame pushed along its own Z axis.
//! - [`Frames::extrude_along`]: a constant frame carried along a spine.
//! - [`Frames::with_target_x`]: tangent-following frames whose X axis is
//!   aligned with a fixed direction, then spline-smoothed.
//! - [`Frames::with_policy`]: tangent-following frames whose X target is
//!   derived per sample from a [`FramePolicy`].

use shapekit_math::{FrameError, SolverError};
use shapekit_spline::SplineError;
use thiserror::Error;

pub mod align;
pub mod frames;

pub use align::{align_with_target_x, FramePolicy, ALIGN_STEPS};
pub use frames::Frames;

/// Default spacing between frame samples in model units.
pub const DEFAULT_SAMPLE_SPACING: f64 = 0.5;

/// Lower bound on the number of samples chosen from a spacing.
pub const MIN_FRAME_SAMPLES: usize = 5;

/// How many samples a [`Frames`] instance keeps along its spine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sampling {
    /// Samples at most this far apart, but never fewer than
    /// [`MIN_FRAME_SAMPLES`].
    Spacing(f64),
    /// Exactly this many samples.
    Count(usize),
}

impl Sampling {
    /// Resolve to a sample count for a spine of the given length.
    pub fn resolve(&self, length: f64) -> usize {
        match *self {
            Sampling::Spacing(spacing) => {
                shapekit_spline::sample_count_for_spacing(length, spacing).max(MIN_FRAME_SAMPLES)
            }
            Sampling::Count(n) => n,
        }
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling::Spacing(DEFAULT_SAMPLE_SPACING)
    }
}

/// Errors raised while building or querying [`Frames`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FramesError {
    /// Resampling or smoothing the spine failed.
    #[error(transparent)]
    Spline(#[from] SplineError),

    /// A frame could not be assembled from the interpolated axes.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// An inverse query did not find a root.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Every spine point coincides, so no tangent exists.
    #[error("spine has zero length")]
    DegenerateSpine,

    /// Extrusion length is zero, negative, or not finite.
    #[error("extrusion length must be positive and finite, got {0}")]
    InvalidLength(f64),
}

/// Result type for frame operations.
pub type Result<T> = std::result::Result<T, FramesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_resolve() {
        assert_eq!(Sampling::Spacing(1.0).resolve(10.0), 11);
        assert_eq!(Sampling::Spacing(1.0).resolve(1.0), MIN_FRAME_SAMPLES);
        assert_eq!(Sampling::Count(3).resolve(100.0), 3);
        assert_eq!(Sampling::default(), Sampling::Spacing(DEFAULT_SAMPLE_SPACING));
    }
}
