#![warn(missing_docs)]

//! Scalar modulation fields.
//!
//! A modulation gives a physical dimension (radius, width, height) as a
//! function of one ratio ([`LineModulation`]) or of an angle and a ratio
//! ([`SurfaceModulation`]). Both are plain enums with a single `evaluate`
//! dispatch. Sums, differences and scalings are stored lazily and evaluated
//! at query time.
//!
//! Ratios outside `[0, 1]` are clamped, never rejected.

use thiserror::Error;

pub mod line;
pub mod raster;
pub mod surface;

pub use line::{Axis, DiscreteTable, LineFn, LineModulation};
pub use raster::{GrayscaleBuffer, GrayscaleImage, ImageModulation};
pub use surface::{SurfaceAxis, SurfaceFn, SurfaceModulation};

/// Errors raised while building modulations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModulationError {
    /// A discrete table needs at least one sample.
    #[error("discrete modulation needs at least one sample")]
    EmptyTable,

    /// A table sample has a NaN or infinite coordinate.
    #[error("sample {0} has a non-finite coordinate")]
    NonFiniteSample(usize),

    /// Pixel buffer length does not match its dimensions.
    #[error("pixel buffer of {actual} values does not match {width}x{height}")]
    BufferSize {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// An image with no pixels.
    #[error("image has no pixels")]
    EmptyImage,
}

/// Result type for modulation construction.
pub type Result<T> = std::result::Result<T, ModulationError>;

/// Clamp a ratio into `[0, 1]`; NaN maps to zero.
pub(crate) fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}
