//! Two-dimensional modulation over an angle and a ratio.

use std::f64::consts::TAU;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use crate::clamp_ratio;
use crate::line::LineModulation;
use crate::raster::ImageModulation;

/// Shared closure type for [`SurfaceModulation::Function`].
///
/// Arguments are `(phi, ratio)` with `phi` in radians.
pub type SurfaceFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Which surface argument a broadcast line modulation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAxis {
    /// The angle, as `phi / 2π` wrapped into `[0, 1)`.
    Phi,
    /// The length or radius ratio.
    Ratio,
}

/// A scalar field over `(phi, ratio)`.
///
/// `phi` is an angle in radians; `ratio` is clamped to `[0, 1]`.
#[derive(Clone)]
pub enum SurfaceModulation {
    /// The same value everywhere.
    Constant(f64),
    /// A procedural function of `(phi, ratio)`.
    Function(SurfaceFn),
    /// A line modulation broadcast across the other argument.
    FromLine(LineModulation, SurfaceAxis),
    /// Bilinear image sample through a value mapping.
    Image(ImageModulation),
    /// Pointwise sum.
    Sum(Box<SurfaceModulation>, Box<SurfaceModulation>),
    /// Pointwise difference, left minus right.
    Difference(Box<SurfaceModulation>, Box<SurfaceModulation>),
    /// Operand times a factor.
    Scaled(Box<SurfaceModulation>, f64),
}

impl SurfaceModulation {
    /// Constant modulation.
    pub fn constant(value: f64) -> Self {
        SurfaceModulation::Constant(value)
    }

    /// Modulation from a closure of `(phi, ratio)`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        SurfaceModulation::Function(Arc::new(f))
    }

    /// Line modulation over the ratio, constant in `phi`.
    pub fn along_ratio(line: LineModulation) -> Self {
        SurfaceModulation::FromLine(line, SurfaceAxis::Ratio)
    }

    /// Line modulation over the angle, constant in the ratio.
    pub fn around_phi(line: LineModulation) -> Self {
        SurfaceModulation::FromLine(line, SurfaceAxis::Phi)
    }

    /// Value at `(phi, ratio)`.
    pub fn evaluate(&self, phi: f64, ratio: f64) -> f64 {
        let ratio = clamp_ratio(ratio);
        match self {
            SurfaceModulation::Constant(c) => *c,
            SurfaceModulation::Function(f) => f(phi, ratio),
            SurfaceModulation::FromLine(line, SurfaceAxis::Ratio) => line.evaluate(ratio),
            SurfaceModulation::FromLine(line, SurfaceAxis::Phi) => {
                line.evaluate(phi.rem_euclid(TAU) / TAU)
            }
            SurfaceModulation::Image(image) => image.evaluate(phi, ratio),
            SurfaceModulation::Sum(a, b) => a.evaluate(phi, ratio) + b.evaluate(phi, ratio),
            SurfaceModulation::Difference(a, b) => {
                a.evaluate(phi, ratio) - b.evaluate(phi, ratio)
            }
            SurfaceModulation::Scaled(a, k) => a.evaluate(phi, ratio) * k,
        }
    }

    /// Lazy pointwise sum.
    pub fn add(self, other: SurfaceModulation) -> Self {
        SurfaceModulation::Sum(Box::new(self), Box::new(other))
    }

    /// Lazy pointwise difference.
    pub fn sub(self, other: SurfaceModulation) -> Self {
        SurfaceModulation::Difference(Box::new(self), Box::new(other))
    }

    /// Lazy scaling.
    pub fn scale(self, factor: f64) -> Self {
        SurfaceModulation::Scaled(Box::new(self), factor)
    }
}

impl fmt::Debug for SurfaceModulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceModulation::Constant(c) => f.debug_tuple("Constant").field(c).finish(),
            SurfaceModulation::Function(_) => f.write_str("Function(..)"),
            SurfaceModulation::FromLine(line, axis) => {
                f.debug_tuple("FromLine").field(line).field(axis).finish()
            }
            SurfaceModulation::Image(image) => f.debug_tuple("Image").field(image).finish(),
            SurfaceModulation::Sum(a, b) => f.debug_tuple("Sum").field(a).field(b).finish(),
            SurfaceModulation::Difference(a, b) => {
                f.debug_tuple("Difference").field(a).field(b).finish()
            }
            SurfaceModulation::Scaled(a, k) => f.debug_tuple("Scaled").field(a).field(k).finish(),
        }
    }
}

impl Default for SurfaceModulation {
    fn default() -> Self {
        SurfaceModulation::Constant(0.0)
    }
}

impl From<f64> for SurfaceModulation {
    fn from(value: f64) -> Self {
        SurfaceModulation::Constant(value)
    }
}

impl From<LineModulation> for SurfaceModulation {
    fn from(line: LineModulation) -> Self {
        SurfaceModulation::along_ratio(line)
    }
}

impl From<ImageModulation> for SurfaceModulation {
    fn from(image: ImageModulation) -> Self {
        SurfaceModulation::Image(image)
    }
}

impl Add for SurfaceModulation {
    type Output = SurfaceModulation;
    fn add(self, rhs: SurfaceModulation) -> SurfaceModulation {
        SurfaceModulation::add(self, rhs)
    }
}

impl Sub for SurfaceModulation {
    type Output = SurfaceModulation;
    fn sub(self, rhs: SurfaceModulation) -> SurfaceModulation {
        SurfaceModulation::sub(self, rhs)
    }
}

impl Mul<f64> for SurfaceModulation {
    type Output = SurfaceModulation;
    fn mul(self, rhs: f64) -> SurfaceModulation {
        self.scale(rhs)
    }
}

impl Neg for SurfaceModulation {
    type Output = SurfaceModulation;
    fn neg(self) -> SurfaceModulation {
        self.scale(-1.0)
    }
}
