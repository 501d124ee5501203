//! One-dimensional modulation over a length ratio.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use shapekit_math::Point3;
use tracing::trace;

use crate::{clamp_ratio, ModulationError, Result};

/// Shared closure type for [`LineModulation::Function`].
pub type LineFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// World coordinate axis used to read a discrete table from points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X coordinate.
    X,
    /// Y coordinate.
    Y,
    /// Z coordinate.
    Z,
}

impl Axis {
    /// The matching coordinate of `p`.
    pub fn component(&self, p: &Point3) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }
}

/// Sorted `(axis, value)` samples, interpolated piecewise linearly.
///
/// Queries below the first sample return the first value; queries at or
/// beyond the last sample return the last value.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteTable {
    samples: Vec<(f64, f64)>,
}

impl DiscreteTable {
    /// Build from unordered `(axis, value)` pairs.
    ///
    /// Pairs are sorted by axis, keeping the supplied order among equal axis
    /// values.
    pub fn new(mut samples: Vec<(f64, f64)>) -> Result<Self> {
        if samples.is_empty() {
            return Err(ModulationError::EmptyTable);
        }
        if let Some(i) = samples
            .iter()
            .position(|(a, v)| !(a.is_finite() && v.is_finite()))
        {
            return Err(ModulationError::NonFiniteSample(i));
        }
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        trace!(
            samples = samples.len(),
            from = samples[0].0,
            to = samples[samples.len() - 1].0,
            "built discrete table"
        );
        Ok(Self { samples })
    }

    /// Build from 3D points, reading the axis and value from chosen
    /// coordinates.
    pub fn from_points(points: &[Point3], axis: Axis, value: Axis) -> Result<Self> {
        Self::new(
            points
                .iter()
                .map(|p| (axis.component(p), value.component(p)))
                .collect(),
        )
    }

    /// Sorted samples.
    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    /// Interpolated value at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let (first, last) = (self.samples[0], self.samples[self.samples.len() - 1]);
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }
        // first.0 < x < last.0, so 1 <= hi < len.
        let hi = self.samples.partition_point(|s| s.0 <= x);
        let (a, b) = (self.samples[hi - 1], self.samples[hi]);
        let t = (x - a.0) / (b.0 - a.0);
        a.1 + (b.1 - a.1) * t
    }
}

/// A scalar field over a length ratio in `[0, 1]`.
#[derive(Clone)]
pub enum LineModulation {
    /// The same value everywhere.
    Constant(f64),
    /// A procedural function of the ratio.
    Function(LineFn),
    /// Piecewise-linear table.
    Discrete(DiscreteTable),
    /// Pointwise sum.
    Sum(Box<LineModulation>, Box<LineModulation>),
    /// Pointwise difference, left minus right.
    Difference(Box<LineModulation>, Box<LineModulation>),
    /// Operand times a factor.
    Scaled(Box<LineModulation>, f64),
}

impl LineModulation {
    /// Constant modulation.
    pub fn constant(value: f64) -> Self {
        LineModulation::Constant(value)
    }

    /// Modulation from a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        LineModulation::Function(Arc::new(f))
    }

    /// Piecewise-linear modulation from `(ratio, value)` pairs.
    pub fn discrete(samples: Vec<(f64, f64)>) -> Result<Self> {
        Ok(LineModulation::Discrete(DiscreteTable::new(samples)?))
    }

    /// Piecewise-linear modulation read from point coordinates.
    pub fn from_points(points: &[Point3], axis: Axis, value: Axis) -> Result<Self> {
        Ok(LineModulation::Discrete(DiscreteTable::from_points(
            points, axis, value,
        )?))
    }

    /// Value at `ratio`, clamped to `[0, 1]`.
    pub fn evaluate(&self, ratio: f64) -> f64 {
        let ratio = clamp_ratio(ratio);
        match self {
            LineModulation::Constant(c) => *c,
            LineModulation::Function(f) => f(ratio),
            LineModulation::Discrete(table) => table.evaluate(ratio),
            LineModulation::Sum(a, b) => a.evaluate(ratio) + b.evaluate(ratio),
            LineModulation::Difference(a, b) => a.evaluate(ratio) - b.evaluate(ratio),
            LineModulation::Scaled(a, k) => a.evaluate(ratio) * k,
        }
    }

    /// Lazy pointwise sum.
    pub fn add(self, other: LineModulation) -> Self {
        LineModulation::Sum(Box::new(self), Box::new(other))
    }

    /// Lazy pointwise difference.
    pub fn sub(self, other: LineModulation) -> Self {
        LineModulation::Difference(Box::new(self), Box::new(other))
    }

    /// Lazy scaling.
    pub fn scale(self, factor: f64) -> Self {
        LineModulation::Scaled(Box::new(self), factor)
    }
}

impl fmt::Debug for LineModulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineModulation::Constant(c) => f.debug_tuple("Constant").field(c).finish(),
            LineModulation::Function(_) => f.write_str("Function(..)"),
            LineModulation::Discrete(t) => f
                .debug_struct("Discrete")
                .field("samples", &t.samples.len())
                .finish(),
            LineModulation::Sum(a, b) => f.debug_tuple("Sum").field(a).field(b).finish(),
            LineModulation::Difference(a, b) => {
                f.debug_tuple("Difference").field(a).field(b).finish()
            }
            LineModulation::Scaled(a, k) => f.debug_tuple("Scaled").field(a).field(k).finish(),
        }
    }
}

impl Default for LineModulation {
    fn default() -> Self {
        LineModulation::Constant(0.0)
    }
}

impl From<f64> for LineModulation {
    fn from(value: f64) -> Self {
        LineModulation::Constant(value)
    }
}

impl Add for LineModulation {
    type Output = LineModulation;
    fn add(self, rhs: LineModulation) -> LineModulation {
        LineModulation::add(self, rhs)
    }
}

impl Sub for LineModulation {
    type Output = LineModulation;
    fn sub(self, rhs: LineModulation) -> LineModulation {
        LineModulation::sub(self, rhs)
    }
}

impl Mul<f64> for LineModulation {
    type Output = LineModulation;
    fn mul(self, rhs: f64) -> LineModulation {
        self.scale(rhs)
    }
}

impl Neg for LineModulation {
    type Output = LineModulation;
    fn neg(self) -> LineModulation {
        self.scale(-1.0)
    }
}
