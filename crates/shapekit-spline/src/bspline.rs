//! Uniform B-spline curves over control points.

use shapekit_math::Point3;

use crate::{Result, SplineError};

/// Whether a spline starts and ends at its outer control points or loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplineEnds {
    /// Clamped knot vector; the curve interpolates the first and last point.
    Open,
    /// Periodic knot vector; the curve closes on itself.
    Closed,
}

/// A uniform B-spline defined by control points.
///
/// Evaluated over the normalized parameter `t ∈ [0, 1]`, clamped.
#[derive(Debug, Clone)]
pub struct ControlPointSpline {
    control_points: Vec<Point3>,
    knots: Vec<f64>,
    degree: usize,
    ends: SplineEnds,
}

/// Index `k` of the knot interval `[knots[k], knots[k + 1])` holding `u`,
/// restricted to the spans that carry the curve, `degree..=last`.
fn knot_span(knots: &[f64], last: usize, degree: usize, u: f64) -> usize {
    degree + knots[degree + 1..=last].partition_point(|&k| k <= u)
}

/// Clamped uniform knot vector over `[0, 1]`.
fn clamped_knots(n_points: usize, degree: usize) -> Vec<f64> {
    let m = n_points + degree + 1;
    let mut knots = vec![0.0; m];
    let n_internal = m - 2 * (degree + 1);
    for i in 0..=degree {
        knots[m - 1 - i] = 1.0;
    }
    for i in 1..=n_internal {
        knots[degree + i] = i as f64 / (n_internal + 1) as f64;
    }
    knots
}

impl ControlPointSpline {
    /// Build a spline of the given degree.
    ///
    /// The degree is lowered to `points.len() - 1` when there are too few
    /// control points to support it.
    pub fn new(control_points: Vec<Point3>, degree: usize, ends: SplineEnds) -> Result<Self> {
        if control_points.len() < 2 {
            return Err(SplineError::TooFewPoints {
                required: 2,
                actual: control_points.len(),
            });
        }
        if let Some(i) = control_points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(SplineError::NonFinitePoint(i));
        }

        let degree = degree.clamp(1, control_points.len() - 1);
        let (control_points, knots) = match ends {
            SplineEnds::Open => {
                let knots = clamped_knots(control_points.len(), degree);
                (control_points, knots)
            }
            SplineEnds::Closed => {
                let mut wrapped = control_points.clone();
                wrapped.extend_from_slice(&control_points[..degree]);
                let knots = (0..wrapped.len() + degree + 1).map(|i| i as f64).collect();
                (wrapped, knots)
            }
        };

        Ok(Self {
            control_points,
            knots,
            degree,
            ends,
        })
    }

    /// Open quadratic spline, the common case for smoothing spines.
    pub fn open(control_points: Vec<Point3>) -> Result<Self> {
        Self::new(control_points, 2, SplineEnds::Open)
    }

    /// Polynomial degree actually used.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// End condition.
    pub fn ends(&self) -> SplineEnds {
        self.ends
    }

    fn domain(&self) -> (f64, f64) {
        (
            self.knots[self.degree],
            self.knots[self.control_points.len()],
        )
    }

    /// Evaluate at normalized parameter `t`, clamped to `[0, 1]`.
    pub fn eval(&self, t: f64) -> Point3 {
        let (t_min, t_max) = self.domain();
        let u = t_min + t.clamp(0.0, 1.0) * (t_max - t_min);
        let p = self.degree;
        let span = knot_span(&self.knots, self.control_points.len() - 1, p, u);

        // de Boor: blend the p + 1 active control points down to one.
        let mut d: Vec<Point3> = self.control_points[span - p..=span].to_vec();
        for r in 1..=p {
            for j in (r..=p).rev() {
                let i = span - p + j;
                let width = self.knots[i + p + 1 - r] - self.knots[i];
                let alpha = if width > 0.0 { (u - self.knots[i]) / width } else { 0.0 };
                d[j] = d[j - 1] + (d[j] - d[j - 1]) * alpha;
            }
        }
        d[p]
    }

    /// `n` points at uniformly spaced parameters, endpoints included.
    pub fn sample(&self, n: usize) -> Result<Vec<Point3>> {
        if n < 2 {
            return Err(SplineError::InvalidSampleCount(n));
        }
        Ok((0..n)
            .map(|i| self.eval(i as f64 / (n - 1) as f64))
            .collect())
    }
}
