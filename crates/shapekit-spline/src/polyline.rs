//! Arc-length operations on point lists.

use shapekit_math::vec_ops::rotate_about_z;
use shapekit_math::{Point3, Vec3};
use tracing::{trace, warn};

use crate::{Result, SplineError};

fn check_points(points: &[Point3]) -> Result<()> {
    if points.len() < 2 {
        return Err(SplineError::TooFewPoints {
            required: 2,
            actual: points.len(),
        });
    }
    match points
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
    {
        Some(i) => Err(SplineError::NonFinitePoint(i)),
        None => Ok(()),
    }
}

/// Sum of consecutive segment lengths.
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
}

/// Number of samples needed to space points at most `spacing` apart.
///
/// Never less than two.
pub fn sample_count_for_spacing(length: f64, spacing: f64) -> usize {
    if !(spacing > 0.0) || !length.is_finite() {
        return 2;
    }
    ((length / spacing).ceil() as usize + 1).max(2)
}

/// Reparametrize a polyline to `n` points uniformly spaced by arc length.
///
/// The first and last input points are reproduced exactly. A zero-length
/// polyline yields `n` copies of its first point.
pub fn resample_by_arc_length(points: &[Point3], n: usize) -> Result<Vec<Point3>> {
    check_points(points)?;
    if n < 2 {
        return Err(SplineError::InvalidSampleCount(n));
    }

    let mut cumulative = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    cumulative.push(0.0);
    for w in points.windows(2) {
        acc += (w[1] - w[0]).norm();
        cumulative.push(acc);
    }
    let total = acc;
    if total <= 0.0 {
        warn!(points = points.len(), "zero-length polyline, repeating first point");
        return Ok(vec![points[0]; n]);
    }

    let mut out = Vec::with_capacity(n);
    out.push(points[0]);
    let mut seg = 0;
    for i in 1..n - 1 {
        let target = total * i as f64 / (n - 1) as f64;
        while seg + 2 < cumulative.len() && cumulative[seg + 1] < target {
            seg += 1;
        }
        let seg_len = cumulative[seg + 1] - cumulative[seg];
        let local = if seg_len > 0.0 {
            ((target - cumulative[seg]) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(points[seg] + (points[seg + 1] - points[seg]) * local);
    }
    out.push(points[points.len() - 1]);
    trace!(input = points.len(), samples = n, length = total, "resampled polyline");
    Ok(out)
}

/// Straight spine of `n` points from `start` along `dir` for `length`.
pub fn linear_spine(start: Point3, dir: &Vec3, length: f64, n: usize) -> Result<Vec<Point3>> {
    if n < 2 {
        return Err(SplineError::InvalidSampleCount(n));
    }
    let step = dir.try_normalize(1e-12).unwrap_or_else(Vec3::z) * length;
    Ok((0..n)
        .map(|i| start + step * (i as f64 / (n - 1) as f64))
        .collect())
}

/// Every point moved by `offset`.
pub fn translate_points(points: &[Point3], offset: &Vec3) -> Vec<Point3> {
    points.iter().map(|p| p + offset).collect()
}

/// Every point rotated about the world Z axis by `angle` radians.
pub fn rotate_points_about_z(points: &[Point3], angle: f64) -> Vec<Point3> {
    points
        .iter()
        .map(|p| Point3::from(rotate_about_z(&p.coords, angle)))
        .collect()
}
