//! The [`Frames`] type and its construction modes.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use shapekit_math::vec_ops::orthogonal_dir;
use shapekit_math::{bisect, LocalFrame, Point3, Vec3};
use shapekit_spline::{polyline_length, resample_by_arc_length, ControlPointSpline};
use tracing::{debug, trace, warn};

use crate::align::{align_with_target_x, FramePolicy};
use crate::{FramesError, Result, Sampling};

/// Bisection tolerance on the length ratio for [`Frames::length_ratio_at_z`].
const RATIO_TOLERANCE: f64 = 1e-9;
const MAX_BISECT_ITERATIONS: usize = 100;

/// A sampled family of local frames along a spine.
///
/// All four arrays have the same length, at least two. Axes are unit length
/// and orthonormal at every sample with `local_y = local_z × local_x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frames {
    points: Vec<Point3>,
    local_x: Vec<Vec3>,
    local_y: Vec<Vec3>,
    local_z: Vec<Vec3>,
}

/// Evaluate `f` for every sample index, in parallel when enabled.
///
/// Order is preserved, so both paths produce identical arrays.
fn map_samples<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..n).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..n).map(f).collect()
    }
}

/// Forward-difference tangents.
///
/// Sample `i` takes the direction to sample `i + 1`. The end samples copy
/// their neighbour, so a two-point spine gets its one segment direction
/// twice.
fn forward_tangents(points: &[Point3]) -> Result<Vec<Vec3>> {
    let differences = points
        .windows(2)
        .map(|w| (w[1] - w[0]).try_normalize(1e-12).ok_or(FramesError::DegenerateSpine))
        .collect::<Result<Vec<_>>>()?;
    let mut tangents = match differences.as_slice() {
        [] => return Err(FramesError::DegenerateSpine),
        [only] => vec![*only],
        [_, interior @ ..] => {
            let mut tangents = Vec::with_capacity(points.len());
            tangents.push(interior[0]);
            tangents.extend_from_slice(interior);
            tangents
        }
    };
    let last = tangents[tangents.len() - 1];
    tangents.push(last);
    Ok(tangents)
}

fn resample(spine: &[Point3], sampling: Sampling) -> Result<Vec<Point3>> {
    let length = polyline_length(spine);
    let points = resample_by_arc_length(spine, sampling.resolve(length))?;
    if length <= 0.0 {
        return Err(FramesError::DegenerateSpine);
    }
    Ok(points)
}

/// Linear interpolation of a direction, renormalized.
///
/// Falls back to `a` when the blend cancels out.
fn lerp_dir(a: &Vec3, b: &Vec3, t: f64) -> Vec3 {
    let v = a * (1.0 - t) + b * t;
    v.try_normalize(1e-12).unwrap_or(*a)
}

impl Frames {
    /// Constant frame pushed `length` along its own Z axis.
    pub fn extrude(frame: &LocalFrame, length: f64, sampling: Sampling) -> Result<Self> {
        if !(length.is_finite() && length > 0.0) {
            return Err(FramesError::InvalidLength(length));
        }
        let start = frame.position();
        let end = start + frame.local_z() * length;
        Self::extrude_along(frame, &[start, end], sampling)
    }

    /// Constant frame carried along `spine`.
    ///
    /// Every sample gets the frame's axes unchanged; only positions follow
    /// the (resampled) spine.
    pub fn extrude_along(frame: &LocalFrame, spine: &[Point3], sampling: Sampling) -> Result<Self> {
        let points = resample(spine, sampling)?;
        let n = points.len();
        let frames = Self {
            local_x: vec![frame.local_x(); n],
            local_y: vec![frame.local_y(); n],
            local_z: vec![frame.local_z(); n],
            points,
        };
        debug!(samples = n, length = frames.total_length(), "extruded frames");
        Ok(frames)
    }

    /// Tangent-following frames with X aligned toward a fixed direction.
    ///
    /// Points and axes are smoothed afterwards by an open B-spline through
    /// the samples and re-orthonormalized.
    pub fn with_target_x(spine: &[Point3], target_x: &Vec3, sampling: Sampling) -> Result<Self> {
        let points = resample(spine, sampling)?;
        let tangents = forward_tangents(&points)?;
        if target_x.norm() < 1e-12 {
            warn!("zero-length target X; frames fall back to orthogonal directions");
        }

        let local_x = map_samples(points.len(), |i| align_with_target_x(&tangents[i], target_x));
        let frames = Self::assemble(points, tangents, local_x).smoothed()?;
        debug!(
            samples = frames.sample_count(),
            length = frames.total_length(),
            "built target-x frames"
        );
        Ok(frames)
    }

    /// Tangent-following frames with a per-sample X target.
    pub fn with_policy(spine: &[Point3], policy: FramePolicy, sampling: Sampling) -> Result<Self> {
        let points = resample(spine, sampling)?;
        let tangents = forward_tangents(&points)?;

        let local_x = if policy.is_sequential() {
            // Each sample aligns to its predecessor's X.
            tangents
                .iter()
                .scan(policy.target(&points[0]), |previous, tangent| {
                    let x = align_with_target_x(tangent, previous);
                    *previous = x;
                    Some(x)
                })
                .collect()
        } else {
            map_samples(points.len(), |i| {
                let target = policy.target(&points[i]);
                if target.norm() < 1e-12 {
                    trace!(sample = i, ?policy, "degenerate target, keeping orthogonal direction");
                }
                align_with_target_x(&tangents[i], &target)
            })
        };

        let frames = Self::assemble(points, tangents, local_x);
        debug!(
            samples = frames.sample_count(),
            length = frames.total_length(),
            ?policy,
            "built policy frames"
        );
        Ok(frames)
    }

    fn assemble(points: Vec<Point3>, local_z: Vec<Vec3>, local_x: Vec<Vec3>) -> Self {
        let local_y = local_z.iter().zip(&local_x).map(|(z, x)| z.cross(x)).collect();
        Self {
            points,
            local_x,
            local_y,
            local_z,
        }
    }

    /// Fit open splines through points and axes and resample at the same
    /// count.
    fn smoothed(self) -> Result<Self> {
        let n = self.points.len();
        let smooth = |values: Vec<Point3>| -> Result<Vec<Point3>> {
            Ok(ControlPointSpline::open(values)?.sample(n)?)
        };
        let as_points = |v: &[Vec3]| v.iter().map(|v| Point3::from(*v)).collect::<Vec<_>>();

        let points = smooth(self.points)?;
        let zs = smooth(as_points(&self.local_z))?;
        let xs = smooth(as_points(&self.local_x))?;

        let mut local_x = Vec::with_capacity(n);
        let mut local_y = Vec::with_capacity(n);
        let mut local_z = Vec::with_capacity(n);
        for (i, (z, x)) in zs.iter().zip(&xs).enumerate() {
            let z = z.coords.try_normalize(1e-12).unwrap_or(self.local_z[i]);
            let x = (x.coords - z * x.coords.dot(&z))
                .try_normalize(1e-12)
                .unwrap_or_else(|| align_with_target_x(&z, &self.local_x[i]));
            local_y.push(z.cross(&x));
            local_x.push(x);
            local_z.push(z);
        }

        Ok(Self {
            points,
            local_x,
            local_y,
            local_z,
        })
    }

    /// Fractional sample position for `ratio`, clamped to `[0, 1]`.
    fn bracket(&self, ratio: f64) -> (usize, usize, f64) {
        let last = self.points.len() - 1;
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        let position = ratio * last as f64;
        let lo = (position.floor() as usize).min(last);
        let hi = (lo + 1).min(last);
        (lo, hi, position - lo as f64)
    }

    /// Spine position at `ratio`.
    pub fn spine_at(&self, ratio: f64) -> Point3 {
        let (lo, hi, t) = self.bracket(ratio);
        if t == 0.0 {
            return self.points[lo];
        }
        self.points[lo] + (self.points[hi] - self.points[lo]) * t
    }

    /// Local X axis at `ratio`.
    pub fn local_x_at(&self, ratio: f64) -> Vec3 {
        let (lo, hi, t) = self.bracket(ratio);
        lerp_dir(&self.local_x[lo], &self.local_x[hi], t)
    }

    /// Local Y axis at `ratio`.
    pub fn local_y_at(&self, ratio: f64) -> Vec3 {
        let (lo, hi, t) = self.bracket(ratio);
        lerp_dir(&self.local_y[lo], &self.local_y[hi], t)
    }

    /// Local Z axis (tangent) at `ratio`.
    pub fn local_z_at(&self, ratio: f64) -> Vec3 {
        let (lo, hi, t) = self.bracket(ratio);
        lerp_dir(&self.local_z[lo], &self.local_z[hi], t)
    }

    /// Orthonormal `(x, y, z)` at `ratio`.
    ///
    /// Z is the interpolated tangent, X the interpolated X with its Z
    /// component removed, `y = z × x`.
    pub fn axes_at(&self, ratio: f64) -> (Vec3, Vec3, Vec3) {
        let z = self.local_z_at(ratio);
        let x = self.local_x_at(ratio);
        let x = (x - z * x.dot(&z))
            .try_normalize(1e-12)
            .unwrap_or_else(|| orthogonal_dir(&z));
        (x, z.cross(&x), z)
    }

    /// Full frame at `ratio`, with X re-orthogonalized against the
    /// interpolated Z.
    pub fn local_frame_at(&self, ratio: f64) -> Result<LocalFrame> {
        let (x, _, z) = self.axes_at(ratio);
        Ok(LocalFrame::with_axes(self.spine_at(ratio), z, x)?)
    }

    /// Arc length of the sampled spine.
    pub fn total_length(&self) -> f64 {
        polyline_length(&self.points)
    }

    /// Number of stored samples.
    pub fn sample_count(&self) -> usize {
        self.points.len()
    }

    /// Stored sample positions.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Length ratio at which the spine reaches world height `z`.
    ///
    /// Requires the spine to cross `z` between its ends.
    pub fn length_ratio_at_z(&self, z: f64) -> Result<f64> {
        let ratio = bisect(
            |r| self.spine_at(r).z,
            z,
            0.0,
            1.0,
            RATIO_TOLERANCE,
            MAX_BISECT_ITERATIONS,
        )?;
        Ok(ratio)
    }
}
