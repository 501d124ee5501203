//! X-axis alignment about a tangent.

use shapekit_math::vec_ops::{flip_for_alignment, orthogonal_dir, planar_dir, rotate_about_axis};
use shapekit_math::{Point3, Vec3};

/// Number of 1° candidates tried by [`align_with_target_x`].
pub const ALIGN_STEPS: usize = 180;

/// Per-sample rule for choosing the X target of tangent-following frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePolicy {
    /// X points away from the world Z axis (XY projection of the position).
    Cylindrical,
    /// X points away from the world origin.
    Spherical,
    /// X leans toward world +Z.
    #[default]
    FixedZ,
    /// X follows the previous sample's X, seeded as [`FramePolicy::FixedZ`].
    MinRotation,
}

impl FramePolicy {
    /// Target direction for a sample at `position`.
    ///
    /// [`FramePolicy::MinRotation`] has no positional target and reports
    /// world Z, which is its seed.
    pub fn target(&self, position: &Point3) -> Vec3 {
        match self {
            FramePolicy::Cylindrical => planar_dir(&position.coords).unwrap_or_else(Vec3::zeros),
            FramePolicy::Spherical => position
                .coords
                .try_normalize(1e-12)
                .unwrap_or_else(Vec3::zeros),
            FramePolicy::FixedZ | FramePolicy::MinRotation => Vec3::z(),
        }
    }

    /// Whether each sample depends on its predecessor.
    pub fn is_sequential(&self) -> bool {
        matches!(self, FramePolicy::MinRotation)
    }
}

/// Unit X axis orthogonal to `tangent` that best matches `target`.
///
/// Starts from [`orthogonal_dir`], tries [`ALIGN_STEPS`] rotations about the
/// tangent in 1° steps, keeps the one with the largest `|dot|` against the
/// target and flips it to face the target. A zero-length target keeps the
/// starting direction; a target parallel to the tangent also does, since
/// every candidate ties.
pub fn align_with_target_x(tangent: &Vec3, target: &Vec3) -> Vec3 {
    let start = orthogonal_dir(tangent);
    if target.norm() < 1e-12 {
        return start;
    }

    let (best, _) = (1..ALIGN_STEPS).fold((start, start.dot(target).abs()), |best, step| {
        let candidate = rotate_about_axis(&start, tangent, (step as f64).to_radians());
        let score = candidate.dot(target).abs();
        if score > best.1 {
            (candidate, score)
        } else {
            best
        }
    });

    flip_for_alignment(&best, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligns_with_perpendicular_target() {
        let x = align_with_target_x(&Vec3::z(), &Vec3::y());
        assert!((x - Vec3::y()).norm() < 1e-9);
        let x = align_with_target_x(&Vec3::z(), &-Vec3::y());
        assert!((x + Vec3::y()).norm() < 1e-9);
    }

    #[test]
    fn test_result_is_orthogonal_and_facing() {
        let tangent = Vec3::new(1.0, 1.0, 0.3).normalize();
        let target = Vec3::new(0.2, -0.4, 1.0);
        let x = align_with_target_x(&tangent, &target);
        assert!((x.norm() - 1.0).abs() < 1e-9);
        assert!(x.dot(&tangent).abs() < 1e-9);
        assert!(x.dot(&target) >= 0.0);
        let projected = (target - tangent * target.dot(&tangent)).normalize();
        // Within the 1° search resolution.
        assert!(x.dot(&projected) > (1.0f64).to_radians().cos());
    }

    #[test]
    fn test_degenerate_target_keeps_start() {
        let x = align_with_target_x(&Vec3::z(), &Vec3::zeros());
        assert_eq!(x, Vec3::y());
        let x = align_with_target_x(&Vec3::z(), &Vec3::z());
        assert!((x - Vec3::y()).norm() < 1e-12);
    }

    #[test]
    fn test_policy_targets() {
        let p = Point3::new(3.0, 4.0, 7.0);
        assert!((FramePolicy::Cylindrical.target(&p) - Vec3::new(0.6, 0.8, 0.0)).norm() < 1e-12);
        assert!((FramePolicy::Spherical.target(&p).norm() - 1.0).abs() < 1e-12);
        assert_eq!(FramePolicy::FixedZ.target(&p), Vec3::z());
        assert_eq!(
            FramePolicy::Cylindrical.target(&Point3::new(0.0, 0.0, 5.0)),
            Vec3::zeros()
        );
        assert!(FramePolicy::MinRotation.is_sequential());
        assert!(!FramePolicy::Spherical.is_sequential());
    }
}
