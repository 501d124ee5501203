//! Free-standing vector operations: rotations, cylindrical and spherical
//! coordinates, and small alignment helpers.
//!
//! Angles follow the usual physics convention: `phi` is the azimuth in the
//! XY plane measured from +X, `theta` is the polar angle measured from +Z.

use crate::{Dir3, Point3, Vec3};

/// Rotate `v` about `axis` by `angle` radians (Rodrigues' formula).
///
/// A zero-length axis leaves `v` unchanged.
pub fn rotate_about_axis(v: &Vec3, axis: &Vec3, angle: f64) -> Vec3 {
    let Some(k) = Dir3::try_new(*axis, 1e-12) else {
        return *v;
    };
    let k = k.into_inner();
    let (s, c) = angle.sin_cos();
    v * c + k.cross(v) * s + k * (k.dot(v) * (1.0 - c))
}

/// Rotate `v` about the world Z axis by `angle` radians.
pub fn rotate_about_z(v: &Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * v.x - s * v.y, s * v.x + c * v.y, v.z)
}

/// Point from cylindrical coordinates `(radius, phi, z)`.
pub fn cylindrical_point(radius: f64, phi: f64, z: f64) -> Point3 {
    let (s, c) = phi.sin_cos();
    Point3::new(radius * c, radius * s, z)
}

/// Point from spherical coordinates `(radius, phi, theta)`.
///
/// `spherical_point(r, 0.0, PI / 2.0)` lies on +X.
pub fn spherical_point(radius: f64, phi: f64, theta: f64) -> Point3 {
    let (sp, cp) = phi.sin_cos();
    let (st, ct) = theta.sin_cos();
    Point3::new(radius * cp * st, radius * sp * st, radius * ct)
}

/// Azimuth of `v` in the XY plane, in `(-PI, PI]`.
pub fn phi(v: &Vec3) -> f64 {
    v.y.atan2(v.x)
}

/// Polar angle of `v` from +Z, in `[0, PI]`. Zero for the zero vector.
pub fn theta(v: &Vec3) -> f64 {
    let len = v.norm();
    if len < 1e-12 {
        return 0.0;
    }
    (v.z / len).clamp(-1.0, 1.0).acos()
}

/// Distance of `v` from the Z axis.
pub fn radius_xy(v: &Vec3) -> f64 {
    v.x.hypot(v.y)
}

/// Projection of `v` onto the XY plane, normalized.
///
/// Returns `None` when `v` is parallel to Z.
pub fn planar_dir(v: &Vec3) -> Option<Vec3> {
    let planar = Vec3::new(v.x, v.y, 0.0);
    let len = planar.norm();
    (len > 1e-12).then(|| planar / len)
}

/// Negate `v` if it points away from `target`.
pub fn flip_for_alignment(v: &Vec3, target: &Vec3) -> Vec3 {
    if v.dot(target) < 0.0 {
        -v
    } else {
        *v
    }
}

/// Deterministic unit vector orthogonal to `z`.
///
/// `z × X`, or `z × Y` when `z` is within ~18° of X, normalized.
/// `orthogonal_dir(+Z)` is `+Y`.
pub fn orthogonal_dir(z: &Vec3) -> Vec3 {
    let z = z.normalize();
    let candidate = if Vec3::x().dot(&z).abs() > 0.95 {
        Vec3::y()
    } else {
        Vec3::x()
    };
    z.cross(&candidate).normalize()
}
