#![warn(missing_docs)]

//! Signed distance providers.
//!
//! Each type implements [`SignedDistance`]: negative inside, positive
//! outside. Only [`ImplicitSphere`] is an exact distance; the others are
//! monotone estimates that share its zero set and sign, which is what a
//! voxelizing backend needs.

use serde::{Deserialize, Serialize};
use shapekit_math::{Point3, Vec3};
use shapekit_mesh::SignedDistance;
use std::f64::consts::TAU;
use thiserror::Error;

/// A shape parameter outside its valid range.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{name} must be positive and finite, got {value}")]
pub struct ImplicitError {
    /// Parameter name.
    pub name: &'static str,
    /// Rejected value.
    pub value: f64,
}

fn positive(name: &'static str, value: f64) -> Result<f64, ImplicitError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ImplicitError { name, value })
    }
}

/// A solid ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImplicitSphere {
    center: Point3,
    radius: f64,
}

impl ImplicitSphere {
    /// Ball of `radius` around `center`.
    pub fn new(center: Point3, radius: f64) -> Result<Self, ImplicitError> {
        Ok(Self {
            center,
            radius: positive("radius", radius)?,
        })
    }

    /// Axis-aligned bounds.
    pub fn bounding_box(&self) -> (Point3, Point3) {
        let r = Vec3::repeat(self.radius);
        (self.center - r, self.center + r)
    }
}

impl SignedDistance for ImplicitSphere {
    fn distance(&self, p: &Point3) -> f64 {
        (p - self.center).norm() - self.radius
    }
}

/// Thickened gyroid minimal surface, unbounded.
///
/// The periodic cell is `unit_size` wide on every axis; the wall is centred
/// on the zero set of `sin x cos y + sin y cos z + sin z cos x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImplicitGyroid {
    unit_size: f64,
    wall_thickness: f64,
}

impl ImplicitGyroid {
    /// Gyroid with the given cell size and wall thickness.
    pub fn new(unit_size: f64, wall_thickness: f64) -> Result<Self, ImplicitError> {
        Ok(Self {
            unit_size: positive("unit_size", unit_size)?,
            wall_thickness: positive("wall_thickness", wall_thickness)?,
        })
    }

    /// Raw gyroid field at `p`.
    pub fn field(&self, p: &Point3) -> f64 {
        let k = TAU / self.unit_size;
        let (x, y, z) = (p.x * k, p.y * k, p.z * k);
        x.sin() * y.cos() + y.sin() * z.cos() + z.sin() * x.cos()
    }
}

impl SignedDistance for ImplicitGyroid {
    fn distance(&self, p: &Point3) -> f64 {
        let k = TAU / self.unit_size;
        self.field(p).abs() / k - 0.5 * self.wall_thickness
    }
}

/// Superellipsoid with semi-axes `radii` and shape exponents.
///
/// `east_west` shapes the XY cross-section and `north_south` the profile
/// along Z; both equal to one give an ellipsoid, values near zero a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImplicitSuperEllipsoid {
    center: Point3,
    radii: Vec3,
    east_west: f64,
    north_south: f64,
}

impl ImplicitSuperEllipsoid {
    /// Superellipsoid around `center`.
    pub fn new(
        center: Point3,
        radii: Vec3,
        east_west: f64,
        north_south: f64,
    ) -> Result<Self, ImplicitError> {
        positive("radius x", radii.x)?;
        positive("radius y", radii.y)?;
        positive("radius z", radii.z)?;
        Ok(Self {
            center,
            radii,
            east_west: positive("east_west", east_west)?,
            north_south: positive("north_south", north_south)?,
        })
    }

    /// Axis-aligned bounds.
    pub fn bounding_box(&self) -> (Point3, Point3) {
        (self.center - self.radii, self.center + self.radii)
    }
}

impl SignedDistance for ImplicitSuperEllipsoid {
    fn distance(&self, p: &Point3) -> f64 {
        let d = p - self.center;
        let (x, y, z) = (
            (d.x / self.radii.x).abs(),
            (d.y / self.radii.y).abs(),
            (d.z / self.radii.z).abs(),
        );
        let (e1, e2) = (self.north_south, self.east_west);
        let xy = (x.powf(2.0 / e2) + y.powf(2.0 / e2)).powf(e2 / e1);
        let f = xy + z.powf(2.0 / e1);
        // f^(e1/2) grows linearly along rays from the centre.
        (f.powf(e1 / 2.0) - 1.0) * self.radii.min()
    }
}

/// Algebraic genus-3 surface, scaled and centred.
///
/// Zero set of `2y(y² − 3x²)(1 − z²) + (x² + y²)² − (9z² − 1)(1 − z²)` in
/// coordinates divided by `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImplicitGenus {
    center: Point3,
    scale: f64,
}

impl ImplicitGenus {
    /// Genus surface around `center`, about `4.4 * scale` across in X and Y
    /// and `2 * scale` tall.
    pub fn new(center: Point3, scale: f64) -> Result<Self, ImplicitError> {
        Ok(Self {
            center,
            scale: positive("scale", scale)?,
        })
    }

    /// Axis-aligned bounds.
    pub fn bounding_box(&self) -> (Point3, Point3) {
        let r = Vec3::new(2.2, 2.2, 1.0) * self.scale;
        (self.center - r, self.center + r)
    }
}

impl SignedDistance for ImplicitGenus {
    fn distance(&self, p: &Point3) -> f64 {
        let d = (p - self.center) / self.scale;
        let (x, y, z) = (d.x, d.y, d.z);
        let (x2, y2, z2) = (x * x, y * y, z * z);
        let value =
            2.0 * y * (y2 - 3.0 * x2) * (1.0 - z2) + (x2 + y2).powi(2) - (9.0 * z2 - 1.0) * (1.0 - z2);
        value * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_is_exact() {
        let s = ImplicitSphere::new(Point3::new(1.0, 0.0, 0.0), 2.0).unwrap();
        assert_relative_eq!(s.distance(&Point3::new(5.0, 0.0, 0.0)), 2.0);
        assert_relative_eq!(s.distance(&Point3::new(1.0, 0.0, 0.0)), -2.0);
        assert!(s.contains(&Point3::new(2.0, 1.0, 0.0)));
        assert_eq!(s.bounding_box().1, Point3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_invalid_parameters() {
        let err = ImplicitSphere::new(Point3::origin(), -1.0).unwrap_err();
        assert_eq!(err.name, "radius");
        assert!(ImplicitGyroid::new(10.0, 0.0).is_err());
        assert!(ImplicitSuperEllipsoid::new(Point3::origin(), Vec3::new(1.0, 0.0, 1.0), 1.0, 1.0)
            .is_err());
        assert!(ImplicitGenus::new(Point3::origin(), f64::NAN).is_err());
    }

    #[test]
    fn test_gyroid_wall() {
        let g = ImplicitGyroid::new(10.0, 1.0).unwrap();
        // The origin lies on the zero set.
        assert_relative_eq!(g.distance(&Point3::origin()), -0.5, epsilon = 1e-12);
        // Periodic with the cell size.
        let p = Point3::new(1.3, 2.1, -0.7);
        let q = p + Vec3::new(10.0, -20.0, 30.0);
        assert_relative_eq!(g.distance(&p), g.distance(&q), epsilon = 1e-9);
    }

    #[test]
    fn test_superellipsoid_matches_ellipsoid_at_unit_exponents() {
        let e = ImplicitSuperEllipsoid::new(Point3::origin(), Vec3::new(2.0, 3.0, 4.0), 1.0, 1.0)
            .unwrap();
        assert_relative_eq!(e.distance(&Point3::new(2.0, 0.0, 0.0)), 0.0, epsilon = 1e-12);
        assert_relative_eq!(e.distance(&Point3::new(0.0, 3.0, 0.0)), 0.0, epsilon = 1e-12);
        assert!(e.contains(&Point3::new(0.0, 0.0, 3.9)));
        assert!(!e.contains(&Point3::new(1.9, 2.9, 0.0)));
    }

    #[test]
    fn test_superellipsoid_boxy() {
        let e = ImplicitSuperEllipsoid::new(Point3::origin(), Vec3::repeat(1.0), 0.1, 0.1).unwrap();
        // Near-box: the corner region is inside.
        assert!(e.contains(&Point3::new(0.9, 0.9, 0.9)));
        assert!(!e.contains(&Point3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_genus_sign() {
        let g = ImplicitGenus::new(Point3::origin(), 10.0).unwrap();
        // Far away the quartic term dominates.
        assert!(g.distance(&Point3::new(30.0, 0.0, 0.0)) > 0.0);
        // The centre is a hole; the axis above it is solid.
        assert!(g.distance(&Point3::origin()) > 0.0);
        assert!(g.distance(&Point3::new(0.0, 0.0, 5.0)) < 0.0);
        let (min, max) = g.bounding_box();
        assert!(g.distance(&Point3::new(max.x, 0.0, 0.0)) > 0.0);
        assert!(g.distance(&Point3::new(0.0, min.y, 0.0)) > 0.0);
    }
}
