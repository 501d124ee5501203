//! Sphere-and-beam lattices for strut-like geometry.

use serde::{Deserialize, Serialize};
use shapekit_math::{Point3, Vec3};

/// A solid sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeSphere {
    /// Centre.
    pub center: Point3,
    /// Radius.
    pub radius: f64,
}

/// A swept circle between two points, radius blended linearly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticeBeam {
    /// Start point.
    pub p1: Point3,
    /// Radius at the start.
    pub r1: f64,
    /// End point.
    pub p2: Point3,
    /// Radius at the end.
    pub r2: f64,
    /// Close the ends with hemispheres instead of flat discs.
    pub round_caps: bool,
}

impl LatticeBeam {
    /// Distance between the end points.
    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }
}

/// Spheres and beams handed to a voxelizer as one body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// Spheres.
    pub spheres: Vec<LatticeSphere>,
    /// Beams.
    pub beams: Vec<LatticeBeam>,
}

impl Lattice {
    /// Empty lattice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere.
    pub fn add_sphere(&mut self, center: Point3, radius: f64) {
        self.spheres.push(LatticeSphere { center, radius });
    }

    /// Add a beam.
    pub fn add_beam(&mut self, p1: Point3, r1: f64, p2: Point3, r2: f64, round_caps: bool) {
        self.beams.push(LatticeBeam {
            p1,
            r1,
            p2,
            r2,
            round_caps,
        });
    }

    /// Append everything from `other`.
    pub fn merge(&mut self, other: &Lattice) {
        self.spheres.extend_from_slice(&other.spheres);
        self.beams.extend_from_slice(&other.beams);
    }

    /// Whether the lattice holds no elements.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty() && self.beams.is_empty()
    }

    /// Bounds including radii, as `(min, max)`. Beam ends are treated as
    /// spheres, which is exact for round caps and conservative otherwise.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        let balls = self
            .spheres
            .iter()
            .map(|s| (s.center, s.radius))
            .chain(self.beams.iter().flat_map(|b| [(b.p1, b.r1), (b.p2, b.r2)]));

        balls.fold(None, |acc, (c, r)| {
            let r = Vec3::repeat(r.abs());
            let (lo, hi) = (c - r, c + r);
            Some(match acc {
                None => (lo, hi),
                Some((min, max)) => (min.inf(&lo), max.sup(&hi)),
            })
        })
    }
}
