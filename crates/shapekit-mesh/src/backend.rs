//! Contracts for the external voxelization backend.
//!
//! No backend ships with the kernel. A backend turns meshes and lattices
//! into its own solid representation and performs Boolean and offset
//! operations on it; implicit patterns reach it as [`SignedDistance`]
//! fields.

use shapekit_math::Point3;

use crate::lattice::Lattice;
use crate::mesh::TriangleMesh;

/// A signed distance field: negative inside, positive outside.
pub trait SignedDistance: Send + Sync {
    /// Signed distance (or a monotone estimate of it) at `p`.
    fn distance(&self, p: &Point3) -> f64;

    /// Whether `p` is inside or on the surface.
    fn contains(&self, p: &Point3) -> bool {
        self.distance(p) <= 0.0
    }
}

impl<F> SignedDistance for F
where
    F: Fn(&Point3) -> f64 + Send + Sync,
{
    fn distance(&self, p: &Point3) -> f64 {
        self(p)
    }
}

/// A solid-field backend such as a voxelizer.
pub trait SolidBackend {
    /// The backend's solid representation.
    type Field;
    /// Backend failure.
    type Error: std::error::Error;

    /// Solid enclosed by a closed mesh.
    fn from_mesh(&self, mesh: &TriangleMesh) -> Result<Self::Field, Self::Error>;

    /// Solid covered by a lattice's spheres and beams.
    fn from_lattice(&self, lattice: &Lattice) -> Result<Self::Field, Self::Error>;

    /// `a ∪ b`.
    fn union(&self, a: &Self::Field, b: &Self::Field) -> Result<Self::Field, Self::Error>;

    /// `a \ b`.
    fn subtract(&self, a: &Self::Field, b: &Self::Field) -> Result<Self::Field, Self::Error>;

    /// `a ∩ b`.
    fn intersect(&self, a: &Self::Field, b: &Self::Field) -> Result<Self::Field, Self::Error>;

    /// Grow (positive) or shrink (negative) the solid by `distance`.
    fn offset(&self, field: &Self::Field, distance: f64) -> Result<Self::Field, Self::Error>;

    /// Hollow shell of the given wall thickness.
    fn shell(&self, field: &Self::Field, thickness: f64) -> Result<Self::Field, Self::Error>;

    /// Keep only the part of `field` inside `sdf`.
    fn intersect_implicit(
        &self,
        field: &Self::Field,
        sdf: &dyn SignedDistance,
    ) -> Result<Self::Field, Self::Error>;
}
