#![warn(missing_docs)]

//! Mesh assembly for the shapekit kernel.
//!
//! Shape generators emit triangles through a [`MeshBuilder`], usually via the
//! shared [`quad_walk`] face walk, and receive a finished [`TriangleMesh`].
//! Strut-like shapes produce a [`Lattice`] of spheres and beams instead.
//! Both are handed to an external voxelizer through the [`SolidBackend`]
//! contract; implicit patterns reach it as [`SignedDistance`] fields.

pub mod backend;
pub mod builder;
pub mod lattice;
pub mod mesh;

pub use backend::{SignedDistance, SolidBackend};
pub use builder::{quad_walk, MeshBuilder, DEFAULT_WELD_TOLERANCE};
pub use lattice::{Lattice, LatticeBeam, LatticeSphere};
pub use mesh::TriangleMesh;
