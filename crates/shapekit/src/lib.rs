#![warn(missing_docs)]

//! shapekit: parametric solid modeling for additive manufacturing
//!
//! Shapes are swept along moving local frames, shaped by line and surface
//! modulations, and assembled into closed triangle meshes or beam lattices
//! for an external voxelizing backend.
//!
//! # Example
//!
//! ```rust,no_run
//! use shapekit::prelude::*;
//!
//! let settings = KernelSettings::default();
//! let frame = LocalFrame::default();
//! let cylinder = BaseCylinder::new(&frame, 40.0, 8.0)?
//!     .with_radius(SurfaceModulation::from_fn(|phi, l| 8.0 + (6.0 * phi).cos() * l))
//!     .with_steps(settings.length_steps, settings.polar_steps, settings.radial_steps);
//! let mesh = settings.construct(&cylinder)?;
//! println!("{} triangles, volume {:.1}", mesh.num_triangles(), mesh.volume());
//! # Ok::<(), shapekit::KernelError>(())
//! ```

pub mod error;
pub mod settings;

pub use error::{KernelError, Result};
pub use settings::KernelSettings;

pub use shapekit_frames as frames;
pub use shapekit_implicit as implicit;
pub use shapekit_math as math;
pub use shapekit_mesh as mesh;
pub use shapekit_modulation as modulation;
pub use shapekit_shapes as shapes;
pub use shapekit_spline as spline;

/// The types most programs need.
pub mod prelude {
    pub use crate::{KernelError, KernelSettings};
    pub use shapekit_frames::{FramePolicy, Frames, Sampling};
    pub use shapekit_implicit::{ImplicitGenus, ImplicitGyroid, ImplicitSphere, ImplicitSuperEllipsoid};
    pub use shapekit_math::{LocalFrame, Point3, Transform, Vec3};
    pub use shapekit_mesh::{Lattice, MeshBuilder, SignedDistance, SolidBackend, TriangleMesh};
    pub use shapekit_modulation::{
        Axis, GrayscaleBuffer, GrayscaleImage, ImageModulation, LineModulation, SurfaceAxis,
        SurfaceModulation,
    };
    pub use shapekit_shapes::{
        BaseBox, BaseCylinder, BaseLens, BasePipe, BasePipeSegment, BaseRevolve, BaseRing,
        BaseShape, BaseSphere, LatticeManifold, LatticePipe, PipeSegmentRange, TipMode,
    };
    pub use shapekit_spline::{ControlPointSpline, SplineEnds};
}
