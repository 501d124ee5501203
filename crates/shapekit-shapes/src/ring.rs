//! Tori around a frame's Z axis.

use std::f64::consts::TAU;

use shapekit_math::{LocalFrame, Point3};
use shapekit_mesh::{quad_walk, MeshBuilder};
use shapekit_modulation::SurfaceModulation;

use crate::{apply, positive, steps, unit, BaseShape, Result, ShapeError, VertexTransform, DEFAULT_STEPS};

/// A torus. The tube radius is a modulation over `(alpha, phi_ratio)`,
/// where `alpha` runs around the tube and `phi_ratio` around the ring.
#[derive(Clone)]
pub struct BaseRing {
    frame: LocalFrame,
    ring_radius: f64,
    tube_radius: SurfaceModulation,
    polar_steps: usize,
    tube_steps: usize,
    transform: Option<VertexTransform>,
}

impl BaseRing {
    /// Ring of `ring_radius` centred on `frame`, tube of `tube_radius`.
    pub fn new(frame: LocalFrame, ring_radius: f64, tube_radius: f64) -> Result<Self> {
        let ring_radius = positive("ring radius", ring_radius)?;
        let tube_radius = positive("tube radius", tube_radius)?;
        if tube_radius >= ring_radius {
            return Err(ShapeError::InvalidDimension {
                name: "ring radius minus tube radius",
                value: ring_radius - tube_radius,
            });
        }
        Ok(Self {
            frame,
            ring_radius,
            tube_radius: SurfaceModulation::constant(tube_radius),
            polar_steps: DEFAULT_STEPS,
            tube_steps: DEFAULT_STEPS / 2,
            transform: None,
        })
    }

    /// Replace the tube radius modulation.
    pub fn with_tube_radius(mut self, tube_radius: SurfaceModulation) -> Self {
        self.tube_radius = tube_radius;
        self
    }

    /// Grid resolution around the ring and around the tube.
    pub fn with_steps(mut self, polar: usize, tube: usize) -> Self {
        self.polar_steps = steps(polar);
        self.tube_steps = steps(tube);
        self
    }

    /// Remap every surface point after construction.
    pub fn with_transform(mut self, transform: VertexTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

impl BaseShape for BaseRing {
    fn name(&self) -> &'static str {
        "ring"
    }

    /// `radius_ratio` 0 is the tube's centre line.
    fn surface_point(&self, phi_ratio: f64, alpha_ratio: f64, radius_ratio: f64) -> Point3 {
        let pr = unit(phi_ratio);
        let (sp, cp) = (TAU * pr).sin_cos();
        let alpha = TAU * unit(alpha_ratio);
        let (sa, ca) = alpha.sin_cos();
        let r = self.tube_radius.evaluate(alpha, pr) * unit(radius_ratio);
        let radial = self.ring_radius + r * ca;
        let local = Point3::new(radial * cp, radial * sp, r * sa);
        apply(&self.transform, self.frame.to_world(&local))
    }

    fn emit(&self, builder: &mut MeshBuilder) {
        quad_walk(builder, self.polar_steps, self.tube_steps, false, |p, a| {
            self.surface_point(p, a, 1.0)
        });
    }
}
