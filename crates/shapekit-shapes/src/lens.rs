//! Discs bounded by two height fields.

use std::f64::consts::TAU;

use shapekit_math::{LocalFrame, Point3};
use shapekit_mesh::{quad_walk, MeshBuilder};
use shapekit_modulation::SurfaceModulation;

use crate::{
    apply, positive, steps, unit, BaseShape, Result, ShapeError, VertexTransform, DEFAULT_STEPS,
    MIN_STEPS,
};

/// An annular disc whose lower and upper surfaces are height fields over
/// `(phi, radius_ratio)`, measured along the frame's Z.
#[derive(Clone)]
pub struct BaseLens {
    frame: LocalFrame,
    inner_radius: f64,
    outer_radius: f64,
    lower: SurfaceModulation,
    upper: SurfaceModulation,
    height_steps: usize,
    polar_steps: usize,
    radial_steps: usize,
    transform: Option<VertexTransform>,
}

impl BaseLens {
    /// Flat disc of `height` between `inner_radius` (may be zero) and
    /// `outer_radius`.
    pub fn new(frame: LocalFrame, height: f64, inner_radius: f64, outer_radius: f64) -> Result<Self> {
        let height = positive("height", height)?;
        let outer_radius = positive("outer radius", outer_radius)?;
        if !(inner_radius.is_finite() && (0.0..outer_radius).contains(&inner_radius)) {
            return Err(ShapeError::InvalidDimension {
                name: "inner radius",
                value: inner_radius,
            });
        }
        Ok(Self {
            frame,
            inner_radius,
            outer_radius,
            lower: SurfaceModulation::constant(0.0),
            upper: SurfaceModulation::constant(height),
            height_steps: MIN_STEPS,
            polar_steps: DEFAULT_STEPS,
            radial_steps: DEFAULT_STEPS,
            transform: None,
        })
    }

    /// Replace both height fields.
    pub fn with_heights(mut self, lower: SurfaceModulation, upper: SurfaceModulation) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    /// Grid resolution across the rim, around the axis, and outward.
    pub fn with_steps(mut self, height: usize, polar: usize, radial: usize) -> Self {
        self.height_steps = steps(height);
        self.polar_steps = steps(polar);
        self.radial_steps = steps(radial);
        self
    }

    /// Remap every surface point after construction.
    pub fn with_transform(mut self, transform: VertexTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

impl BaseShape for BaseLens {
    fn name(&self) -> &'static str {
        "lens"
    }

    fn surface_point(&self, height_ratio: f64, phi_ratio: f64, radius_ratio: f64) -> Point3 {
        let phi = TAU * unit(phi_ratio);
        let rr = unit(radius_ratio);
        let r = self.inner_radius + (self.outer_radius - self.inner_radius) * rr;
        let lower = self.lower.evaluate(phi, rr);
        let upper = self.upper.evaluate(phi, rr);
        let h = lower + (upper - lower) * unit(height_ratio);
        let (s, c) = phi.sin_cos();
        let local = Point3::new(r * c, r * s, h);
        apply(&self.transform, self.frame.to_world(&local))
    }

    fn emit(&self, builder: &mut MeshBuilder) {
        let (nh, np, nr) = (self.height_steps, self.polar_steps, self.radial_steps);
        quad_walk(builder, np, nr, true, |p, r| self.surface_point(1.0, p, r));
        quad_walk(builder, np, nr, false, |p, r| self.surface_point(0.0, p, r));
        quad_walk(builder, nh, np, true, |h, p| self.surface_point(h, p, 1.0));
        quad_walk(builder, nh, np, false, |h, p| self.surface_point(h, p, 0.0));
    }
}
