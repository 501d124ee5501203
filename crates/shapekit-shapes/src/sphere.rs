//! Spheres with modulated radius.

use std::f64::consts::{PI, TAU};

use shapekit_math::vec_ops::spherical_point;
use shapekit_math::{LocalFrame, Point3};
use shapekit_mesh::{quad_walk, MeshBuilder};
use shapekit_modulation::SurfaceModulation;

use crate::{apply, positive, steps, unit, BaseShape, Result, VertexTransform, DEFAULT_STEPS};

/// A star-shaped solid around a frame's origin.
///
/// The radius is a modulation over `(phi, theta_ratio)`; theta runs from
/// the frame's +Z (ratio 0) to -Z (ratio 1).
#[derive(Clone)]
pub struct BaseSphere {
    frame: LocalFrame,
    radius: SurfaceModulation,
    polar_steps: usize,
    azimuth_steps: usize,
    transform: Option<VertexTransform>,
}

impl BaseSphere {
    /// Sphere of `radius` centred on `frame`.
    pub fn new(frame: LocalFrame, radius: f64) -> Result<Self> {
        Ok(Self::with_modulation(
            frame,
            SurfaceModulation::constant(positive("radius", radius)?),
        ))
    }

    /// Sphere with a modulated radius.
    pub fn with_modulation(frame: LocalFrame, radius: SurfaceModulation) -> Self {
        Self {
            frame,
            radius,
            polar_steps: DEFAULT_STEPS,
            azimuth_steps: DEFAULT_STEPS / 2,
            transform: None,
        }
    }

    /// Grid resolution around Z and from pole to pole.
    pub fn with_steps(mut self, polar: usize, azimuth: usize) -> Self {
        self.polar_steps = steps(polar);
        self.azimuth_steps = steps(azimuth);
        self
    }

    /// Remap every surface point after construction.
    pub fn with_transform(mut self, transform: VertexTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

impl BaseShape for BaseSphere {
    fn name(&self) -> &'static str {
        "sphere"
    }

    fn surface_point(&self, phi_ratio: f64, theta_ratio: f64, radius_ratio: f64) -> Point3 {
        let phi = TAU * unit(phi_ratio);
        let tr = unit(theta_ratio);
        let r = self.radius.evaluate(phi, tr) * unit(radius_ratio);
        let local = spherical_point(r, phi, PI * tr);
        apply(&self.transform, self.frame.to_world(&local))
    }

    fn emit(&self, builder: &mut MeshBuilder) {
        quad_walk(builder, self.polar_steps, self.azimuth_steps, true, |p, t| {
            self.surface_point(p, t, 1.0)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_point() {
        let sphere = BaseSphere::new(LocalFrame::default(), 10.0).unwrap();
        assert_relative_eq!(sphere.surface_point(0.0, 0.5, 1.0), Point3::new(10.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(sphere.surface_point(0.7, 0.0, 1.0), Point3::new(0.0, 0.0, 10.0), epsilon = 1e-9);
        assert_relative_eq!(sphere.surface_point(0.3, 0.4, 0.0), Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn test_closed_and_volume() {
        let mesh = BaseSphere::new(LocalFrame::new(Point3::new(1.0, 2.0, 3.0)), 10.0)
            .unwrap()
            .with_steps(96, 48)
            .construct();
        assert!(mesh.is_closed());
        let exact = 4.0 / 3.0 * PI * 1000.0;
        assert_relative_eq!(mesh.volume(), exact, max_relative = 1e-2);
        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(min.z, -7.0, epsilon = 1e-5);
        assert_relative_eq!(max.z, 13.0, epsilon = 1e-5);
    }

    #[test]
    fn test_modulated_radius_closed() {
        let sphere = BaseSphere::with_modulation(
            LocalFrame::default(),
            SurfaceModulation::from_fn(|phi, t| 8.0 + (4.0 * phi).cos() * (PI * t).sin()),
        );
        let mesh = sphere.construct();
        assert!(mesh.is_closed());
        assert!(mesh.volume() > 0.0);
    }
}
