//! Round sections swept along a spine.

use std::f64::consts::TAU;

use shapekit_frames::{Frames, Sampling};
use shapekit_math::{LocalFrame, Point3};
use shapekit_mesh::{quad_walk, MeshBuilder};
use shapekit_modulation::SurfaceModulation;

use crate::{
    apply, positive, steps, unit, BaseShape, Result, VertexTransform, DEFAULT_STEPS, MIN_STEPS,
};

/// A solid tube whose radius may vary around and along the spine.
#[derive(Clone)]
pub struct BaseCylinder {
    frames: Frames,
    radius: SurfaceModulation,
    length_steps: usize,
    polar_steps: usize,
    radial_steps: usize,
    transform: Option<VertexTransform>,
}

impl BaseCylinder {
    /// Straight cylinder starting at `frame`, extruded along its Z.
    ///
    /// Frames use [`Sampling::default`]; build them with
    /// [`Frames::extrude`] and call `from_frames` for another density.
    pub fn new(frame: &LocalFrame, length: f64, radius: f64) -> Result<Self> {
        let frames = Frames::extrude(frame, length, Sampling::default())?;
        Ok(Self::from_frames(
            frames,
            SurfaceModulation::constant(positive("radius", radius)?),
        ))
    }

    /// Cylinder along prepared frames. `radius` is evaluated at
    /// `(phi, length_ratio)`.
    pub fn from_frames(frames: Frames, radius: SurfaceModulation) -> Self {
        Self {
            frames,
            radius,
            length_steps: DEFAULT_STEPS,
            polar_steps: DEFAULT_STEPS,
            radial_steps: MIN_STEPS,
            transform: None,
        }
    }

    /// Replace the radius modulation.
    pub fn with_radius(mut self, radius: SurfaceModulation) -> Self {
        self.radius = radius;
        self
    }

    /// Grid resolution along the spine, around it, and across the caps.
    pub fn with_steps(mut self, length: usize, polar: usize, radial: usize) -> Self {
        self.length_steps = steps(length);
        self.polar_steps = steps(polar);
        self.radial_steps = steps(radial);
        self
    }

    /// Remap every surface point after construction.
    pub fn with_transform(mut self, transform: VertexTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The spine frames.
    pub fn frames(&self) -> &Frames {
        &self.frames
    }
}

impl BaseShape for BaseCylinder {
    fn name(&self) -> &'static str {
        "cylinder"
    }

    fn surface_point(&self, length_ratio: f64, phi_ratio: f64, radius_ratio: f64) -> Point3 {
        let l = unit(length_ratio);
        let phi = TAU * unit(phi_ratio);
        let (x, y, _) = self.frames.axes_at(l);
        let r = self.radius.evaluate(phi, l) * unit(radius_ratio);
        let (s, c) = phi.sin_cos();
        apply(&self.transform, self.frames.spine_at(l) + (x * c + y * s) * r)
    }

    fn emit(&self, builder: &mut MeshBuilder) {
        let (nl, np, nr) = (self.length_steps, self.polar_steps, self.radial_steps);
        quad_walk(builder, nl, np, true, |l, p| self.surface_point(l, p, 1.0));
        quad_walk(builder, np, nr, true, |p, r| self.surface_point(1.0, p, r));
        quad_walk(builder, np, nr, false, |p, r| self.surface_point(0.0, p, r));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shapekit_frames::FramePolicy;
    use std::f64::consts::PI;

    fn bent() -> BaseCylinder {
        let spine: Vec<Point3> = (0..=16)
            .map(|i| {
                let t = i as f64 / 16.0 * PI;
                Point3::new(20.0 * t.cos(), 20.0 * t.sin(), 5.0 * t)
            })
            .collect();
        let frames = Frames::with_policy(&spine, FramePolicy::Cylindrical, Sampling::Count(33)).unwrap();
        BaseCylinder::from_frames(
            frames,
            SurfaceModulation::from_fn(|phi, l| 3.0 + 0.5 * (3.0 * phi).cos() + l),
        )
    }

    #[test]
    fn test_surface_point_distance_matches_radius() {
        let cyl = bent();
        for i in 0..=10 {
            let l = i as f64 / 10.0;
            for j in 0..8 {
                let phi = j as f64 / 8.0;
                let p = cyl.surface_point(l, phi, 1.0);
                let expected = 3.0 + 0.5 * (3.0 * TAU * phi).cos() + l;
                assert_relative_eq!((p - cyl.frames().spine_at(l)).norm(), expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_zero_radius_ratio_is_on_spine() {
        let cyl = bent();
        for i in 0..=10 {
            let l = i as f64 / 10.0;
            let p = cyl.surface_point(l, 0.3, 0.0);
            assert_relative_eq!(p, cyl.frames().spine_at(l), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_straight_cylinder_closed_and_volume() {
        let mesh = BaseCylinder::new(&LocalFrame::default(), 10.0, 2.0)
            .unwrap()
            .with_steps(6, 64, 5)
            .construct();
        assert!(mesh.is_closed());
        // Inscribed 64-gon area: (n / 2) r² sin(2π / n).
        let area = 32.0 * 4.0 * (TAU / 64.0).sin();
        assert_relative_eq!(mesh.volume(), area * 10.0, epsilon = 1e-3);
        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(min.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(max.x, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_closed_away_from_weld_grid_origin() {
        for k in 0..40 {
            let origin = Point3::new(0.0, 0.5e-6 + k as f64 * 1e-6, 0.0);
            let mesh = BaseCylinder::new(&LocalFrame::new(origin), 10.0, 2.0)
                .unwrap()
                .construct();
            assert_eq!(mesh.boundary_edge_count(), 0, "open at y = {}", origin.y);
        }
    }

    #[test]
    fn test_modulated_cylinder_closed() {
        let mesh = bent().with_steps(40, 24, 5).construct();
        assert!(mesh.is_closed());
        assert!(mesh.volume() > 0.0);
    }

    #[test]
    fn test_ratios_clamped() {
        let cyl = BaseCylinder::new(&LocalFrame::default(), 10.0, 2.0).unwrap();
        assert_relative_eq!(cyl.surface_point(-1.0, 0.0, 2.0), Point3::new(2.0, 0.0, 0.0), epsilon = 1e-12);
    }
}
