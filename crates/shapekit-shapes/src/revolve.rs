//! Solids of revolution from a profile curve.

use std::f64::consts::TAU;

use shapekit_frames::Frames;
use shapekit_math::{LocalFrame, Point3};
use shapekit_mesh::{quad_walk, MeshBuilder};
use shapekit_modulation::SurfaceModulation;

use crate::{apply, steps, unit, BaseShape, VertexTransform, DEFAULT_STEPS, MIN_STEPS};

/// A profile swept once around a frame's Z axis.
///
/// The profile frames live in the frame's local XZ plane: X is the distance
/// from the axis, Z the height; Y is ignored. The wall is bounded by two
/// offsets along the profile's local X, each a modulation over
/// `(phi, length_ratio)`.
#[derive(Clone)]
pub struct BaseRevolve {
    frame: LocalFrame,
    profile: Frames,
    inner: SurfaceModulation,
    outer: SurfaceModulation,
    length_steps: usize,
    polar_steps: usize,
    radial_steps: usize,
    transform: Option<VertexTransform>,
}

impl BaseRevolve {
    /// Revolve `profile` about `frame`'s Z, wall between the `inner` and
    /// `outer` offsets.
    pub fn new(
        frame: LocalFrame,
        profile: Frames,
        inner: SurfaceModulation,
        outer: SurfaceModulation,
    ) -> Self {
        Self {
            frame,
            profile,
            inner,
            outer,
            length_steps: DEFAULT_STEPS,
            polar_steps: DEFAULT_STEPS,
            radial_steps: MIN_STEPS,
            transform: None,
        }
    }

    /// Grid resolution along the profile, around the axis, and across the
    /// wall.
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

    /// The profile frames.
    pub fn profile(&self) -> &Frames {
        &self.profile
    }
}

impl BaseShape for BaseRevolve {
    fn name(&self) -> &'static str {
        "revolve"
    }

    fn surface_point(&self, length_ratio: f64, phi_ratio: f64, radius_ratio: f64) -> Point3 {
        let l = unit(length_ratio);
        let phi = TAU * unit(phi_ratio);
        let inner = self.inner.evaluate(phi, l);
        let outer = self.outer.evaluate(phi, l);
        let offset = inner + (outer - inner) * unit(radius_ratio);
        let q = self.profile.spine_at(l) + self.profile.local_x_at(l) * offset;
        let (s, c) = phi.sin_cos();
        let local = Point3::new(q.x * c, q.x * s, q.z);
        apply(&self.transform, self.frame.to_world(&local))
    }

    fn emit(&self, builder: &mut MeshBuilder) {
        let (nl, np, nr) = (self.length_steps, self.polar_steps, self.radial_steps);
        quad_walk(builder, nl, np, true, |l, p| self.surface_point(l, p, 1.0));
        quad_walk(builder, nl, np, false, |l, p| self.surface_point(l, p, 0.0));
        quad_walk(builder, np, nr, true, |p, r| self.surface_point(1.0, p, r));
        quad_walk(builder, np, nr, false, |p, r| self.surface_point(0.0, p, r));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shapekit_frames::Sampling;
    use shapekit_math::Vec3;
    use std::f64::consts::PI;

    fn straight_profile() -> Frames {
        let spine = [Point3::new(10.0, 0.0, 0.0), Point3::new(10.0, 0.0, 20.0)];
        Frames::with_target_x(&spine, &Vec3::x(), Sampling::Count(9)).unwrap()
    }

    #[test]
    fn test_straight_profile_is_a_tube() {
        let rev = BaseRevolve::new(
            LocalFrame::default(),
            straight_profile(),
            SurfaceModulation::constant(0.0),
            SurfaceModulation::constant(2.0),
        )
        .with_steps(9, 128, 5);
        assert_relative_eq!(rev.surface_point(0.5, 0.25, 1.0), Point3::new(0.0, 12.0, 10.0), epsilon = 1e-9);
        let mesh = rev.construct();
        assert!(mesh.is_closed());
        let exact = PI * (144.0 - 100.0) * 20.0;
        assert_relative_eq!(mesh.volume(), exact, max_relative = 2e-3);
    }

    #[test]
    fn test_arched_profile_closed() {
        let spine: Vec<Point3> = (0..=12)
            .map(|i| {
                let t = i as f64 / 12.0 * PI;
                Point3::new(15.0 + 5.0 * t.sin(), 0.0, -10.0 * t.cos())
            })
            .collect();
        let profile = Frames::with_target_x(&spine, &Vec3::x(), Sampling::Count(25)).unwrap();
        let rev = BaseRevolve::new(
            LocalFrame::new(Point3::new(0.0, 0.0, 50.0)),
            profile,
            SurfaceModulation::constant(-1.0),
            SurfaceModulation::from_fn(|phi, _| 1.0 + 0.5 * (6.0 * phi).cos().abs()),
        );
        let mesh = rev.construct();
        assert!(mesh.is_closed());
        assert!(mesh.volume() > 0.0);
        let (min, _) = mesh.bounding_box().unwrap();
        assert!(min.z > 38.0);
    }
}
