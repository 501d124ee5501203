//! Rectangular sections swept along a spine.

use shapekit_frames::{Frames, Sampling};
use shapekit_math::{LocalFrame, Point3};
use shapekit_mesh::{quad_walk, MeshBuilder};
use shapekit_modulation::LineModulation;

use crate::{
    apply, centered, positive, steps, unit, BaseShape, Result, VertexTransform, DEFAULT_STEPS,
    MIN_STEPS,
};

/// A box whose width and depth may vary along its spine.
///
/// Width runs along the frames' local X, depth along local Y, length along
/// the spine.
#[derive(Clone)]
pub struct BaseBox {
    frames: Frames,
    width: LineModulation,
    depth: LineModulation,
    length_steps: usize,
    width_steps: usize,
    depth_steps: usize,
    transform: Option<VertexTransform>,
}

impl BaseBox {
    /// Straight box starting at `frame`, extruded along its Z.
    ///
    /// Frames use [`Sampling::default`]; build them with
    /// [`Frames::extrude`] and call `from_frames` for another density.
    pub fn new(frame: &LocalFrame, length: f64, width: f64, depth: f64) -> Result<Self> {
        let frames = Frames::extrude(frame, length, Sampling::default())?;
        Ok(Self::from_frames(
            frames,
            LineModulation::constant(positive("width", width)?),
            LineModulation::constant(positive("depth", depth)?),
        ))
    }

    /// Box along prepared frames with modulated width and depth.
    pub fn from_frames(frames: Frames, width: LineModulation, depth: LineModulation) -> Self {
        Self {
            frames,
            width,
            depth,
            length_steps: DEFAULT_STEPS,
            width_steps: MIN_STEPS,
            depth_steps: MIN_STEPS,
            transform: None,
        }
    }

    /// Replace the width modulation.
    pub fn with_width(mut self, width: LineModulation) -> Self {
        self.width = width;
        self
    }

    /// Replace the depth modulation.
    pub fn with_depth(mut self, depth: LineModulation) -> Self {
        self.depth = depth;
        self
    }

    /// Grid resolution per axis, each floored at [`MIN_STEPS`].
    pub fn with_steps(mut self, length: usize, width: usize, depth: usize) -> Self {
        self.length_steps = steps(length);
        self.width_steps = steps(width);
        self.depth_steps = steps(depth);
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

impl BaseShape for BaseBox {
    fn name(&self) -> &'static str {
        "box"
    }

    /// `length_ratio` in `[0, 1]`, `width_ratio` and `depth_ratio` in
    /// `[-1, 1]` with zero on the spine.
    fn surface_point(&self, length_ratio: f64, width_ratio: f64, depth_ratio: f64) -> Point3 {
        let l = unit(length_ratio);
        let (x, y, _) = self.frames.axes_at(l);
        let half_w = 0.5 * self.width.evaluate(l) * centered(width_ratio);
        let half_d = 0.5 * self.depth.evaluate(l) * centered(depth_ratio);
        apply(&self.transform, self.frames.spine_at(l) + x * half_w + y * half_d)
    }

    fn emit(&self, builder: &mut MeshBuilder) {
        let (nl, nw, nd) = (self.length_steps, self.width_steps, self.depth_steps);
        let s = |u: f64| 2.0 * u - 1.0;

        quad_walk(builder, nw, nd, false, |w, d| self.surface_point(1.0, s(w), s(d)));
        quad_walk(builder, nw, nd, true, |w, d| self.surface_point(0.0, s(w), s(d)));
        quad_walk(builder, nl, nw, false, |l, w| self.surface_point(l, s(w), 1.0));
        quad_walk(builder, nl, nw, true, |l, w| self.surface_point(l, s(w), -1.0));
        quad_walk(builder, nl, nd, true, |l, d| self.surface_point(l, 1.0, s(d)));
        quad_walk(builder, nl, nd, false, |l, d| self.surface_point(l, -1.0, s(d)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shapekit_frames::FramePolicy;
    use shapekit_math::Vec3;

    fn straight() -> BaseBox {
        BaseBox::new(&LocalFrame::default(), 20.0, 10.0, 15.0).unwrap()
    }

    #[test]
    fn test_bounding_box() {
        let mesh = straight().construct();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_relative_eq!(min, Point3::new(-5.0, -7.5, 0.0), epsilon = 1e-5);
        assert_relative_eq!(max, Point3::new(5.0, 7.5, 20.0), epsilon = 1e-5);
    }

    #[test]
    fn test_closed_with_volume() {
        let mesh = straight().construct();
        assert!(mesh.is_closed());
        assert_relative_eq!(mesh.volume(), 3000.0, epsilon = 1e-2);
    }

    #[test]
    fn test_surface_point_corners_and_clamp() {
        let b = straight();
        assert_relative_eq!(b.surface_point(0.5, 0.0, 0.0), Point3::new(0.0, 0.0, 10.0), epsilon = 1e-9);
        assert_relative_eq!(b.surface_point(1.0, 1.0, -1.0), Point3::new(5.0, -7.5, 20.0), epsilon = 1e-9);
        assert_relative_eq!(b.surface_point(3.0, 4.0, -4.0), b.surface_point(1.0, 1.0, -1.0));
    }

    #[test]
    fn test_tapered_width() {
        let b = straight().with_width(LineModulation::from_fn(|l| 10.0 - 5.0 * l));
        assert_relative_eq!(b.surface_point(1.0, 1.0, 0.0).x, 2.5, epsilon = 1e-9);
        let mesh = b.with_steps(8, 5, 5).construct();
        assert!(mesh.is_closed());
        // Linear taper in one direction: mean width 7.5.
        assert_relative_eq!(mesh.volume(), 7.5 * 15.0 * 20.0, epsilon = 1e-2);
    }

    #[test]
    fn test_curved_spine_is_closed() {
        let spine: Vec<Point3> = (0..=20)
            .map(|i| {
                let t = i as f64 / 20.0;
                Point3::new(30.0 * (t * 1.2).sin(), 0.0, 30.0 * (1.0 - (t * 1.2).cos()))
            })
            .collect();
        let frames = Frames::with_policy(&spine, FramePolicy::MinRotation, Sampling::Count(25)).unwrap();
        let mesh = BaseBox::from_frames(frames, LineModulation::constant(4.0), LineModulation::constant(2.0))
            .with_steps(24, 5, 5)
            .construct();
        assert!(mesh.is_closed());
        assert!(mesh.volume() > 0.0);
    }

    #[test]
    fn test_transform_applied_last() {
        let b = straight().with_transform(std::sync::Arc::new(|p: Point3| p + Vec3::new(100.0, 0.0, 0.0)));
        assert_relative_eq!(b.surface_point(0.0, 0.0, 0.0), Point3::new(100.0, 0.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(BaseBox::new(&LocalFrame::default(), 20.0, 0.0, 15.0).is_err());
        assert!(BaseBox::new(&LocalFrame::default(), -1.0, 10.0, 15.0).is_err());
    }
}
