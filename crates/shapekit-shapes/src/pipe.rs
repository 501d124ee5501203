//! Hollow tubes and angular tube segments.

use std::f64::consts::TAU;

use shapekit_frames::{Frames, Sampling};
use shapekit_math::{LocalFrame, Point3};
use shapekit_mesh::{quad_walk, MeshBuilder};
use shapekit_modulation::{LineModulation, SurfaceModulation};

use crate::{
    apply, positive, steps, unit, BaseShape, Result, ShapeError, VertexTransform, DEFAULT_STEPS,
    MIN_STEPS,
};

/// Wall of a tube between two radius modulations, evaluated at
/// `(phi, length_ratio)`.
#[derive(Clone)]
struct Wall {
    frames: Frames,
    inner: SurfaceModulation,
    outer: SurfaceModulation,
}

impl Wall {
    fn straight(frame: &LocalFrame, length: f64, inner: f64, outer: f64) -> Result<Self> {
        let inner = positive("inner radius", inner)?;
        let outer = positive("outer radius", outer)?;
        if outer <= inner {
            return Err(ShapeError::InvalidDimension {
                name: "wall thickness",
                value: outer - inner,
            });
        }
        Ok(Self {
            frames: Frames::extrude(frame, length, Sampling::default())?,
            inner: SurfaceModulation::constant(inner),
            outer: SurfaceModulation::constant(outer),
        })
    }

    fn point(&self, length_ratio: f64, phi: f64, radius_ratio: f64) -> Point3 {
        let l = unit(length_ratio);
        let (x, y, _) = self.frames.axes_at(l);
        let inner = self.inner.evaluate(phi, l);
        let outer = self.outer.evaluate(phi, l);
        let r = inner + (outer - inner) * unit(radius_ratio);
        let (s, c) = phi.sin_cos();
        self.frames.spine_at(l) + (x * c + y * s) * r
    }
}

/// A hollow tube.
#[derive(Clone)]
pub struct BasePipe {
    wall: Wall,
    length_steps: usize,
    polar_steps: usize,
    radial_steps: usize,
    transform: Option<VertexTransform>,
}

impl BasePipe {
    /// Straight pipe starting at `frame`, extruded along its Z.
    ///
    /// Frames use [`Sampling::default`]; build them with
    /// [`Frames::extrude`] and call `from_frames` for another density.
    pub fn new(frame: &LocalFrame, length: f64, inner_radius: f64, outer_radius: f64) -> Result<Self> {
        Ok(Self::with_wall(Wall::straight(frame, length, inner_radius, outer_radius)?))
    }

    /// Pipe along prepared frames.
    pub fn from_frames(frames: Frames, inner: SurfaceModulation, outer: SurfaceModulation) -> Self {
        Self::with_wall(Wall {
            frames,
            inner,
            outer,
        })
    }

    fn with_wall(wall: Wall) -> Self {
        Self {
            wall,
            length_steps: DEFAULT_STEPS,
            polar_steps: DEFAULT_STEPS,
            radial_steps: MIN_STEPS,
            transform: None,
        }
    }

    /// Replace the inner radius modulation.
    pub fn with_inner(mut self, inner: SurfaceModulation) -> Self {
        self.wall.inner = inner;
        self
    }

    /// Replace the outer radius modulation.
    pub fn with_outer(mut self, outer: SurfaceModulation) -> Self {
        self.wall.outer = outer;
        self
    }

    /// Grid resolution along the spine, around it, and across the wall.
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
        &self.wall.frames
    }
}

impl BaseShape for BasePipe {
    fn name(&self) -> &'static str {
        "pipe"
    }

    /// `radius_ratio` 0 is the inner wall, 1 the outer.
    fn surface_point(&self, length_ratio: f64, phi_ratio: f64, radius_ratio: f64) -> Point3 {
        let p = self.wall.point(length_ratio, TAU * unit(phi_ratio), radius_ratio);
        apply(&self.transform, p)
    }

    fn emit(&self, builder: &mut MeshBuilder) {
        let (nl, np, nr) = (self.length_steps, self.polar_steps, self.radial_steps);
        quad_walk(builder, nl, np, true, |l, p| self.surface_point(l, p, 1.0));
        quad_walk(builder, nl, np, false, |l, p| self.surface_point(l, p, 0.0));
        quad_walk(builder, np, nr, true, |p, r| self.surface_point(1.0, p, r));
        quad_walk(builder, np, nr, false, |p, r| self.surface_point(0.0, p, r));
    }
}

/// Angular extent of a [`BasePipeSegment`], in radians over length ratio.
#[derive(Debug, Clone)]
pub enum PipeSegmentRange {
    /// Explicit start and end angles.
    StartEnd {
        /// Start angle.
        start: LineModulation,
        /// End angle.
        end: LineModulation,
    },
    /// Centre angle and total angular width.
    MidRange {
        /// Centre angle.
        mid: LineModulation,
        /// Angular width.
        range: LineModulation,
    },
}

impl PipeSegmentRange {
    /// Constant `[start, end]`.
    pub fn start_end(start: f64, end: f64) -> Self {
        PipeSegmentRange::StartEnd {
            start: LineModulation::constant(start),
            end: LineModulation::constant(end),
        }
    }

    /// Constant `mid ± range / 2`.
    pub fn mid_range(mid: f64, range: f64) -> Self {
        PipeSegmentRange::MidRange {
            mid: LineModulation::constant(mid),
            range: LineModulation::constant(range),
        }
    }

    /// `(start, end)` angles at `length_ratio`.
    pub fn bounds(&self, length_ratio: f64) -> (f64, f64) {
        match self {
            PipeSegmentRange::StartEnd { start, end } => {
                (start.evaluate(length_ratio), end.evaluate(length_ratio))
            }
            PipeSegmentRange::MidRange { mid, range } => {
                let mid = mid.evaluate(length_ratio);
                let half = 0.5 * range.evaluate(length_ratio);
                (mid - half, mid + half)
            }
        }
    }
}

/// A pipe restricted to an angular range, closed by flat side caps.
#[derive(Clone)]
pub struct BasePipeSegment {
    wall: Wall,
    range: PipeSegmentRange,
    length_steps: usize,
    polar_steps: usize,
    radial_steps: usize,
    transform: Option<VertexTransform>,
}

impl BasePipeSegment {
    /// Straight segment starting at `frame`, extruded along its Z.
    ///
    /// Frames use [`Sampling::default`]; build them with
    /// [`Frames::extrude`] and call `from_frames` for another density.
    pub fn new(
        frame: &LocalFrame,
        length: f64,
        inner_radius: f64,
        outer_radius: f64,
        range: PipeSegmentRange,
    ) -> Result<Self> {
        Ok(Self::with_wall(
            Wall::straight(frame, length, inner_radius, outer_radius)?,
            range,
        ))
    }

    /// Segment along prepared frames.
    pub fn from_frames(
        frames: Frames,
        inner: SurfaceModulation,
        outer: SurfaceModulation,
        range: PipeSegmentRange,
    ) -> Self {
        Self::with_wall(
            Wall {
                frames,
                inner,
                outer,
            },
            range,
        )
    }

    fn with_wall(wall: Wall, range: PipeSegmentRange) -> Self {
        Self {
            wall,
            range,
            length_steps: DEFAULT_STEPS,
            polar_steps: DEFAULT_STEPS,
            radial_steps: MIN_STEPS,
            transform: None,
        }
    }

    /// The angular range.
    pub fn range(&self) -> &PipeSegmentRange {
        &self.range
    }

    /// Grid resolution along the spine, across the arc, and across the wall.
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
        &self.wall.frames
    }
}

impl BaseShape for BasePipeSegment {
    fn name(&self) -> &'static str {
        "pipe segment"
    }

    /// `phi_ratio` 0 is the start angle, 1 the end angle.
    fn surface_point(&self, length_ratio: f64, phi_ratio: f64, radius_ratio: f64) -> Point3 {
        let l = unit(length_ratio);
        let (start, end) = self.range.bounds(l);
        let phi = start + (end - start) * unit(phi_ratio);
        apply(&self.transform, self.wall.point(l, phi, radius_ratio))
    }

    fn emit(&self, builder: &mut MeshBuilder) {
        let (nl, np, nr) = (self.length_steps, self.polar_steps, self.radial_steps);
        quad_walk(builder, nl, np, true, |l, p| self.surface_point(l, p, 1.0));
        quad_walk(builder, nl, np, false, |l, p| self.surface_point(l, p, 0.0));
        quad_walk(builder, np, nr, true, |p, r| self.surface_point(1.0, p, r));
        quad_walk(builder, np, nr, false, |p, r| self.surface_point(0.0, p, r));
        quad_walk(builder, nl, nr, true, |l, r| self.surface_point(l, 0.0, r));
        quad_walk(builder, nl, nr, false, |l, r| self.surface_point(l, 1.0, r));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_pipe_closed_and_volume() {
        let mesh = BasePipe::new(&LocalFrame::default(), 10.0, 3.0, 5.0)
            .unwrap()
            .with_steps(5, 96, 5)
            .construct();
        assert!(mesh.is_closed());
        let polygon = |r: f64| 48.0 * r * r * (TAU / 96.0).sin();
        assert_relative_eq!(mesh.volume(), (polygon(5.0) - polygon(3.0)) * 10.0, epsilon = 1e-2);
    }

    #[test]
    fn test_pipe_wall_ratios() {
        let pipe = BasePipe::new(&LocalFrame::default(), 10.0, 3.0, 5.0).unwrap();
        assert_relative_eq!(pipe.surface_point(0.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(pipe.surface_point(1.0, 0.25, 0.5), Point3::new(0.0, 4.0, 10.0), epsilon = 1e-12);
    }

    #[test]
    fn test_pipe_rejects_inverted_wall() {
        assert!(BasePipe::new(&LocalFrame::default(), 10.0, 5.0, 3.0).is_err());
        assert!(BasePipe::new(&LocalFrame::default(), 10.0, 0.0, 3.0).is_err());
    }

    #[test]
    fn test_segment_half_turn_stays_in_upper_half() {
        let seg = BasePipeSegment::new(
            &LocalFrame::default(),
            10.0,
            2.0,
            4.0,
            PipeSegmentRange::start_end(0.0, PI),
        )
        .unwrap()
        .with_steps(6, 24, 5);
        let mesh = seg.construct();
        assert!(mesh.is_closed());
        for i in 0..mesh.num_vertices() {
            let v = mesh.vertex(i);
            let phi = v.y.atan2(v.x);
            assert!((-1e-6..=PI + 1e-6).contains(&phi), "phi {phi} out of range");
        }
    }

    #[test]
    fn test_mid_range_matches_start_end() {
        let frame = LocalFrame::default();
        let a = BasePipeSegment::new(&frame, 10.0, 2.0, 4.0, PipeSegmentRange::start_end(0.0, PI))
            .unwrap()
            .with_steps(6, 24, 5);
        let b = BasePipeSegment::new(&frame, 10.0, 2.0, 4.0, PipeSegmentRange::mid_range(PI / 2.0, PI))
            .unwrap()
            .with_steps(6, 24, 5);
        assert_eq!(a.construct().vertices, b.construct().vertices);
        assert_relative_eq!(a.surface_point(0.3, 0.7, 0.2), b.surface_point(0.3, 0.7, 0.2), epsilon = 1e-12);
    }

    #[test]
    fn test_segment_volume_is_half_pipe() {
        let seg = BasePipeSegment::new(
            &LocalFrame::default(),
            10.0,
            2.0,
            4.0,
            PipeSegmentRange::start_end(0.0, PI),
        )
        .unwrap()
        .with_steps(5, 128, 5);
        let expected = 0.5 * PI * (16.0 - 4.0) * 10.0;
        assert_relative_eq!(seg.construct().volume(), expected, epsilon = 0.5);
    }

    #[test]
    fn test_segment_range_follows_length() {
        let range = PipeSegmentRange::MidRange {
            mid: LineModulation::from_fn(|l| l * PI),
            range: LineModulation::constant(PI / 2.0),
        };
        let (start, end) = range.bounds(1.0);
        assert_relative_eq!(start, 0.75 * PI);
        assert_relative_eq!(end, 1.25 * PI);
    }
}
