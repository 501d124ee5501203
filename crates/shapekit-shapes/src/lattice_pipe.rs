//! Beam lattices along a spine, with optional printable teardrop tips.

use std::f64::consts::FRAC_PI_2;

use shapekit_frames::Frames;
use shapekit_math::Vec3;
use shapekit_mesh::Lattice;
use shapekit_modulation::LineModulation;
use tracing::{debug, trace};

use crate::{steps, Result, ShapeError, DEFAULT_STEPS};

/// Radius of a teardrop tip's far end, relative to the section radius.
const TIP_RADIUS_RATIO: f64 = 0.01;

/// `sin(1°)`: the horizontal share of the tangent below which a section
/// counts as vertical.
const VERTICAL_TOLERANCE: f64 = 0.017452406437283512;

/// Round beams through consecutive spine samples.
#[derive(Debug, Clone)]
pub struct LatticePipe {
    frames: Frames,
    radius: LineModulation,
    length_steps: usize,
}

impl LatticePipe {
    /// Pipe along `frames`; `radius` is evaluated at the length ratio.
    pub fn new(frames: Frames, radius: LineModulation) -> Self {
        Self {
            frames,
            radius,
            length_steps: DEFAULT_STEPS,
        }
    }

    /// Number of cross-sections, floored at [`MIN_STEPS`](crate::MIN_STEPS).
    pub fn with_steps(mut self, length: usize) -> Self {
        self.length_steps = steps(length);
        self
    }

    /// The spine frames.
    pub fn frames(&self) -> &Frames {
        &self.frames
    }

    fn ratio(&self, i: usize) -> f64 {
        i as f64 / (self.length_steps - 1) as f64
    }

    /// One beam per pair of neighbouring cross-sections.
    pub fn construct(&self) -> Lattice {
        let mut lattice = Lattice::new();
        for i in 0..self.length_steps - 1 {
            let (a, b) = (self.ratio(i), self.ratio(i + 1));
            lattice.add_beam(
                self.frames.spine_at(a),
                self.radius.evaluate(a),
                self.frames.spine_at(b),
                self.radius.evaluate(b),
                true,
            );
        }
        debug!(beams = lattice.beams.len(), "lattice pipe constructed");
        lattice
    }
}

/// Teardrop dimensions for a circular section of radius `r` whose overhang
/// may not exceed `alpha` from the vertical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Teardrop {
    /// Width where the tip meets the circle, `2r·cos α`.
    pub chord: f64,
    /// Circle height cut off by the chord, `r(1 − sin α)`.
    pub sagitta: f64,
    /// Distance from the centre to the tip point, `r / sin α`.
    pub tip_distance: f64,
    /// Distance from the centre to the chord, `r·sin α`.
    pub base_distance: f64,
    /// Half the chord, the tip cone's base radius.
    pub base_radius: f64,
}

/// Teardrop for radius `r` and overhang angle `alpha` in `(0, PI / 2)`.
pub fn teardrop(r: f64, alpha: f64) -> Result<Teardrop> {
    if !(alpha > 0.0 && alpha < FRAC_PI_2) {
        return Err(ShapeError::InvalidAngle(alpha));
    }
    let (s, c) = alpha.sin_cos();
    Ok(Teardrop {
        chord: 2.0 * r * c,
        sagitta: r * (1.0 - s),
        tip_distance: r / s,
        base_distance: r * s,
        base_radius: r * c,
    })
}

/// Which sides of a [`LatticeManifold`] get a tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipMode {
    /// Toward the build direction (+Z) only.
    #[default]
    Single,
    /// Toward and away from the build direction.
    Double,
}

/// A [`LatticePipe`] with a teardrop tip on every cross-section, so
/// horizontal runs print without support.
#[derive(Debug, Clone)]
pub struct LatticeManifold {
    pipe: LatticePipe,
    overhang_angle: f64,
    tips: TipMode,
}

impl LatticeManifold {
    /// Manifold along `frames` with maximum overhang `overhang_angle`
    /// (radians, measured from the build direction).
    pub fn new(frames: Frames, radius: LineModulation, overhang_angle: f64) -> Result<Self> {
        teardrop(1.0, overhang_angle)?;
        Ok(Self {
            pipe: LatticePipe::new(frames, radius),
            overhang_angle,
            tips: TipMode::Single,
        })
    }

    /// Choose single or double tips.
    pub fn with_tips(mut self, tips: TipMode) -> Self {
        self.tips = tips;
        self
    }

    /// Number of cross-sections, floored at [`MIN_STEPS`](crate::MIN_STEPS).
    pub fn with_steps(mut self, length: usize) -> Self {
        self.pipe = self.pipe.with_steps(length);
        self
    }

    /// Pipe beams plus tip beams.
    ///
    /// Sections whose tangent is within a degree of vertical get no tip;
    /// the build direction has no component across them.
    pub fn construct(&self) -> Result<Lattice> {
        let mut lattice = self.pipe.construct();
        let mut skipped = 0;
        for i in 0..self.pipe.length_steps {
            let l = self.pipe.ratio(i);
            let tangent = self.pipe.frames.local_z_at(l);
            let up = Vec3::z() - tangent * tangent.z;
            let Some(up) = up.try_normalize(VERTICAL_TOLERANCE) else {
                trace!(section = i, "vertical section, no tip");
                skipped += 1;
                continue;
            };

            let r = self.pipe.radius.evaluate(l);
            let drop = teardrop(r, self.overhang_angle)?;
            let center = self.pipe.frames.spine_at(l);
            let sides: &[f64] = match self.tips {
                TipMode::Single => &[1.0],
                TipMode::Double => &[1.0, -1.0],
            };
            for side in sides {
                let dir = up * *side;
                lattice.add_beam(
                    center + dir * drop.base_distance,
                    drop.base_radius,
                    center + dir * drop.tip_distance,
                    r * TIP_RADIUS_RATIO,
                    false,
                );
            }
        }
        debug!(
            beams = lattice.beams.len(),
            skipped,
            tips = ?self.tips,
            "lattice manifold constructed"
        );
        Ok(lattice)
    }
}
