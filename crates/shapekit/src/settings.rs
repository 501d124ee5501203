//! Kernel-wide defaults, loadable from TOML.

use serde::{Deserialize, Serialize};
use shapekit_frames::{Frames, Sampling, DEFAULT_SAMPLE_SPACING};
use shapekit_math::LocalFrame;
use shapekit_mesh::{Lattice, MeshBuilder, TriangleMesh, DEFAULT_WELD_TOLERANCE};
use shapekit_shapes::{finish_outward, BaseShape, LatticeManifold, DEFAULT_STEPS, MIN_STEPS};
use tracing::debug;

use crate::error::{KernelError, Result};

/// Construction parameters shared by every shape.
///
/// Missing TOML keys take their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelSettings {
    /// Grid steps along spines and profiles.
    pub length_steps: usize,
    /// Grid steps around an axis.
    pub polar_steps: usize,
    /// Grid steps across caps and walls.
    pub radial_steps: usize,
    /// Target spacing between frame samples (model units) for frames built
    /// through [`KernelSettings::sampling`] or [`KernelSettings::extrude`].
    pub frame_spacing: f64,
    /// Vertex weld grid size (model units).
    pub weld_tolerance: f64,
    /// Maximum overhang from the build direction for teardrop tips (degrees).
    pub overhang_angle: f64,
    /// Evaluate face grids and frame alignment on the rayon pool.
    pub parallel: bool,
}

impl Default for KernelSettings {
    fn default() -> Self {
        Self {
            length_steps: DEFAULT_STEPS,
            polar_steps: DEFAULT_STEPS,
            radial_steps: MIN_STEPS,
            frame_spacing: DEFAULT_SAMPLE_SPACING,
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
            overhang_angle: 45.0,
            parallel: true,
        }
    }
}

impl KernelSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        for (name, steps) in [
            ("length_steps", self.length_steps),
            ("polar_steps", self.polar_steps),
            ("radial_steps", self.radial_steps),
        ] {
            if steps < MIN_STEPS {
                return Err(KernelError::InvalidSettings(format!(
                    "{name} must be at least {MIN_STEPS}, got {steps}"
                )));
            }
        }
        if !(self.frame_spacing.is_finite() && self.frame_spacing > 0.0) {
            return Err(KernelError::InvalidSettings(
                "frame_spacing must be positive".into(),
            ));
        }
        if !(self.weld_tolerance.is_finite() && self.weld_tolerance > 0.0) {
            return Err(KernelError::InvalidSettings(
                "weld_tolerance must be positive".into(),
            ));
        }
        if !(self.overhang_angle > 0.0 && self.overhang_angle < 90.0) {
            return Err(KernelError::InvalidSettings(
                "overhang_angle must be between 0 and 90 degrees".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate TOML settings.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        debug!(?settings, "loaded kernel settings");
        Ok(settings)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Frame sampling at the configured spacing.
    pub fn sampling(&self) -> Sampling {
        Sampling::Spacing(self.frame_spacing)
    }

    /// Straight frames from `frame` along its Z, sampled at `frame_spacing`.
    ///
    /// Pass the result to a shape's `from_frames` constructor.
    pub fn extrude(&self, frame: &LocalFrame, length: f64) -> Result<Frames> {
        Ok(Frames::extrude(frame, length, self.sampling())?)
    }

    /// Overhang angle in radians.
    pub fn overhang_radians(&self) -> f64 {
        self.overhang_angle.to_radians()
    }

    /// Empty mesh builder with the configured weld tolerance.
    pub fn mesh_builder(&self) -> MeshBuilder {
        MeshBuilder::with_tolerance(self.weld_tolerance)
    }

    /// Assemble `shape` with these settings.
    ///
    /// With `parallel` off the grids are evaluated on a one-thread pool, so
    /// the output is the same as the parallel path.
    pub fn construct(&self, shape: &dyn BaseShape) -> Result<TriangleMesh> {
        self.run(|| {
            let mut builder = self.mesh_builder();
            shape.emit(&mut builder);
            finish_outward(shape.name(), builder)
        })
    }

    /// Lattice for `manifold` with these settings' pool choice.
    pub fn construct_lattice(&self, manifold: &LatticeManifold) -> Result<Lattice> {
        Ok(self.run(|| manifold.construct())??)
    }

    #[cfg(feature = "parallel")]
    fn run<T: Send>(&self, f: impl FnOnce() -> T + Send) -> Result<T> {
        if self.parallel {
            Ok(f())
        } else {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build()?;
            Ok(pool.install(f))
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run<T: Send>(&self, f: impl FnOnce() -> T + Send) -> Result<T> {
        Ok(f())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_valid() {
        let settings = KernelSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.sampling(), Sampling::Spacing(0.5));
        assert_relative_eq!(settings.overhang_radians(), std::f64::consts::FRAC_PI_4);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings = KernelSettings::from_toml_str(
            r#"
            polar_steps = 64
            overhang_angle = 30.0
            parallel = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.polar_steps, 64);
        assert_eq!(settings.length_steps, DEFAULT_STEPS);
        assert!(!settings.parallel);
        assert_relative_eq!(settings.overhang_angle, 30.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = KernelSettings {
            weld_tolerance: 1e-4,
            ..KernelSettings::default()
        };
        let text = settings.to_toml_string().unwrap();
        assert_eq!(KernelSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_extrude_follows_frame_spacing() {
        let frame = LocalFrame::default();
        let coarse = KernelSettings {
            frame_spacing: 2.0,
            ..KernelSettings::default()
        };
        let fine = KernelSettings {
            frame_spacing: 0.25,
            ..KernelSettings::default()
        };
        let a = coarse.extrude(&frame, 20.0).unwrap();
        let b = fine.extrude(&frame, 20.0).unwrap();
        assert_eq!(a, Frames::extrude(&frame, 20.0, Sampling::Spacing(2.0)).unwrap());
        assert!(b.sample_count() > a.sample_count());
        assert!(matches!(
            coarse.extrude(&frame, -1.0),
            Err(KernelError::Frames(_))
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = KernelSettings::from_toml_str("radial_steps = 2").unwrap_err();
        assert!(err.to_string().contains("radial_steps"));
        assert!(KernelSettings::from_toml_str("overhang_angle = 90.0").is_err());
        assert!(KernelSettings::from_toml_str("frame_spacing = -1.0").is_err());
        assert!(matches!(
            KernelSettings::from_toml_str("polar_steps = \"many\""),
            Err(KernelError::Parse(_))
        ));
    }
}
