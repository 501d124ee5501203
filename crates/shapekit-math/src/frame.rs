//! Immutable right-handed local coordinate frames.

use thiserror::Error;

use crate::vec_ops::orthogonal_dir;
use crate::{Point3, Vec3};

/// Minimum length an axis vector must have before normalization.
const MIN_AXIS_LENGTH: f64 = 1e-12;

/// Errors raised while constructing a [`LocalFrame`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// An axis vector was zero-length, non-finite, or parallel to another axis.
    #[error("invalid {axis} axis: {reason}")]
    InvalidAxis {
        /// Which axis was rejected ("x" or "z").
        axis: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// A positioned, oriented, right-handed coordinate system.
///
/// Axes are unit length and pairwise orthogonal with
/// `local_y = local_z × local_x`. Frames are values: every "setter" returns a
/// new frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    position: Point3,
    local_x: Vec3,
    local_y: Vec3,
    local_z: Vec3,
}

fn unit_axis(v: Vec3, axis: &'static str) -> Result<Vec3, FrameError> {
    if !v.iter().all(|c| c.is_finite()) {
        return Err(FrameError::InvalidAxis {
            axis,
            reason: "non-finite component",
        });
    }
    let len = v.norm();
    if len < MIN_AXIS_LENGTH {
        return Err(FrameError::InvalidAxis {
            axis,
            reason: "zero length",
        });
    }
    Ok(v / len)
}

impl LocalFrame {
    /// Frame at `position` aligned with the world axes.
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            local_x: Vec3::x(),
            local_y: Vec3::y(),
            local_z: Vec3::z(),
        }
    }

    /// Frame at `position` with the given Z axis; X is chosen by
    /// [`orthogonal_dir`].
    pub fn with_z(position: Point3, local_z: Vec3) -> Result<Self, FrameError> {
        let local_z = unit_axis(local_z, "z")?;
        let local_x = orthogonal_dir(&local_z);
        Ok(Self {
            position,
            local_x,
            local_y: local_z.cross(&local_x),
            local_z,
        })
    }

    /// Frame at `position` with the given Z and X axes; Y is derived.
    ///
    /// X is made orthogonal to Z by removing its Z component.
    pub fn with_axes(position: Point3, local_z: Vec3, local_x: Vec3) -> Result<Self, FrameError> {
        let local_z = unit_axis(local_z, "z")?;
        let raw_x = unit_axis(local_x, "x")?;
        let local_x = unit_axis(raw_x - local_z * raw_x.dot(&local_z), "x").map_err(|_| {
            FrameError::InvalidAxis {
                axis: "x",
                reason: "parallel to z",
            }
        })?;
        Ok(Self {
            position,
            local_x,
            local_y: local_z.cross(&local_x),
            local_z,
        })
    }

    /// Origin of the frame.
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Local X axis.
    pub fn local_x(&self) -> Vec3 {
        self.local_x
    }

    /// Local Y axis.
    pub fn local_y(&self) -> Vec3 {
        self.local_y
    }

    /// Local Z axis.
    pub fn local_z(&self) -> Vec3 {
        self.local_z
    }

    /// Same axes, new origin.
    pub fn with_position(&self, position: Point3) -> Self {
        Self { position, ..*self }
    }

    /// Frame moved by `offset`.
    pub fn translated(&self, offset: &Vec3) -> Self {
        self.with_position(self.position + offset)
    }

    /// Frame with X and/or Z mirrored.
    ///
    /// Y is re-derived so the result stays right-handed: flipping one axis
    /// also flips Y, flipping both leaves Y unchanged.
    pub fn inverted(&self, invert_x: bool, invert_z: bool) -> Self {
        let local_x = if invert_x { -self.local_x } else { self.local_x };
        let local_z = if invert_z { -self.local_z } else { self.local_z };
        Self {
            position: self.position,
            local_x,
            local_y: local_z.cross(&local_x),
            local_z,
        }
    }

    /// Frame whose X and Y are rotated by `angle` radians about its own Z.
    pub fn rotated_about_z(&self, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let local_x = self.local_x * c + self.local_y * s;
        Self {
            position: self.position,
            local_x,
            local_y: self.local_z.cross(&local_x),
            local_z: self.local_z,
        }
    }

    /// Express a local direction in world coordinates.
    pub fn to_world_dir(&self, v: &Vec3) -> Vec3 {
        self.local_x * v.x + self.local_y * v.y + self.local_z * v.z
    }

    /// Express a local point in world coordinates.
    pub fn to_world(&self, p: &Point3) -> Point3 {
        self.position + self.to_world_dir(&p.coords)
    }

    /// Express a world direction in this frame.
    pub fn to_local_dir(&self, v: &Vec3) -> Vec3 {
        Vec3::new(v.dot(&self.local_x), v.dot(&self.local_y), v.dot(&self.local_z))
    }

    /// Express a world point in this frame.
    pub fn to_local(&self, p: &Point3) -> Point3 {
        Point3::from(self.to_local_dir(&(p - self.position)))
    }
}

impl Default for LocalFrame {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}
