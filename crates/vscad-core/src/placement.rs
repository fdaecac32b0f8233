//! Rigid placements (base point plus rotation).
//!
//! Positions are millimetres and angles degrees, matching the host document.
//! Node rotations are applied about the global X, then Y, then Z axis at the
//! base point, so the composed rotation is `Rz * Ry * Rx`. Reading angles back
//! decomposes in the matching Z, Y, X order.

use glam::{DQuat, DVec3, EulerRot};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    pub base: DVec3,
    pub rotation: DQuat,
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Placement {
    pub const IDENTITY: Self = Self {
        base: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    pub fn new(base: DVec3, rotation: DQuat) -> Self {
        Self { base, rotation }
    }

    pub fn from_translation(base: DVec3) -> Self {
        Self {
            base,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Translate by `position`, then rotate about global X, Y and Z by the
    /// components of `rotation_deg`.
    pub fn from_position_rotation(position: DVec3, rotation_deg: DVec3) -> Self {
        let mut placement = Self::from_translation(position);
        placement.rotate_global(DVec3::X, rotation_deg.x);
        placement.rotate_global(DVec3::Y, rotation_deg.y);
        placement.rotate_global(DVec3::Z, rotation_deg.z);
        placement
    }

    /// Rotate about a global axis through the current base point.
    pub fn rotate_global(&mut self, axis: DVec3, degrees: f64) {
        let step = DQuat::from_axis_angle(axis, degrees.to_radians());
        self.rotation = (step * self.rotation).normalize();
    }

    /// Rotation as X, Y, Z angles in degrees.
    pub fn euler_degrees(&self) -> DVec3 {
        let (z, y, x) = self.rotation.to_euler(EulerRot::ZYX);
        DVec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// Placement of `local` expressed in the frame this placement lives in.
    pub fn compose(&self, local: &Placement) -> Placement {
        Placement {
            base: self.base + self.rotation * local.base,
            rotation: (self.rotation * local.rotation).normalize(),
        }
    }

    pub fn inverse(&self) -> Placement {
        let rotation = self.rotation.inverse();
        Placement {
            base: -(rotation * self.base),
            rotation,
        }
    }

    /// Transform a point from local into parent coordinates.
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.base + self.rotation * point
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn abs_diff_eq(&self, other: &Placement, epsilon: f64) -> bool {
        self.base.abs_diff_eq(other.base, epsilon)
            && (self.rotation.abs_diff_eq(other.rotation, epsilon)
                || self.rotation.abs_diff_eq(-other.rotation, epsilon))
    }
}
