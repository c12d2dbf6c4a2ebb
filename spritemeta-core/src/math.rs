//! Geometry primitives for sprite metadata.
//!
//! Vectors and the raw quaternion come straight from glam. On top of that:
//! - `Rect`: x/y/width/height rectangle in unit or pixel space
//! - `Rotation`: quaternion wrapper whose equality is a dot-product test
//!
//! Degenerate inputs (zero-length axes or quaternions) never fail; they fall
//! back to identity rotations or a fixed axis.

use serde::{Deserialize, Serialize};

pub use glam::{Quat, Vec2, Vec3, Vec4};

/// Tolerance used by `Rotation` equality.
pub const ROTATION_EPSILON: f32 = 0.000_001;

/// Axis-aligned rectangle. `x`/`y` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn position(&self) -> Vec2 { Vec2::new(self.x, self.y) }

    pub fn size(&self) -> Vec2 { Vec2::new(self.width, self.height) }

    /// True when either dimension is zero or negative.
    pub fn is_degenerate(&self) -> bool { self.width <= 0.0 || self.height <= 0.0 }
}

/// Rotation quaternion as stored on sprite bones.
///
/// Two rotations compare equal when `dot(a, b) > 1 - ROTATION_EPSILON`. This is
/// looser than component equality: nearly identical rotations are equal, while
/// `q` and `-q` (same orientation, opposite sign) are not.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rotation(pub Quat);

impl Rotation {
    pub const IDENTITY: Self = Self(Quat::IDENTITY);

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self { Self(Quat::from_xyzw(x, y, z, w)) }

    pub fn dot(self, other: Self) -> f32 { self.0.dot(other.0) }

    pub fn length(self) -> f32 { self.0.length() }

    pub fn to_vec4(self) -> Vec4 { Vec4::from(self.0) }

    /// Scale to unit length; a zero quaternion becomes the identity.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return Self::IDENTITY;
        }
        Self(Quat::from_vec4(self.to_vec4() / len))
    }

    /// Rotation of `degrees` around `axis`. A zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, degrees: f32) -> Self {
        if axis.length_squared() == 0.0 {
            return Self::IDENTITY;
        }
        let half = degrees.to_radians() * 0.5;
        let xyz = axis.normalize() * half.sin();
        Self::new(xyz.x, xyz.y, xyz.z, half.cos()).normalized()
    }

    /// Axis and angle (degrees). Near-zero angles report the X axis.
    pub fn to_axis_angle(self) -> (Vec3, f32) {
        let q = if self.0.w.abs() > 1.0 { self.normalized().0 } else { self.0 };
        let w = q.w.clamp(-1.0, 1.0);
        let angle = 2.0 * w.acos();
        let den = (1.0 - w * w).max(0.0).sqrt();
        let axis = if den > 0.0001 { Vec3::new(q.x, q.y, q.z) / den } else { Vec3::X };
        (axis, angle.to_degrees())
    }

    /// Angle in degrees between two rotations.
    pub fn angle(a: Self, b: Self) -> f32 {
        let f = a.dot(b);
        (f.abs().min(1.0).acos() * 2.0).to_degrees()
    }
}

impl Default for Rotation {
    fn default() -> Self { Self::IDENTITY }
}

impl PartialEq for Rotation {
    fn eq(&self, other: &Self) -> bool { self.dot(*other) > 1.0 - ROTATION_EPSILON }
}

impl From<Quat> for Rotation {
    fn from(q: Quat) -> Self { Self(q) }
}
