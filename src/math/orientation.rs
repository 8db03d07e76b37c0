use glam::{Mat4, Quat, Vec3};

use super::{WORLD_FORWARD, WORLD_UP};

/// Quaternion-backed orthonormal basis.
///
/// The only mutable state is a unit quaternion. `up`, `forward` and `right`
/// are derived from it after every mutation by rotating the fixed reference
/// axes (+Y up, +Z forward). `right` is re-derived as `cross(up, forward)`
/// rather than rotated, so the three vectors stay consistent with each other
/// even when the quaternion drifts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation3D {
    quaternion: Quat,
    up: Vec3,
    forward: Vec3,
    right: Vec3,
}

impl Default for Orientation3D {
    fn default() -> Self {
        Self::new()
    }
}

impl Orientation3D {
    /// Identity orientation: up = +Y, forward = +Z, right = +X.
    #[must_use]
    pub fn new() -> Self {
        Self::from_quat(Quat::IDENTITY)
    }

    #[must_use]
    pub fn from_quat(quaternion: Quat) -> Self {
        let mut orientation = Self {
            quaternion: Quat::IDENTITY,
            up: WORLD_UP,
            forward: WORLD_FORWARD,
            right: Vec3::X,
        };
        orientation.set_quaternion(quaternion);
        orientation
    }

    /// Orientation whose forward axis points along `direction`.
    #[must_use]
    pub fn looking_to(direction: Vec3) -> Self {
        let mut orientation = Self::new();
        orientation.look_to(direction);
        orientation
    }

    // ========================================================================
    // Getters
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn quaternion(&self) -> Quat {
        self.quaternion
    }

    #[inline]
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[inline]
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Composes a rotation of `angle` radians about `axis` onto the current orientation.
    ///
    /// The new rotation is applied in world space (left-multiplied) and the
    /// product is renormalized. Angles within one float epsilon of zero and
    /// zero-length axes are ignored.
    pub fn rotate(&mut self, axis: Vec3, angle: f32) {
        if angle.abs() < f32::EPSILON {
            return;
        }
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        self.rotate_quat(Quat::from_axis_angle(axis, angle));
    }

    /// Left-multiplies `rotation` onto the current orientation.
    pub fn rotate_quat(&mut self, rotation: Quat) {
        self.quaternion = (rotation * self.quaternion).normalize();
        self.update_basis();
    }

    /// Replaces the orientation with a rotation of `angle` radians about `axis`.
    pub fn set_rotation(&mut self, axis: Vec3, angle: f32) {
        let rotation = match axis.try_normalize() {
            Some(axis) if angle.abs() >= f32::EPSILON => Quat::from_axis_angle(axis, angle),
            _ => Quat::IDENTITY,
        };
        self.set_quaternion(rotation);
    }

    pub fn set_quaternion(&mut self, quaternion: Quat) {
        self.quaternion = if quaternion.is_finite() && quaternion.length_squared() > f32::EPSILON {
            quaternion.normalize()
        } else {
            Quat::IDENTITY
        };
        self.update_basis();
    }

    /// Turns the forward axis toward `direction`, keeping world +Y as the up reference.
    ///
    /// Directions of (near-)zero length leave the orientation unchanged.
    pub fn look_to(&mut self, direction: Vec3) {
        if direction.length_squared() < f32::EPSILON * f32::EPSILON {
            return;
        }
        let forward = direction.normalize();
        let view = Mat4::look_to_lh(Vec3::ZERO, forward, reference_up(forward));
        // The view matrix maps world to camera; its transpose is the camera basis in world space.
        self.quaternion = Quat::from_mat4(&view.transpose()).normalize();
        self.update_basis();
    }

    fn update_basis(&mut self) {
        self.up = (self.quaternion * WORLD_UP).normalize();
        self.forward = (self.quaternion * WORLD_FORWARD).normalize();
        self.right = self.up.cross(self.forward).normalize();
    }
}

/// World up, unless `forward` is collinear with it.
fn reference_up(forward: Vec3) -> Vec3 {
    if forward.cross(WORLD_UP).length_squared() > 1e-6 {
        WORLD_UP
    } else if forward.y > 0.0 {
        -WORLD_FORWARD
    } else {
        WORLD_FORWARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_up_avoids_collinear_axes() {
        assert_eq!(reference_up(Vec3::Z), Vec3::Y);
        assert_eq!(reference_up(Vec3::Y), -Vec3::Z);
        assert_eq!(reference_up(-Vec3::Y), Vec3::Z);
    }

    #[test]
    fn looking_straight_up_keeps_a_finite_basis() {
        let o = Orientation3D::looking_to(Vec3::Y);
        assert!(o.forward().abs_diff_eq(Vec3::Y, 1e-5));
        assert!(o.up().abs_diff_eq(-Vec3::Z, 1e-5));
        assert!(o.right().is_finite());
    }
}
