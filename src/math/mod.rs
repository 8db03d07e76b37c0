//! Left-handed math helpers shared by the camera variants.
//!
//! Reference basis: +X right, +Y up, +Z forward.

pub mod orientation;

pub use orientation::Orientation3D;

use glam::{Mat4, Vec3};

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::Y;
/// World forward axis.
pub const WORLD_FORWARD: Vec3 = Vec3::Z;
/// World right axis.
pub const WORLD_RIGHT: Vec3 = Vec3::X;

/// Left-handed look-at view matrix that tolerates degenerate input.
///
/// When `eye` coincides with `target`, or the view direction is collinear
/// with `up`, the matrix is built from `fallback` instead.
#[must_use]
pub fn look_at_lh(eye: Vec3, target: Vec3, up: Vec3, fallback: &Orientation3D) -> Mat4 {
    let direction = target - eye;
    if direction.length_squared() < f32::EPSILON * f32::EPSILON
        || direction.cross(up).length_squared() < 1e-8
    {
        return look_to_lh(eye, fallback.forward(), fallback.up());
    }
    Mat4::look_at_lh(eye, target, up.normalize())
}

/// Left-handed look-to view matrix.
#[must_use]
pub fn look_to_lh(eye: Vec3, direction: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_to_lh(eye, direction.normalize(), up.normalize())
}

/// Left-handed perspective projection with a vertical field of view.
#[must_use]
pub fn perspective_lh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_lh(fov_y, aspect.max(f32::EPSILON), near, far)
}
