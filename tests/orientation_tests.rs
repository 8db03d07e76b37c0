//! Orientation3D and view math tests
//!
//! Tests for:
//! - Identity basis
//! - Orthonormality after arbitrary rotation sequences
//! - look_to idempotence and the zero-length no-op
//! - Collinear look_to directions (straight up / straight down)
//! - Left-handed view and projection helpers

use glam::{Quat, Vec3, Vec4};
use moteur::math::{self, Orientation3D, WORLD_FORWARD, WORLD_RIGHT, WORLD_UP};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn assert_orthonormal(o: &Orientation3D) {
    assert!(approx_eq(o.up().length(), 1.0), "up not unit: {:?}", o.up());
    assert!(approx_eq(o.forward().length(), 1.0), "forward not unit: {:?}", o.forward());
    assert!(approx_eq(o.right().length(), 1.0), "right not unit: {:?}", o.right());
    assert!(approx_eq(o.up().dot(o.forward()), 0.0));
    assert!(approx_eq(o.up().dot(o.right()), 0.0));
    assert!(approx_eq(o.forward().dot(o.right()), 0.0));
    assert!(vec3_approx(o.right(), o.up().cross(o.forward())));
}

// ============================================================================
// Basis
// ============================================================================

#[test]
fn identity_basis_matches_world_axes() {
    let o = Orientation3D::new();
    assert_eq!(o.quaternion(), Quat::IDENTITY);
    assert!(vec3_approx(o.up(), WORLD_UP));
    assert!(vec3_approx(o.forward(), WORLD_FORWARD));
    assert!(vec3_approx(o.right(), WORLD_RIGHT));
}

#[test]
fn yaw_quarter_turn_about_up() {
    let mut o = Orientation3D::new();
    o.rotate(WORLD_UP, FRAC_PI_2);
    // +Z rotated a quarter turn about +Y lands on +X.
    assert!(vec3_approx(o.forward(), Vec3::X));
    assert!(vec3_approx(o.up(), WORLD_UP));
    assert!(vec3_approx(o.right(), Vec3::NEG_Z));
}

#[test]
fn orthonormal_after_many_rotations() {
    let mut o = Orientation3D::new();
    let axes = [
        Vec3::X,
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::NEG_Y,
        Vec3::new(-0.3, 0.1, 0.9),
    ];
    for i in 0..500 {
        let axis = axes[i % axes.len()];
        o.rotate(axis, 0.037 * (i as f32 + 1.0));
        assert_orthonormal(&o);
    }
}

#[test]
fn rotate_ignores_degenerate_input() {
    let mut o = Orientation3D::new();
    o.rotate(Vec3::ZERO, FRAC_PI_4);
    assert_eq!(o, Orientation3D::new());
    o.rotate(Vec3::X, 0.0);
    assert_eq!(o, Orientation3D::new());
}

#[test]
fn set_rotation_replaces_previous_state() {
    let mut o = Orientation3D::new();
    o.rotate(Vec3::X, 1.0);
    o.set_rotation(WORLD_UP, PI);
    assert!(vec3_approx(o.forward(), Vec3::NEG_Z));
    assert_orthonormal(&o);
}

#[test]
fn set_quaternion_normalizes_and_rejects_nan() {
    let mut o = Orientation3D::new();
    o.set_quaternion(Quat::from_xyzw(0.0, 2.0, 0.0, 2.0));
    assert!(approx_eq(o.quaternion().length(), 1.0));
    assert_orthonormal(&o);

    o.set_quaternion(Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0));
    assert_eq!(o.quaternion(), Quat::IDENTITY);
}

// ============================================================================
// look_to
// ============================================================================

#[test]
fn look_to_points_forward_along_direction() {
    let dir = Vec3::new(3.0, -1.0, 2.0);
    let o = Orientation3D::looking_to(dir);
    assert!(vec3_approx(o.forward(), dir.normalize()));
    assert_orthonormal(&o);
    // The up reference is world +Y, so right stays horizontal.
    assert!(approx_eq(o.right().y, 0.0));
}

#[test]
fn look_to_is_idempotent() {
    let mut o = Orientation3D::new();
    let dir = Vec3::new(-2.0, 0.5, 1.0);
    o.look_to(dir);
    let first = o;
    o.look_to(dir);
    assert!(vec3_approx(o.forward(), first.forward()));
    assert!(vec3_approx(o.up(), first.up()));
    assert!(vec3_approx(o.right(), first.right()));
}

#[test]
fn look_to_zero_is_noop() {
    let mut o = Orientation3D::new();
    o.rotate(Vec3::new(1.0, 1.0, 0.0), 0.7);
    let before = o;
    o.look_to(Vec3::ZERO);
    assert_eq!(o, before);
}

#[test]
fn look_to_straight_up_and_down_stays_orthonormal() {
    let mut o = Orientation3D::new();
    o.look_to(WORLD_UP);
    assert!(vec3_approx(o.forward(), WORLD_UP));
    assert_orthonormal(&o);

    o.look_to(-WORLD_UP);
    assert!(vec3_approx(o.forward(), -WORLD_UP));
    assert_orthonormal(&o);
}

// ============================================================================
// Matrices
// ============================================================================

#[test]
fn look_to_lh_places_target_on_positive_z() {
    let eye = Vec3::new(0.0, 0.0, -5.0);
    let view = math::look_to_lh(eye, Vec3::Z, WORLD_UP);
    let p = view.transform_point3(Vec3::ZERO);
    assert!(vec3_approx(p, Vec3::new(0.0, 0.0, 5.0)));
}

#[test]
fn look_at_lh_with_coincident_eye_uses_fallback() {
    let fallback = Orientation3D::looking_to(Vec3::X);
    let eye = Vec3::new(1.0, 2.0, 3.0);
    let view = math::look_at_lh(eye, eye, WORLD_UP, &fallback);
    assert!(view.is_finite());
    // Looking down +X: a point one unit further along +X is straight ahead.
    let p = view.transform_point3(eye + Vec3::X);
    assert!(vec3_approx(p, Vec3::new(0.0, 0.0, 1.0)));
}

#[test]
fn perspective_lh_maps_near_and_far_to_depth_range() {
    let proj = math::perspective_lh(FRAC_PI_4, 16.0 / 9.0, 2.0, 100.0);
    let near = proj * Vec4::new(0.0, 0.0, 2.0, 1.0);
    let far = proj * Vec4::new(0.0, 0.0, 100.0, 1.0);
    assert!(approx_eq(near.z / near.w, 0.0));
    assert!(approx_eq(far.z / far.w, 1.0));
}
