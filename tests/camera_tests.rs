//! Camera variant tests
//!
//! Tests for:
//! - Unbound cameras ignore update
//! - FixedCamera WASD movement, including W while sitting on the target
//! - ArcCamera keeps its orbit radius, even when moved onto its target
//! - FreeCamera mouse steering and dead-zone
//! - TrailingCamera follows a moving object
//! - Rotatable return values and move_by

use std::sync::Arc;
use std::time::Duration;

use glam::{Vec2, Vec3};
use moteur::camera::{ArcCamera, Camera, FixedCamera, FreeCamera, Rotatable, SceneObject, TrailingCamera};
use moteur::input::InputContext;
use moteur::input::embedded::EmbeddedInputContext;
use moteur::window::embedded::devices::pointer_update;
use moteur::window::embedded::{PointerArgs, SurfacePanel, VirtualKey};
use moteur::window::{DispatcherQueueController, Size};
use parking_lot::Mutex;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;
const SECOND: Duration = Duration::from_secs(1);

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn embedded_input() -> (Arc<SurfacePanel>, Arc<dyn InputContext>) {
    let dispatcher = DispatcherQueueController::new();
    let panel = SurfacePanel::new(dispatcher.queue(), Size::new(800, 600));
    let input = EmbeddedInputContext::new(panel.clone()).expect("panel is attached");
    (panel, Arc::new(input))
}

struct Beacon(Mutex<Vec3>);

impl SceneObject for Beacon {
    fn position(&self) -> Vec3 {
        *self.0.lock()
    }
}

// ============================================================================
// FixedCamera
// ============================================================================

#[test]
fn fixed_camera_without_input_does_not_move() {
    let (panel, _input) = embedded_input();
    panel.keyboard().press(VirtualKey::W, 0x11);

    let mut camera = FixedCamera::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO);
    camera.update(SECOND);
    assert_eq!(camera.position(), Vec3::new(0.0, 0.0, -10.0));
}

#[test]
fn fixed_camera_w_advances_toward_target() {
    let (panel, input) = embedded_input();
    let mut camera = FixedCamera::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO);
    camera.init_input(Some(input));

    panel.keyboard().press(VirtualKey::W, 0x11);
    camera.update(SECOND);
    assert!(vec3_approx(camera.position(), Vec3::new(0.0, 0.0, -9.0)));

    panel.keyboard().release(VirtualKey::W, 0x11);
    panel.keyboard().press(VirtualKey::S, 0x1F);
    camera.update(SECOND);
    assert!(vec3_approx(camera.position(), Vec3::new(0.0, 0.0, -10.0)));
}

#[test]
fn fixed_camera_w_at_target_does_not_move() {
    let (panel, input) = embedded_input();
    let target = Vec3::new(1.0, 2.0, 3.0);
    let mut camera = FixedCamera::new(target, target);
    camera.init_input(Some(input));

    panel.keyboard().press(VirtualKey::W, 0x11);
    for _ in 0..10 {
        camera.update(SECOND);
    }
    assert_eq!(camera.position(), target);
}

#[test]
fn fixed_camera_move_speed_scales_step() {
    let (panel, input) = embedded_input();
    let mut camera = FixedCamera::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO);
    camera.move_speed = 4.0;
    camera.init_input(Some(input));

    panel.keyboard().press(VirtualKey::W, 0x11);
    camera.update(Duration::from_millis(500));
    assert!(vec3_approx(camera.position(), Vec3::new(0.0, 0.0, -8.0)));
}

#[test]
fn unbinding_input_stops_updates() {
    let (panel, input) = embedded_input();
    let mut camera = FixedCamera::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO);
    camera.init_input(Some(input));
    camera.init_input(None);

    panel.keyboard().press(VirtualKey::W, 0x11);
    camera.update(SECOND);
    assert_eq!(camera.position(), Vec3::new(0.0, 0.0, -10.0));
}

// ============================================================================
// ArcCamera
// ============================================================================

#[test]
fn arc_camera_distance_is_constant() {
    let (panel, input) = embedded_input();
    let target = Vec3::new(0.5, -1.0, 2.0);
    let mut camera = ArcCamera::new(Vec3::new(0.0, 3.0, -8.0), target);
    let radius = camera.distance();
    camera.init_input(Some(input));

    panel.keyboard().press(VirtualKey::W, 0x11);
    panel.keyboard().press(VirtualKey::D, 0x20);
    for _ in 0..200 {
        camera.update(Duration::from_millis(50));
        assert!(
            (camera.position().distance(target) - radius).abs() < 1e-3,
            "radius drifted to {}",
            camera.position().distance(target)
        );
    }
    assert!(vec3_approx(camera.orientation().forward(), (target - camera.position()).normalize()));
}

#[test]
fn arc_camera_move_by_is_snapped_back_on_update() {
    let (_panel, input) = embedded_input();
    let mut camera = ArcCamera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO);
    camera.init_input(Some(input));

    let moved = camera.move_by(Vec3::new(0.0, 0.0, -5.0));
    assert_eq!(moved, Vec3::new(0.0, 0.0, -10.0));

    camera.update(SECOND);
    assert!(vec3_approx(camera.position(), Vec3::new(0.0, 0.0, -5.0)));
}

#[test]
fn arc_camera_moved_onto_target_keeps_previous_forward() {
    let (_panel, input) = embedded_input();
    let target = Vec3::new(1.0, 2.0, 3.0);
    let start = Vec3::new(1.0, 2.0, -2.0);
    let mut camera = ArcCamera::new(start, target);
    let radius = camera.distance();
    camera.init_input(Some(input));

    let moved = camera.move_by(target - camera.position());
    assert!(vec3_approx(moved, target));

    camera.update(SECOND);
    let position = camera.position();
    assert!(position.is_finite());
    assert!(approx_eq(position.distance(target), radius));
    assert!(approx_eq(camera.distance(), radius));
    assert!(vec3_approx(position, start));
    assert!(vec3_approx(camera.orientation().forward(), Vec3::Z));
}

// ============================================================================
// FreeCamera
// ============================================================================

#[test]
fn free_camera_centered_mouse_does_not_rotate() {
    let (panel, input) = embedded_input();
    let mut camera = FreeCamera::new(Vec3::ZERO);
    camera.resize(Size::new(800, 600));
    camera.init_input(Some(input));

    panel
        .mouse()
        .move_to(PointerArgs::mouse(pointer_update::OTHER, Vec2::new(400.0, 300.0)));
    camera.update(SECOND);
    assert!(vec3_approx(camera.orientation().forward(), Vec3::Z));
}

#[test]
fn free_camera_mouse_at_right_edge_yaws_right() {
    let (panel, input) = embedded_input();
    let mut camera = FreeCamera::new(Vec3::ZERO);
    camera.resize(Size::new(800, 600));
    camera.init_input(Some(input));

    panel
        .mouse()
        .move_to(PointerArgs::mouse(pointer_update::OTHER, Vec2::new(800.0, 300.0)));
    camera.update(SECOND);

    let forward = camera.orientation().forward();
    assert!(forward.x > 0.0);
    assert!(approx_eq(forward.y, 0.0));
    assert!(approx_eq(forward.angle_between(Vec3::Z), camera.rotation_step));
}

#[test]
fn free_camera_without_viewport_ignores_mouse() {
    let (panel, input) = embedded_input();
    let mut camera = FreeCamera::new(Vec3::ZERO);
    camera.init_input(Some(input));

    panel
        .mouse()
        .move_to(PointerArgs::mouse(pointer_update::OTHER, Vec2::new(800.0, 0.0)));
    camera.update(SECOND);
    assert!(vec3_approx(camera.orientation().forward(), Vec3::Z));
}

#[test]
fn free_camera_w_moves_along_forward() {
    let (panel, input) = embedded_input();
    let mut camera = FreeCamera::new(Vec3::ZERO);
    camera.set_rotation(Vec3::Y, std::f32::consts::FRAC_PI_2);
    camera.init_input(Some(input));

    panel.keyboard().press(VirtualKey::W, 0x11);
    camera.update(SECOND);
    assert!(vec3_approx(camera.position(), Vec3::X));
}

#[test]
fn rotatable_returns_zero_translation() {
    let mut camera = FreeCamera::new(Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(camera.rotate(Vec3::X, 0.5), Vec3::ZERO);
    assert_eq!(camera.set_rotation_euler(0.1, 0.2, 0.3), Vec3::ZERO);
    assert_eq!(camera.rotate_euler(0.1, 0.0, 0.0), Vec3::ZERO);
    assert_eq!(camera.position(), Vec3::new(1.0, 1.0, 1.0));
}

// ============================================================================
// TrailingCamera
// ============================================================================

#[test]
fn trailing_camera_follows_moving_object() {
    let (_panel, input) = embedded_input();
    let beacon = Arc::new(Beacon(Mutex::new(Vec3::new(0.0, 0.0, 10.0))));
    let mut camera = TrailingCamera::new(Vec3::ZERO, beacon.clone());
    camera.init_input(Some(input));
    assert!(vec3_approx(camera.orientation().forward(), Vec3::Z));

    *beacon.0.lock() = Vec3::new(10.0, 0.0, 0.0);
    camera.update(SECOND);
    assert!(vec3_approx(camera.orientation().forward(), Vec3::X));
    assert_eq!(camera.position(), Vec3::ZERO);

    let view = camera.view_matrix();
    let p = view.transform_point3(Vec3::new(10.0, 0.0, 0.0));
    assert!(vec3_approx(p, Vec3::new(0.0, 0.0, 10.0)));
}
