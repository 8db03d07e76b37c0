use std::f32::consts::PI;
use std::sync::Arc;
use std::time::Duration;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::{Camera, DEFAULT_FIELD_OF_VIEW, DEFAULT_MOVE_SPEED, Wasd, step};
use crate::input::InputContext;
use crate::math::{self, Orientation3D, WORLD_UP};
use crate::window::Size;

/// Rotation applied per update at full mouse deflection.
pub const DEFAULT_ROTATION_STEP: f32 = PI / 128.0;

/// Fraction of the half-extent around the viewport center that does not rotate.
pub const DEFAULT_MOUSE_DEADZONE: f32 = 0.125;

/// Explicit rotation of an object.
///
/// Each method returns the object's resulting translation, which is zero for
/// a pure rotation.
pub trait Rotatable {
    /// Composes a rotation of `angle` radians about `axis`.
    fn rotate(&mut self, axis: Vec3, angle: f32) -> Vec3;

    /// Replaces the orientation with a rotation of `angle` radians about `axis`.
    fn set_rotation(&mut self, axis: Vec3, angle: f32) -> Vec3;

    /// Composes a yaw (about Y), pitch (about X) and roll (about Z), in that order.
    fn rotate_euler(&mut self, yaw: f32, pitch: f32, roll: f32) -> Vec3;

    /// Replaces the orientation with the given yaw, pitch and roll.
    fn set_rotation_euler(&mut self, yaw: f32, pitch: f32, roll: f32) -> Vec3;
}

/// A free-fly camera steered by WASD and the mouse position.
///
/// The mouse acts as a joystick: its offset from the viewport center, outside
/// a small dead-zone, yaws about world +Y and pitches about the camera's right axis.
pub struct FreeCamera {
    position: Vec3,
    orientation: Orientation3D,
    viewport: Size,
    input: Option<Arc<dyn InputContext>>,
    pub field_of_view: f32,
    pub move_speed: f32,
    pub rotation_step: f32,
    pub mouse_deadzone: f32,
}

impl FreeCamera {
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            orientation: Orientation3D::new(),
            viewport: Size::default(),
            input: None,
            field_of_view: DEFAULT_FIELD_OF_VIEW,
            move_speed: DEFAULT_MOVE_SPEED,
            rotation_step: DEFAULT_ROTATION_STEP,
            mouse_deadzone: DEFAULT_MOUSE_DEADZONE,
        }
    }

    #[must_use]
    pub fn with_field_of_view(mut self, field_of_view: f32) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    /// Mouse position in [-1, 1] on both axes, +Y pointing down. `None` without a viewport.
    fn normalized_mouse(&self, position: Vec2) -> Option<Vec2> {
        if self.viewport.is_empty() {
            return None;
        }
        let normalized = position / self.viewport.as_vec2() * 2.0 - Vec2::ONE;
        Some(normalized.clamp(Vec2::NEG_ONE, Vec2::ONE))
    }

    fn steer(&mut self, mouse: Vec2) {
        if mouse.x.abs() > self.mouse_deadzone {
            self.orientation.rotate(WORLD_UP, self.rotation_step * mouse.x);
        }
        if mouse.y.abs() > self.mouse_deadzone {
            let right = self.orientation.right();
            self.orientation.rotate(right, self.rotation_step * mouse.y);
        }
    }
}

impl Camera for FreeCamera {
    fn update(&mut self, elapsed: Duration) {
        let Some(input) = self.input.clone() else {
            return;
        };

        let wasd = Wasd::read(input.as_ref());
        if !wasd.is_idle() {
            let offset = (self.orientation.forward() * wasd.advance + self.orientation.right() * wasd.strafe)
                * step(self.move_speed, elapsed);
            self.move_by(offset);
        }

        let mouse = input
            .primary_mouse()
            .and_then(|mouse| self.normalized_mouse(mouse.position()));
        if let Some(mouse) = mouse {
            self.steer(mouse);
        }
    }

    fn init_input(&mut self, input: Option<Arc<dyn InputContext>>) {
        self.input = input;
    }

    fn move_by(&mut self, offset: Vec3) -> Vec3 {
        self.position += offset;
        self.position
    }

    fn view_matrix(&self) -> Mat4 {
        math::look_to_lh(self.position, self.orientation.forward(), self.orientation.up())
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> &Orientation3D {
        &self.orientation
    }

    fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
    }
}

impl Rotatable for FreeCamera {
    fn rotate(&mut self, axis: Vec3, angle: f32) -> Vec3 {
        self.orientation.rotate(axis, angle);
        Vec3::ZERO
    }

    fn set_rotation(&mut self, axis: Vec3, angle: f32) -> Vec3 {
        self.orientation.set_rotation(axis, angle);
        Vec3::ZERO
    }

    fn rotate_euler(&mut self, yaw: f32, pitch: f32, roll: f32) -> Vec3 {
        self.orientation
            .rotate_quat(Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll));
        Vec3::ZERO
    }

    fn set_rotation_euler(&mut self, yaw: f32, pitch: f32, roll: f32) -> Vec3 {
        self.orientation
            .set_quaternion(Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll));
        Vec3::ZERO
    }
}
