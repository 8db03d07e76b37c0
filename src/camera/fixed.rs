use std::sync::Arc;
use std::time::Duration;

use glam::{Mat4, Vec3};

use super::{Camera, DEFAULT_FIELD_OF_VIEW, DEFAULT_MOVE_SPEED, Wasd, step};
use crate::input::InputContext;
use crate::math::{self, Orientation3D, WORLD_UP};

/// A camera that always faces a fixed target.
///
/// W advances toward the target, S backs away, A/D strafe. Once the camera
/// sits on the target, W no longer moves it.
pub struct FixedCamera {
    position: Vec3,
    target: Vec3,
    orientation: Orientation3D,
    input: Option<Arc<dyn InputContext>>,
    pub field_of_view: f32,
    pub move_speed: f32,
}

impl FixedCamera {
    #[must_use]
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut orientation = Orientation3D::new();
        orientation.look_to(target - position);
        Self {
            position,
            target,
            orientation,
            input: None,
            field_of_view: DEFAULT_FIELD_OF_VIEW,
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }

    #[must_use]
    pub fn with_field_of_view(mut self, field_of_view: f32) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }
}

impl Camera for FixedCamera {
    fn update(&mut self, elapsed: Duration) {
        let Some(input) = &self.input else {
            return;
        };

        let direction = self.target - self.position;
        self.orientation.look_to(direction);

        let mut wasd = Wasd::read(input.as_ref());
        if wasd.advance > 0.0 && direction.length_squared() <= f32::EPSILON * f32::EPSILON {
            wasd.advance = 0.0;
        }
        if wasd.is_idle() {
            return;
        }

        let offset = (self.orientation.forward() * wasd.advance + self.orientation.right() * wasd.strafe)
            * step(self.move_speed, elapsed);
        self.move_by(offset);
    }

    fn init_input(&mut self, input: Option<Arc<dyn InputContext>>) {
        self.input = input;
    }

    fn move_by(&mut self, offset: Vec3) -> Vec3 {
        self.position += offset;
        self.position
    }

    fn view_matrix(&self) -> Mat4 {
        math::look_at_lh(self.position, self.target, WORLD_UP, &self.orientation)
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
}
