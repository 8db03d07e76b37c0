use std::sync::Arc;
use std::time::Duration;

use glam::{Mat4, Vec3};

use super::{Camera, DEFAULT_FIELD_OF_VIEW, DEFAULT_MOVE_SPEED, Wasd, step};
use crate::input::InputContext;
use crate::math::{self, Orientation3D};

/// A camera orbiting a fixed target at a constant distance.
///
/// W/S move along the camera's up axis, A/D along its right axis; after each
/// move the position is pulled back onto the sphere around the target.
pub struct ArcCamera {
    position: Vec3,
    target: Vec3,
    distance: f32,
    orientation: Orientation3D,
    input: Option<Arc<dyn InputContext>>,
    pub field_of_view: f32,
    pub move_speed: f32,
}

impl ArcCamera {
    #[must_use]
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut orientation = Orientation3D::new();
        orientation.look_to(target - position);
        Self {
            position,
            target,
            distance: position.distance(target),
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

    /// Orbit radius fixed at construction.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Re-projects the position onto the orbit sphere and faces the target.
    fn snap_to_orbit(&mut self) {
        let direction = self.target - self.position;
        let forward = direction.try_normalize().unwrap_or_else(|| self.orientation.forward());
        self.position = self.target - forward * self.distance;
        self.orientation.look_to(forward);
    }
}

impl Camera for ArcCamera {
    fn update(&mut self, elapsed: Duration) {
        let Some(input) = &self.input else {
            return;
        };

        let wasd = Wasd::read(input.as_ref());
        if !wasd.is_idle() {
            let offset = (self.orientation.up() * wasd.advance + self.orientation.right() * wasd.strafe)
                * step(self.move_speed, elapsed);
            self.position += offset;
        }
        self.snap_to_orbit();
    }

    fn init_input(&mut self, input: Option<Arc<dyn InputContext>>) {
        self.input = input;
    }

    fn move_by(&mut self, offset: Vec3) -> Vec3 {
        self.position += offset;
        self.position
    }

    fn view_matrix(&self) -> Mat4 {
        math::look_at_lh(self.position, self.target, self.orientation.up(), &self.orientation)
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
