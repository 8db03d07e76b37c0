use std::sync::Arc;
use std::time::Duration;

use glam::{Mat4, Vec3};

use super::{Camera, DEFAULT_FIELD_OF_VIEW, SceneObject};
use crate::input::InputContext;
use crate::math::{self, Orientation3D, WORLD_UP};

/// A camera that keeps looking at a moving scene object.
///
/// The camera's own position only changes through [`move_by`](Camera::move_by);
/// the target position is read live on every query.
pub struct TrailingCamera {
    position: Vec3,
    target: Arc<dyn SceneObject>,
    orientation: Orientation3D,
    input: Option<Arc<dyn InputContext>>,
    pub field_of_view: f32,
}

impl TrailingCamera {
    #[must_use]
    pub fn new(position: Vec3, target: Arc<dyn SceneObject>) -> Self {
        let mut orientation = Orientation3D::new();
        orientation.look_to(target.position() - position);
        Self {
            position,
            target,
            orientation,
            input: None,
            field_of_view: DEFAULT_FIELD_OF_VIEW,
        }
    }

    #[must_use]
    pub fn with_field_of_view(mut self, field_of_view: f32) -> Self {
        self.field_of_view = field_of_view;
        self
    }

    #[must_use]
    pub fn target(&self) -> &Arc<dyn SceneObject> {
        &self.target
    }
}

impl Camera for TrailingCamera {
    fn update(&mut self, _elapsed: Duration) {
        if self.input.is_none() {
            return;
        }
        self.orientation.look_to(self.target.position() - self.position);
    }

    /// Stored only; the trailing camera reads no input.
    fn init_input(&mut self, input: Option<Arc<dyn InputContext>>) {
        self.input = input;
    }

    fn move_by(&mut self, offset: Vec3) -> Vec3 {
        self.position += offset;
        self.position
    }

    fn view_matrix(&self) -> Mat4 {
        math::look_at_lh(self.position, self.target.position(), WORLD_UP, &self.orientation)
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
