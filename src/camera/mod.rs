//! Camera variants.
//!
//! | Variant                          | Position            | Looks at                         | Input           |
//! |----------------------------------|---------------------|----------------------------------|-----------------|
//! | [`FixedCamera`]                  | WASD along forward  | a fixed target                   | keyboard        |
//! | [`ArcCamera`]                    | orbits the target   | a fixed target, constant radius  | keyboard        |
//! | [`FreeCamera`]                   | WASD along forward  | its own orientation              | keyboard, mouse |
//! | [`TrailingCamera`]               | independent         | a moving [`SceneObject`]         | none            |
//!
//! A camera starts unbound; [`Camera::init_input`] binds it to an input
//! context and [`Camera::update`] does nothing until then.

pub mod arc;
pub mod fixed;
pub mod free;
pub mod trailing;

use std::f32::consts::FRAC_PI_4;
use std::sync::Arc;
use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::input::{InputContext, Key};
use crate::math::Orientation3D;
use crate::window::Size;

pub use arc::ArcCamera;
pub use fixed::FixedCamera;
pub use free::{FreeCamera, Rotatable};
pub use trailing::TrailingCamera;

/// Default vertical field of view in radians.
pub const DEFAULT_FIELD_OF_VIEW: f32 = FRAC_PI_4;

/// Default translation speed in world units per second.
pub const DEFAULT_MOVE_SPEED: f32 = 1.0;

/// Anything with a world position a camera can follow.
pub trait SceneObject: Send + Sync {
    fn position(&self) -> Vec3;
}

pub trait Camera: Send {
    /// Advances the camera by `elapsed`. No-op until an input context is bound.
    fn update(&mut self, elapsed: Duration);

    /// Binds (or with `None`, unbinds) the input context read by [`update`](Self::update).
    fn init_input(&mut self, input: Option<Arc<dyn InputContext>>);

    /// Translates the camera by `offset` and returns the new position.
    fn move_by(&mut self, offset: Vec3) -> Vec3;

    /// Left-handed view matrix.
    fn view_matrix(&self) -> Mat4;

    fn position(&self) -> Vec3;

    fn orientation(&self) -> &Orientation3D;

    /// Vertical field of view in radians.
    fn field_of_view(&self) -> f32 {
        DEFAULT_FIELD_OF_VIEW
    }

    /// Called when the viewport changes size.
    fn resize(&mut self, _viewport: Size) {}
}

/// Movement requested by the WASD keys, each axis in {-1, 0, 1}.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Wasd {
    /// D is +1, A is -1.
    pub(crate) strafe: f32,
    /// W is +1, S is -1.
    pub(crate) advance: f32,
}

impl Wasd {
    /// Reads WASD from the first keyboard of `input`.
    pub(crate) fn read(input: &dyn InputContext) -> Self {
        let Some(keyboard) = input.primary_keyboard() else {
            return Self::default();
        };
        let held = |key: Key| f32::from(u8::from(keyboard.is_key_pressed(key)));
        let axis = |positive: Key, negative: Key| held(positive) - held(negative);
        Self {
            strafe: axis(Key::D, Key::A),
            advance: axis(Key::W, Key::S),
        }
    }

    pub(crate) fn is_idle(self) -> bool {
        self.strafe == 0.0 && self.advance == 0.0
    }
}

/// Distance covered in `elapsed` at `speed` units per second.
pub(crate) fn step(speed: f32, elapsed: Duration) -> f32 {
    speed * elapsed.as_secs_f32()
}
