#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod camera;
pub mod engine;
pub mod errors;
pub mod events;
pub mod input;
pub mod logging;
pub mod math;
pub mod window;

pub use camera::{ArcCamera, Camera, FixedCamera, FreeCamera, Rotatable, SceneObject, TrailingCamera};
pub use engine::{Engine, FrameState, RenderView};
pub use errors::{MoteurError, Result};
pub use events::{Event, NativeSignal, Subscription};
pub use input::{InputContext, InputPlatform, InputPlatforms, Key, MouseButton};
pub use math::Orientation3D;
pub use window::embedded::EmbeddedWindow;
#[cfg(feature = "winit")]
pub use window::winit::WinitWindow;
pub use window::{Size, Window, WindowOptions};
