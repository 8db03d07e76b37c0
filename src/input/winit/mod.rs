//! Input for [`WinitWindow`]: one keyboard and one mouse per window, plus
//! the controllers of the window's [`ControllerHub`](controllers::ControllerHub).
//!
//! Controllers are read through gilrs when the `gilrs` feature is on; without
//! it the hub stays empty. Adapters are cached by device id like the embedded
//! backend's, so listeners survive repeated [`InputContext::gamepads`] queries.

pub mod controllers;
pub mod convert;
pub mod devices;
#[cfg(feature = "gilrs")]
pub mod pump;

use std::sync::Arc;

use self::controllers::ControllerSet;
use self::devices::{WinitInputState, WinitKeyboard, WinitMouse};
use super::{ConnectionChange, Gamepad, InputContext, InputDevice, InputPlatform, Joystick, Keyboard, Mouse};
use crate::errors::{MoteurError, Result};
use crate::events::{Event, Subscription};
use crate::window::Window;
use crate::window::winit::{WinitInputSource, WinitWindow};

const BACKEND_NAME: &str = "winit";

/// Serves windows of type [`WinitWindow`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WinitInputPlatform;

impl InputPlatform for WinitInputPlatform {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn is_applicable(&self, window: &dyn Window) -> bool {
        window.as_any().is::<WinitWindow>()
    }

    fn create_input(&self, window: &dyn Window) -> Result<Arc<dyn InputContext>> {
        let winit_window = window
            .as_any()
            .downcast_ref::<WinitWindow>()
            .ok_or(MoteurError::BackendMismatch {
                platform: BACKEND_NAME,
                window: window.backend_name(),
            })?;
        let source = winit_window
            .input_source()
            .ok_or(MoteurError::MissingDependency("native window"))?;
        Ok(Arc::new(WinitInputContext::new(source)))
    }
}

pub struct WinitInputContext {
    keyboard: Arc<WinitKeyboard>,
    mouse: Arc<WinitMouse>,
    controllers: ControllerSet,
    _state_tracker: Subscription,
}

impl WinitInputContext {
    #[must_use]
    pub fn new(source: WinitInputSource) -> Self {
        let state = WinitInputState::new();
        let state_tracker = {
            let state = state.clone();
            let window = source.window.clone();
            source.events.connect(move |event| state.observe(event, window.scale_factor()))
        };

        Self {
            keyboard: Arc::new(WinitKeyboard::new(source.clone(), state.clone())),
            mouse: Arc::new(WinitMouse::new(source.clone(), state)),
            controllers: ControllerSet::new(source.controllers),
            _state_tracker: state_tracker,
        }
    }
}

impl InputContext for WinitInputContext {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn gamepads(&self) -> Vec<Arc<dyn Gamepad>> {
        self.controllers.gamepads()
    }

    fn joysticks(&self) -> Vec<Arc<dyn Joystick>> {
        self.controllers.joysticks()
    }

    fn keyboards(&self) -> Vec<Arc<dyn Keyboard>> {
        vec![self.keyboard.clone()]
    }

    fn mice(&self) -> Vec<Arc<dyn Mouse>> {
        vec![self.mouse.clone()]
    }

    fn other_devices(&self) -> Vec<Arc<dyn InputDevice>> {
        Vec::new()
    }

    fn connection_changed(&self) -> &Event<ConnectionChange> {
        self.controllers.connection_changed()
    }
}
