//! Platform-agnostic input devices and contexts.
//!
//! # Overview
//!
//! - Device traits: [`InputDevice`], [`Keyboard`], [`Mouse`] (+ [`Cursor`]),
//!   [`Joystick`], [`Gamepad`] (+ [`Motor`]).
//! - [`InputContext`]: the devices available to one window.
//! - [`InputPlatform`]: decides whether it can serve a given window and builds
//!   the matching context. [`InputPlatforms`] picks the first applicable one.
//!
//! Every device event is an [`Event`] whose native subscription is created
//! lazily on the first listener and released with the last one.
//!
//! Event arguments carry a [`DeviceId`] rather than a device reference; use
//! [`InputContext::keyboard`] and friends to get back to the wrapper.

pub mod embedded;
pub mod platform;
pub mod types;
#[cfg(feature = "winit")]
pub mod winit;

use std::sync::Arc;
use std::time::Duration;

use glam::{UVec2, Vec2};

use crate::errors::Result;
use crate::events::Event;

pub use platform::{InputPlatform, InputPlatforms};
pub use types::*;

// ============================================================================
// Devices
// ============================================================================

/// Attributes shared by every device kind.
pub trait InputDevice: Send + Sync {
    fn id(&self) -> DeviceId;

    /// Hardware-reported name.
    fn name(&self) -> String;

    fn is_connected(&self) -> bool;

    fn kind(&self) -> DeviceKind;

    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: self.id(),
            kind: self.kind(),
            name: self.name(),
        }
    }
}

pub trait Keyboard: InputDevice {
    /// Keys this backend can report.
    fn supported_keys(&self) -> Vec<Key>;

    fn is_key_pressed(&self, key: Key) -> bool;

    fn is_scancode_pressed(&self, scancode: u32) -> bool;

    fn clipboard_text(&self) -> Result<String>;

    fn set_clipboard_text(&self, text: &str) -> Result<()>;

    /// Requests text input (IME, on-screen keyboard) from the platform.
    fn begin_input(&self);

    fn end_input(&self);

    fn key_down(&self) -> &Event<KeyEvent>;

    fn key_up(&self) -> &Event<KeyEvent>;

    fn key_char(&self) -> &Event<CharEvent>;
}

/// The mouse cursor attached to a [`Mouse`].
pub trait Cursor: Send + Sync {
    fn cursor_type(&self) -> CursorType;

    fn set_cursor_type(&self, cursor_type: CursorType) -> Result<()>;

    fn standard_cursor(&self) -> StandardCursor;

    fn set_standard_cursor(&self, cursor: StandardCursor) -> Result<()>;

    fn cursor_mode(&self) -> CursorMode;

    fn set_cursor_mode(&self, mode: CursorMode) -> Result<()>;

    fn is_confined(&self) -> bool;

    fn set_confined(&self, confined: bool) -> Result<()>;

    fn hotspot(&self) -> UVec2;

    fn set_hotspot(&self, hotspot: UVec2);

    fn image(&self) -> Option<RawImage>;

    fn set_image(&self, image: Option<RawImage>) -> Result<()>;

    fn is_mode_supported(&self, mode: CursorMode) -> bool;

    fn is_standard_supported(&self, cursor: StandardCursor) -> bool;
}

pub trait Mouse: InputDevice {
    fn supported_buttons(&self) -> Vec<MouseButton>;

    /// Offsets of every wheel for the most recent scroll.
    fn scroll_wheels(&self) -> Vec<ScrollWheel>;

    /// Cursor position in logical window units.
    fn position(&self) -> Vec2;

    fn set_position(&self, position: Vec2) -> Result<()>;

    fn cursor(&self) -> Arc<dyn Cursor>;

    fn is_button_pressed(&self, button: MouseButton) -> bool;

    /// Maximum delay between two clicks of a double-click.
    fn double_click_time(&self) -> Duration;

    fn set_double_click_time(&self, time: Duration);

    /// Maximum distance in logical units between two clicks of a double-click.
    fn double_click_range(&self) -> f32;

    fn set_double_click_range(&self, range: f32);

    fn mouse_down(&self) -> &Event<MouseButtonEvent>;

    fn mouse_up(&self) -> &Event<MouseButtonEvent>;

    fn click(&self) -> &Event<MouseButtonEvent>;

    fn double_click(&self) -> &Event<MouseButtonEvent>;

    fn mouse_move(&self) -> &Event<MouseMoveEvent>;

    fn scroll(&self) -> &Event<ScrollEvent>;
}

pub trait Joystick: InputDevice {
    fn axes(&self) -> Vec<Axis>;

    fn buttons(&self) -> Vec<Button>;

    fn hats(&self) -> Vec<Hat>;

    fn deadzone(&self) -> Deadzone;

    fn set_deadzone(&self, deadzone: Deadzone);

    fn button_down(&self) -> &Event<ButtonEvent>;

    fn button_up(&self) -> &Event<ButtonEvent>;

    fn axis_moved(&self) -> &Event<AxisEvent>;

    fn hat_moved(&self) -> &Event<HatEvent>;
}

/// A vibration motor.
pub trait Motor: Send + Sync {
    fn index(&self) -> usize;

    /// Current speed in [0, 1].
    fn speed(&self) -> f32;

    /// Sets the speed, clamped to [0, 1].
    fn set_speed(&self, speed: f32);
}

pub trait Gamepad: InputDevice {
    fn buttons(&self) -> Vec<Button>;

    fn thumbsticks(&self) -> Vec<Thumbstick>;

    fn triggers(&self) -> Vec<Trigger>;

    fn vibration_motors(&self) -> Vec<Arc<dyn Motor>>;

    fn deadzone(&self) -> Deadzone;

    fn set_deadzone(&self, deadzone: Deadzone);

    fn button_down(&self) -> &Event<ButtonEvent>;

    fn button_up(&self) -> &Event<ButtonEvent>;

    fn thumbstick_moved(&self) -> &Event<ThumbstickEvent>;

    fn trigger_moved(&self) -> &Event<TriggerEvent>;
}

// ============================================================================
// Context
// ============================================================================

/// Devices available to one window.
///
/// Collections are re-queried on every call and reflect the native state at
/// that moment. Dropping the context releases its native bindings.
pub trait InputContext: Send + Sync {
    /// Name of the backend that built this context.
    fn backend_name(&self) -> &'static str;

    fn gamepads(&self) -> Vec<Arc<dyn Gamepad>>;

    fn joysticks(&self) -> Vec<Arc<dyn Joystick>>;

    fn keyboards(&self) -> Vec<Arc<dyn Keyboard>>;

    fn mice(&self) -> Vec<Arc<dyn Mouse>>;

    /// Devices that are neither keyboards, mice, joysticks nor gamepads.
    fn other_devices(&self) -> Vec<Arc<dyn InputDevice>>;

    /// Raised when a device is plugged in or removed.
    fn connection_changed(&self) -> &Event<ConnectionChange>;

    fn keyboard(&self, id: DeviceId) -> Option<Arc<dyn Keyboard>> {
        self.keyboards().into_iter().find(|k| k.id() == id)
    }

    fn mouse(&self, id: DeviceId) -> Option<Arc<dyn Mouse>> {
        self.mice().into_iter().find(|m| m.id() == id)
    }

    fn gamepad(&self, id: DeviceId) -> Option<Arc<dyn Gamepad>> {
        self.gamepads().into_iter().find(|g| g.id() == id)
    }

    fn joystick(&self, id: DeviceId) -> Option<Arc<dyn Joystick>> {
        self.joysticks().into_iter().find(|j| j.id() == id)
    }

    /// First keyboard, if any.
    fn primary_keyboard(&self) -> Option<Arc<dyn Keyboard>> {
        self.keyboards().into_iter().next()
    }

    /// First mouse, if any.
    fn primary_mouse(&self) -> Option<Arc<dyn Mouse>> {
        self.mice().into_iter().next()
    }
}
