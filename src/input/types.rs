//! Platform-agnostic input vocabulary.
//!
//! Backend adapters translate their native codes into these types through
//! total mappings: any native value they do not recognize lands on the
//! neutral variant (`Unknown`, `Default`, `Centered`, …).

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

// ============================================================================
// Keyboard
// ============================================================================

/// Keyboard key enumeration (platform-agnostic)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Unknown,

    // Letter keys
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Number keys
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Control keys
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    CapsLock,
    NumLock,
    ScrollLock,
    PrintScreen,
    Pause,
    Menu,

    // Modifier keys
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    SuperLeft,
    SuperRight,

    // Arrow keys
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Punctuation
    Comma,
    Period,
    Slash,
    Backslash,
    Semicolon,
    Quote,
    BracketLeft,
    BracketRight,
    Minus,
    Equal,
    Grave,

    // Numpad
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadDecimal,
    NumpadEnter,
}

impl Key {
    /// Every recognized key, in declaration order. `Unknown` is excluded.
    #[rustfmt::skip]
    pub const ALL: &'static [Key] = &[
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
        Key::Key0, Key::Key1, Key::Key2, Key::Key3, Key::Key4,
        Key::Key5, Key::Key6, Key::Key7, Key::Key8, Key::Key9,
        Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6,
        Key::F7, Key::F8, Key::F9, Key::F10, Key::F11, Key::F12,
        Key::Space, Key::Enter, Key::Escape, Key::Backspace, Key::Tab, Key::Delete,
        Key::Insert, Key::Home, Key::End, Key::PageUp, Key::PageDown, Key::CapsLock,
        Key::NumLock, Key::ScrollLock, Key::PrintScreen, Key::Pause, Key::Menu,
        Key::ShiftLeft, Key::ShiftRight, Key::ControlLeft, Key::ControlRight,
        Key::AltLeft, Key::AltRight, Key::SuperLeft, Key::SuperRight,
        Key::ArrowUp, Key::ArrowDown, Key::ArrowLeft, Key::ArrowRight,
        Key::Comma, Key::Period, Key::Slash, Key::Backslash, Key::Semicolon, Key::Quote,
        Key::BracketLeft, Key::BracketRight, Key::Minus, Key::Equal, Key::Grave,
        Key::Numpad0, Key::Numpad1, Key::Numpad2, Key::Numpad3, Key::Numpad4,
        Key::Numpad5, Key::Numpad6, Key::Numpad7, Key::Numpad8, Key::Numpad9,
        Key::NumpadAdd, Key::NumpadSubtract, Key::NumpadMultiply,
        Key::NumpadDivide, Key::NumpadDecimal, Key::NumpadEnter,
    ];
}

// ============================================================================
// Mouse & Cursor
// ============================================================================

/// Mouse button enumeration
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Unknown,
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// One scroll wheel's offset for the last scroll event, in lines.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScrollWheel {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorType {
    #[default]
    Standard,
    Custom,
}

/// How the cursor interacts with the window.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorMode {
    /// Visible and free to leave the window.
    #[default]
    Normal,
    /// Invisible while over the window.
    Hidden,
    /// Invisible and locked to the window.
    Disabled,
    /// Locked with unaccelerated motion.
    Raw,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardCursor {
    #[default]
    Default,
    Arrow,
    IBeam,
    Crosshair,
    Hand,
    HResize,
    VResize,
    NwseResize,
    NeswResize,
    ResizeAll,
    NotAllowed,
    Wait,
    WaitArrow,
}

/// RGBA8 image used for custom cursors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl RawImage {
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }
}

// ============================================================================
// Controllers
// ============================================================================

/// Gamepad button names, following the common Xbox-style layout.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonName {
    Unknown,
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    Back,
    Start,
    Home,
    LeftStick,
    RightStick,
    DPadUp,
    DPadRight,
    DPadDown,
    DPadLeft,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Button {
    pub name: ButtonName,
    pub index: usize,
    pub pressed: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Axis {
    pub index: usize,
    /// Normalized position in [-1, 1].
    pub position: f32,
}

/// Direction of a point-of-view hat.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position2D {
    #[default]
    Centered,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Hat {
    pub index: usize,
    pub position: Position2D,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Thumbstick {
    pub index: usize,
    pub x: f32,
    pub y: f32,
}

impl Thumbstick {
    #[must_use]
    pub fn position(&self) -> f32 {
        Vec2::new(self.x, self.y).length()
    }

    /// Angle of the stick in radians, counter-clockwise from +X.
    #[must_use]
    pub fn direction(&self) -> f32 {
        self.y.atan2(self.x)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Trigger {
    pub index: usize,
    /// Pull amount in [0, 1].
    pub position: f32,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeadzoneMethod {
    /// Values inside the zone read as zero, values outside pass through.
    #[default]
    Traditional,
    /// Values outside the zone are rescaled so the output starts at zero.
    AdaptiveGradient,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deadzone {
    pub value: f32,
    pub method: DeadzoneMethod,
}

impl Deadzone {
    #[must_use]
    pub fn new(value: f32, method: DeadzoneMethod) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            method,
        }
    }

    /// Filters a raw axis value in [-1, 1].
    #[must_use]
    pub fn apply(&self, raw: f32) -> f32 {
        let magnitude = raw.abs();
        if magnitude < self.value {
            return 0.0;
        }
        match self.method {
            DeadzoneMethod::Traditional => raw,
            DeadzoneMethod::AdaptiveGradient => {
                if self.value >= 1.0 {
                    0.0
                } else {
                    raw.signum() * ((magnitude - self.value) / (1.0 - self.value)).min(1.0)
                }
            }
        }
    }
}

// ============================================================================
// Devices & Event Arguments
// ============================================================================

/// Backend-scoped identifier of a device. Stable while the device stays connected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Joystick,
    Gamepad,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub kind: DeviceKind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionChange {
    pub device: DeviceInfo,
    pub connected: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub device: DeviceId,
    pub key: Key,
    pub scancode: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CharEvent {
    pub device: DeviceId,
    pub character: char,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseButtonEvent {
    pub device: DeviceId,
    pub button: MouseButton,
    pub position: Vec2,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MouseMoveEvent {
    pub device: DeviceId,
    pub position: Vec2,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollEvent {
    pub device: DeviceId,
    pub wheel: ScrollWheel,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ButtonEvent {
    pub device: DeviceId,
    pub button: Button,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AxisEvent {
    pub device: DeviceId,
    pub axis: Axis,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HatEvent {
    pub device: DeviceId,
    pub hat: Hat,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ThumbstickEvent {
    pub device: DeviceId,
    pub thumbstick: Thumbstick,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriggerEvent {
    pub device: DeviceId,
    pub trigger: Trigger,
}
