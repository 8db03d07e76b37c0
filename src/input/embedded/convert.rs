//! Embedded host vocabulary ↔ engine input types.
//!
//! Every native → engine mapping is total: unrecognized codes land on the
//! neutral engine value. Engine → native mappings return `None` when the host
//! vocabulary has no equivalent.

use crate::input::{ButtonName, CursorType, DeadzoneMethod, Key, MouseButton, Position2D, StandardCursor};
use crate::window::embedded::VirtualKey;
use crate::window::embedded::devices::{hat_bits, pointer_update};

// ============================================================================
// Keyboard
// ============================================================================

#[rustfmt::skip]
const KEY_TABLE: &[(u16, Key)] = &[
    (0x41, Key::A), (0x42, Key::B), (0x43, Key::C), (0x44, Key::D), (0x45, Key::E),
    (0x46, Key::F), (0x47, Key::G), (0x48, Key::H), (0x49, Key::I), (0x4A, Key::J),
    (0x4B, Key::K), (0x4C, Key::L), (0x4D, Key::M), (0x4E, Key::N), (0x4F, Key::O),
    (0x50, Key::P), (0x51, Key::Q), (0x52, Key::R), (0x53, Key::S), (0x54, Key::T),
    (0x55, Key::U), (0x56, Key::V), (0x57, Key::W), (0x58, Key::X), (0x59, Key::Y),
    (0x5A, Key::Z),

    (0x30, Key::Key0), (0x31, Key::Key1), (0x32, Key::Key2), (0x33, Key::Key3), (0x34, Key::Key4),
    (0x35, Key::Key5), (0x36, Key::Key6), (0x37, Key::Key7), (0x38, Key::Key8), (0x39, Key::Key9),

    (0x70, Key::F1), (0x71, Key::F2), (0x72, Key::F3), (0x73, Key::F4),
    (0x74, Key::F5), (0x75, Key::F6), (0x76, Key::F7), (0x77, Key::F8),
    (0x78, Key::F9), (0x79, Key::F10), (0x7A, Key::F11), (0x7B, Key::F12),

    (0x20, Key::Space), (0x0D, Key::Enter), (0x1B, Key::Escape), (0x08, Key::Backspace),
    (0x09, Key::Tab), (0x2E, Key::Delete), (0x2D, Key::Insert), (0x24, Key::Home),
    (0x23, Key::End), (0x21, Key::PageUp), (0x22, Key::PageDown), (0x14, Key::CapsLock),
    (0x90, Key::NumLock), (0x91, Key::ScrollLock), (0x2C, Key::PrintScreen),
    (0x13, Key::Pause), (0x5D, Key::Menu),

    (0xA0, Key::ShiftLeft), (0xA1, Key::ShiftRight),
    (0xA2, Key::ControlLeft), (0xA3, Key::ControlRight),
    (0xA4, Key::AltLeft), (0xA5, Key::AltRight),
    (0x5B, Key::SuperLeft), (0x5C, Key::SuperRight),

    (0x26, Key::ArrowUp), (0x28, Key::ArrowDown), (0x25, Key::ArrowLeft), (0x27, Key::ArrowRight),

    (0xBC, Key::Comma), (0xBE, Key::Period), (0xBF, Key::Slash), (0xDC, Key::Backslash),
    (0xBA, Key::Semicolon), (0xDE, Key::Quote), (0xDB, Key::BracketLeft),
    (0xDD, Key::BracketRight), (0xBD, Key::Minus), (0xBB, Key::Equal), (0xC0, Key::Grave),

    (0x60, Key::Numpad0), (0x61, Key::Numpad1), (0x62, Key::Numpad2), (0x63, Key::Numpad3),
    (0x64, Key::Numpad4), (0x65, Key::Numpad5), (0x66, Key::Numpad6), (0x67, Key::Numpad7),
    (0x68, Key::Numpad8), (0x69, Key::Numpad9),
    (0x6B, Key::NumpadAdd), (0x6D, Key::NumpadSubtract), (0x6A, Key::NumpadMultiply),
    (0x6F, Key::NumpadDivide), (0x6E, Key::NumpadDecimal),
];

/// Engine key for a host virtual key.
///
/// The side-less modifier codes report the left-hand key.
#[must_use]
pub fn key(vk: VirtualKey) -> Key {
    match vk {
        VirtualKey::SHIFT => Key::ShiftLeft,
        VirtualKey::CONTROL => Key::ControlLeft,
        VirtualKey::MENU => Key::AltLeft,
        VirtualKey::SEPARATOR => Key::NumpadDecimal,
        VirtualKey(code) => KEY_TABLE
            .iter()
            .find(|(native, _)| *native == code)
            .map_or(Key::Unknown, |(_, key)| *key),
    }
}

/// Host virtual key for an engine key.
#[must_use]
pub fn virtual_key(key: Key) -> Option<VirtualKey> {
    KEY_TABLE
        .iter()
        .find(|(_, k)| *k == key)
        .map(|(native, _)| VirtualKey(*native))
}

/// The alternate code a host may report instead of `key`: a side-less
/// modifier, or the keypad separator.
#[must_use]
pub fn generic_modifier(key: Key) -> Option<VirtualKey> {
    match key {
        Key::ShiftLeft | Key::ShiftRight => Some(VirtualKey::SHIFT),
        Key::ControlLeft | Key::ControlRight => Some(VirtualKey::CONTROL),
        Key::AltLeft | Key::AltRight => Some(VirtualKey::MENU),
        Key::NumpadDecimal => Some(VirtualKey::SEPARATOR),
        _ => None,
    }
}

// ============================================================================
// Pointer
// ============================================================================

/// Engine button for a pointer update kind (pressed or released).
#[must_use]
pub fn mouse_button(update_kind: u32) -> MouseButton {
    match update_kind {
        pointer_update::LEFT_PRESSED | pointer_update::LEFT_RELEASED => MouseButton::Left,
        pointer_update::RIGHT_PRESSED | pointer_update::RIGHT_RELEASED => MouseButton::Right,
        pointer_update::MIDDLE_PRESSED | pointer_update::MIDDLE_RELEASED => MouseButton::Middle,
        pointer_update::XBUTTON1_PRESSED | pointer_update::XBUTTON1_RELEASED => MouseButton::Back,
        pointer_update::XBUTTON2_PRESSED | pointer_update::XBUTTON2_RELEASED => MouseButton::Forward,
        _ => MouseButton::Unknown,
    }
}

/// The `*_PRESSED` update kind of `button`.
#[must_use]
pub fn pressed_kind(button: MouseButton) -> Option<u32> {
    match button {
        MouseButton::Left => Some(pointer_update::LEFT_PRESSED),
        MouseButton::Right => Some(pointer_update::RIGHT_PRESSED),
        MouseButton::Middle => Some(pointer_update::MIDDLE_PRESSED),
        MouseButton::Back => Some(pointer_update::XBUTTON1_PRESSED),
        MouseButton::Forward => Some(pointer_update::XBUTTON2_PRESSED),
        MouseButton::Unknown | MouseButton::Other(_) => None,
    }
}

// ============================================================================
// Cursor
// ============================================================================

/// Host cursor shape codes.
pub mod cursor_shape {
    pub const ARROW: u32 = 0;
    pub const CROSS: u32 = 1;
    pub const CUSTOM: u32 = 2;
    pub const HAND: u32 = 3;
    pub const HELP: u32 = 4;
    pub const IBEAM: u32 = 5;
    pub const SIZE_ALL: u32 = 6;
    pub const SIZE_NESW: u32 = 7;
    pub const SIZE_NS: u32 = 8;
    pub const SIZE_NWSE: u32 = 9;
    pub const SIZE_WE: u32 = 10;
    pub const UNIVERSAL_NO: u32 = 11;
    pub const UP_ARROW: u32 = 12;
    pub const WAIT: u32 = 13;
    pub const PIN: u32 = 14;
    pub const PERSON: u32 = 15;
    pub const APP_STARTING: u32 = 16;
}

#[must_use]
pub fn standard_cursor(shape: u32) -> StandardCursor {
    match shape {
        cursor_shape::ARROW => StandardCursor::Arrow,
        cursor_shape::CROSS => StandardCursor::Crosshair,
        cursor_shape::HAND => StandardCursor::Hand,
        cursor_shape::IBEAM => StandardCursor::IBeam,
        cursor_shape::SIZE_ALL => StandardCursor::ResizeAll,
        cursor_shape::SIZE_NESW => StandardCursor::NeswResize,
        cursor_shape::SIZE_NS => StandardCursor::VResize,
        cursor_shape::SIZE_NWSE => StandardCursor::NwseResize,
        cursor_shape::SIZE_WE => StandardCursor::HResize,
        cursor_shape::UNIVERSAL_NO => StandardCursor::NotAllowed,
        cursor_shape::WAIT => StandardCursor::Wait,
        cursor_shape::APP_STARTING => StandardCursor::WaitArrow,
        _ => StandardCursor::Default,
    }
}

#[must_use]
pub fn shape_for(cursor: StandardCursor) -> u32 {
    match cursor {
        StandardCursor::Default | StandardCursor::Arrow => cursor_shape::ARROW,
        StandardCursor::IBeam => cursor_shape::IBEAM,
        StandardCursor::Crosshair => cursor_shape::CROSS,
        StandardCursor::Hand => cursor_shape::HAND,
        StandardCursor::HResize => cursor_shape::SIZE_WE,
        StandardCursor::VResize => cursor_shape::SIZE_NS,
        StandardCursor::NwseResize => cursor_shape::SIZE_NWSE,
        StandardCursor::NeswResize => cursor_shape::SIZE_NESW,
        StandardCursor::ResizeAll => cursor_shape::SIZE_ALL,
        StandardCursor::NotAllowed => cursor_shape::UNIVERSAL_NO,
        StandardCursor::Wait => cursor_shape::WAIT,
        StandardCursor::WaitArrow => cursor_shape::APP_STARTING,
    }
}

#[must_use]
pub fn cursor_type(shape: u32) -> CursorType {
    if shape == cursor_shape::CUSTOM {
        CursorType::Custom
    } else {
        CursorType::Standard
    }
}

// ============================================================================
// Controllers
// ============================================================================

#[must_use]
pub fn hat_position(bits: u8) -> Position2D {
    match bits {
        hat_bits::UP => Position2D::Up,
        hat_bits::RIGHT => Position2D::Right,
        hat_bits::DOWN => Position2D::Down,
        hat_bits::LEFT => Position2D::Left,
        b if b == hat_bits::UP | hat_bits::RIGHT => Position2D::UpRight,
        b if b == hat_bits::UP | hat_bits::LEFT => Position2D::UpLeft,
        b if b == hat_bits::DOWN | hat_bits::RIGHT => Position2D::DownRight,
        b if b == hat_bits::DOWN | hat_bits::LEFT => Position2D::DownLeft,
        _ => Position2D::Centered,
    }
}

#[must_use]
pub fn deadzone_method(code: u8) -> DeadzoneMethod {
    match code {
        1 => DeadzoneMethod::AdaptiveGradient,
        _ => DeadzoneMethod::Traditional,
    }
}

#[must_use]
pub fn deadzone_code(method: DeadzoneMethod) -> u8 {
    match method {
        DeadzoneMethod::Traditional => 0,
        DeadzoneMethod::AdaptiveGradient => 1,
    }
}

/// Standard-layout button indices of the analog triggers.
pub const TRIGGER_BUTTONS: [usize; 2] = [6, 7];

/// Button name of a standard-layout button index.
#[must_use]
pub fn standard_button(index: usize) -> ButtonName {
    match index {
        0 => ButtonName::A,
        1 => ButtonName::B,
        2 => ButtonName::X,
        3 => ButtonName::Y,
        4 => ButtonName::LeftBumper,
        5 => ButtonName::RightBumper,
        8 => ButtonName::Back,
        9 => ButtonName::Start,
        10 => ButtonName::LeftStick,
        11 => ButtonName::RightStick,
        12 => ButtonName::DPadUp,
        13 => ButtonName::DPadDown,
        14 => ButtonName::DPadLeft,
        15 => ButtonName::DPadRight,
        16 => ButtonName::Home,
        _ => ButtonName::Unknown,
    }
}
