//! Host-forwarded native input devices of the retained-UI backend.
//!
//! The host toolkit pushes raw input into these objects using its own native
//! vocabulary: Win32-style virtual-key codes, pointer update kinds, W3C
//! standard-gamepad button indices and hat bitmasks. Translation to engine
//! types happens in `input::embedded`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec2;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::events::NativeSignal;

// ============================================================================
// Keyboard
// ============================================================================

/// Virtual-key code as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    pub const BACK: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const ENTER: Self = Self(0x0D);
    pub const SHIFT: Self = Self(0x10);
    pub const CONTROL: Self = Self(0x11);
    pub const MENU: Self = Self(0x12);
    pub const PAUSE: Self = Self(0x13);
    pub const CAPITAL: Self = Self(0x14);
    pub const ESCAPE: Self = Self(0x1B);
    pub const SPACE: Self = Self(0x20);
    pub const PAGE_UP: Self = Self(0x21);
    pub const PAGE_DOWN: Self = Self(0x22);
    pub const END: Self = Self(0x23);
    pub const HOME: Self = Self(0x24);
    pub const LEFT: Self = Self(0x25);
    pub const UP: Self = Self(0x26);
    pub const RIGHT: Self = Self(0x27);
    pub const DOWN: Self = Self(0x28);
    pub const SNAPSHOT: Self = Self(0x2C);
    pub const INSERT: Self = Self(0x2D);
    pub const DELETE: Self = Self(0x2E);
    pub const NUMBER_0: Self = Self(0x30);
    pub const A: Self = Self(0x41);
    pub const D: Self = Self(0x44);
    pub const S: Self = Self(0x53);
    pub const W: Self = Self(0x57);
    pub const LEFT_WINDOWS: Self = Self(0x5B);
    pub const RIGHT_WINDOWS: Self = Self(0x5C);
    pub const APPLICATION: Self = Self(0x5D);
    pub const NUMPAD_0: Self = Self(0x60);
    pub const MULTIPLY: Self = Self(0x6A);
    pub const ADD: Self = Self(0x6B);
    pub const SEPARATOR: Self = Self(0x6C);
    pub const SUBTRACT: Self = Self(0x6D);
    pub const DECIMAL: Self = Self(0x6E);
    pub const DIVIDE: Self = Self(0x6F);
    pub const F1: Self = Self(0x70);
    pub const F12: Self = Self(0x7B);
    pub const NUM_LOCK: Self = Self(0x90);
    pub const SCROLL: Self = Self(0x91);
    pub const LEFT_SHIFT: Self = Self(0xA0);
    pub const RIGHT_SHIFT: Self = Self(0xA1);
    pub const LEFT_CONTROL: Self = Self(0xA2);
    pub const RIGHT_CONTROL: Self = Self(0xA3);
    pub const LEFT_MENU: Self = Self(0xA4);
    pub const RIGHT_MENU: Self = Self(0xA5);
    pub const OEM_1: Self = Self(0xBA);
    pub const OEM_PLUS: Self = Self(0xBB);
    pub const OEM_COMMA: Self = Self(0xBC);
    pub const OEM_MINUS: Self = Self(0xBD);
    pub const OEM_PERIOD: Self = Self(0xBE);
    pub const OEM_2: Self = Self(0xBF);
    pub const OEM_3: Self = Self(0xC0);
    pub const OEM_4: Self = Self(0xDB);
    pub const OEM_5: Self = Self(0xDC);
    pub const OEM_6: Self = Self(0xDD);
    pub const OEM_7: Self = Self(0xDE);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeKeyArgs {
    pub key: VirtualKey,
    pub scan_code: u32,
    pub repeat: bool,
}

/// The panel's keyboard focus target.
pub struct NativeKeyboard {
    id: u32,
    pressed_keys: Mutex<FxHashSet<u16>>,
    pressed_scancodes: Mutex<FxHashSet<u32>>,
    text_input: AtomicBool,
    pub(crate) key_down: Arc<NativeSignal<NativeKeyArgs>>,
    pub(crate) key_up: Arc<NativeSignal<NativeKeyArgs>>,
    pub(crate) character_received: Arc<NativeSignal<u32>>,
}

impl NativeKeyboard {
    pub(crate) fn new(id: u32) -> Self {
        Self {
            id,
            pressed_keys: Mutex::new(FxHashSet::default()),
            pressed_scancodes: Mutex::new(FxHashSet::default()),
            text_input: AtomicBool::new(false),
            key_down: NativeSignal::new(),
            key_up: NativeSignal::new(),
            character_received: NativeSignal::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Host notification: a key went down.
    pub fn press(&self, key: VirtualKey, scan_code: u32) {
        let repeat = !self.pressed_keys.lock().insert(key.0);
        self.pressed_scancodes.lock().insert(scan_code);
        self.key_down.emit(&NativeKeyArgs {
            key,
            scan_code,
            repeat,
        });
    }

    /// Host notification: a key went up.
    pub fn release(&self, key: VirtualKey, scan_code: u32) {
        self.pressed_keys.lock().remove(&key.0);
        self.pressed_scancodes.lock().remove(&scan_code);
        self.key_up.emit(&NativeKeyArgs {
            key,
            scan_code,
            repeat: false,
        });
    }

    /// Host notification: text was typed, one code point per character.
    pub fn type_text(&self, text: &str) {
        for ch in text.chars() {
            self.receive_code_point(u32::from(ch));
        }
    }

    /// Host notification: a raw code point arrived. Invalid code points are delivered too.
    pub fn receive_code_point(&self, code_point: u32) {
        self.character_received.emit(&code_point);
    }

    #[must_use]
    pub fn is_pressed(&self, key: VirtualKey) -> bool {
        self.pressed_keys.lock().contains(&key.0)
    }

    #[must_use]
    pub fn is_scancode_pressed(&self, scan_code: u32) -> bool {
        self.pressed_scancodes.lock().contains(&scan_code)
    }

    /// Whether the engine currently requests text input (IME, soft keyboard).
    #[must_use]
    pub fn text_input_enabled(&self) -> bool {
        self.text_input.load(Ordering::Relaxed)
    }

    pub(crate) fn set_text_input(&self, enabled: bool) {
        self.text_input.store(enabled, Ordering::Relaxed);
    }
}

// ============================================================================
// Pointer
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerDeviceType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// Pointer update kinds as reported by the host.
pub mod pointer_update {
    pub const OTHER: u32 = 0;
    pub const LEFT_PRESSED: u32 = 1;
    pub const LEFT_RELEASED: u32 = 2;
    pub const RIGHT_PRESSED: u32 = 3;
    pub const RIGHT_RELEASED: u32 = 4;
    pub const MIDDLE_PRESSED: u32 = 5;
    pub const MIDDLE_RELEASED: u32 = 6;
    pub const XBUTTON1_PRESSED: u32 = 7;
    pub const XBUTTON1_RELEASED: u32 = 8;
    pub const XBUTTON2_PRESSED: u32 = 9;
    pub const XBUTTON2_RELEASED: u32 = 10;
}

/// Wheel delta of one notch.
pub const WHEEL_DELTA: i32 = 120;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerArgs {
    pub device_type: PointerDeviceType,
    pub update_kind: u32,
    pub position: Vec2,
    pub wheel_delta: i32,
    pub horizontal_wheel: bool,
}

impl PointerArgs {
    #[must_use]
    pub fn mouse(update_kind: u32, position: Vec2) -> Self {
        Self {
            device_type: PointerDeviceType::Mouse,
            update_kind,
            position,
            wheel_delta: 0,
            horizontal_wheel: false,
        }
    }
}

/// The panel's pointer input.
pub struct NativeMouse {
    id: u32,
    position: Mutex<Vec2>,
    pressed: Mutex<FxHashSet<u32>>,
    pub(crate) pressed_signal: Arc<NativeSignal<PointerArgs>>,
    pub(crate) released_signal: Arc<NativeSignal<PointerArgs>>,
    pub(crate) moved_signal: Arc<NativeSignal<PointerArgs>>,
    pub(crate) wheel_signal: Arc<NativeSignal<PointerArgs>>,
    pub(crate) tapped_signal: Arc<NativeSignal<PointerArgs>>,
    pub(crate) right_tapped_signal: Arc<NativeSignal<PointerArgs>>,
    pub(crate) double_tapped_signal: Arc<NativeSignal<PointerArgs>>,
}

impl NativeMouse {
    pub(crate) fn new(id: u32) -> Self {
        Self {
            id,
            position: Mutex::new(Vec2::ZERO),
            pressed: Mutex::new(FxHashSet::default()),
            pressed_signal: NativeSignal::new(),
            released_signal: NativeSignal::new(),
            moved_signal: NativeSignal::new(),
            wheel_signal: NativeSignal::new(),
            tapped_signal: NativeSignal::new(),
            right_tapped_signal: NativeSignal::new(),
            double_tapped_signal: NativeSignal::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        *self.position.lock()
    }

    /// Whether the button whose `*_PRESSED` update kind is `pressed_kind` is held.
    #[must_use]
    pub fn is_pressed(&self, pressed_kind: u32) -> bool {
        self.pressed.lock().contains(&pressed_kind)
    }

    /// Host notification: a pointer button went down.
    pub fn press(&self, args: PointerArgs) {
        if args.device_type == PointerDeviceType::Mouse {
            *self.position.lock() = args.position;
            self.pressed.lock().insert(args.update_kind);
        }
        self.pressed_signal.emit(&args);
    }

    /// Host notification: a pointer button went up.
    pub fn release(&self, args: PointerArgs) {
        if args.device_type == PointerDeviceType::Mouse {
            *self.position.lock() = args.position;
            // Released kinds are the pressed kind plus one.
            self.pressed.lock().remove(&args.update_kind.saturating_sub(1));
        }
        self.released_signal.emit(&args);
    }

    /// Host notification: the pointer moved.
    pub fn move_to(&self, args: PointerArgs) {
        if args.device_type == PointerDeviceType::Mouse {
            *self.position.lock() = args.position;
        }
        self.moved_signal.emit(&args);
    }

    /// Host notification: the wheel turned by `delta` (multiples of [`WHEEL_DELTA`]).
    pub fn wheel(&self, delta: i32, horizontal: bool) {
        let args = PointerArgs {
            device_type: PointerDeviceType::Mouse,
            update_kind: pointer_update::OTHER,
            position: self.position(),
            wheel_delta: delta,
            horizontal_wheel: horizontal,
        };
        self.wheel_signal.emit(&args);
    }

    pub fn tap(&self, args: PointerArgs) {
        self.tapped_signal.emit(&args);
    }

    pub fn right_tap(&self, args: PointerArgs) {
        self.right_tapped_signal.emit(&args);
    }

    pub fn double_tap(&self, args: PointerArgs) {
        self.double_tapped_signal.emit(&args);
    }

    /// Moves the pointer without raising an event (engine-requested warp).
    pub(crate) fn warp(&self, position: Vec2) {
        *self.position.lock() = position;
    }
}

// ============================================================================
// Controllers
// ============================================================================

/// Button/axis layout reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerMapping {
    /// W3C standard gamepad layout.
    Standard,
    /// Raw joystick: unlabeled buttons, axes and hats.
    Joystick,
    /// Anything else.
    Unknown,
}

/// Hat bitmask values.
pub mod hat_bits {
    pub const CENTERED: u8 = 0;
    pub const UP: u8 = 1;
    pub const RIGHT: u8 = 2;
    pub const DOWN: u8 = 4;
    pub const LEFT: u8 = 8;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NativeButton {
    pub pressed: bool,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeButtonArgs {
    pub index: usize,
    pub pressed: bool,
    pub value: f32,
    /// Whether `pressed` flipped with this update (as opposed to an analog value change).
    pub toggled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeAxisArgs {
    pub index: usize,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeHatArgs {
    pub index: usize,
    pub bits: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeRumble {
    pub motor: usize,
    pub speed: f32,
}

#[derive(Debug, Default)]
struct ControllerState {
    buttons: Vec<NativeButton>,
    axes: Vec<f32>,
    hats: Vec<u8>,
    motors: Vec<f32>,
    deadzone_value: f32,
    deadzone_method: u8,
}

/// Layout of a controller at attach time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerLayout {
    pub buttons: usize,
    pub axes: usize,
    pub hats: usize,
    pub motors: usize,
}

/// A host-attached gamepad, joystick or other controller.
pub struct NativeController {
    id: u32,
    name: String,
    mapping: ControllerMapping,
    connected: AtomicBool,
    state: Mutex<ControllerState>,
    pub(crate) button_signal: Arc<NativeSignal<NativeButtonArgs>>,
    pub(crate) axis_signal: Arc<NativeSignal<NativeAxisArgs>>,
    pub(crate) hat_signal: Arc<NativeSignal<NativeHatArgs>>,
    /// Raised when the engine changes a motor speed. The host forwards it to hardware.
    pub rumble: Arc<NativeSignal<NativeRumble>>,
}

impl NativeController {
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, mapping: ControllerMapping, layout: ControllerLayout) -> Arc<Self> {
        Arc::new(Self {
            id,
            name: name.into(),
            mapping,
            connected: AtomicBool::new(false),
            state: Mutex::new(ControllerState {
                buttons: vec![NativeButton::default(); layout.buttons],
                axes: vec![0.0; layout.axes],
                hats: vec![hat_bits::CENTERED; layout.hats],
                motors: vec![0.0; layout.motors],
                deadzone_value: 0.0,
                deadzone_method: 0,
            }),
            button_signal: NativeSignal::new(),
            axis_signal: NativeSignal::new(),
            hat_signal: NativeSignal::new(),
            rumble: NativeSignal::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mapping(&self) -> ControllerMapping {
        self.mapping
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    // ========================================================================
    // Host notifications
    // ========================================================================

    /// Updates a button. Out-of-range indices are ignored; unchanged values raise nothing.
    pub fn set_button(&self, index: usize, pressed: bool, value: f32) {
        let value = value.clamp(0.0, 1.0);
        let (toggled, moved) = {
            let mut state = self.state.lock();
            let Some(button) = state.buttons.get_mut(index) else {
                return;
            };
            let toggled = button.pressed != pressed;
            let moved = (button.value - value).abs() > f32::EPSILON;
            *button = NativeButton { pressed, value };
            (toggled, moved)
        };
        if toggled || moved {
            self.button_signal.emit(&NativeButtonArgs {
                index,
                pressed,
                value,
                toggled,
            });
        }
    }

    /// Updates an axis. Out-of-range indices are ignored.
    pub fn set_axis(&self, index: usize, value: f32) {
        let value = value.clamp(-1.0, 1.0);
        {
            let mut state = self.state.lock();
            let Some(axis) = state.axes.get_mut(index) else {
                return;
            };
            *axis = value;
        }
        self.axis_signal.emit(&NativeAxisArgs { index, value });
    }

    /// Updates a hat from its bitmask. Out-of-range indices are ignored.
    pub fn set_hat(&self, index: usize, bits: u8) {
        {
            let mut state = self.state.lock();
            let Some(hat) = state.hats.get_mut(index) else {
                return;
            };
            *hat = bits;
        }
        self.hat_signal.emit(&NativeHatArgs { index, bits });
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    #[must_use]
    pub fn buttons(&self) -> Vec<NativeButton> {
        self.state.lock().buttons.clone()
    }

    #[must_use]
    pub fn axes(&self) -> Vec<f32> {
        self.state.lock().axes.clone()
    }

    #[must_use]
    pub fn hats(&self) -> Vec<u8> {
        self.state.lock().hats.clone()
    }

    #[must_use]
    pub fn motor_count(&self) -> usize {
        self.state.lock().motors.len()
    }

    #[must_use]
    pub fn motor_speed(&self, motor: usize) -> Option<f32> {
        self.state.lock().motors.get(motor).copied()
    }

    pub(crate) fn set_motor_speed(&self, motor: usize, speed: f32) {
        {
            let mut state = self.state.lock();
            let Some(slot) = state.motors.get_mut(motor) else {
                return;
            };
            *slot = speed;
        }
        self.rumble.emit(&NativeRumble { motor, speed });
    }

    /// Deadzone as `(value, native method code)`.
    #[must_use]
    pub fn deadzone(&self) -> (f32, u8) {
        let state = self.state.lock();
        (state.deadzone_value, state.deadzone_method)
    }

    pub fn set_deadzone(&self, value: f32, method: u8) {
        let mut state = self.state.lock();
        state.deadzone_value = value;
        state.deadzone_method = method;
    }
}
