//! Engine device adapters over the embedded panel's native devices.

use std::sync::{Arc, Weak};
use std::time::Duration;

use glam::{UVec2, Vec2};
use parking_lot::Mutex;

use super::convert;
use crate::errors::{MoteurError, Result};
use crate::events::{Event, Subscription};
use crate::input::{
    Axis, AxisEvent, Button, ButtonEvent, ButtonName, CharEvent, Cursor, CursorMode, CursorType, Deadzone,
    DeviceId, DeviceKind, Gamepad, Hat, HatEvent, InputDevice, Joystick, Key, KeyEvent, Keyboard, Motor,
    Mouse, MouseButton, MouseButtonEvent, MouseMoveEvent, RawImage, ScrollEvent, ScrollWheel,
    StandardCursor, Thumbstick, ThumbstickEvent, Trigger, TriggerEvent,
};
use crate::window::embedded::devices::{NativeButtonArgs, PointerArgs, PointerDeviceType, WHEEL_DELTA};
use crate::window::embedded::{ControllerMapping, NativeController, NativeKeyboard, NativeMouse, SurfacePanel};

const DEFAULT_DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
const DEFAULT_DOUBLE_CLICK_RANGE: f32 = 4.0;

// ============================================================================
// Keyboard
// ============================================================================

pub struct EmbeddedKeyboard {
    native: Arc<NativeKeyboard>,
    panel: Arc<SurfacePanel>,
    key_down: Event<KeyEvent>,
    key_up: Event<KeyEvent>,
    key_char: Event<CharEvent>,
}

impl EmbeddedKeyboard {
    pub(crate) fn new(panel: Arc<SurfacePanel>) -> Self {
        let native = panel.keyboard().clone();
        let device = DeviceId(native.id());

        let key_down = Event::from_signal("embedded.key_down", &native.key_down, move |args| {
            Some(KeyEvent {
                device,
                key: convert::key(args.key),
                scancode: args.scan_code,
            })
        });
        let key_up = Event::from_signal("embedded.key_up", &native.key_up, move |args| {
            Some(KeyEvent {
                device,
                key: convert::key(args.key),
                scancode: args.scan_code,
            })
        });
        let key_char = Event::from_signal("embedded.key_char", &native.character_received, move |code: &u32| {
            char::from_u32(*code).map(|character| CharEvent { device, character })
        });

        Self {
            native,
            panel,
            key_down,
            key_up,
            key_char,
        }
    }
}

impl InputDevice for EmbeddedKeyboard {
    fn id(&self) -> DeviceId {
        DeviceId(self.native.id())
    }

    fn name(&self) -> String {
        "Embedded Keyboard".to_owned()
    }

    fn is_connected(&self) -> bool {
        !self.panel.is_detached()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Keyboard
    }
}

impl Keyboard for EmbeddedKeyboard {
    fn supported_keys(&self) -> Vec<Key> {
        Key::ALL
            .iter()
            .copied()
            .filter(|key| convert::virtual_key(*key).is_some())
            .collect()
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        let exact = convert::virtual_key(key).is_some_and(|vk| self.native.is_pressed(vk));
        exact || convert::generic_modifier(key).is_some_and(|vk| self.native.is_pressed(vk))
    }

    fn is_scancode_pressed(&self, scancode: u32) -> bool {
        self.native.is_scancode_pressed(scancode)
    }

    fn clipboard_text(&self) -> Result<String> {
        self.panel
            .clipboard()
            .ok_or(MoteurError::Clipboard("host denied clipboard access"))
    }

    fn set_clipboard_text(&self, text: &str) -> Result<()> {
        if self.panel.clipboard().is_none() {
            return Err(MoteurError::Clipboard("host denied clipboard access"));
        }
        self.panel.set_clipboard(Some(text.to_owned()));
        Ok(())
    }

    fn begin_input(&self) {
        self.native.set_text_input(true);
    }

    fn end_input(&self) {
        self.native.set_text_input(false);
    }

    fn key_down(&self) -> &Event<KeyEvent> {
        &self.key_down
    }

    fn key_up(&self) -> &Event<KeyEvent> {
        &self.key_up
    }

    fn key_char(&self) -> &Event<CharEvent> {
        &self.key_char
    }
}

// ============================================================================
// Mouse & Cursor
// ============================================================================

pub struct EmbeddedCursor {
    panel: Arc<SurfacePanel>,
    hotspot: Mutex<UVec2>,
    image: Mutex<Option<RawImage>>,
}

impl Cursor for EmbeddedCursor {
    fn cursor_type(&self) -> CursorType {
        convert::cursor_type(self.panel.cursor_shape())
    }

    fn set_cursor_type(&self, cursor_type: CursorType) -> Result<()> {
        match cursor_type {
            CursorType::Standard if self.cursor_type() == CursorType::Custom => {
                self.panel.set_cursor_shape(convert::cursor_shape::ARROW);
            }
            CursorType::Standard => {}
            CursorType::Custom => self.panel.set_cursor_shape(convert::cursor_shape::CUSTOM),
        }
        Ok(())
    }

    fn standard_cursor(&self) -> StandardCursor {
        convert::standard_cursor(self.panel.cursor_shape())
    }

    fn set_standard_cursor(&self, cursor: StandardCursor) -> Result<()> {
        self.panel.set_cursor_shape(convert::shape_for(cursor));
        Ok(())
    }

    fn cursor_mode(&self) -> CursorMode {
        CursorMode::Normal
    }

    fn set_cursor_mode(&self, mode: CursorMode) -> Result<()> {
        if self.is_mode_supported(mode) {
            Ok(())
        } else {
            Err(MoteurError::unsupported("cursor mode", mode))
        }
    }

    fn is_confined(&self) -> bool {
        false
    }

    fn set_confined(&self, confined: bool) -> Result<()> {
        if confined {
            return Err(MoteurError::unsupported("cursor confinement", confined));
        }
        Ok(())
    }

    fn hotspot(&self) -> UVec2 {
        *self.hotspot.lock()
    }

    fn set_hotspot(&self, hotspot: UVec2) {
        *self.hotspot.lock() = hotspot;
    }

    fn image(&self) -> Option<RawImage> {
        self.image.lock().clone()
    }

    fn set_image(&self, image: Option<RawImage>) -> Result<()> {
        let custom = image.is_some();
        *self.image.lock() = image;
        self.set_cursor_type(if custom { CursorType::Custom } else { CursorType::Standard })
    }

    fn is_mode_supported(&self, mode: CursorMode) -> bool {
        mode == CursorMode::Normal
    }

    fn is_standard_supported(&self, _cursor: StandardCursor) -> bool {
        true
    }
}

fn is_mouse(args: &PointerArgs) -> bool {
    args.device_type == PointerDeviceType::Mouse
}

fn button_event(device: DeviceId, button: MouseButton, args: &PointerArgs) -> Option<MouseButtonEvent> {
    is_mouse(args).then_some(MouseButtonEvent {
        device,
        button,
        position: args.position,
    })
}

fn wheel_offset(args: &PointerArgs) -> ScrollWheel {
    let notches = args.wheel_delta as f32 / WHEEL_DELTA as f32;
    if args.horizontal_wheel {
        ScrollWheel { x: notches, y: 0.0 }
    } else {
        ScrollWheel { x: 0.0, y: notches }
    }
}

/// Double-click thresholds as last set. Double taps are recognized by the host.
struct ClickThresholds {
    time: Duration,
    range: f32,
}

pub struct EmbeddedMouse {
    native: Arc<NativeMouse>,
    panel: Arc<SurfacePanel>,
    cursor: Arc<EmbeddedCursor>,
    last_wheel: Arc<Mutex<ScrollWheel>>,
    thresholds: Mutex<ClickThresholds>,
    mouse_down: Event<MouseButtonEvent>,
    mouse_up: Event<MouseButtonEvent>,
    click: Event<MouseButtonEvent>,
    double_click: Event<MouseButtonEvent>,
    mouse_move: Event<MouseMoveEvent>,
    scroll: Event<ScrollEvent>,
    _wheel_tracker: Subscription,
}

impl EmbeddedMouse {
    pub(crate) fn new(panel: Arc<SurfacePanel>) -> Self {
        let native = panel.mouse().clone();
        let device = DeviceId(native.id());

        let mouse_down = Event::from_signal("embedded.mouse_down", &native.pressed_signal, move |args| {
            button_event(device, convert::mouse_button(args.update_kind), args)
        });
        let mouse_up = Event::from_signal("embedded.mouse_up", &native.released_signal, move |args| {
            button_event(device, convert::mouse_button(args.update_kind), args)
        });

        // The host reports left and right taps on separate sources.
        let click = {
            let tapped = native.tapped_signal.clone();
            let right_tapped = native.right_tapped_signal.clone();
            Event::new("embedded.click", move |fanout| {
                let left = {
                    let fanout = fanout.clone();
                    tapped.connect(move |args| {
                        if let Some(event) = button_event(device, MouseButton::Left, args) {
                            fanout.emit(&event);
                        }
                    })
                };
                let right = right_tapped.connect(move |args| {
                    if let Some(event) = button_event(device, MouseButton::Right, args) {
                        fanout.emit(&event);
                    }
                });
                Subscription::new(move || {
                    drop(left);
                    drop(right);
                })
            })
        };
        let double_click = Event::from_signal("embedded.double_click", &native.double_tapped_signal, move |args| {
            button_event(device, MouseButton::Left, args)
        });
        let mouse_move = Event::from_signal("embedded.mouse_move", &native.moved_signal, move |args| {
            is_mouse(args).then_some(MouseMoveEvent {
                device,
                position: args.position,
            })
        });
        let scroll = Event::from_signal("embedded.scroll", &native.wheel_signal, move |args| {
            Some(ScrollEvent {
                device,
                wheel: wheel_offset(args),
            })
        });

        let last_wheel = Arc::new(Mutex::new(ScrollWheel::default()));
        let wheel_tracker = {
            let last_wheel = last_wheel.clone();
            native.wheel_signal.connect(move |args| {
                *last_wheel.lock() = wheel_offset(args);
            })
        };

        let cursor = Arc::new(EmbeddedCursor {
            panel: panel.clone(),
            hotspot: Mutex::new(UVec2::ZERO),
            image: Mutex::new(None),
        });

        Self {
            native,
            panel,
            cursor,
            last_wheel,
            thresholds: Mutex::new(ClickThresholds {
                time: DEFAULT_DOUBLE_CLICK_TIME,
                range: DEFAULT_DOUBLE_CLICK_RANGE,
            }),
            mouse_down,
            mouse_up,
            click,
            double_click,
            mouse_move,
            scroll,
            _wheel_tracker: wheel_tracker,
        }
    }
}

impl InputDevice for EmbeddedMouse {
    fn id(&self) -> DeviceId {
        DeviceId(self.native.id())
    }

    fn name(&self) -> String {
        "Embedded Mouse".to_owned()
    }

    fn is_connected(&self) -> bool {
        !self.panel.is_detached()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Mouse
    }
}

impl Mouse for EmbeddedMouse {
    fn supported_buttons(&self) -> Vec<MouseButton> {
        vec![
            MouseButton::Left,
            MouseButton::Right,
            MouseButton::Middle,
            MouseButton::Back,
            MouseButton::Forward,
        ]
    }

    fn scroll_wheels(&self) -> Vec<ScrollWheel> {
        vec![*self.last_wheel.lock()]
    }

    fn position(&self) -> Vec2 {
        self.native.position()
    }

    fn set_position(&self, position: Vec2) -> Result<()> {
        self.native.warp(position);
        Ok(())
    }

    fn cursor(&self) -> Arc<dyn Cursor> {
        self.cursor.clone()
    }

    fn is_button_pressed(&self, button: MouseButton) -> bool {
        convert::pressed_kind(button).is_some_and(|kind| self.native.is_pressed(kind))
    }

    fn double_click_time(&self) -> Duration {
        self.thresholds.lock().time
    }

    /// Recorded for callers only. The host decides what counts as a double
    /// tap, so this never filters [`double_click`](Mouse::double_click).
    fn set_double_click_time(&self, time: Duration) {
        self.thresholds.lock().time = time;
    }

    fn double_click_range(&self) -> f32 {
        self.thresholds.lock().range
    }

    /// Recorded for callers only, like [`set_double_click_time`](Mouse::set_double_click_time).
    fn set_double_click_range(&self, range: f32) {
        self.thresholds.lock().range = range.max(0.0);
    }

    fn mouse_down(&self) -> &Event<MouseButtonEvent> {
        &self.mouse_down
    }

    fn mouse_up(&self) -> &Event<MouseButtonEvent> {
        &self.mouse_up
    }

    fn click(&self) -> &Event<MouseButtonEvent> {
        &self.click
    }

    fn double_click(&self) -> &Event<MouseButtonEvent> {
        &self.double_click
    }

    fn mouse_move(&self) -> &Event<MouseMoveEvent> {
        &self.mouse_move
    }

    fn scroll(&self) -> &Event<ScrollEvent> {
        &self.scroll
    }
}

// ============================================================================
// Controllers
// ============================================================================

fn controller_deadzone(native: &NativeController) -> Deadzone {
    let (value, code) = native.deadzone();
    Deadzone::new(value, convert::deadzone_method(code))
}

fn button_down_event(name: fn(usize) -> ButtonName, device: DeviceId, args: &NativeButtonArgs) -> Option<ButtonEvent> {
    (args.toggled && args.pressed).then_some(ButtonEvent {
        device,
        button: Button {
            name: name(args.index),
            index: args.index,
            pressed: true,
        },
    })
}

fn button_up_event(name: fn(usize) -> ButtonName, device: DeviceId, args: &NativeButtonArgs) -> Option<ButtonEvent> {
    (args.toggled && !args.pressed).then_some(ButtonEvent {
        device,
        button: Button {
            name: name(args.index),
            index: args.index,
            pressed: false,
        },
    })
}

fn unnamed(_index: usize) -> ButtonName {
    ButtonName::Unknown
}

/// A vibration motor of a host controller.
pub struct EmbeddedMotor {
    controller: Arc<NativeController>,
    index: usize,
}

impl Motor for EmbeddedMotor {
    fn index(&self) -> usize {
        self.index
    }

    fn speed(&self) -> f32 {
        self.controller.motor_speed(self.index).unwrap_or(0.0)
    }

    fn set_speed(&self, speed: f32) {
        self.controller.set_motor_speed(self.index, speed.clamp(0.0, 1.0));
    }
}

/// A standard-layout controller.
///
/// Axes 0/1 and 2/3 form the left and right thumbsticks; buttons 6 and 7 are
/// the analog triggers.
pub struct EmbeddedGamepad {
    native: Arc<NativeController>,
    button_down: Event<ButtonEvent>,
    button_up: Event<ButtonEvent>,
    thumbstick_moved: Event<ThumbstickEvent>,
    trigger_moved: Event<TriggerEvent>,
}

const THUMBSTICK_COUNT: usize = 2;

impl EmbeddedGamepad {
    pub(crate) fn new(native: Arc<NativeController>) -> Self {
        let device = DeviceId(native.id());

        // Triggers report through `trigger_moved` only.
        let button_down = Event::from_signal("embedded.gamepad.button_down", &native.button_signal, move |args| {
            if convert::TRIGGER_BUTTONS.contains(&args.index) {
                return None;
            }
            button_down_event(convert::standard_button, device, args)
        });
        let button_up = Event::from_signal("embedded.gamepad.button_up", &native.button_signal, move |args| {
            if convert::TRIGGER_BUTTONS.contains(&args.index) {
                return None;
            }
            button_up_event(convert::standard_button, device, args)
        });

        let thumbstick_moved = {
            let weak = Arc::downgrade(&native);
            Event::from_signal("embedded.gamepad.thumbstick_moved", &native.axis_signal, move |args| {
                let index = args.index / 2;
                if index >= THUMBSTICK_COUNT {
                    return None;
                }
                let native = weak.upgrade()?;
                let thumbstick = thumbstick(&native, index)?;
                Some(ThumbstickEvent { device, thumbstick })
            })
        };

        let trigger_moved = Event::from_signal("embedded.gamepad.trigger_moved", &native.button_signal, move |args| {
            let index = convert::TRIGGER_BUTTONS.iter().position(|b| *b == args.index)?;
            Some(TriggerEvent {
                device,
                trigger: Trigger {
                    index,
                    position: args.value,
                },
            })
        });

        Self {
            native,
            button_down,
            button_up,
            thumbstick_moved,
            trigger_moved,
        }
    }
}

fn thumbstick(native: &NativeController, index: usize) -> Option<Thumbstick> {
    let axes = native.axes();
    let deadzone = controller_deadzone(native);
    let x = *axes.get(index * 2)?;
    let y = *axes.get(index * 2 + 1)?;
    Some(Thumbstick {
        index,
        x: deadzone.apply(x),
        y: deadzone.apply(y),
    })
}

impl InputDevice for EmbeddedGamepad {
    fn id(&self) -> DeviceId {
        DeviceId(self.native.id())
    }

    fn name(&self) -> String {
        self.native.name().to_owned()
    }

    fn is_connected(&self) -> bool {
        self.native.is_connected()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Gamepad
    }
}

impl Gamepad for EmbeddedGamepad {
    fn buttons(&self) -> Vec<Button> {
        self.native
            .buttons()
            .iter()
            .enumerate()
            .filter(|(index, _)| !convert::TRIGGER_BUTTONS.contains(index))
            .map(|(index, button)| Button {
                name: convert::standard_button(index),
                index,
                pressed: button.pressed,
            })
            .collect()
    }

    fn thumbsticks(&self) -> Vec<Thumbstick> {
        (0..THUMBSTICK_COUNT)
            .filter_map(|index| thumbstick(&self.native, index))
            .collect()
    }

    fn triggers(&self) -> Vec<Trigger> {
        let buttons = self.native.buttons();
        convert::TRIGGER_BUTTONS
            .iter()
            .enumerate()
            .filter_map(|(index, button)| {
                buttons.get(*button).map(|b| Trigger {
                    index,
                    position: b.value,
                })
            })
            .collect()
    }

    fn vibration_motors(&self) -> Vec<Arc<dyn Motor>> {
        (0..self.native.motor_count())
            .map(|index| {
                Arc::new(EmbeddedMotor {
                    controller: self.native.clone(),
                    index,
                }) as Arc<dyn Motor>
            })
            .collect()
    }

    fn deadzone(&self) -> Deadzone {
        controller_deadzone(&self.native)
    }

    fn set_deadzone(&self, deadzone: Deadzone) {
        self.native
            .set_deadzone(deadzone.value, convert::deadzone_code(deadzone.method));
    }

    fn button_down(&self) -> &Event<ButtonEvent> {
        &self.button_down
    }

    fn button_up(&self) -> &Event<ButtonEvent> {
        &self.button_up
    }

    fn thumbstick_moved(&self) -> &Event<ThumbstickEvent> {
        &self.thumbstick_moved
    }

    fn trigger_moved(&self) -> &Event<TriggerEvent> {
        &self.trigger_moved
    }
}

/// A raw controller: unnamed buttons, axes and hats.
pub struct EmbeddedJoystick {
    native: Arc<NativeController>,
    button_down: Event<ButtonEvent>,
    button_up: Event<ButtonEvent>,
    axis_moved: Event<AxisEvent>,
    hat_moved: Event<HatEvent>,
}

impl EmbeddedJoystick {
    pub(crate) fn new(native: Arc<NativeController>) -> Self {
        let device = DeviceId(native.id());

        let button_down = Event::from_signal("embedded.joystick.button_down", &native.button_signal, move |args| {
            button_down_event(unnamed, device, args)
        });
        let button_up = Event::from_signal("embedded.joystick.button_up", &native.button_signal, move |args| {
            button_up_event(unnamed, device, args)
        });
        let axis_moved = {
            let weak: Weak<NativeController> = Arc::downgrade(&native);
            Event::from_signal("embedded.joystick.axis_moved", &native.axis_signal, move |args| {
                let deadzone = controller_deadzone(&*weak.upgrade()?);
                Some(AxisEvent {
                    device,
                    axis: Axis {
                        index: args.index,
                        position: deadzone.apply(args.value),
                    },
                })
            })
        };
        let hat_moved = Event::from_signal("embedded.joystick.hat_moved", &native.hat_signal, move |args| {
            Some(HatEvent {
                device,
                hat: Hat {
                    index: args.index,
                    position: convert::hat_position(args.bits),
                },
            })
        });

        Self {
            native,
            button_down,
            button_up,
            axis_moved,
            hat_moved,
        }
    }
}

impl InputDevice for EmbeddedJoystick {
    fn id(&self) -> DeviceId {
        DeviceId(self.native.id())
    }

    fn name(&self) -> String {
        self.native.name().to_owned()
    }

    fn is_connected(&self) -> bool {
        self.native.is_connected()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Joystick
    }
}

impl Joystick for EmbeddedJoystick {
    fn axes(&self) -> Vec<Axis> {
        let deadzone = controller_deadzone(&self.native);
        self.native
            .axes()
            .into_iter()
            .enumerate()
            .map(|(index, value)| Axis {
                index,
                position: deadzone.apply(value),
            })
            .collect()
    }

    fn buttons(&self) -> Vec<Button> {
        self.native
            .buttons()
            .iter()
            .enumerate()
            .map(|(index, button)| Button {
                name: ButtonName::Unknown,
                index,
                pressed: button.pressed,
            })
            .collect()
    }

    fn hats(&self) -> Vec<Hat> {
        self.native
            .hats()
            .into_iter()
            .enumerate()
            .map(|(index, bits)| Hat {
                index,
                position: convert::hat_position(bits),
            })
            .collect()
    }

    fn deadzone(&self) -> Deadzone {
        controller_deadzone(&self.native)
    }

    fn set_deadzone(&self, deadzone: Deadzone) {
        self.native
            .set_deadzone(deadzone.value, convert::deadzone_code(deadzone.method));
    }

    fn button_down(&self) -> &Event<ButtonEvent> {
        &self.button_down
    }

    fn button_up(&self) -> &Event<ButtonEvent> {
        &self.button_up
    }

    fn axis_moved(&self) -> &Event<AxisEvent> {
        &self.axis_moved
    }

    fn hat_moved(&self) -> &Event<HatEvent> {
        &self.hat_moved
    }
}

/// A controller with neither the standard nor the joystick layout.
pub struct EmbeddedDevice {
    native: Arc<NativeController>,
}

impl InputDevice for EmbeddedDevice {
    fn id(&self) -> DeviceId {
        DeviceId(self.native.id())
    }

    fn name(&self) -> String {
        self.native.name().to_owned()
    }

    fn is_connected(&self) -> bool {
        self.native.is_connected()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Other
    }
}

/// Cached adapter for one host controller.
#[derive(Clone)]
pub(crate) enum ControllerAdapter {
    Gamepad(Arc<EmbeddedGamepad>),
    Joystick(Arc<EmbeddedJoystick>),
    Other(Arc<EmbeddedDevice>),
}

impl ControllerAdapter {
    pub(crate) fn new(native: Arc<NativeController>) -> Self {
        match native.mapping() {
            ControllerMapping::Standard => Self::Gamepad(Arc::new(EmbeddedGamepad::new(native))),
            ControllerMapping::Joystick => Self::Joystick(Arc::new(EmbeddedJoystick::new(native))),
            ControllerMapping::Unknown => Self::Other(Arc::new(EmbeddedDevice { native })),
        }
    }
}

pub(crate) fn kind_of(mapping: ControllerMapping) -> DeviceKind {
    match mapping {
        ControllerMapping::Standard => DeviceKind::Gamepad,
        ControllerMapping::Joystick => DeviceKind::Joystick,
        ControllerMapping::Unknown => DeviceKind::Other,
    }
}
