//! Keyboard, mouse and cursor of a winit window.
//!
//! winit reports input as window events rather than per device, so there is
//! exactly one keyboard and one mouse per window. Both read a shared
//! [`WinitInputState`] that a single permanent subscription keeps current;
//! their [`Event`]s subscribe lazily to the same window event signal.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{UVec2, Vec2};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use winit::dpi::{LogicalPosition, PhysicalPosition};
use winit::event::{ElementState, Ime, MouseScrollDelta, WindowEvent};
use winit::window::CursorGrabMode;

use super::convert;
use crate::errors::{MoteurError, Result};
use crate::events::{Event, NativeSignal};
use crate::input::{
    CharEvent, Cursor, CursorMode, CursorType, DeviceId, DeviceKind, InputDevice, Key, KeyEvent, Keyboard,
    Mouse, MouseButton, MouseButtonEvent, MouseMoveEvent, RawImage, ScrollEvent, ScrollWheel, StandardCursor,
};
use crate::window::winit::WinitInputSource;

pub const KEYBOARD_ID: DeviceId = DeviceId(0);
pub const MOUSE_ID: DeviceId = DeviceId(1);

pub const DEFAULT_DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);
pub const DEFAULT_DOUBLE_CLICK_RANGE: f32 = 4.0;

/// Scale applied to pixel-precise wheel deltas to approximate lines.
const PIXEL_SCROLL_SCALE: f32 = 0.01;

fn scroll_wheel(delta: MouseScrollDelta) -> ScrollWheel {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => ScrollWheel { x, y },
        MouseScrollDelta::PixelDelta(pos) => ScrollWheel {
            x: pos.x as f32 * PIXEL_SCROLL_SCALE,
            y: pos.y as f32 * PIXEL_SCROLL_SCALE,
        },
    }
}

/// Cursor position in logical window units, matching [`Window::size`](crate::window::Window::size).
fn logical_position(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let logical: LogicalPosition<f64> = position.to_logical(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}

// ============================================================================
// Shared state
// ============================================================================

struct ClickTracker {
    pressed_at: FxHashMap<MouseButton, Vec2>,
    last_click: Option<(MouseButton, Vec2, Instant)>,
    time: Duration,
    range: f32,
}

impl ClickTracker {
    /// Registers a completed click. Returns whether it completes a double-click.
    fn register_click(&mut self, button: MouseButton, position: Vec2, now: Instant) -> bool {
        let is_double = self.last_click.is_some_and(|(last_button, last_position, at)| {
            last_button == button
                && now.duration_since(at) <= self.time
                && last_position.distance(position) <= self.range
        });
        // A double-click consumes its first click.
        self.last_click = if is_double { None } else { Some((button, position, now)) };
        is_double
    }
}

/// Polled input state of one winit window.
pub struct WinitInputState {
    pressed_keys: Mutex<FxHashSet<Key>>,
    pressed_scancodes: Mutex<FxHashSet<u32>>,
    position: Mutex<Vec2>,
    buttons: Mutex<FxHashSet<MouseButton>>,
    wheel: Mutex<ScrollWheel>,
    clicks: Mutex<ClickTracker>,
    click_signal: Arc<NativeSignal<MouseButtonEvent>>,
    double_click_signal: Arc<NativeSignal<MouseButtonEvent>>,
}

impl WinitInputState {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            pressed_keys: Mutex::new(FxHashSet::default()),
            pressed_scancodes: Mutex::new(FxHashSet::default()),
            position: Mutex::new(Vec2::ZERO),
            buttons: Mutex::new(FxHashSet::default()),
            wheel: Mutex::new(ScrollWheel::default()),
            clicks: Mutex::new(ClickTracker {
                pressed_at: FxHashMap::default(),
                last_click: None,
                time: DEFAULT_DOUBLE_CLICK_TIME,
                range: DEFAULT_DOUBLE_CLICK_RANGE,
            }),
            click_signal: NativeSignal::new(),
            double_click_signal: NativeSignal::new(),
        })
    }

    /// Folds one window event into the state; raises click and double-click.
    pub(crate) fn observe(&self, event: &WindowEvent, scale_factor: f64) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let key = convert::key(event.physical_key);
                let scancode = convert::scancode(event.physical_key);
                match event.state {
                    ElementState::Pressed => {
                        self.pressed_keys.lock().insert(key);
                        self.pressed_scancodes.lock().insert(scancode);
                    }
                    ElementState::Released => {
                        self.pressed_keys.lock().remove(&key);
                        self.pressed_scancodes.lock().remove(&scancode);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                *self.position.lock() = logical_position(*position, scale_factor);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.observe_button(*state, convert::mouse_button(*button));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                *self.wheel.lock() = scroll_wheel(*delta);
            }
            WindowEvent::Focused(false) => {
                self.pressed_keys.lock().clear();
                self.pressed_scancodes.lock().clear();
                self.buttons.lock().clear();
                self.clicks.lock().pressed_at.clear();
            }
            _ => {}
        }
    }

    fn observe_button(&self, state: ElementState, button: MouseButton) {
        let position = *self.position.lock();
        match state {
            ElementState::Pressed => {
                self.buttons.lock().insert(button);
                self.clicks.lock().pressed_at.insert(button, position);
            }
            ElementState::Released => {
                self.buttons.lock().remove(&button);
                let (clicked, double) = {
                    let mut clicks = self.clicks.lock();
                    match clicks.pressed_at.remove(&button) {
                        Some(_) => (true, clicks.register_click(button, position, Instant::now())),
                        None => (false, false),
                    }
                };
                let event = MouseButtonEvent {
                    device: MOUSE_ID,
                    button,
                    position,
                };
                if clicked {
                    self.click_signal.emit(&event);
                }
                if double {
                    self.double_click_signal.emit(&event);
                }
            }
        }
    }
}

// ============================================================================
// Keyboard
// ============================================================================

fn clipboard_unavailable() -> MoteurError {
    MoteurError::Clipboard("winit exposes no system clipboard")
}

pub struct WinitKeyboard {
    source: WinitInputSource,
    state: Arc<WinitInputState>,
    key_down: Event<KeyEvent>,
    key_up: Event<KeyEvent>,
    key_char: Event<CharEvent>,
}

fn key_event(event: &WindowEvent, wanted: ElementState) -> Option<KeyEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } if event.state == wanted => Some(KeyEvent {
            device: KEYBOARD_ID,
            key: convert::key(event.physical_key),
            scancode: convert::scancode(event.physical_key),
        }),
        _ => None,
    }
}

impl WinitKeyboard {
    pub(crate) fn new(source: WinitInputSource, state: Arc<WinitInputState>) -> Self {
        let key_down = Event::from_signal("winit.key_down", &source.events, |event: &WindowEvent| {
            key_event(event, ElementState::Pressed)
        });
        let key_up = Event::from_signal("winit.key_up", &source.events, |event: &WindowEvent| {
            key_event(event, ElementState::Released)
        });

        // One native event may carry several characters.
        let key_char = {
            let events = source.events.clone();
            Event::new("winit.key_char", move |fanout| {
                events.connect(move |event: &WindowEvent| {
                    let text = match event {
                        WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                            event.text.as_deref()
                        }
                        WindowEvent::Ime(Ime::Commit(text)) => Some(text.as_str()),
                        _ => None,
                    };
                    for character in text.unwrap_or_default().chars() {
                        fanout.emit(&CharEvent {
                            device: KEYBOARD_ID,
                            character,
                        });
                    }
                })
            })
        };

        Self {
            source,
            state,
            key_down,
            key_up,
            key_char,
        }
    }
}

impl InputDevice for WinitKeyboard {
    fn id(&self) -> DeviceId {
        KEYBOARD_ID
    }

    fn name(&self) -> String {
        "Winit Keyboard".to_owned()
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Keyboard
    }
}

impl Keyboard for WinitKeyboard {
    fn supported_keys(&self) -> Vec<Key> {
        Key::ALL.to_vec()
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.state.pressed_keys.lock().contains(&key)
    }

    fn is_scancode_pressed(&self, scancode: u32) -> bool {
        self.state.pressed_scancodes.lock().contains(&scancode)
    }

    /// winit has no clipboard; this always fails.
    fn clipboard_text(&self) -> Result<String> {
        Err(clipboard_unavailable())
    }

    /// winit has no clipboard; this always fails.
    fn set_clipboard_text(&self, _text: &str) -> Result<()> {
        Err(clipboard_unavailable())
    }

    fn begin_input(&self) {
        self.source.window.set_ime_allowed(true);
    }

    fn end_input(&self) {
        self.source.window.set_ime_allowed(false);
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
// Cursor
// ============================================================================

#[derive(Debug, Clone, Default)]
struct CursorState {
    cursor_type: CursorType,
    standard: StandardCursor,
    mode: CursorMode,
    confined: bool,
    hotspot: UVec2,
    image: Option<RawImage>,
}

pub struct WinitCursor {
    window: Arc<winit::window::Window>,
    state: Mutex<CursorState>,
}

impl WinitCursor {
    fn apply_grab(&self, mode: CursorMode, confined: bool) -> Result<()> {
        let window = &self.window;
        match mode {
            CursorMode::Normal | CursorMode::Hidden => {
                let grab = if confined {
                    CursorGrabMode::Confined
                } else {
                    CursorGrabMode::None
                };
                window.set_cursor_grab(grab)?;
                window.set_cursor_visible(mode == CursorMode::Normal);
            }
            CursorMode::Disabled => {
                window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))?;
                window.set_cursor_visible(false);
            }
            CursorMode::Raw => return Err(MoteurError::unsupported("winit cursor mode", mode)),
        }
        Ok(())
    }
}

impl Cursor for WinitCursor {
    fn cursor_type(&self) -> CursorType {
        self.state.lock().cursor_type
    }

    fn set_cursor_type(&self, cursor_type: CursorType) -> Result<()> {
        match cursor_type {
            CursorType::Standard => {
                let standard = {
                    let mut state = self.state.lock();
                    state.cursor_type = CursorType::Standard;
                    state.standard
                };
                self.window.set_cursor(convert::cursor_icon(standard));
                Ok(())
            }
            CursorType::Custom => Err(MoteurError::unsupported("winit cursor type", cursor_type)),
        }
    }

    fn standard_cursor(&self) -> StandardCursor {
        self.state.lock().standard
    }

    fn set_standard_cursor(&self, cursor: StandardCursor) -> Result<()> {
        self.state.lock().standard = cursor;
        self.window.set_cursor(convert::cursor_icon(cursor));
        Ok(())
    }

    fn cursor_mode(&self) -> CursorMode {
        self.state.lock().mode
    }

    fn set_cursor_mode(&self, mode: CursorMode) -> Result<()> {
        let confined = self.state.lock().confined;
        self.apply_grab(mode, confined)?;
        self.state.lock().mode = mode;
        Ok(())
    }

    fn is_confined(&self) -> bool {
        self.state.lock().confined
    }

    fn set_confined(&self, confined: bool) -> Result<()> {
        let mode = self.state.lock().mode;
        if mode != CursorMode::Disabled {
            self.apply_grab(mode, confined)?;
        }
        self.state.lock().confined = confined;
        Ok(())
    }

    fn hotspot(&self) -> UVec2 {
        self.state.lock().hotspot
    }

    fn set_hotspot(&self, hotspot: UVec2) {
        self.state.lock().hotspot = hotspot;
    }

    fn image(&self) -> Option<RawImage> {
        self.state.lock().image.clone()
    }

    /// Stores the image. It only takes effect on backends accepting [`CursorType::Custom`].
    fn set_image(&self, image: Option<RawImage>) -> Result<()> {
        self.state.lock().image = image;
        Ok(())
    }

    fn is_mode_supported(&self, mode: CursorMode) -> bool {
        mode != CursorMode::Raw
    }

    fn is_standard_supported(&self, _cursor: StandardCursor) -> bool {
        true
    }
}

// ============================================================================
// Mouse
// ============================================================================

pub struct WinitMouse {
    source: WinitInputSource,
    state: Arc<WinitInputState>,
    cursor: Arc<WinitCursor>,
    mouse_down: Event<MouseButtonEvent>,
    mouse_up: Event<MouseButtonEvent>,
    click: Event<MouseButtonEvent>,
    double_click: Event<MouseButtonEvent>,
    mouse_move: Event<MouseMoveEvent>,
    scroll: Event<ScrollEvent>,
}

impl WinitMouse {
    pub(crate) fn new(source: WinitInputSource, state: Arc<WinitInputState>) -> Self {
        let button_event = |wanted: ElementState| {
            let state = state.clone();
            move |event: &WindowEvent| match event {
                WindowEvent::MouseInput {
                    state: element,
                    button,
                    ..
                } if *element == wanted => Some(MouseButtonEvent {
                    device: MOUSE_ID,
                    button: convert::mouse_button(*button),
                    position: *state.position.lock(),
                }),
                _ => None,
            }
        };

        let mouse_down = Event::from_signal("winit.mouse_down", &source.events, button_event(ElementState::Pressed));
        let mouse_up = Event::from_signal("winit.mouse_up", &source.events, button_event(ElementState::Released));
        let click = Event::from_signal("winit.click", &state.click_signal, |event: &MouseButtonEvent| Some(*event));
        let double_click = Event::from_signal("winit.double_click", &state.double_click_signal, |event: &MouseButtonEvent| {
            Some(*event)
        });
        let mouse_move = {
            let window = source.window.clone();
            Event::from_signal("winit.mouse_move", &source.events, move |event: &WindowEvent| match event {
                WindowEvent::CursorMoved { position, .. } => Some(MouseMoveEvent {
                    device: MOUSE_ID,
                    position: logical_position(*position, window.scale_factor()),
                }),
                _ => None,
            })
        };
        let scroll = Event::from_signal("winit.scroll", &source.events, |event: &WindowEvent| match event {
            WindowEvent::MouseWheel { delta, .. } => Some(ScrollEvent {
                device: MOUSE_ID,
                wheel: scroll_wheel(*delta),
            }),
            _ => None,
        });

        let cursor = Arc::new(WinitCursor {
            window: source.window.clone(),
            state: Mutex::new(CursorState::default()),
        });

        Self {
            source,
            state,
            cursor,
            mouse_down,
            mouse_up,
            click,
            double_click,
            mouse_move,
            scroll,
        }
    }
}

impl InputDevice for WinitMouse {
    fn id(&self) -> DeviceId {
        MOUSE_ID
    }

    fn name(&self) -> String {
        "Winit Mouse".to_owned()
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Mouse
    }
}

impl Mouse for WinitMouse {
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
        vec![*self.state.wheel.lock()]
    }

    fn position(&self) -> Vec2 {
        *self.state.position.lock()
    }

    fn set_position(&self, position: Vec2) -> Result<()> {
        self.source
            .window
            .set_cursor_position(LogicalPosition::new(f64::from(position.x), f64::from(position.y)))?;
        *self.state.position.lock() = position;
        Ok(())
    }

    fn cursor(&self) -> Arc<dyn Cursor> {
        self.cursor.clone()
    }

    fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.state.buttons.lock().contains(&button)
    }

    fn double_click_time(&self) -> Duration {
        self.state.clicks.lock().time
    }

    fn set_double_click_time(&self, time: Duration) {
        self.state.clicks.lock().time = time;
    }

    fn double_click_range(&self) -> f32 {
        self.state.clicks.lock().range
    }

    fn set_double_click_range(&self, range: f32) {
        self.state.clicks.lock().range = range.max(0.0);
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
