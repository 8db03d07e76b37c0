//! Gamepads and joysticks of the winit backend.
//!
//! winit itself reports no controllers. Controller state lives in a
//! [`ControllerHub`] shared by the window and its input contexts; the gilrs
//! pump (see `pump`) owns the native context on the event-loop thread and
//! folds its events into the hub. Adapters read the hub and subscribe lazily
//! to the per-pad signals.
//!
//! Mapped gamepads use the standard layout: 17 button slots (6 and 7 are the
//! analog triggers) and 4 stick axes. Unmapped devices are joysticks whose
//! slots are allocated in the order the native codes first appear.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::events::{Event, NativeSignal, Subscription};
use crate::input::{
    Axis, AxisEvent, Button, ButtonEvent, ButtonName, ConnectionChange, Deadzone, DeviceId, DeviceInfo,
    DeviceKind, Gamepad, Hat, HatEvent, InputDevice, Joystick, Motor, Position2D, Thumbstick, ThumbstickEvent,
    Trigger, TriggerEvent,
};

/// Button slots of a standard-layout gamepad.
pub const STANDARD_BUTTONS: usize = 17;
/// Stick axes of a standard-layout gamepad: left X/Y, right X/Y.
pub const STANDARD_AXES: usize = 4;
/// Slots of the analog triggers.
pub const TRIGGER_SLOTS: [usize; 2] = [6, 7];

const THUMBSTICK_COUNT: usize = 2;

/// Engine name of a standard-layout button slot.
#[must_use]
pub fn standard_button(slot: usize) -> ButtonName {
    match slot {
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

/// Hat direction of a D-pad axis pair. +Y points up.
#[must_use]
pub fn hat_position(x: f32, y: f32) -> Position2D {
    const THRESHOLD: f32 = 0.5;
    let horizontal = i8::from(x > THRESHOLD) - i8::from(x < -THRESHOLD);
    let vertical = i8::from(y > THRESHOLD) - i8::from(y < -THRESHOLD);
    match (horizontal, vertical) {
        (0, 1) => Position2D::Up,
        (0, -1) => Position2D::Down,
        (-1, 0) => Position2D::Left,
        (1, 0) => Position2D::Right,
        (-1, 1) => Position2D::UpLeft,
        (1, 1) => Position2D::UpRight,
        (-1, -1) => Position2D::DownLeft,
        (1, -1) => Position2D::DownRight,
        _ => Position2D::Centered,
    }
}

// ============================================================================
// Pad state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadButtonArgs {
    pub slot: usize,
    pub pressed: bool,
    pub value: f32,
    /// Whether `pressed` flipped with this update.
    pub toggled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadAxisArgs {
    pub slot: usize,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadHatArgs {
    pub slot: usize,
    pub position: Position2D,
}

#[derive(Debug, Clone, Copy, Default)]
struct PadButton {
    pressed: bool,
    value: f32,
}

#[derive(Debug, Default)]
struct PadValues {
    buttons: Vec<PadButton>,
    axes: Vec<f32>,
    /// Raw D-pad axis pairs.
    hats: Vec<(f32, f32)>,
    button_codes: FxHashMap<u32, usize>,
    axis_codes: FxHashMap<u32, usize>,
    motors: Vec<f32>,
    deadzone: Deadzone,
}

/// Live state of one connected controller.
pub struct PadState {
    id: DeviceId,
    name: String,
    kind: DeviceKind,
    connected: AtomicBool,
    values: Mutex<PadValues>,
    rumble_dirty: AtomicBool,
    pub(crate) button_signal: Arc<NativeSignal<PadButtonArgs>>,
    pub(crate) axis_signal: Arc<NativeSignal<PadAxisArgs>>,
    pub(crate) hat_signal: Arc<NativeSignal<PadHatArgs>>,
}

impl PadState {
    /// A standard-layout gamepad with `motors` vibration motors.
    #[must_use]
    pub fn gamepad(id: DeviceId, name: impl Into<String>, motors: usize) -> Arc<Self> {
        Self::new(id, name.into(), DeviceKind::Gamepad, PadValues {
            buttons: vec![PadButton::default(); STANDARD_BUTTONS],
            axes: vec![0.0; STANDARD_AXES],
            motors: vec![0.0; motors],
            ..PadValues::default()
        })
    }

    /// A joystick; its slots appear as the device reports them.
    #[must_use]
    pub fn joystick(id: DeviceId, name: impl Into<String>) -> Arc<Self> {
        Self::new(id, name.into(), DeviceKind::Joystick, PadValues::default())
    }

    fn new(id: DeviceId, name: String, kind: DeviceKind, values: PadValues) -> Arc<Self> {
        Arc::new(Self {
            id,
            name,
            kind,
            connected: AtomicBool::new(false),
            values: Mutex::new(values),
            rumble_dirty: AtomicBool::new(false),
            button_signal: NativeSignal::new(),
            axis_signal: NativeSignal::new(),
            hat_signal: NativeSignal::new(),
        })
    }

    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            id: self.id,
            kind: self.kind,
            name: self.name.clone(),
        }
    }

    /// Slot for a native button code, allocating one on first sight.
    #[must_use]
    pub fn button_slot_for_code(&self, code: u32) -> usize {
        let mut values = self.values.lock();
        let next = values.button_codes.len();
        let slot = *values.button_codes.entry(code).or_insert(next);
        if values.buttons.len() <= slot {
            values.buttons.resize(slot + 1, PadButton::default());
        }
        slot
    }

    /// Slot for a native axis code, allocating one on first sight.
    #[must_use]
    pub fn axis_slot_for_code(&self, code: u32) -> usize {
        let mut values = self.values.lock();
        let next = values.axis_codes.len();
        let slot = *values.axis_codes.entry(code).or_insert(next);
        if values.axes.len() <= slot {
            values.axes.resize(slot + 1, 0.0);
        }
        slot
    }

    /// Updates a button. Unknown slots are ignored; unchanged values raise nothing.
    pub fn set_button(&self, slot: usize, pressed: bool, value: f32) {
        let value = value.clamp(0.0, 1.0);
        let (toggled, moved) = {
            let mut values = self.values.lock();
            let Some(button) = values.buttons.get_mut(slot) else {
                return;
            };
            let toggled = button.pressed != pressed;
            let moved = (button.value - value).abs() > f32::EPSILON;
            *button = PadButton { pressed, value };
            (toggled, moved)
        };
        if toggled || moved {
            self.button_signal.emit(&PadButtonArgs {
                slot,
                pressed,
                value,
                toggled,
            });
        }
    }

    /// Updates the analog value of a button, keeping its pressed state.
    pub fn set_button_value(&self, slot: usize, value: f32) {
        let pressed = self.values.lock().buttons.get(slot).map(|b| b.pressed);
        if let Some(pressed) = pressed {
            self.set_button(slot, pressed, value);
        }
    }

    /// Updates the pressed state of a button, keeping its analog value.
    pub fn set_pressed(&self, slot: usize, pressed: bool) {
        let value = self.values.lock().buttons.get(slot).map(|b| b.value);
        if let Some(value) = value {
            self.set_button(slot, pressed, value);
        }
    }

    pub fn set_axis(&self, slot: usize, value: f32) {
        let value = value.clamp(-1.0, 1.0);
        {
            let mut values = self.values.lock();
            let Some(axis) = values.axes.get_mut(slot) else {
                return;
            };
            *axis = value;
        }
        self.axis_signal.emit(&PadAxisArgs { slot, value });
    }

    /// Updates one component of a D-pad hat, creating the hat if needed.
    pub fn set_hat_axis(&self, slot: usize, x: Option<f32>, y: Option<f32>) {
        let position = {
            let mut values = self.values.lock();
            if values.hats.len() <= slot {
                values.hats.resize(slot + 1, (0.0, 0.0));
            }
            let hat = &mut values.hats[slot];
            let before = hat_position(hat.0, hat.1);
            hat.0 = x.unwrap_or(hat.0);
            hat.1 = y.unwrap_or(hat.1);
            let after = hat_position(hat.0, hat.1);
            (after != before).then_some(after)
        };
        if let Some(position) = position {
            self.hat_signal.emit(&PadHatArgs { slot, position });
        }
    }

    fn buttons(&self) -> Vec<PadButton> {
        self.values.lock().buttons.clone()
    }

    fn axes(&self) -> Vec<f32> {
        self.values.lock().axes.clone()
    }

    fn hats(&self) -> Vec<Position2D> {
        self.values.lock().hats.iter().map(|(x, y)| hat_position(*x, *y)).collect()
    }

    #[must_use]
    pub fn motor_speeds(&self) -> Vec<f32> {
        self.values.lock().motors.clone()
    }

    fn set_motor_speed(&self, motor: usize, speed: f32) {
        let mut values = self.values.lock();
        if let Some(slot) = values.motors.get_mut(motor) {
            *slot = speed;
            self.rumble_dirty.store(true, Ordering::Release);
        }
    }

    /// Motor speeds, if they changed since the last call.
    #[must_use]
    pub fn take_rumble(&self) -> Option<Vec<f32>> {
        self.rumble_dirty
            .swap(false, Ordering::AcqRel)
            .then(|| self.motor_speeds())
    }

    fn deadzone(&self) -> Deadzone {
        self.values.lock().deadzone
    }

    fn set_deadzone(&self, deadzone: Deadzone) {
        self.values.lock().deadzone = deadzone;
    }
}

// ============================================================================
// Hub
// ============================================================================

#[derive(Clone)]
pub struct PadConnection {
    pub pad: Arc<PadState>,
    pub connected: bool,
}

/// Controllers currently known to one winit window.
pub struct ControllerHub {
    pads: Mutex<FxHashMap<DeviceId, Arc<PadState>>>,
    pub(crate) connections: Arc<NativeSignal<PadConnection>>,
}

impl ControllerHub {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            pads: Mutex::new(FxHashMap::default()),
            connections: NativeSignal::new(),
        })
    }

    /// Registers `pad` and raises a connection. A pad already present is replaced.
    pub fn connect(&self, pad: Arc<PadState>) {
        pad.connected.store(true, Ordering::Release);
        self.pads.lock().insert(pad.id(), pad.clone());
        self.connections.emit(&PadConnection { pad, connected: true });
    }

    /// Removes the pad with `id`. Returns whether it was connected.
    pub fn disconnect(&self, id: DeviceId) -> bool {
        let Some(pad) = self.pads.lock().remove(&id) else {
            return false;
        };
        pad.connected.store(false, Ordering::Release);
        self.connections.emit(&PadConnection { pad, connected: false });
        true
    }

    #[must_use]
    pub fn get(&self, id: DeviceId) -> Option<Arc<PadState>> {
        self.pads.lock().get(&id).cloned()
    }

    /// Connected pads ordered by id.
    #[must_use]
    pub fn pads(&self) -> Vec<Arc<PadState>> {
        let mut pads: Vec<_> = self.pads.lock().values().cloned().collect();
        pads.sort_by_key(|pad| pad.id());
        pads
    }
}

// ============================================================================
// Adapters
// ============================================================================

fn button_event(
    name: fn(usize) -> ButtonName,
    device: DeviceId,
    args: &PadButtonArgs,
    pressed: bool,
) -> Option<ButtonEvent> {
    (args.toggled && args.pressed == pressed).then_some(ButtonEvent {
        device,
        button: Button {
            name: name(args.slot),
            index: args.slot,
            pressed,
        },
    })
}

fn unnamed(_slot: usize) -> ButtonName {
    ButtonName::Unknown
}

fn is_trigger(slot: usize) -> bool {
    TRIGGER_SLOTS.contains(&slot)
}

pub struct WinitMotor {
    pad: Arc<PadState>,
    index: usize,
}

impl Motor for WinitMotor {
    fn index(&self) -> usize {
        self.index
    }

    fn speed(&self) -> f32 {
        self.pad.motor_speeds().get(self.index).copied().unwrap_or(0.0)
    }

    /// Applied on the next pump of the event loop.
    fn set_speed(&self, speed: f32) {
        self.pad.set_motor_speed(self.index, speed.clamp(0.0, 1.0));
    }
}

fn thumbstick(pad: &PadState, index: usize) -> Option<Thumbstick> {
    let axes = pad.axes();
    let deadzone = pad.deadzone();
    Some(Thumbstick {
        index,
        x: deadzone.apply(*axes.get(index * 2)?),
        y: deadzone.apply(*axes.get(index * 2 + 1)?),
    })
}

pub struct WinitGamepad {
    pad: Arc<PadState>,
    button_down: Event<ButtonEvent>,
    button_up: Event<ButtonEvent>,
    thumbstick_moved: Event<ThumbstickEvent>,
    trigger_moved: Event<TriggerEvent>,
}

impl WinitGamepad {
    #[must_use]
    pub fn new(pad: Arc<PadState>) -> Self {
        let device = pad.id();

        // Triggers report through `trigger_moved` only.
        let button_down = Event::from_signal("winit.gamepad.button_down", &pad.button_signal, move |args| {
            (!is_trigger(args.slot))
                .then(|| button_event(standard_button, device, args, true))
                .flatten()
        });
        let button_up = Event::from_signal("winit.gamepad.button_up", &pad.button_signal, move |args| {
            (!is_trigger(args.slot))
                .then(|| button_event(standard_button, device, args, false))
                .flatten()
        });
        let trigger_moved = Event::from_signal("winit.gamepad.trigger_moved", &pad.button_signal, move |args| {
            let index = TRIGGER_SLOTS.iter().position(|slot| *slot == args.slot)?;
            Some(TriggerEvent {
                device,
                trigger: Trigger {
                    index,
                    position: args.value,
                },
            })
        });
        let thumbstick_moved = {
            let weak = Arc::downgrade(&pad);
            Event::from_signal("winit.gamepad.thumbstick_moved", &pad.axis_signal, move |args| {
                let index = args.slot / 2;
                if index >= THUMBSTICK_COUNT {
                    return None;
                }
                let thumbstick = thumbstick(&*weak.upgrade()?, index)?;
                Some(ThumbstickEvent { device, thumbstick })
            })
        };

        Self {
            pad,
            button_down,
            button_up,
            thumbstick_moved,
            trigger_moved,
        }
    }
}

impl InputDevice for WinitGamepad {
    fn id(&self) -> DeviceId {
        self.pad.id()
    }

    fn name(&self) -> String {
        self.pad.name().to_owned()
    }

    fn is_connected(&self) -> bool {
        self.pad.is_connected()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Gamepad
    }
}

impl Gamepad for WinitGamepad {
    fn buttons(&self) -> Vec<Button> {
        self.pad
            .buttons()
            .iter()
            .enumerate()
            .filter(|(slot, _)| !is_trigger(*slot))
            .map(|(slot, button)| Button {
                name: standard_button(slot),
                index: slot,
                pressed: button.pressed,
            })
            .collect()
    }

    fn thumbsticks(&self) -> Vec<Thumbstick> {
        (0..THUMBSTICK_COUNT)
            .filter_map(|index| thumbstick(&self.pad, index))
            .collect()
    }

    fn triggers(&self) -> Vec<Trigger> {
        let buttons = self.pad.buttons();
        TRIGGER_SLOTS
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                buttons.get(*slot).map(|b| Trigger {
                    index,
                    position: b.value,
                })
            })
            .collect()
    }

    fn vibration_motors(&self) -> Vec<Arc<dyn Motor>> {
        (0..self.pad.motor_speeds().len())
            .map(|index| {
                Arc::new(WinitMotor {
                    pad: self.pad.clone(),
                    index,
                }) as Arc<dyn Motor>
            })
            .collect()
    }

    fn deadzone(&self) -> Deadzone {
        self.pad.deadzone()
    }

    fn set_deadzone(&self, deadzone: Deadzone) {
        self.pad.set_deadzone(deadzone);
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

pub struct WinitJoystick {
    pad: Arc<PadState>,
    button_down: Event<ButtonEvent>,
    button_up: Event<ButtonEvent>,
    axis_moved: Event<AxisEvent>,
    hat_moved: Event<HatEvent>,
}

impl WinitJoystick {
    #[must_use]
    pub fn new(pad: Arc<PadState>) -> Self {
        let device = pad.id();

        let button_down = Event::from_signal("winit.joystick.button_down", &pad.button_signal, move |args| {
            button_event(unnamed, device, args, true)
        });
        let button_up = Event::from_signal("winit.joystick.button_up", &pad.button_signal, move |args| {
            button_event(unnamed, device, args, false)
        });
        let axis_moved = {
            let weak = Arc::downgrade(&pad);
            Event::from_signal("winit.joystick.axis_moved", &pad.axis_signal, move |args| {
                let deadzone = weak.upgrade()?.deadzone();
                Some(AxisEvent {
                    device,
                    axis: Axis {
                        index: args.slot,
                        position: deadzone.apply(args.value),
                    },
                })
            })
        };
        let hat_moved = Event::from_signal("winit.joystick.hat_moved", &pad.hat_signal, move |args| {
            Some(HatEvent {
                device,
                hat: Hat {
                    index: args.slot,
                    position: args.position,
                },
            })
        });

        Self {
            pad,
            button_down,
            button_up,
            axis_moved,
            hat_moved,
        }
    }
}

impl InputDevice for WinitJoystick {
    fn id(&self) -> DeviceId {
        self.pad.id()
    }

    fn name(&self) -> String {
        self.pad.name().to_owned()
    }

    fn is_connected(&self) -> bool {
        self.pad.is_connected()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Joystick
    }
}

impl Joystick for WinitJoystick {
    fn axes(&self) -> Vec<Axis> {
        let deadzone = self.pad.deadzone();
        self.pad
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
        self.pad
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
        self.pad
            .hats()
            .into_iter()
            .enumerate()
            .map(|(index, position)| Hat { index, position })
            .collect()
    }

    fn deadzone(&self) -> Deadzone {
        self.pad.deadzone()
    }

    fn set_deadzone(&self, deadzone: Deadzone) {
        self.pad.set_deadzone(deadzone);
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

/// Cached adapter for one pad.
#[derive(Clone)]
enum PadAdapter {
    Gamepad(Arc<WinitGamepad>),
    Joystick(Arc<WinitJoystick>),
}

impl PadAdapter {
    fn new(pad: Arc<PadState>) -> Self {
        match pad.kind() {
            DeviceKind::Gamepad => Self::Gamepad(Arc::new(WinitGamepad::new(pad))),
            _ => Self::Joystick(Arc::new(WinitJoystick::new(pad))),
        }
    }
}

type AdapterCache = Arc<Mutex<FxHashMap<DeviceId, PadAdapter>>>;

/// One input context's view of a [`ControllerHub`]: adapters cached by id
/// and the connection event.
pub struct ControllerSet {
    hub: Arc<ControllerHub>,
    adapters: AdapterCache,
    connection_changed: Event<ConnectionChange>,
    _connection_tracker: Subscription,
}

impl ControllerSet {
    #[must_use]
    pub fn new(hub: Arc<ControllerHub>) -> Self {
        let adapters: AdapterCache = Arc::new(Mutex::new(FxHashMap::default()));

        // Connected before any listener so the adapter exists (or is gone)
        // by the time `connection_changed` listeners run.
        let connection_tracker = {
            let adapters = adapters.clone();
            hub.connections.connect(move |change: &PadConnection| {
                let id = change.pad.id();
                if change.connected {
                    adapters.lock().insert(id, PadAdapter::new(change.pad.clone()));
                } else {
                    adapters.lock().remove(&id);
                }
            })
        };

        let connection_changed =
            Event::from_signal("winit.connection_changed", &hub.connections, |change: &PadConnection| {
                Some(ConnectionChange {
                    device: change.pad.info(),
                    connected: change.connected,
                })
            });

        Self {
            hub,
            adapters,
            connection_changed,
            _connection_tracker: connection_tracker,
        }
    }

    fn adapters(&self) -> impl Iterator<Item = PadAdapter> + '_ {
        self.hub.pads().into_iter().map(|pad| {
            self.adapters
                .lock()
                .entry(pad.id())
                .or_insert_with(|| PadAdapter::new(pad.clone()))
                .clone()
        })
    }

    #[must_use]
    pub fn gamepads(&self) -> Vec<Arc<dyn Gamepad>> {
        self.adapters()
            .filter_map(|adapter| match adapter {
                PadAdapter::Gamepad(gamepad) => Some(gamepad as Arc<dyn Gamepad>),
                PadAdapter::Joystick(_) => None,
            })
            .collect()
    }

    #[must_use]
    pub fn joysticks(&self) -> Vec<Arc<dyn Joystick>> {
        self.adapters()
            .filter_map(|adapter| match adapter {
                PadAdapter::Joystick(joystick) => Some(joystick as Arc<dyn Joystick>),
                PadAdapter::Gamepad(_) => None,
            })
            .collect()
    }

    #[must_use]
    pub fn connection_changed(&self) -> &Event<ConnectionChange> {
        &self.connection_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dpad_axes_decode_to_hat_positions() {
        assert_eq!(hat_position(0.0, 0.0), Position2D::Centered);
        assert_eq!(hat_position(0.0, 1.0), Position2D::Up);
        assert_eq!(hat_position(-1.0, -1.0), Position2D::DownLeft);
        assert_eq!(hat_position(0.3, -0.2), Position2D::Centered);
    }

    #[test]
    fn joystick_slots_follow_first_sight() {
        let pad = PadState::joystick(DeviceId(7), "Stick");
        assert_eq!(pad.button_slot_for_code(300), 0);
        assert_eq!(pad.button_slot_for_code(12), 1);
        assert_eq!(pad.button_slot_for_code(300), 0);
        assert_eq!(pad.axis_slot_for_code(5), 0);
        assert_eq!(pad.buttons().len(), 2);
        assert_eq!(pad.axes().len(), 1);
    }

    #[test]
    fn hat_moves_only_when_direction_changes() {
        let pad = PadState::joystick(DeviceId(7), "Stick");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _hook = {
            let seen = seen.clone();
            pad.hat_signal.connect(move |args: &PadHatArgs| seen.lock().push(args.position))
        };
        pad.set_hat_axis(0, Some(1.0), None);
        pad.set_hat_axis(0, Some(0.9), None);
        pad.set_hat_axis(0, None, Some(1.0));
        assert_eq!(*seen.lock(), vec![Position2D::Right, Position2D::UpRight]);
        assert_eq!(pad.hats(), vec![Position2D::UpRight]);
    }

    #[test]
    fn rumble_is_taken_once() {
        let pad = PadState::gamepad(DeviceId(3), "Pad", 2);
        assert!(pad.take_rumble().is_none());
        let motor = WinitMotor { pad: pad.clone(), index: 1 };
        motor.set_speed(2.0);
        assert_eq!(pad.take_rumble(), Some(vec![0.0, 1.0]));
        assert!(pad.take_rumble().is_none());
    }

    #[test]
    fn connections_update_cached_adapters() {
        let hub = ControllerHub::new();
        let set = ControllerSet::new(hub.clone());
        let changes = Arc::new(Mutex::new(Vec::new()));
        let _listener = {
            let changes = changes.clone();
            set.connection_changed()
                .subscribe(move |change: &ConnectionChange| changes.lock().push(change.clone()))
        };

        hub.connect(PadState::gamepad(DeviceId(2), "Pad", 2));
        hub.connect(PadState::joystick(DeviceId(3), "Stick"));
        assert_eq!(set.gamepads().len(), 1);
        assert_eq!(set.joysticks().len(), 1);

        let first = set.gamepads().remove(0);
        let again = set.gamepads().remove(0);
        assert!(Arc::ptr_eq(&first, &again));
        assert!(first.is_connected());

        assert!(hub.disconnect(DeviceId(2)));
        assert!(!hub.disconnect(DeviceId(2)));
        assert!(set.gamepads().is_empty());
        assert!(!first.is_connected());

        let changes = changes.lock();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].device.kind, DeviceKind::Gamepad);
        assert_eq!(changes[1].device.name, "Stick");
        assert!(!changes[2].connected);
    }

    #[test]
    fn gamepad_triggers_are_not_buttons() {
        let pad = PadState::gamepad(DeviceId(2), "Pad", 0);
        let gamepad = WinitGamepad::new(pad.clone());
        let downs = Arc::new(Mutex::new(Vec::new()));
        let triggers = Arc::new(Mutex::new(Vec::new()));
        let _down = {
            let downs = downs.clone();
            gamepad
                .button_down()
                .subscribe(move |event: &ButtonEvent| downs.lock().push(event.button))
        };
        let _trigger = {
            let triggers = triggers.clone();
            gamepad
                .trigger_moved()
                .subscribe(move |event: &TriggerEvent| triggers.lock().push(event.trigger))
        };

        pad.set_button_value(7, 0.4);
        pad.set_pressed(7, true);
        pad.set_button_value(0, 1.0);
        pad.set_pressed(0, true);

        let downs = downs.lock();
        assert_eq!(downs.len(), 1);
        assert_eq!(downs[0].name, ButtonName::A);
        assert_eq!(triggers.lock()[0], Trigger { index: 1, position: 0.4 });
        assert_eq!(gamepad.triggers()[1].position, 0.4);
        assert!(gamepad.buttons().iter().all(|b| !is_trigger(b.index)));
    }

    #[test]
    fn thumbsticks_pair_axes_through_deadzone() {
        let pad = PadState::gamepad(DeviceId(2), "Pad", 0);
        let gamepad = WinitGamepad::new(pad.clone());
        gamepad.set_deadzone(Deadzone::new(0.2, crate::input::DeadzoneMethod::Traditional));
        let moved = Arc::new(Mutex::new(Vec::new()));
        let _hook = {
            let moved = moved.clone();
            gamepad
                .thumbstick_moved()
                .subscribe(move |event: &ThumbstickEvent| moved.lock().push(event.thumbstick))
        };

        pad.set_axis(2, 0.1);
        pad.set_axis(3, -0.8);

        let moved = moved.lock();
        assert_eq!(moved.len(), 2);
        assert_eq!(moved[1], Thumbstick { index: 1, x: 0.0, y: -0.8 });
    }

    #[test]
    fn joystick_reports_code_slots() {
        let pad = PadState::joystick(DeviceId(4), "Stick");
        let joystick = WinitJoystick::new(pad.clone());
        let ups = Arc::new(Mutex::new(Vec::new()));
        let _hook = {
            let ups = ups.clone();
            joystick
                .button_up()
                .subscribe(move |event: &ButtonEvent| ups.lock().push(event.button.index))
        };

        let trigger = pad.button_slot_for_code(288);
        let thumb = pad.button_slot_for_code(289);
        pad.set_pressed(thumb, true);
        pad.set_pressed(thumb, false);
        pad.set_pressed(trigger, true);

        assert_eq!(*ups.lock(), vec![thumb]);
        assert_eq!(joystick.buttons().len(), 2);
        assert!(joystick.buttons()[trigger].pressed);
    }
}
