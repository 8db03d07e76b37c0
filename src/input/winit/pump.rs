//! gilrs event pump feeding the [`ControllerHub`].

use std::sync::Arc;

use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Envelope, Repeat, Replay, Ticks};
use gilrs::{EventType, GamepadId, Gilrs, MappingSource};
use rustc_hash::FxHashMap;

use super::controllers::{ControllerHub, PadState};
use crate::input::{DeviceId, DeviceKind};

/// First device id handed to controllers; keyboard and mouse sit below it.
pub const CONTROLLER_ID_BASE: u32 = 2;

/// Length of one rumble replay; effects repeat until the speed changes.
const RUMBLE_SLICE_MS: u32 = 50;

/// Standard-layout slot of a mapped gilrs button.
#[must_use]
pub fn button_slot(button: gilrs::Button) -> Option<usize> {
    use gilrs::Button;
    Some(match button {
        Button::South => 0,
        Button::East => 1,
        Button::West => 2,
        Button::North => 3,
        Button::LeftTrigger => 4,
        Button::RightTrigger => 5,
        Button::LeftTrigger2 => 6,
        Button::RightTrigger2 => 7,
        Button::Select => 8,
        Button::Start => 9,
        Button::LeftThumb => 10,
        Button::RightThumb => 11,
        Button::DPadUp => 12,
        Button::DPadDown => 13,
        Button::DPadLeft => 14,
        Button::DPadRight => 15,
        Button::Mode => 16,
        _ => return None,
    })
}

/// Standard-layout slot of a mapped gilrs stick axis.
#[must_use]
pub fn stick_slot(axis: gilrs::Axis) -> Option<usize> {
    use gilrs::Axis;
    match axis {
        Axis::LeftStickX => Some(0),
        Axis::LeftStickY => Some(1),
        Axis::RightStickX => Some(2),
        Axis::RightStickY => Some(3),
        _ => None,
    }
}

#[must_use]
pub fn device_id(id: GamepadId) -> DeviceId {
    DeviceId(CONTROLLER_ID_BASE + usize::from(id) as u32)
}

/// Owns the gilrs context. Lives on the event-loop thread.
pub struct ControllerPump {
    gilrs: Gilrs,
    hub: Arc<ControllerHub>,
    native: FxHashMap<DeviceId, GamepadId>,
    effects: FxHashMap<DeviceId, Effect>,
}

impl ControllerPump {
    /// Opens gilrs and registers the controllers already plugged in.
    /// Returns `None` when the platform has no controller support.
    pub fn new(hub: Arc<ControllerHub>) -> Option<Self> {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => gilrs,
            Err(err) => {
                log::warn!("Controllers unavailable: {err}");
                return None;
            }
        };
        log::debug!("gilrs initialized");

        let mut pump = Self {
            gilrs,
            hub,
            native: FxHashMap::default(),
            effects: FxHashMap::default(),
        };
        let connected: Vec<GamepadId> = pump
            .gilrs
            .gamepads()
            .filter(|(_, gamepad)| gamepad.is_connected())
            .map(|(id, _)| id)
            .collect();
        for id in connected {
            pump.attach(id);
        }
        Some(pump)
    }

    fn attach(&mut self, id: GamepadId) {
        let gamepad = self.gilrs.gamepad(id);
        let device = device_id(id);
        let pad = if gamepad.mapping_source() == MappingSource::None {
            PadState::joystick(device, gamepad.name())
        } else {
            let motors = if gamepad.is_ff_supported() { 2 } else { 0 };
            PadState::gamepad(device, gamepad.name(), motors)
        };
        log::info!("Controller connected: '{}' ({:?})", pad.name(), pad.kind());
        self.native.insert(device, id);
        self.hub.connect(pad);
    }

    fn detach(&mut self, id: GamepadId) {
        let device = device_id(id);
        self.native.remove(&device);
        self.effects.remove(&device);
        if self.hub.disconnect(device) {
            log::info!("Controller disconnected (id {})", device.0);
        }
    }

    /// Drains pending gilrs events into the hub, then applies rumble changes.
    pub fn pump(&mut self) {
        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::Connected => self.attach(event.id),
                EventType::Disconnected => self.detach(event.id),
                other => {
                    if let Some(pad) = self.hub.get(device_id(event.id)) {
                        apply(&pad, other);
                    }
                }
            }
        }

        for pad in self.hub.pads() {
            if let Some(speeds) = pad.take_rumble() {
                self.rumble(pad.id(), &speeds);
            }
        }
    }

    fn rumble(&mut self, device: DeviceId, speeds: &[f32]) {
        // Dropping the previous effect stops it.
        self.effects.remove(&device);
        let Some(&id) = self.native.get(&device) else {
            return;
        };
        if speeds.iter().all(|speed| *speed <= 0.0) {
            return;
        }

        let magnitude = |motor: usize| {
            let speed = speeds.get(motor).copied().unwrap_or(0.0);
            (speed * f32::from(u16::MAX)) as u16
        };
        let slice = |kind: BaseEffectType| BaseEffect {
            kind,
            scheduling: Replay {
                play_for: Ticks::from_ms(RUMBLE_SLICE_MS),
                ..Replay::default()
            },
            envelope: Envelope::default(),
        };
        let built = EffectBuilder::new()
            .add_effect(slice(BaseEffectType::Strong { magnitude: magnitude(0) }))
            .add_effect(slice(BaseEffectType::Weak { magnitude: magnitude(1) }))
            .gamepads(&[id])
            .repeat(Repeat::Infinitely)
            .finish(&mut self.gilrs);

        let played = built.and_then(|effect| {
            effect.play()?;
            Ok(effect)
        });
        match played {
            Ok(effect) => {
                self.effects.insert(device, effect);
            }
            Err(err) => log::warn!("Rumble failed on controller {}: {err}", device.0),
        }
    }
}

/// Folds one input event into `pad`.
fn apply(pad: &PadState, event: EventType) {
    let gamepad = pad.kind() == DeviceKind::Gamepad;
    match event {
        EventType::ButtonPressed(button, code) | EventType::ButtonReleased(button, code) => {
            let pressed = matches!(event, EventType::ButtonPressed(..));
            let slot = if gamepad {
                button_slot(button)
            } else {
                Some(pad.button_slot_for_code(code.into_u32()))
            };
            if let Some(slot) = slot {
                pad.set_pressed(slot, pressed);
            }
        }
        EventType::ButtonChanged(button, value, code) => {
            let slot = if gamepad {
                button_slot(button)
            } else {
                Some(pad.button_slot_for_code(code.into_u32()))
            };
            if let Some(slot) = slot {
                pad.set_button_value(slot, value);
            }
        }
        EventType::AxisChanged(axis, value, code) => match axis {
            // Mapped pads also report the D-pad as buttons.
            gilrs::Axis::DPadX if !gamepad => pad.set_hat_axis(0, Some(value), None),
            gilrs::Axis::DPadY if !gamepad => pad.set_hat_axis(0, None, Some(value)),
            _ if gamepad => {
                if let Some(slot) = stick_slot(axis) {
                    pad.set_axis(slot, value);
                }
            }
            _ => pad.set_axis(pad.axis_slot_for_code(code.into_u32()), value),
        },
        _ => {}
    }
}
