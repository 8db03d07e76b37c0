//! Input for [`EmbeddedWindow`]: adapters over the host panel's devices.
//!
//! The keyboard and mouse belong to the panel and live as long as the context.
//! Controllers come and go with host attach/detach notifications; their
//! adapters are cached by native id so a listener registered on a gamepad
//! keeps firing across repeated [`InputContext::gamepads`] queries.

pub mod convert;
pub mod devices;

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use self::devices::{ControllerAdapter, EmbeddedKeyboard, EmbeddedMouse};
use super::{
    ConnectionChange, DeviceId, DeviceInfo, Gamepad, InputContext, InputDevice, InputPlatform, Joystick,
    Keyboard, Mouse,
};
use crate::errors::{MoteurError, Result};
use crate::events::{Event, Subscription};
use crate::window::Window;
use crate::window::embedded::host::ControllerConnection;
use crate::window::embedded::{EmbeddedWindow, NativeController, SurfacePanel};

const BACKEND_NAME: &str = "embedded";

/// Serves windows of type [`EmbeddedWindow`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedInputPlatform;

impl InputPlatform for EmbeddedInputPlatform {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn is_applicable(&self, window: &dyn Window) -> bool {
        window.as_any().is::<EmbeddedWindow>()
    }

    fn create_input(&self, window: &dyn Window) -> Result<Arc<dyn InputContext>> {
        let embedded = window
            .as_any()
            .downcast_ref::<EmbeddedWindow>()
            .ok_or(MoteurError::BackendMismatch {
                platform: BACKEND_NAME,
                window: window.backend_name(),
            })?;
        let panel = embedded
            .panel()
            .ok_or(MoteurError::MissingDependency("surface panel"))?;
        Ok(Arc::new(EmbeddedInputContext::new(panel.clone())?))
    }
}

type AdapterCache = Arc<Mutex<FxHashMap<u32, ControllerAdapter>>>;

pub struct EmbeddedInputContext {
    panel: Arc<SurfacePanel>,
    keyboard: Arc<EmbeddedKeyboard>,
    mouse: Arc<EmbeddedMouse>,
    adapters: AdapterCache,
    connection_changed: Event<ConnectionChange>,
    _connection_tracker: Subscription,
}

impl EmbeddedInputContext {
    /// Binds to `panel`. Fails if the panel was detached from its host.
    pub fn new(panel: Arc<SurfacePanel>) -> Result<Self> {
        if panel.is_detached() {
            return Err(MoteurError::MissingDependency("surface panel"));
        }

        let adapters: AdapterCache = Arc::new(Mutex::new(FxHashMap::default()));

        // Connected before any listener so the adapter exists (or is gone)
        // by the time `connection_changed` listeners run.
        let connection_tracker = {
            let adapters = adapters.clone();
            panel.controller_signal.connect(move |change: &ControllerConnection| {
                let id = change.controller.id();
                if change.connected {
                    log::info!("Controller connected: '{}' (id {id})", change.controller.name());
                    adapters
                        .lock()
                        .entry(id)
                        .or_insert_with(|| ControllerAdapter::new(change.controller.clone()));
                } else {
                    log::info!("Controller disconnected: '{}' (id {id})", change.controller.name());
                    adapters.lock().remove(&id);
                }
            })
        };

        let connection_changed = Event::from_signal(
            "embedded.connection_changed",
            &panel.controller_signal,
            |change: &ControllerConnection| {
                Some(ConnectionChange {
                    device: DeviceInfo {
                        id: DeviceId(change.controller.id()),
                        kind: devices::kind_of(change.controller.mapping()),
                        name: change.controller.name().to_owned(),
                    },
                    connected: change.connected,
                })
            },
        );

        Ok(Self {
            keyboard: Arc::new(EmbeddedKeyboard::new(panel.clone())),
            mouse: Arc::new(EmbeddedMouse::new(panel.clone())),
            panel,
            adapters,
            connection_changed,
            _connection_tracker: connection_tracker,
        })
    }

    fn adapter(&self, controller: &Arc<NativeController>) -> ControllerAdapter {
        self.adapters
            .lock()
            .entry(controller.id())
            .or_insert_with(|| ControllerAdapter::new(controller.clone()))
            .clone()
    }

    fn controller_adapters(&self) -> impl Iterator<Item = ControllerAdapter> + '_ {
        self.panel
            .controllers()
            .into_iter()
            .filter(|controller| controller.is_connected())
            .map(|controller| self.adapter(&controller))
    }
}

impl InputContext for EmbeddedInputContext {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn gamepads(&self) -> Vec<Arc<dyn Gamepad>> {
        self.controller_adapters()
            .filter_map(|adapter| match adapter {
                ControllerAdapter::Gamepad(gamepad) => Some(gamepad as Arc<dyn Gamepad>),
                _ => None,
            })
            .collect()
    }

    fn joysticks(&self) -> Vec<Arc<dyn Joystick>> {
        self.controller_adapters()
            .filter_map(|adapter| match adapter {
                ControllerAdapter::Joystick(joystick) => Some(joystick as Arc<dyn Joystick>),
                _ => None,
            })
            .collect()
    }

    fn keyboards(&self) -> Vec<Arc<dyn Keyboard>> {
        vec![self.keyboard.clone()]
    }

    fn mice(&self) -> Vec<Arc<dyn Mouse>> {
        vec![self.mouse.clone()]
    }

    fn other_devices(&self) -> Vec<Arc<dyn InputDevice>> {
        self.controller_adapters()
            .filter_map(|adapter| match adapter {
                ControllerAdapter::Other(device) => Some(device as Arc<dyn InputDevice>),
                _ => None,
            })
            .collect()
    }

    fn connection_changed(&self) -> &Event<ConnectionChange> {
        &self.connection_changed
    }
}

impl Drop for EmbeddedInputContext {
    fn drop(&mut self) {
        log::debug!("Embedded input context released");
    }
}
