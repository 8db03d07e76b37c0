//! Host-side native objects of the retained-UI backend.
//!
//! A host toolkit owns the real top-level window and a surface panel inside
//! it. It mirrors their state into [`HostWindow`] and [`SurfacePanel`] from
//! its UI thread; the engine observes them through [`NativeSignal`]s.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use parking_lot::Mutex;

use super::devices::{NativeController, NativeKeyboard, NativeMouse};
use crate::events::NativeSignal;
use crate::window::dispatcher::DispatcherQueue;
use crate::window::{Size, WindowState};

/// Presentation mode reported by the host.
///
/// Hosts that cannot present full screen report `supports_fullscreen = false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostPresenter {
    #[default]
    Restored,
    Minimized,
    Maximized,
    FullScreen,
}

/// Change notification raised by [`HostWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostWindowChanged {
    pub did_size_change: bool,
    pub did_presenter_change: bool,
    pub did_visibility_change: bool,
    pub size: Size,
}

/// The host toolkit's top-level window.
pub struct HostWindow {
    title: Mutex<String>,
    size: Mutex<Size>,
    presenter: Mutex<HostPresenter>,
    visible: AtomicBool,
    destroyed: AtomicBool,
    activations: AtomicU32,
    supports_fullscreen: bool,
    pub(crate) changed: Arc<NativeSignal<HostWindowChanged>>,
    pub(crate) destroying: Arc<NativeSignal<()>>,
}

impl HostWindow {
    #[must_use]
    pub fn new(title: impl Into<String>, size: Size) -> Arc<Self> {
        Self::with_capabilities(title, size, true)
    }

    #[must_use]
    pub fn with_capabilities(title: impl Into<String>, size: Size, supports_fullscreen: bool) -> Arc<Self> {
        Arc::new(Self {
            title: Mutex::new(title.into()),
            size: Mutex::new(size),
            presenter: Mutex::new(HostPresenter::Restored),
            visible: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            activations: AtomicU32::new(0),
            supports_fullscreen,
            changed: NativeSignal::new(),
            destroying: NativeSignal::new(),
        })
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.title.lock().clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.lock() = title.into();
    }

    #[must_use]
    pub fn size(&self) -> Size {
        *self.size.lock()
    }

    #[must_use]
    pub fn presenter(&self) -> HostPresenter {
        *self.presenter.lock()
    }

    #[must_use]
    pub fn supports_fullscreen(&self) -> bool {
        self.supports_fullscreen
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// How many times the window has been asked to activate.
    #[must_use]
    pub fn activation_count(&self) -> u32 {
        self.activations.load(Ordering::Relaxed)
    }

    /// Resizes the window; raises a change notification.
    pub fn resize(&self, size: Size) {
        let did_size_change = {
            let mut current = self.size.lock();
            let changed = *current != size;
            *current = size;
            changed
        };
        self.changed.emit(&HostWindowChanged {
            did_size_change,
            did_presenter_change: false,
            did_visibility_change: false,
            size,
        });
    }

    /// Shows and activates the window.
    pub fn show(&self) {
        let was_visible = self.visible.swap(true, Ordering::AcqRel);
        self.activations.fetch_add(1, Ordering::Relaxed);
        if !was_visible {
            self.changed.emit(&HostWindowChanged {
                did_size_change: false,
                did_presenter_change: false,
                did_visibility_change: true,
                size: self.size(),
            });
        }
    }

    pub fn set_presenter(&self, presenter: HostPresenter) {
        let changed = {
            let mut current = self.presenter.lock();
            let changed = *current != presenter;
            *current = presenter;
            changed
        };
        if changed {
            self.changed.emit(&HostWindowChanged {
                did_size_change: false,
                did_presenter_change: true,
                did_visibility_change: false,
                size: self.size(),
            });
        }
    }

    /// Starts destruction. `destroying` fires on the first call only.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.visible.store(false, Ordering::Release);
        self.destroying.emit(&());
    }
}

/// Maps an engine window state onto the host's presenter vocabulary.
pub fn presenter_for(state: WindowState, host: &HostWindow) -> Option<HostPresenter> {
    match state {
        WindowState::Normal => Some(HostPresenter::Restored),
        WindowState::Minimized => Some(HostPresenter::Minimized),
        WindowState::Maximized => Some(HostPresenter::Maximized),
        WindowState::Fullscreen if host.supports_fullscreen() => Some(HostPresenter::FullScreen),
        WindowState::Fullscreen => None,
    }
}

/// Notification that a controller was attached or detached.
#[derive(Clone)]
pub struct ControllerConnection {
    pub controller: Arc<NativeController>,
    pub connected: bool,
}

/// Retained-UI panel that hosts the engine's swap chain and receives input.
pub struct SurfacePanel {
    dispatcher: DispatcherQueue,
    actual_size: Mutex<Size>,
    composition_scale: Mutex<f32>,
    loaded: AtomicBool,
    detached: AtomicBool,
    cursor_shape: AtomicU32,
    clipboard: Mutex<Option<String>>,
    keyboard: Arc<NativeKeyboard>,
    mouse: Arc<NativeMouse>,
    controllers: Mutex<Vec<Arc<NativeController>>>,
    next_device_id: AtomicU32,
    pub(crate) loaded_signal: Arc<NativeSignal<()>>,
    pub(crate) controller_signal: Arc<NativeSignal<ControllerConnection>>,
}

impl SurfacePanel {
    /// Creates a panel whose UI thread drains `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: DispatcherQueue, actual_size: Size) -> Arc<Self> {
        Arc::new(Self {
            dispatcher,
            actual_size: Mutex::new(actual_size),
            composition_scale: Mutex::new(1.0),
            loaded: AtomicBool::new(false),
            detached: AtomicBool::new(false),
            cursor_shape: AtomicU32::new(0),
            clipboard: Mutex::new(None),
            keyboard: Arc::new(NativeKeyboard::new(1)),
            mouse: Arc::new(NativeMouse::new(2)),
            controllers: Mutex::new(Vec::new()),
            next_device_id: AtomicU32::new(16),
            loaded_signal: NativeSignal::new(),
            controller_signal: NativeSignal::new(),
        })
    }

    #[must_use]
    pub fn dispatcher(&self) -> &DispatcherQueue {
        &self.dispatcher
    }

    #[must_use]
    pub fn keyboard(&self) -> &Arc<NativeKeyboard> {
        &self.keyboard
    }

    #[must_use]
    pub fn mouse(&self) -> &Arc<NativeMouse> {
        &self.mouse
    }

    // ========================================================================
    // Layout
    // ========================================================================

    #[must_use]
    pub fn actual_size(&self) -> Size {
        *self.actual_size.lock()
    }

    pub fn set_actual_size(&self, size: Size) {
        *self.actual_size.lock() = size;
    }

    #[must_use]
    pub fn composition_scale(&self) -> f32 {
        *self.composition_scale.lock()
    }

    pub fn set_composition_scale(&self, scale: f32) {
        *self.composition_scale.lock() = scale.max(f32::EPSILON);
    }

    /// Pixel extent of the swap chain: layout size times composition scale.
    #[must_use]
    pub fn pixel_size(&self) -> Size {
        Size::from_vec2(self.actual_size().as_vec2() * self.composition_scale())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Called by the host once the panel is in the visual tree.
    pub fn notify_loaded(&self) {
        if !self.loaded.swap(true, Ordering::AcqRel) {
            self.loaded_signal.emit(&());
        }
    }

    /// Removes the panel from its host. Input contexts can no longer bind to it.
    pub fn detach(&self) {
        self.detached.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    // ========================================================================
    // Cursor & Clipboard
    // ========================================================================

    /// Native cursor shape code.
    #[must_use]
    pub fn cursor_shape(&self) -> u32 {
        self.cursor_shape.load(Ordering::Relaxed)
    }

    pub fn set_cursor_shape(&self, shape: u32) {
        self.cursor_shape.store(shape, Ordering::Relaxed);
    }

    /// Clipboard text as seen by the host. `None` if the host has no clipboard access.
    #[must_use]
    pub fn clipboard(&self) -> Option<String> {
        self.clipboard.lock().clone()
    }

    pub fn set_clipboard(&self, text: Option<String>) {
        *self.clipboard.lock() = text;
    }

    // ========================================================================
    // Controllers
    // ========================================================================

    /// Controllers currently attached.
    #[must_use]
    pub fn controllers(&self) -> Vec<Arc<NativeController>> {
        self.controllers.lock().clone()
    }

    /// Allocates an id for a controller about to be attached.
    #[must_use]
    pub fn allocate_device_id(&self) -> u32 {
        self.next_device_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn attach_controller(&self, controller: Arc<NativeController>) {
        controller.set_connected(true);
        self.controllers.lock().push(controller.clone());
        self.controller_signal.emit(&ControllerConnection {
            controller,
            connected: true,
        });
    }

    /// Detaches the controller with `id`. Returns whether it was attached.
    pub fn detach_controller(&self, id: u32) -> bool {
        let removed = {
            let mut controllers = self.controllers.lock();
            let index = controllers.iter().position(|c| c.id() == id);
            index.map(|index| controllers.remove(index))
        };
        let Some(controller) = removed else {
            return false;
        };
        controller.set_connected(false);
        self.controller_signal.emit(&ControllerConnection {
            controller,
            connected: false,
        });
        true
    }
}
