//! Retained-UI window backend.
//!
//! [`EmbeddedWindow`] wraps a [`SurfacePanel`] and the [`HostWindow`] that
//! owns it. The host toolkit drives both from its UI thread. The engine runs
//! on its own thread and reaches the UI thread only through the panel's
//! dispatcher queue, paced by [`FramePacer`](crate::window::pacing::FramePacer).
//!
//! | Engine surface    | Native source                               |
//! |-------------------|---------------------------------------------|
//! | `load_event`      | panel loaded                                |
//! | `closing_event`   | host window destroying                      |
//! | `resize_event`    | host window changed, when the size changed  |
//! | `close()`         | host window destroy                         |
//! | `focus()`         | host window show + activate                 |

pub mod devices;
pub mod host;

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use raw_window_handle::RawWindowHandle;

pub use devices::{
    ControllerLayout, ControllerMapping, NativeController, NativeKeyboard, NativeMouse, PointerArgs,
    PointerDeviceType, VirtualKey,
};
pub use host::{HostPresenter, HostWindow, HostWindowChanged, SurfacePanel};

use super::pacing::{FrameArgs, FramePacer};
use super::{Clock, FrameCallback, Size, Window, WindowOptions};
use crate::errors::{MoteurError, Result};
use crate::events::{Event, Subscription};

const BACKEND_NAME: &str = "embedded";

/// Opaque native handle supplied by the host.
#[derive(Debug, Clone, Copy)]
struct HostHandle(RawWindowHandle);

// SAFETY: the handle is an opaque identifier. It is never dereferenced here;
// the graphics collaborator uses it on the presentation thread only.
unsafe impl Send for HostHandle {}
// SAFETY: see above.
unsafe impl Sync for HostHandle {}

/// A window hosted inside another UI toolkit.
pub struct EmbeddedWindow {
    host: Arc<HostWindow>,
    panel: Arc<SurfacePanel>,
    handle: Option<HostHandle>,
    closing: Arc<AtomicBool>,
    running: bool,
    disposed: bool,
    clock: Clock,
    load: Event<()>,
    closing_event: Event<()>,
    resize: Event<Size>,
    _close_tracker: Subscription,
}

impl EmbeddedWindow {
    /// Wraps host-owned native objects. The window is initialized on return.
    ///
    /// Fails if the panel was already detached from its host.
    pub fn new(host: Arc<HostWindow>, panel: Arc<SurfacePanel>, handle: Option<RawWindowHandle>) -> Result<Self> {
        if panel.is_detached() {
            return Err(MoteurError::MissingDependency("surface panel"));
        }

        let closing = Arc::new(AtomicBool::new(host.is_destroyed()));
        let close_tracker = {
            let closing = closing.clone();
            host.destroying.connect(move |()| {
                closing.store(true, Ordering::Release);
            })
        };

        let load = Event::from_signal("embedded.load", &panel.loaded_signal, |(): &()| Some(()));
        let closing_event = Event::from_signal("embedded.closing", &host.destroying, |(): &()| Some(()));
        let resize = Event::from_signal("embedded.resize", &host.changed, |change: &host::HostWindowChanged| {
            change.did_size_change.then_some(change.size)
        });

        log::info!("Embedded window attached (host size {:?})", host.size());

        Ok(Self {
            host,
            panel,
            handle: handle.map(HostHandle),
            closing,
            running: false,
            disposed: false,
            clock: Clock::new(),
            load,
            closing_event,
            resize,
            _close_tracker: close_tracker,
        })
    }

    /// Like [`new`](Self::new), then applies `options` to the host window.
    pub fn with_options(
        host: Arc<HostWindow>,
        panel: Arc<SurfacePanel>,
        handle: Option<RawWindowHandle>,
        options: &WindowOptions,
    ) -> Result<Self> {
        let presenter = host::presenter_for(options.window_state, &host)
            .ok_or_else(|| MoteurError::unsupported("host window presenter", options.window_state))?;
        let window = Self::new(host, panel, handle)?;
        window.host.set_title(options.title.clone());
        window.host.resize(Size::from_vec2(options.size));
        window.host.set_presenter(presenter);
        Ok(window)
    }

    #[must_use]
    pub fn host(&self) -> &Arc<HostWindow> {
        &self.host
    }

    /// The panel owning the native input sources. `None` once disposed.
    #[must_use]
    pub fn panel(&self) -> Option<&Arc<SurfacePanel>> {
        (!self.disposed).then_some(&self.panel)
    }
}

impl Window for EmbeddedWindow {
    fn initialize(&mut self) -> Result<()> {
        if self.disposed {
            return Err(MoteurError::MissingDependency("surface panel"));
        }
        self.host.show();
        Ok(())
    }

    fn focus(&self) {
        self.host.show();
    }

    fn close(&self) {
        self.host.destroy();
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.handle = None;
        log::debug!("Embedded window disposed");
    }

    fn run(&mut self, on_frame: FrameCallback, frame_args: Option<FrameArgs>) -> Result<()> {
        if self.disposed {
            return Err(MoteurError::NotInitialized);
        }
        if self.running {
            return Err(MoteurError::AlreadyRunning);
        }

        let counter = frame_args.unwrap_or_default().counter;
        let pacer = FramePacer::new(self.panel.dispatcher().clone(), counter);
        let closing = self.closing.clone();

        self.running = true;
        let result = pacer.run(&on_frame, || closing.load(Ordering::Acquire));
        self.running = false;

        if let Err(err) = &result {
            log::warn!("Embedded run loop ended: {err}");
        }
        result
    }

    fn native_handle(&self) -> Option<RawWindowHandle> {
        self.handle.map(|h| h.0)
    }

    fn size(&self) -> Size {
        self.host.size()
    }

    fn set_size(&self, size: Size) {
        self.host.resize(size);
    }

    fn framebuffer_size(&self) -> Size {
        self.panel.pixel_size()
    }

    fn set_framebuffer_size(&self, size: Size) {
        let scale = self.panel.composition_scale();
        self.panel.set_actual_size(Size::from_vec2(size.as_vec2() / scale));
    }

    fn is_closing(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    fn time(&self) -> f64 {
        self.clock.now_seconds()
    }

    fn is_initialized(&self) -> bool {
        !self.disposed
    }

    fn load_event(&self) -> &Event<()> {
        &self.load
    }

    fn closing_event(&self) -> &Event<()> {
        &self.closing_event
    }

    fn resize_event(&self) -> &Event<Size> {
        &self.resize
    }

    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for EmbeddedWindow {
    fn drop(&mut self) {
        self.dispose();
    }
}
