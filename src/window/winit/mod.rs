//! Immediate-mode window backend built on winit.
//!
//! [`WinitWindow`] creates its native window in [`initialize`](Window::initialize)
//! and drives the frame callback from winit's `RedrawRequested` inside
//! [`run`](Window::run). Pacing is left to the native render loop; there is no
//! lookahead bound on this backend.
//!
//! `resize_event` carries the logical size and fires only when it changed,
//! either through a resize or a scale-factor change.
//!
//! Every native window event is re-emitted on a [`NativeSignal`] so that
//! engine-level channels (window lifecycle here, keyboard and mouse in
//! `input::winit`) can subscribe lazily.
//!
//! With the `gilrs` feature the window also opens a gilrs context in
//! `initialize` and drains it once per loop iteration, feeding the
//! [`ControllerHub`] its input contexts read gamepads and joysticks from.

pub mod options;

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use super::pacing::{FrameArgs, FrameCounter};
use super::{Clock, FrameCallback, Size, Window, WindowOptions};
use crate::errors::{MoteurError, Result};
use crate::events::{Event, NativeSignal};
use crate::input::winit::controllers::ControllerHub;
#[cfg(feature = "gilrs")]
use crate::input::winit::pump::ControllerPump;

const BACKEND_NAME: &str = "winit";

/// Native signals shared between the window, its run loop and input contexts.
pub(crate) struct WinitShared {
    pub(crate) closing: AtomicBool,
    pub(crate) close_requested: AtomicBool,
    pub(crate) running: AtomicBool,
    pub(crate) loaded: Arc<NativeSignal<()>>,
    pub(crate) closing_signal: Arc<NativeSignal<()>>,
    /// Logical size, raised only when it differs from the previous one.
    pub(crate) resized: Arc<NativeSignal<Size>>,
    pub(crate) window_events: Arc<NativeSignal<WindowEvent>>,
    pub(crate) controllers: Arc<ControllerHub>,
}

impl WinitShared {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            closing: AtomicBool::new(false),
            close_requested: AtomicBool::new(false),
            running: AtomicBool::new(false),
            loaded: NativeSignal::new(),
            closing_signal: NativeSignal::new(),
            resized: NativeSignal::new(),
            window_events: NativeSignal::new(),
            controllers: ControllerHub::new(),
        })
    }

    /// Marks the window closing; raises the closing signal on the first call only.
    fn begin_closing(&self) {
        if !self.closing.swap(true, Ordering::AcqRel) {
            log::info!("Window closing");
            self.closing_signal.emit(&());
        }
    }
}

/// Native objects an input context binds to.
#[derive(Clone)]
pub struct WinitInputSource {
    pub(crate) window: Arc<winit::window::Window>,
    pub(crate) events: Arc<NativeSignal<WindowEvent>>,
    pub(crate) controllers: Arc<ControllerHub>,
}

/// A native window driven by a winit event loop.
pub struct WinitWindow {
    options: WindowOptions,
    event_loop: Option<EventLoop<()>>,
    window: Option<Arc<winit::window::Window>>,
    #[cfg(feature = "gilrs")]
    controller_pump: Option<ControllerPump>,
    shared: Arc<WinitShared>,
    clock: Clock,
    load: Event<()>,
    closing: Event<()>,
    resize: Event<Size>,
}

impl WinitWindow {
    /// Creates an uninitialized window. No native resources exist until
    /// [`initialize`](Window::initialize).
    #[must_use]
    pub fn new(options: WindowOptions) -> Self {
        let shared = WinitShared::new();

        let load = Event::from_signal("winit.load", &shared.loaded, |(): &()| Some(()));
        let closing = Event::from_signal("winit.closing", &shared.closing_signal, |(): &()| Some(()));
        let resize = Event::from_signal("winit.resize", &shared.resized, |size: &Size| Some(*size));

        Self {
            options,
            event_loop: None,
            window: None,
            #[cfg(feature = "gilrs")]
            controller_pump: None,
            shared,
            clock: Clock::new(),
            load,
            closing,
            resize,
        }
    }

    #[must_use]
    pub fn options(&self) -> &WindowOptions {
        &self.options
    }

    /// The underlying winit window, once initialized.
    #[must_use]
    pub fn winit_window(&self) -> Option<&Arc<winit::window::Window>> {
        self.window.as_ref()
    }

    /// Native sources for an input context. `None` before initialization.
    #[must_use]
    pub fn input_source(&self) -> Option<WinitInputSource> {
        self.window.as_ref().map(|window| WinitInputSource {
            window: window.clone(),
            events: self.shared.window_events.clone(),
            controllers: self.shared.controllers.clone(),
        })
    }
}

impl Window for WinitWindow {
    fn initialize(&mut self) -> Result<()> {
        if self.window.is_some() {
            return Ok(());
        }

        if cfg!(target_arch = "wasm32") {
            return Err(MoteurError::PlatformNotSupported(
                "blocking winit event loop on wasm32",
            ));
        }

        let event_loop = EventLoop::new().map_err(|err| match err {
            EventLoopError::NotSupported(_) => MoteurError::PlatformNotSupported("winit event loop"),
            other => MoteurError::from(other),
        })?;
        event_loop.set_control_flow(ControlFlow::Poll);

        #[allow(deprecated)]
        let window = event_loop.create_window(options::window_attributes(&self.options))?;
        options::apply_post_creation(&window, &self.options);

        let size = window.inner_size();
        log::info!(
            "Window created: '{}' {}x{} px",
            self.options.title,
            size.width,
            size.height
        );

        #[cfg(feature = "gilrs")]
        {
            self.controller_pump = ControllerPump::new(self.shared.controllers.clone());
        }

        self.window = Some(Arc::new(window));
        self.event_loop = Some(event_loop);
        self.clock.reset();
        Ok(())
    }

    fn focus(&self) {
        if let Some(window) = &self.window {
            window.focus_window();
        }
    }

    fn close(&self) {
        self.shared.close_requested.store(true, Ordering::Release);
        if self.shared.running.load(Ordering::Acquire) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        } else {
            self.shared.begin_closing();
        }
    }

    fn dispose(&mut self) {
        if self.window.take().is_some() {
            log::debug!("Winit window disposed");
        }
        self.event_loop = None;
        #[cfg(feature = "gilrs")]
        {
            self.controller_pump = None;
        }
    }

    fn run(&mut self, on_frame: FrameCallback, frame_args: Option<FrameArgs>) -> Result<()> {
        let Some(window) = self.window.clone() else {
            return Err(MoteurError::NotInitialized);
        };
        let event_loop = self.event_loop.take().ok_or(MoteurError::AlreadyRunning)?;

        let counter = frame_args.unwrap_or_default().counter;
        counter.reset();

        let mut runner = WinitRunner {
            size: logical_size(&window),
            window,
            shared: self.shared.clone(),
            on_frame,
            counter,
            loaded: false,
            #[cfg(feature = "gilrs")]
            controller_pump: self.controller_pump.take(),
        };

        self.shared.running.store(true, Ordering::Release);
        let result = event_loop.run_app(&mut runner);
        self.shared.running.store(false, Ordering::Release);
        self.shared.begin_closing();

        result.map_err(MoteurError::from)
    }

    fn native_handle(&self) -> Option<RawWindowHandle> {
        let window = self.window.as_ref()?;
        window.window_handle().ok().map(|handle| handle.as_raw())
    }

    fn size(&self) -> Size {
        match &self.window {
            Some(window) => logical_size(window),
            None => Size::from_vec2(self.options.size),
        }
    }

    fn set_size(&self, size: Size) {
        if let Some(window) = &self.window {
            let _ = window.request_inner_size(LogicalSize::new(size.width, size.height));
        }
    }

    fn framebuffer_size(&self) -> Size {
        match &self.window {
            Some(window) => {
                let size = window.inner_size();
                Size::new(size.width, size.height)
            }
            None => Size::from_vec2(self.options.size),
        }
    }

    fn set_framebuffer_size(&self, size: Size) {
        if let Some(window) = &self.window {
            let _ = window.request_inner_size(PhysicalSize::new(size.width, size.height));
        }
    }

    fn is_closing(&self) -> bool {
        self.shared.closing.load(Ordering::Acquire)
    }

    fn time(&self) -> f64 {
        self.clock.now_seconds()
    }

    fn is_initialized(&self) -> bool {
        self.window.is_some()
    }

    fn load_event(&self) -> &Event<()> {
        &self.load
    }

    fn closing_event(&self) -> &Event<()> {
        &self.closing
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

impl Drop for WinitWindow {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn logical_size(window: &winit::window::Window) -> Size {
    to_logical(window.inner_size(), window.scale_factor())
}

fn to_logical(physical: PhysicalSize<u32>, scale_factor: f64) -> Size {
    let logical: LogicalSize<u32> = physical.to_logical(scale_factor);
    Size::new(logical.width, logical.height)
}

/// The new logical size, if it differs from `previous`.
fn resized_to(previous: Size, physical: PhysicalSize<u32>, scale_factor: f64) -> Option<Size> {
    let size = to_logical(physical, scale_factor);
    (size != previous).then_some(size)
}

/// Event loop handler for a single [`WinitWindow`].
struct WinitRunner {
    window: Arc<winit::window::Window>,
    size: Size,
    shared: Arc<WinitShared>,
    on_frame: FrameCallback,
    counter: Arc<FrameCounter>,
    loaded: bool,
    #[cfg(feature = "gilrs")]
    controller_pump: Option<ControllerPump>,
}

impl WinitRunner {
    fn exit(&self, event_loop: &ActiveEventLoop) {
        self.shared.begin_closing();
        event_loop.exit();
    }

    fn track_size(&mut self) {
        if let Some(size) = resized_to(self.size, self.window.inner_size(), self.window.scale_factor()) {
            self.size = size;
            self.shared.resized.emit(&size);
        }
    }
}

impl ApplicationHandler for WinitRunner {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.loaded {
            self.loaded = true;
            self.shared.loaded.emit(&());
        }
        self.window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if window_id != self.window.id() {
            return;
        }

        self.shared.window_events.emit(&event);

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.exit(event_loop),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.track_size(),
            WindowEvent::RedrawRequested => {
                if self.shared.closing.load(Ordering::Acquire) {
                    return;
                }
                self.counter.mark_submitted();
                (self.on_frame)();
                self.counter.mark_executed();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.shared.close_requested.load(Ordering::Acquire) {
            self.exit(event_loop);
            return;
        }
        #[cfg(feature = "gilrs")]
        if let Some(pump) = &mut self.controller_pump {
            pump.pump();
        }
        self.window.request_redraw();
    }
}
