//! Engine Glue
//!
//! [`Engine`] ties one [`Window`], the [`InputContext`] negotiated for it and
//! an optional [`Camera`] into a frame loop. It owns no graphics state: the
//! renderer receives the native surface once through
//! [`bind_surface`](Engine::bind_surface) and the per-frame matrices through
//! the callback given to [`run`](Engine::run).
//!
//! # Lifecycle
//!
//! 1. Create with [`Engine::new`]
//! 2. [`initialize`](Engine::initialize) the window and negotiate input
//! 3. Attach a camera with [`set_camera`](Engine::set_camera)
//! 4. Hand the surface to the renderer with [`bind_surface`](Engine::bind_surface)
//! 5. [`run`](Engine::run) until the window closes
//!
//! # Example
//!
//! ```rust,ignore
//! use moteur::{Engine, FreeCamera, InputPlatforms, WindowOptions};
//! use moteur::window::winit::WinitWindow;
//!
//! let mut engine = Engine::new(Box::new(WinitWindow::new(WindowOptions::default())));
//! engine.initialize(&InputPlatforms::with_defaults())?;
//! engine.set_camera(Box::new(FreeCamera::new(Vec3::new(0.0, 0.0, -5.0))));
//! engine.run(|frame, view| {
//!     // ... draw with view.projection * view.view ...
//! })?;
//! ```

use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::Mutex;
use raw_window_handle::RawWindowHandle;

use crate::camera::Camera;
use crate::errors::{MoteurError, Result, fatal};
use crate::events::Listener;
use crate::input::{InputContext, InputPlatforms};
use crate::math;
use crate::window::{Clock, FrameArgs, FrameCallback, Size, Window};

/// Near clip plane distance of the projection.
pub const NEAR_PLANE: f32 = 2.0;

/// Far clip plane distance of the projection.
pub const FAR_PLANE: f32 = 100.0;

/// Per-frame timing information handed to the render callback.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    /// Total elapsed time in seconds since `run` started.
    pub time: f32,
    /// Time elapsed since the previous frame in seconds.
    pub dt: f32,
    /// Number of frames produced so far, including this one.
    pub frame_count: u64,
}

/// Camera matrices for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub view: Mat4,
    pub projection: Mat4,
    pub eye: Vec3,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            eye: Vec3::ZERO,
        }
    }
}

/// State shared between the engine, its resize listener and the frame callback.
struct Stage {
    camera: Option<Box<dyn Camera>>,
    viewport: Size,
    projection: Mat4,
    clock: Clock,
}

impl Stage {
    fn new() -> Self {
        Self {
            camera: None,
            viewport: Size::default(),
            projection: Mat4::IDENTITY,
            clock: Clock::new(),
        }
    }

    fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        let fov = self.camera.as_ref().map_or(crate::camera::DEFAULT_FIELD_OF_VIEW, |c| c.field_of_view());
        self.projection = math::perspective_lh(fov, viewport.aspect_ratio(), NEAR_PLANE, FAR_PLANE);
        if let Some(camera) = &mut self.camera {
            camera.resize(viewport);
        }
    }

    fn advance(&mut self) -> (FrameState, RenderView) {
        self.clock.tick();
        let state = FrameState {
            time: self.clock.elapsed().as_secs_f32(),
            dt: self.clock.dt_seconds(),
            frame_count: self.clock.frames(),
        };

        let view = match &mut self.camera {
            Some(camera) => {
                camera.update(self.clock.delta());
                RenderView {
                    view: camera.view_matrix(),
                    projection: self.projection,
                    eye: camera.position(),
                }
            }
            None => RenderView {
                projection: self.projection,
                ..RenderView::default()
            },
        };
        (state, view)
    }
}

/// Drives a window, its input context and a camera.
pub struct Engine {
    window: Box<dyn Window>,
    input: Option<Arc<dyn InputContext>>,
    stage: Arc<Mutex<Stage>>,
    resize_listener: Option<Listener<Size>>,
    surface_bound: bool,
}

impl Engine {
    /// Takes ownership of `window`. No native resources are created yet.
    #[must_use]
    pub fn new(window: Box<dyn Window>) -> Self {
        Self {
            window,
            input: None,
            stage: Arc::new(Mutex::new(Stage::new())),
            resize_listener: None,
            surface_bound: false,
        }
    }

    /// Initializes the window, then negotiates an input context through `platforms`.
    ///
    /// A window already closing is left alone. [`MoteurError::PlatformNotSupported`]
    /// is fatal. Failing to find an input platform is not: the engine runs without input.
    pub fn initialize(&mut self, platforms: &InputPlatforms) -> Result<()> {
        if self.window.is_closing() {
            log::warn!("Window is closing; skipping initialization");
            return Ok(());
        }

        match self.window.initialize() {
            Err(err @ MoteurError::PlatformNotSupported(_)) => fatal(&err),
            other => other?,
        }

        match platforms.create_input(self.window.as_ref()) {
            Ok(input) => self.input = Some(input),
            Err(err) => log::warn!("Running without input: {err}"),
        }

        if self.resize_listener.is_none() {
            let stage = self.stage.clone();
            let listener = self
                .window
                .resize_event()
                .subscribe(move |size: &Size| stage.lock().resize(*size));
            self.resize_listener = Some(listener);
        }
        // Logical units, like resize events and mouse positions.
        self.stage.lock().resize(self.window.size());

        if let Some(camera) = &mut self.stage.lock().camera {
            camera.init_input(self.input.clone());
        }

        log::info!("Engine initialized on '{}' window", self.window.backend_name());
        Ok(())
    }

    /// Replaces the active camera, binds it to the input context and sizes it to the viewport.
    pub fn set_camera(&mut self, mut camera: Box<dyn Camera>) {
        camera.init_input(self.input.clone());
        let mut stage = self.stage.lock();
        stage.camera = Some(camera);
        let viewport = stage.viewport;
        stage.resize(viewport);
    }

    /// Detaches and returns the active camera.
    pub fn take_camera(&mut self) -> Option<Box<dyn Camera>> {
        let mut camera = self.stage.lock().camera.take()?;
        camera.init_input(None);
        Some(camera)
    }

    /// Calls `f` with the native surface and its pixel size.
    ///
    /// `f` runs at most once per engine. Returns `Ok(false)` if the surface was
    /// already bound.
    pub fn bind_surface(&mut self, f: impl FnOnce(Option<RawWindowHandle>, Size)) -> Result<bool> {
        if !self.window.is_initialized() {
            return Err(MoteurError::NotInitialized);
        }
        if self.surface_bound {
            log::warn!("Surface already bound; ignoring");
            return Ok(false);
        }
        f(self.window.native_handle(), self.window.framebuffer_size());
        self.surface_bound = true;
        Ok(true)
    }

    /// Runs the frame loop until the window closes.
    ///
    /// Each frame ticks the clock, updates the camera and calls `render`.
    /// Returns immediately if the window is closing or not initialized.
    pub fn run(&mut self, render: impl Fn(&FrameState, &RenderView) + Send + Sync + 'static) -> Result<()> {
        self.run_with(render, None)
    }

    /// Like [`run`](Self::run), with access to the frame counter used for pacing.
    pub fn run_with(
        &mut self,
        render: impl Fn(&FrameState, &RenderView) + Send + Sync + 'static,
        frame_args: Option<FrameArgs>,
    ) -> Result<()> {
        if self.window.is_closing() {
            log::warn!("Window is closing; not entering the frame loop");
            return Ok(());
        }
        if !self.window.is_initialized() {
            log::warn!("Window is not initialized; not entering the frame loop");
            return Ok(());
        }

        self.stage.lock().clock.reset();
        let stage = self.stage.clone();
        let on_frame: FrameCallback = Arc::new(move || {
            let (state, view) = stage.lock().advance();
            render(&state, &view);
        });

        log::info!("Entering frame loop");
        let result = self.window.run(on_frame, frame_args);
        log::info!("Frame loop exited after {} frame(s)", self.stage.lock().clock.frames());
        result
    }

    #[must_use]
    pub fn window(&self) -> &dyn Window {
        self.window.as_ref()
    }

    pub fn window_mut(&mut self) -> &mut dyn Window {
        self.window.as_mut()
    }

    /// The negotiated input context, if any.
    #[must_use]
    pub fn input(&self) -> Option<&Arc<dyn InputContext>> {
        self.input.as_ref()
    }

    /// Projection built at the last resize.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.stage.lock().projection
    }

    /// Viewport in logical window units.
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.stage.lock().viewport
    }

    /// Runs `f` against the active camera.
    pub fn with_camera<R>(&self, f: impl FnOnce(&mut dyn Camera) -> R) -> Option<R> {
        let mut stage = self.stage.lock();
        stage.camera.as_mut().map(|camera| f(camera.as_mut()))
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(listener) = self.resize_listener.take() {
            self.window.resize_event().remove(&listener);
        }
        if let Some(camera) = &mut self.stage.lock().camera {
            camera.init_input(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::camera::{FixedCamera, FreeCamera};
    use crate::window::embedded::devices::pointer_update;
    use crate::window::embedded::PointerArgs;
    use crate::window::DispatcherQueueController;
    use crate::window::embedded::{EmbeddedWindow, HostWindow, SurfacePanel};

    fn embedded_engine(controller: &DispatcherQueueController) -> (Arc<HostWindow>, Engine) {
        let host = HostWindow::new("engine", Size::new(800, 600));
        let panel = SurfacePanel::new(controller.queue(), Size::new(800, 600));
        let window = EmbeddedWindow::new(host.clone(), panel, None).unwrap();
        (host, Engine::new(Box::new(window)))
    }

    #[test]
    fn initialize_negotiates_input_and_projection() {
        let controller = DispatcherQueueController::new();
        let (_host, mut engine) = embedded_engine(&controller);
        engine.initialize(&InputPlatforms::with_defaults()).unwrap();

        assert_eq!(engine.input().map(|i| i.backend_name()), Some("embedded"));
        assert_eq!(engine.viewport(), Size::new(800, 600));
        let expected = math::perspective_lh(crate::camera::DEFAULT_FIELD_OF_VIEW, 800.0 / 600.0, NEAR_PLANE, FAR_PLANE);
        assert!(engine.projection().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn host_resize_rebuilds_projection() {
        let controller = DispatcherQueueController::new();
        let (host, mut engine) = embedded_engine(&controller);
        engine.initialize(&InputPlatforms::with_defaults()).unwrap();
        engine.set_camera(Box::new(FixedCamera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO)));

        host.resize(Size::new(1000, 500));
        assert_eq!(engine.viewport(), Size::new(1000, 500));
        let expected = math::perspective_lh(crate::camera::DEFAULT_FIELD_OF_VIEW, 2.0, NEAR_PLANE, FAR_PLANE);
        assert!(engine.projection().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn viewport_stays_logical_on_scaled_panels() {
        let controller = DispatcherQueueController::new();
        let host = HostWindow::new("engine", Size::new(800, 600));
        let panel = SurfacePanel::new(controller.queue(), Size::new(800, 600));
        panel.set_composition_scale(2.0);
        let mouse = panel.mouse().clone();
        let window = EmbeddedWindow::new(host.clone(), panel, None).unwrap();
        let mut engine = Engine::new(Box::new(window));
        engine.initialize(&InputPlatforms::with_defaults()).unwrap();
        engine.set_camera(Box::new(FreeCamera::new(Vec3::ZERO)));

        assert_eq!(engine.viewport(), Size::new(800, 600));
        assert_eq!(engine.window().framebuffer_size(), Size::new(1600, 1200));

        mouse.move_to(PointerArgs::mouse(pointer_update::OTHER, Vec2::new(400.0, 300.0)));
        engine.stage.lock().advance();
        let forward = engine.with_camera(|camera| camera.orientation().forward()).unwrap();
        assert!(forward.abs_diff_eq(Vec3::Z, 1e-6));

        host.resize(Size::new(801, 600));
        assert_eq!(engine.viewport(), Size::new(801, 600));
    }

    #[test]
    fn bind_surface_runs_once() {
        let controller = DispatcherQueueController::new();
        let (_host, mut engine) = embedded_engine(&controller);
        let mut calls = 0;
        assert!(engine.bind_surface(|_, size| {
            assert_eq!(size, Size::new(800, 600));
            calls += 1;
        })
        .unwrap());
        assert!(!engine.bind_surface(|_, _| calls += 1).unwrap());
        assert_eq!(calls, 1);
    }

    #[test]
    fn run_on_closing_window_returns_immediately() {
        let controller = DispatcherQueueController::new();
        let (host, mut engine) = embedded_engine(&controller);
        host.destroy();
        engine.initialize(&InputPlatforms::with_defaults()).unwrap();
        assert!(engine.input().is_none());

        engine.run(|_, _| panic!("no frame expected")).unwrap();
        assert_eq!(controller.pump(), 0);
    }

    #[test]
    fn camera_receives_input_and_detaches_on_take() {
        let controller = DispatcherQueueController::new();
        let (_host, mut engine) = embedded_engine(&controller);
        engine.initialize(&InputPlatforms::with_defaults()).unwrap();
        engine.set_camera(Box::new(FixedCamera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO)));

        let position = engine.with_camera(|camera| camera.position());
        assert_eq!(position, Some(Vec3::new(0.0, 0.0, -5.0)));
        assert!(engine.take_camera().is_some());
        assert!(engine.with_camera(|camera| camera.position()).is_none());
    }
}
