//! Platform-independent window abstraction.
//!
//! Defines a [`Window`] trait that decouples the engine from specific
//! windowing backends. Two backends implement it:
//!
//! - [`winit::WinitWindow`] (feature `winit`): an immediate-mode native window
//!   whose frame callback is driven by winit's redraw requests.
//! - [`embedded::EmbeddedWindow`]: a retained-UI surface panel hosted by
//!   another toolkit. Frames are enqueued on the host's dispatcher queue and
//!   throttled by the [`pacing`] lookahead.
//!
//! # Lifecycle
//!
//! constructed → [`initialize`](Window::initialize) → zero or more
//! resize/load events → [`run`](Window::run) → closing fires once →
//! [`dispose`](Window::dispose) (also run on drop).
//!
//! # Backend Access
//!
//! Input platforms negotiate with a window through [`Window::as_any`]:
//!
//! ```rust,ignore
//! if let Some(embedded) = window.as_any().downcast_ref::<EmbeddedWindow>() {
//!     // Reach the panel that owns the native input sources
//! }
//! ```

pub mod clock;
pub mod dispatcher;
pub mod embedded;
pub mod options;
pub mod pacing;
#[cfg(feature = "winit")]
pub mod winit;

use std::any::Any;
use std::sync::Arc;

use glam::Vec2;
use raw_window_handle::RawWindowHandle;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::events::Event;

pub use clock::Clock;
pub use dispatcher::{DispatcherQueue, DispatcherQueueController};
pub use options::{WindowBorder, WindowOptions, WindowState};
pub use pacing::{FrameArgs, FrameCounter, MAX_FRAMES_IN_FLIGHT};

/// Callback invoked once per frame by [`Window::run`].
pub type FrameCallback = Arc<dyn Fn() + Send + Sync>;

/// Integer window or framebuffer extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Rounds a floating-point extent, clamping negatives to zero.
    #[must_use]
    pub fn from_vec2(v: Vec2) -> Self {
        Self {
            width: v.x.max(0.0).round() as u32,
            height: v.y.max(0.0).round() as u32,
        }
    }

    #[must_use]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Width over height; 1.0 for a degenerate extent.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Platform-independent window interface.
///
/// The window is exclusively owned by whichever subsystem created it. Cameras
/// and input contexts only keep non-owning handles to what they need.
pub trait Window: Any {
    /// Creates the native resources. Calling it again is harmless.
    fn initialize(&mut self) -> Result<()>;

    /// Requests activation of the native window.
    fn focus(&self);

    /// Requests native destruction. Closing completes asynchronously.
    fn close(&self);

    /// Releases native resources. Idempotent; also run on drop.
    fn dispose(&mut self);

    /// Enters the frame loop and returns once [`is_closing`](Self::is_closing) is observed.
    ///
    /// `frame_args` lets the caller observe the frame counter used for pacing.
    fn run(&mut self, on_frame: FrameCallback, frame_args: Option<FrameArgs>) -> Result<()>;

    /// Handle of the native presentation surface, if the backend exposes one.
    fn native_handle(&self) -> Option<RawWindowHandle>;

    /// Window size in logical units. Mouse positions use the same space.
    fn size(&self) -> Size;

    fn set_size(&self, size: Size);

    /// Size of the drawable surface in pixels. May differ from [`size`](Self::size).
    fn framebuffer_size(&self) -> Size;

    fn set_framebuffer_size(&self, size: Size);

    fn is_closing(&self) -> bool;

    /// Seconds elapsed since the native resources were created.
    fn time(&self) -> f64;

    fn is_initialized(&self) -> bool;

    /// Fired once the native surface is ready to present.
    fn load_event(&self) -> &Event<()>;

    /// Fired once when the native window starts closing.
    fn closing_event(&self) -> &Event<()>;

    /// Fired when the window size actually changes. Carries logical units,
    /// like [`size`](Self::size).
    fn resize_event(&self) -> &Event<Size>;

    /// Short backend name used in diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Returns the concrete window as `Any` for capability negotiation.
    fn as_any(&self) -> &dyn Any;
}
