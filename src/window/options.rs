//! Window creation options.
//!
//! [`WindowOptions`] is an immutable snapshot consumed once when a window is
//! created. It is the only serializable configuration surface of the crate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Title used when the host process name cannot be determined.
pub const FALLBACK_TITLE: &str = "Window Title";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowBorder {
    #[default]
    Resizable,
    Fixed,
    Hidden,
}

/// Window configuration.
///
/// # Example
///
/// ```rust,ignore
/// let options = WindowOptions::default()
///     .with_title("Viewer")
///     .with_size(Vec2::new(1920.0, 1080.0))
///     .with_border(WindowBorder::Fixed);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub visible: bool,
    /// Top-left corner in logical units.
    pub position: Vec2,
    /// Client area in logical units.
    pub size: Vec2,
    pub title: String,
    pub window_state: WindowState,
    pub window_border: WindowBorder,
    pub transparent_framebuffer: bool,
    /// Keeps the window above all others.
    pub top_most: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            visible: true,
            position: Vec2::new(50.0, 50.0),
            size: Vec2::new(1280.0, 720.0),
            title: default_title(),
            window_state: WindowState::Normal,
            window_border: WindowBorder::Resizable,
            transparent_framebuffer: false,
            top_most: false,
        }
    }
}

impl WindowOptions {
    /// Parses options from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: WindowState) -> Self {
        self.window_state = state;
        self
    }

    #[must_use]
    pub fn with_border(mut self, border: WindowBorder) -> Self {
        self.window_border = border;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_transparent_framebuffer(mut self, transparent: bool) -> Self {
        self.transparent_framebuffer = transparent;
        self
    }

    #[must_use]
    pub fn with_top_most(mut self, top_most: bool) -> Self {
        self.top_most = top_most;
        self
    }
}

/// Name of the running executable, or [`FALLBACK_TITLE`].
#[must_use]
pub fn default_title() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_owned())
}
