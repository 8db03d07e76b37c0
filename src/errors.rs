//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`MoteurError`] covers every failure mode of the
//! windowing, input and camera layers:
//! - Platform and backend negotiation failures
//! - Values a backend vocabulary cannot express
//! - Missing native dependencies at construction time
//! - Native windowing errors (winit, raw window handles)
//!
//! Unrecognized native values *within* a backend family never surface here:
//! they are mapped to a neutral default by the translation tables.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, MoteurError>`.
//!
//! ```rust,ignore
//! use moteur::errors::{MoteurError, Result};
//!
//! fn open() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum MoteurError {
    // ========================================================================
    // Platform & Negotiation Errors
    // ========================================================================
    /// The current platform cannot host the requested backend.
    #[error("Platform not supported: {0}")]
    PlatformNotSupported(&'static str),

    /// An input platform was asked to serve a window it does not recognize.
    #[error("Input platform '{platform}' is not applicable to window backend '{window}'")]
    BackendMismatch {
        /// Name of the input platform that rejected the window
        platform: &'static str,
        /// Backend name reported by the window
        window: &'static str,
    },

    /// No registered input platform accepts the window.
    #[error("No input platform is applicable to window backend '{0}'")]
    NoApplicablePlatform(&'static str),

    // ========================================================================
    // Contract Violations
    // ========================================================================
    /// A value was requested that the target vocabulary does not contain.
    #[error("{value} is not supported by {family}")]
    UnsupportedValue {
        /// The target vocabulary (e.g. "winit cursor mode")
        family: &'static str,
        /// Debug rendering of the rejected value
        value: String,
    },

    /// A required native object was absent at construction.
    #[error("Missing required dependency: {0}")]
    MissingDependency(&'static str),

    /// An operation needs a window that has gone through `initialize`.
    #[error("Window is not initialized")]
    NotInitialized,

    /// The window is already inside its run loop.
    #[error("Window run loop is already active")]
    AlreadyRunning,

    // ========================================================================
    // Dispatcher Errors
    // ========================================================================
    /// The presentation thread stopped draining its dispatcher queue.
    #[error("Dispatcher queue has shut down")]
    DispatcherClosed,

    /// The host clipboard could not be read or written.
    #[error("Clipboard unavailable: {0}")]
    Clipboard(&'static str),

    // ========================================================================
    // Native Windowing Errors
    // ========================================================================
    /// Window handle error.
    #[error("Window handle error: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),

    /// Event loop error (winit).
    #[cfg(feature = "winit")]
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Native window creation error (winit).
    #[cfg(feature = "winit")]
    #[error("OS error: {0}")]
    Os(#[from] winit::error::OsError),

    /// Native request rejected by the OS (winit).
    #[cfg(feature = "winit")]
    #[error("External error: {0}")]
    External(#[from] winit::error::ExternalError),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MoteurError {
    /// Builds an [`UnsupportedValue`](Self::UnsupportedValue) from any debuggable value.
    pub fn unsupported(family: &'static str, value: impl std::fmt::Debug) -> Self {
        Self::UnsupportedValue {
            family,
            value: format!("{value:?}"),
        }
    }
}

/// Alias for `Result<T, MoteurError>`.
pub type Result<T> = std::result::Result<T, MoteurError>;

/// Records a single diagnostic for an unrecoverable error and terminates the process.
pub fn fatal(err: &MoteurError) -> ! {
    log::error!("Fatal error: {err}");
    log::logger().flush();
    std::process::exit(1)
}
