//! Input backend negotiation.
//!
//! An [`InputPlatform`] answers whether it can serve a window
//! ([`is_applicable`](InputPlatform::is_applicable)) and builds the matching
//! [`InputContext`]. Callers hand an arbitrary `&dyn Window` to
//! [`InputPlatforms::create_input`] and never name the concrete backend.

use std::sync::Arc;

use super::InputContext;
use crate::errors::{MoteurError, Result};
use crate::window::Window;

pub trait InputPlatform: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this platform can build a context for `window`.
    fn is_applicable(&self, window: &dyn Window) -> bool;

    /// Builds a context bound to `window`.
    ///
    /// Fails with [`MoteurError::BackendMismatch`] if `window` is not applicable.
    fn create_input(&self, window: &dyn Window) -> Result<Arc<dyn InputContext>>;
}

/// Ordered registry of input platforms.
#[derive(Default)]
pub struct InputPlatforms {
    platforms: Vec<Box<dyn InputPlatform>>,
}

impl InputPlatforms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing every platform compiled into the crate.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut platforms = Self::new();
        #[cfg(feature = "winit")]
        platforms.register(super::winit::WinitInputPlatform);
        platforms.register(super::embedded::EmbeddedInputPlatform);
        platforms
    }

    pub fn register(&mut self, platform: impl InputPlatform + 'static) -> &mut Self {
        self.platforms.push(Box::new(platform));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    /// First platform applicable to `window`.
    #[must_use]
    pub fn find(&self, window: &dyn Window) -> Option<&dyn InputPlatform> {
        self.platforms
            .iter()
            .map(AsRef::as_ref)
            .find(|platform| platform.is_applicable(window))
    }

    /// Builds a context with the first applicable platform.
    pub fn create_input(&self, window: &dyn Window) -> Result<Arc<dyn InputContext>> {
        let platform = self
            .find(window)
            .ok_or(MoteurError::NoApplicablePlatform(window.backend_name()))?;
        log::info!(
            "Input platform '{}' selected for '{}' window",
            platform.name(),
            window.backend_name()
        );
        platform.create_input(window)
    }
}
