//! [`WindowOptions`] → winit window attributes.

use winit::dpi::{LogicalPosition, LogicalSize};
use winit::window::{Fullscreen, WindowAttributes, WindowLevel};

use crate::window::{WindowBorder, WindowOptions, WindowState};

/// Builds the creation attributes for `options`.
///
/// `WindowState::Minimized` has no creation attribute in winit; it is applied
/// after creation by [`apply_post_creation`].
#[must_use]
pub fn window_attributes(options: &WindowOptions) -> WindowAttributes {
    let level = if options.top_most {
        WindowLevel::AlwaysOnTop
    } else {
        WindowLevel::Normal
    };

    let attributes = winit::window::Window::default_attributes()
        .with_title(options.title.clone())
        .with_visible(options.visible)
        .with_inner_size(LogicalSize::new(
            f64::from(options.size.x),
            f64::from(options.size.y),
        ))
        .with_position(LogicalPosition::new(
            f64::from(options.position.x),
            f64::from(options.position.y),
        ))
        .with_transparent(options.transparent_framebuffer)
        .with_window_level(level);

    let attributes = match options.window_border {
        WindowBorder::Resizable => attributes.with_resizable(true).with_decorations(true),
        WindowBorder::Fixed => attributes.with_resizable(false).with_decorations(true),
        WindowBorder::Hidden => attributes.with_decorations(false),
    };

    match options.window_state {
        WindowState::Normal | WindowState::Minimized => attributes,
        WindowState::Maximized => attributes.with_maximized(true),
        WindowState::Fullscreen => attributes.with_fullscreen(Some(Fullscreen::Borderless(None))),
    }
}

/// Applies the parts of `options` winit only accepts on a live window.
pub fn apply_post_creation(window: &winit::window::Window, options: &WindowOptions) {
    if options.window_state == WindowState::Minimized {
        window.set_minimized(true);
    }
}
