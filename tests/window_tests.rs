//! Embedded window lifecycle tests
//!
//! Tests for:
//! - load_event follows the panel's loaded notification, once
//! - closing_event fires exactly once however often the host is destroyed
//! - resize_event only fires when the host size actually changes

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use moteur::window::embedded::{EmbeddedWindow, HostWindow, SurfacePanel};
use moteur::window::{DispatcherQueueController, Size, Window};
use parking_lot::Mutex;

// ============================================================================
// Helpers
// ============================================================================

fn embedded_window() -> (Arc<HostWindow>, Arc<SurfacePanel>, EmbeddedWindow) {
    let controller = DispatcherQueueController::new();
    let host = HostWindow::new("lifecycle", Size::new(640, 480));
    let panel = SurfacePanel::new(controller.queue(), Size::new(640, 480));
    let window = EmbeddedWindow::new(host.clone(), panel.clone(), None).expect("panel is attached");
    (host, panel, window)
}

fn counter(event: &moteur::Event<()>) -> Arc<AtomicU32> {
    let count = Arc::new(AtomicU32::new(0));
    let hits = count.clone();
    event.subscribe(move |(): &()| {
        hits.fetch_add(1, Ordering::SeqCst);
    });
    count
}

// ============================================================================
// Load
// ============================================================================

#[test]
fn load_event_fires_when_panel_loads() {
    let (_host, panel, window) = embedded_window();
    let loads = counter(window.load_event());
    assert_eq!(loads.load(Ordering::SeqCst), 0);

    panel.notify_loaded();
    panel.notify_loaded();

    assert!(panel.is_loaded());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Closing
// ============================================================================

#[test]
fn closing_event_fires_once_on_repeated_destroy() {
    let (host, _panel, window) = embedded_window();
    let closings = counter(window.closing_event());

    host.destroy();
    host.destroy();
    window.close();

    assert!(window.is_closing());
    assert_eq!(closings.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn resize_event_is_silent_for_same_size() {
    let (host, _panel, window) = embedded_window();
    let sizes = Arc::new(Mutex::new(Vec::new()));
    {
        let sizes = sizes.clone();
        window
            .resize_event()
            .subscribe(move |size: &Size| sizes.lock().push(*size));
    }

    host.resize(Size::new(640, 480));
    host.resize(Size::new(800, 600));
    host.resize(Size::new(800, 600));

    assert_eq!(*sizes.lock(), vec![Size::new(800, 600)]);
    assert_eq!(window.size(), Size::new(800, 600));
}
