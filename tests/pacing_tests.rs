//! Frame pacing tests
//!
//! Tests for:
//! - Submitted/executed gap never exceeds MAX_FRAMES_IN_FLIGHT with a slow drainer
//! - EmbeddedWindow::run exits once the host window is destroyed
//! - A shut-down dispatcher ends the run loop with DispatcherClosed
//! - Counter reset at loop entry

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use moteur::errors::MoteurError;
use moteur::window::embedded::{EmbeddedWindow, HostWindow, SurfacePanel};
use moteur::window::pacing::{FramePacer, PaceStep};
use moteur::window::{
    DispatcherQueueController, FrameArgs, FrameCallback, FrameCounter, MAX_FRAMES_IN_FLIGHT, Size, Window,
};

// ============================================================================
// Helper
// ============================================================================

/// Drains `controller` on its own thread, sleeping before each job.
fn spawn_slow_drainer(
    controller: DispatcherQueueController,
    delay: Duration,
    stop: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while !stop.load(Ordering::Acquire) {
            thread::sleep(delay);
            controller.pump_one();
        }
        controller.shutdown();
    })
}

fn embedded_window(controller: &DispatcherQueueController) -> (Arc<HostWindow>, EmbeddedWindow) {
    let host = HostWindow::new("pacing", Size::new(640, 480));
    let panel = SurfacePanel::new(controller.queue(), Size::new(640, 480));
    let window = EmbeddedWindow::new(host.clone(), panel, None).expect("panel is attached");
    (host, window)
}

// ============================================================================
// FramePacer
// ============================================================================

#[test]
fn gap_stays_within_lookahead_with_slow_drainer() {
    let controller = DispatcherQueueController::new();
    let queue = controller.queue();
    let stop = Arc::new(AtomicBool::new(false));
    let drainer = spawn_slow_drainer(controller, Duration::from_millis(1), stop.clone());

    let pacer = FramePacer::new(queue, FrameCounter::new());
    let on_frame: FrameCallback = Arc::new(|| {});
    let mut max_gap = 0;
    let mut throttled = 0;

    while pacer.counter().executed() < 40 {
        if pacer.step(&on_frame).expect("queue open") == PaceStep::Throttled {
            throttled += 1;
            thread::yield_now();
        }
        max_gap = max_gap.max(pacer.counter().in_flight());
    }

    stop.store(true, Ordering::Release);
    drainer.join().expect("drainer thread");

    assert!(max_gap <= MAX_FRAMES_IN_FLIGHT, "gap reached {max_gap}");
    assert!(throttled > 0, "producer never outran the drainer");
}

#[test]
fn pacer_resets_counter_on_creation() {
    let controller = DispatcherQueueController::new();
    let counter = FrameCounter::new();
    counter.mark_submitted();
    counter.mark_submitted();
    counter.mark_executed();

    let _pacer = FramePacer::new(controller.queue(), counter.clone());
    assert_eq!(counter.submitted(), 0);
    assert_eq!(counter.executed(), 0);
}

// ============================================================================
// EmbeddedWindow::run
// ============================================================================

#[test]
fn embedded_run_exits_when_host_is_destroyed() {
    let controller = DispatcherQueueController::new();
    let (host, mut window) = embedded_window(&controller);
    let stop = Arc::new(AtomicBool::new(false));
    let drainer = spawn_slow_drainer(controller, Duration::from_micros(500), stop.clone());

    let counter = FrameCounter::new();
    let frames = Arc::new(AtomicU64::new(0));
    let max_gap = Arc::new(AtomicU64::new(0));
    let on_frame: FrameCallback = {
        let frames = frames.clone();
        let max_gap = max_gap.clone();
        let counter = counter.clone();
        Arc::new(move || {
            max_gap.fetch_max(counter.in_flight(), Ordering::SeqCst);
            if frames.fetch_add(1, Ordering::SeqCst) + 1 == 25 {
                host.destroy();
            }
        })
    };

    window
        .run(on_frame, Some(FrameArgs::new(counter.clone())))
        .expect("run loop");
    assert!(window.is_closing());

    stop.store(true, Ordering::Release);
    drainer.join().expect("drainer thread");

    assert!(frames.load(Ordering::SeqCst) >= 25);
    assert!(max_gap.load(Ordering::SeqCst) <= MAX_FRAMES_IN_FLIGHT);
    assert!(counter.submitted() >= counter.executed());
}

#[test]
fn embedded_run_reports_closed_dispatcher() {
    let controller = DispatcherQueueController::new();
    let (_host, mut window) = embedded_window(&controller);
    controller.shutdown();

    let result = window.run(Arc::new(|| {}), None);
    assert!(matches!(result, Err(MoteurError::DispatcherClosed)));
}

#[test]
fn embedded_run_on_closing_window_returns_immediately() {
    let controller = DispatcherQueueController::new();
    let (host, mut window) = embedded_window(&controller);
    host.destroy();

    let counter = FrameCounter::new();
    window
        .run(Arc::new(|| {}), Some(FrameArgs::new(counter.clone())))
        .expect("run loop");
    assert_eq!(counter.submitted(), 0);
}
