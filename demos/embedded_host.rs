//! Drives the engine inside a simulated host toolkit.
//!
//! The main thread plays the host UI thread: it owns the dispatcher, feeds
//! input into the panel and finally destroys the host window. The engine runs
//! on its own thread and orbits the origin while W is held.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec3;

use moteur::camera::ArcCamera;
use moteur::input::InputPlatforms;
use moteur::window::embedded::{
    ControllerLayout, ControllerMapping, EmbeddedWindow, HostWindow, NativeController, SurfacePanel, VirtualKey,
};
use moteur::window::{DispatcherQueueController, Size};
use moteur::{Engine, logging};

const POLL: Duration = Duration::from_millis(2);

fn main() -> anyhow::Result<()> {
    logging::init();

    let dispatcher = DispatcherQueueController::new();
    let host = HostWindow::new("Embedded Host", Size::new(1024, 768));
    let panel = SurfacePanel::new(dispatcher.queue(), Size::new(1024, 768));
    panel.set_composition_scale(1.5);
    panel.set_clipboard(Some(String::new()));

    let engine_done = Arc::new(AtomicBool::new(false));
    let engine_thread = {
        let host = host.clone();
        let panel = panel.clone();
        let engine_done = engine_done.clone();
        thread::spawn(move || -> moteur::Result<()> {
            let window = EmbeddedWindow::new(host, panel, None)?;
            let mut engine = Engine::new(Box::new(window));
            engine.initialize(&InputPlatforms::with_defaults())?;
            engine.set_camera(Box::new(ArcCamera::new(Vec3::new(0.0, 2.0, -8.0), Vec3::ZERO)));

            if let Some(input) = engine.input() {
                input.connection_changed().subscribe(|change| {
                    log::info!(
                        "{:?} '{}' {}",
                        change.device.kind,
                        change.device.name,
                        if change.connected { "connected" } else { "disconnected" }
                    );
                });
            }

            let result = engine.run(|frame, view| {
                if frame.frame_count % 60 == 0 {
                    log::info!("frame {} eye {}", frame.frame_count, view.eye);
                }
            });
            engine_done.store(true, Ordering::Release);
            result
        })
    };

    // === Host UI thread ===
    panel.notify_loaded();
    let started = Instant::now();
    let pad = NativeController::new(
        panel.allocate_device_id(),
        "Standard Gamepad",
        ControllerMapping::Standard,
        ControllerLayout {
            buttons: 17,
            axes: 4,
            hats: 0,
            motors: 2,
        },
    );

    dispatcher.run_until(POLL, || started.elapsed() >= Duration::from_millis(300));
    panel.keyboard().press(VirtualKey::W, 0x11);
    panel.attach_controller(pad.clone());
    dispatcher.run_until(POLL, || started.elapsed() >= Duration::from_secs(1));
    panel.keyboard().release(VirtualKey::W, 0x11);
    panel.detach_controller(pad.id());
    host.resize(Size::new(1280, 720));
    dispatcher.run_until(POLL, || started.elapsed() >= Duration::from_millis(1500));

    host.destroy();
    dispatcher.run_until(POLL, || engine_done.load(Ordering::Acquire));
    dispatcher.shutdown();

    match engine_thread.join() {
        Ok(result) => result?,
        Err(_) => anyhow::bail!("engine thread panicked"),
    }
    Ok(())
}
