use glam::{Vec2, Vec3};

use moteur::camera::FreeCamera;
use moteur::input::InputPlatforms;
use moteur::window::winit::WinitWindow;
use moteur::{Engine, WindowOptions, logging};

fn main() -> anyhow::Result<()> {
    logging::init();

    // === 1. Window ===
    let options = WindowOptions::default()
        .with_title("Free Fly")
        .with_size(Vec2::new(1280.0, 720.0));
    let mut engine = Engine::new(Box::new(WinitWindow::new(options)));
    engine.initialize(&InputPlatforms::with_defaults())?;

    // === 2. Camera: WASD to move, mouse toward an edge to turn ===
    let mut camera = FreeCamera::new(Vec3::new(0.0, 1.0, -10.0));
    camera.move_speed = 5.0;
    engine.set_camera(Box::new(camera));

    // === 3. Hand the surface to a renderer ===
    engine.bind_surface(|handle, size| {
        log::info!("Surface {handle:?} at {}x{}", size.width, size.height);
    })?;

    // === 4. Frame loop ===
    engine.run(|frame, view| {
        if frame.frame_count % 120 == 0 {
            log::info!(
                "frame {} at {:.1}s, eye {}",
                frame.frame_count,
                frame.time,
                view.eye
            );
        }
    })?;
    Ok(())
}
