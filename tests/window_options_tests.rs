//! WindowOptions and Size tests
//!
//! Tests for:
//! - Default option values and the executable-derived title
//! - Builder methods
//! - JSON parsing with missing fields and invalid input
//! - Size helpers

use glam::Vec2;
use moteur::errors::MoteurError;
use moteur::window::options::{FALLBACK_TITLE, default_title};
use moteur::window::{Size, WindowBorder, WindowOptions, WindowState};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn exe_stem() -> String {
    std::env::current_exe()
        .expect("test binary path")
        .file_stem()
        .expect("file stem")
        .to_string_lossy()
        .into_owned()
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn defaults_match_documented_values() {
    let options = WindowOptions::default();
    assert!(options.visible);
    assert_eq!(options.position, Vec2::new(50.0, 50.0));
    assert_eq!(options.size, Vec2::new(1280.0, 720.0));
    assert_eq!(options.window_state, WindowState::Normal);
    assert_eq!(options.window_border, WindowBorder::Resizable);
    assert!(!options.transparent_framebuffer);
    assert!(!options.top_most);
}

#[test]
fn default_title_is_executable_name() {
    let options = WindowOptions::default();
    assert_eq!(options.title, exe_stem());
    assert_eq!(default_title(), options.title);
    assert_ne!(options.title, FALLBACK_TITLE);
}

// ============================================================================
// Builders
// ============================================================================

#[test]
fn builders_override_single_fields() {
    let options = WindowOptions::default()
        .with_title("Viewer")
        .with_size(Vec2::new(1920.0, 1080.0))
        .with_position(Vec2::new(0.0, 10.0))
        .with_state(WindowState::Maximized)
        .with_border(WindowBorder::Hidden)
        .with_visible(false)
        .with_transparent_framebuffer(true)
        .with_top_most(true);

    assert_eq!(options.title, "Viewer");
    assert_eq!(options.size, Vec2::new(1920.0, 1080.0));
    assert_eq!(options.position, Vec2::new(0.0, 10.0));
    assert_eq!(options.window_state, WindowState::Maximized);
    assert_eq!(options.window_border, WindowBorder::Hidden);
    assert!(!options.visible);
    assert!(options.transparent_framebuffer);
    assert!(options.top_most);
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn from_json_fills_missing_fields_with_defaults() -> anyhow::Result<()> {
    let options = WindowOptions::from_json(r#"{ "title": "Editor", "window_state": "Fullscreen" }"#)?;
    assert_eq!(options.title, "Editor");
    assert_eq!(options.window_state, WindowState::Fullscreen);
    assert_eq!(options.size, Vec2::new(1280.0, 720.0));
    assert!(options.visible);
    Ok(())
}

#[test]
fn from_json_empty_object_equals_default() -> anyhow::Result<()> {
    assert_eq!(WindowOptions::from_json("{}")?, WindowOptions::default());
    Ok(())
}

#[test]
fn json_round_trip_preserves_options() -> anyhow::Result<()> {
    let options = WindowOptions::default()
        .with_title("Round")
        .with_border(WindowBorder::Fixed)
        .with_size(Vec2::new(800.0, 600.0));
    let json = serde_json::to_string(&options)?;
    assert_eq!(WindowOptions::from_json(&json)?, options);
    Ok(())
}

#[test]
fn from_json_rejects_unknown_state() {
    let result = WindowOptions::from_json(r#"{ "window_state": "Floating" }"#);
    assert!(matches!(result, Err(MoteurError::Json(_))));
}

// ============================================================================
// Size
// ============================================================================

#[test]
fn size_from_vec2_rounds_and_clamps() {
    assert_eq!(Size::from_vec2(Vec2::new(799.6, 600.2)), Size::new(800, 600));
    assert_eq!(Size::from_vec2(Vec2::new(-5.0, 3.0)), Size::new(0, 3));
}

#[test]
fn size_aspect_ratio_handles_zero_height() {
    assert!(approx_eq(Size::new(1600, 900).aspect_ratio(), 16.0 / 9.0));
    assert!(approx_eq(Size::new(10, 0).aspect_ratio(), 1.0));
    assert!(Size::new(10, 0).is_empty());
    assert!(!Size::new(1, 1).is_empty());
}
