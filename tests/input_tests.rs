// Host-side tests for pure input functions.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use glam::Vec2;
use input::*;

#[test]
fn px_to_ndc_corners() {
    assert_eq!(px_to_ndc(Vec2::new(0.0, 0.0), 800.0, 600.0), Vec2::new(-1.0, 1.0));
    assert_eq!(px_to_ndc(Vec2::new(800.0, 600.0), 800.0, 600.0), Vec2::new(1.0, -1.0));
    assert_eq!(px_to_ndc(Vec2::new(400.0, 300.0), 800.0, 600.0), Vec2::ZERO);
    // degenerate canvas does not divide by zero
    assert!(px_to_ndc(Vec2::new(1.0, 1.0), 0.0, 0.0).is_finite());
}

#[test]
fn wheel_zoom_factor_is_clamped() {
    assert!(wheel_zoom_factor(100.0, 0.001, 0.8, 1.25) > 1.0);
    assert!(wheel_zoom_factor(-100.0, 0.001, 0.8, 1.25) < 1.0);
    assert_eq!(wheel_zoom_factor(10_000.0, 0.001, 0.8, 1.25), 1.25);
    assert_eq!(wheel_zoom_factor(-10_000.0, 0.001, 0.8, 1.25), 0.8);
    assert_eq!(wheel_zoom_factor(f32::NAN, 0.001, 0.8, 1.25), 1.0);
}

#[test]
fn drag_tracks_delta_and_travel() {
    let mut drag = DragState::begin(4, Vec2::new(10.0, 10.0));
    assert!(drag.active);
    assert_eq!(drag.pointer_id, 4);
    assert_eq!(drag.update(Vec2::new(13.0, 14.0)), Vec2::new(3.0, 4.0));
    assert_eq!(drag.update(Vec2::new(13.0, 14.0)), Vec2::ZERO);
    assert!((drag.travel - 5.0).abs() < 1e-5);
}

#[test]
fn key_actions() {
    assert_eq!(action_for_key("r"), Some(KeyAction::Retry));
    assert_eq!(action_for_key("R"), Some(KeyAction::Retry));
    assert_eq!(action_for_key("h"), Some(KeyAction::TogglePanel));
    assert_eq!(action_for_key("P"), Some(KeyAction::TogglePulse));
    assert_eq!(action_for_key("d"), Some(KeyAction::ToggleDrift));
    assert_eq!(action_for_key("x"), None);
    assert_eq!(action_for_key("Enter"), None);
}
