// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn web_constants_are_within_reasonable_bounds() {
    assert!(ORBIT_RADIANS_PER_PX > 0.0);
    assert!(WHEEL_ZOOM_PER_PX > 0.0);
    assert!(WHEEL_ZOOM_FACTOR_MIN > 0.0 && WHEEL_ZOOM_FACTOR_MIN < 1.0);
    assert!(WHEEL_ZOOM_FACTOR_MAX > 1.0);
    assert!(DRAG_THRESHOLD_PX >= 0.0);
    assert!(UPLOAD_STATUS_CLEAR_MS >= 1000);
    assert!(INITIAL_INSTANCE_CAPACITY.is_power_of_two());
}

#[test]
fn default_photo_feed_has_35_distinct_urls() {
    let urls = default_photo_urls();
    assert_eq!(urls.len(), DEFAULT_PHOTO_COUNT);
    assert_eq!(urls[0], format!("{}{}", PLACEHOLDER_PHOTO_BASE, DEFAULT_PHOTO_SEED_OFFSET));
    let unique: std::collections::HashSet<_> = urls.iter().collect();
    assert_eq!(unique.len(), urls.len());
}

#[test]
fn element_ids_are_unique() {
    let ids = [
        CANVAS_ID,
        STATUS_OVERLAY_ID,
        STATUS_TITLE_ID,
        STATUS_DETAIL_ID,
        RETRY_BUTTON_ID,
        CONTROL_PANEL_ID,
        DRIFT_TOGGLE_ID,
        PULSE_TOGGLE_ID,
        UPLOAD_INPUT_ID,
        PHOTO_COUNT_ID,
        UPLOAD_STATUS_ID,
    ];
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn core_constants_relationships() {
    use tree_core::*;
    assert!(ORBIT_MIN_DISTANCE < ORBIT_MAX_DISTANCE);
    assert!(CAMERA_START_EYE.length() >= ORBIT_MIN_DISTANCE);
    assert!(CAMERA_START_EYE.length() <= ORBIT_MAX_DISTANCE);
    assert!(ORBIT_MAX_POLAR > POLAR_EPSILON);
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZNEAR < CAMERA_ZFAR);
    // the star shell stays inside the far plane from any orbit position
    assert!(STAR_RADIUS + STAR_DEPTH + ORBIT_MAX_DISTANCE < CAMERA_ZFAR);
    assert!(CENTER_Y_MIN < CENTER_Y_MAX);
    assert!(HOVER_SCALE_MULTIPLIER > 1.0);
    assert!(PULSE_AMPLITUDE < 1.0);
    assert!(HEALTH_POLL_MS < INIT_TIMEOUT_MS);
    assert!(BLOOM_THRESHOLD > 0.0 && BLOOM_THRESHOLD < 1.0);
}
