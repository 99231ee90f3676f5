// Browser front-end tuning constants. Scene and layout numbers live in
// `tree_core::constants`; these cover the page itself.

// Canvas the scene mounts on
pub const CANVAS_ID: &str = "app-canvas";

// Status overlay
pub const STATUS_OVERLAY_ID: &str = "status-overlay";
pub const STATUS_TITLE_ID: &str = "status-title";
pub const STATUS_DETAIL_ID: &str = "status-detail";
pub const RETRY_BUTTON_ID: &str = "retry-button";

// Control panel
pub const CONTROL_PANEL_ID: &str = "control-panel";
pub const DRIFT_TOGGLE_ID: &str = "opt-drift";
pub const PULSE_TOGGLE_ID: &str = "opt-pulse";
pub const UPLOAD_INPUT_ID: &str = "photo-upload";
pub const PHOTO_COUNT_ID: &str = "photo-count";
pub const UPLOAD_STATUS_ID: &str = "upload-status";

// Orbit drag: radians of rotation per backing-store pixel
pub const ORBIT_RADIANS_PER_PX: f32 = 0.005;
// Wheel zoom: distance factor per wheel pixel, and per-event clamp
pub const WHEEL_ZOOM_PER_PX: f32 = 0.001;
pub const WHEEL_ZOOM_FACTOR_MIN: f32 = 0.8;
pub const WHEEL_ZOOM_FACTOR_MAX: f32 = 1.25;
// Pointer travel (px) after which a press counts as a drag, not a click
pub const DRAG_THRESHOLD_PX: f32 = 4.0;

// Default photo feed: placeholder service, offset so ids avoid the first few images
pub const DEFAULT_PHOTO_COUNT: usize = 35;
pub const DEFAULT_PHOTO_SEED_OFFSET: usize = 100;
pub const PLACEHOLDER_PHOTO_BASE: &str = "https://picsum.photos/400/500?random=";

// Upload outcome text stays up this long (ms)
pub const UPLOAD_STATUS_CLEAR_MS: u32 = 3000;

// Initial instance buffer capacity; buffers grow on demand
pub const INITIAL_INSTANCE_CAPACITY: usize = 256;

pub fn default_photo_urls() -> Vec<String> {
    (0..DEFAULT_PHOTO_COUNT)
        .map(|i| format!("{}{}", PLACEHOLDER_PHOTO_BASE, i + DEFAULT_PHOTO_SEED_OFFSET))
        .collect()
}
