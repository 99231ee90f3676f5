use glam::Vec2;
use web_sys as web;

#[derive(Default, Clone, Copy, Debug)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    /// Pointer is over the canvas; hover picking is skipped otherwise.
    pub inside: bool,
}

#[derive(Default, Clone, Copy, Debug)]
pub struct DragState {
    pub active: bool,
    pub pointer_id: i32,
    pub last_x: f32,
    pub last_y: f32,
    /// Total travel since the press, in backing-store pixels.
    pub travel: f32,
}

impl DragState {
    pub fn begin(pointer_id: i32, px: Vec2) -> Self {
        Self {
            active: true,
            pointer_id,
            last_x: px.x,
            last_y: px.y,
            travel: 0.0,
        }
    }

    /// Record a move and return the delta since the previous one.
    pub fn update(&mut self, px: Vec2) -> Vec2 {
        let delta = Vec2::new(px.x - self.last_x, px.y - self.last_y);
        self.last_x = px.x;
        self.last_y = px.y;
        self.travel += delta.length();
        delta
    }
}

#[inline]
pub fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let w = (rect.width() as f32).max(1.0);
    let h = (rect.height() as f32).max(1.0);
    let sx = (x_css / w) * canvas.width() as f32;
    let sy = (y_css / h) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

/// Backing-store pixel to normalized device coordinates (+Y up).
#[inline]
pub fn px_to_ndc(px: Vec2, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((2.0 * px.x / w) - 1.0, 1.0 - (2.0 * px.y / h))
}

/// Distance multiplier for one wheel event; positive `delta_y` zooms out.
#[inline]
pub fn wheel_zoom_factor(delta_y: f32, per_px: f32, min: f32, max: f32) -> f32 {
    if !delta_y.is_finite() {
        return 1.0;
    }
    (1.0 + delta_y * per_px).clamp(min, max)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Retry,
    TogglePanel,
    TogglePulse,
    ToggleDrift,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "r" | "R" => Some(KeyAction::Retry),
        "h" | "H" => Some(KeyAction::TogglePanel),
        "p" | "P" => Some(KeyAction::TogglePulse),
        "d" | "D" => Some(KeyAction::ToggleDrift),
        _ => None,
    }
}
