use crate::input::px_to_ndc;
use glam::{Mat4, Vec3};
use tree_core::Camera;
use web_sys as web;

/// World-space ray through a canvas pixel for the given camera and view.
///
/// `sx`, `sy` are in the canvas' backing-store space. Returns
/// `(ray_origin, ray_direction)`.
#[inline]
pub fn screen_to_world_ray(
    canvas: &web::HtmlCanvasElement,
    sx: f32,
    sy: f32,
    camera: &Camera,
    view: Mat4,
) -> (Vec3, Vec3) {
    let ndc = px_to_ndc(
        glam::Vec2::new(sx, sy),
        canvas.width() as f32,
        canvas.height() as f32,
    );
    camera.ray_from_ndc_with_view(view, ndc.x, ndc.y)
}
