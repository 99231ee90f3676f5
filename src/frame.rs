use crate::camera::screen_to_world_ray;
use crate::dom;
use crate::input;
use crate::mount::MountShared;
use crate::overlay;
use crate::render::FrameInputs;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tree_core::{
    bloom_strength, CameraShake, FrameTimer, HealthSignal, MotionOptions, OrbitCamera, PhotoFeed,
    SceneComposer, TreeConfig,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub shared: Rc<MountShared>,
    pub canvas: web::HtmlCanvasElement,
    pub composer: SceneComposer,
    pub config: Rc<RefCell<TreeConfig>>,
    pub motion: Rc<Cell<MotionOptions>>,
    pub feed: Rc<RefCell<PhotoFeed>>,
    pub orbit: Rc<RefCell<OrbitCamera>>,
    pub mouse: Rc<RefCell<input::MouseState>>,
    pub shake: CameraShake,
    pub timer: FrameTimer,
    pub feed_revision: u64,
    pub hovered: Option<u32>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let clock = self.timer.tick();
        if !self.shared.selector.borrow().is_rendering() {
            return;
        }
        self.apply_pending_changes();

        let mut gpu_slot = self.shared.gpu.borrow_mut();
        let Some(gpu) = gpu_slot.as_mut() else {
            return;
        };
        let tier = self.composer.tier();
        if gpu.needs_stars(tier) {
            gpu.upload_stars(tier, &self.composer.backdrop().stars);
        }

        dom::sync_canvas_backing_size(&self.canvas);
        let (w, h) = (self.canvas.width(), self.canvas.height());
        gpu.resize_if_needed(w, h);
        let aspect = w as f32 / h.max(1) as f32;
        let camera = self.orbit.borrow().camera(aspect);
        let config = *self.config.borrow();

        let view = self.shake.apply(camera.view_matrix(), clock.elapsed);
        self.hovered = self.pick_hover(&camera, view);
        let uniforms = self.composer.uniforms(&camera, view, clock, &config);
        self.composer.frame(clock, &config, camera.eye, self.hovered);

        let result = gpu.render(&FrameInputs {
            uniforms: &uniforms,
            batches: self.composer.batches(),
            clear_color: self.composer.backdrop().clear_color,
            bloom_strength: bloom_strength(&config),
            time: clock.elapsed,
        });
        let lost = match result {
            Ok(()) => gpu.device_lost(),
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("[frame] surface timeout; skipping frame");
                false
            }
            Err(e) => {
                log::warn!("[frame] surface error: {:?}", e);
                true
            }
        };
        drop(gpu_slot);
        if lost {
            self.shared.signal(HealthSignal::ContextLost);
        }
    }

    /// Bring the composer in line with tier, photo list and toggles.
    fn apply_pending_changes(&mut self) {
        let tier = self.shared.selector.borrow().tier();
        self.composer.set_tier(tier);
        self.composer.set_motion_options(self.motion.get());

        let feed = self.feed.borrow();
        if feed.revision() != self.feed_revision {
            self.feed_revision = feed.revision();
            self.composer.set_photos(feed.urls());
            if let Some(doc) = dom::window_document() {
                overlay::update_photo_count(&doc, feed.urls().len());
            }
        }
    }

    fn pick_hover(&self, camera: &tree_core::Camera, view: glam::Mat4) -> Option<u32> {
        let ms = *self.mouse.borrow();
        if !ms.inside {
            return None;
        }
        let (ro, rd) = screen_to_world_ray(&self.canvas, ms.x, ms.y, camera, view);
        self.composer.pick_photo(ro, rd)
    }
}

/// Running requestAnimationFrame loop; cancelled on drop.
pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> FrameLoop {
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let handle_clone = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        handle_clone.set(None);
        frame_ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            handle_clone.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        handle.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
    FrameLoop { handle, tick }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(w), Some(id)) = (web::window(), self.handle.take()) {
            _ = w.cancel_animation_frame(id);
        }
        // breaks the closure -> tick cycle
        self.tick.borrow_mut().take();
        log::info!("[frame] loop stopped");
    }
}
