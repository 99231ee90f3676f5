//! Scene lifecycle: wiring on mount, GPU init attempts with a deadline,
//! health polling, user retry, and teardown on drop.

use crate::constants::*;
use crate::dom::{self, EventListener, Interval, Timeout};
use crate::events::keyboard::{self, KeyWiring};
use crate::events::pointer::{self, InputWiring};
use crate::frame::{self, FrameContext, FrameLoop};
use crate::input::{DragState, MouseState};
use crate::overlay;
use crate::render::GpuState;
use crate::ui;
use crate::upload;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tree_core::{
    CameraShake, FrameTimer, HealthSignal, MotionOptions, OrbitCamera, PhotoFeed, QualitySelector,
    QualityState, RenderError, SceneComposer, TreeConfig, HEALTH_POLL_MS, INIT_TIMEOUT_MS,
};
use web_sys as web;

/// State reachable from async init, timers and the frame loop.
pub struct MountShared {
    pub(crate) document: web::Document,
    pub(crate) canvas: web::HtmlCanvasElement,
    pub(crate) selector: RefCell<QualitySelector>,
    pub(crate) gpu: RefCell<Option<GpuState>>,
    init_timeout: RefCell<Option<Timeout>>,
}

impl MountShared {
    /// Feed a renderer signal to the selector and update the overlay.
    pub fn signal(&self, signal: HealthSignal) {
        let changed = self.selector.borrow_mut().handle(signal);
        let Some(state) = changed else {
            return;
        };
        if !matches!(state, QualityState::Initializing { .. }) {
            self.init_timeout.borrow_mut().take();
        }
        overlay::sync(&self.document, &self.selector.borrow());
    }

    pub fn retry(self: &Rc<Self>) {
        let result = self.selector.borrow_mut().retry();
        match result {
            Ok(tier) => {
                log::info!("[mount] retrying at {} quality", tier.name());
                overlay::sync(&self.document, &self.selector.borrow());
                self.begin_attempt();
            }
            Err(e) => log::warn!("[mount] retry rejected: {}", e),
        }
    }

    /// Start GPU init for the selector's current attempt, with a deadline.
    fn begin_attempt(self: &Rc<Self>) {
        let attempt = self.selector.borrow().attempt_count();
        let timeout_ms = self.selector.borrow().init_timeout_ms();
        // release the previous context before asking for a new one
        self.gpu.borrow_mut().take();

        let weak = Rc::downgrade(self);
        *self.init_timeout.borrow_mut() = Timeout::new(timeout_ms, move || {
            if let Some(s) = weak.upgrade() {
                s.signal(HealthSignal::InitTimeout { attempt });
            }
        });

        let weak = Rc::downgrade(self);
        let canvas = self.canvas.clone();
        log::info!("[mount] renderer init attempt {}", attempt);
        wasm_bindgen_futures::spawn_local(async move {
            let result = GpuState::new(&canvas).await;
            let Some(s) = weak.upgrade() else {
                log::info!("[mount] init finished after unmount; discarding");
                return;
            };
            let current = s.selector.borrow().state();
            if current != (QualityState::Initializing { attempt }) {
                log::warn!(
                    "[mount] init attempt {} finished in {:?}; discarding",
                    attempt,
                    current
                );
                return;
            }
            match result {
                Ok(gpu) => {
                    *s.gpu.borrow_mut() = Some(gpu);
                    s.signal(HealthSignal::ContextCreated);
                }
                Err(e) => {
                    log::error!("[mount] renderer init failed: {}", e);
                    s.signal(e.signal());
                }
            }
        });
    }

    fn poll_health(&self) {
        let state = self.selector.borrow().state();
        match state {
            QualityState::Healthy(_) => {
                let lost = self
                    .gpu
                    .borrow()
                    .as_ref()
                    .map_or(false, |g| g.device_lost());
                if lost {
                    self.signal(HealthSignal::ContextLost);
                }
            }
            QualityState::Error(RenderError::ContextLost) => {
                let restored = self
                    .gpu
                    .borrow_mut()
                    .as_mut()
                    .map_or(false, |g| g.reconfigure());
                if restored {
                    self.signal(HealthSignal::ContextRestored);
                }
            }
            _ => {}
        }
    }
}

/// A mounted scene. Dropping it stops the loop and detaches every listener
/// and timer.
pub struct SceneMount {
    shared: Rc<MountShared>,
    _frame_loop: FrameLoop,
    _health: Option<Interval>,
    _listeners: Vec<EventListener>,
}

impl SceneMount {
    pub fn mount(document: &web::Document, canvas: web::HtmlCanvasElement, seed: Option<u64>) -> Self {
        dom::sync_canvas_backing_size(&canvas);
        let selector = QualitySelector::new(INIT_TIMEOUT_MS);
        let tier = selector.tier();
        let shared = Rc::new(MountShared {
            document: document.clone(),
            canvas: canvas.clone(),
            selector: RefCell::new(selector),
            gpu: RefCell::new(None),
            init_timeout: RefCell::new(None),
        });

        let config = Rc::new(RefCell::new(TreeConfig::default()));
        let motion = Rc::new(Cell::new(MotionOptions::default()));
        let feed = Rc::new(RefCell::new(PhotoFeed::new(default_photo_urls())));
        let orbit = Rc::new(RefCell::new(OrbitCamera::default()));
        let mouse = Rc::new(RefCell::new(MouseState::default()));
        let drag = Rc::new(RefCell::new(DragState::default()));
        let composer = SceneComposer::new(feed.borrow().urls(), tier, motion.get(), seed);

        ui::init_panel(document, &config.borrow(), motion.get());
        overlay::update_photo_count(document, feed.borrow().urls().len());
        overlay::sync(document, &shared.selector.borrow());

        let mut listeners = Vec::new();
        listeners.extend(ui::wire_panel(document, config.clone(), motion.clone()));
        listeners.extend(upload::wire_upload(document, feed.clone()));
        listeners.extend(pointer::wire_input_handlers(InputWiring {
            canvas: canvas.clone(),
            mouse_state: mouse.clone(),
            drag_state: drag,
            orbit: orbit.clone(),
        }));
        let retry: Rc<dyn Fn()> = {
            let weak = Rc::downgrade(&shared);
            Rc::new(move || {
                if let Some(s) = weak.upgrade() {
                    s.retry();
                }
            })
        };
        listeners.extend(keyboard::wire_global_keydown(KeyWiring {
            document: document.clone(),
            motion: motion.clone(),
            on_retry: retry.clone(),
        }));
        listeners.extend(EventListener::on_id(
            document,
            RETRY_BUTTON_ID,
            "click",
            move |_| retry(),
        ));

        let health = {
            let weak = Rc::downgrade(&shared);
            Interval::new(HEALTH_POLL_MS, move || {
                if let Some(s) = weak.upgrade() {
                    s.poll_health();
                }
            })
        };

        let frame_ctx = Rc::new(RefCell::new(FrameContext {
            shared: shared.clone(),
            canvas,
            composer,
            config,
            motion,
            feed_revision: feed.borrow().revision(),
            feed,
            orbit,
            mouse,
            shake: CameraShake::default(),
            timer: FrameTimer::new(),
            hovered: None,
        }));
        let frame_loop = frame::start_loop(frame_ctx);
        shared.begin_attempt();
        log::info!("[mount] scene mounted with {} listeners", listeners.len());

        Self {
            shared,
            _frame_loop: frame_loop,
            _health: health,
            _listeners: listeners,
        }
    }

    pub fn retry(&self) {
        self.shared.retry();
    }

    pub fn state(&self) -> QualityState {
        self.shared.selector.borrow().state()
    }
}

impl Drop for SceneMount {
    fn drop(&mut self) {
        self.shared.init_timeout.borrow_mut().take();
        self.shared.gpu.borrow_mut().take();
        log::info!("[mount] scene unmounted");
    }
}
