use crate::dom::EventListener;
use crate::input::{action_for_key, KeyAction};
use crate::overlay;
use crate::ui;
use std::cell::Cell;
use std::rc::Rc;
use tree_core::MotionOptions;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct KeyWiring {
    pub document: web::Document,
    pub motion: Rc<Cell<MotionOptions>>,
    pub on_retry: Rc<dyn Fn()>,
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, w: &KeyWiring) {
    if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let Some(action) = action_for_key(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::Retry => (w.on_retry)(),
        KeyAction::TogglePanel => overlay::toggle_panel(&w.document),
        KeyAction::TogglePulse | KeyAction::ToggleDrift => {
            let mut opts = w.motion.get();
            if action == KeyAction::TogglePulse {
                opts.particle_pulse = !opts.particle_pulse;
            } else {
                opts.particle_drift = !opts.particle_drift;
            }
            w.motion.set(opts);
            ui::sync_toggles(&w.document, opts);
            log::info!("[keys] motion options {:?}", opts);
        }
    }
    ev.prevent_default();
}

pub fn wire_global_keydown(w: KeyWiring) -> Option<EventListener> {
    EventListener::on_window("keydown", move |ev| {
        if let Some(ev) = ev.dyn_ref::<web::KeyboardEvent>() {
            handle_global_keydown(ev, &w);
        }
    })
}
