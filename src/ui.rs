//! Control panel: one slider per [`ConfigParam`] plus the motion toggles.

use crate::constants::*;
use crate::dom::{self, EventListener};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tree_core::{ConfigParam, MotionOptions, TreeConfig};
use wasm_bindgen::JsCast;
use web_sys as web;

fn input_by_id(document: &web::Document, id: &str) -> Option<web::HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
}

fn value_label_id(param: ConfigParam) -> String {
    format!("{}-value", param.element_id())
}

fn show_value(document: &web::Document, param: ConfigParam, value: f32) {
    dom::set_text(
        document,
        &value_label_id(param),
        &format!("{}: {:.2}", param.label(), value),
    );
}

/// Push ranges and current values into the panel inputs.
pub fn init_panel(document: &web::Document, config: &TreeConfig, motion: MotionOptions) {
    for param in ConfigParam::ALL {
        let range = param.range();
        let value = config.get(param);
        if let Some(input) = input_by_id(document, param.element_id()) {
            input.set_min(&range.min.to_string());
            input.set_max(&range.max.to_string());
            input.set_step(&range.step.to_string());
            input.set_value(&value.to_string());
        }
        show_value(document, param, value);
    }
    sync_toggles(document, motion);
}

/// Reflect toggles changed from the keyboard back into the checkboxes.
pub fn sync_toggles(document: &web::Document, motion: MotionOptions) {
    if let Some(input) = input_by_id(document, DRIFT_TOGGLE_ID) {
        input.set_checked(motion.particle_drift);
    }
    if let Some(input) = input_by_id(document, PULSE_TOGGLE_ID) {
        input.set_checked(motion.particle_pulse);
    }
}

/// Wire slider and checkbox events. Listeners detach when the vector drops.
pub fn wire_panel(
    document: &web::Document,
    config: Rc<RefCell<TreeConfig>>,
    motion: Rc<Cell<MotionOptions>>,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    for param in ConfigParam::ALL {
        let config = config.clone();
        let doc = document.clone();
        let listener = EventListener::on_id(document, param.element_id(), "input", move |ev| {
            let Some(input) = ev
                .target()
                .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
            else {
                return;
            };
            let Ok(raw) = input.value().parse::<f32>() else {
                log::warn!("[ui] {} ignored non-numeric input", param.element_id());
                return;
            };
            let stored = config.borrow_mut().set(param, raw);
            show_value(&doc, param, stored);
        });
        listeners.extend(listener);
    }

    let toggles: [(&str, fn(&mut MotionOptions, bool)); 2] = [
        (DRIFT_TOGGLE_ID, |m, on| m.particle_drift = on),
        (PULSE_TOGGLE_ID, |m, on| m.particle_pulse = on),
    ];
    for (id, apply) in toggles {
        let motion = motion.clone();
        let listener = EventListener::on_id(document, id, "change", move |ev| {
            let Some(input) = ev
                .target()
                .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
            else {
                return;
            };
            let mut opts = motion.get();
            apply(&mut opts, input.checked());
            motion.set(opts);
            log::info!("[ui] motion options {:?}", opts);
        });
        listeners.extend(listener);
    }
    listeners
}
