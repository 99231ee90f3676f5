use crate::constants::*;
use crate::dom::EventListener;
use crate::input;
use std::cell::RefCell;
use std::rc::Rc;
use tree_core::OrbitCamera;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub mouse_state: Rc<RefCell<input::MouseState>>,
    pub drag_state: Rc<RefCell<input::DragState>>,
    pub orbit: Rc<RefCell<OrbitCamera>>,
}

/// Attach pointer and wheel handlers to the canvas. Hover picking itself runs
/// in the frame loop against the latest transforms; these only record state.
pub fn wire_input_handlers(w: InputWiring) -> Vec<EventListener> {
    let target: web::EventTarget = w.canvas.clone().unchecked_into();
    [
        wire_pointermove(&w, &target),
        wire_pointerdown(&w, &target),
        wire_pointerup(&w, &target, "pointerup"),
        wire_pointerup(&w, &target, "pointercancel"),
        wire_pointerleave(&w, &target),
        wire_wheel(&w, &target),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn wire_pointermove(w: &InputWiring, target: &web::EventTarget) -> Option<EventListener> {
    let w = w.clone();
    EventListener::new(target, "pointermove", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let pos = input::pointer_canvas_px(ev, &w.canvas);
        {
            let mut ms = w.mouse_state.borrow_mut();
            ms.x = pos.x;
            ms.y = pos.y;
            ms.inside = true;
        }
        let mut drag = w.drag_state.borrow_mut();
        if drag.active && drag.pointer_id == ev.pointer_id() {
            let delta = drag.update(pos);
            // dragging right swings the camera left around the tree
            w.orbit.borrow_mut().rotate(
                -delta.x * ORBIT_RADIANS_PER_PX,
                -delta.y * ORBIT_RADIANS_PER_PX,
            );
        }
    })
}

fn wire_pointerdown(w: &InputWiring, target: &web::EventTarget) -> Option<EventListener> {
    let w = w.clone();
    EventListener::new(target, "pointerdown", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        if ev.button() != 0 {
            return;
        }
        let pos = input::pointer_canvas_px(ev, &w.canvas);
        *w.drag_state.borrow_mut() = input::DragState::begin(ev.pointer_id(), pos);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    })
}

fn wire_pointerup(
    w: &InputWiring,
    target: &web::EventTarget,
    kind: &'static str,
) -> Option<EventListener> {
    let w = w.clone();
    EventListener::new(target, kind, move |ev| {
        let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
            return;
        };
        let mut drag = w.drag_state.borrow_mut();
        if drag.active && drag.pointer_id == ev.pointer_id() {
            if drag.travel < DRAG_THRESHOLD_PX {
                log::debug!("[input] click without orbit");
            }
            drag.active = false;
            _ = w.canvas.release_pointer_capture(ev.pointer_id());
        }
    })
}

fn wire_pointerleave(w: &InputWiring, target: &web::EventTarget) -> Option<EventListener> {
    let w = w.clone();
    EventListener::new(target, "pointerleave", move |_ev| {
        w.mouse_state.borrow_mut().inside = false;
    })
}

fn wire_wheel(w: &InputWiring, target: &web::EventTarget) -> Option<EventListener> {
    let w = w.clone();
    EventListener::new(target, "wheel", move |ev| {
        let Some(ev) = ev.dyn_ref::<web::WheelEvent>() else {
            return;
        };
        ev.prevent_default();
        let factor = input::wheel_zoom_factor(
            ev.delta_y() as f32,
            WHEEL_ZOOM_PER_PX,
            WHEEL_ZOOM_FACTOR_MIN,
            WHEEL_ZOOM_FACTOR_MAX,
        );
        w.orbit.borrow_mut().zoom(factor);
    })
}
