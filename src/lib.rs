#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod camera;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod mount;
mod overlay;
mod render;
mod ui;
mod upload;

thread_local! {
    static MOUNTED: RefCell<Option<mount::SceneMount>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tree-web starting");

    if let Err(e) = mount_scene(None) {
        log::error!("mount error: {:?}", e);
    }
    Ok(())
}

/// Tear down the current scene (if any) and mount a fresh one.
///
/// A `seed` makes the layout reproducible.
#[wasm_bindgen]
pub fn remount(seed: Option<u32>) -> Result<(), JsValue> {
    unmount();
    mount_scene(seed.map(u64::from)).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn unmount() {
    // take first so the drop runs outside the RefCell borrow
    let previous = MOUNTED.with(|m| m.borrow_mut().take());
    drop(previous);
}

/// Retry renderer init after a recoverable error.
#[wasm_bindgen]
pub fn retry() {
    MOUNTED.with(|m| {
        if let Some(mounted) = m.borrow().as_ref() {
            mounted.retry();
        }
    });
}

fn mount_scene(seed: Option<u64>) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Avoid grabbing a 2D context here to allow WebGPU to acquire the canvas
    let mounted = mount::SceneMount::mount(&document, canvas, seed);
    log::info!("[mount] state {:?}", mounted.state());
    MOUNTED.with(|m| *m.borrow_mut() = Some(mounted));
    Ok(())
}
