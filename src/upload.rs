//! Local photo uploads: images are read as data URLs and put in front of the
//! current photo list in selection order.

use crate::constants::*;
use crate::dom::{EventListener, Timeout};
use crate::overlay;
use std::cell::RefCell;
use std::rc::Rc;
use tree_core::{PhotoFeed, UploadStatus};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Upload status line plus the timer that hides it.
struct StatusLine {
    document: web::Document,
    clear: RefCell<Option<Timeout>>,
}

impl StatusLine {
    fn show(self: &Rc<Self>, status: UploadStatus) {
        overlay::show_upload_status(&self.document, Some(status));
        // a newer status replaces any pending clear
        let clear = if status.is_final() {
            let weak = Rc::downgrade(self);
            Timeout::new(UPLOAD_STATUS_CLEAR_MS, move || {
                if let Some(line) = weak.upgrade() {
                    overlay::show_upload_status(&line.document, None);
                }
            })
        } else {
            None
        };
        *self.clear.borrow_mut() = clear;
    }
}

struct UploadBatch {
    urls: Vec<Option<String>>,
    remaining: usize,
}

struct UploadTargets {
    feed: Rc<RefCell<PhotoFeed>>,
    status: Rc<StatusLine>,
}

fn finish(batch: &RefCell<UploadBatch>, targets: &UploadTargets, slot: usize, url: Option<String>) {
    let mut b = batch.borrow_mut();
    if let Some(entry) = b.urls.get_mut(slot) {
        *entry = url;
    }
    b.remaining = b.remaining.saturating_sub(1);
    if b.remaining > 0 {
        return;
    }
    let files = b.urls.len();
    let urls: Vec<String> = b.urls.drain(..).flatten().collect();
    let added = urls.len();
    if targets.feed.borrow_mut().prepend(urls) {
        log::info!("[upload] added {} of {} photos", added, files);
    } else {
        log::warn!("[upload] no readable images in selection of {}", files);
    }
    targets.status.show(UploadStatus::finished(files, added));
}

fn read_all(files: Vec<web::File>, targets: Rc<UploadTargets>) {
    let batch = Rc::new(RefCell::new(UploadBatch {
        urls: vec![None; files.len()],
        remaining: files.len(),
    }));
    for (slot, file) in files.into_iter().enumerate() {
        let reader = match web::FileReader::new() {
            Ok(r) => r,
            Err(e) => {
                log::error!("[upload] FileReader unavailable: {:?}", e);
                finish(&batch, &targets, slot, None);
                continue;
            }
        };
        let name = file.name();
        let on_done = {
            let batch = batch.clone();
            let targets = targets.clone();
            let reader = reader.clone();
            // loadend fires after both success and failure, so this runs once
            Closure::once_into_js(move |_ev: web::ProgressEvent| {
                let url = reader.result().ok().and_then(|v| v.as_string());
                if url.is_none() {
                    log::warn!("[upload] could not read {}", name);
                }
                finish(&batch, &targets, slot, url);
            })
        };
        reader.set_onloadend(Some(on_done.unchecked_ref()));
        if let Err(e) = reader.read_as_data_url(&file) {
            log::error!("[upload] read failed: {:?}", e);
            reader.set_onloadend(None);
            finish(&batch, &targets, slot, None);
        }
    }
}

pub fn wire_upload(document: &web::Document, feed: Rc<RefCell<PhotoFeed>>) -> Option<EventListener> {
    let targets = Rc::new(UploadTargets {
        feed,
        status: Rc::new(StatusLine {
            document: document.clone(),
            clear: RefCell::new(None),
        }),
    });
    EventListener::on_id(document, UPLOAD_INPUT_ID, "change", move |ev| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(files) = input.files() else {
            return;
        };
        let images: Vec<web::File> = (0..files.length())
            .filter_map(|i| files.get(i))
            .filter(|f| f.type_().starts_with("image/"))
            .collect();
        // allow picking the same files again
        input.set_value("");
        if images.is_empty() {
            log::info!("[upload] selection had no images");
            targets.status.show(UploadStatus::Failed { files: 0 });
            return;
        }
        log::info!("[upload] reading {} files", images.len());
        targets.status.show(UploadStatus::Reading {
            files: images.len(),
        });
        read_all(images, targets.clone());
    })
}
