use crate::constants::*;
use crate::dom;
use tree_core::{QualitySelector, StatusMessage, UploadStatus};
use web_sys as web;

pub fn show_status(document: &web::Document, msg: &StatusMessage) {
    if !msg.visible {
        dom::set_visible(document, STATUS_OVERLAY_ID, false);
        return;
    }
    dom::set_text(document, STATUS_TITLE_ID, msg.title);
    dom::set_text(document, STATUS_DETAIL_ID, &msg.detail);
    dom::set_visible(document, RETRY_BUTTON_ID, msg.can_retry);
    dom::set_visible(document, STATUS_OVERLAY_ID, true);
}

/// Reflect the selector's current state in the overlay.
pub fn sync(document: &web::Document, selector: &QualitySelector) {
    let msg = selector
        .state()
        .status_message(selector.attempt_count(), selector.tier());
    show_status(document, &msg);
}

#[inline]
pub fn toggle_panel(document: &web::Document) {
    let visible = dom::is_visible(document, CONTROL_PANEL_ID);
    dom::set_visible(document, CONTROL_PANEL_ID, !visible);
}

pub fn update_photo_count(document: &web::Document, count: usize) {
    dom::set_text(document, PHOTO_COUNT_ID, &format!("{} photos", count));
}

pub fn show_upload_status(document: &web::Document, status: Option<UploadStatus>) {
    match status {
        Some(s) => {
            dom::set_text(document, UPLOAD_STATUS_ID, &s.message());
            dom::set_visible(document, UPLOAD_STATUS_ID, true);
        }
        None => dom::set_visible(document, UPLOAD_STATUS_ID, false),
    }
}
