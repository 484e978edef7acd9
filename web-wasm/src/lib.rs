//! Cataid page logic (WASM)
//!
//! Loaded by a rendered visaid/cataid page. Filters rows by the scene
//! checkboxes, switches between view and catalog mode and exports the
//! engaged catalog edits as a JSON download.

mod dom_surface;
mod export;
mod listeners;

use cataid_common::{truncate_iso_timestamp, Page, PageConfig};
use dom_surface::DomSurface;
use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Export timestamp from the browser clock
fn browser_export_date() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    truncate_iso_timestamp(&iso)
}

fn boot() -> Result<(), JsValue> {
    let document = gloo::utils::document();
    let marker = document
        .body()
        .and_then(|body| body.get_attribute("data-cataid-variant"));
    let config = PageConfig::from_marker(marker.as_deref())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let surface = DomSurface::new(document, config.clone());
    let mut page = Page::new(surface, config).with_clock(browser_export_date);
    let summary = page.initialize();

    let page = Rc::new(RefCell::new(page));
    let attached = listeners::attach(&page);
    gloo::console::debug!(format!(
        "cataid ready: {} rows shown, {} hidden, {} listeners",
        summary.shown, summary.hidden, attached
    ));
    Ok(())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = gloo::utils::document();
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| {
            if let Err(e) = boot() {
                gloo::console::error!(e);
            }
        })
        .forget();
        Ok(())
    } else {
        boot()
    }
}
