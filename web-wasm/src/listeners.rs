//! Listener wiring
//!
//! Attaches one DOM listener per registry binding. Each listener feeds its
//! [`Event`] into the shared [`Page`].

use crate::dom_surface::{engage_toggle_selector, DomSurface};
use cataid_common::surface::{EXPORT_BUTTON_ID, MODE_TOGGLE_ID};
use cataid_common::{Event, EventKind, Page, Target};
use gloo::events::EventListener;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlInputElement};

pub type SharedPage = Rc<RefCell<Page<DomSurface>>>;

pub fn event_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Load => "DOMContentLoaded",
        EventKind::Change => "change",
        EventKind::Click => "click",
    }
}

fn elements_for(page: &SharedPage, target: &Target) -> Vec<Element> {
    let page = page.borrow();
    let surface = page.surface();
    let document = surface.document();
    match target {
        // the load handler runs once from `Page::initialize`
        Target::Document => Vec::new(),
        Target::Checkbox(key) => surface
            .select_all("input[type=checkbox]")
            .into_iter()
            .filter(|el| {
                el.dyn_ref::<HtmlInputElement>()
                    .map(|input| input.value() == *key)
                    .unwrap_or(false)
            })
            .collect(),
        Target::ModeToggle => document.get_element_by_id(MODE_TOGGLE_ID).into_iter().collect(),
        Target::EngageToggle(time_position) => {
            surface.select_all(&engage_toggle_selector(*time_position))
        }
        Target::ExportTrigger => document.get_element_by_id(EXPORT_BUTTON_ID).into_iter().collect(),
    }
}

/// Attaches listeners for every binding; returns how many were attached
pub fn attach(page: &SharedPage) -> usize {
    let bindings: Vec<(EventKind, Target)> = page
        .borrow()
        .registry()
        .bindings()
        .map(|(kind, target, _)| (kind, target.clone()))
        .collect();

    let mut attached = 0;
    for (kind, target) in bindings {
        for element in elements_for(page, &target) {
            let page = Rc::clone(page);
            let event = Event::new(kind, target.clone());
            EventListener::new(&element, event_name(kind), move |_| {
                // a handler that is still running owns the page
                let Ok(mut page) = page.try_borrow_mut() else {
                    gloo::console::warn!("event ignored while another handler runs");
                    return;
                };
                if let Err(e) = page.handle(&event) {
                    gloo::console::error!(format!("{:?} failed: {}", event.target, e));
                }
            })
            .forget();
            attached += 1;
        }
    }
    attached
}
