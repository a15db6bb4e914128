//! Click and intersection handlers for `SiteNav`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::{
    Event, IntersectionObserverEntry, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

use super::{SharedState, SiteNav};

impl SiteNav {
    /// Nav link clicked: smooth-scroll to the section, rewrite the URL
    /// fragment, and mark the clicked link (entry `index`) without waiting
    /// for scroll events.
    pub(crate) fn handle_nav_click(
        state: &Rc<RefCell<SharedState>>,
        index: usize,
        section_id: &str,
        event: &Event,
    ) {
        let window = web_sys::window();
        let target = window
            .as_ref()
            .and_then(web_sys::Window::document)
            .and_then(|d| d.get_element_by_id(section_id));

        if let Some(target) = target {
            event.prevent_default();
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);

            if let Some(window) = window {
                let fragment = format!("#{section_id}");
                let replaced = window.history().and_then(|history| {
                    history.replace_state_with_url(&JsValue::NULL, "", Some(&fragment))
                });
                if let Err(e) = replaced {
                    log::warn!("history.replaceState failed: {e:?}");
                }
            }
        }

        let s = &mut *state.borrow_mut();
        s.locator.navigate_entry(index, &mut s.links);
    }

    /// Intersection observer batch: merge ratios and re-run the ratio policy.
    pub(crate) fn handle_intersections(state: &Rc<RefCell<SharedState>>, entries: &Array) {
        let batch: Vec<(String, f64)> = entries
            .iter()
            .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
            .map(|entry| (entry.target().id(), entry.intersection_ratio()))
            .collect();
        if batch.is_empty() {
            return;
        }
        let s = &mut *state.borrow_mut();
        s.locator.apply_visibility(batch, &mut s.links);
    }
}
