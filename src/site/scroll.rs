//! Scroll handling for `SiteNav`.
//!
//! Scroll events only claim the frame throttle; the distance scan itself
//! runs in the next animation frame.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use super::{SharedState, SiteNav};
use crate::chrome::{effective_header_height, is_scrolled};
use crate::types::SectionRect;

impl SiteNav {
    pub(crate) fn handle_scroll(state: &Rc<RefCell<SharedState>>) {
        Self::update_scrolled(&state.borrow());
        Self::schedule_position_frame(state);
    }

    pub(crate) fn schedule_position_frame(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let s = &mut *state.borrow_mut();
        if s.throttle.is_pending() {
            return;
        }
        if s.frame_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move |_timestamp: f64| {
                if let Some(state) = weak_state.upgrade() {
                    SiteNav::run_position_frame(&state);
                }
            }) as Box<dyn FnMut(f64)>);
            s.frame_closure = Some(closure);
        }
        let Some(callback) = s.frame_closure.as_ref() else {
            return;
        };
        // A failed request releases the throttle; the next scroll retries.
        match s
            .throttle
            .schedule(|| window.request_animation_frame(callback.as_ref().unchecked_ref()))
        {
            Some(Ok(handle)) => s.frame_handle = Some(handle),
            Some(Err(e)) => {
                log::warn!("requestAnimationFrame failed: {e:?}");
                s.frame_handle = None;
            }
            None => {}
        }
    }

    pub(crate) fn run_position_frame(state: &Rc<RefCell<SharedState>>) {
        let s = &mut *state.borrow_mut();
        s.frame_handle = None;
        s.throttle.complete();
        Self::update_active_by_position(s);
    }

    /// Measure every section and run the nearest-distance scan.
    pub(crate) fn update_active_by_position(s: &mut SharedState) {
        let header_height = Self::header_height(s);
        let rects: Vec<SectionRect> = s
            .sections
            .iter()
            .map(|section| {
                let rect = section.get_bounding_client_rect();
                SectionRect::new(section.id(), rect.top(), rect.bottom())
            })
            .collect();
        s.locator.apply_scroll(&rects, header_height, &mut s.links);
    }

    pub(crate) fn header_height(s: &SharedState) -> f64 {
        s.header.as_ref().map_or(0.0, |header| {
            let hidden = header.class_list().contains(&s.config.hidden_class);
            effective_header_height(hidden, header.offset_height())
        })
    }

    /// Toggle the scrolled class on the header.
    pub(crate) fn update_scrolled(s: &SharedState) {
        let Some(header) = s.header.as_ref() else {
            return;
        };
        let scroll_y = web_sys::window()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0);
        let scrolled = is_scrolled(scroll_y, s.config.scrolled_threshold_px);
        header
            .class_list()
            .toggle_with_force(&s.config.scrolled_class, scrolled)
            .ok();
    }
}
