//! Browser bindings: the `SiteNav` object exported to JavaScript.
//!
//! `SiteNav` discovers the nav markup once, then routes every browser
//! callback into one shared state owner:
//! - intersection observer batches feed the ratio policy
//! - scroll events are coalesced to one distance scan per animation frame
//! - nav clicks smooth-scroll and activate their section immediately
//! - theme/header toggles, resize and header mutations update page chrome
//!
//! All closures live as long as the `SiteNav`; `detach()` (or dropping the
//! object) unregisters them.

mod chrome;
mod events;
mod scroll;
mod storage;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
    IntersectionObserver, IntersectionObserverInit, MutationObserver, MutationObserverInit,
};

use crate::config::{LocatorConfig, StrategyMode};
use crate::error::ScrollspyError;
use crate::locator::{ActiveMarker, ActiveSectionLocator, FrameThrottle};
use crate::types::NavEntry;

use storage::BrowserStore;

/// Nav link elements keyed by entry id; toggles the active class.
pub(crate) struct NavLinks {
    links: Vec<(String, HtmlElement)>,
    active_class: String,
}

impl NavLinks {
    fn element(&self, entry_id: &str) -> Option<&HtmlElement> {
        self.links
            .iter()
            .find(|(id, _)| id == entry_id)
            .map(|(_, el)| el)
    }
}

impl ActiveMarker for NavLinks {
    fn set_active(&mut self, entry: &NavEntry, active: bool) {
        let Some(link) = self.element(&entry.id) else {
            return;
        };
        link.class_list()
            .toggle_with_force(&self.active_class, active)
            .ok();
    }
}

/// State shared by every event handler.
pub(crate) struct SharedState {
    pub(crate) config: LocatorConfig,
    pub(crate) locator: ActiveSectionLocator,
    pub(crate) links: NavLinks,
    /// Resolved section elements, in document order.
    pub(crate) sections: Vec<Element>,
    pub(crate) header: Option<HtmlElement>,
    pub(crate) root: Option<HtmlElement>,
    pub(crate) theme_toggle: Option<Element>,
    pub(crate) header_toggle: Option<Element>,
    pub(crate) store: BrowserStore,
    pub(crate) throttle: FrameThrottle,
    pub(crate) frame_closure: Option<Closure<dyn FnMut(f64)>>,
    pub(crate) frame_handle: Option<i32>,
}

/// A registered DOM event listener.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

fn listen(
    target: &EventTarget,
    event: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Option<Listener> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| log::warn!("failed to listen for {event}: {e:?}"))
        .ok()?;
    Some(Listener {
        target: target.clone(),
        event,
        closure,
    })
}

fn dom_err(e: JsValue) -> ScrollspyError {
    ScrollspyError::Dom(format!("{e:?}"))
}

/// Active-section highlighting and page chrome for one document.
#[wasm_bindgen]
pub struct SiteNav {
    state: Rc<RefCell<SharedState>>,
    listeners: Vec<Listener>,
    intersection: Option<IntersectionObserver>,
    #[allow(dead_code)] // Kept alive for the observer
    intersection_closure: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
    mutation: Option<MutationObserver>,
    #[allow(dead_code)] // Kept alive for the observer
    mutation_closure: Option<Closure<dyn FnMut(Array, MutationObserver)>>,
}

#[wasm_bindgen]
impl SiteNav {
    /// Discover the nav markup. Call `attach()` to start tracking.
    ///
    /// # Errors
    /// Returns an error if `options` is invalid or there is no document.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<SiteNav, JsValue> {
        console_error_panic_hook::set_once();

        let config = LocatorConfig::from_js(&options)?;
        if let Ok(level) = config.level() {
            // Fails harmlessly when a second SiteNav is created.
            console_log::init_with_level(level).ok();
        }

        let document = web_sys::window()
            .ok_or(ScrollspyError::MissingGlobal("window"))?
            .document()
            .ok_or(ScrollspyError::MissingGlobal("document"))?;

        let (entries, links, sections) = Self::discover_nav(&document, &config)?;
        log::debug!(
            "found {} nav entries, {} sections",
            entries.len(),
            sections.len()
        );

        let header = document
            .query_selector(&config.header_selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if header.is_none() {
            log::warn!(
                "no header matches {}, header features disabled",
                config.header_selector
            );
        }
        let root = document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());

        let locator = ActiveSectionLocator::new(entries, sections.iter().map(Element::id))
            .with_config(&config);
        // Key links by the locator's ids, which are unique.
        let links = locator
            .entries()
            .iter()
            .map(|entry| entry.id.clone())
            .zip(links)
            .collect();

        let state = SharedState {
            links: NavLinks {
                links,
                active_class: config.active_class.clone(),
            },
            locator,
            sections,
            header,
            root,
            theme_toggle: document.get_element_by_id(&config.theme_toggle_id),
            header_toggle: document.get_element_by_id(&config.header_toggle_id),
            store: BrowserStore::local(),
            throttle: FrameThrottle::new(),
            frame_closure: None,
            frame_handle: None,
            config,
        };

        Ok(SiteNav {
            state: Rc::new(RefCell::new(state)),
            listeners: Vec::new(),
            intersection: None,
            intersection_closure: None,
            mutation: None,
            mutation_closure: None,
        })
    }

    /// Apply saved preferences, register all listeners and observers, and
    /// run one initial position scan. Calling it twice is a no-op.
    ///
    /// # Errors
    /// Returns an error if the intersection observer cannot be created.
    pub fn attach(&mut self) -> Result<(), JsValue> {
        if !self.listeners.is_empty() || self.intersection.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or(ScrollspyError::MissingGlobal("window"))?;

        {
            let s = &mut *self.state.borrow_mut();
            Self::init_theme(s);
            Self::restore_header(s);
            Self::update_scrolled(s);
        }

        self.listen_toggles();
        self.listen_nav_clicks();

        // Scroll: header styling + throttled position scan
        {
            let state = self.state.clone();
            self.listeners.extend(listen(&window, "scroll", true, move |_| {
                Self::handle_scroll(&state);
            }));
        }
        // Resize: header height may change with wrapping
        {
            let state = self.state.clone();
            self.listeners.extend(listen(&window, "resize", true, move |_| {
                Self::update_header_height(&state.borrow());
            }));
        }

        self.observe_sections()?;
        self.observe_header();

        Self::update_active_by_position(&mut self.state.borrow_mut());
        Ok(())
    }

    /// Unregister every listener and observer and cancel a pending frame.
    pub fn detach(&mut self) {
        for listener in self.listeners.drain(..) {
            listener
                .target
                .remove_event_listener_with_callback(
                    listener.event,
                    listener.closure.as_ref().unchecked_ref(),
                )
                .ok();
        }
        if let Some(observer) = self.intersection.take() {
            observer.disconnect();
        }
        if let Some(observer) = self.mutation.take() {
            observer.disconnect();
        }
        self.intersection_closure = None;
        self.mutation_closure = None;

        if let Ok(mut s) = self.state.try_borrow_mut() {
            if let (Some(handle), Some(window)) = (s.frame_handle.take(), web_sys::window()) {
                window.cancel_animation_frame(handle).ok();
            }
            s.throttle.complete();
        }
    }

    /// Id of the currently active section, if any.
    #[wasm_bindgen(js_name = "activeSection")]
    pub fn active_section(&self) -> Option<String> {
        self.state.borrow().locator.active().map(str::to_string)
    }

    /// Activate `section_id` immediately, as a nav click would (without
    /// scrolling). Returns `false` if no nav entry targets it.
    #[wasm_bindgen(js_name = "navigateTo")]
    pub fn navigate_to(&self, section_id: &str) -> bool {
        let s = &mut *self.state.borrow_mut();
        s.locator.navigate_to(section_id, &mut s.links)
    }

    /// Switch strategy: `"both"`, `"ratio"` or `"distance"`.
    ///
    /// # Errors
    /// Returns an error for an unknown strategy name.
    #[wasm_bindgen(js_name = "setStrategy")]
    pub fn set_strategy(&self, name: &str) -> Result<(), JsValue> {
        let mode: StrategyMode = name.parse()?;
        let mut s = self.state.borrow_mut();
        s.locator.set_mode(mode);
        s.config.strategy = mode;
        Ok(())
    }

    /// Current strategy name.
    pub fn strategy(&self) -> String {
        self.state.borrow().locator.mode().as_str().to_string()
    }

    /// Flip light/dark and persist it. Returns the new theme name.
    #[wasm_bindgen(js_name = "toggleTheme")]
    pub fn toggle_theme(&self) -> String {
        Self::toggle_theme_state(&mut self.state.borrow_mut())
            .as_str()
            .to_string()
    }

    /// Show or hide the header and persist it. Returns the new visibility.
    #[wasm_bindgen(js_name = "toggleHeader")]
    pub fn toggle_header(&self) -> bool {
        Self::toggle_header_state(&mut self.state.borrow_mut())
    }
}

impl SiteNav {
    /// Nav entries, their link elements (same order), and the distinct
    /// sections they resolve to (document order of first reference).
    #[allow(clippy::type_complexity)]
    fn discover_nav(
        document: &Document,
        config: &LocatorConfig,
    ) -> Result<(Vec<NavEntry>, Vec<HtmlElement>, Vec<Element>), ScrollspyError> {
        let nodes = document
            .query_selector_all(&config.nav_selector)
            .map_err(dom_err)?;

        let mut entries = Vec::new();
        let mut links = Vec::new();
        let mut sections: Vec<Element> = Vec::new();
        for i in 0..nodes.length() {
            let Some(link) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            let Some(href) = link.get_attribute("href") else {
                continue;
            };
            let index = usize::try_from(i).unwrap_or_default();
            let Some(entry) = NavEntry::from_href(index, Some(&link.id()), &href) else {
                log::debug!("skipping nav link {href}, not an in-page fragment");
                continue;
            };
            match document.get_element_by_id(&entry.target_section_id) {
                Some(section) => {
                    if !sections.iter().any(|s| s.id() == section.id()) {
                        sections.push(section);
                    }
                }
                None => log::warn!("nav link targets missing section #{}", entry.target_section_id),
            }
            links.push(link);
            entries.push(entry);
        }
        Ok((entries, links, sections))
    }

    fn listen_toggles(&mut self) {
        let (theme_toggle, header_toggle) = {
            let s = self.state.borrow();
            (s.theme_toggle.clone(), s.header_toggle.clone())
        };
        if let Some(toggle) = theme_toggle {
            let state = self.state.clone();
            self.listeners.extend(listen(&toggle, "click", false, move |_| {
                Self::toggle_theme_state(&mut state.borrow_mut());
            }));
        }
        if let Some(toggle) = header_toggle {
            let state = self.state.clone();
            self.listeners.extend(listen(&toggle, "click", false, move |_| {
                Self::toggle_header_state(&mut state.borrow_mut());
            }));
        }
    }

    fn listen_nav_clicks(&mut self) {
        let targets: Vec<(usize, String, HtmlElement)> = {
            let s = self.state.borrow();
            s.locator
                .entries()
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    s.links
                        .element(&entry.id)
                        .map(|el| (index, entry.target_section_id.clone(), el.clone()))
                })
                .collect()
        };
        for (index, section_id, link) in targets {
            let state = self.state.clone();
            self.listeners.extend(listen(&link, "click", false, move |event| {
                Self::handle_nav_click(&state, index, &section_id, &event);
            }));
        }
    }

    fn observe_sections(&mut self) -> Result<(), ScrollspyError> {
        let (sections, thresholds, root_margin) = {
            let s = self.state.borrow();
            (
                s.sections.clone(),
                s.config.thresholds.clone(),
                s.config.root_margin.clone(),
            )
        };
        if sections.is_empty() {
            return Ok(());
        }

        let state = self.state.clone();
        let closure = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
            Self::handle_intersections(&state, &entries);
        })
            as Box<dyn FnMut(Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_root_margin(&root_margin);
        let threshold: Array = thresholds.iter().copied().map(JsValue::from_f64).collect();
        options.set_threshold(&threshold);

        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &options)
                .map_err(dom_err)?;
        for section in &sections {
            observer.observe(section);
        }
        self.intersection = Some(observer);
        self.intersection_closure = Some(closure);
        Ok(())
    }

    fn observe_header(&mut self) {
        let Some(header) = self.state.borrow().header.clone() else {
            return;
        };
        let state = self.state.clone();
        let closure = Closure::wrap(Box::new(move |_records: Array, _observer: MutationObserver| {
            Self::update_header_height(&state.borrow());
        }) as Box<dyn FnMut(Array, MutationObserver)>);

        let observer = match MutationObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                log::warn!("header mutation observer unavailable: {e:?}");
                return;
            }
        };
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        options.set_attributes(true);
        if let Err(e) = observer.observe_with_options(&header, &options) {
            log::warn!("failed to observe header: {e:?}");
            return;
        }
        self.mutation = Some(observer);
        self.mutation_closure = Some(closure);
    }
}

impl Drop for SiteNav {
    fn drop(&mut self) {
        self.detach();
    }
}
