//! Browser smoke tests for `SiteNav`
//!
//! Run with: wasm-pack test --headless --firefox

#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use scrollspy::SiteNav;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

const MARKUP: &str = r##"
<header class="site-header">
  <button id="theme-toggle"></button>
  <button id="header-toggle"></button>
  <nav class="main-nav">
    <a class="nav-link" href="#about">About</a>
    <a class="nav-link" href="#work">Work</a>
    <a class="nav-link" href="https://example.com">Elsewhere</a>
  </nav>
</header>
<section id="about" style="height: 900px">About</section>
<section id="work" style="height: 900px">Work</section>
"##;

fn mount() -> web_sys::Document {
    let document = web_sys::window().unwrap().document().unwrap();
    document.body().unwrap().set_inner_html(MARKUP);
    document
}

fn active_links(document: &web_sys::Document) -> u32 {
    document
        .query_selector_all(".main-nav a.active")
        .unwrap()
        .length()
}

#[wasm_bindgen_test]
fn navigate_marks_single_link() {
    let document = mount();
    let mut nav = SiteNav::new(JsValue::UNDEFINED).unwrap();
    nav.attach().unwrap();

    assert!(nav.navigate_to("work"));
    assert_eq!(nav.active_section().as_deref(), Some("work"));
    assert_eq!(active_links(&document), 1);

    assert!(nav.navigate_to("about"));
    assert_eq!(active_links(&document), 1);
    assert!(!nav.navigate_to("missing"));
    nav.detach();
}

/// Resolves on the next animation frame, after callbacks queued earlier.
async fn next_frame() {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .request_animation_frame(&resolve)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
async fn scroll_updates_active_section_on_next_frame() {
    let document = mount();
    let window = web_sys::window().unwrap();
    // Room to scroll "work" to the top of the viewport.
    let spacer = document.create_element("div").unwrap();
    spacer.set_attribute("style", "height: 4000px").unwrap();
    document.body().unwrap().append_child(&spacer).unwrap();
    window.scroll_to_with_x_and_y(0.0, 0.0);

    let mut nav = SiteNav::new(JsValue::UNDEFINED).unwrap();
    nav.set_strategy("distance").unwrap();
    nav.attach().unwrap();
    // Initial pass during attach, before any scroll event.
    assert_eq!(nav.active_section().as_deref(), Some("about"));

    let work: HtmlElement = document
        .get_element_by_id("work")
        .unwrap()
        .dyn_into()
        .unwrap();
    window.scroll_to_with_x_and_y(0.0, f64::from(work.offset_top()));
    window
        .dispatch_event(&web_sys::Event::new("scroll").unwrap())
        .unwrap();
    // The scan waits for the frame.
    assert_eq!(nav.active_section().as_deref(), Some("about"));

    next_frame().await;
    assert_eq!(nav.active_section().as_deref(), Some("work"));
    assert_eq!(active_links(&document), 1);

    // The slot was released: a later scroll is scanned again.
    window.scroll_to_with_x_and_y(0.0, 0.0);
    window
        .dispatch_event(&web_sys::Event::new("scroll").unwrap())
        .unwrap();
    next_frame().await;
    assert_eq!(nav.active_section().as_deref(), Some("about"));
    nav.detach();
}

#[wasm_bindgen_test]
fn clicked_duplicate_link_is_the_one_marked() {
    let document = mount();
    let nav_el = document.query_selector(".main-nav").unwrap().unwrap();
    nav_el
        .insert_adjacent_html("beforeend", r##"<a class="nav-link" href="#about">Top</a>"##)
        .unwrap();
    let mut nav = SiteNav::new(JsValue::UNDEFINED).unwrap();
    nav.attach().unwrap();

    let links = document.query_selector_all(".main-nav a.nav-link").unwrap();
    let last: HtmlElement = links
        .get(links.length() - 1)
        .unwrap()
        .dyn_into()
        .unwrap();
    last.click();

    assert_eq!(nav.active_section().as_deref(), Some("about"));
    assert_eq!(active_links(&document), 1);
    assert!(last.class_list().contains("active"));
    nav.detach();
}

#[wasm_bindgen_test]
fn element_id_colliding_with_generated_id() {
    let document = mount();
    let first = document.query_selector(".main-nav a").unwrap().unwrap();
    first.set_id("nav-1");
    let mut nav = SiteNav::new(JsValue::UNDEFINED).unwrap();
    nav.attach().unwrap();

    let second = document
        .query_selector(".main-nav a[href='#work']")
        .unwrap()
        .unwrap();
    assert!(nav.navigate_to("work"));
    assert!(second.class_list().contains("active"));
    assert!(!first.class_list().contains("active"));
    assert!(nav.navigate_to("about"));
    assert!(first.class_list().contains("active"));
    assert_eq!(active_links(&document), 1);
    nav.detach();
}

#[wasm_bindgen_test]
fn invalid_options_are_rejected() {
    mount();
    let options = js_sys::JSON::parse(r#"{"thresholds":[3]}"#).unwrap();
    assert!(SiteNav::new(options).is_err());
}

#[wasm_bindgen_test]
fn toggles_update_chrome() {
    let document = mount();
    let mut nav = SiteNav::new(JsValue::UNDEFINED).unwrap();
    nav.attach().unwrap();

    let root = document.document_element().unwrap();
    let before = root.get_attribute("data-theme");
    let after = nav.toggle_theme();
    assert_ne!(before.as_deref(), Some(after.as_str()));

    let header = document.query_selector(".site-header").unwrap().unwrap();
    let visible = nav.toggle_header();
    assert_eq!(header.class_list().contains("hidden"), !visible);
    // Restore for other tests.
    if !visible {
        nav.toggle_header();
    }
    nav.detach();
}

#[wasm_bindgen_test]
fn strategy_can_be_switched() {
    mount();
    let nav = SiteNav::new(JsValue::UNDEFINED).unwrap();
    nav.set_strategy("ratio").unwrap();
    assert_eq!(nav.strategy(), "ratio");
    assert!(nav.set_strategy("sideways").is_err());
}
