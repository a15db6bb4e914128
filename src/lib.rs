//! scrollspy - active-section navigation for single-page sites
//!
//! Highlights the nav link of the section the reader is looking at, using
//! WebAssembly in the browser:
//! - Intersection-ratio and nearest-to-header strategies behind one trait
//! - Scroll scans coalesced to one per animation frame
//! - Immediate activation on nav clicks, with smooth scrolling
//! - Persisted light/dark theme and header visibility
//!
//! The selection logic is platform-agnostic and usable from native code
//! (see [`locator`] and [`replay`]); the DOM bindings only build for wasm32.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { SiteNav } from 'scrollspy';
//! await init();
//! const nav = new SiteNav({ strategy: 'both' });
//! nav.attach();
//! ```

pub mod chrome;
pub mod config;
pub mod error;
pub mod locator;
pub mod prefs;
pub mod replay;
pub mod types;

// Browser bindings (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub mod site;

use wasm_bindgen::prelude::*;

pub use config::{LocatorConfig, StrategyMode};
pub use error::{Result, ScrollspyError};
pub use locator::{ActiveMarker, ActiveSectionLocator, SelectionPolicy};
#[cfg(target_arch = "wasm32")]
pub use site::SiteNav;
pub use types::*;

/// Replay a JSON scenario and return the active-section timeline as JSON.
///
/// # Errors
/// Returns an error if the scenario is malformed or its options are invalid.
#[wasm_bindgen(js_name = "replayScenario")]
pub fn replay_scenario(json: &str) -> std::result::Result<String, JsValue> {
    replay::replay_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
