//! Offline replay of recorded navigation events.
//!
//! A scenario lists the nav hrefs, optional locator options, and a sequence
//! of visibility batches, scroll frames and clicks. Replaying it runs the
//! same locator the browser uses and reports the active section after every
//! event, which makes highlighting bugs reproducible without a browser.
//!
//! ```json
//! {
//!   "nav": ["#about", "#projects"],
//!   "events": [
//!     { "type": "visibility", "entries": [["projects", 0.5]] },
//!     { "type": "scroll", "headerHeight": 64, "sections": [
//!         { "id": "about", "top": 70, "bottom": 600 } ] },
//!     { "type": "navigate", "section": "projects" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::config::LocatorConfig;
use crate::error::Result;
use crate::locator::{ActiveSectionLocator, RecordingMarker};
use crate::types::{entries_from_hrefs, SectionRect};

/// One recorded browser event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReplayEvent {
    /// Intersection observer batch: `(section id, ratio)` pairs.
    Visibility { entries: Vec<(String, f64)> },
    /// One throttled scroll frame.
    #[serde(rename_all = "camelCase")]
    Scroll {
        #[serde(default)]
        header_height: f64,
        sections: Vec<SectionRect>,
    },
    /// Direct click on a nav entry.
    Navigate { section: String },
}

impl ReplayEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Visibility { .. } => "visibility",
            Self::Scroll { .. } => "scroll",
            Self::Navigate { .. } => "navigate",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Nav link hrefs in document order.
    pub nav: Vec<String>,
    /// Section ids present in the document. Defaults to every nav target.
    #[serde(default)]
    pub sections: Option<Vec<String>>,
    #[serde(default)]
    pub config: LocatorConfig,
    pub events: Vec<ReplayEvent>,
}

/// State after one replayed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayStep {
    pub index: usize,
    pub event: String,
    /// Whether the event wrote an activation.
    pub applied: bool,
    pub active_section: Option<String>,
    /// Nav entry ids marked active after the event.
    pub active_links: Vec<String>,
}

/// Run `scenario` through a fresh locator.
pub fn replay(scenario: &Scenario) -> Result<Vec<ReplayStep>> {
    scenario.config.validate()?;

    let entries = entries_from_hrefs(scenario.nav.as_slice());
    let mut locator = match &scenario.sections {
        Some(sections) => ActiveSectionLocator::new(entries, sections.iter().cloned()),
        None => ActiveSectionLocator::from_entries(entries),
    }
    .with_config(&scenario.config);
    let mut marker = RecordingMarker::new();

    let steps = scenario
        .events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let applied = match event {
                ReplayEvent::Visibility { entries } => locator.apply_visibility(
                    entries.iter().map(|(id, r)| (id.as_str(), *r)),
                    &mut marker,
                ),
                ReplayEvent::Scroll {
                    header_height,
                    sections,
                } => locator.apply_scroll(sections, *header_height, &mut marker),
                ReplayEvent::Navigate { section } => locator.navigate_to(section, &mut marker),
            };
            ReplayStep {
                index,
                event: event.kind().to_string(),
                applied,
                active_section: locator.active().map(str::to_string),
                active_links: marker.active_ids(),
            }
        })
        .collect();
    Ok(steps)
}

/// Parse a JSON scenario, replay it and return the steps as pretty JSON.
pub fn replay_json(json: &str) -> Result<String> {
    let scenario: Scenario = serde_json::from_str(json)?;
    let steps = replay(&scenario)?;
    Ok(serde_json::to_string_pretty(&steps)?)
}
