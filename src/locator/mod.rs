//! Active-section locator.
//!
//! Decides which navigable section is "current" and marks exactly one nav
//! entry active. Two policies feed it:
//! - [`RatioPolicy`] on every intersection-observer batch
//! - [`DistancePolicy`] on every throttled scroll frame
//!
//! With [`StrategyMode::Both`] the two write the same output and whichever
//! fired last wins; they may briefly disagree while the page is moving.
//! Direct navigation ([`ActiveSectionLocator::navigate_to`]) overrides both
//! until the next event arrives.

mod policy;
mod throttle;

use std::collections::BTreeSet;

pub use policy::{
    DistancePolicy, RatioPolicy, SelectionPolicy, Signal, DEFAULT_PAST_TOLERANCE_PX,
};
pub use throttle::FrameThrottle;

use crate::config::{LocatorConfig, StrategyMode};
use crate::types::{dedupe_ids, NavEntry, SectionRect, SectionVisibility};

/// Output seam: whatever renders the active state of a nav entry.
///
/// The browser implementation toggles a CSS class on the link element.
pub trait ActiveMarker {
    fn set_active(&mut self, entry: &NavEntry, active: bool);
}

/// In-memory [`ActiveMarker`] that records which entries are marked.
#[derive(Debug, Default, Clone)]
pub struct RecordingMarker {
    active: BTreeSet<String>,
    writes: usize,
}

impl RecordingMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry ids currently marked active, sorted.
    pub fn active_ids(&self) -> Vec<String> {
        self.active.iter().cloned().collect()
    }

    pub fn is_active(&self, entry_id: &str) -> bool {
        self.active.contains(entry_id)
    }

    /// Number of `set_active` calls received.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ActiveMarker for RecordingMarker {
    fn set_active(&mut self, entry: &NavEntry, active: bool) {
        self.writes += 1;
        if active {
            self.active.insert(entry.id.clone());
        } else {
            self.active.remove(&entry.id);
        }
    }
}

/// Log label for activations that bypass both policies.
const NAVIGATION: &str = "navigation";

/// Owns the nav entries, the visibility map and the active section.
#[derive(Debug, Clone)]
pub struct ActiveSectionLocator {
    entries: Vec<NavEntry>,
    visibility: SectionVisibility,
    active: Option<String>,
    /// Index of the entry currently marked.
    marked: Option<usize>,
    mode: StrategyMode,
    ratio: RatioPolicy,
    distance: DistancePolicy,
}

impl ActiveSectionLocator {
    /// Create a locator over `entries`, tracking visibility for `sections`.
    ///
    /// `sections` should list only targets that exist in the document, in
    /// document order; nav entries pointing elsewhere can still be activated
    /// by direct navigation.
    ///
    /// Colliding entry ids are made unique, see [`dedupe_ids`].
    pub fn new<I, S>(mut entries: Vec<NavEntry>, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        dedupe_ids(&mut entries);
        Self {
            entries,
            visibility: SectionVisibility::new(sections),
            active: None,
            marked: None,
            mode: StrategyMode::default(),
            ratio: RatioPolicy,
            distance: DistancePolicy::default(),
        }
    }

    /// Create a locator whose sections are every entry's target.
    pub fn from_entries(entries: Vec<NavEntry>) -> Self {
        let sections: Vec<String> = entries
            .iter()
            .map(|e| e.target_section_id.clone())
            .collect();
        Self::new(entries, sections)
    }

    /// Apply strategy mode and tolerance from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &LocatorConfig) -> Self {
        self.mode = config.strategy;
        self.distance = DistancePolicy::new(config.past_tolerance_px);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: StrategyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: StrategyMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> StrategyMode {
        self.mode
    }

    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    pub fn visibility(&self) -> &SectionVisibility {
        &self.visibility
    }

    /// Currently active section id.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Entry currently marked active.
    pub fn active_entry(&self) -> Option<&NavEntry> {
        self.entries.get(self.marked?)
    }

    /// Merge a batch of visibility reports and re-run the ratio policy.
    ///
    /// Returns `true` if an activation was written. All-zero visibility
    /// writes nothing and leaves the previous section active.
    pub fn apply_visibility<I, S, M>(&mut self, batch: I, marker: &mut M) -> bool
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
        M: ActiveMarker + ?Sized,
    {
        for (id, ratio) in batch {
            self.visibility.set(id.as_ref(), ratio);
        }
        if !self.mode.uses_ratio() {
            return false;
        }

        let winner = self
            .ratio
            .select(&Signal::Visibility(&self.visibility), self.active.as_deref())
            .map(str::to_string);
        let source = self.ratio.name();
        match winner {
            Some(section) => self.activate(&section, source, marker),
            None => false,
        }
    }

    /// Run the nearest-distance scan over one frame of section geometry.
    ///
    /// `header_height` is the header's bottom edge, 0 when it is hidden.
    /// Returns `true` if an activation was written.
    pub fn apply_scroll<M>(
        &mut self,
        rects: &[SectionRect],
        header_height: f64,
        marker: &mut M,
    ) -> bool
    where
        M: ActiveMarker + ?Sized,
    {
        if !self.mode.uses_distance() {
            return false;
        }
        let signal = Signal::Geometry {
            rects,
            header_height,
        };
        let winner = self
            .distance
            .select(&signal, self.active.as_deref())
            .map(str::to_string);
        let source = self.distance.name();
        match winner {
            Some(section) => self.activate(&section, source, marker),
            None => false,
        }
    }

    /// Activate `section_id` immediately, regardless of either policy.
    ///
    /// Returns `false` when no nav entry targets that section.
    pub fn navigate_to<M>(&mut self, section_id: &str, marker: &mut M) -> bool
    where
        M: ActiveMarker + ?Sized,
    {
        self.activate(section_id, NAVIGATION, marker)
    }

    /// Activate the section of the entry at `index` and mark that entry
    /// itself, even when an earlier entry targets the same section.
    ///
    /// Returns `false` when `index` is out of range.
    pub fn navigate_entry<M>(&mut self, index: usize, marker: &mut M) -> bool
    where
        M: ActiveMarker + ?Sized,
    {
        let Some(section_id) = self.entries.get(index).map(|e| e.target_section_id.clone())
        else {
            return false;
        };
        self.mark(index, &section_id, NAVIGATION, marker);
        true
    }

    /// Mark the first entry targeting `section_id`.
    fn activate<M>(&mut self, section_id: &str, source: &str, marker: &mut M) -> bool
    where
        M: ActiveMarker + ?Sized,
    {
        let Some(index) = self
            .entries
            .iter()
            .position(|e| e.target_section_id == section_id)
        else {
            log::debug!("no nav entry targets #{section_id}, ignoring {source}");
            return false;
        };
        self.mark(index, section_id, source, marker);
        true
    }

    /// Clear every entry but `index`, then mark it.
    fn mark<M>(&mut self, index: usize, section_id: &str, source: &str, marker: &mut M)
    where
        M: ActiveMarker + ?Sized,
    {
        for (i, entry) in self.entries.iter().enumerate() {
            if i != index {
                marker.set_active(entry, false);
            }
        }
        if let Some(entry) = self.entries.get(index) {
            marker.set_active(entry, true);
        }
        self.marked = Some(index);

        if self.active.as_deref() != Some(section_id) {
            log::debug!("active section {:?} -> #{section_id} ({source})", self.active);
            self.active = Some(section_id.to_string());
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::entries_from_hrefs;

    fn locator() -> ActiveSectionLocator {
        ActiveSectionLocator::from_entries(entries_from_hrefs(&[
            "#about", "#projects", "#contact",
        ]))
    }

    #[test]
    fn test_visibility_activates_best() {
        let mut loc = locator();
        let mut marker = RecordingMarker::new();
        assert!(loc.apply_visibility([("projects", 0.5), ("about", 0.1)], &mut marker));
        assert_eq!(loc.active(), Some("projects"));
        assert_eq!(marker.active_ids(), vec!["nav-1".to_string()]);
    }

    #[test]
    fn test_idle_visibility_keeps_previous() {
        let mut loc = locator();
        let mut marker = RecordingMarker::new();
        loc.apply_visibility([("contact", 0.25)], &mut marker);
        let writes = marker.writes();
        assert!(!loc.apply_visibility([("contact", 0.0)], &mut marker));
        assert_eq!(loc.active(), Some("contact"));
        assert_eq!(marker.writes(), writes);
        assert!(marker.is_active("nav-2"));
    }

    #[test]
    fn test_navigation_overrides_then_yields() {
        let mut loc = locator();
        let mut marker = RecordingMarker::new();
        loc.apply_visibility([("about", 0.75)], &mut marker);
        assert!(loc.navigate_to("contact", &mut marker));
        assert_eq!(loc.active(), Some("contact"));
        assert_eq!(marker.active_ids(), vec!["nav-2".to_string()]);

        // Next event takes over again.
        loc.apply_visibility([("about", 0.75)], &mut marker);
        assert_eq!(loc.active(), Some("about"));
    }

    #[test]
    fn test_navigate_unknown_section_is_noop() {
        let mut loc = locator();
        let mut marker = RecordingMarker::new();
        assert!(!loc.navigate_to("blog", &mut marker));
        assert_eq!(loc.active(), None);
        assert_eq!(marker.writes(), 0);
    }

    #[test]
    fn test_mode_gates_policies() {
        let mut marker = RecordingMarker::new();
        let mut loc = locator().with_mode(StrategyMode::Ratio);
        let rects = [SectionRect::new("about", 10.0, 500.0)];
        assert!(!loc.apply_scroll(&rects, 0.0, &mut marker));
        assert_eq!(loc.active(), None);

        loc.set_mode(StrategyMode::Distance);
        assert!(!loc.apply_visibility([("contact", 1.0)], &mut marker));
        // Ratio still recorded for later.
        assert_eq!(loc.visibility().get("contact"), Some(1.0));
        assert!(loc.apply_scroll(&rects, 0.0, &mut marker));
        assert_eq!(loc.active(), Some("about"));
    }

    #[test]
    fn test_duplicate_targets_mark_first_entry_only() {
        let entries = entries_from_hrefs(&["#about", "#work", "#about"]);
        let mut loc = ActiveSectionLocator::from_entries(entries);
        let mut marker = RecordingMarker::new();
        loc.navigate_to("about", &mut marker);
        assert_eq!(marker.active_ids(), vec!["nav-0".to_string()]);
        assert_eq!(loc.active_entry().map(|e| e.id.as_str()), Some("nav-0"));
        assert_eq!(loc.visibility().len(), 2);
    }

    #[test]
    fn test_navigate_entry_marks_that_link() {
        let entries = entries_from_hrefs(&["#about", "#work", "#about"]);
        let mut loc = ActiveSectionLocator::from_entries(entries);
        let mut marker = RecordingMarker::new();
        assert!(loc.navigate_entry(2, &mut marker));
        assert_eq!(loc.active(), Some("about"));
        assert_eq!(marker.active_ids(), vec!["nav-2".to_string()]);
        assert_eq!(loc.active_entry().map(|e| e.id.as_str()), Some("nav-2"));

        // Policy-driven activation goes back to the first link.
        loc.apply_visibility([("about", 0.5)], &mut marker);
        assert_eq!(marker.active_ids(), vec!["nav-0".to_string()]);
        assert!(!loc.navigate_entry(3, &mut marker));
    }

    #[test]
    fn test_colliding_ids_stay_distinguishable() {
        let entries = vec![
            NavEntry::from_href(0, Some("nav-1"), "#a").unwrap(),
            NavEntry::from_href(1, None, "#b").unwrap(),
        ];
        let mut loc = ActiveSectionLocator::from_entries(entries);
        let mut marker = RecordingMarker::new();

        assert!(loc.navigate_to("b", &mut marker));
        assert_eq!(marker.active_ids(), vec!["nav-1-2".to_string()]);
        assert!(loc.navigate_to("a", &mut marker));
        assert_eq!(marker.active_ids(), vec!["nav-1".to_string()]);
    }

    #[test]
    fn test_with_config_applies_tolerance() {
        let config = LocatorConfig {
            past_tolerance_px: 0.0,
            ..LocatorConfig::default()
        };
        let mut loc = locator().with_config(&config);
        let mut marker = RecordingMarker::new();
        // Bottom 2px below the header: past with the default 4px slack,
        // still eligible with none.
        let rects = [SectionRect::new("about", -400.0, 62.0)];
        assert!(loc.apply_scroll(&rects, 60.0, &mut marker));
        assert_eq!(loc.active(), Some("about"));
    }
}
