//! Active-section locator tests
//!
//! Drives the locator through visibility batches, scroll frames and clicks
//! and checks which nav entry ends up marked.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use scrollspy::locator::{ActiveMarker, ActiveSectionLocator, RecordingMarker};
use scrollspy::{entries_from_hrefs, NavEntry, SectionRect, StrategyMode};
use test_case::test_case;

const HEADER: f64 = 64.0;

fn portfolio() -> ActiveSectionLocator {
    ActiveSectionLocator::from_entries(entries_from_hrefs(&[
        "#hero",
        "#about",
        "#skills",
        "#timeline",
        "#contact",
    ]))
}

/// Marker that fails the test as soon as two entries are active at once.
#[derive(Default)]
struct ExclusiveMarker {
    inner: RecordingMarker,
    max_active: usize,
}

impl ActiveMarker for ExclusiveMarker {
    fn set_active(&mut self, entry: &NavEntry, active: bool) {
        self.inner.set_active(entry, active);
        let count = self.inner.active_ids().len();
        self.max_active = self.max_active.max(count);
        assert!(count <= 1, "two nav entries active: {:?}", self.inner.active_ids());
    }
}

/// Sections 600px tall laid out from `first_top` downwards.
fn frame(first_top: f64) -> Vec<SectionRect> {
    ["hero", "about", "skills", "timeline", "contact"]
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let top = first_top + 600.0 * i as f64;
            SectionRect::new(*id, top, top + 600.0)
        })
        .collect()
}

// =============================================================================
// RATIO STRATEGY
// =============================================================================

#[test]
fn test_strictly_greatest_ratio_wins() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    loc.apply_visibility(
        [("about", 0.25), ("skills", 0.5), ("timeline", 0.1)],
        &mut marker,
    );
    assert_eq!(loc.active(), Some("skills"));
    assert_eq!(marker.active_ids(), vec!["nav-2"]);
}

#[test]
fn test_ratio_considers_whole_map_not_just_batch() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    loc.apply_visibility([("about", 0.75)], &mut marker);
    // A later batch that only mentions "skills" at a lower ratio does not
    // unseat "about", whose stored ratio is still higher.
    loc.apply_visibility([("skills", 0.5)], &mut marker);
    assert_eq!(loc.active(), Some("about"));
}

#[test]
fn test_all_zero_keeps_previous_active() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    loc.apply_visibility([("contact", 0.5)], &mut marker);
    loc.apply_visibility([("contact", 0.0)], &mut marker);
    assert!(loc.visibility().is_idle());
    assert_eq!(loc.active(), Some("contact"));
    assert_eq!(marker.active_ids(), vec!["nav-4"]);
}

#[test]
fn test_all_zero_from_start_activates_nothing() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    assert!(!loc.apply_visibility([("hero", 0.0), ("about", 0.0)], &mut marker));
    assert_eq!(loc.active(), None);
    assert!(marker.active_ids().is_empty());
}

#[test]
fn test_equal_top_ratio_keeps_incumbent() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    loc.apply_visibility([("skills", 0.5)], &mut marker);
    loc.apply_visibility([("about", 0.5)], &mut marker);
    assert_eq!(loc.active(), Some("skills"));
}

#[test]
fn test_unknown_section_in_batch_is_ignored() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    loc.apply_visibility([("blog", 1.0), ("about", 0.1)], &mut marker);
    assert_eq!(loc.active(), Some("about"));
    assert!(!loc.visibility().contains("blog"));
}

// =============================================================================
// DISTANCE STRATEGY
// =============================================================================

#[test]
fn test_nearest_to_header_bottom_wins() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    let rects = vec![
        SectionRect::new("about", HEADER + 10.0, HEADER + 400.0),
        SectionRect::new("skills", HEADER + 50.0, HEADER + 900.0),
    ];
    loc.apply_scroll(&rects, HEADER, &mut marker);
    assert_eq!(loc.active(), Some("about"));
}

#[test]
fn test_scrolled_past_section_excluded_even_if_nearest() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    // "about" starts 1px under the header top edge, so it is nearest, but
    // its bottom edge is 5px above header + 4: already scrolled past.
    let past_bottom = HEADER + 4.0 - 5.0;
    let rects = vec![
        SectionRect::new("about", HEADER - 1.0, past_bottom),
        SectionRect::new("skills", HEADER + 300.0, HEADER + 900.0),
    ];
    loc.apply_scroll(&rects, HEADER, &mut marker);
    assert_eq!(loc.active(), Some("skills"));
}

#[test]
fn test_no_qualifying_section_keeps_state() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    loc.navigate_to("contact", &mut marker);
    let rects = vec![SectionRect::new("contact", -900.0, 10.0)];
    assert!(!loc.apply_scroll(&rects, HEADER, &mut marker));
    assert_eq!(loc.active(), Some("contact"));
}

#[test]
fn test_hidden_header_uses_zero_height() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    // With the header hidden (height 0), "hero" at top 0 is the nearest.
    let rects = vec![
        SectionRect::new("hero", 0.0, 600.0),
        SectionRect::new("about", 60.0, 1200.0),
    ];
    loc.apply_scroll(&rects, 0.0, &mut marker);
    assert_eq!(loc.active(), Some("hero"));
    // With a 64px header "about" is closer to its bottom edge.
    loc.apply_scroll(&rects, HEADER, &mut marker);
    assert_eq!(loc.active(), Some("about"));
}

#[test_case(0.0, "hero" ; "top of page")]
#[test_case(600.0 - HEADER, "about" ; "about flush with header")]
#[test_case(1500.0, "timeline" ; "mid page nearest below")]
#[test_case(2400.0 - HEADER + 2.0, "contact" ; "timeline scrolled past")]
fn test_scroll_positions(scroll_y: f64, expected: &str) {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    loc.apply_scroll(&frame(-scroll_y), HEADER, &mut marker);
    assert_eq!(loc.active(), Some(expected));
}

// =============================================================================
// DIRECT NAVIGATION AND INTERACTION
// =============================================================================

#[test]
fn test_click_activates_immediately_over_scroll_state() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    loc.apply_scroll(&frame(0.0), HEADER, &mut marker);
    assert_eq!(loc.active(), Some("hero"));

    assert!(loc.navigate_to("timeline", &mut marker));
    assert_eq!(loc.active(), Some("timeline"));
    assert_eq!(marker.active_ids(), vec!["nav-3"]);
}

#[test]
fn test_last_writer_wins_between_strategies() {
    let mut loc = portfolio();
    let mut marker = RecordingMarker::new();
    loc.apply_visibility([("skills", 0.75)], &mut marker);
    assert_eq!(loc.active(), Some("skills"));

    // Scroll frame disagrees and fires later: it wins.
    loc.apply_scroll(&frame(0.0), HEADER, &mut marker);
    assert_eq!(loc.active(), Some("hero"));

    // A new visibility batch fires after that: it wins again.
    loc.apply_visibility([("skills", 0.75)], &mut marker);
    assert_eq!(loc.active(), Some("skills"));
}

#[test]
fn test_single_strategy_mode_removes_race() {
    let mut loc = portfolio().with_mode(StrategyMode::Ratio);
    let mut marker = RecordingMarker::new();
    loc.apply_visibility([("skills", 0.75)], &mut marker);
    loc.apply_scroll(&frame(0.0), HEADER, &mut marker);
    assert_eq!(loc.active(), Some("skills"));
}

#[test]
fn test_never_more_than_one_active() {
    let mut loc = portfolio();
    let mut marker = ExclusiveMarker::default();
    for step in 0..40u32 {
        let y = f64::from(step) * 90.0;
        loc.apply_scroll(&frame(-y), HEADER, &mut marker);
        let ids = ["hero", "about", "skills", "timeline", "contact"];
        let id = ids[usize::try_from(step % 5).unwrap()];
        loc.apply_visibility([(id, 0.1 * f64::from(step % 7))], &mut marker);
        if step % 9 == 0 {
            loc.navigate_to("contact", &mut marker);
        }
    }
    assert_eq!(marker.max_active, 1);
}

#[test]
fn test_missing_sections_are_skipped() {
    // "#blog" has no section in the document.
    let entries = entries_from_hrefs(&["#about", "#blog"]);
    let mut loc = ActiveSectionLocator::new(entries, ["about"]);
    let mut marker = RecordingMarker::new();
    loc.apply_visibility([("blog", 0.9)], &mut marker);
    assert_eq!(loc.active(), None);
    // A click on the dangling link still gives immediate feedback.
    assert!(loc.navigate_to("blog", &mut marker));
    assert_eq!(marker.active_ids(), vec!["nav-1"]);
}
