use serde::{Deserialize, Serialize};

/// Viewport-relative vertical geometry of one section, sampled per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRect {
    pub id: String,
    /// Distance from the viewport top to the section's top edge (px).
    pub top: f64,
    /// Distance from the viewport top to the section's bottom edge (px).
    pub bottom: f64,
}

impl SectionRect {
    pub fn new(id: impl Into<String>, top: f64, bottom: f64) -> Self {
        Self {
            id: id.into(),
            top,
            bottom,
        }
    }
}

/// Per-section intersection ratio, in document order.
///
/// Every tracked section starts at 0. Updates overwrite in place and entries
/// are never removed, so iteration order always matches the order the
/// sections were registered in.
#[derive(Debug, Clone, Default)]
pub struct SectionVisibility {
    ratios: Vec<(String, f64)>,
}

impl SectionVisibility {
    pub fn new<I, S>(section_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut visibility = Self::default();
        for id in section_ids {
            visibility.track(id);
        }
        visibility
    }

    /// Start tracking a section at ratio 0. Already tracked ids are left alone.
    pub fn track(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.contains(&id) {
            self.ratios.push((id, 0.0));
        }
    }

    /// Overwrite a section's ratio, clamped into [0, 1] (NaN reads as 0).
    ///
    /// Returns `false` for sections that are not tracked.
    pub fn set(&mut self, id: &str, ratio: f64) -> bool {
        let Some(slot) = self.ratios.iter_mut().find(|(sid, _)| sid == id) else {
            return false;
        };
        slot.1 = clamp_ratio(ratio);
        true
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.ratios
            .iter()
            .find(|(sid, _)| sid == id)
            .map(|(_, r)| *r)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ratios.iter().any(|(sid, _)| sid == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.ratios.iter().map(|(id, r)| (id.as_str(), *r))
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    /// True when no tracked section reports any visibility.
    pub fn is_idle(&self) -> bool {
        self.ratios.iter().all(|(_, r)| *r <= 0.0)
    }
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
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

    #[test]
    fn test_new_tracks_all_at_zero() {
        let vis = SectionVisibility::new(["about", "work", "contact"]);
        assert_eq!(vis.len(), 3);
        assert!(vis.is_idle());
        assert_eq!(vis.get("work"), Some(0.0));
    }

    #[test]
    fn test_set_overwrites_in_place_keeping_order() {
        let mut vis = SectionVisibility::new(["a", "b", "c"]);
        assert!(vis.set("b", 0.5));
        assert!(vis.set("a", 0.25));
        let order: Vec<&str> = vis.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(vis.get("b"), Some(0.5));
    }

    #[test]
    fn test_set_unknown_is_ignored() {
        let mut vis = SectionVisibility::new(["a"]);
        assert!(!vis.set("ghost", 0.9));
        assert_eq!(vis.len(), 1);
    }

    #[test]
    fn test_ratio_clamping() {
        let mut vis = SectionVisibility::new(["a", "b", "c"]);
        vis.set("a", 1.7);
        vis.set("b", -0.2);
        vis.set("c", f64::NAN);
        assert_eq!(vis.get("a"), Some(1.0));
        assert_eq!(vis.get("b"), Some(0.0));
        assert_eq!(vis.get("c"), Some(0.0));
    }

    #[test]
    fn test_track_is_idempotent() {
        let mut vis = SectionVisibility::new(["a"]);
        vis.set("a", 0.4);
        vis.track("a");
        assert_eq!(vis.len(), 1);
        assert_eq!(vis.get("a"), Some(0.4));
    }
}
