//! Section selection policies.
//!
//! Each policy looks at one kind of signal and names the section that should
//! be current, or `None` when the signal gives no clear answer (in which case
//! the caller keeps whatever was active before).

use crate::types::{SectionRect, SectionVisibility};

/// Input handed to a [`SelectionPolicy`].
#[derive(Debug, Clone, Copy)]
pub enum Signal<'a> {
    /// Latest intersection ratios for every tracked section.
    Visibility(&'a SectionVisibility),
    /// Section geometry from one scroll frame plus the header bottom edge.
    Geometry {
        rects: &'a [SectionRect],
        header_height: f64,
    },
}

/// Strategy that picks the current section from a [`Signal`].
pub trait SelectionPolicy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Pick the section that should be active.
    ///
    /// `incumbent` is the currently active section, if any. Policies ignore
    /// signals they do not understand by returning `None`.
    fn select<'s>(&self, signal: &Signal<'s>, incumbent: Option<&str>) -> Option<&'s str>;
}

/// Picks the section with the strictly greatest intersection ratio.
///
/// All-zero visibility selects nothing. When several sections share the top
/// ratio the incumbent keeps its place if it is one of them; otherwise the
/// first one in document order wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioPolicy;

impl SelectionPolicy for RatioPolicy {
    fn name(&self) -> &'static str {
        "ratio"
    }

    fn select<'s>(&self, signal: &Signal<'s>, incumbent: Option<&str>) -> Option<&'s str> {
        let Signal::Visibility(visibility) = *signal else {
            return None;
        };

        let mut best: Option<(&'s str, f64)> = None;
        for (id, ratio) in visibility.iter() {
            let best_ratio = best.map_or(0.0, |(_, r)| r);
            if ratio > best_ratio {
                best = Some((id, ratio));
            }
        }
        let (winner, best_ratio) = best?;

        // Ties go to the incumbent. `best_ratio` is the maximum, so `>=` means equal.
        if let Some(current) = incumbent {
            if let Some((id, ratio)) = visibility.iter().find(|(id, _)| *id == current) {
                if ratio >= best_ratio {
                    return Some(id);
                }
            }
        }
        Some(winner)
    }
}

/// Picks the section whose top edge is nearest the header's bottom edge.
///
/// Sections whose bottom edge sits at or above `header_height + tolerance`
/// are treated as already scrolled past and skipped.
#[derive(Debug, Clone, Copy)]
pub struct DistancePolicy {
    pub tolerance: f64,
}

/// Pixels of slack before a section counts as scrolled past.
pub const DEFAULT_PAST_TOLERANCE_PX: f64 = 4.0;

impl Default for DistancePolicy {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_PAST_TOLERANCE_PX,
        }
    }
}

impl DistancePolicy {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl SelectionPolicy for DistancePolicy {
    fn name(&self) -> &'static str {
        "distance"
    }

    fn select<'s>(&self, signal: &Signal<'s>, _incumbent: Option<&str>) -> Option<&'s str> {
        let Signal::Geometry {
            rects,
            header_height,
        } = *signal
        else {
            return None;
        };
        let header_height = if header_height.is_finite() {
            header_height.max(0.0)
        } else {
            0.0
        };
        let cutoff = header_height + self.tolerance;

        let mut best: Option<(&'s str, f64)> = None;
        for rect in rects {
            if rect.bottom.is_nan() || rect.bottom <= cutoff {
                continue;
            }
            let distance = (rect.top - header_height).abs();
            if !distance.is_finite() {
                continue;
            }
            match best {
                Some((_, d)) if distance >= d => {}
                _ => best = Some((rect.id.as_str(), distance)),
            }
        }
        best.map(|(id, _)| id)
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

    fn visibility(ratios: &[(&str, f64)]) -> SectionVisibility {
        let mut vis = SectionVisibility::new(ratios.iter().map(|(id, _)| *id));
        for (id, r) in ratios {
            vis.set(id, *r);
        }
        vis
    }

    #[test]
    fn test_ratio_picks_strict_maximum() {
        let vis = visibility(&[("a", 0.1), ("b", 0.75), ("c", 0.5)]);
        let pick = RatioPolicy.select(&Signal::Visibility(&vis), None);
        assert_eq!(pick, Some("b"));
    }

    #[test]
    fn test_ratio_all_zero_selects_nothing() {
        let vis = visibility(&[("a", 0.0), ("b", 0.0)]);
        assert_eq!(RatioPolicy.select(&Signal::Visibility(&vis), Some("a")), None);
    }

    #[test]
    fn test_ratio_tie_keeps_incumbent() {
        let vis = visibility(&[("a", 0.5), ("b", 0.5)]);
        assert_eq!(RatioPolicy.select(&Signal::Visibility(&vis), Some("b")), Some("b"));
    }

    #[test]
    fn test_ratio_tie_without_incumbent_takes_first() {
        let vis = visibility(&[("a", 0.5), ("b", 0.5)]);
        assert_eq!(RatioPolicy.select(&Signal::Visibility(&vis), None), Some("a"));
        // Incumbent not among the leaders does not matter.
        let vis = visibility(&[("a", 0.1), ("b", 0.5), ("c", 0.5)]);
        assert_eq!(RatioPolicy.select(&Signal::Visibility(&vis), Some("a")), Some("b"));
    }

    #[test]
    fn test_ratio_ignores_geometry() {
        let rects = [SectionRect::new("a", 0.0, 100.0)];
        let signal = Signal::Geometry {
            rects: &rects,
            header_height: 0.0,
        };
        assert_eq!(RatioPolicy.select(&signal, None), None);
    }

    #[test]
    fn test_distance_nearest_wins() {
        let rects = [
            SectionRect::new("a", 70.0, 500.0),
            SectionRect::new("b", 110.0, 900.0),
        ];
        let signal = Signal::Geometry {
            rects: &rects,
            header_height: 60.0,
        };
        assert_eq!(DistancePolicy::default().select(&signal, None), Some("a"));
    }

    #[test]
    fn test_distance_skips_scrolled_past() {
        // "a" ends 5px above the cutoff (60 + 4), so it is excluded even
        // though its top is closest to the header.
        let rects = [
            SectionRect::new("a", 58.0, 59.0),
            SectionRect::new("b", 200.0, 900.0),
        ];
        let signal = Signal::Geometry {
            rects: &rects,
            header_height: 60.0,
        };
        assert_eq!(DistancePolicy::default().select(&signal, None), Some("b"));
    }

    #[test]
    fn test_distance_bottom_exactly_at_cutoff_is_past() {
        let rects = [SectionRect::new("a", 0.0, 64.0)];
        let signal = Signal::Geometry {
            rects: &rects,
            header_height: 60.0,
        };
        assert_eq!(DistancePolicy::default().select(&signal, None), None);
    }

    #[test]
    fn test_distance_section_above_header_can_win() {
        // Top scrolled under the header but still covering it.
        let rects = [
            SectionRect::new("a", -300.0, 400.0),
            SectionRect::new("b", 400.0, 1000.0),
        ];
        let signal = Signal::Geometry {
            rects: &rects,
            header_height: 0.0,
        };
        assert_eq!(DistancePolicy::default().select(&signal, None), Some("a"));
    }

    #[test]
    fn test_distance_equal_distance_keeps_document_order() {
        let rects = [
            SectionRect::new("a", 40.0, 200.0),
            SectionRect::new("b", 80.0, 400.0),
        ];
        let signal = Signal::Geometry {
            rects: &rects,
            header_height: 60.0,
        };
        assert_eq!(DistancePolicy::default().select(&signal, None), Some("a"));
    }

    #[test]
    fn test_distance_nan_geometry_skipped() {
        let rects = [
            SectionRect::new("a", f64::NAN, 500.0),
            SectionRect::new("b", 100.0, f64::NAN),
            SectionRect::new("c", 300.0, 800.0),
        ];
        let signal = Signal::Geometry {
            rects: &rects,
            header_height: 0.0,
        };
        assert_eq!(DistancePolicy::default().select(&signal, None), Some("c"));
    }

    #[test]
    fn test_distance_ignores_visibility() {
        let vis = visibility(&[("a", 1.0)]);
        assert_eq!(
            DistancePolicy::default().select(&Signal::Visibility(&vis), None),
            None
        );
    }

    #[test]
    fn test_policy_names() {
        let policies: [&dyn SelectionPolicy; 2] = [&RatioPolicy, &DistancePolicy::default()];
        let names: Vec<&str> = policies.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["ratio", "distance"]);
    }
}
