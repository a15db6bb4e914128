use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A navigation link paired with the section it targets.
///
/// Built once from the nav markup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavEntry {
    /// Link identifier: the element id when present, otherwise `nav-<index>`.
    pub id: String,
    /// Id of the section the link points at (the href fragment without `#`).
    pub target_section_id: String,
}

impl NavEntry {
    pub fn new(id: impl Into<String>, target_section_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            target_section_id: target_section_id.into(),
        }
    }

    /// Build an entry from a link's `href` attribute.
    ///
    /// Only in-page fragment links (`#about`) produce an entry; external links
    /// and bare `#` are skipped.
    pub fn from_href(index: usize, element_id: Option<&str>, href: &str) -> Option<Self> {
        let target = fragment_target(href)?;
        let id = match element_id.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("nav-{index}"),
        };
        Some(Self::new(id, target))
    }
}

/// Section id referenced by an in-page href, if any.
pub fn fragment_target(href: &str) -> Option<&str> {
    let target = href.trim().strip_prefix('#')?;
    if target.is_empty() {
        None
    } else {
        Some(target)
    }
}

/// Rename entries whose id is already taken by an earlier entry.
///
/// An element id can coincide with a generated `nav-<index>`; the later
/// entry gets a `-2`, `-3`, ... suffix so every id names exactly one link.
pub fn dedupe_ids(entries: &mut [NavEntry]) {
    let mut taken: HashSet<String> = HashSet::with_capacity(entries.len());
    for entry in entries.iter_mut() {
        if !taken.contains(&entry.id) {
            taken.insert(entry.id.clone());
            continue;
        }
        let mut n = 2usize;
        let unique = loop {
            let candidate = format!("{}-{n}", entry.id);
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        log::debug!("nav entry id {} already taken, using {unique}", entry.id);
        taken.insert(unique.clone());
        entry.id = unique;
    }
}

/// Build entries for a list of hrefs, skipping the ones that are not
/// in-page links.
pub fn entries_from_hrefs<S: AsRef<str>>(hrefs: &[S]) -> Vec<NavEntry> {
    hrefs
        .iter()
        .enumerate()
        .filter_map(|(i, href)| NavEntry::from_href(i, None, href.as_ref()))
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_target() {
        assert_eq!(fragment_target("#about"), Some("about"));
        assert_eq!(fragment_target("  #work "), Some("work"));
        assert_eq!(fragment_target("#"), None);
        assert_eq!(fragment_target("https://example.com/#about"), None);
        assert_eq!(fragment_target(""), None);
    }

    #[test]
    fn test_from_href_prefers_element_id() {
        let entry = NavEntry::from_href(3, Some("link-about"), "#about").unwrap();
        assert_eq!(entry.id, "link-about");
        assert_eq!(entry.target_section_id, "about");

        let entry = NavEntry::from_href(3, Some(""), "#about").unwrap();
        assert_eq!(entry.id, "nav-3");
    }

    #[test]
    fn test_entries_from_hrefs_skips_external() {
        let entries = entries_from_hrefs(&["#about", "/blog", "#contact"]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "nav-0");
        assert_eq!(entries[1].id, "nav-2");
        assert_eq!(entries[1].target_section_id, "contact");
    }

    #[test]
    fn test_dedupe_ids_renames_later_collisions() {
        let mut entries = vec![
            NavEntry::from_href(0, Some("nav-1"), "#a").unwrap(),
            NavEntry::from_href(1, None, "#b").unwrap(),
            NavEntry::from_href(2, Some("nav-1-2"), "#c").unwrap(),
            NavEntry::from_href(3, Some("nav-1"), "#d").unwrap(),
        ];
        dedupe_ids(&mut entries);
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["nav-1", "nav-1-2", "nav-1-2-2", "nav-1-3"]);
        assert_eq!(entries[1].target_section_id, "b");
    }
}
