//! Theme and header chrome for `SiteNav`.

use super::{SharedState, SiteNav};
use crate::chrome::{header_height_css, header_hidden_css, HEADER_HEIGHT_VAR, HEADER_HIDDEN_VAR};
use crate::prefs::{
    aria_pressed, header_toggle_label, load_header_visible, load_theme, save_header_visible,
    save_theme, Theme,
};

const THEME_ATTR: &str = "data-theme";
const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

impl SiteNav {
    pub(crate) fn init_theme(s: &SharedState) {
        let prefers_dark = web_sys::window()
            .and_then(|w| w.match_media(PREFERS_DARK_QUERY).ok().flatten())
            .is_some_and(|query| query.matches());
        Self::apply_theme(s, load_theme(&s.store, prefers_dark));
    }

    pub(crate) fn apply_theme(s: &SharedState, theme: Theme) {
        if let Some(root) = s.root.as_ref() {
            root.set_attribute(THEME_ATTR, theme.as_str()).ok();
        }
        if let Some(toggle) = s.theme_toggle.as_ref() {
            toggle.set_text_content(Some(theme.toggle_label()));
            toggle
                .set_attribute("aria-pressed", aria_pressed(theme.is_dark()))
                .ok();
        }
    }

    pub(crate) fn toggle_theme_state(s: &mut SharedState) -> Theme {
        let current = Theme::from_attribute(
            s.root
                .as_ref()
                .and_then(|root| root.get_attribute(THEME_ATTR))
                .as_deref(),
        );
        let next = current.toggled();
        Self::apply_theme(s, next);
        if let Err(e) = save_theme(&mut s.store, next) {
            log::warn!("theme not saved: {e}");
        }
        next
    }

    /// Restore the saved header visibility without re-saving it.
    pub(crate) fn restore_header(s: &SharedState) {
        Self::apply_header_visibility(s, load_header_visible(&s.store));
    }

    fn apply_header_visibility(s: &SharedState, visible: bool) {
        let Some(header) = s.header.as_ref() else {
            return;
        };
        header
            .class_list()
            .toggle_with_force(&s.config.hidden_class, !visible)
            .ok();
        if let Some(root) = s.root.as_ref() {
            root.style()
                .set_property(HEADER_HIDDEN_VAR, header_hidden_css(!visible))
                .ok();
        }
        if let Some(toggle) = s.header_toggle.as_ref() {
            toggle.set_text_content(Some(header_toggle_label(visible)));
            toggle
                .set_attribute("aria-pressed", aria_pressed(visible))
                .ok();
        }
        Self::update_header_height(s);
    }

    /// Flip header visibility and persist it. Returns the new visibility.
    pub(crate) fn toggle_header_state(s: &mut SharedState) -> bool {
        let Some(header) = s.header.as_ref() else {
            return false;
        };
        let visible = !header.class_list().contains(&s.config.hidden_class);
        let next = !visible;
        Self::apply_header_visibility(s, next);
        if let Err(e) = save_header_visible(&mut s.store, next) {
            log::warn!("header visibility not saved: {e}");
        }
        next
    }

    /// Write `--header-height` from the header's current size.
    pub(crate) fn update_header_height(s: &SharedState) {
        let (Some(header), Some(root)) = (s.header.as_ref(), s.root.as_ref()) else {
            return;
        };
        let hidden = header.class_list().contains(&s.config.hidden_class);
        root.style()
            .set_property(
                HEADER_HEIGHT_VAR,
                &header_height_css(hidden, header.offset_height()),
            )
            .ok();
    }
}
