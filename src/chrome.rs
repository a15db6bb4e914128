//! Header geometry and styling rules shared by the DOM layer and tests.

/// CSS custom property carrying the header height.
pub const HEADER_HEIGHT_VAR: &str = "--header-height";
/// CSS custom property carrying the header hidden flag.
pub const HEADER_HIDDEN_VAR: &str = "--header-hidden";

/// Header bottom edge used by the distance scan: 0 while hidden.
pub fn effective_header_height(hidden: bool, offset_height: i32) -> f64 {
    if hidden {
        0.0
    } else {
        f64::from(offset_height.max(0))
    }
}

/// Value written to [`HEADER_HEIGHT_VAR`].
pub fn header_height_css(hidden: bool, offset_height: i32) -> String {
    format!("{}px", effective_header_height(hidden, offset_height))
}

/// Value written to [`HEADER_HIDDEN_VAR`].
pub fn header_hidden_css(hidden: bool) -> &'static str {
    if hidden {
        "true"
    } else {
        "false"
    }
}

/// Whether the header should carry the scrolled class.
pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_header_has_zero_height() {
        assert_eq!(effective_header_height(true, 72), 0.0);
        assert_eq!(header_height_css(true, 72), "0px");
        assert_eq!(header_height_css(false, 72), "72px");
        assert_eq!(header_height_css(false, -3), "0px");
    }

    #[test]
    fn test_scrolled_threshold_is_exclusive() {
        assert!(!is_scrolled(8.0, 8.0));
        assert!(is_scrolled(8.5, 8.0));
        assert!(!is_scrolled(0.0, 8.0));
    }
}
