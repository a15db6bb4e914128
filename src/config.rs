//! Options accepted by `SiteNav` and the replay tool.
//!
//! Every field has a default matching the stock portfolio markup, so an empty
//! object (or `undefined` from JavaScript) is a valid configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrollspyError};
use crate::locator::DEFAULT_PAST_TOLERANCE_PX;

/// Which selection strategies are allowed to write the active state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyMode {
    /// Ratio and distance strategies both run; the last one to fire wins.
    #[default]
    Both,
    /// Only intersection-ratio batches select the active section.
    Ratio,
    /// Only scroll-frame distance scans select the active section.
    Distance,
}

impl StrategyMode {
    pub fn uses_ratio(self) -> bool {
        matches!(self, Self::Both | Self::Ratio)
    }

    pub fn uses_distance(self) -> bool {
        matches!(self, Self::Both | Self::Distance)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::Ratio => "ratio",
            Self::Distance => "distance",
        }
    }
}

impl FromStr for StrategyMode {
    type Err = ScrollspyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" => Ok(Self::Both),
            "ratio" => Ok(Self::Ratio),
            "distance" => Ok(Self::Distance),
            other => Err(ScrollspyError::Options(format!(
                "unknown strategy '{other}' (expected both, ratio or distance)"
            ))),
        }
    }
}

/// Runtime configuration for the locator and page chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocatorConfig {
    /// Selector for the navigation links.
    pub nav_selector: String,
    /// Selector for the sticky site header.
    pub header_selector: String,
    /// Element id of the theme toggle button.
    pub theme_toggle_id: String,
    /// Element id of the header show/hide button.
    pub header_toggle_id: String,
    /// Class put on the single active nav link.
    pub active_class: String,
    /// Class marking the header as hidden.
    pub hidden_class: String,
    /// Class put on the header once the page is scrolled.
    pub scrolled_class: String,
    /// Sections whose bottom edge is within this many pixels below the
    /// header bottom count as scrolled past.
    pub past_tolerance_px: f64,
    /// `scrollY` beyond which the header gets the scrolled class.
    pub scrolled_threshold_px: f64,
    /// Intersection thresholds handed to the observer.
    pub thresholds: Vec<f64>,
    /// Intersection root margin handed to the observer.
    pub root_margin: String,
    pub strategy: StrategyMode,
    /// `log` level name for the browser console logger.
    pub log_level: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            nav_selector: ".main-nav a.nav-link".to_string(),
            header_selector: ".site-header".to_string(),
            theme_toggle_id: "theme-toggle".to_string(),
            header_toggle_id: "header-toggle".to_string(),
            active_class: "active".to_string(),
            hidden_class: "hidden".to_string(),
            scrolled_class: "scrolled".to_string(),
            past_tolerance_px: DEFAULT_PAST_TOLERANCE_PX,
            scrolled_threshold_px: 8.0,
            thresholds: vec![0.0, 0.1, 0.25, 0.5, 0.75],
            root_margin: "-10% 0px -40% 0px".to_string(),
            strategy: StrategyMode::Both,
            log_level: "warn".to_string(),
        }
    }
}

impl LocatorConfig {
    /// Parse and validate a JSON options document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate an options object coming from JavaScript.
    ///
    /// `undefined` and `null` yield the defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn from_js(value: &wasm_bindgen::JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_wasm_bindgen::from_value(value.clone())
            .map_err(|e| ScrollspyError::Options(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the observer or the scans misbehave.
    pub fn validate(&self) -> Result<()> {
        let selectors = [
            ("navSelector", &self.nav_selector),
            ("headerSelector", &self.header_selector),
            ("activeClass", &self.active_class),
            ("hiddenClass", &self.hidden_class),
            ("scrolledClass", &self.scrolled_class),
        ];
        if let Some((name, _)) = selectors.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ScrollspyError::Options(format!("{name} must not be empty")));
        }
        if self.thresholds.is_empty() {
            return Err(ScrollspyError::Options(
                "thresholds must contain at least one value".to_string(),
            ));
        }
        if let Some(bad) = self
            .thresholds
            .iter()
            .find(|t| !(0.0..=1.0).contains(*t))
        {
            return Err(ScrollspyError::Options(format!(
                "threshold {bad} is outside [0, 1]"
            )));
        }
        for (name, value) in [
            ("pastTolerancePx", self.past_tolerance_px),
            ("scrolledThresholdPx", self.scrolled_threshold_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScrollspyError::Options(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        self.level()?;
        Ok(())
    }

    /// Log level parsed from `log_level`.
    pub fn level(&self) -> Result<log::Level> {
        self.log_level.parse::<log::Level>().map_err(|_| {
            ScrollspyError::Options(format!("unknown log level '{}'", self.log_level))
        })
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
    fn test_empty_object_gives_defaults() {
        let config = LocatorConfig::from_json("{}").unwrap();
        assert_eq!(config, LocatorConfig::default());
        assert_eq!(config.thresholds, vec![0.0, 0.1, 0.25, 0.5, 0.75]);
        assert_eq!(config.root_margin, "-10% 0px -40% 0px");
    }

    #[test]
    fn test_camel_case_fields() {
        let config =
            LocatorConfig::from_json(r#"{"activeClass":"current","strategy":"distance"}"#)
                .unwrap();
        assert_eq!(config.active_class, "current");
        assert_eq!(config.strategy, StrategyMode::Distance);
        assert_eq!(config.past_tolerance_px, DEFAULT_PAST_TOLERANCE_PX);
    }

    #[test]
    fn test_default_tolerance_matches_distance_policy() {
        let tolerance = LocatorConfig::default().past_tolerance_px;
        assert_eq!(tolerance, crate::locator::DistancePolicy::default().tolerance);
        assert_eq!(tolerance, 4.0);
    }

    #[test]
    fn test_rejects_threshold_above_one() {
        let err = LocatorConfig::from_json(r#"{"thresholds":[0.5, 1.5]}"#).unwrap_err();
        assert!(err.to_string().contains("1.5"), "got {err}");
    }

    #[test]
    fn test_rejects_empty_thresholds() {
        assert!(LocatorConfig::from_json(r#"{"thresholds":[]}"#).is_err());
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        assert!(LocatorConfig::from_json(r#"{"pastTolerancePx":-1}"#).is_err());
    }

    #[test]
    fn test_rejects_blank_selector() {
        let err = LocatorConfig::from_json(r#"{"navSelector":"  "}"#).unwrap_err();
        assert!(err.to_string().contains("navSelector"));
    }

    #[test]
    fn test_log_level() {
        let config = LocatorConfig::from_json(r#"{"logLevel":"debug"}"#).unwrap();
        assert_eq!(config.level().unwrap(), log::Level::Debug);
        assert!(LocatorConfig::from_json(r#"{"logLevel":"chatty"}"#).is_err());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Ratio".parse::<StrategyMode>().unwrap(), StrategyMode::Ratio);
        assert_eq!(" both ".parse::<StrategyMode>().unwrap(), StrategyMode::Both);
        assert!("nearest".parse::<StrategyMode>().is_err());
        assert!(StrategyMode::Distance.uses_distance());
        assert!(!StrategyMode::Distance.uses_ratio());
    }
}
