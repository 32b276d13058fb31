//! Adapter configuration.
//!
//! DESIGN
//! ======
//! `AdaptSettings` is the plain, serializable shape (every field defaulted, so
//! an empty JSON object is valid). `AdaptConfig` is the validated form the
//! rest of the crate consumes: the user-agent pattern is compiled once and the
//! millisecond fields become `Duration`s.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_MOBILE_USER_AGENT_PATTERN, DEFAULT_MOBILE_WIDTH_PX, DEFAULT_NAVBAR_SCROLLED_OFFSET_PX,
    DEFAULT_ORIENTATION_DELAY_MS, DEFAULT_RESIZE_DEBOUNCE_MS, DEFAULT_SCROLL_DEBOUNCE_MS,
    DEFAULT_TABLE_SELECTOR, DEFAULT_TOUCH_FEEDBACK_MS,
};
use crate::error::{AdaptError, Result};
use crate::selector::SelectorList;

/// Raw settings as written by the page (usually a JSON blob).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptSettings {
    /// Width in CSS pixels at or below which the viewport counts as mobile.
    pub mobile_width_px: f64,
    /// Regex matched case-insensitively against the user agent.
    pub mobile_user_agent_pattern: String,
    pub resize_debounce_ms: u64,
    pub scroll_debounce_ms: u64,
    pub orientation_delay_ms: u64,
    pub touch_feedback_ms: u64,
    pub navbar_scrolled_offset_px: f64,
    /// Selector for table-like elements eligible for card conversion.
    pub table_selector: String,
}

impl Default for AdaptSettings {
    fn default() -> Self {
        Self {
            mobile_width_px: DEFAULT_MOBILE_WIDTH_PX,
            mobile_user_agent_pattern: DEFAULT_MOBILE_USER_AGENT_PATTERN.to_owned(),
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            scroll_debounce_ms: DEFAULT_SCROLL_DEBOUNCE_MS,
            orientation_delay_ms: DEFAULT_ORIENTATION_DELAY_MS,
            touch_feedback_ms: DEFAULT_TOUCH_FEEDBACK_MS,
            navbar_scrolled_offset_px: DEFAULT_NAVBAR_SCROLLED_OFFSET_PX,
            table_selector: DEFAULT_TABLE_SELECTOR.to_owned(),
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct AdaptConfig {
    mobile_width_px: f64,
    mobile_user_agent: Regex,
    table_selector: SelectorList,
    pub resize_debounce: Duration,
    pub scroll_debounce: Duration,
    pub orientation_delay: Duration,
    pub touch_feedback: Duration,
    pub navbar_scrolled_offset_px: f64,
}

impl AdaptConfig {
    /// Validate `settings`.
    ///
    /// # Errors
    ///
    /// Fails when the width is not a positive finite number, the pattern does
    /// not compile, or the table selector is outside the supported subset.
    pub fn new(settings: AdaptSettings) -> Result<Self> {
        if !settings.mobile_width_px.is_finite() || settings.mobile_width_px <= 0.0 {
            return Err(AdaptError::Config(format!(
                "mobile_width_px must be positive, got {}",
                settings.mobile_width_px
            )));
        }
        let mobile_user_agent = RegexBuilder::new(&settings.mobile_user_agent_pattern)
            .case_insensitive(true)
            .build()?;
        let table_selector = SelectorList::parse(&settings.table_selector)?;

        Ok(Self {
            mobile_width_px: settings.mobile_width_px,
            mobile_user_agent,
            table_selector,
            resize_debounce: Duration::from_millis(settings.resize_debounce_ms),
            scroll_debounce: Duration::from_millis(settings.scroll_debounce_ms),
            orientation_delay: Duration::from_millis(settings.orientation_delay_ms),
            touch_feedback: Duration::from_millis(settings.touch_feedback_ms),
            navbar_scrolled_offset_px: settings.navbar_scrolled_offset_px,
        })
    }

    /// Configuration with every default.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in defaults are themselves invalid.
    pub fn with_defaults() -> Result<Self> {
        Self::new(AdaptSettings::default())
    }

    /// Parse settings from JSON and validate them. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::Json`] for malformed JSON, otherwise as [`AdaptConfig::new`].
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: AdaptSettings = serde_json::from_str(json)?;
        Self::new(settings)
    }

    #[must_use]
    pub fn mobile_width_px(&self) -> f64 {
        self.mobile_width_px
    }

    /// Whether `width` is at or below the mobile threshold.
    #[must_use]
    pub fn is_mobile_width(&self, width: f64) -> bool {
        width <= self.mobile_width_px
    }

    #[must_use]
    pub fn is_mobile_user_agent(&self, user_agent: &str) -> bool {
        self.mobile_user_agent.is_match(user_agent)
    }

    #[must_use]
    pub fn table_selector(&self) -> &SelectorList {
        &self.table_selector
    }
}
