//! Device classification: mobile, touch, orientation.
//!
//! `UiState` is the single source of truth for "what kind of device is this"
//! and is updated by the viewport monitor on every settled resize or
//! orientation change.

#[cfg(test)]
#[path = "device_test.rs"]
mod device_test;

use serde::{Deserialize, Serialize};

use crate::config::AdaptConfig;

/// Viewport orientation, derived from the inner window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl Orientation {
    /// Portrait when the viewport is taller than it is wide. A square viewport is landscape.
    #[must_use]
    pub fn from_viewport(viewport: Viewport) -> Self {
        if viewport.height > viewport.width { Self::Portrait } else { Self::Landscape }
    }

    /// Value written to the body's `data-orientation` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

/// Inner window size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn orientation(self) -> Orientation {
        Orientation::from_viewport(self)
    }
}

/// Raw environment facts read from the browser at start-up.
#[derive(Debug, Clone, Default)]
pub struct DeviceProbe {
    pub user_agent: String,
    pub viewport: Viewport,
    /// `navigator.maxTouchPoints`.
    pub max_touch_points: u32,
    /// Whether `ontouchstart` exists on the window.
    pub touch_events: bool,
    /// `(prefers-reduced-motion: reduce)` matched.
    pub prefers_reduced_motion: bool,
}

/// Current device classification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UiState {
    pub mobile: bool,
    pub touch: bool,
    pub reduced_motion: bool,
    pub orientation: Orientation,
    pub viewport: Viewport,
}

impl UiState {
    /// Classify the device at start-up.
    ///
    /// Mobile when the user agent matches the configured pattern or the
    /// viewport is at or below the width threshold. Touch when touch events
    /// exist or the device reports any touch points.
    #[must_use]
    pub fn detect(probe: &DeviceProbe, config: &AdaptConfig) -> Self {
        Self {
            mobile: config.is_mobile_user_agent(&probe.user_agent)
                || config.is_mobile_width(probe.viewport.width),
            touch: probe.touch_events || probe.max_touch_points > 0,
            reduced_motion: probe.prefers_reduced_motion,
            orientation: probe.viewport.orientation(),
            viewport: probe.viewport,
        }
    }

    /// Record a new viewport and recompute orientation.
    ///
    /// Returns `true` when the orientation changed.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        let orientation = viewport.orientation();
        let changed = orientation != self.orientation;
        self.viewport = viewport;
        self.orientation = orientation;
        changed
    }
}
