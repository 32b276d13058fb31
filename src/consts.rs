//! Shared constants: default thresholds, class names and selectors.

// ── Defaults ────────────────────────────────────────────────────

/// Viewport width (CSS pixels) at or below which a device counts as mobile.
pub const DEFAULT_MOBILE_WIDTH_PX: f64 = 768.0;

/// User agents treated as mobile regardless of width. Matched case-insensitively.
pub const DEFAULT_MOBILE_USER_AGENT_PATTERN: &str =
    "Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini";

pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;
pub const DEFAULT_SCROLL_DEBOUNCE_MS: u64 = 100;

/// Settle delay after an `orientationchange` before re-reading the viewport.
pub const DEFAULT_ORIENTATION_DELAY_MS: u64 = 100;

/// How long `touch-active` stays on an element after the finger lifts.
pub const DEFAULT_TOUCH_FEEDBACK_MS: u64 = 150;

/// Scroll offset past which the navbar gets the `scrolled` class.
pub const DEFAULT_NAVBAR_SCROLLED_OFFSET_PX: f64 = 50.0;

pub const DEFAULT_TABLE_SELECTOR: &str = ".table";

// ── Layout ──────────────────────────────────────────────────────

pub const NAVBAR_HEIGHT_LANDSCAPE: &str = "50px";
pub const NAVBAR_HEIGHT_PORTRAIT: &str = "60px";

/// Navbar heights used when scrolling a focused input into view.
pub const FOCUS_NAVBAR_MOBILE_PX: f64 = 60.0;
pub const FOCUS_NAVBAR_DESKTOP_PX: f64 = 70.0;
pub const FOCUS_MARGIN_PX: f64 = 20.0;

pub const VIEWPORT_META_CONTENT: &str =
    "width=device-width, initial-scale=1.0, maximum-scale=5.0, user-scalable=yes";

// ── Card markup ─────────────────────────────────────────────────

pub const CARDS_CONTAINER_CLASS: &str = "mobile-table-cards";
pub const CARD_CLASS: &str = "card mb-2";
pub const CARD_BODY_CLASS: &str = "card-body p-3";
pub const CARD_ROW_CLASS: &str = "d-flex justify-content-between align-items-center mb-2";
pub const CARD_LABEL_CLASS: &str = "text-muted me-2";

// ── Body state ──────────────────────────────────────────────────

pub const MOBILE_DEVICE_CLASS: &str = "mobile-device";
pub const TOUCH_DEVICE_CLASS: &str = "touch-device";
pub const REDUCE_MOTION_CLASS: &str = "reduce-motion";
pub const ORIENTATION_ATTRIBUTE: &str = "data-orientation";

pub const TOUCH_ACTIVE_CLASS: &str = "touch-active";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const SHOW_CLASS: &str = "show";
pub const MODAL_MOBILE_CLASS: &str = "modal-mobile";
pub const LAZY_CLASS: &str = "lazy";

/// Page elements and the class each one gets on a mobile device.
pub const PAGE_CLASSES: &[(&str, &str)] = &[
    (".contest-card", "mobile-optimized"),
    (".contest-timer", "mobile-timer"),
    (".problem-description", "mobile-problem"),
    (".sample-io", "mobile-sample-io"),
    (".test-case", "mobile-test-case"),
    (".submission-form", "mobile-submission"),
    (".code-editor", "mobile-code-editor"),
    (".admin-panel", "mobile-admin"),
    (".admin-sidebar", "mobile-sidebar"),
    (".auth-container", "mobile-auth"),
    (".auth-form", "mobile-form"),
    (".leaderboard-table", "mobile-leaderboard"),
    (".rank-badge", "mobile-badge"),
];
