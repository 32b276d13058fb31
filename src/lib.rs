//! Mobile presentation adapter for server-rendered pages.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It classifies
//! the device (mobile, touch, orientation), converts data tables into stacked
//! cards in portrait orientation, and applies the page-level tweaks a small
//! screen needs. All logic runs against the [`dom::Dom`] trait, so everything
//! except the `web` bridge is testable without a browser.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`presenter`] | Reversible table/card transformation and per-table state |
//! | [`viewport`] | Debounced viewport/orientation monitor driving the presenter |
//! | [`optimizer`] | Page-level mobile tweaks (body classes, forms, nav, modals) |
//! | [`device`] | Device classification and orientation |
//! | [`config`] | Thresholds, delays and the mobile user-agent pattern |
//! | [`dom`] | Document boundary trait and node identity |
//! | [`doc`] | In-memory document implementing [`dom::Dom`] |
//! | [`registry`] | Id slots for host nodes without numeric identity |
//! | [`selector`] | CSS selector subset used for queries |
//! | [`timer`] | Cancellable timers and debouncing |
//! | [`consts`] | Class names, attribute values and default numbers |
//! | [`error`] | Crate error type |
//! | `web` | `web-sys` bridge and WASM entry point (feature `web`) |

pub mod config;
pub mod consts;
pub mod device;
pub mod doc;
pub mod dom;
pub mod error;
pub mod optimizer;
pub mod presenter;
pub mod registry;
pub mod selector;
pub mod timer;
pub mod viewport;

#[cfg(feature = "web")]
pub mod web;

pub use config::{AdaptConfig, AdaptSettings};
pub use device::{DeviceProbe, Orientation, UiState, Viewport};
pub use dom::{Dom, NodeId};
pub use error::{AdaptError, Result};
pub use presenter::{DisplayMode, ResponsiveTablePresenter, TransformState};
pub use viewport::ViewportMonitor;
