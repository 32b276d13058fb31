//! Browser bridge and WASM entry point.
//!
//! `start` runs when the module is instantiated. Once the DOM is ready it
//! reads the optional JSON config from `<script id="mobile-adapt-config">`,
//! probes the device, builds one [`App`] (a [`WebDom`] plus a
//! [`ViewportMonitor`]) and wires window and element events to it.
//!
//! Every event handler goes through [`dispatch`], which borrows the app for
//! the duration of one call and drops re-entrant events instead of panicking.

mod dom;
mod listeners;
mod timers;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Window};

pub use dom::WebDom;
pub use timers::BrowserTimers;

use crate::config::AdaptConfig;
use crate::device::{DeviceProbe, UiState, Viewport};
use crate::dom::Dom;
use crate::error::Result;
use crate::timer::TimerId;
use crate::viewport::ViewportMonitor;

/// Id of the optional `<script type="application/json">` holding settings.
pub const CONFIG_ELEMENT_ID: &str = "mobile-adapt-config";

/// Everything the page-level adapter owns.
pub struct App {
    dom: WebDom,
    monitor: ViewportMonitor<BrowserTimers>,
}

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
}

impl App {
    fn on_timer(&mut self, id: TimerId) {
        if let Err(err) = self.monitor.on_timer(&mut self.dom, id) {
            log::warn!("timer {id:?}: {err}");
        }
    }

    fn on_resize(&mut self, viewport: Viewport) {
        self.monitor.on_resize(viewport);
    }

    fn on_orientation_change(&mut self, viewport: Viewport) {
        self.monitor.on_orientation_change(viewport);
    }

    fn on_scroll(&mut self, scroll_y: f64) {
        self.monitor.on_scroll(scroll_y);
    }

    fn on_document_click(&mut self, target: &Element) {
        if !self.monitor.ui().mobile {
            return;
        }
        let target = self.dom.id_of(target);
        if let Err(err) = self.monitor.optimizer().on_document_click(&mut self.dom, target) {
            log::warn!("navbar close failed: {err}");
        }
    }

    fn on_nav_link_click(&mut self) {
        if !self.monitor.ui().mobile {
            return;
        }
        if let Err(err) = self.monitor.optimizer().on_nav_link_click(&mut self.dom) {
            log::warn!("navbar close failed: {err}");
        }
    }

    fn on_backdrop_click(&mut self, modal: &Element) {
        let modal = self.dom.id_of(modal);
        if let Err(err) = self.monitor.optimizer().on_backdrop_click(&mut self.dom, modal) {
            log::warn!("modal {modal}: {err}");
        }
    }

    fn on_touch_start(&mut self, element: &Element) {
        let element = self.dom.id_of(element);
        if let Err(err) = self.monitor.on_touch_start(&mut self.dom, element) {
            log::warn!("touch feedback {element}: {err}");
        }
    }

    fn on_touch_end(&mut self, element: &Element) {
        let element = self.dom.id_of(element);
        self.monitor.on_touch_end(element);
    }

    fn reveal_image(&mut self, image: &Element) {
        let image = self.dom.id_of(image);
        if let Err(err) = self.monitor.optimizer().reveal_image(&mut self.dom, image) {
            log::warn!("lazy image {image}: {err}");
        }
    }

    fn anchor_target(&self, link: &Element) -> Option<Element> {
        let link = self.dom.id_of(link);
        let target = self.monitor.optimizer().anchor_target(&self.dom, link)?;
        match self.dom.element(target) {
            Ok(element) => Some(element),
            Err(err) => {
                log::debug!("anchor {link}: {err}");
                None
            }
        }
    }

    fn refresh(&mut self) {
        if let Err(err) = self.monitor.refresh(&mut self.dom) {
            log::warn!("refresh failed: {err}");
        }
    }
}

/// Run `f` against the app unless it is already borrowed by an outer event.
pub(crate) fn dispatch<R>(app: &Rc<RefCell<App>>, f: impl FnOnce(&mut App) -> R) -> Option<R> {
    match app.try_borrow_mut() {
        Ok(mut guard) => Some(f(&mut guard)),
        Err(_) => {
            log::warn!("adapter busy; dropping re-entrant event");
            None
        }
    }
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    let app = APP.with(|slot| slot.borrow().clone())?;
    dispatch(&app, f)
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        log::debug!("logger already installed: {err}");
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    if document.ready_state() != "loading" {
        boot_logged(&window, &document);
        return;
    }
    let ready = {
        let window = window.clone();
        let document = document.clone();
        move |_event: web_sys::Event| boot_logged(&window, &document)
    };
    if let Err(err) = listeners::listen_once(&document, "DOMContentLoaded", ready) {
        log::error!("mobile adapter not started: {err}");
    }
}

fn boot_logged(window: &Window, document: &Document) {
    if let Err(err) = boot(window, document) {
        log::error!("mobile adapter not started: {err}");
    }
}

fn boot(window: &Window, document: &Document) -> Result<()> {
    let config = read_config(document)?;
    let ui = UiState::detect(&probe_device(window), &config);
    let dom = WebDom::new(document.clone())?;
    let scope = dom.body().unwrap_or(dom.root());
    let monitor = ViewportMonitor::new(config, ui, scope, BrowserTimers::new())?;

    let app = Rc::new(RefCell::new(App { dom, monitor }));
    {
        let mut guard = app.borrow_mut();
        let App { dom, monitor } = &mut *guard;
        monitor.timers_mut().bind(Rc::downgrade(&app));
        monitor.start(dom)?;
    }
    listeners::install(&app, window, document)?;
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

fn read_config(document: &Document) -> Result<AdaptConfig> {
    match document.get_element_by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content()) {
        Some(json) if !json.trim().is_empty() => AdaptConfig::from_json(&json),
        _ => AdaptConfig::with_defaults(),
    }
}

fn probe_device(window: &Window) -> DeviceProbe {
    let navigator = window.navigator();
    DeviceProbe {
        user_agent: navigator.user_agent().unwrap_or_default(),
        viewport: read_viewport(window),
        max_touch_points: u32::try_from(navigator.max_touch_points()).unwrap_or(0),
        touch_events: js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("ontouchstart")).unwrap_or(false),
        prefers_reduced_motion: matches!(
            window.match_media("(prefers-reduced-motion: reduce)"),
            Ok(Some(query)) if query.matches()
        ),
    }
}

pub(crate) fn read_viewport(window: &Window) -> Viewport {
    let dimension = |value: std::result::Result<JsValue, JsValue>| value.map_or(0.0, |v| v.as_f64().unwrap_or(0.0));
    Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

// ── Exported page API ───────────────────────────────────────────

#[wasm_bindgen(js_name = isMobileDevice)]
pub fn is_mobile_device() -> bool {
    with_app(|app| app.monitor.ui().mobile).unwrap_or(false)
}

#[wasm_bindgen(js_name = isTouchDevice)]
pub fn is_touch_device() -> bool {
    with_app(|app| app.monitor.ui().touch).unwrap_or(false)
}

#[wasm_bindgen(js_name = getCurrentOrientation)]
pub fn current_orientation() -> String {
    with_app(|app| app.monitor.ui().orientation.as_str().to_owned()).unwrap_or_default()
}

#[wasm_bindgen(js_name = refreshMobileOptimizations)]
pub fn refresh_mobile_optimizations() {
    with_app(App::refresh);
}
