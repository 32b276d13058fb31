//! DOM event wiring.
//!
//! Window-level listeners (`resize`, `orientationchange`, `scroll`, document
//! clicks) are always installed so a desktop window that shrinks still adapts.
//! Element-level listeners follow the device detected at boot: the mobile set
//! only on a mobile device, touch feedback only on a touch device.
//!
//! Closures live for the page lifetime and are leaked with `forget`.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions,
    Window,
};

use super::dom::js_err;
use super::{App, dispatch, read_viewport};
use crate::dom::NodeId;
use crate::error::Result;
use crate::optimizer::focus_scroll_top;

pub(super) fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<()> {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(js_err)?;
    callback.forget();
    Ok(())
}

fn listen_with(
    target: &EventTarget,
    event: &str,
    options: &AddEventListenerOptions,
    handler: impl FnMut(Event) + 'static,
) -> Result<()> {
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            options,
        )
        .map_err(js_err)?;
    callback.forget();
    Ok(())
}

pub(super) fn listen_once(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) -> Result<()> {
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    listen_with(target, event, &options, handler)
}

fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|target| target.dyn_ref::<Element>().cloned())
}

/// Element handles for everything the per-element listeners attach to,
/// resolved in one borrow of the app.
struct Targets {
    mobile: bool,
    touch: bool,
    feedback: Vec<Element>,
    tap_buttons: Vec<Element>,
    form_fields: Vec<Element>,
    anchors: Vec<Element>,
    nav_links: Vec<Element>,
    backdrops: Vec<(Element, Element)>,
    lazy_images: Vec<Element>,
}

impl App {
    fn elements(&self, ids: Vec<NodeId>) -> Vec<Element> {
        ids.into_iter()
            .filter_map(|id| match self.dom.element(id) {
                Ok(element) => Some(element),
                Err(err) => {
                    log::debug!("skipping listener target: {err}");
                    None
                }
            })
            .collect()
    }

    fn targets(&self) -> Targets {
        let optimizer = self.monitor.optimizer();
        let dom = &self.dom;
        Targets {
            mobile: self.monitor.ui().mobile,
            touch: self.monitor.ui().touch,
            feedback: self.elements(optimizer.touch_feedback_targets(dom)),
            tap_buttons: self.elements(optimizer.tap_buttons(dom)),
            form_fields: self.elements(optimizer.form_fields(dom)),
            anchors: self.elements(optimizer.anchors(dom)),
            nav_links: self.elements(optimizer.nav_links(dom)),
            backdrops: optimizer
                .modal_backdrops(dom)
                .into_iter()
                .filter_map(|(modal, backdrop)| match (dom.element(modal), dom.element(backdrop)) {
                    (Ok(modal), Ok(backdrop)) => Some((modal, backdrop)),
                    _ => None,
                })
                .collect(),
            lazy_images: self.elements(optimizer.lazy_images(dom)),
        }
    }
}

pub(super) fn install(app: &Rc<RefCell<App>>, window: &Window, document: &Document) -> Result<()> {
    install_window(app, window, document)?;

    let targets = app.borrow().targets();
    if !targets.mobile {
        return Ok(());
    }
    if targets.touch {
        install_touch(app, &targets)?;
    }
    install_navigation(app, &targets)?;
    install_forms(window, &targets)?;
    install_modals(app, &targets)?;
    install_anchors(app, &targets)?;
    if let Err(err) = install_lazy_images(app, &targets) {
        log::warn!("lazy loading unavailable: {err}");
    }
    Ok(())
}

// ── Window ──────────────────────────────────────────────────────

fn install_window(app: &Rc<RefCell<App>>, window: &Window, document: &Document) -> Result<()> {
    {
        let app = Rc::clone(app);
        let win = window.clone();
        listen(window, "resize", move |_event| {
            let viewport = read_viewport(&win);
            dispatch(&app, |app| app.on_resize(viewport));
        })?;
    }
    {
        let app = Rc::clone(app);
        let win = window.clone();
        listen(window, "orientationchange", move |_event| {
            let viewport = read_viewport(&win);
            dispatch(&app, |app| app.on_orientation_change(viewport));
        })?;
    }
    {
        let app = Rc::clone(app);
        let win = window.clone();
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        listen_with(window, "scroll", &options, move |_event| {
            let scroll_y = win.scroll_y().unwrap_or(0.0);
            dispatch(&app, |app| app.on_scroll(scroll_y));
        })?;
    }
    let app = Rc::clone(app);
    listen(document, "click", move |event| {
        if let Some(target) = event_element(&event) {
            dispatch(&app, |app| app.on_document_click(&target));
        }
    })
}

// ── Elements ────────────────────────────────────────────────────

fn install_touch(app: &Rc<RefCell<App>>, targets: &Targets) -> Result<()> {
    for element in &targets.feedback {
        {
            let app = Rc::clone(app);
            let el = element.clone();
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            listen_with(element, "touchstart", &options, move |_event| {
                dispatch(&app, |app| app.on_touch_start(&el));
            })?;
        }
        let app = Rc::clone(app);
        let el = element.clone();
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        listen_with(element, "touchend", &options, move |_event| {
            dispatch(&app, |app| app.on_touch_end(&el));
        })?;
    }
    // A tap fires `click` immediately instead of after the browser's delay.
    // The click re-enters the document handler, so the app must not be borrowed here.
    for button in &targets.tap_buttons {
        let Some(button_el) = button.dyn_ref::<HtmlElement>().cloned() else {
            continue;
        };
        listen(button, "touchend", move |event| {
            event.prevent_default();
            button_el.click();
        })?;
    }
    Ok(())
}

fn install_navigation(app: &Rc<RefCell<App>>, targets: &Targets) -> Result<()> {
    for link in &targets.nav_links {
        let app = Rc::clone(app);
        listen(link, "click", move |_event| {
            dispatch(&app, App::on_nav_link_click);
        })?;
    }
    Ok(())
}

fn install_forms(window: &Window, targets: &Targets) -> Result<()> {
    for field in &targets.form_fields {
        let Some(field_el) = field.dyn_ref::<HtmlElement>().cloned() else {
            continue;
        };
        let win = window.clone();
        listen(field, "focus", move |_event| {
            let options = ScrollToOptions::new();
            options.set_top(focus_scroll_top(f64::from(field_el.offset_top()), true));
            options.set_behavior(ScrollBehavior::Smooth);
            win.scroll_to_with_scroll_to_options(&options);
        })?;
    }
    Ok(())
}

fn install_modals(app: &Rc<RefCell<App>>, targets: &Targets) -> Result<()> {
    for (modal, backdrop) in &targets.backdrops {
        let app = Rc::clone(app);
        let modal = modal.clone();
        listen(backdrop, "click", move |_event| {
            dispatch(&app, |app| app.on_backdrop_click(&modal));
        })?;
    }
    Ok(())
}

fn install_anchors(app: &Rc<RefCell<App>>, targets: &Targets) -> Result<()> {
    for anchor in &targets.anchors {
        let app = Rc::clone(app);
        let link = anchor.clone();
        listen(anchor, "click", move |event| {
            let Some(Some(target)) = dispatch(&app, |app| app.anchor_target(&link)) else {
                return;
            };
            event.prevent_default();
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            target.scroll_into_view_with_scroll_into_view_options(&options);
        })?;
    }
    Ok(())
}

fn install_lazy_images(app: &Rc<RefCell<App>>, targets: &Targets) -> Result<()> {
    if targets.lazy_images.is_empty() {
        return Ok(());
    }
    let app = Rc::clone(app);
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if !entry.is_intersecting() {
                continue;
            }
            let image = entry.target();
            dispatch(&app, |app| app.reveal_image(&image));
            observer.unobserve(&image);
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);
    let observer = IntersectionObserver::new(callback.as_ref().unchecked_ref()).map_err(js_err)?;
    callback.forget();
    for image in &targets.lazy_images {
        observer.observe(image);
    }
    Ok(())
}
