//! Page-level mobile tweaks.
//!
//! Everything here is stateless with respect to the page: each method reads
//! the document, toggles classes/attributes/styles, and returns. Event wiring
//! (which element was clicked, when a touch ended) is done by the caller; the
//! methods take the already-resolved target node.

#[cfg(test)]
#[path = "optimizer_test.rs"]
mod optimizer_test;

use crate::config::AdaptConfig;
use crate::consts::{
    FOCUS_MARGIN_PX, FOCUS_NAVBAR_DESKTOP_PX, FOCUS_NAVBAR_MOBILE_PX, LAZY_CLASS, MOBILE_DEVICE_CLASS,
    MODAL_MOBILE_CLASS, NAVBAR_HEIGHT_LANDSCAPE, NAVBAR_HEIGHT_PORTRAIT, ORIENTATION_ATTRIBUTE, PAGE_CLASSES,
    REDUCE_MOTION_CLASS, SCROLLED_CLASS, SHOW_CLASS, TOUCH_ACTIVE_CLASS, TOUCH_DEVICE_CLASS,
    VIEWPORT_META_CONTENT,
};
use crate::device::{Orientation, UiState};
use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::selector::SelectorList;

struct Selectors {
    viewport_meta: SelectorList,
    navbar: SelectorList,
    navbar_toggler: SelectorList,
    navbar_collapse: SelectorList,
    nav_link: SelectorList,
    touch_scroll: SelectorList,
    touch_feedback: SelectorList,
    tap_buttons: SelectorList,
    form_fields: SelectorList,
    forms: SelectorList,
    modals: SelectorList,
    modal_backdrop: SelectorList,
    animated: SelectorList,
    lazy_images: SelectorList,
    anchors: SelectorList,
    page: Vec<(SelectorList, &'static str)>,
}

impl Selectors {
    fn new() -> Result<Self> {
        let page = PAGE_CLASSES
            .iter()
            .map(|(selector, class)| Ok((SelectorList::parse(selector)?, *class)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            viewport_meta: SelectorList::parse(r#"meta[name="viewport"]"#)?,
            navbar: SelectorList::parse(".navbar.glassmorphism")?,
            navbar_toggler: SelectorList::parse(".navbar-toggler")?,
            navbar_collapse: SelectorList::parse(".navbar-collapse")?,
            nav_link: SelectorList::parse(".nav-link")?,
            touch_scroll: SelectorList::parse(".table-responsive, .sidebar, .modal-body")?,
            touch_feedback: SelectorList::parse(".btn, .nav-link, .list-group-item, .card")?,
            tap_buttons: SelectorList::parse("button, .btn, a.btn")?,
            form_fields: SelectorList::parse("input, textarea, select")?,
            forms: SelectorList::parse("form")?,
            modals: SelectorList::parse(".modal")?,
            modal_backdrop: SelectorList::parse(".modal-backdrop")?,
            animated: SelectorList::parse(".fade-in, .slide-up")?,
            lazy_images: SelectorList::parse("img[data-src]")?,
            anchors: SelectorList::parse(r##"a[href^="#"]"##)?,
            page,
        })
    }
}

/// Applies and removes the page-level mobile adjustments.
pub struct MobileOptimizer {
    selectors: Selectors,
    scrolled_offset_px: f64,
}

impl MobileOptimizer {
    /// # Errors
    ///
    /// Only fails if the built-in selectors fail to parse.
    pub fn new(config: &AdaptConfig) -> Result<Self> {
        Ok(Self { selectors: Selectors::new()?, scrolled_offset_px: config.navbar_scrolled_offset_px })
    }

    /// Apply every mobile adjustment for `ui`.
    ///
    /// # Errors
    ///
    /// Propagates the first failing DOM mutation.
    pub fn apply<D: Dom + ?Sized>(&self, dom: &mut D, ui: &UiState) -> Result<()> {
        let root = dom.root();
        if let Some(body) = dom.body() {
            dom.add_class(body, MOBILE_DEVICE_CLASS)?;
            if ui.touch {
                dom.add_class(body, TOUCH_DEVICE_CLASS)?;
            }
            if ui.reduced_motion {
                dom.add_class(body, REDUCE_MOTION_CLASS)?;
            }
        }
        if let Some(meta) = dom.query(root, &self.selectors.viewport_meta) {
            dom.set_attribute(meta, "content", VIEWPORT_META_CONTENT)?;
        }
        if ui.touch {
            for element in dom.query_all(root, &self.selectors.touch_scroll) {
                dom.set_style(element, "-webkit-overflow-scrolling", "touch")?;
            }
        }
        self.apply_orientation(dom, ui.orientation)?;
        self.optimize_forms(dom)?;
        self.optimize_modals(dom)?;
        for element in dom.query_all(root, &self.selectors.animated) {
            dom.set_style(element, "will-change", "transform, opacity")?;
        }
        self.apply_page_classes(dom)
    }

    /// Record the orientation on `<body>` and size the navbar for it.
    ///
    /// # Errors
    ///
    /// Propagates the first failing DOM mutation.
    pub fn apply_orientation<D: Dom + ?Sized>(&self, dom: &mut D, orientation: Orientation) -> Result<()> {
        let height = match orientation {
            Orientation::Landscape => NAVBAR_HEIGHT_LANDSCAPE,
            Orientation::Portrait => NAVBAR_HEIGHT_PORTRAIT,
        };
        if let Some(body) = dom.body() {
            dom.set_attribute(body, ORIENTATION_ATTRIBUTE, orientation.as_str())?;
            dom.set_style(body, "padding-top", height)?;
        }
        if let Some(navbar) = dom.query(dom.root(), &self.selectors.navbar) {
            dom.set_style(navbar, "height", height)?;
        }
        Ok(())
    }

    /// Undo the mobile adjustments when the device stops being mobile.
    ///
    /// # Errors
    ///
    /// Propagates the first failing DOM mutation.
    pub fn remove<D: Dom + ?Sized>(&self, dom: &mut D) -> Result<()> {
        if let Some(body) = dom.body() {
            dom.remove_class(body, MOBILE_DEVICE_CLASS)?;
            dom.remove_class(body, TOUCH_DEVICE_CLASS)?;
        }
        let root = dom.root();
        for (selector, class) in &self.selectors.page {
            for element in dom.query_all(root, selector) {
                dom.remove_class(element, class)?;
            }
        }
        Ok(())
    }

    /// Re-apply the per-page classes, e.g. after new content was inserted.
    ///
    /// # Errors
    ///
    /// Propagates the first failing DOM mutation.
    pub fn refresh<D: Dom + ?Sized>(&self, dom: &mut D, ui: &UiState) -> Result<()> {
        if ui.mobile { self.apply_page_classes(dom) } else { Ok(()) }
    }

    fn apply_page_classes<D: Dom + ?Sized>(&self, dom: &mut D) -> Result<()> {
        let root = dom.root();
        for (selector, class) in &self.selectors.page {
            for element in dom.query_all(root, selector) {
                dom.add_class(element, class)?;
            }
        }
        Ok(())
    }

    fn optimize_forms<D: Dom + ?Sized>(&self, dom: &mut D) -> Result<()> {
        for field in self.form_fields(&*dom) {
            let is_text = dom.attribute(field, "type").is_none_or(|t| t.eq_ignore_ascii_case("text"))
                && dom.tag_name(field) == "input";
            let name = dom.attribute(field, "name").unwrap_or_default();
            if is_text && name.contains("email") {
                dom.set_attribute(field, "type", "email")?;
                dom.set_attribute(field, "autocapitalize", "off")?;
            } else if is_text && name.contains("phone") {
                dom.set_attribute(field, "type", "tel")?;
            }
            dom.set_attribute(field, "autocomplete", "on")?;
            dom.set_attribute(field, "autocorrect", "on")?;
        }
        Ok(())
    }

    fn optimize_modals<D: Dom + ?Sized>(&self, dom: &mut D) -> Result<()> {
        for modal in dom.query_all(dom.root(), &self.selectors.modals) {
            dom.add_class(modal, MODAL_MOBILE_CLASS)?;
        }
        Ok(())
    }

    /// Inputs, textareas and selects inside forms; these scroll into view on focus.
    #[must_use]
    pub fn form_fields<D: Dom + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        dom.query_all(dom.root(), &self.selectors.forms)
            .into_iter()
            .flat_map(|form| dom.query_all(form, &self.selectors.form_fields))
            .collect()
    }

    /// Elements that get `touch-active` feedback.
    #[must_use]
    pub fn touch_feedback_targets<D: Dom + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        dom.query_all(dom.root(), &self.selectors.touch_feedback)
    }

    /// Buttons whose `touchend` is turned into an immediate click.
    #[must_use]
    pub fn tap_buttons<D: Dom + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        dom.query_all(dom.root(), &self.selectors.tap_buttons)
    }

    /// Images waiting for their `data-src`.
    #[must_use]
    pub fn lazy_images<D: Dom + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        dom.query_all(dom.root(), &self.selectors.lazy_images)
    }

    /// In-page anchors eligible for smooth scrolling.
    #[must_use]
    pub fn anchors<D: Dom + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        dom.query_all(dom.root(), &self.selectors.anchors)
    }

    /// Modals paired with their backdrop element, if they have one.
    #[must_use]
    pub fn modal_backdrops<D: Dom + ?Sized>(&self, dom: &D) -> Vec<(NodeId, NodeId)> {
        dom.query_all(dom.root(), &self.selectors.modals)
            .into_iter()
            .filter_map(|modal| dom.query(modal, &self.selectors.modal_backdrop).map(|b| (modal, b)))
            .collect()
    }

    /// Links inside the collapsible navbar.
    #[must_use]
    pub fn nav_links<D: Dom + ?Sized>(&self, dom: &D) -> Vec<NodeId> {
        let Some(collapse) = dom.query(dom.root(), &self.selectors.navbar_collapse) else {
            return Vec::new();
        };
        dom.query_all(collapse, &self.selectors.nav_link)
    }

    /// Toggle the navbar's `scrolled` class for the current scroll offset.
    ///
    /// # Errors
    ///
    /// Propagates a failing DOM mutation.
    pub fn on_scroll<D: Dom + ?Sized>(&self, dom: &mut D, scroll_y: f64) -> Result<()> {
        let Some(navbar) = dom.query(dom.root(), &self.selectors.navbar) else {
            return Ok(());
        };
        if scroll_y > self.scrolled_offset_px {
            dom.add_class(navbar, SCROLLED_CLASS)
        } else {
            dom.remove_class(navbar, SCROLLED_CLASS)
        }
    }

    /// Close the open navbar collapse when a click lands outside the navbar controls.
    ///
    /// Returns `true` when the menu was closed.
    ///
    /// # Errors
    ///
    /// Propagates a failing DOM mutation.
    pub fn on_document_click<D: Dom + ?Sized>(&self, dom: &mut D, target: NodeId) -> Result<bool> {
        let root = dom.root();
        let (Some(toggler), Some(collapse)) = (
            dom.query(root, &self.selectors.navbar_toggler),
            dom.query(root, &self.selectors.navbar_collapse),
        ) else {
            return Ok(false);
        };
        if dom.contains(toggler, target) || dom.contains(collapse, target) {
            return Ok(false);
        }
        self.close_collapse(dom, collapse)
    }

    /// Close the navbar collapse after one of its links was followed.
    ///
    /// # Errors
    ///
    /// Propagates a failing DOM mutation.
    pub fn on_nav_link_click<D: Dom + ?Sized>(&self, dom: &mut D) -> Result<bool> {
        match dom.query(dom.root(), &self.selectors.navbar_collapse) {
            Some(collapse) => self.close_collapse(dom, collapse),
            None => Ok(false),
        }
    }

    fn close_collapse<D: Dom + ?Sized>(&self, dom: &mut D, collapse: NodeId) -> Result<bool> {
        if !dom.has_class(collapse, SHOW_CLASS) {
            return Ok(false);
        }
        dom.remove_class(collapse, SHOW_CLASS)?;
        Ok(true)
    }

    /// Hide `modal` after a click on its backdrop.
    ///
    /// # Errors
    ///
    /// Propagates a failing DOM mutation.
    pub fn on_backdrop_click<D: Dom + ?Sized>(&self, dom: &mut D, modal: NodeId) -> Result<()> {
        dom.remove_class(modal, SHOW_CLASS)
    }

    /// Swap in the real image source once `image` scrolls into view.
    ///
    /// # Errors
    ///
    /// Propagates a failing DOM mutation.
    pub fn reveal_image<D: Dom + ?Sized>(&self, dom: &mut D, image: NodeId) -> Result<()> {
        if let Some(src) = dom.attribute(image, "data-src") {
            dom.set_attribute(image, "src", &src)?;
        }
        dom.remove_class(image, LAZY_CLASS)
    }

    /// # Errors
    ///
    /// Propagates a failing DOM mutation.
    pub fn touch_start<D: Dom + ?Sized>(&self, dom: &mut D, element: NodeId) -> Result<()> {
        dom.add_class(element, TOUCH_ACTIVE_CLASS)
    }

    /// # Errors
    ///
    /// Propagates a failing DOM mutation.
    pub fn clear_touch<D: Dom + ?Sized>(&self, dom: &mut D, element: NodeId) -> Result<()> {
        dom.remove_class(element, TOUCH_ACTIVE_CLASS)
    }

    /// Element an in-page anchor points at. `None` for a bare `#` or a missing target.
    ///
    /// The fragment is an element id, matched verbatim rather than parsed as a selector.
    #[must_use]
    pub fn anchor_target<D: Dom + ?Sized>(&self, dom: &D, link: NodeId) -> Option<NodeId> {
        let href = dom.attribute(link, "href")?;
        let fragment = href.strip_prefix('#').filter(|id| !id.is_empty())?;
        let target = dom.element_by_id(fragment);
        if target.is_none() {
            log::debug!("anchor {link}: no element with id {fragment:?}");
        }
        target
    }
}

/// Scroll offset that brings an element at `element_top` just below the navbar.
#[must_use]
pub fn focus_scroll_top(element_top: f64, mobile: bool) -> f64 {
    let navbar = if mobile { FOCUS_NAVBAR_MOBILE_PX } else { FOCUS_NAVBAR_DESKTOP_PX };
    element_top - navbar - FOCUS_MARGIN_PX
}
