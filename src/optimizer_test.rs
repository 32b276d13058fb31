use super::*;
use crate::doc::{ElementBuilder, MemoryDom};
use crate::device::Viewport;

struct Page {
    dom: MemoryDom,
    meta: NodeId,
    navbar: NodeId,
    toggler: NodeId,
    collapse: NodeId,
    nav_link: NodeId,
    scroller: NodeId,
    email: NodeId,
    phone: NodeId,
    password: NodeId,
    notes: NodeId,
    loose_input: NodeId,
    modal: NodeId,
    backdrop: NodeId,
    image: NodeId,
    anchor: NodeId,
    section: NodeId,
    contest_card: NodeId,
    fader: NodeId,
}

fn page() -> Page {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    let head = dom.build(dom.root(), ElementBuilder::new("head")).unwrap();
    let meta = dom
        .build(head, ElementBuilder::new("meta").attr("name", "viewport").attr("content", "width=device-width"))
        .unwrap();

    let navbar = dom
        .build(
            body,
            ElementBuilder::new("nav").class("navbar glassmorphism").children([
                ElementBuilder::new("button").class("navbar-toggler"),
                ElementBuilder::new("div")
                    .class("navbar-collapse show")
                    .child(ElementBuilder::new("a").class("nav-link").attr("href", "/contests")),
            ]),
        )
        .unwrap();
    let nav_children = dom.children(navbar);
    let (toggler, collapse) = (nav_children[0], nav_children[1]);
    let nav_link = dom.children(collapse)[0];

    let scroller = dom.build(body, ElementBuilder::new("div").class("table-responsive")).unwrap();

    let form = dom
        .build(
            body,
            ElementBuilder::new("form").class("auth-form").children([
                ElementBuilder::new("input").attr("name", "user_email"),
                ElementBuilder::new("input").attr("type", "text").attr("name", "phone_number"),
                ElementBuilder::new("input").attr("type", "password").attr("name", "email_password"),
                ElementBuilder::new("textarea").attr("name", "notes"),
            ]),
        )
        .unwrap();
    let fields = dom.children(form);
    let loose_input = dom.build(body, ElementBuilder::new("input").attr("name", "search")).unwrap();

    let modal = dom
        .build(
            body,
            ElementBuilder::new("div")
                .class("modal show")
                .child(ElementBuilder::new("div").class("modal-backdrop")),
        )
        .unwrap();
    let backdrop = dom.children(modal)[0];

    let image = dom
        .build(body, ElementBuilder::new("img").class("lazy").attr("data-src", "/img/trophy.png"))
        .unwrap();
    let anchor = dom.build(body, ElementBuilder::new("a").attr("href", "#rules")).unwrap();
    let section = dom.build(body, ElementBuilder::new("section").attr("id", "rules")).unwrap();
    let contest_card = dom.build(body, ElementBuilder::new("div").class("contest-card")).unwrap();
    let fader = dom.build(body, ElementBuilder::new("div").class("fade-in")).unwrap();

    Page {
        dom,
        meta,
        navbar,
        toggler,
        collapse,
        nav_link,
        scroller,
        email: fields[0],
        phone: fields[1],
        password: fields[2],
        notes: fields[3],
        loose_input,
        modal,
        backdrop,
        image,
        anchor,
        section,
        contest_card,
        fader,
    }
}

fn optimizer() -> MobileOptimizer {
    MobileOptimizer::new(&AdaptConfig::with_defaults().unwrap()).unwrap()
}

fn phone_ui() -> UiState {
    UiState {
        mobile: true,
        touch: true,
        reduced_motion: false,
        orientation: Orientation::Portrait,
        viewport: Viewport::new(390.0, 844.0),
    }
}

// =============================================================
// apply / remove
// =============================================================

#[test]
fn apply_marks_body_and_viewport() {
    let mut p = page();
    optimizer().apply(&mut p.dom, &phone_ui()).unwrap();
    let body = p.dom.body_id();

    assert!(p.dom.has_class(body, MOBILE_DEVICE_CLASS));
    assert!(p.dom.has_class(body, TOUCH_DEVICE_CLASS));
    assert!(!p.dom.has_class(body, REDUCE_MOTION_CLASS));
    assert_eq!(p.dom.attribute(body, "data-orientation").as_deref(), Some("portrait"));
    assert_eq!(p.dom.attribute(p.meta, "content").as_deref(), Some(VIEWPORT_META_CONTENT));
}

#[test]
fn apply_sizes_navbar_for_orientation() {
    let mut p = page();
    let opt = optimizer();
    opt.apply(&mut p.dom, &phone_ui()).unwrap();
    assert_eq!(p.dom.style(p.navbar, "height").as_deref(), Some("60px"));
    assert_eq!(p.dom.style(p.dom.body_id(), "padding-top").as_deref(), Some("60px"));

    opt.apply_orientation(&mut p.dom, Orientation::Landscape).unwrap();
    assert_eq!(p.dom.style(p.navbar, "height").as_deref(), Some("50px"));
    assert_eq!(p.dom.attribute(p.dom.body_id(), "data-orientation").as_deref(), Some("landscape"));
}

#[test]
fn apply_tunes_form_fields_inside_forms() {
    let mut p = page();
    optimizer().apply(&mut p.dom, &phone_ui()).unwrap();

    assert_eq!(p.dom.attribute(p.email, "type").as_deref(), Some("email"));
    assert_eq!(p.dom.attribute(p.email, "autocapitalize").as_deref(), Some("off"));
    assert_eq!(p.dom.attribute(p.phone, "type").as_deref(), Some("tel"));
    assert_eq!(p.dom.attribute(p.password, "type").as_deref(), Some("password"));
    assert_eq!(p.dom.attribute(p.notes, "type"), None);
    for field in [p.email, p.phone, p.password, p.notes] {
        assert_eq!(p.dom.attribute(field, "autocomplete").as_deref(), Some("on"));
        assert_eq!(p.dom.attribute(field, "autocorrect").as_deref(), Some("on"));
    }
    assert_eq!(p.dom.attribute(p.loose_input, "autocomplete"), None);
}

#[test]
fn apply_touch_scrolling_only_on_touch_devices() {
    let mut p = page();
    let ui = UiState { touch: false, ..phone_ui() };
    optimizer().apply(&mut p.dom, &ui).unwrap();
    assert!(!p.dom.has_class(p.dom.body_id(), TOUCH_DEVICE_CLASS));
    assert_eq!(p.dom.style(p.scroller, "-webkit-overflow-scrolling"), None);

    let mut p = page();
    optimizer().apply(&mut p.dom, &phone_ui()).unwrap();
    assert_eq!(p.dom.style(p.scroller, "-webkit-overflow-scrolling").as_deref(), Some("touch"));
}

#[test]
fn apply_marks_modals_animations_and_page_elements() {
    let mut p = page();
    let ui = UiState { reduced_motion: true, ..phone_ui() };
    optimizer().apply(&mut p.dom, &ui).unwrap();

    assert!(p.dom.has_class(p.dom.body_id(), REDUCE_MOTION_CLASS));
    assert!(p.dom.has_class(p.modal, MODAL_MOBILE_CLASS));
    assert_eq!(p.dom.style(p.fader, "will-change").as_deref(), Some("transform, opacity"));
    assert!(p.dom.has_class(p.contest_card, "mobile-optimized"));
}

#[test]
fn remove_drops_body_and_page_classes() {
    let mut p = page();
    let opt = optimizer();
    opt.apply(&mut p.dom, &phone_ui()).unwrap();
    opt.remove(&mut p.dom).unwrap();

    let body = p.dom.body_id();
    assert!(!p.dom.has_class(body, MOBILE_DEVICE_CLASS));
    assert!(!p.dom.has_class(body, TOUCH_DEVICE_CLASS));
    assert!(!p.dom.has_class(p.contest_card, "mobile-optimized"));
    assert!(p.dom.has_class(p.contest_card, "contest-card"));
}

#[test]
fn refresh_applies_page_classes_only_when_mobile() {
    let mut p = page();
    let opt = optimizer();
    let desktop = UiState { mobile: false, ..phone_ui() };
    opt.refresh(&mut p.dom, &desktop).unwrap();
    assert!(!p.dom.has_class(p.contest_card, "mobile-optimized"));

    opt.refresh(&mut p.dom, &phone_ui()).unwrap();
    assert!(p.dom.has_class(p.contest_card, "mobile-optimized"));
    assert!(!p.dom.has_class(p.dom.body_id(), MOBILE_DEVICE_CLASS));
}

// =============================================================
// Event handlers
// =============================================================

#[test]
fn scroll_past_offset_marks_navbar() {
    let mut p = page();
    let opt = optimizer();
    opt.on_scroll(&mut p.dom, 51.0).unwrap();
    assert!(p.dom.has_class(p.navbar, SCROLLED_CLASS));
    opt.on_scroll(&mut p.dom, 50.0).unwrap();
    assert!(!p.dom.has_class(p.navbar, SCROLLED_CLASS));
}

#[test]
fn click_outside_navbar_closes_collapse() {
    let mut p = page();
    let opt = optimizer();
    assert!(!opt.on_document_click(&mut p.dom, p.toggler).unwrap());
    assert!(!opt.on_document_click(&mut p.dom, p.nav_link).unwrap());
    assert!(p.dom.has_class(p.collapse, SHOW_CLASS));

    assert!(opt.on_document_click(&mut p.dom, p.section).unwrap());
    assert!(!p.dom.has_class(p.collapse, SHOW_CLASS));
    assert!(!opt.on_document_click(&mut p.dom, p.section).unwrap());
}

#[test]
fn nav_link_click_closes_collapse() {
    let mut p = page();
    let opt = optimizer();
    assert_eq!(opt.nav_links(&p.dom), vec![p.nav_link]);
    assert!(opt.on_nav_link_click(&mut p.dom).unwrap());
    assert!(!p.dom.has_class(p.collapse, SHOW_CLASS));
}

#[test]
fn backdrop_click_hides_modal() {
    let mut p = page();
    let opt = optimizer();
    assert_eq!(opt.modal_backdrops(&p.dom), vec![(p.modal, p.backdrop)]);
    opt.on_backdrop_click(&mut p.dom, p.modal).unwrap();
    assert!(!p.dom.has_class(p.modal, SHOW_CLASS));
}

#[test]
fn reveal_image_swaps_source() {
    let mut p = page();
    let opt = optimizer();
    assert_eq!(opt.lazy_images(&p.dom), vec![p.image]);
    opt.reveal_image(&mut p.dom, p.image).unwrap();
    assert_eq!(p.dom.attribute(p.image, "src").as_deref(), Some("/img/trophy.png"));
    assert!(!p.dom.has_class(p.image, LAZY_CLASS));
}

#[test]
fn touch_feedback_class_toggles() {
    let mut p = page();
    let opt = optimizer();
    opt.touch_start(&mut p.dom, p.nav_link).unwrap();
    assert!(p.dom.has_class(p.nav_link, TOUCH_ACTIVE_CLASS));
    opt.clear_touch(&mut p.dom, p.nav_link).unwrap();
    assert!(!p.dom.has_class(p.nav_link, TOUCH_ACTIVE_CLASS));
    assert!(opt.touch_feedback_targets(&p.dom).contains(&p.nav_link));
}

#[test]
fn anchor_target_resolves_in_page_links() {
    let mut p = page();
    let opt = optimizer();
    assert_eq!(opt.anchors(&p.dom), vec![p.anchor]);
    assert_eq!(opt.anchor_target(&p.dom, p.anchor), Some(p.section));

    for href in ["#", "#missing", "#not a selector", "/contests"] {
        p.dom.set_attribute(p.anchor, "href", href).unwrap();
        assert_eq!(opt.anchor_target(&p.dom, p.anchor), None, "href {href}");
    }
}

#[test]
fn anchor_target_matches_non_ascii_ids() {
    let mut p = page();
    let opt = optimizer();
    let body = p.dom.body_id();
    let cafe = p.dom.build(body, ElementBuilder::new("section").attr("id", "café-rules")).unwrap();

    p.dom.set_attribute(p.anchor, "href", "#café-rules").unwrap();
    assert_eq!(opt.anchor_target(&p.dom, p.anchor), Some(cafe));
}

#[test]
fn form_fields_are_scoped_to_forms() {
    let p = page();
    assert_eq!(optimizer().form_fields(&p.dom), vec![p.email, p.phone, p.password, p.notes]);
}

#[test]
fn focus_offset_clears_the_navbar() {
    assert!((focus_scroll_top(500.0, true) - 420.0).abs() < f64::EPSILON);
    assert!((focus_scroll_top(500.0, false) - 410.0).abs() < f64::EPSILON);
}
