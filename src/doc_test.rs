use super::*;

fn sel(source: &str) -> SelectorList {
    SelectorList::parse(source).unwrap()
}

// =============================================================
// Building
// =============================================================

#[test]
fn new_document_has_html_and_body() {
    let dom = MemoryDom::new();
    assert_eq!(dom.tag_name(dom.root()), "html");
    assert_eq!(dom.body(), Some(dom.body_id()));
    assert_eq!(dom.children(dom.root()), vec![dom.body_id()]);
    assert_eq!(dom.node_count(), 2);
}

#[test]
fn build_inserts_subtree_in_order() {
    let mut dom = MemoryDom::new();
    let list = dom
        .build(
            dom.body_id(),
            ElementBuilder::new("ul").children([
                ElementBuilder::new("li").markup("one"),
                ElementBuilder::new("li").markup("two"),
            ]),
        )
        .unwrap();
    let items = dom.children(list);
    assert_eq!(items.len(), 2);
    assert_eq!(dom.text_content(items[0]), "one");
    assert_eq!(dom.text_content(items[1]), "two");
    assert_eq!(dom.parent(items[1]), Some(list));
}

#[test]
fn build_under_unknown_parent_fails() {
    let mut dom = MemoryDom::new();
    let err = dom.build(NodeId(99), ElementBuilder::new("div")).unwrap_err();
    assert!(matches!(err, AdaptError::UnknownNode(NodeId(99))));
}

// =============================================================
// Queries
// =============================================================

#[test]
fn query_all_returns_document_order_and_excludes_scope() {
    let mut dom = MemoryDom::new();
    let outer = dom
        .build(
            dom.body_id(),
            ElementBuilder::new("div").class("box").child(ElementBuilder::new("div").class("box")),
        )
        .unwrap();
    let inner = dom.children(outer)[0];
    assert_eq!(dom.query_all(dom.root(), &sel(".box")), vec![outer, inner]);
    assert_eq!(dom.query_all(outer, &sel(".box")), vec![inner]);
    assert_eq!(dom.query(dom.root(), &sel(".box")), Some(outer));
}

#[test]
fn text_content_strips_markup_and_unescapes() {
    let mut dom = MemoryDom::new();
    let cell = dom.build(dom.body_id(), ElementBuilder::new("td").markup("<b>A</b> &amp; B")).unwrap();
    assert_eq!(dom.text_content(cell), "A & B");
    assert_eq!(dom.inner_html(cell), "<b>A</b> &amp; B");
}

#[test]
fn detached_nodes_are_not_attached() {
    let mut dom = MemoryDom::new();
    let div = dom.build(dom.body_id(), ElementBuilder::new("div")).unwrap();
    assert!(dom.is_attached(div));
    dom.detach(div).unwrap();
    assert!(!dom.is_attached(div));
    assert!(dom.exists(div));
    assert!(dom.children(dom.body_id()).is_empty());
}

#[test]
fn contains_includes_self() {
    let dom = MemoryDom::new();
    assert!(dom.contains(dom.root(), dom.root()));
    assert!(dom.contains(dom.root(), dom.body_id()));
    assert!(!dom.contains(dom.body_id(), dom.root()));
}

// =============================================================
// Mutations
// =============================================================

#[test]
fn classes_are_deduplicated() {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    dom.add_class(body, "mobile-device").unwrap();
    dom.add_class(body, "mobile-device").unwrap();
    assert_eq!(dom.outer_html(body), r#"<body class="mobile-device"></body>"#);
    dom.remove_class(body, "mobile-device").unwrap();
    assert!(!dom.has_class(body, "mobile-device"));
}

#[test]
fn add_classes_splits_on_whitespace() {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    dom.add_classes(body, "card  mb-2").unwrap();
    assert!(dom.has_class(body, "card"));
    assert!(dom.has_class(body, "mb-2"));
}

#[test]
fn set_attribute_class_replaces_class_list() {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    dom.add_class(body, "old").unwrap();
    dom.set_attribute(body, "class", "a b").unwrap();
    assert!(!dom.has_class(body, "old"));
    assert!(dom.has_class(body, "a") && dom.has_class(body, "b"));
}

#[test]
fn empty_style_value_removes_property() {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    dom.set_style(body, "display", "none").unwrap();
    assert_eq!(dom.style(body, "display").as_deref(), Some("none"));
    dom.set_style(body, "display", "").unwrap();
    assert_eq!(dom.style(body, "display"), None);
    assert_eq!(dom.outer_html(body), "<body></body>");
}

#[test]
fn set_text_escapes_markup() {
    let mut dom = MemoryDom::new();
    let label = dom.create_element("strong").unwrap();
    dom.set_text(label, "<Name>:").unwrap();
    assert_eq!(dom.inner_html(label), "&lt;Name&gt;:");
    assert_eq!(dom.text_content(label), "<Name>:");
}

#[test]
fn set_inner_html_drops_children() {
    let mut dom = MemoryDom::new();
    let div = dom.build(dom.body_id(), ElementBuilder::new("div").child(ElementBuilder::new("p"))).unwrap();
    let paragraph = dom.children(div)[0];
    dom.set_inner_html(div, "<em>x</em>").unwrap();
    assert!(dom.children(div).is_empty());
    assert!(!dom.exists(paragraph));
}

#[test]
fn append_child_moves_node() {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    let first = dom.build(body, ElementBuilder::new("div")).unwrap();
    let second = dom.build(body, ElementBuilder::new("div")).unwrap();
    let span = dom.build(first, ElementBuilder::new("span")).unwrap();
    dom.append_child(second, span).unwrap();
    assert!(dom.children(first).is_empty());
    assert_eq!(dom.children(second), vec![span]);
}

#[test]
fn append_child_rejects_cycles() {
    let mut dom = MemoryDom::new();
    let outer = dom.build(dom.body_id(), ElementBuilder::new("div")).unwrap();
    let inner = dom.build(outer, ElementBuilder::new("div")).unwrap();
    assert!(matches!(dom.append_child(inner, outer), Err(AdaptError::Dom(_))));
}

#[test]
fn remove_destroys_subtree_and_tolerates_repeats() {
    let mut dom = MemoryDom::new();
    let div = dom.build(dom.body_id(), ElementBuilder::new("div").child(ElementBuilder::new("span"))).unwrap();
    let before = dom.node_count();
    dom.remove(div).unwrap();
    assert_eq!(dom.node_count(), before - 2);
    dom.remove(div).unwrap();
}

#[test]
fn element_by_id_matches_verbatim_in_document_order() {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    let first = dom.build(body, ElementBuilder::new("section").attr("id", "café")).unwrap();
    let second = dom.build(body, ElementBuilder::new("div").attr("id", "café")).unwrap();
    let spaced = dom.build(body, ElementBuilder::new("div").attr("id", "two words")).unwrap();

    assert_eq!(dom.element_by_id("café"), Some(first));
    assert_eq!(dom.element_by_id("two words"), Some(spaced));
    assert_eq!(dom.element_by_id("Café"), None);

    dom.detach(first).unwrap();
    assert_eq!(dom.element_by_id("café"), Some(second));
}

#[test]
fn root_cannot_be_removed() {
    let mut dom = MemoryDom::new();
    assert!(dom.remove(dom.root()).is_err());
}

// =============================================================
// Serialization
// =============================================================

#[test]
fn outer_html_orders_attributes() {
    let mut dom = MemoryDom::new();
    let input = dom
        .build(dom.body_id(), ElementBuilder::new("input").attr("type", "text").attr("name", "email").class("form"))
        .unwrap();
    dom.set_style(input, "width", "100%").unwrap();
    assert_eq!(
        dom.outer_html(input),
        r#"<input class="form" name="email" type="text" style="width: 100%;"></input>"#
    );
}
