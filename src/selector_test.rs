use super::*;
use crate::doc::{ElementBuilder, MemoryDom};
use crate::dom::Dom;

fn sel(source: &str) -> SelectorList {
    SelectorList::parse(source).unwrap()
}

fn page() -> (MemoryDom, NodeId, NodeId, NodeId) {
    let mut dom = MemoryDom::new();
    let body = dom.body_id();
    let table = dom
        .build(
            body,
            ElementBuilder::new("table").class("table striped").attr("id", "scores").children([
                ElementBuilder::new("thead").child(ElementBuilder::new("tr").child(ElementBuilder::new("th"))),
                ElementBuilder::new("tbody").child(ElementBuilder::new("tr").child(ElementBuilder::new("td"))),
            ]),
        )
        .unwrap();
    let link = dom.build(body, ElementBuilder::new("a").attr("href", "#scores")).unwrap();
    let meta = dom.build(body, ElementBuilder::new("meta").attr("name", "viewport")).unwrap();
    (dom, table, link, meta)
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_keeps_source_text() {
    assert_eq!(sel("  thead th ").as_str(), "thead th");
}

#[test]
fn parse_rejects_empty_group() {
    assert!(matches!(SelectorList::parse("a,"), Err(AdaptError::InvalidSelector(_))));
    assert!(SelectorList::parse("").is_err());
}

#[test]
fn parse_rejects_unsupported_syntax() {
    assert!(SelectorList::parse("a > b").is_err());
    assert!(SelectorList::parse("li:first-child").is_err());
    assert!(SelectorList::parse("[unclosed").is_err());
}

// =============================================================
// Matching
// =============================================================

#[test]
fn matches_tag_class_and_id() {
    let (dom, table, link, _) = page();
    assert!(sel("table").matches(&dom, table));
    assert!(sel(".table").matches(&dom, table));
    assert!(sel("table.table.striped").matches(&dom, table));
    assert!(sel("#scores").matches(&dom, table));
    assert!(!sel(".table").matches(&dom, link));
    assert!(!sel("table.missing").matches(&dom, table));
}

#[test]
fn tag_match_is_case_insensitive() {
    let (dom, table, _, _) = page();
    assert!(sel("TABLE").matches(&dom, table));
}

#[test]
fn matches_attribute_forms() {
    let (dom, _, link, meta) = page();
    assert!(sel("a[href]").matches(&dom, link));
    assert!(sel(r##"a[href^="#"]"##).matches(&dom, link));
    assert!(sel(r#"meta[name="viewport"]"#).matches(&dom, meta));
    assert!(sel("meta[name='viewport']").matches(&dom, meta));
    assert!(!sel(r#"meta[name="author"]"#).matches(&dom, meta));
    assert!(!sel("a[data-src]").matches(&dom, link));
}

#[test]
fn descendant_combinator_walks_ancestors() {
    let (dom, table, _, _) = page();
    let head_cells = dom.query_all(table, &sel("thead th"));
    assert_eq!(head_cells.len(), 1);
    assert!(sel("table th").matches(&dom, head_cells[0]));
    assert!(sel("body table thead tr th").matches(&dom, head_cells[0]));
    assert!(!sel("tbody th").matches(&dom, head_cells[0]));
}

#[test]
fn selector_list_matches_any_group() {
    let (dom, table, link, meta) = page();
    let list = sel("a, meta");
    assert!(list.matches(&dom, link));
    assert!(list.matches(&dom, meta));
    assert!(!list.matches(&dom, table));
}

#[test]
fn universal_selector_matches_everything() {
    let (dom, table, link, _) = page();
    assert!(sel("*").matches(&dom, table));
    assert!(sel("*").matches(&dom, link));
}
