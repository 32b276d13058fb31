//! In-memory document: element tree, builder and serializer.
//!
//! `MemoryDom` implements [`Dom`] without a browser. It backs the unit tests
//! and any headless use of the adapter (server-side previews, fixtures). Nodes
//! are elements only; text and opaque markup live in a node's `markup` slot,
//! which always precedes its element children when serialized.
//!
//! Removing a node destroys its whole subtree. [`MemoryDom::detach`] unlinks a
//! subtree while keeping it alive, which is how tests simulate an element that
//! disappeared from the page mid-evaluation.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{BTreeMap, HashMap};

use crate::dom::{Dom, NodeId};
use crate::error::{AdaptError, Result};
use crate::selector::{SelectorList, SelectorTarget};

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    markup: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Declarative description of an element subtree, inserted with [`MemoryDom::build`].
#[derive(Debug, Clone, Default)]
pub struct ElementBuilder {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    markup: String,
    children: Vec<ElementBuilder>,
}

impl ElementBuilder {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_ascii_lowercase(), ..Self::default() }
    }

    /// Add one or more space-separated classes.
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        self.classes.extend(classes.split_whitespace().map(str::to_owned));
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_ascii_lowercase(), value.to_owned()));
        self
    }

    /// Raw markup placed before any children.
    #[must_use]
    pub fn markup(mut self, markup: &str) -> Self {
        self.markup = markup.to_owned();
        self
    }

    #[must_use]
    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        self.children.extend(children);
        self
    }
}

/// In-memory element tree rooted at `<html>` with an empty `<body>`.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: HashMap<NodeId, Node>,
    next_id: u32,
    root: NodeId,
    body: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId(0);
        let body = NodeId(1);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node { tag: "html".into(), children: vec![body], ..Node::default() });
        nodes.insert(body, Node { tag: "body".into(), parent: Some(root), ..Node::default() });
        Self { nodes, next_id: 2, root, body }
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body_id(&self) -> NodeId {
        self.body
    }

    /// Insert `builder`'s subtree as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::UnknownNode`] if `parent` does not exist.
    pub fn build(&mut self, parent: NodeId, builder: ElementBuilder) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.insert_tree(builder);
        self.link(parent, id)?;
        Ok(id)
    }

    /// Unlink `node` from its parent without destroying it.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::UnknownNode`] if `node` does not exist.
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        self.unlink(node)
    }

    /// Whether `node` still exists, attached or not.
    #[must_use]
    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Number of live nodes, including detached ones.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deterministic serialization of `node` and its subtree.
    ///
    /// Attributes are emitted in name order with `class` first and `style`
    /// last, so two structurally equal trees serialize identically.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn insert_tree(&mut self, builder: ElementBuilder) -> NodeId {
        let id = self.allocate(&builder.tag);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.classes = builder.classes;
            node.attributes = builder.attributes.into_iter().collect();
            node.markup = builder.markup;
        }
        for child in builder.children {
            let child_id = self.insert_tree(child);
            if let Some(child_node) = self.nodes.get_mut(&child_id) {
                child_node.parent = Some(id);
            }
            if let Some(node) = self.nodes.get_mut(&id) {
                node.children.push(child_id);
            }
        }
        id
    }

    fn allocate(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node { tag: tag.to_ascii_lowercase(), ..Node::default() });
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(AdaptError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(AdaptError::UnknownNode(id))
    }

    fn unlink(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node_mut(id)?.parent.take();
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|child| *child != id);
        }
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    fn collect_descendants(&self, id: NodeId, selector: &SelectorList, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        for child in &node.children {
            if selector.matches(self, *child) {
                out.push(*child);
            }
            self.collect_descendants(*child, selector, out);
        }
    }

    fn find_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        self.nodes.get(&scope)?.children.iter().find_map(|child| {
            if self.attribute_of(*child, "id") == Some(id) { Some(*child) } else { self.find_by_id(*child, id) }
        })
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        out.push('<');
        out.push_str(&node.tag);
        if !node.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", node.classes.join(" ")));
        }
        for (name, value) in &node.attributes {
            out.push_str(&format!(" {name}=\"{value}\""));
        }
        if !node.styles.is_empty() {
            let style = node
                .styles
                .iter()
                .map(|(k, v)| format!("{k}: {v};"))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&format!(" style=\"{style}\""));
        }
        out.push('>');
        self.write_inner(node, out);
        out.push_str(&format!("</{}>", node.tag));
    }

    fn write_inner(&self, node: &Node, out: &mut String) {
        out.push_str(&node.markup);
        for child in &node.children {
            self.write_node(*child, out);
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        out.push_str(&strip_tags(&node.markup));
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }
}

impl SelectorTarget for MemoryDom {
    fn tag_of(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.tag.as_str())
    }

    fn attribute_of(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.attributes.get(name)).map(String::as_str)
    }

    fn has_class_of(&self, node: NodeId, class: &str) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }
}

impl Dom for MemoryDom {
    fn root(&self) -> NodeId {
        self.root
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn query_all(&self, scope: NodeId, selector: &SelectorList) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(scope, selector, &mut out);
        out
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_by_id(self.root, id)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.get(&node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.tag_of(node).unwrap_or_default().to_owned()
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.exists(node) && self.contains(self.root, node)
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        unescape(&out)
    }

    fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(n) = self.nodes.get(&node) {
            self.write_inner(n, &mut out);
        }
        out
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attribute_of(node, name).map(str::to_owned)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.has_class_of(node, class)
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.get(&node).and_then(|n| n.styles.get(property)).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        if name == "class" {
            self.node_mut(node)?.classes = value.split_whitespace().map(str::to_owned).collect();
            return Ok(());
        }
        self.node_mut(node)?.attributes.insert(name, value.to_owned());
        Ok(())
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        let classes = &mut self.node_mut(node)?.classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
        }
        Ok(())
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.node_mut(node)?.classes.retain(|c| c != class);
        Ok(())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()> {
        let styles = &mut self.node_mut(node)?.styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_owned(), value.to_owned());
        }
        Ok(())
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        Ok(self.allocate(tag))
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.set_inner_html(node, &escape(text))
    }

    fn set_inner_html(&mut self, node: NodeId, markup: &str) -> Result<()> {
        let children = std::mem::take(&mut self.node_mut(node)?.children);
        for child in children {
            self.drop_subtree(child);
        }
        self.node_mut(node)?.markup = markup.to_owned();
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        if self.contains(child, parent) {
            return Err(AdaptError::Dom(format!("cannot append {child} inside itself")));
        }
        self.unlink(child)?;
        self.link(parent, child)
    }

    fn remove(&mut self, node: NodeId) -> Result<()> {
        if !self.exists(node) {
            return Ok(());
        }
        if node == self.root {
            return Err(AdaptError::Dom("cannot remove the document element".into()));
        }
        self.unlink(node)?;
        self.drop_subtree(node);
        Ok(())
    }
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
}
