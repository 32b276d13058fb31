//! Document boundary.
//!
//! The adapter never owns the page. It reads table structure from, and writes
//! generated containers into, whatever implements [`Dom`]: the browser
//! document in production (`web::WebDom`) or [`crate::doc::MemoryDom`] in tests.
//!
//! Queries never fail; an implementation that cannot answer returns the empty
//! result. Mutations return [`Result`] so a detached or unknown node aborts the
//! current call without touching anything else.

use std::fmt;

use crate::error::Result;
use crate::selector::SelectorList;

/// Stable identity of an element inside one [`Dom`] instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tree-structured document the adapter can query and mutate.
pub trait Dom {
    /// The document element (`<html>`).
    fn root(&self) -> NodeId;

    /// The `<body>` element, if the document has one.
    fn body(&self) -> Option<NodeId>;

    /// Descendants of `scope` (excluding `scope`) matching `selector`, in document order.
    fn query_all(&self, scope: NodeId, selector: &SelectorList) -> Vec<NodeId>;

    /// First descendant of `scope` matching `selector`.
    fn query(&self, scope: NodeId, selector: &SelectorList) -> Option<NodeId> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// First element in the document whose `id` attribute equals `id`, matched verbatim.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element children in order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Lowercase tag name, empty for unknown nodes.
    fn tag_name(&self, node: NodeId) -> String;

    /// Whether `node` is still connected to the document.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    fn text_content(&self, node: NodeId) -> String;
    fn inner_html(&self, node: NodeId) -> String;
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Inline style property value, `None` when unset.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()>;
    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()>;
    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()>;

    /// Set an inline style property. An empty value removes the property.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<NodeId>;

    /// Replace the node's content with escaped text.
    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()>;

    /// Replace the node's content with markup, copied verbatim.
    fn set_inner_html(&mut self, node: NodeId, markup: &str) -> Result<()>;

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()>;

    /// Destroy `node` and its subtree. Removing a node that no longer exists is a no-op.
    fn remove(&mut self, node: NodeId) -> Result<()>;

    /// Add every space-separated class in `classes`.
    fn add_classes(&mut self, node: NodeId, classes: &str) -> Result<()> {
        for class in classes.split_whitespace() {
            self.add_class(node, class)?;
        }
        Ok(())
    }
}
