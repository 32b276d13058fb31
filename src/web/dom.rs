//! `web-sys` implementation of [`Dom`].
//!
//! Browser elements have no stable numeric identity, so `WebDom` keeps a
//! [`NodeRegistry`] of the elements it has handed out ids for. A `WeakMap`
//! from element to id makes lookup constant-time, so the same element reached
//! through different queries always maps to the same id. [`Dom::remove`]
//! releases the removed subtree from both.

use std::cell::RefCell;

use js_sys::{Object, WeakMap};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::dom::{Dom, NodeId};
use crate::error::{AdaptError, Result};
use crate::registry::NodeRegistry;
use crate::selector::SelectorList;

pub struct WebDom {
    document: Document,
    nodes: RefCell<NodeRegistry<Element>>,
    ids: WeakMap,
}

pub(crate) fn js_err(err: JsValue) -> AdaptError {
    AdaptError::Dom(format!("{err:?}"))
}

impl WebDom {
    /// Wrap `document`. The document element becomes `NodeId(0)`.
    ///
    /// # Errors
    ///
    /// Fails if the document has no root element.
    pub fn new(document: Document) -> Result<Self> {
        let root = document
            .document_element()
            .ok_or_else(|| AdaptError::Dom("document has no root element".into()))?;
        let dom = Self { document, nodes: RefCell::new(NodeRegistry::new()), ids: WeakMap::new() };
        dom.id_of(&root);
        Ok(dom)
    }

    /// Identity for `element`, registering it on first sight.
    pub fn id_of(&self, element: &Element) -> NodeId {
        let key: &Object = element.as_ref();
        if let Some(id) = registered(&self.ids.get(key)) {
            return id;
        }
        let id = self.nodes.borrow_mut().insert(element.clone());
        self.ids.set(key, &JsValue::from(id.0));
        id
    }

    /// The browser element behind `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::UnknownNode`] for ids this registry never issued
    /// or has released.
    pub fn element(&self, id: NodeId) -> Result<Element> {
        self.nodes.borrow().get(id).cloned().ok_or(AdaptError::UnknownNode(id))
    }

    /// Forget `element` and every registered descendant.
    fn release_tree(&self, element: &Element) {
        self.release(element);
        match element.query_selector_all("*") {
            Ok(list) => {
                for index in 0..list.length() {
                    if let Some(child) = list.item(index).and_then(|node| node.dyn_ref::<Element>().cloned()) {
                        self.release(&child);
                    }
                }
            }
            Err(err) => log::warn!("releasing subtree failed: {err:?}"),
        }
    }

    fn release(&self, element: &Element) {
        let key: &Object = element.as_ref();
        if let Some(id) = registered(&self.ids.get(key)) {
            self.nodes.borrow_mut().release(id);
        }
        self.ids.delete(key);
    }

    fn html_element(&self, id: NodeId) -> Result<HtmlElement> {
        self.element(id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| AdaptError::Dom(format!("{id} has no inline style")))
    }
}

impl Dom for WebDom {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn body(&self) -> Option<NodeId> {
        self.document.body().map(|body| self.id_of(body.as_ref()))
    }

    fn query_all(&self, scope: NodeId, selector: &SelectorList) -> Vec<NodeId> {
        let Ok(scope) = self.element(scope) else {
            return Vec::new();
        };
        let list = match scope.query_selector_all(selector.as_str()) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("query {:?} failed: {err:?}", selector.as_str());
                return Vec::new();
            }
        };
        let mut out = Vec::new();
        for index in 0..list.length() {
            if let Some(element) = list.item(index).and_then(|node| node.dyn_ref::<Element>().cloned()) {
                out.push(self.id_of(&element));
            }
        }
        out
    }

    fn query(&self, scope: NodeId, selector: &SelectorList) -> Option<NodeId> {
        let Ok(scope) = self.element(scope) else {
            return None;
        };
        match scope.query_selector(selector.as_str()) {
            Ok(found) => found.map(|element| self.id_of(&element)),
            Err(err) => {
                log::warn!("query {:?} failed: {err:?}", selector.as_str());
                None
            }
        }
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document.get_element_by_id(id).map(|element| self.id_of(&element))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        let Ok(element) = self.element(node) else {
            return None;
        };
        element.parent_element().map(|parent| self.id_of(&parent))
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let Ok(element) = self.element(node) else {
            return Vec::new();
        };
        let children = element.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .map(|child| self.id_of(&child))
            .collect()
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node).map(|e| e.tag_name().to_ascii_lowercase()).unwrap_or_default()
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.element(node).is_ok_and(|e| e.is_connected())
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Ok(ancestor), Ok(node)) => ancestor.contains(Some(node.as_ref())),
            _ => false,
        }
    }

    fn text_content(&self, node: NodeId) -> String {
        self.element(node).map(|e| e.text_content().unwrap_or_default()).unwrap_or_default()
    }

    fn inner_html(&self, node: NodeId) -> String {
        self.element(node).map(|e| e.inner_html()).unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let Ok(element) = self.element(node) else {
            return None;
        };
        element.get_attribute(name)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node).is_ok_and(|e| e.class_list().contains(class))
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        let Ok(element) = self.html_element(node) else {
            return None;
        };
        match element.style().get_property_value(property) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.element(node)?.set_attribute(name, value).map_err(js_err)
    }

    fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.element(node)?.class_list().add_1(class).map_err(js_err)
    }

    fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.element(node)?.class_list().remove_1(class).map_err(js_err)
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> Result<()> {
        let style = self.html_element(node)?.style();
        if value.is_empty() {
            style.remove_property(property).map(|_previous| ()).map_err(js_err)
        } else {
            style.set_property(property, value).map_err(js_err)
        }
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        let element = self.document.create_element(tag).map_err(js_err)?;
        Ok(self.id_of(&element))
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.element(node)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_inner_html(&mut self, node: NodeId, markup: &str) -> Result<()> {
        self.element(node)?.set_inner_html(markup);
        Ok(())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let child = self.element(child)?;
        self.element(parent)?.append_child(&child).map(|_appended| ()).map_err(js_err)
    }

    fn remove(&mut self, node: NodeId) -> Result<()> {
        if node == self.root() {
            return Err(AdaptError::Dom("cannot remove the document element".into()));
        }
        if let Ok(element) = self.element(node) {
            element.remove();
            self.release_tree(&element);
        }
        Ok(())
    }
}

/// Id stored in the identity map, if `value` is one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn registered(value: &JsValue) -> Option<NodeId> {
    value.as_f64().map(|raw| NodeId(raw as u32))
}
