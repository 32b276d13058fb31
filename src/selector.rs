//! CSS selector subset.
//!
//! Supports what the adapter actually queries: selector lists (`a, b`),
//! descendant combinators (`tbody tr`), type selectors, `#id`, `.class`, and
//! attribute matches `[attr]`, `[attr="v"]` and `[attr^="v"]`. Attribute values
//! must not contain whitespace or commas.
//!
//! The browser backend hands [`SelectorList::as_str`] straight to
//! `querySelectorAll`; [`crate::doc::MemoryDom`] evaluates the parsed form.

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

use crate::dom::NodeId;
use crate::error::{AdaptError, Result};

/// Read-only view of an element tree that selectors can be matched against.
pub trait SelectorTarget {
    fn tag_of(&self, node: NodeId) -> Option<&str>;
    fn attribute_of(&self, node: NodeId, name: &str) -> Option<&str>;
    fn has_class_of(&self, node: NodeId, class: &str) -> bool;
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    selectors: Vec<ComplexSelector>,
}

/// Compound selectors joined by descendant combinators, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    parts: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    op: AttributeOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeOp {
    Exists,
    Equals(String),
    Prefix(String),
}

impl SelectorList {
    /// Parse a selector list.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::InvalidSelector`] for empty groups and syntax
    /// outside the supported subset.
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = || AdaptError::InvalidSelector(source.to_owned());
        let mut selectors = Vec::new();
        for group in source.split(',') {
            let parts = group
                .split_whitespace()
                .map(Compound::parse)
                .collect::<Option<Vec<_>>>()
                .ok_or_else(invalid)?;
            if parts.is_empty() {
                return Err(invalid());
            }
            selectors.push(ComplexSelector { parts });
        }
        Ok(Self { source: source.trim().to_owned(), selectors })
    }

    /// The selector text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `node` matches any selector in the list.
    pub fn matches<T: SelectorTarget + ?Sized>(&self, target: &T, node: NodeId) -> bool {
        self.selectors.iter().any(|selector| selector.matches(target, node))
    }
}

impl ComplexSelector {
    fn matches<T: SelectorTarget + ?Sized>(&self, target: &T, node: NodeId) -> bool {
        let Some((last, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(target, node) {
            return false;
        }
        // Descendant-only combinators: greedy nearest-ancestor matching is exact.
        let mut cursor = target.parent_of(node);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(current) = cursor else {
                    return false;
                };
                cursor = target.parent_of(current);
                if compound.matches(target, current) {
                    break;
                }
            }
        }
        true
    }
}

impl Compound {
    fn parse(token: &str) -> Option<Self> {
        let is_boundary = |c: char| matches!(c, '.' | '#' | '[');
        let mut compound = Self::default();

        let tag_len = token.find(is_boundary).unwrap_or(token.len());
        let tag = &token[..tag_len];
        if !tag.is_empty() && tag != "*" {
            if !is_ident(tag) {
                return None;
            }
            compound.tag = Some(tag.to_ascii_lowercase());
        }

        let mut rest = &token[tag_len..];
        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let body = &rest[1..];
                    let end = body.find(is_boundary).unwrap_or(body.len());
                    let name = &body[..end];
                    if !is_ident(name) {
                        return None;
                    }
                    if first == '.' {
                        compound.classes.push(name.to_owned());
                    } else {
                        compound.id = Some(name.to_owned());
                    }
                    rest = &body[end..];
                }
                '[' => {
                    let close = rest.find(']')?;
                    compound.attributes.push(AttributeMatch::parse(&rest[1..close])?);
                    rest = &rest[close + 1..];
                }
                _ => return None,
            }
        }
        Some(compound)
    }

    fn matches<T: SelectorTarget + ?Sized>(&self, target: &T, node: NodeId) -> bool {
        let Some(tag) = target.tag_of(node) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if !tag.eq_ignore_ascii_case(expected) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if target.attribute_of(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| target.has_class_of(node, class))
            && self
                .attributes
                .iter()
                .all(|attr| attr.matches(target.attribute_of(node, &attr.name)))
    }
}

impl AttributeMatch {
    fn parse(body: &str) -> Option<Self> {
        let (name, op) = if let Some((name, value)) = body.split_once("^=") {
            (name, AttributeOp::Prefix(unquote(value)))
        } else if let Some((name, value)) = body.split_once('=') {
            (name, AttributeOp::Equals(unquote(value)))
        } else {
            (body, AttributeOp::Exists)
        };
        let name = name.trim();
        if !is_ident(name) {
            return None;
        }
        Some(Self { name: name.to_ascii_lowercase(), op })
    }

    fn matches(&self, value: Option<&str>) -> bool {
        match (&self.op, value) {
            (_, None) => false,
            (AttributeOp::Exists, Some(_)) => true,
            (AttributeOp::Equals(expected), Some(actual)) => actual == expected,
            (AttributeOp::Prefix(prefix), Some(actual)) => actual.starts_with(prefix.as_str()),
        }
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
        .to_owned()
}

fn is_ident(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
