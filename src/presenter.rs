//! Reversible table-to-card presentation.
//!
//! DESIGN
//! ======
//! Each tracked table is in exactly one [`DisplayMode`]. `Cards` means a
//! generated `.mobile-table-cards` container exists as the table's sibling;
//! `Table` means it does not. Transitions go through [`transform`] and
//! [`restore`], both idempotent, so rapid orientation flapping can never
//! produce a second container.
//!
//! Orientation picks the mode; width only decides whether the original table
//! is hidden while cards exist. A wide portrait viewport therefore shows both.
//!
//! Per-table state lives in a map owned by the presenter, keyed by node
//! identity. Nothing is stored on the elements themselves.
//!
//! [`transform`]: ResponsiveTablePresenter::transform
//! [`restore`]: ResponsiveTablePresenter::restore

#[cfg(test)]
#[path = "presenter_test.rs"]
mod presenter_test;

use std::collections::HashMap;

use crate::config::AdaptConfig;
use crate::consts::{
    CARD_BODY_CLASS, CARD_CLASS, CARD_LABEL_CLASS, CARD_ROW_CLASS, CARDS_CONTAINER_CLASS,
};
use crate::device::Orientation;
use crate::dom::{Dom, NodeId};
use crate::error::{AdaptError, Result};
use crate::selector::SelectorList;

/// How a table is currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// The original table, no generated container.
    #[default]
    Table,
    /// A generated card container exists next to the table.
    Cards,
}

/// Presentation state for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformState {
    pub mode: DisplayMode,
    /// The generated container; `Some` exactly when `mode` is `Cards`.
    pub container: Option<NodeId>,
    /// Whether the presenter hid the original table.
    pub table_hidden: bool,
}

/// One data row paired with the column headers, in header order.
///
/// Values are the cells' inner markup, copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub fields: Vec<(String, String)>,
}

struct Selectors {
    head_cells: SelectorList,
    header_row: SelectorList,
    body_rows: SelectorList,
    cards: SelectorList,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            head_cells: SelectorList::parse("thead th")?,
            header_row: SelectorList::parse("tr")?,
            body_rows: SelectorList::parse("tbody tr")?,
            cards: SelectorList::parse(&format!(".{CARDS_CONTAINER_CLASS}"))?,
        })
    }
}

/// Converts tables to cards and back, tracking every table it has seen.
pub struct ResponsiveTablePresenter {
    mobile_width_px: f64,
    viewport_width: f64,
    states: HashMap<NodeId, TransformState>,
    selectors: Selectors,
}

impl ResponsiveTablePresenter {
    /// Create a presenter for a viewport currently `viewport_width` pixels wide.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in selectors fail to parse.
    pub fn new(config: &AdaptConfig, viewport_width: f64) -> Result<Self> {
        Ok(Self {
            mobile_width_px: config.mobile_width_px(),
            viewport_width,
            states: HashMap::new(),
            selectors: Selectors::new()?,
        })
    }

    /// Start tracking `element` in `Table` mode. Already-tracked elements keep their state.
    pub fn track(&mut self, element: NodeId) {
        self.states.entry(element).or_default();
    }

    /// Tracked elements in ascending id order.
    #[must_use]
    pub fn tracked(&self) -> Vec<NodeId> {
        let mut ids: Vec<_> = self.states.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Current mode of `element`. Untracked elements are `Table`.
    #[must_use]
    pub fn mode(&self, element: NodeId) -> DisplayMode {
        self.state(element).mode
    }

    #[must_use]
    pub fn state(&self, element: NodeId) -> TransformState {
        self.states.get(&element).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    /// Bring `element` to the mode `orientation` calls for.
    ///
    /// Portrait targets `Cards`, landscape targets `Table`. When the element
    /// ends up in `Cards`, the table's visibility is re-synced to `width`.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::Detached`] if `element` left the document; nothing is mutated.
    pub fn evaluate<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        element: NodeId,
        width: f64,
        orientation: Orientation,
    ) -> Result<DisplayMode> {
        self.viewport_width = width;
        self.track(element);
        match orientation {
            Orientation::Portrait => {
                self.transform(dom, element)?;
                if self.mode(element) == DisplayMode::Cards {
                    self.sync_visibility(dom, element)?;
                }
            }
            Orientation::Landscape => self.restore(dom, element)?,
        }
        Ok(self.mode(element))
    }

    /// Build the card view for `element`.
    ///
    /// No-op when already in `Cards`, when the table has no headers or no data
    /// rows, or when it has no parent to host the container.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::Detached`] if `element` left the document.
    pub fn transform<D: Dom + ?Sized>(&mut self, dom: &mut D, element: NodeId) -> Result<()> {
        ensure_attached(dom, element)?;
        if self.mode(element) == DisplayMode::Cards {
            return Ok(());
        }
        let Some(parent) = dom.parent(element) else {
            return Ok(());
        };

        let headers = self.column_headers(dom, element);
        let rows = self.row_records(dom, element, &headers);
        if headers.is_empty() || rows.is_empty() {
            log::debug!("table {element}: nothing to convert ({} headers, {} rows)", headers.len(), rows.len());
            return Ok(());
        }

        let container = build_cards(dom, &rows)?;
        dom.append_child(parent, container)?;
        self.states.insert(
            element,
            TransformState { mode: DisplayMode::Cards, container: Some(container), table_hidden: false },
        );
        self.sync_visibility(dom, element)?;
        log::debug!("table {element}: {} cards in {container}", rows.len());
        Ok(())
    }

    /// Return `element` to its original presentation and destroy its container.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::Detached`] if `element` left the document.
    pub fn restore<D: Dom + ?Sized>(&mut self, dom: &mut D, element: NodeId) -> Result<()> {
        ensure_attached(dom, element)?;
        let state = self.state(element);
        if state.mode == DisplayMode::Table {
            return Ok(());
        }
        if state.table_hidden {
            dom.set_style(element, "display", "")?;
        }
        if let Some(container) = state.container {
            dom.remove(container)?;
        }
        self.states.insert(element, TransformState::default());
        log::debug!("table {element}: restored");
        Ok(())
    }

    /// Restore every tracked table inside `scope` and remove any generated
    /// container left in it.
    ///
    /// Tracked tables that have left the document are reset to `Table`, shown
    /// again and their containers destroyed. A failure on one table is logged
    /// and does not stop the others.
    pub fn remove_all<D: Dom + ?Sized>(&mut self, dom: &mut D, scope: NodeId) {
        for element in self.tracked() {
            let outcome = if dom.is_attached(element) {
                if !dom.contains(scope, element) {
                    continue;
                }
                self.restore(dom, element)
            } else {
                self.reset_detached(dom, element)
            };
            if let Err(err) = outcome {
                log::warn!("table {element}: restore failed: {err}");
            }
        }
        for orphan in dom.query_all(scope, &self.selectors.cards) {
            if let Err(err) = dom.remove(orphan) {
                log::warn!("container {orphan}: remove failed: {err}");
            }
        }
    }

    /// Undo the presentation of a table that left the document. The state is
    /// reset even when the cleanup fails, so the table is never stuck in `Cards`.
    fn reset_detached<D: Dom + ?Sized>(&mut self, dom: &mut D, element: NodeId) -> Result<()> {
        let state = self.state(element);
        self.states.insert(element, TransformState::default());
        if let Some(container) = state.container {
            dom.remove(container)?;
        }
        if state.table_hidden {
            dom.set_style(element, "display", "")?;
        }
        Ok(())
    }

    /// Hide the table while cards exist and the viewport is narrow; show it otherwise.
    fn sync_visibility<D: Dom + ?Sized>(&mut self, dom: &mut D, element: NodeId) -> Result<()> {
        let hide = self.viewport_width <= self.mobile_width_px;
        let Some(state) = self.states.get_mut(&element) else {
            return Ok(());
        };
        if state.table_hidden == hide {
            return Ok(());
        }
        dom.set_style(element, "display", if hide { "none" } else { "" })?;
        state.table_hidden = hide;
        Ok(())
    }

    /// Trimmed header texts. Prefers `thead th`, falling back to the first row's `th` cells.
    fn column_headers<D: Dom + ?Sized>(&self, dom: &D, element: NodeId) -> Vec<String> {
        let mut cells = dom.query_all(element, &self.selectors.head_cells);
        if cells.is_empty() {
            if let Some(first_row) = dom.query(element, &self.selectors.header_row) {
                cells = dom
                    .children(first_row)
                    .into_iter()
                    .filter(|cell| dom.tag_name(*cell) == "th")
                    .collect();
            }
        }
        cells.into_iter().map(|cell| dom.text_content(cell).trim().to_owned()).collect()
    }

    fn row_records<D: Dom + ?Sized>(&self, dom: &D, element: NodeId, headers: &[String]) -> Vec<RowRecord> {
        dom.query_all(element, &self.selectors.body_rows)
            .into_iter()
            .map(|row| {
                let cells: Vec<_> = dom
                    .children(row)
                    .into_iter()
                    .filter(|cell| matches!(dom.tag_name(*cell).as_str(), "td" | "th"))
                    .collect();
                let fields = headers
                    .iter()
                    .zip(cells)
                    .map(|(header, cell)| (header.clone(), dom.inner_html(cell)))
                    .collect();
                RowRecord { fields }
            })
            .collect()
    }
}

/// Extract the row records `element` would produce, without touching the document.
///
/// # Errors
///
/// Only fails if the built-in selectors fail to parse.
pub fn row_records<D: Dom + ?Sized>(config: &AdaptConfig, dom: &D, element: NodeId) -> Result<Vec<RowRecord>> {
    let presenter = ResponsiveTablePresenter::new(config, 0.0)?;
    let headers = presenter.column_headers(dom, element);
    Ok(presenter.row_records(dom, element, &headers))
}

fn ensure_attached<D: Dom + ?Sized>(dom: &D, element: NodeId) -> Result<()> {
    if dom.is_attached(element) { Ok(()) } else { Err(AdaptError::Detached(element)) }
}

/// Detached container holding one card per row.
fn build_cards<D: Dom + ?Sized>(dom: &mut D, rows: &[RowRecord]) -> Result<NodeId> {
    let container = dom.create_element("div")?;
    dom.add_classes(container, CARDS_CONTAINER_CLASS)?;
    for row in rows {
        let card = dom.create_element("div")?;
        dom.add_classes(card, CARD_CLASS)?;
        let body = dom.create_element("div")?;
        dom.add_classes(body, CARD_BODY_CLASS)?;
        for (header, value) in &row.fields {
            let line = dom.create_element("div")?;
            dom.add_classes(line, CARD_ROW_CLASS)?;

            let label = dom.create_element("strong")?;
            dom.set_text(label, &format!("{header}:"))?;
            dom.add_classes(label, CARD_LABEL_CLASS)?;

            let content = dom.create_element("span")?;
            dom.set_inner_html(content, value)?;

            dom.append_child(line, label)?;
            dom.append_child(line, content)?;
            dom.append_child(body, line)?;
        }
        dom.append_child(card, body)?;
        dom.append_child(container, card)?;
    }
    Ok(container)
}
