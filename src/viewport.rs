//! Viewport monitor: turns raw window signals into presenter/optimizer work.
//!
//! DESIGN
//! ======
//! The host forwards every `resize`, `orientationchange`, `scroll` and touch
//! signal as it arrives. The monitor records the latest value and (re)arms a
//! [`Debounce`]; when the host later reports the timer as fired, the settled
//! value is processed once. A newer signal of the same kind supersedes the
//! pending one rather than queueing behind it.
//!
//! On a settled change the monitor re-classifies the device. A mobile →
//! desktop transition restores every table and strips the mobile classes; the
//! reverse re-applies them. While mobile, any width or orientation change
//! re-evaluates every tracked table.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::collections::HashMap;
use std::time::Duration;

use crate::config::AdaptConfig;
use crate::device::{UiState, Viewport};
use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::optimizer::MobileOptimizer;
use crate::presenter::ResponsiveTablePresenter;
use crate::timer::{Debounce, ManualTimers, TimerId, Timers};

/// Drives the presenter and optimizer from debounced window signals.
pub struct ViewportMonitor<T: Timers> {
    config: AdaptConfig,
    ui: UiState,
    scope: NodeId,
    presenter: ResponsiveTablePresenter,
    optimizer: MobileOptimizer,
    timers: T,
    resize: Debounce,
    orientation: Debounce,
    scroll: Debounce,
    pending_resize: Option<Viewport>,
    pending_orientation: Option<Viewport>,
    pending_scroll: f64,
    touch_release: HashMap<TimerId, NodeId>,
}

impl<T: Timers> ViewportMonitor<T> {
    /// Create a monitor for the tables under `scope`.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in selectors fail to parse.
    pub fn new(config: AdaptConfig, ui: UiState, scope: NodeId, timers: T) -> Result<Self> {
        Ok(Self {
            presenter: ResponsiveTablePresenter::new(&config, ui.viewport.width)?,
            optimizer: MobileOptimizer::new(&config)?,
            resize: Debounce::new(config.resize_debounce),
            orientation: Debounce::new(config.orientation_delay),
            scroll: Debounce::new(config.scroll_debounce),
            config,
            ui,
            scope,
            timers,
            pending_resize: None,
            pending_orientation: None,
            pending_scroll: 0.0,
            touch_release: HashMap::new(),
        })
    }

    /// Page-load pass: track every table in scope and, on a mobile device,
    /// apply the optimizations and evaluate each table once.
    ///
    /// # Errors
    ///
    /// Propagates a failing optimizer mutation. Per-table failures are logged.
    pub fn start<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Result<()> {
        for table in dom.query_all(self.scope, self.config.table_selector()) {
            self.presenter.track(table);
        }
        log::info!(
            "viewport monitor started: mobile={} touch={} orientation={} tables={}",
            self.ui.mobile,
            self.ui.touch,
            self.ui.orientation.as_str(),
            self.presenter.tracked().len()
        );
        if self.ui.mobile {
            self.optimizer.apply(dom, &self.ui)?;
            self.evaluate_all(dom);
        }
        Ok(())
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub fn presenter(&self) -> &ResponsiveTablePresenter {
        &self.presenter
    }

    #[must_use]
    pub fn optimizer(&self) -> &MobileOptimizer {
        &self.optimizer
    }

    #[must_use]
    pub fn config(&self) -> &AdaptConfig {
        &self.config
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Track an additional table, e.g. one inserted after page load.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AdaptError::Detached`] if the table is not attached.
    pub fn track<D: Dom + ?Sized>(&mut self, dom: &mut D, table: NodeId) -> Result<()> {
        self.presenter.track(table);
        if self.ui.mobile {
            self.presenter.evaluate(dom, table, self.ui.viewport.width, self.ui.orientation)?;
        }
        Ok(())
    }

    /// A `resize` arrived. Processed after the resize debounce.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.pending_resize = Some(viewport);
        self.resize.trigger(&mut self.timers);
    }

    /// An `orientationchange` arrived. Processed after the settle delay.
    pub fn on_orientation_change(&mut self, viewport: Viewport) {
        self.pending_orientation = Some(viewport);
        self.orientation.trigger(&mut self.timers);
    }

    /// A `scroll` arrived. Processed after the scroll debounce.
    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.pending_scroll = scroll_y;
        self.scroll.trigger(&mut self.timers);
    }

    /// A finger touched `element`: show feedback immediately.
    ///
    /// # Errors
    ///
    /// Propagates a failing DOM mutation.
    pub fn on_touch_start<D: Dom + ?Sized>(&mut self, dom: &mut D, element: NodeId) -> Result<()> {
        self.optimizer.touch_start(dom, element)
    }

    /// The finger lifted: clear feedback after the configured delay.
    pub fn on_touch_end(&mut self, element: NodeId) {
        let id = self.timers.schedule(self.config.touch_feedback);
        self.touch_release.insert(id, element);
    }

    /// The host reports that timer `id` fired.
    ///
    /// Stale or unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Propagates a failing optimizer mutation. Per-table failures are logged.
    pub fn on_timer<D: Dom + ?Sized>(&mut self, dom: &mut D, id: TimerId) -> Result<()> {
        if let Some(element) = self.touch_release.remove(&id) {
            self.timers.cancel(id);
            if dom.is_attached(element) {
                self.optimizer.clear_touch(dom, element)?;
            }
            return Ok(());
        }
        if self.resize.fire(id, &mut self.timers) {
            return self.settle_resize(dom);
        }
        if self.orientation.fire(id, &mut self.timers) {
            return self.settle_orientation(dom);
        }
        if self.scroll.fire(id, &mut self.timers) {
            return self.optimizer.on_scroll(dom, self.pending_scroll);
        }
        log::trace!("ignoring stale timer {id:?}");
        Ok(())
    }

    /// Re-apply per-page classes on a mobile device.
    ///
    /// # Errors
    ///
    /// Propagates a failing DOM mutation.
    pub fn refresh<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Result<()> {
        self.optimizer.refresh(dom, &self.ui)
    }

    fn settle_resize<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Result<()> {
        let Some(viewport) = self.pending_resize.take() else {
            return Ok(());
        };
        let width_changed = (viewport.width - self.ui.viewport.width).abs() > f64::EPSILON;
        let orientation_changed = self.ui.set_viewport(viewport);
        let mobile = self.config.is_mobile_width(viewport.width);

        if mobile != self.ui.mobile {
            self.ui.mobile = mobile;
            if mobile {
                log::info!("viewport {}px: switching to mobile layout", viewport.width);
                self.optimizer.apply(dom, &self.ui)?;
                self.evaluate_all(dom);
            } else {
                log::info!("viewport {}px: switching to desktop layout", viewport.width);
                self.presenter.set_viewport_width(viewport.width);
                self.presenter.remove_all(dom, self.scope);
                self.optimizer.remove(dom)?;
            }
            return Ok(());
        }

        if mobile && (width_changed || orientation_changed) {
            if orientation_changed {
                self.optimizer.apply_orientation(dom, self.ui.orientation)?;
            }
            self.evaluate_all(dom);
        }
        Ok(())
    }

    fn settle_orientation<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Result<()> {
        let Some(viewport) = self.pending_orientation.take() else {
            return Ok(());
        };
        self.ui.set_viewport(viewport);
        log::debug!("orientation settled: {}", self.ui.orientation.as_str());
        if self.ui.mobile {
            self.optimizer.apply_orientation(dom, self.ui.orientation)?;
            self.evaluate_all(dom);
        }
        Ok(())
    }

    /// Evaluate every tracked table; a failure on one does not stop the others.
    fn evaluate_all<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        let width = self.ui.viewport.width;
        let orientation = self.ui.orientation;
        for table in self.presenter.tracked() {
            if let Err(err) = self.presenter.evaluate(dom, table, width, orientation) {
                log::warn!("table {table}: evaluation skipped: {err}");
            }
        }
    }
}

impl ViewportMonitor<ManualTimers> {
    /// Advance virtual time and process every timer that became due.
    ///
    /// # Errors
    ///
    /// Propagates the first failure from [`ViewportMonitor::on_timer`].
    pub fn advance<D: Dom + ?Sized>(&mut self, dom: &mut D, by: Duration) -> Result<()> {
        for id in self.timers.advance(by) {
            self.on_timer(dom, id)?;
        }
        Ok(())
    }
}
