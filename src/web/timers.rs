//! `setTimeout`-backed [`Timers`].
//!
//! Each scheduled id owns a `gloo_timers` [`Timeout`]; dropping it clears the
//! browser timeout. When a timeout fires it reports its id back to the app
//! through a weak handle, so a torn-down app simply stops receiving wake-ups.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;
use std::time::Duration;

use gloo_timers::callback::Timeout;

use super::App;
use crate::timer::{TimerId, Timers};

pub struct BrowserTimers {
    next_id: u64,
    handles: HashMap<TimerId, Timeout>,
    app: Weak<RefCell<App>>,
}

impl BrowserTimers {
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 0, handles: HashMap::new(), app: Weak::new() }
    }

    /// Route fired timeouts to `app`.
    pub fn bind(&mut self, app: Weak<RefCell<App>>) {
        self.app = app;
    }
}

impl Default for BrowserTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl Timers for BrowserTimers {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let app = Weak::clone(&self.app);
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let handle = Timeout::new(millis, move || {
            if let Some(app) = app.upgrade() {
                super::dispatch(&app, |app| app.on_timer(id));
            }
        });
        self.handles.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        // Dropping the handle clears the timeout; a fired one is just released.
        self.handles.remove(&id);
    }
}
