//! Cancellable timers and debouncing.
//!
//! The monitor never sleeps. It asks a [`Timers`] implementation to schedule a
//! wake-up and gets a [`TimerId`] back; when the host reports that id as fired,
//! the monitor runs the deferred work. In the browser the host is
//! `setTimeout`; in tests it is [`ManualTimers`], which fires only when time is
//! advanced explicitly.

#[cfg(test)]
#[path = "timer_test.rs"]
mod timer_test;

use std::time::Duration;

/// Handle for one scheduled wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Something that can schedule and cancel one-shot wake-ups.
pub trait Timers {
    /// Schedule a wake-up after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a pending wake-up. Cancelling a fired or unknown id is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Deterministic timers driven by [`ManualTimers::advance`].
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    pending: Vec<(Duration, TimerId)>,
}

impl ManualTimers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Move virtual time forward and return the ids that became due, earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;
        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = pending;
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }
}

impl Timers for ManualTimers {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push((self.now + delay, id));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|(_, pending)| *pending != id);
    }
}

/// Coalesces a burst of signals into one wake-up after the burst goes quiet.
///
/// Each [`Debounce::trigger`] supersedes the pending wake-up. Only the id
/// returned by the latest trigger is accepted by [`Debounce::fire`], so a stale
/// wake-up that slipped past cancellation is ignored.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    pending: Option<TimerId>,
}

impl Debounce {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Cancel any pending wake-up and schedule a fresh one.
    pub fn trigger<T: Timers + ?Sized>(&mut self, timers: &mut T) -> TimerId {
        if let Some(previous) = self.pending.take() {
            timers.cancel(previous);
        }
        let id = timers.schedule(self.delay);
        self.pending = Some(id);
        id
    }

    /// Accept a fired wake-up. Returns `true` when `id` is the current one.
    pub fn fire<T: Timers + ?Sized>(&mut self, id: TimerId, timers: &mut T) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        timers.cancel(id);
        true
    }
}
