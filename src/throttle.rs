//! Frame-rate gate between pointer events and the state manager.
//!
//! DESIGN
//! ======
//! Pointer events arrive faster than the device refreshes. Each event offers
//! a candidate; it goes through only when a full frame interval has passed
//! since the last dispatch. Otherwise it is parked as `pending`, replacing
//! whatever was parked before. The host ticks the throttle every frame and
//! `take_due` releases the parked candidate once its frame arrives, so a
//! resting pointer still lands. `flush` hands it back at pointer-up, so the
//! throttle defers writes but never drops the last one.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

use std::time::{Duration, Instant};

use crate::consts::FRAME_INTERVAL_MICROS;

#[derive(Debug, Clone)]
pub struct DispatchThrottle<T> {
    interval: Duration,
    last_dispatch: Option<Instant>,
    pending: Option<T>,
}

impl<T> Default for DispatchThrottle<T> {
    fn default() -> Self {
        Self::new(Duration::from_micros(FRAME_INTERVAL_MICROS))
    }
}

impl<T> DispatchThrottle<T> {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_dispatch: None, pending: None }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer `candidate` for dispatch now.
    pub fn offer(&mut self, candidate: T) -> Option<T> {
        self.offer_at(candidate, Instant::now())
    }

    /// Returns `candidate` when it may be dispatched at `now`; otherwise
    /// parks it and returns `None`.
    pub fn offer_at(&mut self, candidate: T, now: Instant) -> Option<T> {
        let due = self
            .last_dispatch
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.last_dispatch = Some(now);
            self.pending = None;
            Some(candidate)
        } else {
            self.pending = Some(candidate);
            None
        }
    }

    /// Take the parked candidate once its frame has come.
    pub fn take_due(&mut self) -> Option<T> {
        self.take_due_at(Instant::now())
    }

    /// Returns the parked candidate when a full interval has passed since the
    /// last dispatch at `now`; otherwise keeps it parked.
    pub fn take_due_at(&mut self, now: Instant) -> Option<T> {
        let due = self
            .last_dispatch
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if !due {
            return None;
        }
        let pending = self.pending.take();
        if pending.is_some() {
            self.last_dispatch = Some(now);
        }
        pending
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the parked candidate, if any.
    pub fn flush(&mut self) -> Option<T> {
        self.flush_at(Instant::now())
    }

    pub fn flush_at(&mut self, now: Instant) -> Option<T> {
        let pending = self.pending.take();
        if pending.is_some() {
            self.last_dispatch = Some(now);
        }
        pending
    }

    /// Forget timing and any parked candidate.
    pub fn reset(&mut self) {
        self.last_dispatch = None;
        self.pending = None;
    }
}
