// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timer-queue backed schedulers.
//!
//! Both schedulers here keep pending callbacks in a shared queue keyed by
//! deadline. They differ only in where "now" comes from:
//!
//! - [`ManualScheduler`] owns a virtual clock that moves only on
//!   [`ManualScheduler::advance`].
//! - [`FallbackScheduler`] reads a host clock and paces frames at
//!   [`FRAME_INTERVAL_MS`], for hosts without a native refresh signal.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::scheduler::{FrameCallback, FrameHandle, FrameScheduler};

/// Interval between frames when no native refresh signal is available.
pub const FRAME_INTERVAL_MS: f64 = 16.0;

/// Deadline for a timer-paced frame requested at `now`, given the deadline of
/// the previous one: `max(now, last_deadline + FRAME_INTERVAL_MS)`.
#[must_use]
pub fn paced_deadline(now: f64, last_deadline: f64) -> f64 {
    now + (FRAME_INTERVAL_MS - (now - last_deadline)).max(0.0)
}

struct Pending {
    handle: FrameHandle,
    deadline: f64,
    callback: FrameCallback,
}

/// Pending callbacks in insertion order.
#[derive(Default)]
struct FrameQueue {
    next_id: Cell<u64>,
    pending: RefCell<Vec<Pending>>,
    /// Handles of the batch currently being dispatched that have not run yet.
    in_flight: RefCell<Vec<FrameHandle>>,
}

impl FrameQueue {
    fn push(&self, deadline: f64, callback: FrameCallback) -> FrameHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = FrameHandle::from_raw(id);
        self.pending.borrow_mut().push(Pending {
            handle,
            deadline,
            callback,
        });
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|p| p.handle != handle);
        self.in_flight.borrow_mut().retain(|h| *h != handle);
    }

    fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    fn next_deadline(&self) -> Option<f64> {
        self.pending
            .borrow()
            .iter()
            .map(|p| p.deadline)
            .reduce(f64::min)
    }

    /// Runs every callback due at `now`.
    ///
    /// No borrow is held while a callback runs, so callbacks may schedule or
    /// cancel freely. A callback cancelled by an earlier member of the same
    /// batch is skipped.
    fn run_due(&self, now: f64, timestamp: impl Fn(&Pending) -> f64) -> usize {
        let due: Vec<Pending> = {
            let mut pending = self.pending.borrow_mut();
            let (due, rest) = pending.drain(..).partition(|p| p.deadline <= now);
            *pending = rest;
            due
        };
        *self.in_flight.borrow_mut() = due.iter().map(|p| p.handle).collect();

        let mut ran = 0;
        for p in due {
            let live = {
                let mut in_flight = self.in_flight.borrow_mut();
                match in_flight.iter().position(|h| *h == p.handle) {
                    Some(index) => {
                        in_flight.remove(index);
                        true
                    }
                    None => false,
                }
            };
            if !live {
                continue;
            }
            let ts = timestamp(&p);
            (p.callback)(ts);
            ran += 1;
        }
        ran
    }
}

/// Scheduler driven by a virtual clock.
///
/// Nothing runs until [`advance`](Self::advance) is called. Each call moves the
/// clock forward and runs every callback that was pending at that moment;
/// callbacks scheduled while those run wait for the next `advance`.
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use understory_timing::{FrameScheduler, ManualScheduler};
///
/// let scheduler = ManualScheduler::new();
/// let stamp = Rc::new(Cell::new(None));
/// let sink = Rc::clone(&stamp);
/// scheduler.schedule(Box::new(move |ts| sink.set(Some(ts))));
///
/// assert_eq!(scheduler.advance(16.0), 1);
/// assert_eq!(stamp.get(), Some(16.0));
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<f64>,
    queue: FrameQueue,
}

impl ManualScheduler {
    /// Creates a scheduler with its clock at `0.0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler with its clock at `now` milliseconds.
    #[must_use]
    pub fn starting_at(now: f64) -> Self {
        let scheduler = Self::default();
        scheduler.now.set(now);
        scheduler
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.now.get()
    }

    /// Number of callbacks waiting for a frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Advances the clock by `dt_ms` and runs one frame.
    ///
    /// Returns the number of callbacks that ran.
    pub fn advance(&self, dt_ms: f64) -> usize {
        let now = self.now.get() + dt_ms;
        self.now.set(now);
        self.queue.run_due(now, |_| now)
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        self.queue.push(self.now.get(), callback)
    }

    fn cancel(&self, handle: FrameHandle) {
        self.queue.cancel(handle);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.queue.len())
            .finish()
    }
}

/// Fixed-interval scheduler for hosts without a native refresh signal.
///
/// Each scheduled callback gets a deadline of
/// `max(now, last_deadline + FRAME_INTERVAL_MS)`, so back-to-back requests are
/// paced one frame apart. The host calls [`poll`](Self::poll) from its own
/// timer loop (using [`next_deadline`](Self::next_deadline) to decide how long
/// to sleep); due callbacks receive their deadline as the frame timestamp.
pub struct FallbackScheduler {
    clock: Box<dyn Fn() -> f64>,
    last_deadline: Cell<f64>,
    queue: FrameQueue,
}

impl FallbackScheduler {
    /// Creates a scheduler reading milliseconds from `clock`.
    pub fn new(clock: impl Fn() -> f64 + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            last_deadline: Cell::new(0.0),
            queue: FrameQueue::default(),
        }
    }

    /// Earliest pending deadline, if any callback is waiting.
    #[must_use]
    pub fn next_deadline(&self) -> Option<f64> {
        self.queue.next_deadline()
    }

    /// Number of callbacks waiting for a frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Runs every callback whose deadline has passed.
    ///
    /// Returns the number of callbacks that ran.
    pub fn poll(&self) -> usize {
        let now = (self.clock)();
        self.queue.run_due(now, |p| p.deadline)
    }
}

impl FrameScheduler for FallbackScheduler {
    fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        let deadline = paced_deadline((self.clock)(), self.last_deadline.get());
        self.last_deadline.set(deadline);
        self.queue.push(deadline, callback)
    }

    fn cancel(&self, handle: FrameHandle) {
        self.queue.cancel(handle);
    }
}

impl fmt::Debug for FallbackScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackScheduler")
            .field("last_deadline", &self.last_deadline.get())
            .field("pending", &self.queue.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use super::{FRAME_INTERVAL_MS, FallbackScheduler, ManualScheduler, paced_deadline};
    use crate::FrameScheduler;

    #[test]
    fn manual_runs_only_on_advance() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        scheduler.schedule(Box::new(move |_| sink.set(sink.get() + 1)));

        assert_eq!(hits.get(), 0);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(16.0), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.advance(16.0), 0);
    }

    #[test]
    fn manual_reschedule_waits_for_next_frame() {
        let scheduler = Rc::new(ManualScheduler::new());
        let stamps = Rc::new(RefCell::new(Vec::new()));

        let inner = Rc::clone(&scheduler);
        let sink = Rc::clone(&stamps);
        scheduler.schedule(Box::new(move |ts| {
            sink.borrow_mut().push(ts);
            let sink = Rc::clone(&sink);
            inner.schedule(Box::new(move |ts| sink.borrow_mut().push(ts)));
        }));

        scheduler.advance(10.0);
        assert_eq!(*stamps.borrow(), [10.0]);
        scheduler.advance(10.0);
        assert_eq!(*stamps.borrow(), [10.0, 20.0]);
    }

    #[test]
    fn manual_cancel_prevents_callback() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let sink = Rc::clone(&hits);
        let handle = scheduler.schedule(Box::new(move |_| sink.set(sink.get() + 1)));

        scheduler.cancel(handle);
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(16.0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn cancel_within_batch_skips_sibling() {
        let scheduler = Rc::new(ManualScheduler::new());
        let hits = Rc::new(Cell::new(0));
        let victim = Rc::new(Cell::new(None));

        let inner = Rc::clone(&scheduler);
        let target = Rc::clone(&victim);
        scheduler.schedule(Box::new(move |_| {
            if let Some(handle) = target.get() {
                inner.cancel(handle);
            }
        }));
        let sink = Rc::clone(&hits);
        let handle = scheduler.schedule(Box::new(move |_| sink.set(sink.get() + 1)));
        victim.set(Some(handle));

        assert_eq!(scheduler.advance(16.0), 1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn fallback_paces_requests_one_interval_apart() {
        let clock = Rc::new(Cell::new(100.0));
        let source = Rc::clone(&clock);
        let scheduler = FallbackScheduler::new(move || source.get());

        scheduler.schedule(Box::new(|_| {}));
        assert_eq!(scheduler.next_deadline(), Some(100.0));

        // A second request in the same instant lands one interval later.
        scheduler.schedule(Box::new(|_| {}));
        let stamps = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&stamps);
        scheduler.schedule(Box::new(move |ts| sink.borrow_mut().push(ts)));

        assert_eq!(scheduler.poll(), 1);
        assert_eq!(scheduler.pending(), 2);

        clock.set(100.0 + 2.0 * FRAME_INTERVAL_MS);
        assert_eq!(scheduler.poll(), 2);
        assert_eq!(*stamps.borrow(), [100.0 + 2.0 * FRAME_INTERVAL_MS]);
    }

    #[test]
    fn fallback_does_not_delay_after_idle_period() {
        let clock = Rc::new(Cell::new(0.0));
        let source = Rc::clone(&clock);
        let scheduler = FallbackScheduler::new(move || source.get());

        clock.set(1_000.0);
        scheduler.schedule(Box::new(|_| {}));
        assert_eq!(scheduler.next_deadline(), Some(1_000.0));
    }

    #[test]
    fn paced_deadline_waits_out_the_interval() {
        assert_eq!(paced_deadline(100.0, 95.0), 95.0 + FRAME_INTERVAL_MS);
        assert_eq!(paced_deadline(100.0, 100.0 - FRAME_INTERVAL_MS), 100.0);
        assert_eq!(paced_deadline(500.0, 0.0), 500.0);
    }
}
