// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear transitions between two states, one step per frame.
//!
//! An [`Animator`] owns at most one transition at a time. Starting a new one
//! cancels the pending frame of the previous transition, so a superseded
//! transition never reports another state or completes.
//!
//! Timing follows the frame timestamps only: the first frame after
//! [`Animator::animate`] establishes the start time, and every frame with
//! `elapsed <= duration` reports `from + (elapsed / duration) * (to - from)`.
//! The first frame past the duration stops the transition and runs its
//! completion callback. There is no easing.
//!
//! On a scheduler that cannot pace frames (see
//! [`FrameScheduler::paces_frames`]) a transition reports its target and
//! completes at once.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};
use core::fmt;

use crate::scheduler::{FrameHandle, FrameScheduler};

/// Completion callback for a transition.
pub type OnComplete = Box<dyn FnOnce()>;

/// A state that can be linearly interpolated field by field.
pub trait Interpolate: Clone {
    /// Returns the state at fraction `t` of the way from `self` to `to`.
    ///
    /// `t` is not clamped; callers pass values in `[0, 1]`.
    #[must_use]
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        self + t * (to - self)
    }
}

impl<const N: usize> Interpolate for [f64; N] {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        core::array::from_fn(|i| self[i].interpolate(&to[i], t))
    }
}

/// Flat name → number mappings. Keys missing from `to` keep their value.
impl<K: Ord + Clone> Interpolate for BTreeMap<K, f64> {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        self.iter()
            .map(|(k, from)| {
                let value = to.get(k).map_or(*from, |to| from.interpolate(to, t));
                (k.clone(), value)
            })
            .collect()
    }
}

struct Transition<T> {
    id: u64,
    from: T,
    to: T,
    duration: f64,
    start: Cell<Option<f64>>,
    on_complete: RefCell<Option<OnComplete>>,
}

#[derive(Copy, Clone)]
struct Active {
    id: u64,
    handle: FrameHandle,
}

struct Shared<T, S> {
    scheduler: S,
    on_change: Box<dyn Fn(&T)>,
    active: Cell<Option<Active>>,
    next_id: Cell<u64>,
}

/// Drives linear transitions of a `T` on a [`FrameScheduler`].
///
/// Every intermediate state is handed to the `on_change` callback given at
/// construction. Cloning an `Animator` yields another handle to the same
/// transition slot.
pub struct Animator<T, S> {
    shared: Rc<Shared<T, S>>,
}

impl<T, S> Clone for Animator<T, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T, S> Animator<T, S>
where
    T: Interpolate + 'static,
    S: FrameScheduler + 'static,
{
    /// Creates an animator that reports intermediate states to `on_change`.
    pub fn new(scheduler: S, on_change: impl Fn(&T) + 'static) -> Self {
        Self {
            shared: Rc::new(Shared {
                scheduler,
                on_change: Box::new(on_change),
                active: Cell::new(None),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Returns the scheduler driving this animator.
    pub fn scheduler(&self) -> &S {
        &self.shared.scheduler
    }

    /// Returns `true` while a transition is waiting for its next frame.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.active.get().is_some()
    }

    /// Stops the transition in flight without completing it.
    ///
    /// Returns `true` if there was one.
    pub fn stop(&self) -> bool {
        match self.shared.active.take() {
            Some(active) => {
                self.shared.scheduler.cancel(active.handle);
                true
            }
            None => false,
        }
    }

    /// Starts a transition from `from` to `to` lasting `duration_ms`.
    ///
    /// Any transition already in flight is cancelled first and will neither
    /// report another state nor run its completion callback. `on_complete`
    /// runs exactly once, on the first frame past the duration.
    ///
    /// `duration_ms` should be strictly positive; with zero the transition
    /// reports `from` once and completes on the following frame.
    ///
    /// If the scheduler cannot pace frames, `to` is reported and
    /// `on_complete` runs before this returns.
    pub fn animate(&self, from: T, to: T, duration_ms: f64, on_complete: Option<OnComplete>) {
        self.stop();
        let id = self.shared.next_id.get() + 1;
        self.shared.next_id.set(id);
        let transition = Rc::new(Transition {
            id,
            from,
            to,
            duration: duration_ms,
            start: Cell::new(None),
            on_complete: RefCell::new(on_complete),
        });
        schedule_step(&self.shared, transition);
    }
}

fn schedule_step<T, S>(shared: &Rc<Shared<T, S>>, transition: Rc<Transition<T>>)
where
    T: Interpolate + 'static,
    S: FrameScheduler + 'static,
{
    if !shared.scheduler.paces_frames() {
        finish(shared, &transition);
        return;
    }
    let id = transition.id;
    let next = Rc::clone(shared);
    let step_transition = Rc::clone(&transition);
    let handle = shared
        .scheduler
        .schedule(Box::new(move |timestamp| step(&next, &step_transition, timestamp)));
    shared.active.set(Some(Active { id, handle }));

    // Scheduling may be what told the host it cannot wait for frames.
    if !shared.scheduler.paces_frames() {
        shared.scheduler.cancel(handle);
        finish(shared, &transition);
    }
}

/// Ends `transition` at its target without waiting for more frames.
fn finish<T, S>(shared: &Rc<Shared<T, S>>, transition: &Rc<Transition<T>>)
where
    T: Interpolate + 'static,
    S: FrameScheduler + 'static,
{
    shared.active.set(None);
    (shared.on_change)(&transition.to);
    let done = transition.on_complete.borrow_mut().take();
    if let Some(done) = done {
        done();
    }
}

fn step<T, S>(shared: &Rc<Shared<T, S>>, transition: &Rc<Transition<T>>, timestamp: f64)
where
    T: Interpolate + 'static,
    S: FrameScheduler + 'static,
{
    // Schedulers that cannot cancel may still deliver a superseded frame.
    if shared.active.get().map(|a| a.id) != Some(transition.id) {
        return;
    }

    let start = match transition.start.get() {
        Some(start) => start,
        None => {
            transition.start.set(Some(timestamp));
            timestamp
        }
    };
    let elapsed = timestamp - start;

    if elapsed <= transition.duration {
        let t = if transition.duration > 0.0 {
            elapsed / transition.duration
        } else {
            0.0
        };
        let state = transition.from.interpolate(&transition.to, t);
        (shared.on_change)(&state);
        schedule_step(shared, Rc::clone(transition));
    } else {
        shared.active.set(None);
        let done = transition.on_complete.borrow_mut().take();
        if let Some(done) = done {
            done();
        }
    }
}

impl<T, S: fmt::Debug> fmt::Debug for Animator<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("scheduler", &self.shared.scheduler)
            .field("running", &self.shared.active.get().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use super::{Animator, Interpolate};
    use crate::{FrameCallback, FrameHandle, FrameScheduler, ImmediateScheduler, ManualScheduler};

    /// A manual scheduler whose host can lose its frame source.
    #[derive(Default)]
    struct FlakyScheduler {
        inner: ManualScheduler,
        lost: Cell<bool>,
    }

    impl FrameScheduler for FlakyScheduler {
        fn schedule(&self, callback: FrameCallback) -> FrameHandle {
            self.inner.schedule(callback)
        }

        fn cancel(&self, handle: FrameHandle) {
            self.inner.cancel(handle);
        }

        fn paces_frames(&self) -> bool {
            !self.lost.get()
        }
    }

    fn recording_animator(
        scheduler: &Rc<ManualScheduler>,
    ) -> (Animator<f64, Rc<ManualScheduler>>, Rc<RefCell<Vec<f64>>>) {
        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&states);
        let animator = Animator::new(Rc::clone(scheduler), move |v: &f64| {
            sink.borrow_mut().push(*v);
        });
        (animator, states)
    }

    #[test]
    fn interpolates_linearly_from_first_frame() {
        let scheduler = Rc::new(ManualScheduler::starting_at(1_000.0));
        let (animator, states) = recording_animator(&scheduler);
        animator.animate(10.0, 20.0, 200.0, None);

        // Time spent before the first frame does not count.
        scheduler.advance(500.0);
        scheduler.advance(50.0);
        scheduler.advance(100.0);
        scheduler.advance(50.0);
        assert_eq!(*states.borrow(), [10.0, 12.5, 17.5, 20.0]);
        assert!(animator.is_running());
    }

    #[test]
    fn completes_once_past_duration() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (animator, states) = recording_animator(&scheduler);
        let completions = Rc::new(Cell::new(0));
        let sink = Rc::clone(&completions);
        animator.animate(
            0.0,
            1.0,
            100.0,
            Some(alloc::boxed::Box::new(move || sink.set(sink.get() + 1))),
        );

        scheduler.advance(0.0);
        scheduler.advance(60.0);
        scheduler.advance(60.0);
        assert_eq!(completions.get(), 1);
        assert_eq!(states.borrow().len(), 2);
        assert!(!animator.is_running());
        assert_eq!(scheduler.pending(), 0);

        scheduler.advance(60.0);
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn new_transition_cancels_previous() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (animator, states) = recording_animator(&scheduler);
        let stale_done = Rc::new(Cell::new(false));
        let sink = Rc::clone(&stale_done);
        animator.animate(
            0.0,
            100.0,
            100.0,
            Some(alloc::boxed::Box::new(move || sink.set(true))),
        );
        scheduler.advance(0.0);
        scheduler.advance(50.0);
        assert_eq!(*states.borrow(), [0.0, 50.0]);

        animator.animate(1_000.0, 2_000.0, 100.0, None);
        assert_eq!(scheduler.pending(), 1);
        states.borrow_mut().clear();

        for _ in 0..5 {
            scheduler.advance(30.0);
        }
        assert!(states.borrow().iter().all(|v| *v >= 1_000.0));
        assert!(!stale_done.get());
    }

    #[test]
    fn stop_drops_pending_frame_and_completion() {
        let scheduler = Rc::new(ManualScheduler::new());
        let (animator, states) = recording_animator(&scheduler);
        let done = Rc::new(Cell::new(false));
        let sink = Rc::clone(&done);
        animator.animate(
            0.0,
            1.0,
            100.0,
            Some(alloc::boxed::Box::new(move || sink.set(true))),
        );
        scheduler.advance(0.0);

        assert!(animator.stop());
        assert!(!animator.stop());
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(500.0);
        assert_eq!(*states.borrow(), [0.0]);
        assert!(!done.get());
    }

    #[test]
    fn map_state_interpolates_matching_keys() {
        let mut from = BTreeMap::new();
        from.insert("x", 0.0);
        from.insert("width", 100.0);
        let mut to = BTreeMap::new();
        to.insert("x", 10.0);
        to.insert("width", 300.0);

        let mid = from.interpolate(&to, 0.5);
        assert_eq!(mid.get("x"), Some(&5.0));
        assert_eq!(mid.get("width"), Some(&200.0));
    }

    #[test]
    fn array_state_interpolates_each_component() {
        let mid = [0.0, 10.0, -4.0].interpolate(&[4.0, 20.0, 4.0], 0.25);
        assert_eq!(mid, [1.0, 12.5, -2.0]);
    }

    #[test]
    fn unpaced_scheduler_completes_at_once() {
        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&states);
        let animator = Animator::new(ImmediateScheduler, move |v: &f64| {
            sink.borrow_mut().push(*v);
        });
        let done = Rc::new(Cell::new(0));
        let done_sink = Rc::clone(&done);
        animator.animate(
            0.0,
            40.0,
            300.0,
            Some(alloc::boxed::Box::new(move || done_sink.set(done_sink.get() + 1))),
        );

        assert_eq!(*states.borrow(), [40.0]);
        assert_eq!(done.get(), 1);
        assert!(!animator.is_running());
    }

    #[test]
    fn losing_frames_mid_transition_completes_it() {
        let scheduler = Rc::new(FlakyScheduler::default());
        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&states);
        let animator = Animator::new(Rc::clone(&scheduler), move |v: &f64| {
            sink.borrow_mut().push(*v);
        });
        let done = Rc::new(Cell::new(false));
        let done_sink = Rc::clone(&done);
        animator.animate(
            0.0,
            100.0,
            100.0,
            Some(alloc::boxed::Box::new(move || done_sink.set(true))),
        );
        scheduler.inner.advance(0.0);
        assert!(animator.is_running());

        // The next frame request finds the host without a frame source.
        scheduler.lost.set(true);
        scheduler.inner.advance(25.0);

        assert_eq!(*states.borrow(), [0.0, 25.0, 100.0]);
        assert!(done.get());
        assert!(!animator.is_running());
        assert_eq!(scheduler.inner.pending(), 0);
    }
}
