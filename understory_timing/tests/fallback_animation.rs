// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives an `Animator` through the timer-paced `FallbackScheduler`, the way
//! a host without a native refresh signal would.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use understory_timing::{Animator, FRAME_INTERVAL_MS, FallbackScheduler};

fn fixture() -> (Rc<Cell<f64>>, Rc<FallbackScheduler>) {
    let clock = Rc::new(Cell::new(0.0));
    let source = Rc::clone(&clock);
    let scheduler = Rc::new(FallbackScheduler::new(move || source.get()));
    (clock, scheduler)
}

#[test]
fn transition_runs_to_completion_on_paced_frames() {
    let (clock, scheduler) = fixture();
    let states = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&states);
    let animator = Animator::new(Rc::clone(&scheduler), move |v: &f64| {
        sink.borrow_mut().push(*v);
    });

    let done = Rc::new(Cell::new(0));
    let done_sink = Rc::clone(&done);
    animator.animate(
        0.0,
        100.0,
        100.0,
        Some(Box::new(move || done_sink.set(done_sink.get() + 1))),
    );
    assert_eq!(scheduler.next_deadline(), Some(FRAME_INTERVAL_MS));

    // Nothing is due before the first deadline.
    clock.set(10.0);
    assert_eq!(scheduler.poll(), 0);

    for _ in 0..20 {
        clock.set(clock.get() + FRAME_INTERVAL_MS);
        scheduler.poll();
    }

    let states = states.borrow();
    assert_eq!(states.first(), Some(&0.0));
    assert!(states.windows(2).all(|w| w[0] < w[1]), "{states:?}");
    assert!(states.iter().all(|v| (0.0..=100.0).contains(v)));
    assert_eq!(done.get(), 1);
    assert!(!animator.is_running());
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn superseded_transition_is_cancelled_in_the_queue() {
    let (clock, scheduler) = fixture();
    let animator = Animator::new(Rc::clone(&scheduler), |_: &f64| {});

    animator.animate(0.0, 1.0, 50.0, None);
    animator.animate(5.0, 6.0, 50.0, None);
    assert_eq!(scheduler.pending(), 1);

    clock.set(1_000.0);
    assert_eq!(scheduler.poll(), 1);
}
