// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: frame scheduling and time-based transitions.
//!
//! This crate provides small, host-agnostic building blocks for work that has
//! to happen "on the next display refresh":
//!
//! - [`FrameScheduler`]: schedule a one-shot callback for the next frame and
//!   cancel it again. Hosts implement this on top of their native refresh
//!   signal (for example `requestAnimationFrame` in a browser).
//! - [`FallbackScheduler`]: a timer queue paced at a fixed ~16 ms interval for
//!   hosts without a native refresh signal.
//! - [`ImmediateScheduler`]: for hosts with no way to wait at all; transitions
//!   complete as soon as they start.
//! - [`ManualScheduler`]: a virtual-clock scheduler that only advances when
//!   told to, for deterministic tests.
//! - [`Animator`]: linear interpolation of an [`Interpolate`] state between two
//!   values over a fixed duration, driven by any [`FrameScheduler`].
//!
//! All types are single-threaded: callbacks run on whichever thread drives
//! the scheduler, between synchronous operations.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use understory_timing::{Animator, ManualScheduler};
//!
//! let scheduler = Rc::new(ManualScheduler::new());
//! let seen = Rc::new(Cell::new(0.0));
//!
//! let sink = Rc::clone(&seen);
//! let animator = Animator::new(Rc::clone(&scheduler), move |v: &f64| sink.set(*v));
//! animator.animate(0.0, 100.0, 100.0, None);
//!
//! // The first frame establishes the start time.
//! scheduler.advance(0.0);
//! assert_eq!(seen.get(), 0.0);
//!
//! scheduler.advance(50.0);
//! assert_eq!(seen.get(), 50.0);
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod queue;
mod scheduler;
mod transition;

pub use queue::{FRAME_INTERVAL_MS, FallbackScheduler, ManualScheduler, paced_deadline};
pub use scheduler::{FrameCallback, FrameHandle, FrameScheduler, ImmediateScheduler};
pub use transition::{Animator, Interpolate, OnComplete};
