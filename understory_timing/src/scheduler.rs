// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::Rc;

/// One-shot callback run on a frame, receiving the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Opaque handle to a scheduled frame callback.
///
/// Handles are only meaningful to the scheduler that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Wraps a host-specific identifier (for example a `requestAnimationFrame` id).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the host-specific identifier.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Runs callbacks on the next display refresh.
///
/// Methods take `&self`: a callback will usually schedule its successor while
/// the scheduler is dispatching, so implementations keep their bookkeeping
/// behind interior mutability and must not hold it borrowed while invoking a
/// callback.
///
/// Neither operation can fail. A host that cannot wait for a frame reports
/// so through [`paces_frames`](Self::paces_frames) instead.
pub trait FrameScheduler {
    /// Schedules `callback` to run once, on the next frame.
    fn schedule(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancels a pending callback.
    ///
    /// After this returns, the callback for `handle` will not run. Cancelling
    /// a handle that already ran (or was never issued) does nothing.
    fn cancel(&self, handle: FrameHandle);

    /// Returns `false` once the scheduler has no way to wait for a frame.
    ///
    /// Callbacks scheduled after that may never run. Transitions on such a
    /// scheduler jump straight to their end state.
    fn paces_frames(&self) -> bool {
        true
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Rc<S> {
    fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        (**self).schedule(callback)
    }

    fn cancel(&self, handle: FrameHandle) {
        (**self).cancel(handle);
    }

    fn paces_frames(&self) -> bool {
        (**self).paces_frames()
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &S {
    fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        (**self).schedule(callback)
    }

    fn cancel(&self, handle: FrameHandle) {
        (**self).cancel(handle);
    }

    fn paces_frames(&self) -> bool {
        (**self).paces_frames()
    }
}

/// Scheduler for hosts with neither a refresh signal nor a timer.
///
/// Nothing is ever deferred: scheduled callbacks are dropped unrun and
/// [`paces_frames`](FrameScheduler::paces_frames) is `false`, so an
/// [`Animator`](crate::Animator) on it completes every transition as soon as
/// it starts.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn schedule(&self, _callback: FrameCallback) -> FrameHandle {
        FrameHandle::from_raw(0)
    }

    fn cancel(&self, _handle: FrameHandle) {}

    fn paces_frames(&self) -> bool {
        false
    }
}
