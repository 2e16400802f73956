// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use understory_timing::{FrameCallback, FrameHandle, FrameScheduler, paced_deadline};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

/// How a pending frame was requested, for cancelling it.
#[derive(Clone, Copy, Debug)]
enum Request {
    AnimationFrame(i32),
    Timeout(i32),
}

struct PendingFrame {
    request: Request,
    _closure: Closure<dyn FnMut(JsValue)>,
}

/// [`FrameScheduler`] backed by `requestAnimationFrame`.
///
/// Each pending closure is kept alive in a table until its frame runs or is
/// cancelled. If the browser refuses an animation frame the request falls
/// back to `setTimeout`, paced [`FRAME_INTERVAL_MS`] apart. If that fails too
/// the scheduler stops [pacing frames](FrameScheduler::paces_frames) and
/// transitions complete immediately. The same holds from the start for a
/// page without a global `window`.
///
/// [`FRAME_INTERVAL_MS`]: understory_timing::FRAME_INTERVAL_MS
pub struct RafScheduler {
    window: Option<Window>,
    next_key: Cell<u64>,
    last_timeout: Cell<f64>,
    paced: Cell<bool>,
    frames: Rc<RefCell<BTreeMap<u64, PendingFrame>>>,
}

impl RafScheduler {
    /// Schedules frames on `window`.
    pub fn new(window: Window) -> Self {
        Self::with_window(Some(window))
    }

    /// Schedules frames on the global window. Without one, no frame is ever
    /// scheduled and transitions complete immediately.
    pub fn from_global() -> Self {
        let window = web_sys::window();
        if window.is_none() {
            tracing::debug!("no global window; transitions will not animate");
        }
        Self::with_window(window)
    }

    fn with_window(window: Option<Window>) -> Self {
        Self {
            paced: Cell::new(window.is_some()),
            window,
            next_key: Cell::new(0),
            last_timeout: Cell::new(f64::NEG_INFINITY),
            frames: Rc::new(RefCell::new(BTreeMap::new())),
        }
    }

    /// Number of frames requested and not yet run.
    pub fn pending(&self) -> usize {
        self.frames.borrow().len()
    }

    fn request_timeout(
        &self,
        window: &Window,
        function: &js_sys::Function,
    ) -> Result<i32, JsValue> {
        let now = now(window);
        let deadline = paced_deadline(now, self.last_timeout.get());
        self.last_timeout.set(deadline);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the wait is at most one frame interval"
        )]
        let wait = (deadline - now).ceil() as i32;
        window.set_timeout_with_callback_and_timeout_and_arguments_0(function, wait)
    }
}

/// Milliseconds on the same clock as animation frame timestamps.
fn now(window: &Window) -> f64 {
    window
        .performance()
        .map_or_else(js_sys::Date::now, |performance| performance.now())
}

impl FrameScheduler for RafScheduler {
    fn schedule(&self, callback: FrameCallback) -> FrameHandle {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        let handle = FrameHandle::from_raw(key);
        let Some(window) = &self.window else {
            return handle;
        };

        let frames = Rc::clone(&self.frames);
        let clock = window.clone();
        let mut callback = Some(callback);
        let closure = Closure::wrap(Box::new(move |timestamp: JsValue| {
            // Removing the entry drops this closure once the call returns.
            let finished = frames.borrow_mut().remove(&key);
            // Timeouts are not handed a timestamp.
            let timestamp = timestamp.as_f64().unwrap_or_else(|| now(&clock));
            if let Some(callback) = callback.take() {
                callback(timestamp);
            }
            drop(finished);
        }) as Box<dyn FnMut(JsValue)>);

        let function = closure.as_ref().unchecked_ref::<js_sys::Function>();
        let request = match window.request_animation_frame(function) {
            Ok(id) => Ok(Request::AnimationFrame(id)),
            Err(err) => {
                tracing::warn!(?err, "requestAnimationFrame failed; falling back to a timer");
                self.request_timeout(window, function).map(Request::Timeout)
            }
        };

        match request {
            Ok(request) => {
                self.frames.borrow_mut().insert(
                    key,
                    PendingFrame {
                        request,
                        _closure: closure,
                    },
                );
            }
            Err(err) => {
                tracing::warn!(?err, "setTimeout failed; transitions will not animate");
                self.paced.set(false);
            }
        }
        handle
    }

    fn cancel(&self, handle: FrameHandle) {
        let frame = self.frames.borrow_mut().remove(&handle.raw());
        let (Some(frame), Some(window)) = (frame, &self.window) else {
            return;
        };
        match frame.request {
            Request::AnimationFrame(id) => {
                if let Err(err) = window.cancel_animation_frame(id) {
                    tracing::warn!(?err, "cancelAnimationFrame failed");
                }
            }
            Request::Timeout(id) => window.clear_timeout_with_handle(id),
        }
    }

    fn paces_frames(&self) -> bool {
        self.paced.get()
    }
}

impl fmt::Debug for RafScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RafScheduler")
            .field("next_key", &self.next_key.get())
            .field("pending", &self.pending())
            .field("paced", &self.paced.get())
            .finish_non_exhaustive()
    }
}
