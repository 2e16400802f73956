// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::rc::Rc;

use kurbo::Point;
use understory_gesture::{
    GestureAction, GestureContext, GestureRecognizer, GestureState, InputEvent, ZoomDirection,
};
use understory_timing::FrameScheduler;
use understory_viewbox::{ViewBox, ViewBoxUpdate, scale_view_box};

use crate::PanZoomError;
use crate::config::{Config, InitialViewBox, LimitsOption, Options};
use crate::host::{EventMagnet, Surface};
use crate::model::{Completion, ViewBoxModel};

/// Fit mode set on the surface at attach.
pub const PRESERVE_ASPECT_RATIO: &str = "xMidYMid meet";

/// How the host should treat an event after [`PanZoom::handle_event`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Suppress the host's default handling.
    pub prevent_default: bool,
    /// Stop the event from reaching other listeners.
    pub stop_propagation: bool,
}

/// Pan and zoom bound to one surface.
///
/// Every operation that takes a `duration_ms` animates when it is positive
/// and applies at once when it is zero. `None` means the configured
/// animation time. Operations return `&mut Self` for chaining; disabled
/// categories and zero factors turn them into no-ops.
pub struct PanZoom<S, F, M> {
    model: ViewBoxModel<S, F>,
    config: Config,
    magnet: M,
    recognizer: GestureRecognizer,
    /// Magnet cursor to restore when the current gesture ends.
    saved_cursor: Option<Option<String>>,
    listening: bool,
}

impl<S, F, M> PanZoom<S, F, M>
where
    S: Surface + 'static,
    F: FrameScheduler + 'static,
    M: EventMagnet,
{
    /// Binds pan and zoom to `surface`, with gestures read from `magnet`.
    ///
    /// The surface is reset to the initial view box without animation and
    /// the magnet starts listening.
    pub fn attach(
        surface: S,
        scheduler: F,
        magnet: M,
        options: Options,
    ) -> Result<Self, PanZoomError> {
        if !surface.is_graphic_root() {
            return Err(PanZoomError::NotAGraphicSurface);
        }
        let reported = surface.view_box();
        let config = Config::resolve(options, reported)?;
        surface.set_preserve_aspect_ratio(PRESERVE_ASPECT_RATIO);

        let current = reported
            .filter(ViewBox::has_area)
            .unwrap_or(ViewBox::FALLBACK);
        let mut model = ViewBoxModel::new(
            Rc::new(surface),
            scheduler,
            current,
            config.initial_view_box(),
            config.limits(),
        );
        model.reset(Some(0.0), None);

        let recognizer = GestureRecognizer::new(config.gesture_config());
        magnet.listen();
        tracing::debug!(
            initial = %config.initial_view_box(),
            limits = ?config.limits(),
            "pan/zoom attached"
        );

        Ok(Self {
            model,
            config,
            magnet,
            recognizer,
            saved_cursor: None,
            listening: true,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The bound surface.
    pub fn surface(&self) -> &S {
        self.model.surface()
    }

    /// The current event magnet.
    pub fn event_magnet(&self) -> &M {
        &self.magnet
    }

    /// Returns `true` until [`destroy`](Self::destroy).
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Where the drag/pinch state machine is.
    #[must_use]
    pub fn gesture_state(&self) -> &GestureState {
        self.recognizer.state()
    }

    /// Returns `true` while an animated update is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.model.is_animating()
    }

    fn duration(&self, duration_ms: Option<f64>) -> f64 {
        duration_ms.unwrap_or(self.config.animation_time())
    }

    // --- View box ---

    /// The committed view box.
    ///
    /// During an animation this is already the final box.
    #[must_use]
    pub fn view_box(&self) -> ViewBox {
        self.model.get()
    }

    /// Updates the fields present in `update`, clamped to the limits.
    pub fn set_view_box(
        &mut self,
        update: impl Into<ViewBoxUpdate>,
        duration_ms: Option<f64>,
        on_complete: Option<Completion>,
    ) -> &mut Self {
        let duration = self.duration(duration_ms);
        self.model.set(update.into(), Some(duration), on_complete);
        self
    }

    /// Shows exactly `view_box` (after clamping).
    pub fn clone_view_box(
        &mut self,
        view_box: &ViewBox,
        duration_ms: Option<f64>,
        on_complete: Option<Completion>,
    ) -> &mut Self {
        self.set_view_box(*view_box, duration_ms, on_complete)
    }

    /// Returns to the initial view box.
    pub fn reset(
        &mut self,
        duration_ms: Option<f64>,
        on_complete: Option<Completion>,
    ) -> &mut Self {
        let duration = self.duration(duration_ms);
        self.model.reset(Some(duration), on_complete);
        self
    }

    /// Center of the committed view box.
    #[must_use]
    pub fn center(&self) -> Point {
        self.model.center()
    }

    /// Moves the view box so that its center is `(x, y)`.
    pub fn set_center(
        &mut self,
        x: f64,
        y: f64,
        duration_ms: Option<f64>,
        on_complete: Option<Completion>,
    ) -> &mut Self {
        let duration = self.duration(duration_ms);
        self.model
            .set_center(Point::new(x, y), Some(duration), on_complete);
        self
    }

    // --- Pan ---

    /// Moves the view box origin. Absent coordinates keep their value.
    ///
    /// Runs the pan callback with the committed view box once applied.
    pub fn pan(&mut self, x: Option<f64>, y: Option<f64>, duration_ms: Option<f64>) -> &mut Self {
        let duration = self.duration(duration_ms);
        let on_complete = self.config.pan().callback.clone().map(|callback| {
            Box::new(move |vb: ViewBox| callback.call(vb)) as Completion
        });
        self.model
            .set(ViewBoxUpdate::origin(x, y), Some(duration), on_complete);
        self
    }

    /// Shows content further left. `amount` defaults to the pan factor.
    pub fn pan_left(&mut self, amount: Option<f64>, duration_ms: Option<f64>) -> &mut Self {
        self.pan_step(-1.0, 0.0, amount, duration_ms)
    }

    /// Shows content further right. `amount` defaults to the pan factor.
    pub fn pan_right(&mut self, amount: Option<f64>, duration_ms: Option<f64>) -> &mut Self {
        self.pan_step(1.0, 0.0, amount, duration_ms)
    }

    /// Shows content further up. `amount` defaults to the pan factor.
    pub fn pan_up(&mut self, amount: Option<f64>, duration_ms: Option<f64>) -> &mut Self {
        self.pan_step(0.0, -1.0, amount, duration_ms)
    }

    /// Shows content further down. `amount` defaults to the pan factor.
    pub fn pan_down(&mut self, amount: Option<f64>, duration_ms: Option<f64>) -> &mut Self {
        self.pan_step(0.0, 1.0, amount, duration_ms)
    }

    fn pan_step(
        &mut self,
        sx: f64,
        sy: f64,
        amount: Option<f64>,
        duration_ms: Option<f64>,
    ) -> &mut Self {
        let pan = self.config.pan();
        if !pan.enabled {
            return self;
        }
        let amount = match amount {
            Some(amount) => amount,
            None if pan.factor != 0.0 && !pan.factor.is_nan() => pan.factor,
            None => return self,
        };
        let vb = self.model.get();
        let x = (sx != 0.0).then(|| vb.x + sx * amount);
        let y = (sy != 0.0).then(|| vb.y + sy * amount);
        self.pan(x, y, duration_ms)
    }

    // --- Zoom ---

    /// Shows less of the space, keeping `focal` in place (or the center).
    ///
    /// `amount` defaults to the zoom factor; `zoom_in(a)` is `zoom_out(-a)`.
    pub fn zoom_in(
        &mut self,
        focal: Option<Point>,
        amount: Option<f64>,
        duration_ms: Option<f64>,
    ) -> &mut Self {
        match self.zoom_amount(amount) {
            Some(amount) => self.zoom_by(focal, -amount, duration_ms),
            None => self,
        }
    }

    /// Shows more of the space, keeping `focal` in place (or the center).
    ///
    /// Positive amounts grow the view box by `1 + amount`, negative ones
    /// shrink it by `1 - amount`. The size stays within the zoom range and
    /// keeps its aspect ratio.
    pub fn zoom_out(
        &mut self,
        focal: Option<Point>,
        amount: Option<f64>,
        duration_ms: Option<f64>,
    ) -> &mut Self {
        match self.zoom_amount(amount) {
            Some(amount) => self.zoom_by(focal, amount, duration_ms),
            None => self,
        }
    }

    fn zoom_amount(&self, amount: Option<f64>) -> Option<f64> {
        let zoom = self.config.zoom();
        if !zoom.enabled {
            return None;
        }
        match amount {
            Some(amount) => Some(amount),
            None => (zoom.factor != 0.0 && !zoom.factor.is_nan()).then_some(zoom.factor),
        }
    }

    fn zoom_by(
        &mut self,
        focal: Option<Point>,
        amount: f64,
        duration_ms: Option<f64>,
    ) -> &mut Self {
        let duration = self.duration(duration_ms);
        let current = self.model.get();
        let next = scale_view_box(&current, focal, amount, &self.config.zoom_bounds());
        let multiplier = self.config.initial_view_box().width / next.width;
        tracing::trace!(amount, multiplier, ?focal, "zoom");

        let on_complete = self.config.zoom().callback.clone().map(|callback| {
            Box::new(move |vb: ViewBox| callback.call(multiplier, vb)) as Completion
        });
        self.model.set(next.into(), Some(duration), on_complete);
        self
    }

    // --- Gestures ---

    /// Feeds a host event to the gesture recognizer and applies the result.
    ///
    /// Ignored after [`destroy`](Self::destroy).
    pub fn handle_event(&mut self, event: &InputEvent) -> EventOutcome {
        if !self.listening {
            return EventOutcome::default();
        }
        let ctx = GestureContext {
            view_box: self.model.get(),
            screen: self.model.surface().screen_transform(),
        };
        let response = self.recognizer.handle(event, &ctx);
        for action in response.actions {
            self.apply(action);
        }
        EventOutcome {
            prevent_default: response.prevent_default,
            stop_propagation: response.stop_propagation,
        }
    }

    fn apply(&mut self, action: GestureAction) {
        match action {
            GestureAction::BeginCapture => self.begin_capture(),
            GestureAction::EndCapture => self.end_capture(),
            GestureAction::PanTo(origin) => {
                self.pan(Some(origin.x), Some(origin.y), Some(0.0));
            }
            GestureAction::Pinch { focal, amount } => {
                self.zoom_out(Some(focal), Some(amount), Some(0.0));
            }
            GestureAction::StepZoom {
                focal,
                direction,
                animated,
            } => {
                let duration = if animated { None } else { Some(0.0) };
                match direction {
                    ZoomDirection::In => self.zoom_in(Some(focal), None, duration),
                    ZoomDirection::Out => self.zoom_out(Some(focal), None, duration),
                };
            }
        }
    }

    fn begin_capture(&mut self) {
        if let Some(cursor) = &self.config.pan().events.drag_cursor {
            self.saved_cursor = Some(self.magnet.cursor());
            self.magnet.set_cursor(Some(cursor));
        }
        self.magnet.capture(true);
        tracing::debug!(state = ?self.recognizer.state(), "gesture started");
    }

    fn end_capture(&mut self) {
        self.magnet.capture(false);
        if let Some(saved) = self.saved_cursor.take() {
            self.magnet.set_cursor(saved.as_deref());
        }
        tracing::debug!(view_box = %self.model.get(), "gesture ended");
    }

    // --- Lifecycle and settings ---

    /// Unbinds all gesture listeners. A gesture in progress is abandoned.
    ///
    /// A running animation still finishes. Programmatic operations keep
    /// working; only input is ignored.
    pub fn destroy(&mut self) {
        if !self.listening {
            return;
        }
        if self.recognizer.cancel() {
            self.end_capture();
        }
        self.magnet.unlisten();
        self.listening = false;
        tracing::debug!("pan/zoom listeners removed");
    }

    /// Moves gesture listening to `magnet` and returns the previous one.
    ///
    /// The old magnet is unbound first, as by [`destroy`](Self::destroy).
    pub fn set_event_magnet(&mut self, magnet: M) -> M {
        self.destroy();
        let previous = std::mem::replace(&mut self.magnet, magnet);
        self.magnet.listen();
        self.listening = true;
        tracing::debug!("event magnet rebound");
        previous
    }

    /// Changes the default animation time.
    pub fn set_animation_time(&mut self, ms: f64) -> &mut Self {
        self.config.set_animation_time(ms);
        self
    }

    /// Replaces the limits; `None` restores the default margin.
    ///
    /// The view box is not re-clamped until its next update.
    pub fn set_limits(
        &mut self,
        limits: Option<LimitsOption>,
    ) -> Result<&mut Self, PanZoomError> {
        self.config.set_limits(limits)?;
        self.model.set_limits(self.config.limits());
        Ok(self)
    }

    /// Replaces the initial view box, moving the reset target, the zoom
    /// range, and margin-based limits with it.
    pub fn set_initial_view_box(
        &mut self,
        initial: impl Into<InitialViewBox>,
    ) -> Result<&mut Self, PanZoomError> {
        self.config.set_initial_view_box(&initial.into())?;
        self.model.set_initial(self.config.initial_view_box());
        self.model.set_limits(self.config.limits());
        Ok(self)
    }

    /// Always fails: the option set is fixed at attach.
    ///
    /// Use the dedicated setters to change individual settings.
    pub fn set_options(&mut self, _options: Options) -> Result<(), PanZoomError> {
        Err(PanZoomError::OptionsLocked)
    }
}

impl<S, F: fmt::Debug, M: fmt::Debug> fmt::Debug for PanZoom<S, F, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanZoom")
            .field("model", &self.model)
            .field("config", &self.config)
            .field("magnet", &self.magnet)
            .field("recognizer", &self.recognizer)
            .field("listening", &self.listening)
            .finish_non_exhaustive()
    }
}
