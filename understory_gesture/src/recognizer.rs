// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pan/zoom gesture state machine.
//!
//! ```text
//! Idle --press--> Dragging --two touches--> Pinching
//!   ^                |                          |
//!   +----release-----+-------------release------+
//! ```
//!
//! A press only starts a gesture from `Idle`; presses during a gesture are
//! ignored. Wheel turns, double clicks, and clicks are one-shot and never
//! change the state.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point};
use smallvec::SmallVec;
use understory_viewbox::{
    ViewBox, is_two_finger_touch, to_local, touch_midpoint, touch_separation,
};

use crate::event::{InputEvent, MouseButton, PointerPos, TouchPoints};

/// Movement, in page pixels, past which a press no longer counts as a click.
pub const DEFAULT_CLICK_SLOP: f64 = 2.0;

bitflags::bitflags! {
    /// Gesture families a recognizer responds to.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct GestureKinds: u8 {
        /// Wheel turns zoom in or out one step.
        const MOUSE_WHEEL  = 0b0001;
        /// Double clicks zoom in one animated step.
        const DOUBLE_CLICK = 0b0010;
        /// Two-finger pinches zoom continuously.
        const PINCH        = 0b0100;
        /// Press and move pans the view box.
        const DRAG         = 0b1000;
    }
}

impl Default for GestureKinds {
    fn default() -> Self {
        Self::all()
    }
}

/// Static recognizer settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Enabled gesture families.
    pub kinds: GestureKinds,
    /// Mouse button that starts and ends a drag.
    pub drag_button: MouseButton,
    /// See [`DEFAULT_CLICK_SLOP`].
    pub click_slop: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            kinds: GestureKinds::default(),
            drag_button: MouseButton::Primary,
            click_slop: DEFAULT_CLICK_SLOP,
        }
    }
}

/// What the recognizer needs to know about the surface for one event.
///
/// The screen transform is read fresh for every event since the surface may
/// have scrolled or resized since the last one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureContext {
    /// The view box currently shown.
    pub view_box: ViewBox,
    /// Local-to-device transform of the surface.
    pub screen: Affine,
}

/// Direction of a one-step zoom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Show less of the space.
    In,
    /// Show more of the space.
    Out,
}

/// Something the owner of the view box should do in response to an event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureAction {
    /// A drag or pinch started: route move and release events here until
    /// [`GestureAction::EndCapture`], and show the drag cursor.
    BeginCapture,
    /// The gesture ended: stop routing and restore the cursor.
    EndCapture,
    /// Move the view box origin to this point immediately.
    PanTo(Point),
    /// Zoom out by `amount` around `focal` immediately; negative zooms in.
    Pinch {
        /// Local-space point to keep fixed.
        focal: Point,
        /// Relative size change.
        amount: f64,
    },
    /// Zoom one configured step around `focal`.
    StepZoom {
        /// Local-space point to keep fixed.
        focal: Point,
        /// Zoom in or out.
        direction: ZoomDirection,
        /// Whether the step uses the configured animation time.
        animated: bool,
    },
}

/// Actions produced by one event plus how the host should treat the event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response {
    /// Actions to apply, in order.
    pub actions: SmallVec<[GestureAction; 2]>,
    /// Suppress the host's default handling.
    pub prevent_default: bool,
    /// Stop the event from reaching other listeners.
    pub stop_propagation: bool,
}

impl Response {
    fn consumed() -> Self {
        Self {
            prevent_default: true,
            ..Self::default()
        }
    }

    fn with(mut self, action: GestureAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// Where the recognizer is in the press/move/release cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A single pointer is panning the view box.
    Dragging {
        /// View box at the press.
        anchor: ViewBox,
        /// Pointer position at the press.
        press: PointerPos,
    },
    /// Two touches are zooming the view box.
    Pinching {
        /// Touch separation at the last applied step.
        distance: f64,
        /// Pointer position at the press.
        press: PointerPos,
    },
}

impl GestureState {
    fn press(&self) -> Option<PointerPos> {
        match *self {
            Self::Idle => None,
            Self::Dragging { press, .. } | Self::Pinching { press, .. } => Some(press),
        }
    }
}

/// Turns [`InputEvent`]s into [`GestureAction`]s.
#[derive(Clone, Debug, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    state: GestureState,
    suppress_click: bool,
}

impl GestureRecognizer {
    /// Creates an idle recognizer.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::Idle,
            suppress_click: false,
        }
    }

    /// Current settings.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replaces the settings. A gesture in progress continues.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Returns `true` while a drag or pinch is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Returns `true` if the next click will be swallowed.
    #[must_use]
    pub fn suppresses_next_click(&self) -> bool {
        self.suppress_click
    }

    /// Abandons any gesture in progress. Returns `true` if one was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = GestureState::Idle;
        was_active
    }

    /// Feeds one event through the state machine.
    pub fn handle(&mut self, event: &InputEvent, ctx: &GestureContext) -> Response {
        match event {
            InputEvent::Wheel { delta, pos } => self.wheel(*delta, *pos, ctx),
            InputEvent::DoubleClick { pos } => self.double_click(*pos, ctx),
            InputEvent::Click => self.click(),
            InputEvent::MouseDown { button, pos } => {
                if *button == self.config.drag_button {
                    self.press(*pos, None, ctx)
                } else {
                    Response::default()
                }
            }
            InputEvent::TouchStart(touches) => match touches.primary() {
                Some(pos) => self.press(pos, Some(touches), ctx),
                None => Response::default(),
            },
            InputEvent::MouseMove { pos } => self.move_to(*pos, None, ctx),
            InputEvent::TouchMove(touches) => match touches.primary() {
                Some(pos) => self.move_to(pos, Some(touches), ctx),
                None => Response::default(),
            },
            InputEvent::MouseUp { button, .. } => {
                if *button == self.config.drag_button {
                    self.release()
                } else {
                    Response::default()
                }
            }
            InputEvent::MouseOut { from_root } => {
                if *from_root {
                    self.release()
                } else {
                    Response::default()
                }
            }
            InputEvent::TouchEnd(_) | InputEvent::TouchCancel(_) => self.release(),
        }
    }

    fn wheel(&mut self, delta: f64, pos: PointerPos, ctx: &GestureContext) -> Response {
        let response = Response {
            prevent_default: true,
            stop_propagation: true,
            ..Response::default()
        };
        let whole = delta.trunc();
        let enabled = self.config.kinds.contains(GestureKinds::MOUSE_WHEEL);
        if !enabled || !whole.is_finite() || whole == 0.0 {
            return response;
        }
        let direction = if whole > 0.0 {
            ZoomDirection::In
        } else {
            ZoomDirection::Out
        };
        response.with(GestureAction::StepZoom {
            focal: to_local(ctx.screen, pos.client),
            direction,
            animated: false,
        })
    }

    fn double_click(&mut self, pos: PointerPos, ctx: &GestureContext) -> Response {
        let response = Response::consumed();
        if !self.config.kinds.contains(GestureKinds::DOUBLE_CLICK) {
            return response;
        }
        response.with(GestureAction::StepZoom {
            focal: to_local(ctx.screen, pos.client),
            direction: ZoomDirection::In,
            animated: true,
        })
    }

    fn click(&mut self) -> Response {
        if core::mem::take(&mut self.suppress_click) {
            Response::consumed()
        } else {
            Response::default()
        }
    }

    fn press(
        &mut self,
        pos: PointerPos,
        touches: Option<&TouchPoints>,
        ctx: &GestureContext,
    ) -> Response {
        if self.is_active() {
            return Response::default();
        }
        let points = touches.map(TouchPoints::client_points).unwrap_or_default();
        let kinds = self.config.kinds;

        if is_two_finger_touch(&points) && kinds.contains(GestureKinds::PINCH) {
            self.state = GestureState::Pinching {
                distance: touch_separation(&points).unwrap_or(0.0),
                press: pos,
            };
        } else if kinds.contains(GestureKinds::DRAG) {
            self.state = GestureState::Dragging {
                anchor: ctx.view_box,
                press: pos,
            };
        } else {
            return Response::default();
        }

        self.suppress_click = false;
        Response::consumed().with(GestureAction::BeginCapture)
    }

    fn move_to(
        &mut self,
        pos: PointerPos,
        touches: Option<&TouchPoints>,
        ctx: &GestureContext,
    ) -> Response {
        let Some(press) = self.state.press() else {
            return Response::default();
        };
        let points = touches.map(TouchPoints::client_points).unwrap_or_default();
        let two_fingers = is_two_finger_touch(&points);

        if matches!(self.state, GestureState::Pinching { .. }) && !two_fingers {
            return Response::default();
        }
        if two_fingers
            && matches!(self.state, GestureState::Dragging { .. })
            && self.config.kinds.contains(GestureKinds::PINCH)
        {
            self.state = GestureState::Pinching {
                distance: touch_separation(&points).unwrap_or(0.0),
                press,
            };
        }

        if (pos.page - press.page).hypot() > self.config.click_slop {
            self.suppress_click = true;
        }

        let mut response = Response::consumed();
        match self.state {
            GestureState::Dragging { anchor, press } => {
                // Both points use the current transform so scrolling mid-drag
                // does not shift the anchor.
                let start = to_local(ctx.screen, press.client);
                let current = to_local(ctx.screen, pos.client);
                response.actions.push(GestureAction::PanTo(Point::new(
                    anchor.x + (start.x - current.x),
                    anchor.y + (start.y - current.y),
                )));
            }
            GestureState::Pinching { distance, press } => {
                let Some(separation) = touch_separation(&points) else {
                    return response;
                };
                if separation == distance {
                    return response;
                }
                if distance > 0.0
                    && let Some(focal) = touch_midpoint(ctx.screen, &points)
                {
                    response.actions.push(GestureAction::Pinch {
                        focal,
                        amount: (distance - separation) / distance,
                    });
                }
                self.state = GestureState::Pinching {
                    distance: separation,
                    press,
                };
            }
            GestureState::Idle => {}
        }
        response
    }

    fn release(&mut self) -> Response {
        if !self.is_active() {
            return Response::default();
        }
        self.state = GestureState::Idle;
        Response::consumed().with(GestureAction::EndCapture)
    }
}
