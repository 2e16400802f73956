// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-independent input events.
//!
//! Hosts translate their native pointer, wheel, and touch events into
//! [`InputEvent`] before handing them to a [`GestureRecognizer`](crate::GestureRecognizer).
//! Positions are in device pixels; the recognizer maps them to local space.

use kurbo::Point;
use smallvec::SmallVec;

/// A mouse button, numbered the way DOM `which` numbers them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Usually the left button (`which == 1`).
    Primary,
    /// Usually the wheel button (`which == 2`).
    Auxiliary,
    /// Usually the right button (`which == 3`).
    Secondary,
    /// Any other button number.
    Other(u16),
}

impl MouseButton {
    /// Converts a DOM `which` value.
    #[must_use]
    pub const fn from_which(which: u16) -> Self {
        match which {
            1 => Self::Primary,
            2 => Self::Auxiliary,
            3 => Self::Secondary,
            n => Self::Other(n),
        }
    }

    /// The DOM `which` value for this button.
    #[must_use]
    pub const fn which(self) -> u16 {
        match self {
            Self::Primary => 1,
            Self::Auxiliary => 2,
            Self::Secondary => 3,
            Self::Other(n) => n,
        }
    }
}

/// Where a pointer or touch is, in two device spaces.
///
/// `client` is relative to the viewport and feeds the local-space mapping.
/// `page` is relative to the document and only measures movement distance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPos {
    /// Viewport-relative position.
    pub client: Point,
    /// Document-relative position.
    pub page: Point,
}

impl PointerPos {
    /// A position where client and page coordinates coincide.
    #[must_use]
    pub const fn at(x: f64, y: f64) -> Self {
        Self {
            client: Point::new(x, y),
            page: Point::new(x, y),
        }
    }
}

/// Touch points attached to a touch event.
pub type Touches = SmallVec<[PointerPos; 2]>;

/// The touch lists of a touch event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TouchPoints {
    /// Touches currently on the surface.
    pub touches: Touches,
    /// Touches that changed in this event.
    pub changed: Touches,
}

impl TouchPoints {
    /// Touch lists where `touches` are both active and changed.
    #[must_use]
    pub fn active(touches: &[PointerPos]) -> Self {
        Self {
            touches: touches.iter().copied().collect(),
            changed: touches.iter().copied().collect(),
        }
    }

    /// The first active touch, or the first changed one once all have lifted.
    #[must_use]
    pub fn primary(&self) -> Option<PointerPos> {
        self.touches
            .first()
            .or_else(|| self.changed.first())
            .copied()
    }

    /// Viewport positions of the active touches.
    #[must_use]
    pub fn client_points(&self) -> SmallVec<[Point; 2]> {
        self.touches.iter().map(|t| t.client).collect()
    }
}

/// An input event delivered to the gesture layer.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// A mouse button went down.
    MouseDown {
        /// Which button.
        button: MouseButton,
        /// Pointer position.
        pos: PointerPos,
    },
    /// The mouse moved.
    MouseMove {
        /// Pointer position.
        pos: PointerPos,
    },
    /// A mouse button was released.
    MouseUp {
        /// Which button.
        button: MouseButton,
        /// Pointer position.
        pos: PointerPos,
    },
    /// The pointer left an element during a capture.
    MouseOut {
        /// `true` when the element left is the capture root itself rather
        /// than one of its descendants.
        from_root: bool,
    },
    /// A click, synthesized by the host after press and release.
    Click,
    /// A double click.
    DoubleClick {
        /// Pointer position.
        pos: PointerPos,
    },
    /// A wheel turn.
    Wheel {
        /// Legacy `wheelDelta`: positive when the wheel turns away from the user.
        delta: f64,
        /// Pointer position.
        pos: PointerPos,
    },
    /// One or more touches started.
    TouchStart(TouchPoints),
    /// Touches moved.
    TouchMove(TouchPoints),
    /// One or more touches lifted.
    TouchEnd(TouchPoints),
    /// The host cancelled the touch sequence.
    TouchCancel(TouchPoints),
}

impl InputEvent {
    /// Returns `true` for touch events.
    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::TouchStart(_) | Self::TouchMove(_) | Self::TouchEnd(_) | Self::TouchCancel(_)
        )
    }

    /// The position the event is reported at, if any.
    ///
    /// Touch events report their first active touch, falling back to the
    /// first changed touch.
    #[must_use]
    pub fn position(&self) -> Option<PointerPos> {
        match self {
            Self::MouseDown { pos, .. }
            | Self::MouseMove { pos }
            | Self::MouseUp { pos, .. }
            | Self::DoubleClick { pos }
            | Self::Wheel { pos, .. } => Some(*pos),
            Self::TouchStart(t) | Self::TouchMove(t) | Self::TouchEnd(t) | Self::TouchCancel(t) => {
                t.primary()
            }
            Self::MouseOut { .. } | Self::Click => None,
        }
    }

    /// The active touch lists of a touch event.
    #[must_use]
    pub fn touch_points(&self) -> Option<&TouchPoints> {
        match self {
            Self::TouchStart(t) | Self::TouchMove(t) | Self::TouchEnd(t) | Self::TouchCancel(t) => {
                Some(t)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::{InputEvent, MouseButton, PointerPos, TouchPoints, Touches};

    #[test]
    fn which_round_trips() {
        for which in 0..6 {
            assert_eq!(MouseButton::from_which(which).which(), which);
        }
        assert_eq!(MouseButton::from_which(1), MouseButton::Primary);
    }

    #[test]
    fn touch_position_falls_back_to_changed_touches() {
        let lifted = TouchPoints {
            touches: Touches::new(),
            changed: [PointerPos::at(3.0, 4.0)].into_iter().collect(),
        };
        let event = InputEvent::TouchEnd(lifted);
        assert!(event.is_touch());
        assert_eq!(event.position(), Some(PointerPos::at(3.0, 4.0)));
        assert_eq!(InputEvent::Click.position(), None);
    }

    #[test]
    fn client_points_follow_active_touches() {
        let t = TouchPoints::active(&[PointerPos::at(1.0, 2.0), PointerPos::at(5.0, 6.0)]);
        assert_eq!(
            t.client_points().as_slice(),
            &[Point::new(1.0, 2.0), Point::new(5.0, 6.0)]
        );
    }
}
