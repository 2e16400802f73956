// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM value conversions that do not need a browser.

use kurbo::{Affine, Point};
use understory_gesture::{MouseButton, PointerPos};
use understory_viewbox::ViewBox;

/// Maps a DOM `MouseEvent.button` (0 = primary) to a [`MouseButton`].
#[must_use]
pub fn mouse_button(button: i16) -> MouseButton {
    match u16::try_from(button) {
        Ok(button) => MouseButton::from_which(button + 1),
        Err(_) => MouseButton::Other(0),
    }
}

/// Wheel delta in the recognizer's convention: positive zooms in.
///
/// DOM `deltaY` grows when scrolling down, the opposite sign.
#[must_use]
pub fn wheel_delta(delta_y: f64) -> f64 {
    -delta_y
}

/// A pointer position from integer client and page coordinates.
#[must_use]
pub fn pointer_pos(client: (i32, i32), page: (i32, i32)) -> PointerPos {
    PointerPos {
        client: Point::new(f64::from(client.0), f64::from(client.1)),
        page: Point::new(f64::from(page.0), f64::from(page.1)),
    }
}

/// An affine from the six `SVGMatrix` components `a..f`.
#[must_use]
pub fn affine_from_matrix(m: [f32; 6]) -> Affine {
    Affine::new(m.map(f64::from))
}

/// Parses a `viewBox` attribute. Missing or malformed values read as unset.
#[must_use]
pub fn parse_view_box_attribute(value: Option<&str>) -> Option<ViewBox> {
    value?.parse().ok()
}
