// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;

use crate::ViewBox;

/// Smallest and largest view box sizes reachable by zooming.
///
/// Zoom levels are relative to an initial view box: at `max_zoom` the box is
/// `initial / max_zoom` wide, at `min_zoom` it is `initial / min_zoom` wide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
    /// Width at maximum zoom.
    pub min_width: f64,
    /// Width at minimum zoom.
    pub max_width: f64,
    /// Height at maximum zoom.
    pub min_height: f64,
    /// Height at minimum zoom.
    pub max_height: f64,
}

impl ZoomBounds {
    /// Bounds for zoom levels `min_zoom..=max_zoom` relative to `initial`.
    #[must_use]
    pub fn from_initial(initial: &ViewBox, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_width: initial.width / max_zoom,
            max_width: initial.width / min_zoom,
            min_height: initial.height / max_zoom,
            max_height: initial.height / min_zoom,
        }
    }
}

/// Resizes `view_box` by `amount`, keeping `focal` fixed.
///
/// A positive `amount` zooms out (`size * (1 + amount)`), a negative one
/// zooms in (`size / (1 - amount)`), so `a` followed by `-a` round-trips.
///
/// The new width is first clamped into the bounds, rescaling the height by
/// the same ratio; then the height is clamped, rescaling the width. The
/// second step can push the width back out of its own range when the bounds
/// disagree on aspect ratio; that result is kept as is.
///
/// With a focal point, the point keeps its relative position inside the box.
/// Without one, the box grows or shrinks around its center.
#[must_use]
pub fn scale_view_box(
    view_box: &ViewBox,
    focal: Option<Point>,
    amount: f64,
    bounds: &ZoomBounds,
) -> ViewBox {
    let (mut width, mut height) = if amount < 0.0 {
        (
            view_box.width / (1.0 - amount),
            view_box.height / (1.0 - amount),
        )
    } else {
        (
            view_box.width * (1.0 + amount),
            view_box.height * (1.0 + amount),
        )
    };

    if width < bounds.min_width {
        height *= bounds.min_width / width;
        width = bounds.min_width;
    } else if width > bounds.max_width {
        height *= bounds.max_width / width;
        width = bounds.max_width;
    }

    if height < bounds.min_height {
        width *= bounds.min_height / height;
        height = bounds.min_height;
    } else if height > bounds.max_height {
        width *= bounds.max_height / height;
        height = bounds.max_height;
    }

    let origin = match focal {
        None => Point::new(
            view_box.x + (view_box.width - width) / 2.0,
            view_box.y + (view_box.height - height) / 2.0,
        ),
        Some(focal) => Point::new(
            focal.x + (width / view_box.width) * (view_box.x - focal.x),
            focal.y + (height / view_box.height) * (view_box.y - focal.y),
        ),
    };

    ViewBox::new(origin.x, origin.y, width, height)
}
