// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_viewbox::{ParseMarginError, ParseViewBoxError, ViewBox};

/// Errors raised while attaching or reconfiguring a [`PanZoom`](crate::PanZoom).
///
/// Pan, zoom, and view box updates never fail; they clamp instead.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PanZoomError {
    /// The attach target is not the root of a graphic surface.
    #[error("pan/zoom can only be attached to a graphic surface root")]
    NotAGraphicSurface,
    /// The initial view box string could not be parsed.
    #[error("invalid initial view box: {0}")]
    InvalidInitialViewBox(#[from] ParseViewBoxError),
    /// The initial view box has a zero, negative, or non-finite extent.
    #[error("initial view box {0} has no area")]
    EmptyInitialViewBox(ViewBox),
    /// The limits margin string could not be parsed.
    #[error("invalid limits: {0}")]
    InvalidLimits(#[from] ParseMarginError),
    /// The zoom range is empty, inverted, or not positive.
    #[error("invalid zoom range: min {min_zoom}, max {max_zoom}")]
    InvalidZoomRange {
        /// Configured minimum zoom.
        min_zoom: f64,
        /// Configured maximum zoom.
        max_zoom: f64,
    },
    /// The option set was replaced after attach.
    #[error("options cannot be replaced once attached; use the dedicated setters")]
    OptionsLocked,
}
