// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_viewbox --heading-base-level=0

//! Understory View Box: the geometry behind view-box based pan and zoom.
//!
//! A *view box* is the rectangle of an underlying coordinate space that is
//! currently mapped onto a visible surface (the `viewBox` of an SVG root is the
//! canonical example). Panning moves the rectangle, zooming resizes it.
//!
//! This crate provides small, headless pieces of that model:
//! - [`ViewBox`]: the `{x, y, width, height}` rectangle, its `"x y w h"`
//!   string form, and partial updates through [`ViewBoxUpdate`].
//! - [`Limits`]: a clamping rectangle for the view box, built explicitly or
//!   from a percentage [`LimitMargin`] around a reference view box.
//! - [`ZoomBounds`] and [`scale_view_box`]: aspect-preserving zoom steps with
//!   minimum/maximum zoom relative to an initial view box, anchored on a
//!   focal point.
//! - [`to_local`] and the touch helpers: mapping device-space input points
//!   into the surface's local coordinates through its current transform.
//!
//! It does **not** own a surface, listen to input, or animate. Those live in
//! higher-level crates.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_viewbox::{LimitMargin, Limits, ViewBox, ZoomBounds, scale_view_box};
//!
//! let initial = ViewBox::new(0.0, 0.0, 1000.0, 1000.0);
//! let limits = Limits::from_margin(&initial, LimitMargin::uniform(15.0));
//! let bounds = ZoomBounds::from_initial(&initial, 0.5, 3.0);
//!
//! // Zoom in by 25% toward the top-left corner of the box.
//! let zoomed = scale_view_box(&initial, Some(Point::ZERO), -0.25, &bounds);
//! assert_eq!(zoomed, ViewBox::new(0.0, 0.0, 800.0, 800.0));
//!
//! // Panning far away is pulled back inside the limits.
//! let panned = limits.clamp(ViewBox::new(-5000.0, 0.0, 800.0, 800.0));
//! assert_eq!(panned.x, -150.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod limits;
mod transform;
mod viewbox;
mod zoom;

pub use limits::{DEFAULT_MARGIN_PERCENT, LimitMargin, Limits, ParseMarginError};
pub use transform::{is_two_finger_touch, to_local, touch_midpoint, touch_separation};
pub use viewbox::{ParseViewBoxError, ViewBox, ViewBoxUpdate};
pub use zoom::{ZoomBounds, scale_view_box};
