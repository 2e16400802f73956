// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pan_zoom --heading-base-level=0

//! Understory Pan Zoom: interactive pan and zoom of a view box.
//!
//! [`PanZoom`] binds to a [`Surface`] (anything whose visible region is a
//! view box, such as an SVG root) and offers:
//!
//! - Programmatic pans and zooms, optionally animated, always clamped to the
//!   configured [`Limits`](understory_viewbox::Limits) and zoom range.
//! - Gesture handling: feed host events to [`PanZoom::handle_event`] and the
//!   drag, pinch, wheel, and double-click gestures move the view box.
//! - Callbacks after every pan and zoom, with the committed view box.
//!
//! The host supplies three things: the [`Surface`], a
//! [`FrameScheduler`](understory_timing::FrameScheduler) that paces
//! animations, and an [`EventMagnet`] that binds and unbinds the platform
//! listeners feeding `handle_event`.
//!
//! The view box reported by [`PanZoom::view_box`] is always the *committed*
//! one: during an animation it is already the final box.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//!
//! use kurbo::Affine;
//! use understory_pan_zoom::{EventMagnet, Options, PanZoom, Surface};
//! use understory_timing::ManualScheduler;
//! use understory_viewbox::ViewBox;
//!
//! #[derive(Default)]
//! struct Svg(Cell<Option<ViewBox>>);
//!
//! impl Surface for Svg {
//!     fn is_graphic_root(&self) -> bool { true }
//!     fn view_box(&self) -> Option<ViewBox> { self.0.get() }
//!     fn set_view_box(&self, vb: &ViewBox) { self.0.set(Some(*vb)); }
//!     fn screen_transform(&self) -> Affine { Affine::IDENTITY }
//!     fn set_preserve_aspect_ratio(&self, _: &str) {}
//! }
//!
//! struct NoInput;
//!
//! impl EventMagnet for NoInput {
//!     fn listen(&self) {}
//!     fn unlisten(&self) {}
//!     fn capture(&self, _: bool) {}
//!     fn cursor(&self) -> Option<String> { None }
//!     fn set_cursor(&self, _: Option<&str>) {}
//! }
//!
//! let mut pz = PanZoom::attach(
//!     Svg::default(),
//!     ManualScheduler::new(),
//!     NoInput,
//!     Options::new().with_animation_time(0.0),
//! )
//! .unwrap();
//!
//! pz.pan_right(None, None);
//! assert_eq!(pz.view_box(), ViewBox::new(100.0, 0.0, 1000.0, 1000.0));
//!
//! pz.zoom_out(None, None, None);
//! assert_eq!(pz.surface().view_box(), Some(pz.view_box()));
//! ```

mod config;
mod error;
mod host;
mod model;
mod pan_zoom;

pub use config::{
    Config, DEFAULT_ANIMATION_TIME_MS, DEFAULT_DRAG_CURSOR, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM,
    DEFAULT_PAN_FACTOR, DEFAULT_ZOOM_FACTOR, InitialViewBox, LimitsOption, LimitsRect, Options,
    PanCallback, PanEvents, PanOptions, PartialViewBox, ZoomCallback, ZoomEvents, ZoomOptions,
};
pub use error::PanZoomError;
pub use host::{EventMagnet, Surface};
pub use model::{Completion, ViewBoxModel};
pub use pan_zoom::{EventOutcome, PRESERVE_ASPECT_RATIO, PanZoom};
