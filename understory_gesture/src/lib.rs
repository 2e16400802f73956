// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: pan and zoom gestures for a view box.
//!
//! A [`GestureRecognizer`] consumes host-independent [`InputEvent`]s and
//! produces [`GestureAction`]s for whoever owns the view box:
//!
//! - **Drag**: press with the configured button (or one finger) and move to
//!   pan. The view box follows the pointer in local space, so the content
//!   under the pointer stays under it.
//! - **Pinch**: two touches zoom around their midpoint. A drag that gains a
//!   second finger becomes a pinch.
//! - **Wheel** and **double click**: one-step zooms around the pointer.
//! - **Click suppression**: once a press moves more than a couple of pixels,
//!   the click the host synthesizes afterwards is swallowed.
//!
//! The recognizer only decides; it never touches a surface. Each call to
//! [`GestureRecognizer::handle`] takes a [`GestureContext`] carrying the
//! current view box and screen transform, and returns a [`Response`] with the
//! actions plus whether the host should prevent the event's default handling.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Affine, Point};
//! use understory_gesture::{
//!     GestureAction, GestureContext, GestureRecognizer, InputEvent, MouseButton, PointerPos,
//! };
//! use understory_viewbox::ViewBox;
//!
//! let mut recognizer = GestureRecognizer::default();
//! let ctx = GestureContext {
//!     view_box: ViewBox::new(0.0, 0.0, 1000.0, 1000.0),
//!     screen: Affine::IDENTITY,
//! };
//!
//! let down = InputEvent::MouseDown {
//!     button: MouseButton::Primary,
//!     pos: PointerPos::at(100.0, 100.0),
//! };
//! let response = recognizer.handle(&down, &ctx);
//! assert_eq!(response.actions.as_slice(), &[GestureAction::BeginCapture]);
//!
//! // Dragging right by 30 pixels moves the view box left by 30 units.
//! let moved = InputEvent::MouseMove { pos: PointerPos::at(130.0, 100.0) };
//! let response = recognizer.handle(&moved, &ctx);
//! assert_eq!(
//!     response.actions.as_slice(),
//!     &[GestureAction::PanTo(Point::new(-30.0, 0.0))]
//! );
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod event;
mod recognizer;

pub use event::{InputEvent, MouseButton, PointerPos, TouchPoints, Touches};
pub use recognizer::{
    DEFAULT_CLICK_SLOP, GestureAction, GestureConfig, GestureContext, GestureKinds,
    GestureRecognizer, GestureState, Response, ZoomDirection,
};
