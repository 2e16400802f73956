// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device-space to local-space mapping for input points.
//!
//! Hosts report a *screen transform* mapping the surface's local coordinates
//! to device pixels. Input positions travel the other way, through its
//! inverse. Device coordinates are truncated to whole pixels first.

use kurbo::{Affine, Point};

/// Maps a device-space point into local coordinates.
///
/// `screen` maps local to device space. A singular transform has no inverse
/// and yields the device point unchanged.
#[must_use]
pub fn to_local(screen: Affine, device: Point) -> Point {
    let device = device.trunc();
    if screen.determinant() == 0.0 {
        return device;
    }
    screen.inverse() * device
}

/// Returns `true` when exactly two touches are active.
#[must_use]
pub fn is_two_finger_touch(touches: &[Point]) -> bool {
    touches.len() == 2
}

/// Distance between the first two touches, in device pixels.
#[must_use]
pub fn touch_separation(touches: &[Point]) -> Option<f64> {
    match touches {
        [a, b, ..] => Some((*a - *b).hypot()),
        _ => None,
    }
}

/// Midpoint of the first two touches, mapped into local coordinates.
#[must_use]
pub fn touch_midpoint(screen: Affine, touches: &[Point]) -> Option<Point> {
    match touches {
        [a, b, ..] => Some(to_local(screen, a.midpoint(*b))),
        _ => None,
    }
}
