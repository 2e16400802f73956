// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clamping rectangle for view boxes.
//!
//! [`Limits::clamp`] keeps a view box inside `[min_x, max_x] × [min_y, max_y]`:
//!
//! 1. If the box is wider than the limits, it is shrunk to the limits' width
//!    and its height scaled by the same ratio. The same then happens for the
//!    height, so the aspect ratio survives both steps.
//! 2. The origin is then moved inside: `x = max(min(x, max_x - width), min_x)`,
//!    using the (possibly shrunk) width, and likewise for `y`.

use core::str::FromStr;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::ViewBox;

/// Margin used when no limits are configured, in percent.
pub const DEFAULT_MARGIN_PERCENT: f64 = 15.0;

/// Bounds the view box may not leave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    /// Smallest allowed left edge.
    pub min_x: f64,
    /// Largest allowed right edge.
    pub max_x: f64,
    /// Smallest allowed top edge.
    pub min_y: f64,
    /// Largest allowed bottom edge.
    pub max_y: f64,
}

impl Limits {
    /// Creates limits from explicit edges.
    #[must_use]
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Limits extending `reference` by a percentage margin on every side.
    ///
    /// The horizontal margin is a percentage of the reference *height* and the
    /// vertical margin a percentage of its *width*, so both axes can move by
    /// the same absolute distance on a square box.
    #[must_use]
    pub fn from_margin(reference: &ViewBox, margin: LimitMargin) -> Self {
        let horizontal = reference.height * margin.horizontal / 100.0;
        let vertical = reference.width * margin.vertical / 100.0;
        Self {
            min_x: reference.x - horizontal,
            max_x: reference.x + reference.width + horizontal,
            min_y: reference.y - vertical,
            max_y: reference.y + reference.height + vertical,
        }
    }

    /// Horizontal span of the limits.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.max_x - self.min_x).abs()
    }

    /// Vertical span of the limits.
    #[must_use]
    pub fn height(&self) -> f64 {
        (self.max_y - self.min_y).abs()
    }

    /// Returns `candidate` shrunk and moved to fit inside the limits.
    #[must_use]
    pub fn clamp(&self, candidate: ViewBox) -> ViewBox {
        let mut vb = candidate;

        let limits_width = self.width();
        if vb.width > limits_width {
            vb.height *= limits_width / vb.width;
            vb.width = limits_width;
        }
        let limits_height = self.height();
        if vb.height > limits_height {
            vb.width *= limits_height / vb.height;
            vb.height = limits_height;
        }

        vb.x = vb.x.min(self.max_x - vb.width).max(self.min_x);
        vb.y = vb.y.min(self.max_y - vb.height).max(self.min_y);
        vb
    }

    /// Returns `true` if `view_box` lies within the limits, allowing `tolerance`
    /// of floating point slack on each edge.
    #[must_use]
    pub fn contains(&self, view_box: &ViewBox, tolerance: f64) -> bool {
        view_box.x >= self.min_x - tolerance
            && view_box.y >= self.min_y - tolerance
            && view_box.x + view_box.width <= self.max_x + tolerance
            && view_box.y + view_box.height <= self.max_y + tolerance
    }
}

/// Percentage margins used to derive [`Limits`] from a reference view box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimitMargin {
    /// Margin above and below, in percent of the reference width.
    pub vertical: f64,
    /// Margin left and right, in percent of the reference height.
    pub horizontal: f64,
}

impl LimitMargin {
    /// The same margin on both axes.
    #[must_use]
    pub const fn uniform(percent: f64) -> Self {
        Self {
            vertical: percent,
            horizontal: percent,
        }
    }
}

impl Default for LimitMargin {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN_PERCENT)
    }
}

/// Error returned when a margin string is malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseMarginError {
    /// The string held no values, or more than two.
    #[error("expected 1 or 2 margin values, found {0}")]
    WrongCount(usize),
    /// A value was not a finite number.
    #[error("margin value #{index} is not a finite percentage")]
    InvalidNumber {
        /// Zero-based position of the offending value.
        index: usize,
    },
}

/// Parses one or two percentages in CSS order: `"vertical horizontal"`.
///
/// A single value applies to both axes. The `%` sign is optional, so
/// `"15%"`, `"15"`, and `"10% 20%"` are all accepted.
impl FromStr for LimitMargin {
    type Err = ParseMarginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = [0.0_f64; 2];
        let mut count = 0;
        for (index, field) in s.split_whitespace().enumerate() {
            if index < 2 {
                let value: f64 = field
                    .trim_end_matches('%')
                    .parse()
                    .map_err(|_| ParseMarginError::InvalidNumber { index })?;
                if !value.is_finite() {
                    return Err(ParseMarginError::InvalidNumber { index });
                }
                values[index] = value;
            }
            count += 1;
        }
        match count {
            1 => Ok(Self::uniform(values[0])),
            2 => Ok(Self {
                vertical: values[0],
                horizontal: values[1],
            }),
            n => Err(ParseMarginError::WrongCount(n)),
        }
    }
}
