// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use kurbo::{Point, Rect};
use understory_timing::Interpolate;

/// The visible rectangle of a coordinate space.
///
/// `ViewBox` is a plain value: every update replaces it wholesale, and
/// getters hand out copies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewBox {
    /// Left edge in local units.
    pub x: f64,
    /// Top edge in local units.
    pub y: f64,
    /// Width in local units.
    pub width: f64,
    /// Height in local units.
    pub height: f64,
}

impl ViewBox {
    /// The view box used when a surface reports none: `0 0 1000 1000`.
    pub const FALLBACK: Self = Self::new(0.0, 0.0, 1000.0, 1000.0);

    /// Creates a view box from its origin and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` if the box can be panned and zoomed: every field is
    /// finite and both extents are positive.
    ///
    /// Surfaces report the all-zero box when no view box has been set.
    #[must_use]
    pub fn has_area(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The same-sized box moved so that its center is `center`.
    #[must_use]
    pub fn centered_on(&self, center: Point) -> Self {
        Self::new(
            center.x - self.width / 2.0,
            center.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }

    /// Converts to a [`Rect`] spanning the same area.
    #[must_use]
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl From<Rect> for ViewBox {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

impl From<ViewBox> for Rect {
    fn from(view_box: ViewBox) -> Self {
        view_box.to_rect()
    }
}

/// Formats as the four space-separated numbers of the SVG `viewBox` attribute.
impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// Error returned when a view box string does not hold four numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseViewBoxError {
    /// The string held a number of fields other than four.
    #[error("expected 4 view box values, found {0}")]
    WrongCount(usize),
    /// A field was not a finite number.
    #[error("view box value #{index} is not a finite number")]
    InvalidNumber {
        /// Zero-based position of the offending field.
        index: usize,
    },
}

/// Parses `"x y width height"`; fields may be separated by whitespace and/or commas.
impl FromStr for ViewBox {
    type Err = ParseViewBoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = [0.0_f64; 4];
        let mut count = 0;
        for (index, field) in s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|f| !f.is_empty())
            .enumerate()
        {
            if index < 4 {
                let value: f64 = field
                    .parse()
                    .map_err(|_| ParseViewBoxError::InvalidNumber { index })?;
                if !value.is_finite() {
                    return Err(ParseViewBoxError::InvalidNumber { index });
                }
                values[index] = value;
            }
            count += 1;
        }
        if count != 4 {
            return Err(ParseViewBoxError::WrongCount(count));
        }
        let [x, y, width, height] = values;
        Ok(Self::new(x, y, width, height))
    }
}

impl Interpolate for ViewBox {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self::new(
            self.x.interpolate(&to.x, t),
            self.y.interpolate(&to.y, t),
            self.width.interpolate(&to.width, t),
            self.height.interpolate(&to.height, t),
        )
    }
}

/// A partial view box: fields left as `None` keep their current value.
///
/// `Some(0.0)` is a real coordinate, distinct from "not provided".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewBoxUpdate {
    /// New left edge.
    pub x: Option<f64>,
    /// New top edge.
    pub y: Option<f64>,
    /// New width.
    pub width: Option<f64>,
    /// New height.
    pub height: Option<f64>,
}

impl ViewBoxUpdate {
    /// An update that changes nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: None,
            y: None,
            width: None,
            height: None,
        }
    }

    /// An update that moves the origin only.
    #[must_use]
    pub const fn origin(x: Option<f64>, y: Option<f64>) -> Self {
        Self {
            x,
            y,
            width: None,
            height: None,
        }
    }

    /// Sets the left edge.
    #[must_use]
    pub const fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Sets the top edge.
    #[must_use]
    pub const fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    /// Sets the width.
    #[must_use]
    pub const fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the height.
    #[must_use]
    pub const fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Fills the unset fields from `base`.
    #[must_use]
    pub fn apply_to(&self, base: ViewBox) -> ViewBox {
        ViewBox::new(
            self.x.unwrap_or(base.x),
            self.y.unwrap_or(base.y),
            self.width.unwrap_or(base.width),
            self.height.unwrap_or(base.height),
        )
    }
}

impl From<ViewBox> for ViewBoxUpdate {
    fn from(view_box: ViewBox) -> Self {
        Self {
            x: Some(view_box.x),
            y: Some(view_box.y),
            width: Some(view_box.width),
            height: Some(view_box.height),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::string::ToString;

    use kurbo::{Point, Rect};

    use super::{ParseViewBoxError, ViewBox, ViewBoxUpdate};

    #[test]
    fn parses_whitespace_and_comma_separated_values() {
        assert_eq!(
            "0 0 1000 500".parse::<ViewBox>(),
            Ok(ViewBox::new(0.0, 0.0, 1000.0, 500.0))
        );
        assert_eq!(
            "  -10\t20\n 30.5   40 ".parse::<ViewBox>(),
            Ok(ViewBox::new(-10.0, 20.0, 30.5, 40.0))
        );
        assert_eq!(
            "1,2, 3 ,4".parse::<ViewBox>(),
            Ok(ViewBox::new(1.0, 2.0, 3.0, 4.0))
        );
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!(
            "0 0 100".parse::<ViewBox>(),
            Err(ParseViewBoxError::WrongCount(3))
        );
        assert_eq!(
            "0 0 100 100 5".parse::<ViewBox>(),
            Err(ParseViewBoxError::WrongCount(5))
        );
        assert_eq!(
            "0 zero 100 100".parse::<ViewBox>(),
            Err(ParseViewBoxError::InvalidNumber { index: 1 })
        );
        assert_eq!(
            "0 0 inf 100".parse::<ViewBox>(),
            Err(ParseViewBoxError::InvalidNumber { index: 2 })
        );
        assert_eq!("".parse::<ViewBox>(), Err(ParseViewBoxError::WrongCount(0)));
    }

    #[test]
    fn displays_as_attribute_value() {
        assert_eq!(
            ViewBox::new(-62.5, 0.0, 1125.0, 1000.0).to_string(),
            "-62.5 0 1125 1000"
        );
    }

    #[test]
    fn update_distinguishes_zero_from_absent() {
        let base = ViewBox::new(5.0, 6.0, 7.0, 8.0);
        let update = ViewBoxUpdate::new().with_x(0.0).with_height(0.0);
        assert_eq!(update.apply_to(base), ViewBox::new(0.0, 6.0, 7.0, 0.0));
        assert_eq!(ViewBoxUpdate::new().apply_to(base), base);
    }

    #[test]
    fn center_and_recentering() {
        let vb = ViewBox::new(0.0, 0.0, 1000.0, 500.0);
        assert_eq!(vb.center(), Point::new(500.0, 250.0));
        let moved = vb.centered_on(Point::new(0.0, 0.0));
        assert_eq!(moved, ViewBox::new(-500.0, -250.0, 1000.0, 500.0));
        assert_eq!(moved.center(), Point::ZERO);
    }

    #[test]
    fn rect_conversion_preserves_area() {
        let vb = ViewBox::new(10.0, 20.0, 30.0, 40.0);
        let rect: Rect = vb.into();
        assert_eq!(rect, Rect::new(10.0, 20.0, 40.0, 60.0));
        assert_eq!(ViewBox::from(rect), vb);
    }

    #[test]
    fn area_detection() {
        assert!(ViewBox::FALLBACK.has_area());
        assert!(!ViewBox::default().has_area());
        assert!(!ViewBox::new(0.0, 0.0, 0.0, 500.0).has_area());
        assert!(!ViewBox::new(0.0, 0.0, 500.0, -1.0).has_area());
        assert!(!ViewBox::new(f64::NAN, 0.0, 500.0, 500.0).has_area());
        assert!(!ViewBox::new(0.0, 0.0, f64::INFINITY, 500.0).has_area());
    }
}
