// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller-facing options and the frozen configuration derived from them.
//!
//! [`Options`] mirrors the option object a page script would pass: every
//! field is optional and missing fields fall back to the defaults below, so
//! a partial JSON object deserializes straight into a complete set of
//! options. [`Config::resolve`] then validates the options against the
//! surface and produces the [`Config`] a [`PanZoom`](crate::PanZoom) runs on.
//!
//! The event magnet is not an option here; it is passed to
//! [`PanZoom::attach`](crate::PanZoom::attach) directly.

use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use understory_gesture::{DEFAULT_CLICK_SLOP, GestureConfig, GestureKinds, MouseButton};
use understory_viewbox::{LimitMargin, Limits, ParseMarginError, ViewBox, ViewBoxUpdate, ZoomBounds};

use crate::PanZoomError;

/// Duration of animated updates when none is given.
pub const DEFAULT_ANIMATION_TIME_MS: f64 = 200.0;
/// Relative size change of one zoom step.
pub const DEFAULT_ZOOM_FACTOR: f64 = 0.25;
/// Smallest zoom level, relative to the initial view box.
pub const DEFAULT_MIN_ZOOM: f64 = 0.5;
/// Largest zoom level, relative to the initial view box.
pub const DEFAULT_MAX_ZOOM: f64 = 3.0;
/// Distance of one pan step, in local units.
pub const DEFAULT_PAN_FACTOR: f64 = 100.0;
/// Cursor shown on the event magnet while dragging.
pub const DEFAULT_DRAG_CURSOR: &str = "move";

/// Called after a zoom with the zoom level relative to the initial view box
/// and the committed view box.
#[derive(Clone)]
pub struct ZoomCallback(Rc<dyn Fn(f64, ViewBox)>);

impl ZoomCallback {
    /// Wraps a closure.
    pub fn new(f: impl Fn(f64, ViewBox) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, multiplier: f64, view_box: ViewBox) {
        (self.0)(multiplier, view_box);
    }
}

impl fmt::Debug for ZoomCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ZoomCallback")
    }
}

/// Called after a pan with the committed view box.
#[derive(Clone)]
pub struct PanCallback(Rc<dyn Fn(ViewBox)>);

impl PanCallback {
    /// Wraps a closure.
    pub fn new(f: impl Fn(ViewBox) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, view_box: ViewBox) {
        (self.0)(view_box);
    }
}

impl fmt::Debug for PanCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PanCallback")
    }
}

/// A view box given field by field. Missing fields come from
/// [`ViewBox::FALLBACK`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialViewBox {
    /// Left edge.
    pub x: Option<f64>,
    /// Top edge.
    pub y: Option<f64>,
    /// Width.
    pub width: Option<f64>,
    /// Height.
    pub height: Option<f64>,
}

impl From<PartialViewBox> for ViewBoxUpdate {
    fn from(p: PartialViewBox) -> Self {
        Self {
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
        }
    }
}

/// The `initialViewBox` option.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InitialViewBox {
    /// `"x y width height"`.
    Text(String),
    /// A rectangle, possibly partial.
    Rect(PartialViewBox),
}

impl InitialViewBox {
    fn resolve(&self) -> Result<ViewBox, PanZoomError> {
        let view_box = match self {
            Self::Text(text) => text.parse()?,
            Self::Rect(rect) => ViewBoxUpdate::from(*rect).apply_to(ViewBox::FALLBACK),
        };
        if !view_box.has_area() {
            return Err(PanZoomError::EmptyInitialViewBox(view_box));
        }
        Ok(view_box)
    }
}

impl From<ViewBox> for InitialViewBox {
    fn from(vb: ViewBox) -> Self {
        Self::Rect(PartialViewBox {
            x: Some(vb.x),
            y: Some(vb.y),
            width: Some(vb.width),
            height: Some(vb.height),
        })
    }
}

impl From<&str> for InitialViewBox {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Explicit limit edges.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsRect {
    /// Smallest allowed left edge.
    pub min_x: f64,
    /// Largest allowed right edge.
    pub max_x: f64,
    /// Smallest allowed top edge.
    pub min_y: f64,
    /// Largest allowed bottom edge.
    pub max_y: f64,
}

/// The `limits` option.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LimitsOption {
    /// Explicit edges.
    Rect(LimitsRect),
    /// One margin percentage for both axes.
    Percent(f64),
    /// `"vertical horizontal"` margin percentages, `%` optional.
    Margin(String),
}

impl LimitsOption {
    /// Limits for this option around `reference`.
    pub fn resolve(&self, reference: &ViewBox) -> Result<Limits, ParseMarginError> {
        Ok(match self {
            Self::Rect(r) => Limits::new(r.min_x, r.max_x, r.min_y, r.max_y),
            Self::Percent(p) => Limits::from_margin(reference, LimitMargin::uniform(*p)),
            Self::Margin(text) => Limits::from_margin(reference, text.parse()?),
        })
    }
}

impl From<Limits> for LimitsOption {
    fn from(l: Limits) -> Self {
        Self::Rect(LimitsRect {
            min_x: l.min_x,
            max_x: l.max_x,
            min_y: l.min_y,
            max_y: l.max_y,
        })
    }
}

impl From<f64> for LimitsOption {
    fn from(percent: f64) -> Self {
        Self::Percent(percent)
    }
}

impl From<&str> for LimitsOption {
    fn from(text: &str) -> Self {
        Self::Margin(text.to_owned())
    }
}

/// Which zoom gestures are recognized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomEvents {
    /// Zoom with the mouse wheel.
    pub mouse_wheel: bool,
    /// Zoom in on double click.
    pub double_click: bool,
    /// Zoom with two-finger pinches.
    pub pinch: bool,
}

impl Default for ZoomEvents {
    fn default() -> Self {
        Self {
            mouse_wheel: true,
            double_click: true,
            pinch: true,
        }
    }
}

/// The `zoom` option group.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoomOptions {
    /// `false` turns every zoom operation and gesture into a no-op.
    pub enabled: bool,
    /// Default step for zoom operations; `0` disables them.
    pub factor: f64,
    /// Smallest zoom level: the view box is at most `initial / min_zoom` wide.
    pub min_zoom: f64,
    /// Largest zoom level: the view box is at least `initial / max_zoom` wide.
    pub max_zoom: f64,
    /// Gesture switches.
    pub events: ZoomEvents,
    /// Called after every zoom.
    #[serde(skip)]
    pub callback: Option<ZoomCallback>,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: DEFAULT_ZOOM_FACTOR,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            events: ZoomEvents::default(),
            callback: None,
        }
    }
}

/// Which pan gestures are recognized.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanEvents {
    /// Pan by dragging.
    pub drag: bool,
    /// Mouse button that drags, in DOM `which` numbering.
    pub drag_mouse_button: u16,
    /// Cursor shown while dragging; `None` leaves the cursor alone.
    pub drag_cursor: Option<String>,
}

impl Default for PanEvents {
    fn default() -> Self {
        Self {
            drag: true,
            drag_mouse_button: 1,
            drag_cursor: Some(DEFAULT_DRAG_CURSOR.to_owned()),
        }
    }
}

/// The `pan` option group.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanOptions {
    /// `false` turns every pan operation and the drag gesture into a no-op.
    pub enabled: bool,
    /// Default step for directional pans; `0` disables them.
    pub factor: f64,
    /// Gesture switches.
    pub events: PanEvents,
    /// Called after every pan.
    #[serde(skip)]
    pub callback: Option<PanCallback>,
}

impl Default for PanOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            factor: DEFAULT_PAN_FACTOR,
            events: PanEvents::default(),
            callback: None,
        }
    }
}

/// Options accepted by [`PanZoom::attach`](crate::PanZoom::attach).
///
/// ```rust
/// use understory_pan_zoom::Options;
///
/// let options: Options = serde_json::from_str(
///     r#"{ "animationTime": 300, "zoom": { "maxZoom": 8 }, "pan": { "factor": 50 } }"#,
/// )
/// .unwrap();
/// assert_eq!(options.zoom.max_zoom, 8.0);
/// // Fields not mentioned keep their defaults.
/// assert_eq!(options.zoom.factor, 0.25);
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// The view box `reset` returns to and zoom levels are relative to.
    /// Defaults to the surface's own view box.
    pub initial_view_box: Option<InitialViewBox>,
    /// Duration of updates that do not specify one, in milliseconds.
    pub animation_time: Option<f64>,
    /// Where the view box may go. Defaults to a 15% margin around the
    /// initial view box.
    pub limits: Option<LimitsOption>,
    /// Zoom settings.
    pub zoom: ZoomOptions,
    /// Pan settings.
    pub pan: PanOptions,
}

impl Options {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial view box.
    #[must_use]
    pub fn with_initial_view_box(mut self, initial: impl Into<InitialViewBox>) -> Self {
        self.initial_view_box = Some(initial.into());
        self
    }

    /// Sets the default animation time.
    #[must_use]
    pub fn with_animation_time(mut self, ms: f64) -> Self {
        self.animation_time = Some(ms);
        self
    }

    /// Sets the limits.
    #[must_use]
    pub fn with_limits(mut self, limits: impl Into<LimitsOption>) -> Self {
        self.limits = Some(limits.into());
        self
    }

    /// Sets the zoom callback.
    #[must_use]
    pub fn on_zoom(mut self, f: impl Fn(f64, ViewBox) + 'static) -> Self {
        self.zoom.callback = Some(ZoomCallback::new(f));
        self
    }

    /// Sets the pan callback.
    #[must_use]
    pub fn on_pan(mut self, f: impl Fn(ViewBox) + 'static) -> Self {
        self.pan.callback = Some(PanCallback::new(f));
        self
    }
}

/// Validated, frozen settings of an attached [`PanZoom`](crate::PanZoom).
///
/// Only the dedicated setters on `PanZoom` change a `Config`, and each one
/// recomputes whatever depends on the field it changes.
#[derive(Clone, Debug)]
pub struct Config {
    initial_view_box: ViewBox,
    animation_time: f64,
    limits_option: Option<LimitsOption>,
    limits: Limits,
    zoom: ZoomOptions,
    pan: PanOptions,
}

impl Config {
    /// Merges `options` over the defaults and validates the result.
    ///
    /// `surface_view_box` is the view box the surface reports; an absent or
    /// all-zero box is replaced by [`ViewBox::FALLBACK`].
    pub fn resolve(
        options: Options,
        surface_view_box: Option<ViewBox>,
    ) -> Result<Self, PanZoomError> {
        let base = surface_view_box
            .filter(ViewBox::has_area)
            .unwrap_or(ViewBox::FALLBACK);
        let initial_view_box = match &options.initial_view_box {
            Some(initial) => initial.resolve()?,
            None => base,
        };

        let (min_zoom, max_zoom) = (options.zoom.min_zoom, options.zoom.max_zoom);
        let valid_range = min_zoom.is_finite()
            && max_zoom.is_finite()
            && min_zoom > 0.0
            && max_zoom >= min_zoom;
        if !valid_range {
            return Err(PanZoomError::InvalidZoomRange { min_zoom, max_zoom });
        }

        let limits = resolve_limits(options.limits.as_ref(), &initial_view_box)?;
        Ok(Self {
            initial_view_box,
            animation_time: sanitize_duration(
                options.animation_time.unwrap_or(DEFAULT_ANIMATION_TIME_MS),
            ),
            limits_option: options.limits,
            limits,
            zoom: options.zoom,
            pan: options.pan,
        })
    }

    /// The reference view box for zoom levels and `reset`.
    #[must_use]
    pub fn initial_view_box(&self) -> ViewBox {
        self.initial_view_box
    }

    /// Default animation time in milliseconds.
    #[must_use]
    pub fn animation_time(&self) -> f64 {
        self.animation_time
    }

    /// Resolved limits.
    #[must_use]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Zoom settings.
    #[must_use]
    pub fn zoom(&self) -> &ZoomOptions {
        &self.zoom
    }

    /// Pan settings.
    #[must_use]
    pub fn pan(&self) -> &PanOptions {
        &self.pan
    }

    /// Smallest and largest view box sizes zoom may produce.
    #[must_use]
    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds::from_initial(
            &self.initial_view_box,
            self.zoom.min_zoom,
            self.zoom.max_zoom,
        )
    }

    /// Recognizer settings matching the enabled gestures.
    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        let mut kinds = GestureKinds::empty();
        if self.zoom.enabled {
            kinds.set(GestureKinds::MOUSE_WHEEL, self.zoom.events.mouse_wheel);
            kinds.set(GestureKinds::DOUBLE_CLICK, self.zoom.events.double_click);
            kinds.set(GestureKinds::PINCH, self.zoom.events.pinch);
        }
        kinds.set(GestureKinds::DRAG, self.pan.enabled && self.pan.events.drag);
        GestureConfig {
            kinds,
            drag_button: MouseButton::from_which(self.pan.events.drag_mouse_button),
            click_slop: DEFAULT_CLICK_SLOP,
        }
    }

    pub(crate) fn set_animation_time(&mut self, ms: f64) {
        self.animation_time = sanitize_duration(ms);
    }

    pub(crate) fn set_limits(&mut self, limits: Option<LimitsOption>) -> Result<(), PanZoomError> {
        self.limits = resolve_limits(limits.as_ref(), &self.initial_view_box)?;
        self.limits_option = limits;
        Ok(())
    }

    /// Margin-based limits follow the new initial view box.
    pub(crate) fn set_initial_view_box(
        &mut self,
        initial: &InitialViewBox,
    ) -> Result<(), PanZoomError> {
        let initial_view_box = initial.resolve()?;
        self.limits = resolve_limits(self.limits_option.as_ref(), &initial_view_box)?;
        self.initial_view_box = initial_view_box;
        Ok(())
    }
}

fn resolve_limits(
    option: Option<&LimitsOption>,
    reference: &ViewBox,
) -> Result<Limits, PanZoomError> {
    match option {
        Some(option) => Ok(option.resolve(reference)?),
        None => Ok(Limits::from_margin(reference, LimitMargin::default())),
    }
}

fn sanitize_duration(ms: f64) -> f64 {
    if ms.is_finite() && ms > 0.0 { ms } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use understory_gesture::{GestureKinds, MouseButton};
    use understory_viewbox::{Limits, ParseMarginError, ViewBox};

    use super::{Config, InitialViewBox, LimitsOption, Options};
    use crate::PanZoomError;

    #[test]
    fn surface_view_box_is_the_default_initial_box() {
        let surface = ViewBox::new(10.0, 20.0, 300.0, 200.0);
        let config = Config::resolve(Options::new(), Some(surface)).unwrap();
        assert_eq!(config.initial_view_box(), surface);
        assert_eq!(config.animation_time(), 200.0);
    }

    #[test]
    fn unset_surface_box_falls_back() {
        let config = Config::resolve(Options::new(), Some(ViewBox::default())).unwrap();
        assert_eq!(config.initial_view_box(), ViewBox::FALLBACK);
        let config = Config::resolve(Options::new(), None).unwrap();
        assert_eq!(config.initial_view_box(), ViewBox::FALLBACK);
    }

    #[test]
    fn partial_rect_fills_from_fallback() {
        let options = Options::new().with_initial_view_box(InitialViewBox::Rect(
            super::PartialViewBox {
                x: Some(-50.0),
                width: Some(400.0),
                ..super::PartialViewBox::default()
            },
        ));
        let config = Config::resolve(options, None).unwrap();
        assert_eq!(
            config.initial_view_box(),
            ViewBox::new(-50.0, 0.0, 400.0, 1000.0)
        );
    }

    #[test]
    fn initial_box_without_area_is_rejected() {
        let options = Options::new().with_initial_view_box(InitialViewBox::Rect(
            super::PartialViewBox {
                width: Some(0.0),
                ..super::PartialViewBox::default()
            },
        ));
        assert_eq!(
            Config::resolve(options, None).unwrap_err(),
            PanZoomError::EmptyInitialViewBox(ViewBox::new(0.0, 0.0, 0.0, 1000.0))
        );

        let options = Options::new().with_initial_view_box("0 0 800 -1");
        assert!(matches!(
            Config::resolve(options, None),
            Err(PanZoomError::EmptyInitialViewBox(_))
        ));
    }

    #[test]
    fn surface_box_without_area_falls_back() {
        let flat = ViewBox::new(0.0, 0.0, 500.0, 0.0);
        let config = Config::resolve(Options::new(), Some(flat)).unwrap();
        assert_eq!(config.initial_view_box(), ViewBox::FALLBACK);
    }

    #[test]
    fn bad_initial_string_is_rejected() {
        let options = Options::new().with_initial_view_box("0 0 ten 10");
        assert!(matches!(
            Config::resolve(options, None),
            Err(PanZoomError::InvalidInitialViewBox(_))
        ));
    }

    #[test]
    fn limits_forms() {
        let reference = ViewBox::new(0.0, 0.0, 1000.0, 500.0);
        assert_eq!(
            LimitsOption::from(10.0).resolve(&reference),
            Ok(Limits::new(-50.0, 1050.0, -100.0, 600.0))
        );
        assert_eq!(
            LimitsOption::from("0% 10%").resolve(&reference),
            Ok(Limits::new(-50.0, 1050.0, 0.0, 500.0))
        );
        assert_eq!(
            LimitsOption::from("a b").resolve(&reference),
            Err(ParseMarginError::InvalidNumber { index: 0 })
        );
        let explicit = Limits::new(-1.0, 1.0, -2.0, 2.0);
        assert_eq!(
            LimitsOption::from(explicit).resolve(&reference),
            Ok(explicit)
        );
    }

    #[test]
    fn zoom_range_is_validated() {
        let mut options = Options::new();
        options.zoom.min_zoom = 4.0;
        options.zoom.max_zoom = 2.0;
        assert_eq!(
            Config::resolve(options, None).unwrap_err(),
            PanZoomError::InvalidZoomRange {
                min_zoom: 4.0,
                max_zoom: 2.0
            }
        );
        let mut options = Options::new();
        options.zoom.min_zoom = 0.0;
        assert!(Config::resolve(options, None).is_err());
    }

    #[test]
    fn negative_animation_time_means_immediate() {
        let config = Config::resolve(Options::new().with_animation_time(-5.0), None).unwrap();
        assert_eq!(config.animation_time(), 0.0);
    }

    #[test]
    fn gesture_config_follows_switches() {
        let mut options = Options::new();
        options.zoom.events.pinch = false;
        options.pan.events.drag_mouse_button = 3;
        let config = Config::resolve(options, None).unwrap();
        let gestures = config.gesture_config();
        assert_eq!(
            gestures.kinds,
            GestureKinds::MOUSE_WHEEL | GestureKinds::DOUBLE_CLICK | GestureKinds::DRAG
        );
        assert_eq!(gestures.drag_button, MouseButton::Secondary);

        let mut options = Options::new();
        options.zoom.enabled = false;
        options.pan.enabled = false;
        let config = Config::resolve(options, None).unwrap();
        assert!(config.gesture_config().kinds.is_empty());
    }

    #[test]
    fn changing_initial_box_moves_margin_limits() {
        let mut config = Config::resolve(Options::new().with_limits(0.0), None).unwrap();
        config
            .set_initial_view_box(&InitialViewBox::from("100 100 10 10"))
            .unwrap();
        assert_eq!(config.limits(), Limits::new(100.0, 110.0, 100.0, 110.0));
        assert_eq!(config.initial_view_box(), ViewBox::new(100.0, 100.0, 10.0, 10.0));
    }
}
