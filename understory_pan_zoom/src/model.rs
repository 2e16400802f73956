// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view box of one surface and how updates reach it.
//!
//! The model always knows the *committed* view box: the clamped target of
//! the last update. Immediate updates write it to the surface at once;
//! animated ones leave the surface showing intermediate boxes until the
//! transition ends, then write the target exactly. A new animated update
//! starts from the box last written, so superseding a transition midway
//! never jumps to its target first.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::Point;
use understory_timing::{Animator, FrameScheduler};
use understory_viewbox::{Limits, ViewBox, ViewBoxUpdate};

use crate::host::Surface;

/// Runs once an update is fully applied, with the committed view box.
pub type Completion = Box<dyn FnOnce(ViewBox)>;

/// Owns the committed view box of a surface.
pub struct ViewBoxModel<S, F> {
    surface: Rc<S>,
    view_box: ViewBox,
    shown: Rc<Cell<ViewBox>>,
    initial: ViewBox,
    limits: Limits,
    animator: Animator<ViewBox, F>,
}

impl<S, F> ViewBoxModel<S, F>
where
    S: Surface + 'static,
    F: FrameScheduler + 'static,
{
    /// Creates a model for `surface` currently showing `view_box`.
    ///
    /// Nothing is written to the surface until the first update.
    pub fn new(
        surface: Rc<S>,
        scheduler: F,
        view_box: ViewBox,
        initial: ViewBox,
        limits: Limits,
    ) -> Self {
        let shown = Rc::new(Cell::new(view_box));
        let target = Rc::clone(&surface);
        let frame_shown = Rc::clone(&shown);
        let animator = Animator::new(scheduler, move |vb: &ViewBox| {
            show(&*target, &frame_shown, *vb);
        });
        Self {
            surface,
            view_box,
            shown,
            initial,
            limits,
            animator,
        }
    }

    /// The committed view box.
    #[must_use]
    pub fn get(&self) -> ViewBox {
        self.view_box
    }

    /// The surface this model writes to.
    pub fn surface(&self) -> &Rc<S> {
        &self.surface
    }

    /// Current limits.
    #[must_use]
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Replaces the limits. The committed view box is left as is until the
    /// next update.
    pub fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    /// The view box [`reset`](Self::reset) returns to.
    #[must_use]
    pub fn initial(&self) -> ViewBox {
        self.initial
    }

    /// Replaces the reset target.
    pub fn set_initial(&mut self, initial: ViewBox) {
        self.initial = initial;
    }

    /// Returns `true` while an animated update is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Applies `update` over the committed view box, clamped to the limits.
    ///
    /// With a positive duration the surface is animated towards the result
    /// and `on_complete` runs after the last frame. Otherwise the surface is
    /// written at once and `on_complete` runs before this returns. Either
    /// way any transition already running is superseded, and the committed
    /// view box is returned immediately.
    pub fn set(
        &mut self,
        update: ViewBoxUpdate,
        duration_ms: Option<f64>,
        on_complete: Option<Completion>,
    ) -> ViewBox {
        let from = self.shown.get();
        let target = self.limits.clamp(update.apply_to(from));
        self.view_box = target;

        match duration_ms {
            Some(ms) if ms > 0.0 => {
                tracing::trace!(view_box = %target, duration_ms = ms, "animating view box");
                let surface = Rc::clone(&self.surface);
                let shown = Rc::clone(&self.shown);
                self.animator.animate(
                    from,
                    target,
                    ms,
                    Some(Box::new(move || {
                        show(&*surface, &shown, target);
                        if let Some(done) = on_complete {
                            done(target);
                        }
                    })),
                );
            }
            _ => {
                self.animator.stop();
                tracing::trace!(view_box = %target, "setting view box");
                show(&*self.surface, &self.shown, target);
                if let Some(done) = on_complete {
                    done(target);
                }
            }
        }
        target
    }

    /// Returns to the initial view box.
    pub fn reset(&mut self, duration_ms: Option<f64>, on_complete: Option<Completion>) -> ViewBox {
        self.set(self.initial.into(), duration_ms, on_complete)
    }

    /// Center of the committed view box.
    #[must_use]
    pub fn center(&self) -> Point {
        self.view_box.center()
    }

    /// Moves the committed view box so that its center is `center`.
    pub fn set_center(
        &mut self,
        center: Point,
        duration_ms: Option<f64>,
        on_complete: Option<Completion>,
    ) -> ViewBox {
        let moved = self.view_box.centered_on(center);
        self.set(moved.into(), duration_ms, on_complete)
    }
}

fn show<S: Surface + ?Sized>(surface: &S, shown: &Cell<ViewBox>, view_box: ViewBox) {
    surface.set_view_box(&view_box);
    shown.set(view_box);
}

impl<S, F: std::fmt::Debug> std::fmt::Debug for ViewBoxModel<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewBoxModel")
            .field("view_box", &self.view_box)
            .field("initial", &self.initial)
            .field("limits", &self.limits)
            .field("animator", &self.animator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use kurbo::{Affine, Point};
    use understory_timing::ManualScheduler;
    use understory_viewbox::{Limits, ViewBox, ViewBoxUpdate};

    use super::ViewBoxModel;
    use crate::host::Surface;

    #[derive(Default)]
    struct Attr(RefCell<Vec<ViewBox>>);

    impl Surface for Attr {
        fn is_graphic_root(&self) -> bool {
            true
        }
        fn view_box(&self) -> Option<ViewBox> {
            self.0.borrow().last().copied()
        }
        fn set_view_box(&self, view_box: &ViewBox) {
            self.0.borrow_mut().push(*view_box);
        }
        fn screen_transform(&self) -> Affine {
            Affine::IDENTITY
        }
        fn set_preserve_aspect_ratio(&self, _: &str) {}
    }

    type Model = ViewBoxModel<Attr, Rc<ManualScheduler>>;

    fn model() -> (Model, Rc<Attr>, Rc<ManualScheduler>) {
        let surface = Rc::new(Attr::default());
        let scheduler = Rc::new(ManualScheduler::new());
        let m = ViewBoxModel::new(
            Rc::clone(&surface),
            Rc::clone(&scheduler),
            ViewBox::FALLBACK,
            ViewBox::FALLBACK,
            Limits::new(-100.0, 1100.0, -100.0, 1100.0),
        );
        (m, surface, scheduler)
    }

    #[test]
    fn immediate_set_clamps_writes_then_completes() {
        let (mut m, surface, _) = model();
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let out = m.set(
            ViewBox::new(-200.0, 0.0, 1000.0, 1000.0).into(),
            None,
            Some(Box::new(move |vb| sink.set(Some(vb)))),
        );
        assert_eq!(out, ViewBox::new(-100.0, 0.0, 1000.0, 1000.0));
        assert_eq!(seen.get(), Some(out));
        assert_eq!(surface.view_box(), Some(out));
    }

    #[test]
    fn explicit_zero_is_not_absent() {
        let (mut m, _, _) = model();
        m.set(ViewBoxUpdate::origin(Some(50.0), Some(60.0)), None, None);
        let out = m.set(ViewBoxUpdate::new().with_x(0.0), None, None);
        assert_eq!(out, ViewBox::new(0.0, 60.0, 1000.0, 1000.0));
    }

    #[test]
    fn animated_set_commits_at_once_and_writes_exact_target_last() {
        let (mut m, surface, scheduler) = model();
        let target = m.set(
            ViewBoxUpdate::origin(Some(33.3), None),
            Some(200.0),
            None,
        );
        assert_eq!(m.get(), target);
        assert!(surface.0.borrow().is_empty());

        scheduler.advance(0.0);
        scheduler.advance(150.0);
        scheduler.advance(150.0);
        assert!(!m.is_animating());
        let writes = surface.0.borrow();
        assert_eq!(writes.first(), Some(&ViewBox::FALLBACK));
        assert_eq!(writes.last(), Some(&target));
    }

    #[test]
    fn immediate_set_supersedes_animation() {
        let (mut m, surface, scheduler) = model();
        m.set(ViewBoxUpdate::origin(Some(100.0), None), Some(200.0), None);
        scheduler.advance(0.0);
        let out = m.set(ViewBoxUpdate::origin(Some(-50.0), None), None, None);
        assert!(!m.is_animating());

        scheduler.advance(500.0);
        assert_eq!(surface.view_box(), Some(out));
    }

    #[test]
    fn center_round_trip() {
        let (mut m, _, _) = model();
        let out = m.set_center(Point::new(600.0, 500.0), None, None);
        assert_eq!(out, ViewBox::new(100.0, 0.0, 1000.0, 1000.0));
        assert_eq!(m.center(), Point::new(600.0, 500.0));
        assert_eq!(m.reset(None, None), ViewBox::FALLBACK);
    }

    #[test]
    fn superseding_animation_continues_from_shown_box() {
        let (mut m, surface, scheduler) = model();
        let first = m.set(ViewBoxUpdate::origin(Some(100.0), None), Some(200.0), None);
        scheduler.advance(0.0);
        scheduler.advance(100.0);
        assert_eq!(surface.view_box(), Some(ViewBox::new(50.0, 0.0, 1000.0, 1000.0)));

        let second = m.set(ViewBoxUpdate::origin(None, Some(100.0)), Some(200.0), None);
        assert_eq!(second, ViewBox::new(100.0, 100.0, 1000.0, 1000.0));
        scheduler.advance(0.0);
        assert_eq!(surface.view_box(), Some(ViewBox::new(50.0, 0.0, 1000.0, 1000.0)));

        for _ in 0..5 {
            scheduler.advance(50.0);
        }
        assert!(!m.is_animating());
        assert_eq!(surface.view_box(), Some(second));
        assert!(!surface.0.borrow().contains(&first));
    }
}
