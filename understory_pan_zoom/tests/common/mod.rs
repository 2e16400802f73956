// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording host doubles shared by the pan/zoom integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the helpers."
)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::Affine;
use understory_pan_zoom::{EventMagnet, Options, PanZoom, PanZoomError, Surface};
use understory_timing::ManualScheduler;
use understory_viewbox::ViewBox;

/// A surface that remembers every view box written to it.
#[derive(Debug)]
pub(crate) struct RecordingSurface {
    graphic: bool,
    initial: Option<ViewBox>,
    pub(crate) writes: RefCell<Vec<ViewBox>>,
    pub(crate) screen: Cell<Affine>,
    pub(crate) aspect: RefCell<Option<String>>,
}

impl RecordingSurface {
    pub(crate) fn new(initial: Option<ViewBox>) -> Self {
        Self {
            graphic: true,
            initial,
            writes: RefCell::new(Vec::new()),
            screen: Cell::new(Affine::IDENTITY),
            aspect: RefCell::new(None),
        }
    }

    pub(crate) fn not_graphic() -> Self {
        Self {
            graphic: false,
            ..Self::new(None)
        }
    }

    pub(crate) fn last_write(&self) -> Option<ViewBox> {
        self.writes.borrow().last().copied()
    }

    pub(crate) fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl Surface for RecordingSurface {
    fn is_graphic_root(&self) -> bool {
        self.graphic
    }

    fn view_box(&self) -> Option<ViewBox> {
        self.last_write().or(self.initial)
    }

    fn set_view_box(&self, view_box: &ViewBox) {
        self.writes.borrow_mut().push(*view_box);
    }

    fn screen_transform(&self) -> Affine {
        self.screen.get()
    }

    fn set_preserve_aspect_ratio(&self, value: &str) {
        *self.aspect.borrow_mut() = Some(value.to_owned());
    }
}

/// A magnet that counts binds and tracks capture and cursor state.
#[derive(Debug, Default)]
pub(crate) struct RecordingMagnet {
    pub(crate) listens: Cell<u32>,
    pub(crate) unlistens: Cell<u32>,
    pub(crate) capturing: Cell<bool>,
    pub(crate) cursor: RefCell<Option<String>>,
}

impl RecordingMagnet {
    pub(crate) fn is_listening(&self) -> bool {
        self.listens.get() > self.unlistens.get()
    }
}

impl EventMagnet for RecordingMagnet {
    fn listen(&self) {
        self.listens.set(self.listens.get() + 1);
    }

    fn unlisten(&self) {
        self.unlistens.set(self.unlistens.get() + 1);
        self.capturing.set(false);
    }

    fn capture(&self, active: bool) {
        self.capturing.set(active);
    }

    fn cursor(&self) -> Option<String> {
        self.cursor.borrow().clone()
    }

    fn set_cursor(&self, cursor: Option<&str>) {
        *self.cursor.borrow_mut() = cursor.map(str::to_owned);
    }
}

pub(crate) type TestPanZoom =
    PanZoom<Rc<RecordingSurface>, Rc<ManualScheduler>, Rc<RecordingMagnet>>;

pub(crate) struct Fixture {
    pub(crate) pz: TestPanZoom,
    pub(crate) surface: Rc<RecordingSurface>,
    pub(crate) scheduler: Rc<ManualScheduler>,
    pub(crate) magnet: Rc<RecordingMagnet>,
}

pub(crate) fn try_attach_to(
    surface: RecordingSurface,
    options: Options,
) -> Result<Fixture, PanZoomError> {
    let surface = Rc::new(surface);
    let scheduler = Rc::new(ManualScheduler::new());
    let magnet = Rc::new(RecordingMagnet::default());
    let pz = PanZoom::attach(
        Rc::clone(&surface),
        Rc::clone(&scheduler),
        Rc::clone(&magnet),
        options,
    )?;
    Ok(Fixture {
        pz,
        surface,
        scheduler,
        magnet,
    })
}

/// Attaches to a surface reporting no view box, so the fallback
/// `0 0 1000 1000` becomes the initial view box.
pub(crate) fn attach(options: Options) -> Fixture {
    try_attach_to(RecordingSurface::new(None), options).expect("attach")
}

/// Options whose default duration applies updates at once.
pub(crate) fn immediate() -> Options {
    Options::new().with_animation_time(0.0)
}
