// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What the pan/zoom core needs from its host environment.
//!
//! Both traits take `&self`: hosts wrap live objects (DOM elements, scene
//! nodes) that are shared with the rest of the application, and the core
//! keeps them behind `Rc`.

use std::rc::Rc;

use kurbo::Affine;
use understory_viewbox::ViewBox;

/// A rendering surface whose visible region is a view box.
pub trait Surface {
    /// Returns `true` if this is the root of a graphic surface, the only
    /// kind of element pan/zoom can attach to.
    fn is_graphic_root(&self) -> bool;

    /// The view box currently set on the surface, if any.
    fn view_box(&self) -> Option<ViewBox>;

    /// Replaces the surface's view box.
    fn set_view_box(&self, view_box: &ViewBox);

    /// Current local-to-device transform.
    ///
    /// Queried for every input event; the surface may move between events.
    fn screen_transform(&self) -> Affine;

    /// Sets how the view box is fitted into the surface's viewport.
    fn set_preserve_aspect_ratio(&self, value: &str);
}

/// The element gesture listeners are bound to.
///
/// Listening is split in two: [`listen`](Self::listen) binds press, click,
/// double click, wheel, and touch-start listeners on the magnet itself, while
/// [`capture`](Self::capture) binds move and release listeners at document
/// level for the duration of a drag or pinch, so the gesture survives the
/// pointer leaving the magnet.
pub trait EventMagnet {
    /// Binds the gesture listeners.
    fn listen(&self);

    /// Removes the gesture listeners, including any capture listeners.
    fn unlisten(&self);

    /// Starts or stops document-level capture of move and release events.
    fn capture(&self, active: bool);

    /// The cursor style currently set on the magnet.
    fn cursor(&self) -> Option<String>;

    /// Sets or clears the magnet's cursor style.
    fn set_cursor(&self, cursor: Option<&str>);
}

impl<T: Surface + ?Sized> Surface for Rc<T> {
    fn is_graphic_root(&self) -> bool {
        (**self).is_graphic_root()
    }

    fn view_box(&self) -> Option<ViewBox> {
        (**self).view_box()
    }

    fn set_view_box(&self, view_box: &ViewBox) {
        (**self).set_view_box(view_box);
    }

    fn screen_transform(&self) -> Affine {
        (**self).screen_transform()
    }

    fn set_preserve_aspect_ratio(&self, value: &str) {
        (**self).set_preserve_aspect_ratio(value);
    }
}

impl<T: EventMagnet + ?Sized> EventMagnet for Rc<T> {
    fn listen(&self) {
        (**self).listen();
    }

    fn unlisten(&self) {
        (**self).unlisten();
    }

    fn capture(&self, active: bool) {
        (**self).capture(active);
    }

    fn cursor(&self) -> Option<String> {
        (**self).cursor()
    }

    fn set_cursor(&self, cursor: Option<&str>) {
        (**self).set_cursor(cursor);
    }
}
