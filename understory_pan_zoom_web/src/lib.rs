// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pan_zoom_web --heading-base-level=0

//! Browser host for Understory Pan Zoom.
//!
//! On `wasm32` this crate provides the three host pieces
//! [`PanZoom`](understory_pan_zoom::PanZoom) needs, backed by the DOM:
//!
//! - `SvgSurface`: an `<svg>` element's `viewBox` attribute and screen CTM.
//! - `RafScheduler`: animation frames from `requestAnimationFrame`, falling
//!   back to `setTimeout`. With neither, transitions complete immediately.
//! - `ElementMagnet`: capture-phase listeners on an element (the `<svg>`
//!   itself by default), plus `document.body` listeners while a drag or
//!   pinch is in progress.
//!
//! `WebPanZoom` wires them together:
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn enable(svg: web_sys::Element) -> Result<(), understory_pan_zoom_web::AttachError> {
//!     use understory_pan_zoom::Options;
//!     use understory_pan_zoom_web::WebPanZoom;
//!
//!     let pan_zoom = WebPanZoom::attach(svg, None, Options::new())?;
//!     pan_zoom.pan_zoom().zoom_in(None, None, None);
//!     Ok(())
//! }
//! ```
//!
//! Dropping the `WebPanZoom` removes every listener it added.
//!
//! The DOM-free conversions in [`convert`] are available on every target.

pub mod convert;

#[cfg(target_arch = "wasm32")]
mod magnet;
#[cfg(target_arch = "wasm32")]
mod scheduler;
#[cfg(target_arch = "wasm32")]
mod surface;

#[cfg(target_arch = "wasm32")]
pub use magnet::{ElementMagnet, EventSink, to_input_event};
#[cfg(target_arch = "wasm32")]
pub use scheduler::RafScheduler;
#[cfg(target_arch = "wasm32")]
pub use surface::SvgSurface;

use understory_pan_zoom::PanZoomError;

/// Errors from attaching pan/zoom to a page.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AttachError {
    /// The `<svg>` element does not belong to a document.
    #[error("element has no owner document")]
    NoDocument,
    /// Attaching the core failed.
    #[error(transparent)]
    PanZoom(#[from] PanZoomError),
}

#[cfg(target_arch = "wasm32")]
pub use web::{WebPanZoom, WebPanZoomCore};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::{RefCell, RefMut};
    use std::fmt;
    use std::rc::{Rc, Weak};

    use understory_gesture::InputEvent;
    use understory_pan_zoom::{EventOutcome, Options, PanZoom};
    use web_sys::Element;

    use crate::{AttachError, ElementMagnet, EventSink, RafScheduler, SvgSurface};

    /// The core pan/zoom over DOM host types.
    pub type WebPanZoomCore = PanZoom<SvgSurface, RafScheduler, Rc<ElementMagnet>>;

    /// Pan/zoom attached to an `<svg>` element.
    pub struct WebPanZoom {
        core: Rc<RefCell<WebPanZoomCore>>,
    }

    impl WebPanZoom {
        /// Attaches to `svg`, reading gestures from `magnet` or, when `None`,
        /// from `svg` itself.
        pub fn attach(
            svg: Element,
            magnet: Option<Element>,
            options: Options,
        ) -> Result<Self, AttachError> {
            if svg.owner_document().is_none() {
                return Err(AttachError::NoDocument);
            }
            let scheduler = RafScheduler::from_global();
            let magnet = Rc::new(ElementMagnet::new(magnet.unwrap_or_else(|| svg.clone())));
            let core = PanZoom::attach(
                SvgSurface::new(svg),
                scheduler,
                Rc::clone(&magnet),
                options,
            )?;
            let core = Rc::new(RefCell::new(core));
            magnet.connect(sink(Rc::downgrade(&core)));
            Ok(Self { core })
        }

        /// The core, for pan, zoom, and configuration calls.
        ///
        /// # Panics
        ///
        /// Panics if the core is already borrowed, which only happens when
        /// called from inside a pan or zoom callback.
        pub fn pan_zoom(&self) -> RefMut<'_, WebPanZoomCore> {
            self.core.borrow_mut()
        }

        /// Moves gesture listening to `element`.
        pub fn set_event_magnet(&self, element: Element) {
            let magnet = Rc::new(ElementMagnet::new(element));
            magnet.connect(sink(Rc::downgrade(&self.core)));
            let previous = self.core.borrow_mut().set_event_magnet(magnet);
            previous.disconnect();
        }
    }

    impl fmt::Debug for WebPanZoom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self.core.try_borrow() {
                Ok(core) => f.debug_struct("WebPanZoom").field("core", &*core).finish(),
                Err(_) => f.write_str("WebPanZoom { <borrowed> }"),
            }
        }
    }

    /// Events arriving while the core is busy, or after it is gone, are
    /// left to the page.
    fn sink(core: Weak<RefCell<WebPanZoomCore>>) -> EventSink {
        Rc::new(move |event: &InputEvent| {
            let Some(core) = core.upgrade() else {
                return EventOutcome::default();
            };
            let Ok(mut core) = core.try_borrow_mut() else {
                tracing::debug!("pan/zoom busy; event left to the page");
                return EventOutcome::default();
            };
            core.handle_event(event)
        })
    }
}
