// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Affine;
use understory_pan_zoom::Surface;
use understory_viewbox::ViewBox;
use wasm_bindgen::JsCast;
use web_sys::{Element, SvgGraphicsElement, SvgsvgElement};

use crate::convert::{affine_from_matrix, parse_view_box_attribute};

/// An `<svg>` element's `viewBox` attribute as a [`Surface`].
#[derive(Clone, Debug)]
pub struct SvgSurface {
    element: Element,
}

impl SvgSurface {
    /// Wraps `element`. Whether it is an `<svg>` root is checked at attach.
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// The wrapped element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(err) = self.element.set_attribute(name, value) {
            tracing::warn!(?err, name, "failed to set attribute");
        }
    }
}

impl Surface for SvgSurface {
    fn is_graphic_root(&self) -> bool {
        self.element.is_instance_of::<SvgsvgElement>()
    }

    fn view_box(&self) -> Option<ViewBox> {
        parse_view_box_attribute(self.element.get_attribute("viewBox").as_deref())
    }

    fn set_view_box(&self, view_box: &ViewBox) {
        self.set_attribute("viewBox", &view_box.to_string());
    }

    fn screen_transform(&self) -> Affine {
        self.element
            .dyn_ref::<SvgGraphicsElement>()
            .and_then(SvgGraphicsElement::get_screen_ctm)
            .map_or(Affine::IDENTITY, |m| {
                affine_from_matrix([m.a(), m.b(), m.c(), m.d(), m.e(), m.f()])
            })
    }

    fn set_preserve_aspect_ratio(&self, value: &str) {
        self.set_attribute("preserveAspectRatio", value);
    }
}
