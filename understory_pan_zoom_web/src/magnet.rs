// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM listeners feeding a pan/zoom.
//!
//! Press, click, double click, wheel, and touch-start listeners live on the
//! magnet element. While a drag or pinch is in progress, move and release
//! listeners are added on `document.body` so the gesture continues when the
//! pointer leaves the magnet. All listeners use the capture phase.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use understory_gesture::{InputEvent, PointerPos, TouchPoints, Touches};
use understory_pan_zoom::{EventMagnet, EventOutcome};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    CssStyleDeclaration, Element, Event, EventTarget, HtmlElement, MouseEvent, SvgElement,
    TouchEvent, TouchList, WheelEvent,
};

use crate::convert::{mouse_button, pointer_pos, wheel_delta};

/// Receives every converted event and says how the DOM event should be
/// treated afterwards.
pub type EventSink = Rc<dyn Fn(&InputEvent) -> EventOutcome>;

const MAGNET_EVENTS: [&str; 5] = ["click", "wheel", "dblclick", "mousedown", "touchstart"];
const CAPTURE_EVENTS: [&str; 6] = [
    "mousemove",
    "touchmove",
    "mouseup",
    "touchend",
    "touchcancel",
    "mouseout",
];

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn bind(
        target: &EventTarget,
        kind: &'static str,
        sink: &Rc<RefCell<Option<EventSink>>>,
    ) -> Option<Self> {
        let sink = Rc::clone(sink);
        let closure = Closure::wrap(Box::new(move |event: Event| {
            // Clone out of the cell so the sink may rebind listeners.
            let current = sink.borrow().clone();
            if let Some(current) = current {
                dispatch(&current, &event);
            }
        }) as Box<dyn FnMut(Event)>);

        match target.add_event_listener_with_callback_and_bool(
            kind,
            closure.as_ref().unchecked_ref::<js_sys::Function>(),
            true,
        ) {
            Ok(()) => Some(Self {
                target: target.clone(),
                kind,
                closure,
            }),
            Err(err) => {
                tracing::warn!(?err, kind, "failed to add listener");
                None
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self.target.remove_event_listener_with_callback_and_bool(
            self.kind,
            self.closure.as_ref().unchecked_ref::<js_sys::Function>(),
            true,
        ) {
            tracing::debug!(?err, kind = self.kind, "failed to remove listener");
        }
    }
}

fn dispatch(sink: &EventSink, event: &Event) {
    let Some(input) = to_input_event(event) else {
        return;
    };
    let outcome = sink(&input);
    if outcome.prevent_default {
        event.prevent_default();
    }
    if outcome.stop_propagation {
        event.stop_propagation();
    }
}

/// Converts a DOM event into an [`InputEvent`], or `None` for event types
/// the recognizer does not consume.
pub fn to_input_event(event: &Event) -> Option<InputEvent> {
    let kind = event.type_();
    match kind.as_str() {
        "click" => Some(InputEvent::Click),
        "mouseout" => Some(InputEvent::MouseOut {
            from_root: event.target() == event.current_target(),
        }),
        "wheel" => {
            let wheel = event.dyn_ref::<WheelEvent>()?;
            Some(InputEvent::Wheel {
                delta: wheel_delta(wheel.delta_y()),
                pos: mouse_pos(wheel),
            })
        }
        "mousedown" | "mousemove" | "mouseup" | "dblclick" => {
            let mouse = event.dyn_ref::<MouseEvent>()?;
            let pos = mouse_pos(mouse);
            Some(match kind.as_str() {
                "mousedown" => InputEvent::MouseDown {
                    button: mouse_button(mouse.button()),
                    pos,
                },
                "mouseup" => InputEvent::MouseUp {
                    button: mouse_button(mouse.button()),
                    pos,
                },
                "dblclick" => InputEvent::DoubleClick { pos },
                _ => InputEvent::MouseMove { pos },
            })
        }
        "touchstart" | "touchmove" | "touchend" | "touchcancel" => {
            let touch = event.dyn_ref::<TouchEvent>()?;
            let points = TouchPoints {
                touches: touch_list(&touch.touches()),
                changed: touch_list(&touch.changed_touches()),
            };
            Some(match kind.as_str() {
                "touchstart" => InputEvent::TouchStart(points),
                "touchmove" => InputEvent::TouchMove(points),
                "touchend" => InputEvent::TouchEnd(points),
                _ => InputEvent::TouchCancel(points),
            })
        }
        _ => None,
    }
}

fn mouse_pos(event: &MouseEvent) -> PointerPos {
    pointer_pos(
        (event.client_x(), event.client_y()),
        (event.page_x(), event.page_y()),
    )
}

fn touch_list(list: &TouchList) -> Touches {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| pointer_pos((t.client_x(), t.client_y()), (t.page_x(), t.page_y())))
        .collect()
}

fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        return Some(html.style());
    }
    element.dyn_ref::<SvgElement>().map(SvgElement::style)
}

/// An element that gestures are read from.
///
/// Events only flow once a sink is [connected](Self::connect).
pub struct ElementMagnet {
    element: Element,
    sink: Rc<RefCell<Option<EventSink>>>,
    bound: RefCell<Vec<Listener>>,
    captured: RefCell<Vec<Listener>>,
}

impl ElementMagnet {
    /// Reads gestures from `element`.
    pub fn new(element: Element) -> Self {
        Self {
            element,
            sink: Rc::new(RefCell::new(None)),
            bound: RefCell::new(Vec::new()),
            captured: RefCell::new(Vec::new()),
        }
    }

    /// The element listeners are bound to.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Routes converted events to `sink`.
    pub fn connect(&self, sink: EventSink) {
        *self.sink.borrow_mut() = Some(sink);
    }

    /// Stops routing events. Bound listeners stay bound but do nothing.
    pub fn disconnect(&self) {
        self.sink.borrow_mut().take();
    }

    fn bind_all(&self, target: &EventTarget, kinds: &[&'static str]) -> Vec<Listener> {
        kinds
            .iter()
            .filter_map(|&kind| Listener::bind(target, kind, &self.sink))
            .collect()
    }
}

impl EventMagnet for ElementMagnet {
    fn listen(&self) {
        let listeners = self.bind_all(&self.element, &MAGNET_EVENTS);
        *self.bound.borrow_mut() = listeners;
    }

    fn unlisten(&self) {
        let captured = std::mem::take(&mut *self.captured.borrow_mut());
        let bound = std::mem::take(&mut *self.bound.borrow_mut());
        drop((captured, bound));
    }

    fn capture(&self, active: bool) {
        let listeners = if active {
            let body = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.body());
            match body {
                Some(body) => self.bind_all(&body, &CAPTURE_EVENTS),
                None => {
                    tracing::warn!("no document body to capture gestures on");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        let previous = std::mem::replace(&mut *self.captured.borrow_mut(), listeners);
        drop(previous);
    }

    fn cursor(&self) -> Option<String> {
        let value = style_of(&self.element)?.get_property_value("cursor").ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn set_cursor(&self, cursor: Option<&str>) {
        let Some(style) = style_of(&self.element) else {
            return;
        };
        let result = match cursor {
            Some(cursor) => style.set_property("cursor", cursor),
            None => style.remove_property("cursor").map(drop),
        };
        if let Err(err) = result {
            tracing::warn!(?err, "failed to set cursor");
        }
    }
}

impl fmt::Debug for ElementMagnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementMagnet")
            .field("element", &self.element)
            .field("connected", &self.sink.borrow().is_some())
            .field("bound", &self.bound.borrow().len())
            .field("captured", &self.captured.borrow().len())
            .finish()
    }
}
