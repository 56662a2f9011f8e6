use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use kinetic_dom::{Document, ElementRef, NativeListenerId};
use kinetic_graphics::Point;

use crate::stub_element::StubElement;

/// In-memory document with a programmable hit-test result.
pub struct StubDocument {
    body: Rc<StubElement>,
    element_at_point: RefCell<Option<ElementRef>>,
    tap_synthesis: Cell<bool>,
    unsupported_events: RefCell<HashSet<String>>,
    resize_listeners: RefCell<Vec<(NativeListenerId, Rc<dyn Fn()>)>>,
    next_listener_id: Cell<NativeListenerId>,
}

impl StubDocument {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            body: StubElement::new(),
            element_at_point: RefCell::new(None),
            tap_synthesis: Cell::new(false),
            unsupported_events: RefCell::new(HashSet::new()),
            resize_listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(1),
        })
    }

    pub fn stub_body(&self) -> Rc<StubElement> {
        Rc::clone(&self.body)
    }

    /// Scripts the result of [`Document::element_from_point`].
    pub fn set_element_at_point(&self, element: Option<ElementRef>) {
        *self.element_at_point.borrow_mut() = element;
    }

    /// Switches the document into tap-synthesis mode (a touch platform
    /// without native single-tap click semantics).
    pub fn set_needs_tap_synthesis(&self, value: bool) {
        self.tap_synthesis.set(value);
    }

    pub fn set_event_unsupported(&self, event: &str) {
        self.unsupported_events.borrow_mut().insert(event.to_string());
    }

    pub fn fire_resize(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self
            .resize_listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl Document for StubDocument {
    fn body(&self) -> ElementRef {
        Rc::clone(&self.body) as ElementRef
    }

    fn element_from_point(&self, _point: Point) -> Option<ElementRef> {
        self.element_at_point.borrow().clone()
    }

    fn needs_tap_synthesis(&self) -> bool {
        self.tap_synthesis.get()
    }

    fn supports_native_event(&self, event: &str) -> bool {
        !self.unsupported_events.borrow().contains(event)
    }

    fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> NativeListenerId {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.resize_listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_resize_listener(&self, id: NativeListenerId) {
        self.resize_listeners
            .borrow_mut()
            .retain(|(listener_id, _)| *listener_id != id);
    }
}
