//! The start/move/end drag protocol shared by Draggable and other
//! drag-consumers.
//!
//! One gesture is a pointer-down, any number of frame-coalesced moves, and a
//! pointer-up. Body-level move/end listeners exist only while a gesture is
//! active, so an idle draggable leaks no document-level listeners. Move
//! coalescing is a single-slot pending request: native moves overwrite the
//! slot's coordinate, and at most one `move` callback fires per frame with
//! the most recent value.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use kinetic_core::{FrameCallbackRegistration, FrameClock};
use kinetic_dom::{Element, ElementRef, NativeEvent};
use kinetic_graphics::Point;

use crate::position::{pointer_position, svg_pointer_position};
use crate::system::{EventSystem, LogicalHandler};

/// Gesture callbacks. `on_move` and `on_end` receive the current (or last)
/// coordinate together with the gesture's start coordinate; click-vs-drag
/// discrimination is the consumer's job, by comparing the two.
#[derive(Default)]
pub struct SlideHandlers {
    start: Option<Box<dyn Fn(Point)>>,
    move_handler: Option<Box<dyn Fn(Point, Point)>>,
    end: Option<Box<dyn Fn(Point, Point)>>,
}

impl SlideHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start(mut self, handler: impl Fn(Point) + 'static) -> Self {
        self.start = Some(Box::new(handler));
        self
    }

    pub fn on_move(mut self, handler: impl Fn(Point, Point) + 'static) -> Self {
        self.move_handler = Some(Box::new(handler));
        self
    }

    pub fn on_end(mut self, handler: impl Fn(Point, Point) + 'static) -> Self {
        self.end = Some(Box::new(handler));
        self
    }
}

struct GestureState {
    element: ElementRef,
    handlers: SlideHandlers,
    clock: FrameClock,
    active: Cell<bool>,
    start_position: Cell<Point>,
    last_position: Cell<Point>,
    /// Latest uncommitted move coordinate; overwritten by native moves
    /// within the same frame.
    pending_position: Cell<Option<Point>>,
    pending_frame: RefCell<Option<FrameCallbackRegistration>>,
    /// The end handler's own registration identity, so it can detach itself
    /// when the gesture finishes.
    end_handler: RefCell<Option<LogicalHandler>>,
}

impl GestureState {
    /// SVG targets resolve coordinates in their local user space; everything
    /// else uses viewport pixels.
    fn resolve(&self, event: &NativeEvent) -> Point {
        if self.element.is_svg() {
            svg_pointer_position(event, &self.element)
        } else {
            pointer_position(event)
        }
    }
}

/// Wires the drag gesture protocol onto an element.
///
/// A gesture begins on a single-point `pointerStart` (multi-touch starts are
/// ignored), suppresses the default action, and ends on a `pointerEnd` with
/// no remaining touch points. `slide` itself never synthesizes a click.
pub fn slide(events: &EventSystem, element: &ElementRef, handlers: SlideHandlers) {
    let state = Rc::new(GestureState {
        element: Rc::clone(element),
        handlers,
        clock: FrameClock::new(events.runtime_handle()),
        active: Cell::new(false),
        start_position: Cell::new(Point::ZERO),
        last_position: Cell::new(Point::ZERO),
        pending_position: Cell::new(None),
        pending_frame: RefCell::new(None),
        end_handler: RefCell::new(None),
    });

    let body = events.document().body();

    // Move and end handlers are created once and re-registered per gesture;
    // stable handler identity keeps re-registration idempotent.
    let move_handler: LogicalHandler = {
        let weak_state: Weak<GestureState> = Rc::downgrade(&state);
        Rc::new(move |event| {
            let Some(state) = weak_state.upgrade() else {
                return;
            };
            if !state.active.get() {
                return;
            }
            event.prevent_default();
            state.pending_position.set(Some(state.resolve(event)));

            if state.pending_frame.borrow().is_some() {
                return;
            }
            let frame_state = Rc::clone(&state);
            let registration = state.clock.with_frame_nanos(move |_| {
                frame_state.pending_frame.borrow_mut().take();
                if !frame_state.active.get() {
                    return;
                }
                if let Some(position) = frame_state.pending_position.take() {
                    frame_state.last_position.set(position);
                    if let Some(on_move) = &frame_state.handlers.move_handler {
                        on_move(position, frame_state.start_position.get());
                    }
                }
            });
            *state.pending_frame.borrow_mut() = Some(registration);
        })
    };

    // The end handler holds its gesture state weakly: the state owns the
    // handler for identity, and the strong path runs through the element's
    // start handler instead.
    let end_handler: LogicalHandler = {
        let weak_state: Weak<GestureState> = Rc::downgrade(&state);
        let events = events.downgrade();
        let body = Rc::clone(&body);
        let move_handler = Rc::clone(&move_handler);
        Rc::new(move |event| {
            let (Some(state), Some(events)) = (weak_state.upgrade(), events.upgrade()) else {
                return;
            };
            if !state.active.get() {
                return;
            }
            event.prevent_default();
            if !event.touches().is_empty() {
                return;
            }

            state.active.set(false);
            // Cancel the coalesced frame, folding any uncommitted coordinate
            // into the gesture's last position.
            state.pending_frame.borrow_mut().take();
            if let Some(position) = state.pending_position.take() {
                state.last_position.set(position);
            }

            if state.handlers.move_handler.is_some() {
                events.unregister_event(&body, "pointerMove", &move_handler);
            }
            // Dispatch snapshots the handler list, so detaching from inside
            // the handler is safe.
            let own_handler = state.end_handler.borrow().clone();
            if let Some(own_handler) = own_handler {
                events.unregister_event(&body, "pointerEnd", &own_handler);
            }

            if let Some(on_end) = &state.handlers.end {
                on_end(state.last_position.get(), state.start_position.get());
            }
        })
    };
    *state.end_handler.borrow_mut() = Some(Rc::clone(&end_handler));

    let start_handler: LogicalHandler = {
        let state = Rc::clone(&state);
        let events = events.downgrade();
        let body = Rc::clone(&body);
        let move_handler = Rc::clone(&move_handler);
        let end_handler = Rc::clone(&end_handler);
        Rc::new(move |event| {
            let Some(events) = events.upgrade() else {
                return;
            };
            event.prevent_default();
            if event.touches().len() > 1 {
                log::debug!("multi-touch pointer start ignored by slide");
                return;
            }
            if state.active.replace(true) {
                return;
            }

            let position = state.resolve(event);
            state.start_position.set(position);
            state.last_position.set(position);
            state.pending_position.set(None);

            if state.handlers.move_handler.is_some() {
                events.register_event(&body, "pointerMove", Rc::clone(&move_handler), false);
            }
            events.register_event(&body, "pointerEnd", Rc::clone(&end_handler), false);

            if let Some(on_start) = &state.handlers.start {
                on_start(position);
            }
        })
    };

    events.register_event(element, "pointerStart", start_handler, false);
}

#[cfg(test)]
#[path = "tests/slide_tests.rs"]
mod tests;
