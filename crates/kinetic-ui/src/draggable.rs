//! Draggable: a clamped, snapped position model over the slide gesture.

use std::cell::Cell;
use std::rc::Rc;

use kinetic_dom::{Element, ElementRef};
use kinetic_events::{slide, EventSystem, SlideHandlers};
use kinetic_graphics::Point;

use crate::emitter::EventEmitter;

/// Events emitted by a [`Draggable`]. `Drag` fires per gesture-move step,
/// `Move` on every committed position mutation (including programmatic
/// ones), and `Click` replaces `End` when the gesture never left its start
/// coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DraggableEvent {
    Start,
    Drag,
    End,
    Click,
    Move,
}

/// Configuration for a [`Draggable`].
#[derive(Clone)]
pub struct DraggableOptions {
    pub move_x: bool,
    pub move_y: bool,
    /// Grid granularity positions snap to.
    pub snap: f32,
    /// Position via a translate transform instead of left/top styles.
    pub use_transform: bool,
    /// Inset from the container edges the position is clamped within.
    pub margin: f32,
    /// Custom rounding hook applied after clamp and snap.
    pub round: Option<Rc<dyn Fn(Point) -> Point>>,
    /// Measure the container's intrinsic SVG viewport instead of its pixel
    /// box.
    pub responsive: bool,
}

impl Default for DraggableOptions {
    fn default() -> Self {
        Self {
            move_x: true,
            move_y: true,
            snap: 1.0,
            use_transform: false,
            margin: 0.0,
            round: None,
            responsive: false,
        }
    }
}

struct DraggableInner {
    element: ElementRef,
    options: DraggableOptions,
    position: Cell<Point>,
    disabled: Cell<bool>,
    width: Cell<f32>,
    height: Cell<f32>,
    emitter: EventEmitter<DraggableEvent, Point>,
    /// Position at gesture start; drag deltas are applied against this.
    gesture_origin: Cell<Point>,
}

impl DraggableInner {
    /// Clamps into `[margin, dimension - margin]` per enabled axis, snaps to
    /// the grid, applies the custom rounding hook and zeroes disabled axes.
    /// A no-op (without emission) when the computed position is unchanged.
    fn set_position(&self, x: f32, y: f32) {
        let margin = self.options.margin;
        let clamped = Point::new(x, y)
            .clamp(
                margin,
                self.width.get() - margin,
                margin,
                self.height.get() - margin,
            )
            .round_to(self.options.snap);
        let mut position = match &self.options.round {
            Some(round) => round(clamped),
            None => clamped,
        };

        if !self.options.move_x {
            position.x = 0.0;
        }
        if !self.options.move_y {
            position.y = 0.0;
        }

        if position == self.position.get() {
            return;
        }
        self.position.set(position);

        if self.options.use_transform {
            self.element.translate(position.x, position.y);
        } else {
            if self.options.move_x {
                self.element.set_css("left", &format!("{}px", position.x));
            }
            if self.options.move_y {
                self.element.set_css("top", &format!("{}px", position.y));
            }
        }

        self.emitter.emit(DraggableEvent::Move, &position);
    }

    fn measure(&self, parent: &ElementRef) {
        if self.options.responsive {
            self.width.set(parent.svg_width());
            self.height.set(parent.svg_height());
        } else {
            self.width.set(parent.width());
            self.height.set(parent.height());
        }
    }
}

/// A 2D position constrained to a container, driven by the slide gesture.
pub struct Draggable {
    inner: Rc<DraggableInner>,
}

impl Draggable {
    pub fn new(
        events: &EventSystem,
        element: &ElementRef,
        parent: &ElementRef,
        options: DraggableOptions,
    ) -> Self {
        let inner = Rc::new(DraggableInner {
            element: Rc::clone(element),
            options,
            position: Cell::new(Point::ZERO),
            disabled: Cell::new(false),
            width: Cell::new(0.0),
            height: Cell::new(0.0),
            emitter: EventEmitter::new(),
            gesture_origin: Cell::new(Point::ZERO),
        });
        inner.measure(parent);

        let start_inner = Rc::clone(&inner);
        let move_inner = Rc::clone(&inner);
        let end_inner = Rc::clone(&inner);
        slide(
            events,
            element,
            SlideHandlers::new()
                .on_start(move |_| {
                    if start_inner.disabled.get() {
                        return;
                    }
                    start_inner.gesture_origin.set(start_inner.position.get());
                    start_inner
                        .emitter
                        .emit(DraggableEvent::Start, &start_inner.position.get());
                })
                .on_move(move |position, start| {
                    if move_inner.disabled.get() {
                        return;
                    }
                    let origin = move_inner.gesture_origin.get();
                    move_inner.set_position(
                        origin.x + position.x - start.x,
                        origin.y + position.y - start.y,
                    );
                    move_inner
                        .emitter
                        .emit(DraggableEvent::Drag, &move_inner.position.get());
                })
                .on_end(move |last, start| {
                    if end_inner.disabled.get() {
                        return;
                    }
                    let event = if last == start {
                        DraggableEvent::Click
                    } else {
                        DraggableEvent::End
                    };
                    end_inner.emitter.emit(event, &end_inner.position.get());
                }),
        );

        // Container resizes preserve the relative position fraction; a zero
        // prior dimension falls back to zero instead of propagating NaN.
        let resize_inner = Rc::downgrade(&inner);
        let resize_parent = Rc::clone(parent);
        events.document().add_resize_listener(Rc::new(move || {
            let Some(inner) = resize_inner.upgrade() else {
                return;
            };
            let old_width = inner.width.get();
            let old_height = inner.height.get();
            inner.measure(&resize_parent);

            let position = inner.position.get();
            let x = rescale(position.x, inner.width.get(), old_width);
            let y = rescale(position.y, inner.height.get(), old_height);
            inner.set_position(x, y);
        }));

        Self { inner }
    }

    pub fn on(&self, event: DraggableEvent, listener: impl Fn(&Point) + 'static) {
        self.inner.emitter.on(event, listener);
    }

    pub fn position(&self) -> Point {
        self.inner.position.get()
    }

    pub fn set_position(&self, x: f32, y: f32) {
        self.inner.set_position(x, y);
    }

    pub fn disabled(&self) -> bool {
        self.inner.disabled.get()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.disabled.set(disabled);
    }
}

fn rescale(value: f32, new_dimension: f32, old_dimension: f32) -> f32 {
    let scaled = value * new_dimension / old_dimension;
    if scaled.is_finite() {
        scaled
    } else {
        log::debug!("rescale from zero-sized container; resetting axis to 0");
        0.0
    }
}

#[cfg(test)]
#[path = "tests/draggable_tests.rs"]
mod tests;
