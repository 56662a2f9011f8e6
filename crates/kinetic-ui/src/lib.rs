//! Interaction components built on the Kinetic event and gesture layers.

mod draggable;
mod emitter;

pub use draggable::{Draggable, DraggableEvent, DraggableOptions};
pub use emitter::EventEmitter;
