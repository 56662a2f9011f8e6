//! Normalized cross-device event dispatch for Kinetic.
//!
//! Heterogeneous input sources (mouse, touch, synthetic pointer events) are
//! reconciled onto a fixed set of logical event names by [`EventSystem`],
//! with per-element lazy capability installs and frame-coalesced dispatch
//! for high-frequency streams. [`slide`] builds the start/move/end drag
//! protocol on top of it.

mod position;
mod slide;
mod system;

pub use position::{pointer_position, svg_pointer_position};
pub use slide::{slide, SlideHandlers};
pub use system::{EventSystem, LogicalHandler};
