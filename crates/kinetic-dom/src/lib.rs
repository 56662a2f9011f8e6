//! Element and document abstraction for Kinetic.
//!
//! The toolkit never talks to a concrete DOM. Hosts implement [`Element`] and
//! [`Document`] over whatever element wrapper they have (a browser binding, a
//! retained scene graph, a test stub) and the animation/event layers drive
//! those traits. This is the same seam the runtime uses for scheduling:
//! capability traits at the platform boundary, trait objects everywhere else.

mod element;
mod event;
mod keyframe;

pub use element::{
    same_element, target_within, Document, DocumentRef, Element, ElementId, ElementRef,
    NativeListenerId,
};
pub use event::{stop_event, NativeEvent, TouchPoint};
pub use keyframe::{Keyframe, KeyframePlayer, KeyframeTiming};

/// Handler signature for native event listeners.
pub type NativeHandler = std::rc::Rc<dyn Fn(&NativeEvent)>;
