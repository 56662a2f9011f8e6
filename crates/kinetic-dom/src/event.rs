use std::cell::Cell;
use std::rc::Rc;

use kinetic_graphics::Point;
use smallvec::SmallVec;

use crate::element::ElementRef;

/// One active touch contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub client: Point,
}

impl TouchPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            client: Point::new(x, y),
        }
    }
}

/// A normalized native input event.
///
/// Carries the raw payload the toolkit cares about: the mouse coordinate,
/// active and changed touch lists, and the dispatch target. The
/// `default_prevented` flag is shared across clones so a gesture handler's
/// suppression is visible to every copy of the event, mirroring how event
/// consumption flags travel through a dispatch pass.
#[derive(Clone)]
pub struct NativeEvent {
    name: String,
    client: Point,
    touches: SmallVec<[TouchPoint; 2]>,
    changed_touches: SmallVec<[TouchPoint; 2]>,
    target: Option<ElementRef>,
    scroll_top: Option<f32>,
    default_prevented: Rc<Cell<bool>>,
    propagation_stopped: Rc<Cell<bool>>,
}

impl std::fmt::Debug for NativeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeEvent")
            .field("name", &self.name)
            .field("client", &self.client)
            .field("touches", &self.touches.len())
            .field("changed_touches", &self.changed_touches.len())
            .finish()
    }
}

impl NativeEvent {
    /// A plain mouse/pointer event at a viewport coordinate.
    pub fn pointer(name: impl Into<String>, client: Point) -> Self {
        Self {
            name: name.into(),
            client,
            touches: SmallVec::new(),
            changed_touches: SmallVec::new(),
            target: None,
            scroll_top: None,
            default_prevented: Rc::new(Cell::new(false)),
            propagation_stopped: Rc::new(Cell::new(false)),
        }
    }

    /// A touch event with active and changed touch lists. The client
    /// coordinate falls back to the first changed touch for end events with
    /// no remaining contacts.
    pub fn touch(
        name: impl Into<String>,
        touches: impl IntoIterator<Item = TouchPoint>,
        changed_touches: impl IntoIterator<Item = TouchPoint>,
    ) -> Self {
        let touches: SmallVec<[TouchPoint; 2]> = touches.into_iter().collect();
        let changed_touches: SmallVec<[TouchPoint; 2]> = changed_touches.into_iter().collect();
        let client = touches
            .first()
            .or(changed_touches.first())
            .map(|t| t.client)
            .unwrap_or(Point::ZERO);
        Self {
            name: name.into(),
            client,
            touches,
            changed_touches,
            target: None,
            scroll_top: None,
            default_prevented: Rc::new(Cell::new(false)),
            propagation_stopped: Rc::new(Cell::new(false)),
        }
    }

    /// A synthesized logical scroll event carrying the current scroll offset.
    pub fn scroll(top: f32) -> Self {
        let mut event = Self::pointer("scroll", Point::ZERO);
        event.scroll_top = Some(top);
        event
    }

    pub fn with_target(mut self, target: ElementRef) -> Self {
        self.target = Some(target);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Viewport coordinate of the pointer (mouse position, or first touch).
    pub fn client(&self) -> Point {
        self.client
    }

    pub fn touches(&self) -> &[TouchPoint] {
        &self.touches
    }

    pub fn changed_touches(&self) -> &[TouchPoint] {
        &self.changed_touches
    }

    pub fn target(&self) -> Option<ElementRef> {
        self.target.clone()
    }

    pub fn scroll_top(&self) -> Option<f32> {
        self.scroll_top
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Re-labels the event under a different name, sharing the suppression
    /// flags. Used when a native event is re-dispatched as a logical one.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut event = self.clone();
        event.name = name.into();
        event
    }
}

/// Suppresses both default handling and further propagation.
pub fn stop_event(event: &NativeEvent) {
    event.prevent_default();
    event.stop_propagation();
}
