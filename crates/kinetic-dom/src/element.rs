use std::rc::Rc;

use kinetic_graphics::{Point, Transform};

use crate::event::NativeEvent;
use crate::keyframe::{Keyframe, KeyframePlayer, KeyframeTiming};
use crate::NativeHandler;

/// Stable identity of an element for the lifetime of the document.
///
/// All per-element bookkeeping in the toolkit (handler lists, capability
/// install flags, active transition slots) is keyed by this rather than
/// stored on the element itself, so the element abstraction stays free of
/// consumer state.
pub type ElementId = u64;

pub type NativeListenerId = u64;

pub type ElementRef = Rc<dyn Element>;
pub type DocumentRef = Rc<dyn Document>;

/// The element wrapper capability set the toolkit consumes.
///
/// Methods are split along the lines of the original collaborator contract:
/// style/attribute/class access, geometry queries, tree navigation, native
/// listener registration and the native keyframe animation primitive.
pub trait Element {
    fn id(&self) -> ElementId;

    /// Reads the live computed value of a style property.
    fn css(&self, property: &str) -> String;

    /// Writes a literal style value.
    fn set_css(&self, property: &str, value: &str);

    fn attr(&self, name: &str) -> Option<String>;

    fn set_attr(&self, name: &str, value: &str);

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    fn show(&self);

    fn hide(&self);

    /// Detaches the element from the document.
    fn remove(&self);

    /// False once the element has been detached from the document.
    fn is_connected(&self) -> bool;

    /// Pixel box of the element (border box).
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    /// Intrinsic SVG viewport size, for responsive drag containers.
    fn svg_width(&self) -> f32;

    fn svg_height(&self) -> f32;

    /// Height including margins, used to resolve `height: auto` targets.
    fn outer_height(&self) -> f32;

    /// Total length of the element's stroke path, for draw effects.
    fn stroke_length(&self) -> f32;

    /// Current value of the `transform` style as a CSS string.
    fn transform_string(&self) -> String;

    /// Applies a translation transform.
    fn translate(&self, x: f32, y: f32);

    fn children(&self) -> Vec<ElementRef>;

    fn parent(&self) -> Option<ElementRef>;

    /// Subtree containment test; an element contains itself.
    fn contains(&self, other: &ElementRef) -> bool;

    fn is_svg(&self) -> bool;

    /// The element's current screen transform matrix. Identity for non-SVG
    /// elements.
    fn screen_matrix(&self) -> Transform;

    fn scroll_top(&self) -> f32;

    /// Registers a listener for a native event name. Returns an id for
    /// removal; the same handler may be registered more than once at this
    /// level — de-duplication is the normalization layer's job.
    fn add_native_listener(
        &self,
        event: &str,
        handler: NativeHandler,
        capture: bool,
    ) -> NativeListenerId;

    fn remove_native_listener(&self, id: NativeListenerId);

    /// Starts the host's declarative from/to interpolation and returns a
    /// handle exposing its finish signal and cancellation.
    fn start_keyframe_animation(
        &self,
        from: &Keyframe,
        to: &Keyframe,
        timing: &KeyframeTiming,
    ) -> Rc<dyn KeyframePlayer>;

    /// One-shot callback for the host's "CSS animation finished" signal.
    fn animation_end(&self, callback: Box<dyn FnOnce()>);
}

/// Document-level capabilities: the shared dispatch targets and platform
/// feature probes the normalization layer needs.
pub trait Document {
    fn body(&self) -> ElementRef;

    /// Topmost element at a viewport coordinate, if any.
    fn element_from_point(&self, point: Point) -> Option<ElementRef>;

    /// True on touch platforms without native single-tap semantics, where the
    /// toolkit must synthesize `click` from touch start/end pairs.
    fn needs_tap_synthesis(&self) -> bool;

    /// Feature probe for a native event name.
    fn supports_native_event(&self, event: &str) -> bool;

    fn add_resize_listener(&self, listener: Rc<dyn Fn()>) -> NativeListenerId;

    fn remove_resize_listener(&self, id: NativeListenerId);
}

/// Identity comparison for trait-object element references.
pub fn same_element(a: &ElementRef, b: &ElementRef) -> bool {
    a.id() == b.id()
}

/// True when the event's target element is inside `ancestor`'s subtree.
pub fn target_within(event: &NativeEvent, ancestor: &ElementRef) -> bool {
    match event.target() {
        Some(target) => ancestor.contains(&target),
        None => false,
    }
}
