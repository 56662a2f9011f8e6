//! Logical event registration, normalization and dispatch.
//!
//! Logical names fall into three kinds: direct aliases onto one or more
//! native event names, names that need a one-time per-element setup routine
//! (click synthesis, clickOutside, pointer enter/leave/over, the scroll
//! family), and unrecognized names that pass straight through to native
//! registration. Setup routines are idempotent per element, and a logical
//! event's native listeners are installed at most once no matter how many
//! handlers are registered.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use smallvec::SmallVec;

use kinetic_core::RuntimeHandle;
use kinetic_dom::{
    same_element, target_within, DocumentRef, Element, ElementId, ElementRef, NativeEvent,
};
use kinetic_graphics::Point;

use crate::position::pointer_position;

/// Handler signature for logical events. Identity (`Rc::ptr_eq`) keys
/// de-duplication: registering the same handler twice is a no-op.
pub type LogicalHandler = Rc<dyn Fn(&NativeEvent)>;

/// Tap-to-click tolerance in viewport pixels, per axis.
const TAP_TOLERANCE: f32 = 5.0;

fn alias_targets(logical: &str) -> Option<&'static str> {
    match logical {
        "pointerStart" => Some("mousedown touchstart"),
        "pointerMove" => Some("mousemove touchmove"),
        "pointerEnd" => Some("mouseup touchend touchcancel"),
        "change" => Some("propertychange keyup input paste"),
        "scrollwheel" => Some("DOMMouseScroll mousewheel"),
        _ => None,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Capability {
    Click,
    ClickOutside,
    PointerPosition,
    Scroll,
}

fn custom_setup(logical: &str) -> Option<Capability> {
    match logical {
        "click" => Some(Capability::Click),
        "clickOutside" => Some(Capability::ClickOutside),
        "pointerEnter" | "pointerLeave" | "pointerOver" => Some(Capability::PointerPosition),
        "scroll" | "scrollStart" | "scrollEnd" => Some(Capability::Scroll),
        _ => None,
    }
}

/// Which lazy setup routines have already run for an element.
#[derive(Default)]
struct InstalledCapabilities {
    click: bool,
    click_outside: bool,
    pointer_position: bool,
    scroll: bool,
}

impl InstalledCapabilities {
    fn flag_mut(&mut self, capability: Capability) -> &mut bool {
        match capability {
            Capability::Click => &mut self.click,
            Capability::ClickOutside => &mut self.click_outside,
            Capability::PointerPosition => &mut self.pointer_position,
            Capability::Scroll => &mut self.scroll,
        }
    }
}

/// Per-element event state: ordered handler lists per logical name, install
/// flags, and the native bridge bookkeeping. Created on first registration,
/// destroyed with the element.
#[derive(Default)]
struct ElementEventState {
    handlers: IndexMap<String, SmallVec<[LogicalHandler; 2]>>,
    installed: InstalledCapabilities,
    /// Keyed by `logical::native`; presence means the bridge listener is
    /// already installed on the element.
    bridges: HashMap<String, kinetic_dom::NativeListenerId>,
}

struct EventSystemInner {
    runtime: RuntimeHandle,
    document: DocumentRef,
    elements: RefCell<HashMap<ElementId, ElementEventState>>,
    outside_subscribers: RefCell<Vec<ElementRef>>,
    outside_listener_installed: Cell<bool>,
}

/// The event normalization layer. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct EventSystem {
    inner: Rc<EventSystemInner>,
}

#[derive(Clone)]
pub(crate) struct WeakEventSystem {
    inner: Weak<EventSystemInner>,
}

impl WeakEventSystem {
    pub(crate) fn upgrade(&self) -> Option<EventSystem> {
        self.inner.upgrade().map(EventSystem::from_inner)
    }
}

impl EventSystem {
    pub fn new(runtime: RuntimeHandle, document: DocumentRef) -> Self {
        Self {
            inner: Rc::new(EventSystemInner {
                runtime,
                document,
                elements: RefCell::new(HashMap::new()),
                outside_subscribers: RefCell::new(Vec::new()),
                outside_listener_installed: Cell::new(false),
            }),
        }
    }

    pub fn document(&self) -> DocumentRef {
        Rc::clone(&self.inner.document)
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.inner.runtime.clone()
    }

    /// Registers `handler` for a logical event on `element`.
    ///
    /// Duplicate registrations of the same handler (by identity) are no-ops;
    /// dispatch order is first-registration order.
    pub fn register_event(
        &self,
        element: &ElementRef,
        logical: &str,
        handler: LogicalHandler,
        capture: bool,
    ) {
        if let Some(natives) = alias_targets(logical) {
            for native in natives.split(' ') {
                self.ensure_bridge(element, logical, native, capture);
            }
        } else if let Some(capability) = custom_setup(logical) {
            self.install_capability(element, capability);
        } else {
            if !self.inner.document.supports_native_event(logical) {
                log::debug!("registering handler for unsupported native event `{logical}`");
            }
            self.ensure_bridge(element, logical, logical, capture);
        }

        let mut elements = self.inner.elements.borrow_mut();
        let state = elements.entry(element.id()).or_default();
        let list = state.handlers.entry(logical.to_string()).or_default();
        if !list.iter().any(|existing| Rc::ptr_eq(existing, &handler)) {
            list.push(handler);
        }
    }

    /// Removes a previously registered handler, matched by identity.
    pub fn unregister_event(&self, element: &ElementRef, logical: &str, handler: &LogicalHandler) {
        let mut elements = self.inner.elements.borrow_mut();
        if let Some(state) = elements.get_mut(&element.id()) {
            if let Some(list) = state.handlers.get_mut(logical) {
                list.retain(|existing| !Rc::ptr_eq(existing, handler));
            }
        }
    }

    /// Dispatches a logical event to the element's handlers in registration
    /// order. The handler list is snapshotted first, so handlers are free to
    /// register or unregister during dispatch.
    pub fn trigger(&self, element: &ElementRef, logical: &str, event: &NativeEvent) {
        let handlers: Vec<LogicalHandler> = self
            .inner
            .elements
            .borrow()
            .get(&element.id())
            .and_then(|state| state.handlers.get(logical))
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(event);
        }
    }

    /// Drops all event state for an element. Host teardown hook.
    pub fn release(&self, element: &ElementRef) {
        self.inner.elements.borrow_mut().remove(&element.id());
        self.inner
            .outside_subscribers
            .borrow_mut()
            .retain(|subscriber| subscriber.id() != element.id());
    }

    fn from_inner(inner: Rc<EventSystemInner>) -> Self {
        Self { inner }
    }

    /// Weak form for handlers that end up stored inside the system itself;
    /// capturing a strong clone there would keep the system alive forever.
    pub(crate) fn downgrade(&self) -> WeakEventSystem {
        WeakEventSystem {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Installs one native listener that re-dispatches `native` events on
    /// `element` under the logical name. Idempotent per (logical, native).
    fn ensure_bridge(&self, element: &ElementRef, logical: &str, native: &str, capture: bool) {
        let key = format!("{logical}::{native}");
        {
            let elements = self.inner.elements.borrow();
            if let Some(state) = elements.get(&element.id()) {
                if state.bridges.contains_key(&key) {
                    return;
                }
            }
        }

        let weak = Rc::downgrade(&self.inner);
        let target = Rc::clone(element);
        let logical_name = logical.to_string();
        let id = element.add_native_listener(
            native,
            Rc::new(move |event| {
                if let Some(inner) = weak.upgrade() {
                    EventSystem::from_inner(inner).trigger(&target, &logical_name, event);
                }
            }),
            capture,
        );

        self.inner
            .elements
            .borrow_mut()
            .entry(element.id())
            .or_default()
            .bridges
            .insert(key, id);
    }

    /// Returns true the first time a capability is requested for an element;
    /// later calls are no-ops.
    fn mark_installed(&self, element: &ElementRef, capability: Capability) -> bool {
        let mut elements = self.inner.elements.borrow_mut();
        let state = elements.entry(element.id()).or_default();
        let flag = state.installed.flag_mut(capability);
        if *flag {
            false
        } else {
            *flag = true;
            true
        }
    }

    fn install_capability(&self, element: &ElementRef, capability: Capability) {
        match capability {
            Capability::Click => self.install_click(element),
            Capability::ClickOutside => self.install_click_outside(element),
            Capability::PointerPosition => self.install_pointer_position(element),
            Capability::Scroll => self.install_scroll(element),
        }
    }

    /// Click normalization. On platforms with native single-tap semantics
    /// this bridges the native click; otherwise a `click` is synthesized for
    /// a single-touch tap that ends within [`TAP_TOLERANCE`] of its start.
    fn install_click(&self, element: &ElementRef) {
        if !self.mark_installed(element, Capability::Click) {
            return;
        }

        if !self.inner.document.needs_tap_synthesis() {
            let weak = Rc::downgrade(&self.inner);
            let target = Rc::clone(element);
            element.add_native_listener(
                "click",
                Rc::new(move |event| {
                    if let Some(inner) = weak.upgrade() {
                        EventSystem::from_inner(inner).trigger(&target, "click", event);
                    }
                }),
                false,
            );
            return;
        }

        let waiting = Rc::new(Cell::new(false));
        let start = Rc::new(Cell::new(Point::ZERO));

        {
            let waiting = Rc::clone(&waiting);
            let start = Rc::clone(&start);
            element.add_native_listener(
                "touchstart",
                Rc::new(move |event| {
                    if event.touches().len() == 1 {
                        waiting.set(true);
                        let first = event
                            .changed_touches()
                            .first()
                            .map(|touch| touch.client)
                            .unwrap_or_else(|| event.client());
                        start.set(first);
                    }
                }),
                false,
            );
        }

        {
            let waiting = Rc::clone(&waiting);
            let start = Rc::clone(&start);
            let weak = Rc::downgrade(&self.inner);
            let target = Rc::clone(element);
            element.add_native_listener(
                "touchend",
                Rc::new(move |event| {
                    if waiting.get() && event.changed_touches().len() == 1 {
                        let end = event.changed_touches()[0].client;
                        let begin = start.get();
                        if (end.x - begin.x).abs() < TAP_TOLERANCE
                            && (end.y - begin.y).abs() < TAP_TOLERANCE
                        {
                            if let Some(inner) = weak.upgrade() {
                                EventSystem::from_inner(inner).trigger(&target, "click", event);
                            }
                        }
                    }
                    waiting.set(false);
                }),
                false,
            );
        }

        {
            let waiting = Rc::clone(&waiting);
            element.add_native_listener(
                "touchcancel",
                Rc::new(move |_| waiting.set(false)),
                false,
            );
        }
    }

    /// `clickOutside`: one shared body-level click listener serves every
    /// subscriber; each click is tested against each subscriber's subtree.
    fn install_click_outside(&self, element: &ElementRef) {
        if !self.mark_installed(element, Capability::ClickOutside) {
            return;
        }
        self.inner
            .outside_subscribers
            .borrow_mut()
            .push(Rc::clone(element));

        if self.inner.outside_listener_installed.replace(true) {
            return;
        }

        let body = self.inner.document.body();
        let weak = Rc::downgrade(&self.inner);
        let handler: LogicalHandler = Rc::new(move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let system = EventSystem::from_inner(inner);
            let subscribers: Vec<ElementRef> = system.inner.outside_subscribers.borrow().clone();
            for subscriber in subscribers {
                if !target_within(event, &subscriber) {
                    system.trigger(&subscriber, "clickOutside", event);
                }
            }
        });
        self.register_event(&body, "click", handler, false);
    }

    /// Pointer enter/leave/over, derived by sampling the topmost element at
    /// the pointer coordinate on every `pointerMove` seen by the parent.
    /// The inside/outside state resets to unknown on `pointerEnd` so the
    /// next gesture re-establishes it instead of trusting stale state.
    fn install_pointer_position(&self, element: &ElementRef) {
        if !self.mark_installed(element, Capability::PointerPosition) {
            return;
        }

        let parent = element
            .parent()
            .unwrap_or_else(|| self.inner.document.body());
        let inside: Rc<Cell<Option<bool>>> = Rc::new(Cell::new(None));

        {
            let inside = Rc::clone(&inside);
            let end_handler: LogicalHandler = Rc::new(move |_| inside.set(None));
            self.register_event(&parent, "pointerEnd", end_handler, false);
        }

        let weak = Rc::downgrade(&self.inner);
        let target = Rc::clone(element);
        let move_handler: LogicalHandler = Rc::new(move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let system = EventSystem::from_inner(inner);
            let position = pointer_position(event);
            let is_inside = system
                .inner
                .document
                .element_from_point(position)
                .map(|topmost| same_element(&topmost, &target))
                .unwrap_or(false);
            let was_inside = inside.replace(Some(is_inside));

            if let Some(was) = was_inside {
                if is_inside && !was {
                    system.trigger(&target, "pointerEnter", event);
                }
                if !is_inside && was {
                    system.trigger(&target, "pointerLeave", event);
                }
            }
            if is_inside {
                system.trigger(&target, "pointerOver", event);
            }
        });
        self.register_event(&parent, "pointerMove", move_handler, false);
    }

    /// Scroll normalization: native scroll and bridged touch-scroll both
    /// coalesce to at most one logical `scroll` dispatch per frame.
    fn install_scroll(&self, element: &ElementRef) {
        if !self.mark_installed(element, Capability::Scroll) {
            return;
        }

        let ticking = Rc::new(Cell::new(false));
        let scroll_fn: Rc<dyn Fn()> = {
            let ticking = Rc::clone(&ticking);
            let weak = Rc::downgrade(&self.inner);
            let target = Rc::clone(element);
            Rc::new(move || {
                if !ticking.get() {
                    if let Some(inner) = weak.upgrade() {
                        let ticking = Rc::clone(&ticking);
                        let weak = Rc::downgrade(&inner);
                        let target = Rc::clone(&target);
                        inner.runtime.register_frame_callback(move |_| {
                            if let Some(inner) = weak.upgrade() {
                                let event = NativeEvent::scroll(target.scroll_top());
                                EventSystem::from_inner(inner).trigger(&target, "scroll", &event);
                            }
                            ticking.set(false);
                        });
                    }
                }
                ticking.set(true);
            })
        };

        {
            let scroll_fn = Rc::clone(&scroll_fn);
            element.add_native_listener("scroll", Rc::new(move |_| scroll_fn()), false);
        }

        // Touch scrolling reports through body-level touchmove, bridged only
        // for the duration of the touch.
        let body = self.inner.document.body();
        let bridge_ids: Rc<Cell<Option<(u64, u64)>>> = Rc::new(Cell::new(None));
        let scroll_fn = Rc::clone(&scroll_fn);
        element.add_native_listener(
            "touchstart",
            Rc::new(move |_| {
                if bridge_ids.get().is_some() {
                    return;
                }
                let move_id = {
                    let scroll_fn = Rc::clone(&scroll_fn);
                    body.add_native_listener("touchmove", Rc::new(move |_| scroll_fn()), false)
                };
                let end_id = {
                    let bridge_ids = Rc::clone(&bridge_ids);
                    let bridge_body = Rc::clone(&body);
                    body.add_native_listener(
                        "touchend",
                        Rc::new(move |_| {
                            if let Some((move_id, end_id)) = bridge_ids.take() {
                                bridge_body.remove_native_listener(move_id);
                                bridge_body.remove_native_listener(end_id);
                            }
                        }),
                        false,
                    )
                };
                bridge_ids.set(Some((move_id, end_id)));
            }),
            false,
        );
    }
}

#[cfg(test)]
#[path = "tests/system_tests.rs"]
mod tests;
