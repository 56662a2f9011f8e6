use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use kinetic_dom::{
    Element, ElementId, ElementRef, Keyframe, KeyframePlayer, KeyframeTiming, NativeEvent,
    NativeHandler, NativeListenerId,
};
use kinetic_graphics::{Size, Transform};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

struct ListenerEntry {
    id: NativeListenerId,
    handler: NativeHandler,
    #[allow(dead_code)]
    capture: bool,
}

/// Scripted stand-in for the native keyframe animation primitive.
///
/// Tests drive completion explicitly with [`StubPlayer::finish`]; a cancelled
/// player swallows the finish signal the way a real engine does.
pub struct StubPlayer {
    pub from: Keyframe,
    pub to: Keyframe,
    pub timing: KeyframeTiming,
    cancelled: Cell<bool>,
    finished: Cell<bool>,
    finish_callbacks: RefCell<Vec<Box<dyn FnOnce()>>>,
}

impl StubPlayer {
    fn new(from: Keyframe, to: Keyframe, timing: KeyframeTiming) -> Rc<Self> {
        Rc::new(Self {
            from,
            to,
            timing,
            cancelled: Cell::new(false),
            finished: Cell::new(false),
            finish_callbacks: RefCell::new(Vec::new()),
        })
    }

    /// Reports native completion, firing finish callbacks unless cancelled.
    pub fn finish(&self) {
        if self.cancelled.get() || self.finished.replace(true) {
            return;
        }
        let callbacks = std::mem::take(&mut *self.finish_callbacks.borrow_mut());
        for callback in callbacks {
            callback();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl KeyframePlayer for StubPlayer {
    fn on_finish(&self, callback: Box<dyn FnOnce()>) {
        if self.finished.get() && !self.cancelled.get() {
            callback();
        } else {
            self.finish_callbacks.borrow_mut().push(callback);
        }
    }

    fn cancel(&self) {
        self.cancelled.set(true);
        self.finish_callbacks.borrow_mut().clear();
    }
}

/// In-memory element with a counting native-listener registry.
pub struct StubElement {
    id: ElementId,
    styles: RefCell<IndexMap<String, String>>,
    attrs: RefCell<IndexMap<String, String>>,
    classes: RefCell<Vec<String>>,
    connected: Cell<bool>,
    size: Cell<Size>,
    svg_size: Cell<Size>,
    outer_height: Cell<f32>,
    stroke_length: Cell<f32>,
    scroll_top: Cell<f32>,
    svg: Cell<bool>,
    screen_matrix: Cell<Transform>,
    children: RefCell<Vec<Rc<StubElement>>>,
    parent: RefCell<Weak<StubElement>>,
    listeners: RefCell<HashMap<String, Vec<ListenerEntry>>>,
    next_listener_id: Cell<NativeListenerId>,
    /// Number of `add_native_listener` calls per event name, for
    /// idempotence assertions.
    install_counts: RefCell<HashMap<String, usize>>,
    players: RefCell<Vec<Rc<StubPlayer>>>,
    animation_end_callbacks: RefCell<Vec<Box<dyn FnOnce()>>>,
    translations: RefCell<Vec<(f32, f32)>>,
}

impl StubElement {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            id: NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed),
            styles: RefCell::new(IndexMap::new()),
            attrs: RefCell::new(IndexMap::new()),
            classes: RefCell::new(Vec::new()),
            connected: Cell::new(true),
            size: Cell::new(Size::ZERO),
            svg_size: Cell::new(Size::ZERO),
            outer_height: Cell::new(0.0),
            stroke_length: Cell::new(0.0),
            scroll_top: Cell::new(0.0),
            svg: Cell::new(false),
            screen_matrix: Cell::new(Transform::IDENTITY),
            children: RefCell::new(Vec::new()),
            parent: RefCell::new(Weak::new()),
            listeners: RefCell::new(HashMap::new()),
            next_listener_id: Cell::new(1),
            install_counts: RefCell::new(HashMap::new()),
            players: RefCell::new(Vec::new()),
            animation_end_callbacks: RefCell::new(Vec::new()),
            translations: RefCell::new(Vec::new()),
        })
    }

    pub fn new_svg() -> Rc<Self> {
        let element = Self::new();
        element.svg.set(true);
        element
    }

    // ------------------------------------------------------------------
    // Test configuration

    pub fn set_size(&self, width: f32, height: f32) {
        self.size.set(Size::new(width, height));
    }

    pub fn set_svg_size(&self, width: f32, height: f32) {
        self.svg_size.set(Size::new(width, height));
    }

    pub fn set_outer_height(&self, height: f32) {
        self.outer_height.set(height);
    }

    pub fn set_stroke_length(&self, length: f32) {
        self.stroke_length.set(length);
    }

    pub fn set_scroll_top(&self, top: f32) {
        self.scroll_top.set(top);
    }

    pub fn set_screen_matrix(&self, matrix: Transform) {
        self.screen_matrix.set(matrix);
    }

    /// Seeds a computed-style value without counting as a toolkit write.
    pub fn seed_style(&self, property: &str, value: &str) {
        self.styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
    }

    pub fn append_child(self: &Rc<Self>, child: &Rc<StubElement>) {
        *child.parent.borrow_mut() = Rc::downgrade(self);
        self.children.borrow_mut().push(Rc::clone(child));
    }

    // ------------------------------------------------------------------
    // Test drivers

    /// Invokes every listener registered for the event's native name.
    pub fn fire(&self, event: &NativeEvent) {
        let handlers: Vec<NativeHandler> = self
            .listeners
            .borrow()
            .get(event.name())
            .map(|entries| entries.iter().map(|e| Rc::clone(&e.handler)).collect())
            .unwrap_or_default();
        for handler in handlers {
            if event.propagation_stopped() {
                break;
            }
            handler(event);
        }
    }

    pub fn fire_animation_end(&self) {
        let callbacks = std::mem::take(&mut *self.animation_end_callbacks.borrow_mut());
        for callback in callbacks {
            callback();
        }
    }

    // ------------------------------------------------------------------
    // Test assertions

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .get(event)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    /// Total `add_native_listener` calls ever made for an event name,
    /// including since-removed listeners.
    pub fn install_count(&self, event: &str) -> usize {
        self.install_counts
            .borrow()
            .get(event)
            .copied()
            .unwrap_or(0)
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.styles.borrow().get(property).cloned()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == class)
    }

    pub fn players(&self) -> Vec<Rc<StubPlayer>> {
        self.players.borrow().clone()
    }

    pub fn last_player(&self) -> Option<Rc<StubPlayer>> {
        self.players.borrow().last().cloned()
    }

    pub fn translations(&self) -> Vec<(f32, f32)> {
        self.translations.borrow().clone()
    }

    fn is_ancestor_of(&self, other: &ElementRef) -> bool {
        if other.id() == self.id {
            return true;
        }
        let mut current = other.parent();
        while let Some(element) = current {
            if element.id() == self.id {
                return true;
            }
            current = element.parent();
        }
        false
    }
}

impl Element for StubElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn css(&self, property: &str) -> String {
        self.styles
            .borrow()
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_css(&self, property: &str, value: &str) {
        self.styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attrs.borrow().get(name).cloned()
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.attrs
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().retain(|c| c != class);
    }

    fn show(&self) {
        self.set_css("display", "");
    }

    fn hide(&self) {
        self.set_css("display", "none");
    }

    fn remove(&self) {
        self.connected.set(false);
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn width(&self) -> f32 {
        self.size.get().width
    }

    fn height(&self) -> f32 {
        self.size.get().height
    }

    fn svg_width(&self) -> f32 {
        self.svg_size.get().width
    }

    fn svg_height(&self) -> f32 {
        self.svg_size.get().height
    }

    fn outer_height(&self) -> f32 {
        self.outer_height.get()
    }

    fn stroke_length(&self) -> f32 {
        self.stroke_length.get()
    }

    fn transform_string(&self) -> String {
        self.css("transform")
    }

    fn translate(&self, x: f32, y: f32) {
        self.translations.borrow_mut().push((x, y));
        self.set_css("transform", &format!("translate({x}px,{y}px)"));
    }

    fn children(&self) -> Vec<ElementRef> {
        self.children
            .borrow()
            .iter()
            .map(|c| Rc::clone(c) as ElementRef)
            .collect()
    }

    fn parent(&self) -> Option<ElementRef> {
        self.parent.borrow().upgrade().map(|p| p as ElementRef)
    }

    fn contains(&self, other: &ElementRef) -> bool {
        self.is_ancestor_of(other)
    }

    fn is_svg(&self) -> bool {
        self.svg.get()
    }

    fn screen_matrix(&self) -> Transform {
        self.screen_matrix.get()
    }

    fn scroll_top(&self) -> f32 {
        self.scroll_top.get()
    }

    fn add_native_listener(
        &self,
        event: &str,
        handler: NativeHandler,
        capture: bool,
    ) -> NativeListenerId {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        *self
            .install_counts
            .borrow_mut()
            .entry(event.to_string())
            .or_insert(0) += 1;
        self.listeners
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(ListenerEntry {
                id,
                handler,
                capture,
            });
        id
    }

    fn remove_native_listener(&self, id: NativeListenerId) {
        for entries in self.listeners.borrow_mut().values_mut() {
            entries.retain(|entry| entry.id != id);
        }
    }

    fn start_keyframe_animation(
        &self,
        from: &Keyframe,
        to: &Keyframe,
        timing: &KeyframeTiming,
    ) -> Rc<dyn KeyframePlayer> {
        let player = StubPlayer::new(from.clone(), to.clone(), timing.clone());
        self.players.borrow_mut().push(Rc::clone(&player));
        player
    }

    fn animation_end(&self, callback: Box<dyn FnOnce()>) {
        self.animation_end_callbacks.borrow_mut().push(callback);
    }
}
