//! Element transition orchestrator.
//!
//! Computes from/to style pairs, coordinates delayed starts and
//! supersession, and drives the host's native interpolation primitive. The
//! readiness gate suppresses animation during initial page construction:
//! before the runtime's first tick every transition jumps straight to its
//! final values.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use kinetic_core::{millis_to_nanos, Deferred, RuntimeHandle, TimeoutId};
use kinetic_dom::{Element, ElementId, ElementRef, Keyframe, KeyframePlayer, KeyframeTiming};

use crate::animate::AnimationHandle;

pub const BOUNCE_IN: &str = "cubic-bezier(0.175, 0.885, 0.32, 1.275)";
pub const BOUNCE_OUT: &str = "cubic-bezier(0.68, -0.275, 0.825, 0.115)";

/// Target of one animated style property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyTarget {
    /// Animate from the live computed style to this value.
    Value(String),
    /// Explicit `(from, to)` pair.
    FromTo(String, String),
}

impl PropertyTarget {
    fn final_value(&self) -> &str {
        match self {
            PropertyTarget::Value(to) => to,
            PropertyTarget::FromTo(_, to) => to,
        }
    }
}

/// Ordered property → target mapping consumed by one transition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitionSpec {
    props: IndexMap<String, PropertyTarget>,
}

impl TransitionSpec {
    pub fn new() -> Self {
        Self {
            props: IndexMap::new(),
        }
    }

    /// Animates `property` from its current computed value to `to`.
    pub fn to(mut self, property: impl Into<String>, to: impl Into<String>) -> Self {
        self.props
            .insert(property.into(), PropertyTarget::Value(to.into()));
        self
    }

    /// Animates `property` across an explicit `(from, to)` pair.
    pub fn from_to(
        mut self,
        property: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.props.insert(
            property.into(),
            PropertyTarget::FromTo(from.into(), to.into()),
        );
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyTarget)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

struct TransitionState {
    element: ElementRef,
    from: Keyframe,
    to: Keyframe,
    timing: KeyframeTiming,
    /// Property names in spec order, with the literal value to apply once
    /// the native interpolation reports completion (`auto` restored here).
    final_values: Vec<(String, String)>,
    deferred: Deferred,
    cancelled: Cell<bool>,
    timeout: Cell<Option<TimeoutId>>,
    player: RefCell<Option<Rc<dyn KeyframePlayer>>>,
    runtime: RuntimeHandle,
}

impl TransitionState {
    fn commit(self: &Rc<Self>) {
        if self.cancelled.get() {
            return;
        }
        let player = self
            .element
            .start_keyframe_animation(&self.from, &self.to, &self.timing);
        *self.player.borrow_mut() = Some(Rc::clone(&player));
        let state = Rc::clone(self);
        player.on_finish(Box::new(move || state.finish()));
    }

    fn finish(&self) {
        if self.cancelled.get() {
            return;
        }
        if self.element.is_connected() {
            for (property, value) in &self.final_values {
                self.element.set_css(property, value);
            }
        } else {
            log::debug!("transition target removed mid-animation; skipping final styles");
        }
        self.deferred.resolve();
        // Release the native player's hold on the style; fill-forwards would
        // otherwise pin the element and shadow later style writes.
        if let Some(player) = self.player.borrow_mut().take() {
            player.cancel();
        }
    }

    fn cancel(&self) {
        self.cancelled.set(true);
        self.deferred.reject();
        if let Some(timeout) = self.timeout.take() {
            self.runtime.cancel_timeout(timeout);
        }
        if self.element.is_connected() {
            // Freeze in place: re-apply the current computed values as
            // literals before stopping the native interpolation.
            for (property, _) in &self.final_values {
                let current = self.element.css(property);
                self.element.set_css(property, &current);
            }
        }
        if let Some(player) = self.player.borrow_mut().take() {
            player.cancel();
        }
    }
}

/// Orchestrates element transitions: at most one active transition per
/// element, with supersession, delayed starts and the readiness gate.
pub struct Transitioner {
    runtime: RuntimeHandle,
    active: RefCell<HashMap<ElementId, AnimationHandle>>,
}

impl Transitioner {
    pub fn new(runtime: RuntimeHandle) -> Self {
        Self {
            runtime,
            active: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn runtime(&self) -> &RuntimeHandle {
        &self.runtime
    }

    /// Animates the given properties on `element`.
    ///
    /// Before the runtime's first tick this applies the final values
    /// immediately and returns an already-resolved handle. Otherwise any
    /// running transition on the element is cancelled first, from-values are
    /// resolved (explicit pair, else live computed style), a `height: auto`
    /// target is measured from the children, and the native interpolation is
    /// committed after `delay_millis`.
    pub fn transition(
        &self,
        element: &ElementRef,
        spec: TransitionSpec,
        duration_millis: f64,
        delay_millis: f64,
        easing: &str,
    ) -> AnimationHandle {
        if !self.runtime.is_ready() {
            for (property, target) in spec.iter() {
                element.set_css(property, target.final_value());
            }
            return AnimationHandle::resolved();
        }

        let easing = match easing {
            "bounce-in" => BOUNCE_IN,
            "bounce-out" => BOUNCE_OUT,
            other => other,
        };

        // Supersession: the element's transition slot holds at most one
        // active handle, and shared style state is only touched after the
        // previous owner has been cancelled.
        if let Some(previous) = self.active.borrow_mut().remove(&element.id()) {
            previous.cancel();
        }

        let mut from = Keyframe::new();
        let mut to = Keyframe::new();
        let mut final_values = Vec::new();
        for (property, target) in spec.iter() {
            let (from_value, to_value) = match target {
                PropertyTarget::FromTo(f, t) => (f.clone(), t.clone()),
                PropertyTarget::Value(t) => (element.css(property), t.clone()),
            };
            // Prime the element during the delay window so it sits at the
            // from-state instead of its resting style.
            if delay_millis > 0.0 {
                element.set_css(property, &from_value);
            }
            from.set(property, from_value);
            to.set(property, to_value.clone());
            final_values.push((property.to_string(), to_value));
        }

        // Native engines cannot interpolate to `auto`: measure the children
        // and animate to the concrete total, restoring `auto` on completion
        // so later reflows stay responsive.
        if to.get("height") == Some("auto") {
            let measured: f32 = element
                .children()
                .iter()
                .map(|child| child.outer_height())
                .sum();
            to.set("height", format!("{measured}px"));
        }

        let deferred = Deferred::new();
        let state = Rc::new(TransitionState {
            element: Rc::clone(element),
            from,
            to,
            timing: KeyframeTiming::new(duration_millis, easing),
            final_values,
            deferred: deferred.clone(),
            cancelled: Cell::new(false),
            timeout: Cell::new(None),
            player: RefCell::new(None),
            runtime: self.runtime.clone(),
        });

        if delay_millis > 0.0 {
            let deferred_state = Rc::clone(&state);
            let timeout = self.runtime.set_timeout(millis_to_nanos(delay_millis), move || {
                deferred_state.timeout.set(None);
                deferred_state.commit();
            });
            state.timeout.set(timeout);
        } else {
            state.commit();
        }

        let cancel_state = Rc::clone(&state);
        let handle = AnimationHandle::new(deferred, move || cancel_state.cancel());
        self.active
            .borrow_mut()
            .insert(element.id(), handle.clone());
        handle
    }

    /// Defensive teardown for hosts removing an element mid-animation:
    /// cancels and forgets any transition attached to it.
    pub fn release(&self, element: &ElementRef) {
        if let Some(handle) = self.active.borrow_mut().remove(&element.id()) {
            handle.cancel();
        }
    }
}

#[cfg(test)]
#[path = "tests/transition_tests.rs"]
mod tests;
