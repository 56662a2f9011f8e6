//! Frame-driven animation loop with a cancellable completion handle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetic_core::{nanos_to_millis, Deferred, FrameCallbackRegistration, FrameClock, RuntimeHandle};

/// Opaque handle over one running time-based animation.
///
/// `then` callbacks fire when the animation runs to completion; cancelling
/// first rejects the completion signal instead, so a cancelled animation can
/// never later look finished. Clones share the same underlying animation.
#[derive(Clone)]
pub struct AnimationHandle {
    deferred: Deferred,
    cancel_fn: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
}

impl AnimationHandle {
    pub(crate) fn new(deferred: Deferred, cancel: impl FnOnce() + 'static) -> Self {
        Self {
            deferred,
            cancel_fn: Rc::new(RefCell::new(Some(Box::new(cancel)))),
        }
    }

    /// An already-completed handle; `cancel` is a no-op and `then` callbacks
    /// run immediately.
    pub fn resolved() -> Self {
        let deferred = Deferred::new();
        deferred.resolve();
        Self {
            deferred,
            cancel_fn: Rc::new(RefCell::new(None)),
        }
    }

    /// Stops the animation. Idempotent; a no-op after completion.
    pub fn cancel(&self) {
        if let Some(cancel) = self.cancel_fn.borrow_mut().take() {
            cancel();
        }
    }

    /// Registers a completion callback. Never fires for cancelled animations.
    pub fn then(&self, callback: impl FnOnce() + 'static) {
        self.deferred.then(callback);
    }

    /// The underlying completion signal.
    pub fn completion(&self) -> Deferred {
        self.deferred.clone()
    }
}

struct AnimateState {
    running: Cell<bool>,
    start_nanos: Cell<Option<u64>>,
    last_elapsed_millis: Cell<f64>,
    duration_millis: Option<f64>,
    deferred: Deferred,
    clock: FrameClock,
    registration: RefCell<Option<FrameCallbackRegistration>>,
    callback: RefCell<Box<dyn FnMut(f64, f64, &AnimationHandle)>>,
    handle: RefCell<Option<AnimationHandle>>,
}

/// Runs `callback` once per display frame until the duration elapses or the
/// returned handle is cancelled.
///
/// With a duration, the callback receives the elapsed fraction clamped to 1;
/// without one the animation is open-ended and the callback receives raw
/// elapsed milliseconds and must cancel itself through the handle it is
/// given. A zero duration invokes the callback exactly once, synchronously,
/// with no scheduling. In every case the callback also gets the elapsed time
/// since its previous invocation.
pub fn animate(
    runtime: &RuntimeHandle,
    callback: impl FnMut(f64, f64, &AnimationHandle) + 'static,
    duration_millis: Option<f64>,
) -> AnimationHandle {
    let mut callback = callback;

    if let Some(duration) = duration_millis {
        if duration <= 0.0 {
            let handle = AnimationHandle::resolved();
            callback(1.0, 0.0, &handle);
            return handle;
        }
    }

    let deferred = Deferred::new();
    let state = Rc::new(AnimateState {
        running: Cell::new(true),
        start_nanos: Cell::new(None),
        last_elapsed_millis: Cell::new(0.0),
        duration_millis,
        deferred: deferred.clone(),
        clock: FrameClock::new(runtime.clone()),
        registration: RefCell::new(None),
        callback: RefCell::new(Box::new(callback)),
        handle: RefCell::new(None),
    });

    // The cancel closure holds only a weak reference: the state owns the
    // handle, and the animation's liveness comes from the frame callback the
    // runtime holds, not from the caller keeping the handle around.
    let handle = {
        let weak = Rc::downgrade(&state);
        AnimationHandle::new(deferred, move || {
            if let Some(state) = weak.upgrade() {
                state.running.set(false);
                state.deferred.reject();
                // Dropping the registration cancels the pending frame.
                state.registration.borrow_mut().take();
            }
        })
    };
    *state.handle.borrow_mut() = Some(handle.clone());

    // First invocation happens synchronously at elapsed zero; subsequent ones
    // ride the frame clock.
    on_frame(&state, runtime.now_nanos());

    handle
}

fn schedule_frame(state: &Rc<AnimateState>) {
    if state.registration.borrow().is_some() {
        return;
    }
    // The frame callback keeps the animation alive between frames; callers
    // are free to drop their handle without stopping it.
    let strong = Rc::clone(state);
    let registration = state.clock.with_frame_nanos(move |time| {
        strong.registration.borrow_mut().take();
        on_frame(&strong, time);
    });
    *state.registration.borrow_mut() = Some(registration);
}

fn on_frame(state: &Rc<AnimateState>, frame_time_nanos: u64) {
    if !state.running.get() {
        return;
    }

    let start = match state.start_nanos.get() {
        Some(start) => start,
        None => {
            state.start_nanos.set(Some(frame_time_nanos));
            frame_time_nanos
        }
    };
    let elapsed = nanos_to_millis(frame_time_nanos.saturating_sub(start));
    let delta = elapsed - state.last_elapsed_millis.get();
    state.last_elapsed_millis.set(elapsed);

    let handle = state
        .handle
        .borrow()
        .clone()
        .expect("handle installed before first frame");

    let (progress, finished) = match state.duration_millis {
        Some(duration) => ((elapsed / duration).min(1.0), elapsed >= duration),
        None => (elapsed, false),
    };

    {
        let mut callback = state.callback.borrow_mut();
        (callback.as_mut())(progress, delta, &handle);
    }

    if finished {
        state.running.set(false);
        state.deferred.resolve();
        return;
    }

    // The callback may have cancelled; only then is the next frame skipped.
    if state.running.get() {
        schedule_frame(state);
    }
}

#[cfg(test)]
#[path = "tests/animate_tests.rs"]
mod tests;
