use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::platform::RuntimeScheduler;

pub type FrameCallbackId = u64;
pub type TimeoutId = u64;

pub(crate) struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct TimeoutEntry {
    id: TimeoutId,
    deadline_nanos: u64,
    callback: Option<Box<dyn FnOnce() + 'static>>,
}

struct RuntimeInner {
    scheduler: Rc<dyn RuntimeScheduler>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    timeouts: RefCell<Vec<TimeoutEntry>>,
    next_timeout_id: Cell<u64>,
    /// Timestamp of the most recent drained tick. Timeout deadlines are
    /// computed against this, which keeps the whole timeline test-drivable.
    now_nanos: Cell<u64>,
    /// Readiness gate: false at construction, flips true exactly once on the
    /// first drained tick, never resets. Consumers use it to suppress
    /// animations during initial page construction.
    ready: Cell<bool>,
}

impl RuntimeInner {
    fn new(scheduler: Rc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            timeouts: RefCell::new(Vec::new()),
            next_timeout_id: Cell::new(1),
            now_nanos: Cell::new(0),
            ready: Cell::new(false),
        }
    }

    fn schedule(&self) {
        self.scheduler.schedule_frame();
    }

    fn mark_tick(&self, now_nanos: u64) {
        self.ready.set(true);
        if now_nanos > self.now_nanos.get() {
            self.now_nanos.set(now_nanos);
        }
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        self.mark_tick(frame_time_nanos);
        // Collect first, then invoke: callbacks may re-register and those
        // registrations belong to the next frame, not this one.
        let mut pending: Vec<Box<dyn FnOnce(u64) + 'static>> = Vec::new();
        {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            while let Some(mut entry) = callbacks.pop_front() {
                if let Some(callback) = entry.callback.take() {
                    pending.push(callback);
                }
            }
        }
        for callback in pending {
            callback(frame_time_nanos);
        }
    }

    fn set_timeout(&self, delay_nanos: u64, callback: Box<dyn FnOnce() + 'static>) -> TimeoutId {
        let id = self.next_timeout_id.get();
        self.next_timeout_id.set(id + 1);
        self.timeouts.borrow_mut().push(TimeoutEntry {
            id,
            deadline_nanos: self.now_nanos.get().saturating_add(delay_nanos),
            callback: Some(callback),
        });
        self.schedule();
        id
    }

    fn cancel_timeout(&self, id: TimeoutId) {
        self.timeouts.borrow_mut().retain(|entry| entry.id != id);
    }

    fn drain_timeouts(&self, now_nanos: u64) {
        self.mark_tick(now_nanos);
        let mut due: Vec<Box<dyn FnOnce() + 'static>> = Vec::new();
        {
            let mut timeouts = self.timeouts.borrow_mut();
            let mut index = 0;
            while index < timeouts.len() {
                if timeouts[index].deadline_nanos <= now_nanos {
                    let mut entry = timeouts.remove(index);
                    if let Some(callback) = entry.callback.take() {
                        due.push(callback);
                    }
                } else {
                    index += 1;
                }
            }
        }
        for callback in due {
            callback();
        }
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    fn has_timeouts(&self) -> bool {
        !self.timeouts.borrow().is_empty()
    }
}

/// Owner of the runtime state. The host keeps this alive for the lifetime of
/// the page/window and calls [`Runtime::tick`] once per display frame.
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Rc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Advances the cooperative timeline: fires due timeouts, then this
    /// frame's callbacks. The first call flips the readiness gate.
    pub fn tick(&self, now_nanos: u64) {
        self.inner.drain_timeouts(now_nanos);
        self.inner.drain_frame_callbacks(now_nanos);
    }

    /// True while any frame callback or timeout is outstanding; hosts can use
    /// this to idle instead of spinning.
    pub fn has_pending_work(&self) -> bool {
        self.inner.has_frame_callbacks() || self.inner.has_timeouts()
    }
}

/// Cloneable, weak handle onto the runtime. All toolkit components hold one
/// of these; operations degrade to no-ops once the runtime is gone.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        let inner = self.inner.upgrade();
        if inner.is_none() {
            log::debug!("frame callback registered after runtime shutdown; dropped");
        }
        inner.map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    /// Schedules a one-shot callback `delay_nanos` after the latest tick.
    pub fn set_timeout(
        &self,
        delay_nanos: u64,
        callback: impl FnOnce() + 'static,
    ) -> Option<TimeoutId> {
        self.inner
            .upgrade()
            .map(|inner| inner.set_timeout(delay_nanos, Box::new(callback)))
    }

    pub fn cancel_timeout(&self, id: TimeoutId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_timeout(id);
        }
    }

    pub fn drain_timeouts(&self, now_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_timeouts(now_nanos);
        }
    }

    /// Timestamp of the latest drained tick.
    pub fn now_nanos(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| inner.now_nanos.get())
            .unwrap_or(0)
    }

    /// Whether the first cooperative tick has happened. False during initial
    /// page construction; never resets once true.
    pub fn is_ready(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.ready.get())
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
