//! Test doubles for the Kinetic toolkit.
//!
//! [`StubElement`] and [`StubDocument`] implement the `kinetic-dom` traits
//! over plain in-memory state, with counting listener registries and scripted
//! keyframe players so tests can assert on installs, dispatches and finish
//! signals without a real host. Time is driven by hand through
//! [`kinetic_core::Runtime::tick`].

mod stub_document;
mod stub_element;

pub use stub_document::StubDocument;
pub use stub_element::{StubElement, StubPlayer};

use std::cell::Cell;
use std::rc::Rc;

use kinetic_core::{Runtime, RuntimeHandle, RuntimeScheduler};

/// Scheduler stub that only counts frame requests.
pub struct RecordingScheduler {
    requests: Cell<usize>,
}

impl RecordingScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            requests: Cell::new(0),
        })
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl RuntimeScheduler for RecordingScheduler {
    fn schedule_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

/// A manually-driven runtime plus its handle.
pub fn test_runtime() -> (Runtime, RuntimeHandle) {
    let runtime = Runtime::new(RecordingScheduler::new());
    let handle = runtime.handle();
    (runtime, handle)
}

/// A runtime that has already seen its first tick, so readiness-gated paths
/// run their animated branches.
pub fn ready_runtime() -> (Runtime, RuntimeHandle) {
    let (runtime, handle) = test_runtime();
    runtime.tick(0);
    (runtime, handle)
}
