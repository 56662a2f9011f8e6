//! Core runtime services for Kinetic.
//!
//! Everything here is single-threaded and event-loop driven: the host calls
//! [`Runtime::tick`] once per display frame, and all suspension inside the
//! toolkit happens through the frame-callback registry and the one-shot
//! timeout queue. There are no locks; shared state is `Rc`/`RefCell` mutated
//! synchronously on the runtime thread.

mod deferred;
mod frame_clock;
mod platform;
mod runtime;

pub use deferred::{Deferred, DeferredState};
pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{Clock, InstantClock, RuntimeScheduler};
pub use runtime::{FrameCallbackId, Runtime, RuntimeHandle, TimeoutId};

/// Converts a millisecond duration to the nanosecond timeline used by
/// [`Runtime`] drains.
pub fn millis_to_nanos(millis: f64) -> u64 {
    if millis <= 0.0 {
        0
    } else {
        (millis * 1_000_000.0) as u64
    }
}

/// Converts a nanosecond timestamp difference to fractional milliseconds.
pub fn nanos_to_millis(nanos: u64) -> f64 {
    nanos as f64 / 1_000_000.0
}
