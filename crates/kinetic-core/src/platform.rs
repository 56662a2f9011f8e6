//! Platform abstraction traits for Kinetic runtime services.
//!
//! These traits let the toolkit delegate frame scheduling and clock
//! responsibilities to the host environment (a browser shell, a winit loop,
//! a test harness) without depending on any of them directly.

use web_time::Instant;

/// Schedules work for the Kinetic runtime.
///
/// Implementations are responsible for arranging that the host calls
/// [`crate::Runtime::tick`] again soon — `requestAnimationFrame` in a browser
/// shell, a redraw request in a windowing loop, or nothing at all in a test
/// harness that drives time by hand.
pub trait RuntimeScheduler {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for the runtime driver.
pub trait Clock {
    /// Returns nanoseconds elapsed since an arbitrary fixed origin.
    fn now_nanos(&self) -> u64;
}

/// Monotonic wall clock backed by [`web_time::Instant`], usable on native
/// targets and WASM alike.
pub struct InstantClock {
    origin: Instant,
}

impl InstantClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for InstantClock {
    fn now_nanos(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}
