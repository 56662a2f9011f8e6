use super::*;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kinetic_core::DeferredState;
use kinetic_testing::ready_runtime;

#[test]
fn zero_duration_invokes_once_synchronously() {
    let (_runtime, handle) = ready_runtime();

    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let animation = animate(&handle, move |_, _, _| c.set(c.get() + 1), Some(0.0));

    assert_eq!(calls.get(), 1);
    let resolved = Rc::new(Cell::new(false));
    let r = Rc::clone(&resolved);
    animation.then(move || r.set(true));
    assert!(resolved.get());
}

#[test]
fn progress_is_clamped_fraction_of_duration() {
    let (runtime, handle) = ready_runtime();

    let samples = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&samples);
    let animation = animate(&handle, move |p, _, _| s.borrow_mut().push(p), Some(100.0));

    runtime.tick(50_000_000);
    runtime.tick(150_000_000);
    runtime.tick(200_000_000);

    // Synchronous first call at zero, one per frame after, none past the end.
    assert_eq!(samples.borrow().as_slice(), &[0.0, 0.5, 1.0]);

    let resolved = Rc::new(Cell::new(false));
    let r = Rc::clone(&resolved);
    animation.then(move || r.set(true));
    assert!(resolved.get());
}

#[test]
fn delta_time_tracks_frame_gaps() {
    let (runtime, handle) = ready_runtime();

    let deltas = Rc::new(RefCell::new(Vec::new()));
    let d = Rc::clone(&deltas);
    let _animation = animate(&handle, move |_, dt, _| d.borrow_mut().push(dt), Some(100.0));

    runtime.tick(30_000_000);
    runtime.tick(70_000_000);

    assert_eq!(deltas.borrow().as_slice(), &[0.0, 30.0, 40.0]);
}

#[test]
fn cancel_rejects_and_stops_frames() {
    let (runtime, handle) = ready_runtime();

    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let animation = animate(&handle, move |_, _, _| c.set(c.get() + 1), Some(100.0));

    runtime.tick(20_000_000);
    assert_eq!(calls.get(), 2);

    animation.cancel();
    runtime.tick(40_000_000);
    runtime.tick(200_000_000);
    assert_eq!(calls.get(), 2);

    let resolved = Rc::new(Cell::new(false));
    let r = Rc::clone(&resolved);
    animation.then(move || r.set(true));
    assert!(!resolved.get());
    assert_eq!(animation.completion().state(), DeferredState::Rejected);
}

#[test]
fn open_ended_animation_reports_elapsed_and_self_cancels() {
    let (runtime, handle) = ready_runtime();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let animation = animate(
        &handle,
        move |elapsed, _, anim| {
            s.borrow_mut().push(elapsed);
            if elapsed >= 40.0 {
                anim.cancel();
            }
        },
        None,
    );

    runtime.tick(20_000_000);
    runtime.tick(40_000_000);
    runtime.tick(60_000_000);

    assert_eq!(seen.borrow().as_slice(), &[0.0, 20.0, 40.0]);
    assert_eq!(animation.completion().state(), DeferredState::Rejected);
}

#[test]
fn animation_survives_dropping_the_handle() {
    let (runtime, handle) = ready_runtime();

    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    drop(animate(&handle, move |_, _, _| c.set(c.get() + 1), Some(100.0)));

    runtime.tick(50_000_000);
    assert_eq!(calls.get(), 2);
}

#[test]
fn cancel_inside_callback_prevents_next_frame() {
    let (runtime, handle) = ready_runtime();

    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let _animation = animate(
        &handle,
        move |_, _, anim| {
            c.set(c.get() + 1);
            anim.cancel();
        },
        Some(1_000.0),
    );

    assert_eq!(calls.get(), 1);
    runtime.tick(16_000_000);
    runtime.tick(32_000_000);
    assert_eq!(calls.get(), 1);
}
