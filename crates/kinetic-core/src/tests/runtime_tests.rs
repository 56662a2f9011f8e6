use super::*;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

struct CountingScheduler {
    requests: Cell<usize>,
}

impl CountingScheduler {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            requests: Cell::new(0),
        })
    }
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

fn new_runtime() -> (Runtime, Rc<CountingScheduler>) {
    let scheduler = CountingScheduler::new();
    let runtime = Runtime::new(scheduler.clone());
    (runtime, scheduler)
}

#[test]
fn frame_callbacks_fire_once_with_frame_time() {
    let (runtime, scheduler) = new_runtime();
    let handle = runtime.handle();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    handle.register_frame_callback(move |t| s.borrow_mut().push(t));
    assert!(scheduler.requests.get() > 0);

    runtime.tick(16_000_000);
    runtime.tick(32_000_000);
    assert_eq!(seen.borrow().as_slice(), &[16_000_000]);
}

#[test]
fn callback_registered_during_drain_runs_next_frame() {
    let (runtime, _) = new_runtime();
    let handle = runtime.handle();

    let times = Rc::new(RefCell::new(Vec::new()));
    let t1 = Rc::clone(&times);
    let inner_handle = handle.clone();
    handle.register_frame_callback(move |t| {
        t1.borrow_mut().push(t);
        let t2 = Rc::clone(&t1);
        inner_handle.register_frame_callback(move |t| t2.borrow_mut().push(t));
    });

    runtime.tick(10);
    assert_eq!(times.borrow().len(), 1);
    runtime.tick(20);
    assert_eq!(times.borrow().as_slice(), &[10, 20]);
}

#[test]
fn cancelled_frame_callback_never_fires() {
    let (runtime, _) = new_runtime();
    let handle = runtime.handle();

    let fired = Rc::new(Cell::new(false));
    let f = Rc::clone(&fired);
    let id = handle
        .register_frame_callback(move |_| f.set(true))
        .expect("runtime alive");
    handle.cancel_frame_callback(id);

    runtime.tick(16);
    assert!(!fired.get());
}

#[test]
fn timeouts_fire_at_their_deadline_only() {
    let (runtime, _) = new_runtime();
    let handle = runtime.handle();
    runtime.tick(0);

    let fired = Rc::new(Cell::new(false));
    let f = Rc::clone(&fired);
    handle.set_timeout(5_000_000, move || f.set(true));

    runtime.tick(4_000_000);
    assert!(!fired.get());
    runtime.tick(5_000_000);
    assert!(fired.get());
}

#[test]
fn cancelled_timeout_never_fires() {
    let (runtime, _) = new_runtime();
    let handle = runtime.handle();
    runtime.tick(0);

    let fired = Rc::new(Cell::new(false));
    let f = Rc::clone(&fired);
    let id = handle
        .set_timeout(1_000_000, move || f.set(true))
        .expect("runtime alive");
    handle.cancel_timeout(id);

    runtime.tick(10_000_000);
    assert!(!fired.get());
}

#[test]
fn readiness_flips_exactly_once_on_first_tick() {
    let (runtime, _) = new_runtime();
    let handle = runtime.handle();

    assert!(!handle.is_ready());
    runtime.tick(16);
    assert!(handle.is_ready());
    runtime.tick(32);
    assert!(handle.is_ready());
}

#[test]
fn dead_runtime_degrades_to_noops() {
    let handle = {
        let (runtime, _) = new_runtime();
        runtime.handle()
    };

    assert!(handle.register_frame_callback(|_| {}).is_none());
    assert!(handle.set_timeout(0, || {}).is_none());
    assert!(!handle.is_ready());
}
