use super::*;

use std::cell::Cell;
use std::rc::Rc;

use kinetic_core::DeferredState;
use kinetic_dom::{Element, ElementRef};
use kinetic_testing::{ready_runtime, test_runtime, StubElement};

#[test]
fn before_first_tick_final_values_apply_immediately() {
    let (_runtime, handle) = test_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    let animation = transitioner.transition(
        &element,
        TransitionSpec::new().from_to("opacity", "0", "1"),
        300.0,
        0.0,
        "ease-in-out",
    );

    assert_eq!(stub.style("opacity").as_deref(), Some("1"));
    assert!(stub.last_player().is_none());
    assert_eq!(animation.completion().state(), DeferredState::Resolved);
}

#[test]
fn completion_sets_final_literals_and_resolves() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    let animation = transitioner.transition(
        &element,
        TransitionSpec::new().from_to("opacity", "0", "1"),
        300.0,
        0.0,
        "ease-in-out",
    );

    let player = stub.last_player().expect("native animation started");
    assert_eq!(player.from.get("opacity"), Some("0"));
    assert_eq!(player.to.get("opacity"), Some("1"));
    assert_eq!(player.timing.easing, "ease-in-out");

    let resolved = Rc::new(Cell::new(false));
    let r = Rc::clone(&resolved);
    animation.then(move || r.set(true));
    assert!(!resolved.get());

    player.finish();
    assert!(resolved.get());
    assert_eq!(stub.style("opacity").as_deref(), Some("1"));
    // Safari workaround: the player is released after completion.
    assert!(player.is_cancelled());
}

#[test]
fn scalar_target_reads_from_value_from_computed_style() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    stub.seed_style("opacity", "0.3");
    let element: ElementRef = stub.clone();

    transitioner.transition(
        &element,
        TransitionSpec::new().to("opacity", "1"),
        200.0,
        0.0,
        "linear",
    );

    let player = stub.last_player().expect("native animation started");
    assert_eq!(player.from.get("opacity"), Some("0.3"));
    assert_eq!(player.to.get("opacity"), Some("1"));
}

#[test]
fn delay_primes_from_values_and_commits_after_timeout() {
    let (runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    transitioner.transition(
        &element,
        TransitionSpec::new().from_to("opacity", "0", "1"),
        300.0,
        100.0,
        "ease-in-out",
    );

    // Primed at the from-value for the duration of the delay, not started.
    assert_eq!(stub.style("opacity").as_deref(), Some("0"));
    assert!(stub.last_player().is_none());

    runtime.tick(100_000_000);
    assert!(stub.last_player().is_some());
}

#[test]
fn cancel_before_delay_prevents_start() {
    let (runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    let animation = transitioner.transition(
        &element,
        TransitionSpec::new().from_to("opacity", "0", "1"),
        300.0,
        100.0,
        "ease-in-out",
    );

    animation.cancel();
    runtime.tick(200_000_000);

    assert!(stub.last_player().is_none());
    assert_eq!(animation.completion().state(), DeferredState::Rejected);
}

#[test]
fn new_transition_supersedes_running_one() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    let first = transitioner.transition(
        &element,
        TransitionSpec::new().from_to("opacity", "0", "1"),
        300.0,
        0.0,
        "ease-in-out",
    );
    let first_player = stub.last_player().expect("first animation started");

    let _second = transitioner.transition(
        &element,
        TransitionSpec::new().from_to("opacity", "1", "0"),
        300.0,
        0.0,
        "ease-in-out",
    );

    assert!(first_player.is_cancelled());
    assert_eq!(first.completion().state(), DeferredState::Rejected);
    assert_eq!(stub.players().len(), 2);
}

#[test]
fn height_auto_measures_children_and_restores_after() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let child_a = StubElement::new();
    let child_b = StubElement::new();
    child_a.set_outer_height(30.0);
    child_b.set_outer_height(50.0);
    stub.append_child(&child_a);
    stub.append_child(&child_b);
    let element: ElementRef = stub.clone();

    transitioner.transition(
        &element,
        TransitionSpec::new().from_to("height", "0", "auto"),
        300.0,
        0.0,
        "ease-in-out",
    );

    let player = stub.last_player().expect("native animation started");
    assert_eq!(player.to.get("height"), Some("80px"));

    player.finish();
    assert_eq!(stub.style("height").as_deref(), Some("auto"));
}

#[test]
fn cancel_after_start_freezes_current_values() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    let animation = transitioner.transition(
        &element,
        TransitionSpec::new().from_to("opacity", "0", "1"),
        300.0,
        0.0,
        "ease-in-out",
    );
    let player = stub.last_player().expect("native animation started");

    // Host reports a mid-flight computed value, then the caller cancels.
    stub.seed_style("opacity", "0.42");
    animation.cancel();

    assert!(player.is_cancelled());
    assert_eq!(stub.style("opacity").as_deref(), Some("0.42"));

    let resolved = Rc::new(Cell::new(false));
    let r = Rc::clone(&resolved);
    animation.then(move || r.set(true));
    player.finish();
    assert!(!resolved.get());
}

#[test]
fn bounce_aliases_map_to_fixed_beziers() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    transitioner.transition(
        &element,
        TransitionSpec::new().from_to("opacity", "0", "1"),
        300.0,
        0.0,
        "bounce-in",
    );
    assert_eq!(
        stub.last_player().expect("started").timing.easing,
        BOUNCE_IN
    );
}

#[test]
fn removed_element_skips_final_styles_but_resolves() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    let animation = transitioner.transition(
        &element,
        TransitionSpec::new().from_to("opacity", "0", "1"),
        300.0,
        0.0,
        "ease-in-out",
    );
    let player = stub.last_player().expect("started");

    element.remove();
    stub.seed_style("opacity", "0.5");
    player.finish();

    assert_eq!(stub.style("opacity").as_deref(), Some("0.5"));
    assert_eq!(animation.completion().state(), DeferredState::Resolved);
}
