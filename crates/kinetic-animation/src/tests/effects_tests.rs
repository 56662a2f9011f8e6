use super::{append_transform, matrix_to_translate, strip_scale};

use kinetic_core::DeferredState;
use kinetic_dom::{Element, ElementRef};
use kinetic_testing::{ready_runtime, test_runtime, StubElement};

use crate::{Transitioner, BOUNCE_IN};

#[test]
fn transform_helpers_extract_translation_and_drop_scale() {
    assert_eq!(strip_scale("scale(0.5)"), "");
    assert_eq!(
        strip_scale("translate(1px,2px) scale(0.5) rotate(45deg)"),
        "translate(1px,2px) rotate(45deg)"
    );
    assert_eq!(
        matrix_to_translate("matrix(1, 0, 0, 1, 12, 34)"),
        "translate(12px,34px)"
    );
    // Non-numeric interiors are left alone.
    assert_eq!(strip_scale("scale(var(--s))"), "scale(var(--s))");
    assert_eq!(append_transform("", "scale(1)"), "scale(1)");
    assert_eq!(
        append_transform("translate(1px,2px)", "scale(1)"),
        "translate(1px,2px) scale(1)"
    );
}

#[test]
fn enter_before_first_tick_only_shows() {
    let (_runtime, handle) = test_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();
    element.hide();

    let animation = transitioner.enter(&element, "fade", 500.0, 0.0);

    assert_eq!(stub.style("display").as_deref(), Some(""));
    assert!(stub.last_player().is_none());
    assert_eq!(animation.completion().state(), DeferredState::Resolved);
}

#[test]
fn enter_pop_preserves_existing_translation() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    stub.seed_style("transform", "matrix(1, 0, 0, 1, 12, 34)");
    let element: ElementRef = stub.clone();

    transitioner.enter(&element, "pop", 500.0, 0.0);

    let player = stub.last_player().expect("pop started");
    assert_eq!(
        player.from.get("transform"),
        Some("translate(12px,34px) scale(0.5)")
    );
    assert_eq!(
        player.to.get("transform"),
        Some("translate(12px,34px) scale(1)")
    );
    assert_eq!(player.from.get("opacity"), Some("0"));
    assert_eq!(player.timing.easing, BOUNCE_IN);
}

#[test]
fn enter_draw_primes_dasharray_and_clears_it_after() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    stub.set_stroke_length(120.0);
    let element: ElementRef = stub.clone();

    transitioner.enter(&element, "draw", 400.0, 0.0);

    assert_eq!(stub.style("stroke-dasharray").as_deref(), Some("120px"));
    let player = stub.last_player().expect("draw started");
    assert_eq!(player.from.get("stroke-dashoffset"), Some("120px"));
    assert_eq!(player.to.get("stroke-dashoffset"), Some("0"));
    assert_eq!(player.timing.easing, "linear");

    player.finish();
    assert_eq!(stub.style("stroke-dasharray").as_deref(), Some(""));
}

#[test]
fn exit_removes_element_only_after_completion() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    transitioner.exit(&element, "fade", 200.0, 0.0, true);

    let player = stub.last_player().expect("fade started");
    assert!(element.is_connected());

    player.finish();
    assert!(!element.is_connected());
}

#[test]
fn exit_without_remove_hides_after_completion() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    transitioner.exit(&element, "slide-up", 200.0, 0.0, false);

    let player = stub.last_player().expect("slide started");
    assert_eq!(player.to.get("transform"), Some("translateY(-50px)"));

    player.finish();
    assert_eq!(stub.style("display").as_deref(), Some("none"));
}

#[test]
fn exit_on_hidden_element_resolves_without_animating() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();
    element.hide();

    let animation = transitioner.exit(&element, "fade", 200.0, 0.0, false);

    assert!(stub.last_player().is_none());
    assert_eq!(animation.completion().state(), DeferredState::Resolved);
}

#[test]
fn unknown_effect_degrades_to_resolved_noop() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    let animation = transitioner.enter(&element, "teleport", 500.0, 0.0);

    assert!(stub.last_player().is_none());
    assert_eq!(animation.completion().state(), DeferredState::Resolved);
}

#[test]
fn effect_applies_class_and_removes_on_animation_end() {
    let (_runtime, handle) = ready_runtime();
    let transitioner = Transitioner::new(handle);
    let stub = StubElement::new();
    let element: ElementRef = stub.clone();

    transitioner.effect(&element, "pulse-down");
    assert!(stub.has_class("effects-pulse-down"));

    stub.fire_animation_end();
    assert!(!stub.has_class("effects-pulse-down"));
}
