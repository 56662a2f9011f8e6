use super::*;

const SHAPES: &[&str] = &[
    "quad", "cubic", "quart", "quint", "circ", "sine", "exp", "back", "elastic", "swing",
    "spring", "bounce",
];

#[test]
fn endpoints_are_exact_for_every_kind_and_overshoot() {
    for shape in SHAPES {
        for suffix in ["", "-in", "-out"] {
            let kind = format!("{shape}{suffix}");
            for s in [0.0, 0.5, 1.70158, 3.0] {
                assert_eq!(ease_with(&kind, 0.0, s), 0.0, "{kind} at t=0, s={s}");
                assert_eq!(ease_with(&kind, 1.0, s), 1.0, "{kind} at t=1, s={s}");
            }
        }
    }
}

#[test]
fn out_is_exact_complement_of_in() {
    for shape in SHAPES {
        let kind_in = format!("{shape}-in");
        let kind_out = format!("{shape}-out");
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            let out = ease(&kind_out, t);
            let complement = 1.0 - ease(&kind_in, 1.0 - t);
            assert!(
                (out - complement).abs() < 1e-6,
                "{shape}: out({t}) = {out}, 1 - in(1-t) = {complement}"
            );
        }
    }
}

#[test]
fn symmetric_halves_meet_at_midpoint() {
    for shape in SHAPES {
        let below = ease(shape, 0.5 - 1e-4);
        let at = ease(shape, 0.5);
        let above = ease(shape, 0.5 + 1e-4);
        assert!(
            (below - at).abs() < 1e-2 && (above - at).abs() < 1e-2,
            "{shape} discontinuous at 0.5: {below} {at} {above}"
        );
    }
}

#[test]
fn bounce_in_is_continuous_at_breakpoints() {
    for breakpoint in [1.0 / 11.0, 3.0 / 11.0, 7.0 / 11.0] {
        let epsilon = 1e-4;
        let left = ease("bounce-in", breakpoint - epsilon);
        let right = ease("bounce-in", breakpoint + epsilon);
        assert!(
            (left - right).abs() < 1e-2,
            "bounce-in jumps at {breakpoint}: {left} vs {right}"
        );
    }
}

#[test]
fn bounce_matches_piecewise_formula() {
    let t = 0.5; // falls in the third piece for the -in direction
    let expected = 0.25 - 7.5625 * (5.0 / 11.0 - t) * (5.0 / 11.0 - t);
    assert!((ease("bounce-in", t) - expected).abs() < 1e-6);
}

#[test]
fn quad_in_matches_square() {
    assert!((ease("quad-in", 0.5) - 0.25).abs() < 1e-6);
    assert!((ease("quad-in", 0.25) - 0.0625).abs() < 1e-6);
}

#[test]
fn back_overshoot_dips_negative_near_start() {
    assert!(ease("back-in", 0.3) < 0.0);
    // Larger overshoot dips deeper.
    assert!(ease_with("back-in", 0.3, 3.0) < ease("back-in", 0.3));
}

#[test]
fn unknown_shape_is_identity() {
    for i in 0..=10 {
        let t = i as f32 / 10.0;
        assert_eq!(ease("warp", t), t);
        assert_eq!(ease("warp-in", t), t);
    }
}

#[test]
fn swing_midpoint_is_half() {
    assert!((ease("swing-in", 0.5) - 0.5).abs() < 1e-6);
}
