//! Easing functions keyed by CSS-like name strings.
//!
//! A kind is a base shape (`quad`, `elastic`, `bounce`, ...) with an optional
//! direction suffix: `-in`, `-out`, or none for the symmetric in-out form.
//! Unknown shapes degrade to the identity curve rather than failing — a
//! broken name should never break a visual sequence.

use std::f32::consts::PI;

const DEFAULT_BACK_OVERSHOOT: f32 = 1.70158;
const DEFAULT_ELASTIC_PERIOD: f32 = 0.3;

/// Four-piece bounce constant, 121/16.
const BOUNCE_COEFFICIENT: f32 = 7.5625;

fn ease_in(shape: &str, t: f32, s: f32) -> f32 {
    match shape {
        "quad" => t * t,
        "cubic" => t * t * t,
        "quart" => t * t * t * t,
        "quint" => t * t * t * t * t,
        "circ" => 1.0 - (1.0 - t * t).sqrt(),
        "sine" => 1.0 - (t * PI / 2.0).cos(),
        "exp" => {
            if t <= 0.0 {
                0.0
            } else {
                2.0_f32.powf(10.0 * (t - 1.0))
            }
        }

        "back" => {
            let s = if s == 0.0 { DEFAULT_BACK_OVERSHOOT } else { s };
            t * t * ((s + 1.0) * t - s)
        }

        "elastic" => {
            let s = if s == 0.0 { DEFAULT_ELASTIC_PERIOD } else { s };
            -(2.0_f32.powf(10.0 * (t - 1.0))) * (((t - 1.0) * 2.0 / s - 0.5) * PI).sin()
        }

        "swing" => 0.5 - (t * PI).cos() / 2.0,

        "spring" => 1.0 - (t * 4.5 * PI).cos() * (-t * 6.0).exp(),

        "bounce" => {
            if t < 1.0 / 11.0 {
                1.0 / 64.0 - BOUNCE_COEFFICIENT * (0.5 / 11.0 - t) * (0.5 / 11.0 - t)
            } else if t < 3.0 / 11.0 {
                1.0 / 16.0 - BOUNCE_COEFFICIENT * (2.0 / 11.0 - t) * (2.0 / 11.0 - t)
            } else if t < 7.0 / 11.0 {
                1.0 / 4.0 - BOUNCE_COEFFICIENT * (5.0 / 11.0 - t) * (5.0 / 11.0 - t)
            } else {
                1.0 - BOUNCE_COEFFICIENT * (1.0 - t) * (1.0 - t)
            }
        }

        _ => t,
    }
}

/// Applies the easing curve `kind` to a linear progress `t` in `[0, 1]`.
///
/// Endpoints are pinned before shape dispatch: `t <= 0` maps to exactly `0`
/// and `t >= 1` to exactly `1`, which keeps the exponential and elastic
/// shapes free of floating-point edge artifacts.
pub fn ease(kind: &str, t: f32) -> f32 {
    ease_with(kind, t, 0.0)
}

/// [`ease`] with an explicit overshoot parameter for the `back` and
/// `elastic` shapes. An overshoot of `0.0` selects the documented defaults
/// (1.70158 and 0.3 respectively).
pub fn ease_with(kind: &str, t: f32, overshoot: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let (shape, suffix) = match kind.split_once('-') {
        Some((shape, suffix)) => (shape, Some(suffix)),
        None => (kind, None),
    };

    match suffix {
        Some("in") => ease_in(shape, t, overshoot),
        Some("out") => 1.0 - ease_in(shape, 1.0 - t, overshoot),
        _ => {
            if t <= 0.5 {
                ease_in(shape, 2.0 * t, overshoot) / 2.0
            } else {
                1.0 - ease_in(shape, 2.0 * (1.0 - t), overshoot) / 2.0
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/ease_tests.rs"]
mod tests;
