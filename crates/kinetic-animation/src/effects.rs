//! Named enter/exit presets over [`Transitioner::transition`] and the
//! fire-and-forget CSS keyframe effect decorator.

use kinetic_dom::{Element, ElementRef};

use crate::animate::AnimationHandle;
use crate::transition::{TransitionSpec, Transitioner};

impl Transitioner {
    /// Reveals an element with a named effect. Unknown names degrade to a
    /// plain show.
    pub fn enter(
        &self,
        element: &ElementRef,
        effect: &str,
        duration_millis: f64,
        delay_millis: f64,
    ) -> AnimationHandle {
        element.show();
        if !self.runtime().is_ready() {
            return AnimationHandle::resolved();
        }

        if effect == "fade" {
            self.transition(
                element,
                TransitionSpec::new().from_to("opacity", "0", "1"),
                duration_millis,
                delay_millis,
                "ease-in-out",
            )
        } else if effect == "pop" {
            // Respect any existing transform except scale; a matrix() form is
            // collapsed to its translation component first.
            let base = matrix_to_translate(&strip_scale(&base_transform(element)));
            let spec = TransitionSpec::new()
                .from_to("opacity", "0", "1")
                .from_to(
                    "transform",
                    append_transform(&base, "scale(0.5)"),
                    append_transform(&base, "scale(1)"),
                );
            self.transition(element, spec, duration_millis, delay_millis, "bounce-in")
        } else if effect == "descend" {
            let spec = TransitionSpec::new()
                .from_to("opacity", "0", "1")
                .from_to("transform", "translateY(-50%)", "none");
            self.transition(element, spec, duration_millis, delay_millis, "ease-in-out")
        } else if effect.starts_with("draw") {
            let length = format!("{}px", element.stroke_length());
            element.set_css("opacity", "1");
            element.set_css("stroke-dasharray", &length);
            let start = if effect == "draw-reverse" {
                format!("-{length}")
            } else {
                length.clone()
            };
            let spec = TransitionSpec::new().from_to("stroke-dashoffset", start, "0");
            let handle = self.transition(element, spec, duration_millis, delay_millis, "linear");
            let el = std::rc::Rc::clone(element);
            handle.then(move || el.set_css("stroke-dasharray", ""));
            handle
        } else if effect.starts_with("slide") {
            let from = if effect.contains("down") {
                "translateY(-50px)"
            } else {
                "translateY(50px)"
            };
            let spec = TransitionSpec::new()
                .from_to("opacity", "0", "1")
                .from_to("transform", from, "none");
            self.transition(element, spec, duration_millis, delay_millis, "ease-in-out")
        } else if effect.starts_with("reveal") {
            let mut spec = TransitionSpec::new()
                .from_to("opacity", "0", "1")
                .from_to("height", "0", "auto");
            if effect.contains("left") {
                spec = spec.from_to("transform", "translateX(-50%)", "none");
            } else if effect.contains("right") {
                spec = spec.from_to("transform", "translateX(50%)", "none");
            }
            self.transition(element, spec, duration_millis, delay_millis, "ease-in-out")
        } else {
            log::warn!("unknown enter effect `{effect}`");
            AnimationHandle::resolved()
        }
    }

    /// Conceals an element with a named effect, then hides it — or removes
    /// it from the document when `remove` is set. The element stays in place
    /// until the animation's completion signal fires, so concealed content
    /// never flashes out mid-animation.
    pub fn exit(
        &self,
        element: &ElementRef,
        effect: &str,
        duration_millis: f64,
        delay_millis: f64,
        remove: bool,
    ) -> AnimationHandle {
        if !element.is_connected() {
            return AnimationHandle::resolved();
        }
        if !self.runtime().is_ready() {
            element.hide();
            return AnimationHandle::resolved();
        }
        if element.css("display") == "none" {
            return AnimationHandle::resolved();
        }

        let handle = if effect == "fade" {
            self.transition(
                element,
                TransitionSpec::new().from_to("opacity", "1", "0"),
                duration_millis,
                delay_millis,
                "ease-in-out",
            )
        } else if effect == "pop" {
            let base = strip_scale(&base_transform(element));
            let spec = TransitionSpec::new()
                .from_to("opacity", "1", "0")
                .from_to(
                    "transform",
                    append_transform(&base, "scale(1)"),
                    append_transform(&base, "scale(0.5)"),
                );
            self.transition(element, spec, duration_millis, delay_millis, "bounce-out")
        } else if effect == "ascend" {
            let spec = TransitionSpec::new()
                .from_to("opacity", "1", "0")
                .from_to("transform", "none", "translateY(-50%)");
            self.transition(element, spec, duration_millis, delay_millis, "ease-in-out")
        } else if effect.starts_with("draw") {
            let length = format!("{}px", element.stroke_length());
            element.set_css("stroke-dasharray", &length);
            let end = if effect == "draw-reverse" {
                format!("-{length}")
            } else {
                length.clone()
            };
            let spec = TransitionSpec::new().from_to("stroke-dashoffset", "0", end);
            self.transition(element, spec, duration_millis, delay_millis, "linear")
        } else if effect.starts_with("slide") {
            let to = if effect.contains("up") {
                "translateY(-50px)"
            } else {
                "translateY(50px)"
            };
            let spec = TransitionSpec::new().to("opacity", "0").to("transform", to);
            self.transition(element, spec, duration_millis, delay_millis, "ease-in-out")
        } else if effect.starts_with("reveal") {
            let mut spec = TransitionSpec::new().to("opacity", "0").to("height", "0");
            if effect.contains("left") {
                spec = spec.to("transform", "translateX(-50%)");
            } else if effect.contains("right") {
                spec = spec.to("transform", "translateX(50%)");
            }
            self.transition(element, spec, duration_millis, delay_millis, "ease-in-out")
        } else {
            log::warn!("unknown exit effect `{effect}`");
            AnimationHandle::resolved()
        };

        let el = std::rc::Rc::clone(element);
        handle.then(move || {
            if remove {
                el.remove();
            } else {
                el.hide();
            }
        });
        handle
    }

    /// Applies the CSS keyframe effect class `effects-{name}` and removes it
    /// again on the host's "animation finished" signal. Fire-and-forget; no
    /// handle is tracked.
    pub fn effect(&self, element: &ElementRef, name: &str) {
        let class = format!("effects-{name}");
        let el = std::rc::Rc::clone(element);
        let class_to_remove = class.clone();
        element.animation_end(Box::new(move || el.remove_class(&class_to_remove)));
        element.add_class(&class);
    }
}

fn base_transform(element: &ElementRef) -> String {
    let transform = element.transform_string();
    if transform == "none" {
        String::new()
    } else {
        transform
    }
}

fn append_transform(base: &str, extra: &str) -> String {
    if base.is_empty() {
        extra.to_string()
    } else {
        format!("{base} {extra}")
    }
}

/// Removes the first `scale(...)` component from a transform string.
fn strip_scale(transform: &str) -> String {
    if let Some(start) = transform.find("scale(") {
        if let Some(close) = transform[start..].find(')') {
            let interior = &transform[start + "scale(".len()..start + close];
            if interior.chars().all(|c| c.is_ascii_digit() || c == '.') {
                let before = transform[..start].trim();
                let after = transform[start + close + 1..].trim();
                return [before, after]
                    .iter()
                    .filter(|part| !part.is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ");
            }
        }
    }
    transform.to_string()
}

/// Collapses a `matrix(a, b, c, d, tx, ty)` component into
/// `translate(txpx, typx)`, dropping the linear part.
fn matrix_to_translate(transform: &str) -> String {
    let Some(start) = transform.find("matrix(") else {
        return transform.to_string();
    };
    let Some(close) = transform[start..].find(')') else {
        return transform.to_string();
    };
    let interior = &transform[start + "matrix(".len()..start + close];
    let parts: Vec<&str> = interior.split(',').map(str::trim).collect();
    if parts.len() != 6
        || parts.iter().any(|p| {
            p.is_empty() || !p.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
        })
    {
        return transform.to_string();
    }
    let replacement = format!("translate({}px,{}px)", parts[4], parts[5]);
    let mut result = String::new();
    result.push_str(&transform[..start]);
    result.push_str(&replacement);
    result.push_str(&transform[start + close + 1..]);
    result.trim().to_string()
}

#[cfg(test)]
#[path = "tests/effects_tests.rs"]
mod tests;
