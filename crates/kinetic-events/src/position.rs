//! Maps raw pointer/touch events to logical 2D coordinates.

use kinetic_dom::{Element, ElementRef, NativeEvent};
use kinetic_graphics::Point;

/// Viewport coordinate of an input event: the first active touch point when
/// present, else the direct pointer coordinate.
pub fn pointer_position(event: &NativeEvent) -> Point {
    event
        .touches()
        .first()
        .map(|touch| touch.client)
        .unwrap_or_else(|| event.client())
}

/// Pointer coordinate mapped into the local user space of `element` through
/// the inverse of its current screen transform.
///
/// Drag math for SVG content must run in the coordinate system the shape
/// geometry is authored in, not raw pixels. A non-invertible screen matrix
/// degrades to the untransformed viewport coordinate.
pub fn svg_pointer_position(event: &NativeEvent, element: &ElementRef) -> Point {
    let position = pointer_position(event);
    match element.screen_matrix().invert() {
        Some(inverse) => inverse.apply(position),
        None => {
            log::debug!("singular screen matrix; falling back to viewport coordinates");
            position
        }
    }
}

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod tests;
