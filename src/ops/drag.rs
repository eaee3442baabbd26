//! Move operation.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::boundary::BoundaryPolicy;
use crate::coords::{Point, Viewport};
use crate::element::Element;

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveConfig {
    pub viewport: Viewport,
    pub boundary: BoundaryPolicy,
}

#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub element: Element,
    /// The pointer delta after conversion to device pixels.
    pub device_delta: Point,
}

/// Translate `element` by a screen-space pointer delta.
///
/// The delta is applied along the device axes regardless of the element's
/// rotation, and the result lands on the integer device grid. Safe for every
/// element kind.
#[must_use]
pub fn move_element(element: &Element, pointer_delta: Point, config: &MoveConfig) -> MoveOutcome {
    let device_delta = config.viewport.screen_delta_to_device(pointer_delta);
    let target = config
        .boundary
        .apply(Point::new(element.x + device_delta.x, element.y + device_delta.y));

    let mut moved = element.clone();
    moved.x = target.x;
    moved.y = target.y;
    MoveOutcome { element: moved, device_delta }
}
