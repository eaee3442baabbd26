//! Resize operation.
//!
//! Handles are defined on the element's own axes, so the pointer delta is
//! rotated by `-angle` before the handle reads it. Resizing is center-origin
//! and aspect locked: the element's position never changes and a single
//! scalar (the payload's font size) absorbs the drag.

#[cfg(test)]
#[path = "resize_test.rs"]
mod resize_test;

use serde::{Deserialize, Serialize};

use crate::consts::RESIZE_SPEED;
use crate::coords::{Point, Viewport};
use crate::element::Element;
use crate::matrix::rotate_vector;

/// One of the eight resize handles around an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// Unit-step direction pointing away from the element center, in local axes.
    #[must_use]
    pub fn outward(self) -> (f64, f64) {
        match self {
            Self::N => (0.0, -1.0),
            Self::Ne => (1.0, -1.0),
            Self::E => (1.0, 0.0),
            Self::Se => (1.0, 1.0),
            Self::S => (0.0, 1.0),
            Self::Sw => (-1.0, 1.0),
            Self::W => (-1.0, 0.0),
            Self::Nw => (-1.0, -1.0),
        }
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResizeConfig {
    pub viewport: Viewport,
    pub handle: ResizeHandle,
    /// Size captured at gesture start. Falls back to the element's current size.
    pub initial_size: Option<f64>,
    pub speed: f64,
}

impl ResizeConfig {
    #[must_use]
    pub fn new(viewport: Viewport, handle: ResizeHandle) -> Self {
        Self { viewport, handle, initial_size: None, speed: RESIZE_SPEED }
    }

    #[must_use]
    pub fn with_initial_size(mut self, size: f64) -> Self {
        self.initial_size = Some(size);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ResizeOutcome {
    pub element: Element,
    /// New payload size, `None` for kinds that do not resize.
    pub size: Option<f64>,
    /// Pointer delta in the element's local frame.
    pub local_delta: Point,
    /// Aspect-locked growth per axis before the speed factor; both axes are equal.
    pub axis_delta: Point,
}

/// Resize `element` by the screen-space pointer delta accumulated since the
/// gesture started.
///
/// Divider, clock and date elements pass through unchanged.
#[must_use]
pub fn resize_element(element: &Element, pointer_delta: Point, config: &ResizeConfig) -> ResizeOutcome {
    let device_delta = config.viewport.screen_delta_to_device(pointer_delta);
    let local_delta = to_local_frame(device_delta, element.angle);

    let (Some(current), Some((min, max))) = (element.data.resizable_size(), element.data.size_bounds()) else {
        return ResizeOutcome {
            element: element.clone(),
            size: None,
            local_delta,
            axis_delta: Point::default(),
        };
    };

    let directional = directional_delta(local_delta, config.handle);
    let locked = aspect_locked(directional);
    let initial = config.initial_size.unwrap_or(current);
    let size = (initial + locked * config.speed).clamp(min, max).round();

    let mut resized = element.clone();
    resized.data.set_resizable_size(size);
    ResizeOutcome { element: resized, size: Some(size), local_delta, axis_delta: Point::new(locked, locked) }
}

/// Express a device-space delta in the frame of an element rotated by `angle_deg`.
#[must_use]
pub fn to_local_frame(device_delta: Point, angle_deg: f64) -> Point {
    if angle_deg == 0.0 {
        return device_delta;
    }
    rotate_vector(device_delta.x, device_delta.y, -angle_deg)
}

/// Per-axis growth implied by dragging `handle` by `local`.
///
/// Corners use the diagonal length, positive when the drag moves away from
/// the center along the handle's diagonal and zero for a drag square to it.
/// Edges use the single component along their normal; the other axis reads
/// zero.
#[must_use]
pub fn directional_delta(local: Point, handle: ResizeHandle) -> Point {
    let (ox, oy) = handle.outward();
    if handle.is_corner() {
        let along = local.x * ox + local.y * oy;
        let diagonal = local.length();
        let signed = if along > 0.0 {
            diagonal
        } else if along < 0.0 {
            -diagonal
        } else {
            0.0
        };
        Point::new(signed, signed)
    } else {
        Point::new(local.x * ox, local.y * oy)
    }
}

/// The axis delta with the larger magnitude, which drives both axes.
#[must_use]
pub fn aspect_locked(directional: Point) -> f64 {
    if directional.x.abs() >= directional.y.abs() { directional.x } else { directional.y }
}
