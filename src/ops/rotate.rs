//! Rotate operation.
//!
//! Rotation pivots on the element's own center in device space; the pivot
//! never moves. Bearings are measured clockwise from straight up. The angle
//! offset between the pointer's start bearing and the element's start angle
//! is fixed for the whole gesture, so grabbing the handle never makes the
//! element jump.

#[cfg(test)]
#[path = "rotate_test.rs"]
mod rotate_test;

use crate::consts::{ROTATION_SMOOTHING_DEG, ROTATION_SNAP_STEP_DEG, ROTATION_SNAP_THRESHOLD_DEG};
use crate::coords::{Point, Viewport};
use crate::element::{Element, angular_distance, normalize_angle};

#[derive(Debug, Clone, Copy)]
pub struct RotateConfig {
    pub viewport: Viewport,
    /// Screen position of the pointer at gesture start.
    pub start_pointer: Point,
    /// Element angle at gesture start.
    pub start_angle: f64,
    /// Angle most recently applied during this gesture, if any.
    pub last_applied: Option<f64>,
    pub snap_enabled: bool,
    pub snap_threshold_deg: f64,
    pub smoothing_deg: f64,
}

impl RotateConfig {
    #[must_use]
    pub fn new(viewport: Viewport, start_pointer: Point, start_angle: f64) -> Self {
        Self {
            viewport,
            start_pointer,
            start_angle,
            last_applied: None,
            snap_enabled: true,
            snap_threshold_deg: ROTATION_SNAP_THRESHOLD_DEG,
            smoothing_deg: ROTATION_SMOOTHING_DEG,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RotateOutcome {
    pub element: Element,
    /// The angle the element now carries.
    pub angle: f64,
    /// False when the update was suppressed (jitter or degenerate bearing).
    pub applied: bool,
}

/// Rotate `element` for a pointer that has moved `pointer_delta` screen
/// pixels since the gesture started.
#[must_use]
pub fn rotate_element(element: &Element, pointer_delta: Point, config: &RotateConfig) -> RotateOutcome {
    let pivot = Point::new(element.x, element.y);
    let start = config.viewport.screen_to_device(config.start_pointer);
    let current = config.viewport.screen_to_device(config.start_pointer + pointer_delta);

    let held_angle = config.last_applied.unwrap_or(config.start_angle);
    let (Some(start_bearing), Some(current_bearing)) = (bearing(pivot, start), bearing(pivot, current)) else {
        tracing::debug!(element_id = %element.id, "pointer on rotation pivot; holding angle");
        return hold(element, held_angle);
    };

    let offset = start_bearing - config.start_angle;
    let raw = normalize_angle(current_bearing - offset);
    let snapped = if config.snap_enabled {
        soft_snap(raw, ROTATION_SNAP_STEP_DEG, config.snap_threshold_deg)
    } else {
        raw
    };

    if let Some(last) = config.last_applied {
        if angular_distance(snapped, last) < config.smoothing_deg {
            return hold(element, last);
        }
    }

    let angle = normalize_angle(snapped.round());
    let mut rotated = element.clone();
    rotated.set_angle(angle);
    RotateOutcome { element: rotated, angle, applied: true }
}

fn hold(element: &Element, angle: f64) -> RotateOutcome {
    let mut held = element.clone();
    held.set_angle(angle);
    RotateOutcome { angle: held.angle, element: held, applied: false }
}

/// Bearing from `pivot` to `p`: 0° is up, clockwise positive, `[0, 360)`.
///
/// `None` when the two points coincide.
#[must_use]
pub fn bearing(pivot: Point, p: Point) -> Option<f64> {
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    if dx.hypot(dy) < 1e-9 {
        return None;
    }
    Some(normalize_angle(dx.atan2(-dy).to_degrees()))
}

/// Pull `angle` onto the nearest multiple of `step` when within `threshold`.
#[must_use]
pub fn soft_snap(angle: f64, step: f64, threshold: f64) -> f64 {
    if step <= 0.0 {
        return angle;
    }
    let nearest = (angle / step).round() * step;
    if angular_distance(angle, nearest) <= threshold {
        normalize_angle(nearest)
    } else {
        angle
    }
}
