//! Screen ↔ device coordinate conversion.
//!
//! Pointer events arrive in screen pixels. The preview renders the device's
//! canonical pixel grid scaled by `scale_factor` inside a reference rectangle
//! (the preview container's bounding box). All operation math happens in
//! device pixels; screen-space deltas never touch element state directly.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::{Deserialize, Serialize};

/// A point in screen, device, or element-local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Screen-space bounding box of the preview container.
///
/// Re-queried by the host at every gesture start; the container may reflow
/// between gestures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ReferenceRect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// Screen-to-device conversion parameters for one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub reference_rect: ReferenceRect,
    /// Screen pixels per device pixel.
    pub scale_factor: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { reference_rect: ReferenceRect::default(), scale_factor: 1.0 }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(reference_rect: ReferenceRect, scale_factor: f64) -> Self {
        Self { reference_rect, scale_factor }
    }

    #[must_use]
    pub fn screen_to_device(&self, screen: Point) -> Point {
        screen_to_device(screen, &self.reference_rect, self.scale_factor)
    }

    #[must_use]
    pub fn device_to_screen(&self, device: Point) -> Point {
        device_to_screen(device, &self.reference_rect, self.scale_factor)
    }

    #[must_use]
    pub fn screen_delta_to_device(&self, delta: Point) -> Point {
        screen_delta_to_device(delta, self.scale_factor)
    }

    /// Convert a screen-space distance to device pixels.
    #[must_use]
    pub fn screen_dist_to_device(&self, dist: f64) -> f64 {
        dist / effective_scale(self.scale_factor)
    }
}

/// Usable scale factor; degenerate inputs fall back to 1.
#[must_use]
pub fn effective_scale(scale_factor: f64) -> f64 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        tracing::warn!(scale_factor, "degenerate scale factor; using 1.0");
        1.0
    }
}

/// Map a screen-pixel position into canonical device pixels.
#[must_use]
pub fn screen_to_device(screen: Point, rect: &ReferenceRect, scale_factor: f64) -> Point {
    let s = effective_scale(scale_factor);
    Point::new((screen.x - rect.left) / s, (screen.y - rect.top) / s)
}

/// Map a device-pixel position back to screen pixels.
#[must_use]
pub fn device_to_screen(device: Point, rect: &ReferenceRect, scale_factor: f64) -> Point {
    let s = effective_scale(scale_factor);
    Point::new(device.x * s + rect.left, device.y * s + rect.top)
}

/// Convert a pointer delta; deltas carry no origin.
#[must_use]
pub fn screen_delta_to_device(delta: Point, scale_factor: f64) -> Point {
    let s = effective_scale(scale_factor);
    Point::new(delta.x / s, delta.y / s)
}
