//! Boundary policy applied to every committed position.
//!
//! The circular display mask clips overflow visually, so the default policy
//! only rounds to the integer device grid. Every operation routes its final
//! coordinates through [`BoundaryPolicy::apply`]; new position constraints
//! belong here rather than in the individual operations.

#[cfg(test)]
#[path = "boundary_test.rs"]
mod boundary_test;

use serde::{Deserialize, Serialize};

use crate::coords::Point;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Round only.
    #[default]
    Unconstrained,
    /// Keep the center inside the device's circular display, then round.
    ClampToDisplay { center_x: f64, center_y: f64, radius: f64 },
}

impl BoundaryPolicy {
    /// Clamp-to-display policy for a `width × height` device.
    #[must_use]
    pub fn clamp_to_display(width: f64, height: f64) -> Self {
        Self::ClampToDisplay { center_x: width / 2.0, center_y: height / 2.0, radius: width.min(height) / 2.0 }
    }

    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        let constrained = match *self {
            Self::Unconstrained => p,
            Self::ClampToDisplay { center_x, center_y, radius } => clamp_to_circle(p, center_x, center_y, radius),
        };
        Point::new(constrained.x.round(), constrained.y.round())
    }
}

fn clamp_to_circle(p: Point, cx: f64, cy: f64, radius: f64) -> Point {
    let dx = p.x - cx;
    let dy = p.y - cy;
    let dist = dx.hypot(dy);
    if dist <= radius || dist == 0.0 {
        return p;
    }
    let r = radius.max(0.0);
    Point::new(cx + dx / dist * r, cy + dy / dist * r)
}
