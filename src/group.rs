//! Multi-element group transforms.
//!
//! DESIGN
//! ======
//! When the dragged element is part of a 2+ selection, the gesture captures a
//! [`GroupSnapshot`] once at pointer-down: every member's starting state, the
//! axis-aligned union of their boxes, and each member's center offset from
//! the group center. Every frame derives member positions from that snapshot
//! (center + fixed offset), never from the previous frame, so the group moves
//! and turns as a rigid body with no accumulated drift.

#[cfg(test)]
#[path = "group_test.rs"]
mod group_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryPolicy;
use crate::bounds::{ElementBox, element_box};
use crate::coords::Point;
use crate::element::{Element, ElementId, normalize_angle};
use crate::error::{EditorError, EditorResult};
use crate::matrix::rotate_vector;

/// A member's center relative to the group center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBoundingBox {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub relative_offsets: HashMap<ElementId, Offset>,
}

impl GroupBoundingBox {
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }
}

/// Union box over `boxes` plus each member's offset from its center.
///
/// `None` for an empty slice or non-finite geometry.
#[must_use]
pub fn compute_group_bounding_box(boxes: &[ElementBox]) -> Option<GroupBoundingBox> {
    if boxes.is_empty() {
        return None;
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for b in boxes {
        min_x = min_x.min(b.left());
        min_y = min_y.min(b.top());
        max_x = max_x.max(b.right());
        max_y = max_y.max(b.bottom());
    }
    if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
        tracing::warn!(members = boxes.len(), "non-finite member geometry; no group box");
        return None;
    }

    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;
    let relative_offsets = boxes
        .iter()
        .map(|b| (b.id.clone(), Offset { dx: b.center.x - center_x, dy: b.center.y - center_y }))
        .collect();

    Some(GroupBoundingBox { center_x, center_y, width: max_x - min_x, height: max_y - min_y, relative_offsets })
}

/// Gesture-start capture of a group.
#[derive(Debug, Clone)]
pub struct GroupSnapshot {
    bbox: GroupBoundingBox,
    /// Member states at gesture start, primary first.
    members: Vec<Element>,
}

impl GroupSnapshot {
    /// Capture `members` (which must include `primary_id`) for a group gesture.
    ///
    /// # Errors
    ///
    /// `MissingElement` when the primary is not among the members,
    /// `DegenerateGeometry` for fewer than two members or an unusable box.
    pub fn capture(primary_id: &str, members: &[Element]) -> EditorResult<Self> {
        if members.len() < 2 {
            return Err(EditorError::DegenerateGeometry("group needs at least two members"));
        }
        let Some(primary_idx) = members.iter().position(|m| m.id == primary_id) else {
            return Err(EditorError::MissingElement(primary_id.to_string()));
        };

        let boxes: Vec<ElementBox> = members.iter().map(element_box).collect();
        let bbox = compute_group_bounding_box(&boxes).ok_or(EditorError::DegenerateGeometry("group bounding box"))?;

        let mut ordered = members.to_vec();
        ordered.swap(0, primary_idx);
        Ok(Self { bbox, members: ordered })
    }

    #[must_use]
    pub fn bounding_box(&self) -> &GroupBoundingBox {
        &self.bbox
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.bbox.center()
    }

    /// Starting state of the dragged element.
    #[must_use]
    pub fn primary(&self) -> &Element {
        &self.members[0]
    }

    #[must_use]
    pub fn members(&self) -> &[Element] {
        &self.members
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &ElementId> {
        self.members.iter().map(|m| &m.id)
    }

    fn offset_of(&self, id: &str) -> Offset {
        self.bbox.relative_offsets.get(id).copied().unwrap_or(Offset { dx: 0.0, dy: 0.0 })
    }

    /// Members after translating the group center by `device_delta`.
    #[must_use]
    pub fn translated(&self, device_delta: Point, boundary: &BoundaryPolicy) -> Vec<Element> {
        let center = self.center() + device_delta;
        self.members
            .iter()
            .map(|m| {
                let off = self.offset_of(&m.id);
                let p = boundary.apply(Point::new(center.x + off.dx, center.y + off.dy));
                let mut moved = m.clone();
                moved.x = p.x;
                moved.y = p.y;
                moved
            })
            .collect()
    }

    /// Members after turning the whole group by `delta_deg` about its center.
    ///
    /// Each member's own angle advances by the same delta.
    #[must_use]
    pub fn rotated(&self, delta_deg: f64, boundary: &BoundaryPolicy) -> Vec<Element> {
        let center = self.center();
        self.members
            .iter()
            .map(|m| {
                let off = self.offset_of(&m.id);
                let turned = rotate_vector(off.dx, off.dy, delta_deg);
                let p = boundary.apply(center + turned);
                let mut rotated = m.clone();
                rotated.x = p.x;
                rotated.y = p.y;
                rotated.set_angle(normalize_angle((m.angle + delta_deg).round()));
                rotated
            })
            .collect()
    }
}
