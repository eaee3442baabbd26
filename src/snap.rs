//! Alignment guides and sticky snapping.
//!
//! DESIGN
//! ======
//! Detection and pinning are separate steps. [`detect_alignment`] is pure: it
//! compares a candidate box against its siblings and returns every guide in
//! range, nearest first. [`apply_snapping`] owns the stickiness: once an axis
//! snaps it stays pinned to that coordinate until the raw pointer position
//! pulls more than the escape threshold away, which stops the element from
//! flickering between the guide and the pointer. Axes are independent.
//!
//! Guide thresholds are measured on screen (what the user perceives) and
//! converted to device pixels with the gesture's scale factor. The escape
//! threshold is already in device pixels.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::bounds::ElementBox;
use crate::consts::{GUIDE_THRESHOLD_PX, SNAP_ESCAPE_THRESHOLD_PX};
use crate::coords::effective_scale;
use crate::element::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuideKind {
    CenterX,
    CenterY,
    EdgeLeft,
    EdgeRight,
    EdgeTop,
    EdgeBottom,
}

impl GuideKind {
    /// True for guides that constrain the x coordinate (vertical lines).
    #[must_use]
    pub fn is_horizontal_axis(self) -> bool {
        matches!(self, Self::CenterX | Self::EdgeLeft | Self::EdgeRight)
    }

    #[must_use]
    pub fn is_center(self) -> bool {
        matches!(self, Self::CenterX | Self::CenterY)
    }
}

/// A guide line the candidate is close enough to align with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentGuide {
    #[serde(rename = "type")]
    pub kind: GuideKind,
    /// Where the guide line is drawn, in device pixels.
    pub position: f64,
    /// Candidate center coordinate that realizes the alignment.
    pub snap_to: f64,
    pub source_id: ElementId,
}

/// Per-gesture stickiness. Reset when the gesture ends.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnappingState {
    pub last_snapped_x: Option<f64>,
    pub last_snapped_y: Option<f64>,
    /// Signed distance the raw position has pulled away from the pin.
    pub escape_velocity_x: f64,
    pub escape_velocity_y: f64,
}

impl SnappingState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.last_snapped_x.is_some() || self.last_snapped_y.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub is_snapped: bool,
}

/// Guides within the default screen threshold of `candidate`.
#[must_use]
pub fn detect_alignment(candidate: &ElementBox, siblings: &[ElementBox], scale_factor: f64) -> Vec<AlignmentGuide> {
    detect_alignment_within(candidate, siblings, scale_factor, GUIDE_THRESHOLD_PX)
}

/// Guides within `threshold_px` screen pixels of `candidate`, nearest first.
///
/// Center guides come before edge guides at equal distance. A sibling with
/// the candidate's own id is ignored.
#[must_use]
pub fn detect_alignment_within(
    candidate: &ElementBox,
    siblings: &[ElementBox],
    scale_factor: f64,
    threshold_px: f64,
) -> Vec<AlignmentGuide> {
    let threshold = threshold_px / effective_scale(scale_factor);
    let half_w = candidate.width / 2.0;
    let half_h = candidate.height / 2.0;

    let mut found: Vec<(f64, AlignmentGuide)> = Vec::new();
    for sibling in siblings.iter().filter(|s| s.id != candidate.id) {
        let checks = [
            (GuideKind::CenterX, candidate.center.x, sibling.center.x, sibling.center.x),
            (GuideKind::CenterY, candidate.center.y, sibling.center.y, sibling.center.y),
            (GuideKind::EdgeLeft, candidate.left(), sibling.left(), sibling.left() + half_w),
            (GuideKind::EdgeRight, candidate.right(), sibling.right(), sibling.right() - half_w),
            (GuideKind::EdgeTop, candidate.top(), sibling.top(), sibling.top() + half_h),
            (GuideKind::EdgeBottom, candidate.bottom(), sibling.bottom(), sibling.bottom() - half_h),
        ];
        for (kind, ours, theirs, snap_to) in checks {
            let distance = (ours - theirs).abs();
            if distance <= threshold {
                found.push((distance, AlignmentGuide { kind, position: theirs, snap_to, source_id: sibling.id.clone() }));
            }
        }
    }

    found.sort_by(|(da, ga), (db, gb)| da.total_cmp(db).then_with(|| gb.kind.is_center().cmp(&ga.kind.is_center())));
    found.into_iter().map(|(_, guide)| guide).collect()
}

/// Resolve the candidate center `(x, y)` against `guides` and the sticky state.
#[must_use]
pub fn apply_snapping(x: f64, y: f64, guides: &[AlignmentGuide], state: &mut SnappingState) -> SnapResult {
    apply_snapping_with(x, y, guides, state, SNAP_ESCAPE_THRESHOLD_PX)
}

/// [`apply_snapping`] with an explicit escape threshold in device pixels.
#[must_use]
pub fn apply_snapping_with(
    x: f64,
    y: f64,
    guides: &[AlignmentGuide],
    state: &mut SnappingState,
    escape_threshold: f64,
) -> SnapResult {
    let nearest_x = guides.iter().find(|g| g.kind.is_horizontal_axis()).map(|g| g.snap_to);
    let nearest_y = guides.iter().find(|g| !g.kind.is_horizontal_axis()).map(|g| g.snap_to);

    let (sx, pinned_x) =
        snap_axis(x, nearest_x, &mut state.last_snapped_x, &mut state.escape_velocity_x, escape_threshold);
    let (sy, pinned_y) =
        snap_axis(y, nearest_y, &mut state.last_snapped_y, &mut state.escape_velocity_y, escape_threshold);

    SnapResult { x: sx, y: sy, is_snapped: pinned_x || pinned_y }
}

fn snap_axis(
    raw: f64,
    nearest: Option<f64>,
    pin: &mut Option<f64>,
    escape_velocity: &mut f64,
    escape_threshold: f64,
) -> (f64, bool) {
    if let Some(pinned) = *pin {
        let pull = raw - pinned;
        if pull.abs() <= escape_threshold {
            *escape_velocity = pull;
            return (pinned, true);
        }
        tracing::trace!(pinned, raw, "snap released");
        *pin = None;
        *escape_velocity = 0.0;
    }

    match nearest {
        Some(target) => {
            *pin = Some(target);
            *escape_velocity = raw - target;
            (target, true)
        }
        None => (raw, false),
    }
}
