#![allow(clippy::float_cmp)]

use super::*;
use crate::coords::Point;

fn boxed(id: &str, cx: f64, cy: f64, w: f64, h: f64) -> ElementBox {
    ElementBox { id: id.into(), center: Point::new(cx, cy), width: w, height: h }
}

fn guide(kind: GuideKind, at: f64) -> AlignmentGuide {
    AlignmentGuide { kind, position: at, snap_to: at, source_id: "s".into() }
}

// =============================================================
// detect_alignment
// =============================================================

#[test]
fn center_x_within_threshold() {
    let guides = detect_alignment(&boxed("c", 203.0, 400.0, 10.0, 10.0), &[boxed("s", 200.0, 100.0, 10.0, 10.0)], 1.0);
    assert_eq!(guides[0].kind, GuideKind::CenterX);
    assert_eq!(guides[0].position, 200.0);
    assert_eq!(guides[0].snap_to, 200.0);
    assert_eq!(guides[0].source_id, "s");
}

#[test]
fn nothing_beyond_threshold() {
    let guides = detect_alignment(&boxed("c", 206.0, 400.0, 10.0, 10.0), &[boxed("s", 200.0, 100.0, 10.0, 10.0)], 1.0);
    assert!(guides.is_empty());
}

#[test]
fn threshold_is_measured_on_screen() {
    // 3 device px is 6 screen px at scale 2: out of range.
    let candidate = boxed("c", 203.0, 400.0, 10.0, 10.0);
    let siblings = [boxed("s", 200.0, 100.0, 10.0, 10.0)];
    assert!(detect_alignment(&candidate, &siblings, 2.0).is_empty());
    // At scale 0.5 the same 5 screen px cover 10 device px.
    let far = boxed("c", 208.0, 400.0, 10.0, 10.0);
    assert!(!detect_alignment(&far, &siblings, 0.5).is_empty());
}

#[test]
fn results_are_nearest_first() {
    let candidate = boxed("c", 100.0, 100.0, 10.0, 10.0);
    let siblings = [boxed("far", 104.0, 500.0, 50.0, 50.0), boxed("near", 400.0, 101.0, 50.0, 50.0)];
    let guides = detect_alignment(&candidate, &siblings, 1.0);
    assert_eq!(guides[0].source_id, "near");
    assert_eq!(guides[0].kind, GuideKind::CenterY);
    assert_eq!(guides[1].source_id, "far");
}

#[test]
fn center_wins_tie_with_edge() {
    // Same width: left edges and centers align at the same distance.
    let guides = detect_alignment(&boxed("c", 102.0, 500.0, 20.0, 10.0), &[boxed("s", 100.0, 100.0, 20.0, 30.0)], 1.0);
    assert_eq!(guides[0].kind, GuideKind::CenterX);
    assert!(guides.iter().any(|g| g.kind == GuideKind::EdgeLeft));
}

#[test]
fn edge_guide_snaps_center_to_aligned_edge() {
    // Sibling left edge at 50; candidate is 40 wide so its center goes to 70.
    let guides = detect_alignment(&boxed("c", 72.0, 400.0, 40.0, 10.0), &[boxed("s", 100.0, 100.0, 100.0, 10.0)], 1.0);
    let left = guides.iter().find(|g| g.kind == GuideKind::EdgeLeft);
    assert!(left.is_some_and(|g| g.position == 50.0 && g.snap_to == 70.0));
}

#[test]
fn self_is_not_a_sibling() {
    let c = boxed("c", 100.0, 100.0, 10.0, 10.0);
    assert!(detect_alignment(&c, std::slice::from_ref(&c), 1.0).is_empty());
}

#[test]
fn guide_serializes_type_tag() {
    let json = serde_json::to_value(guide(GuideKind::EdgeLeft, 3.0)).unwrap();
    assert_eq!(json["type"], "edge-left");
    assert_eq!(json["snapTo"], 3.0);
}

// =============================================================
// apply_snapping
// =============================================================

#[test]
fn pin_holds_until_escape_then_releases() {
    let sibling = boxed("s", 200.0, 100.0, 10.0, 10.0);
    let mut state = SnappingState::default();
    let mut step = |x: f64| {
        let guides = detect_alignment(&boxed("c", x, 400.0, 10.0, 10.0), std::slice::from_ref(&sibling), 1.0);
        apply_snapping(x, 400.0, &guides, &mut state)
    };

    let r = step(203.0);
    assert!(r.is_snapped);
    assert_eq!(r.x, 200.0);

    // No guide in range any more, but the pin holds within 15 px.
    let r = step(212.0);
    assert!(r.is_snapped);
    assert_eq!(r.x, 200.0);

    let r = step(215.0);
    assert_eq!(r.x, 200.0);

    let r = step(216.0);
    assert!(!r.is_snapped);
    assert_eq!(r.x, 216.0);
}

#[test]
fn escape_velocity_tracks_the_pull() {
    let mut state = SnappingState::default();
    let first = apply_snapping(203.0, 0.0, &[guide(GuideKind::CenterX, 200.0)], &mut state);
    assert_eq!(first.x, 200.0);
    assert_eq!(state.escape_velocity_x, 3.0);

    let held = apply_snapping(190.0, 0.0, &[], &mut state);
    assert_eq!(held.x, 200.0);
    assert_eq!(state.escape_velocity_x, -10.0);
    assert_eq!(state.last_snapped_x, Some(200.0));
}

#[test]
fn axes_are_independent() {
    let mut state = SnappingState::default();
    let r = apply_snapping(50.0, 98.0, &[guide(GuideKind::CenterY, 100.0)], &mut state);
    assert_eq!((r.x, r.y), (50.0, 100.0));
    assert!(state.last_snapped_x.is_none());

    // x moves freely while y stays pinned.
    let r = apply_snapping(80.0, 105.0, &[], &mut state);
    assert_eq!((r.x, r.y), (80.0, 100.0));
}

#[test]
fn released_axis_can_snap_to_another_guide() {
    let mut state = SnappingState { last_snapped_x: Some(200.0), ..SnappingState::default() };
    let r = apply_snapping(300.0, 0.0, &[guide(GuideKind::CenterX, 302.0)], &mut state);
    assert_eq!(r.x, 302.0);
    assert_eq!(state.last_snapped_x, Some(302.0));
}

#[test]
fn no_guides_passes_through() {
    let mut state = SnappingState::default();
    let r = apply_snapping(12.5, 7.0, &[], &mut state);
    assert_eq!((r.x, r.y, r.is_snapped), (12.5, 7.0, false));
}

#[test]
fn reset_clears_pins() {
    let mut state = SnappingState { last_snapped_x: Some(1.0), last_snapped_y: Some(2.0), escape_velocity_x: 3.0, escape_velocity_y: 4.0 };
    assert!(state.is_pinned());
    state.reset();
    assert_eq!(state, SnappingState::default());
}
