#![allow(clippy::float_cmp)]

use super::*;
use crate::coords::ReferenceRect;
use crate::element::{ElementData, TextData};

const PIVOT: Point = Point::new(240.0, 240.0);

fn text_at(p: Point) -> Element {
    Element::with_id(
        "t",
        ElementData::Text(TextData { text: "Hi".into(), size: 24.0, color: "#fff".into() }),
        p.x,
        p.y,
    )
}

fn unit_viewport() -> Viewport {
    Viewport::new(ReferenceRect::default(), 1.0)
}

/// Point at `bearing` degrees (0 = up, clockwise) and `radius` from the pivot.
fn at_bearing(bearing_deg: f64, radius: f64) -> Point {
    let r = bearing_deg.to_radians();
    Point::new(PIVOT.x + radius * r.sin(), PIVOT.y - radius * r.cos())
}

fn rotate_between(element: &Element, start_bearing: f64, end_bearing: f64, config: RotateConfig) -> RotateOutcome {
    let start = at_bearing(start_bearing, 100.0);
    let end = at_bearing(end_bearing, 100.0);
    let config = RotateConfig { start_pointer: start, ..config };
    rotate_element(element, end - start, &config)
}

// =============================================================
// bearing / soft_snap
// =============================================================

#[test]
fn bearing_cardinals() {
    let b = |x: f64, y: f64| bearing(PIVOT, Point::new(PIVOT.x + x, PIVOT.y + y)).unwrap_or(f64::NAN);
    assert!((b(0.0, -10.0) - 0.0).abs() < 1e-9);
    assert!((b(10.0, 0.0) - 90.0).abs() < 1e-9);
    assert!((b(0.0, 10.0) - 180.0).abs() < 1e-9);
    assert!((b(-10.0, 0.0) - 270.0).abs() < 1e-9);
}

#[test]
fn bearing_on_pivot_is_none() {
    assert!(bearing(PIVOT, PIVOT).is_none());
}

#[test]
fn soft_snap_captures_within_threshold() {
    assert_eq!(soft_snap(44.0, 45.0, 3.0), 45.0);
    assert_eq!(soft_snap(92.5, 45.0, 3.0), 90.0);
    assert_eq!(soft_snap(358.0, 45.0, 3.0), 0.0);
}

#[test]
fn soft_snap_leaves_distant_angles() {
    assert_eq!(soft_snap(30.0, 45.0, 3.0), 30.0);
    assert_eq!(soft_snap(41.5, 45.0, 3.0), 41.5);
}

// =============================================================
// rotate_element
// =============================================================

#[test]
fn snaps_forty_four_to_forty_five() {
    let el = text_at(PIVOT).rotated(40.0);
    let out = rotate_between(&el, 40.0, 44.0, RotateConfig::new(unit_viewport(), Point::default(), 40.0));
    assert!(out.applied);
    assert_eq!(out.angle, 45.0);
    assert_eq!(out.element.angle, 45.0);
}

#[test]
fn offset_between_pointer_and_angle_is_preserved() {
    // Grabbed at bearing 0 while the element sits at 20°; a 30° sweep lands on 50°.
    let el = text_at(PIVOT).rotated(20.0);
    let out = rotate_between(&el, 0.0, 30.0, RotateConfig::new(unit_viewport(), Point::default(), 20.0));
    assert_eq!(out.angle, 50.0);
}

#[test]
fn pivot_never_moves() {
    let el = text_at(PIVOT);
    let out = rotate_between(&el, 0.0, 123.0, RotateConfig::new(unit_viewport(), Point::default(), 0.0));
    assert_eq!((out.element.x, out.element.y), (PIVOT.x, PIVOT.y));
}

#[test]
fn result_is_integer_and_normalized() {
    let el = text_at(PIVOT);
    let out = rotate_between(&el, 0.0, -30.4, RotateConfig::new(unit_viewport(), Point::default(), 0.0));
    assert_eq!(out.angle, 330.0);
}

#[test]
fn full_turn_back_to_zero_is_stored_as_zero() {
    let el = text_at(PIVOT).rotated(10.0);
    let out = rotate_between(&el, 10.0, 359.0, RotateConfig::new(unit_viewport(), Point::default(), 10.0));
    assert_eq!(out.angle, 0.0);
    let json = serde_json::to_value(&out.element).unwrap_or_default();
    assert!(json.get("angle").is_none());
}

#[test]
fn snapping_can_be_disabled() {
    let el = text_at(PIVOT).rotated(40.0);
    let mut config = RotateConfig::new(unit_viewport(), Point::default(), 40.0);
    config.snap_enabled = false;
    let out = rotate_between(&el, 40.0, 44.0, config);
    assert_eq!(out.angle, 44.0);
}

#[test]
fn jitter_below_threshold_is_suppressed() {
    let el = text_at(PIVOT);
    let mut config = RotateConfig::new(unit_viewport(), Point::default(), 0.0);
    config.last_applied = Some(20.0);
    let out = rotate_between(&el, 0.0, 20.5, config);
    assert!(!out.applied);
    assert_eq!(out.angle, 20.0);
}

#[test]
fn smoothing_handles_wraparound() {
    // 359.6° vs last applied 0° is a 0.4° change, not 359.6°.
    let el = text_at(PIVOT);
    let mut config = RotateConfig::new(unit_viewport(), Point::default(), 0.0);
    config.snap_enabled = false;
    config.last_applied = Some(0.0);
    let out = rotate_between(&el, 0.0, 359.6, config);
    assert!(!out.applied);
    assert_eq!(out.angle, 0.0);
}

#[test]
fn small_intentional_rotation_still_applies() {
    let el = text_at(PIVOT);
    let mut config = RotateConfig::new(unit_viewport(), Point::default(), 0.0);
    config.snap_enabled = false;
    config.last_applied = Some(20.0);
    let out = rotate_between(&el, 0.0, 21.0, config);
    assert!(out.applied);
    assert_eq!(out.angle, 21.0);
}

#[test]
fn identical_input_is_idempotent() {
    let el = text_at(PIVOT);
    let config = RotateConfig::new(unit_viewport(), Point::default(), 0.0);
    let first = rotate_between(&el, 0.0, 73.0, config);
    let second = rotate_between(&el, 0.0, 73.0, config);
    assert_eq!(first.angle, second.angle);

    // Feeding the first result back as the last applied angle holds it.
    let held = rotate_between(&el, 0.0, 73.0, RotateConfig { last_applied: Some(first.angle), ..config });
    assert_eq!(held.angle, first.angle);
}

#[test]
fn pointer_on_pivot_holds_angle() {
    let el = text_at(PIVOT).rotated(30.0);
    let config = RotateConfig { start_pointer: at_bearing(0.0, 50.0), ..RotateConfig::new(unit_viewport(), Point::default(), 30.0) };
    let out = rotate_element(&el, PIVOT - config.start_pointer, &config);
    assert!(!out.applied);
    assert_eq!(out.angle, 30.0);
}

#[test]
fn pivot_is_measured_in_device_space() {
    // Preview offset and scaled: a pointer that is "right of" the element in
    // device space must read as 90°, whatever the screen origin.
    let viewport = Viewport::new(ReferenceRect::new(100.0, 50.0, 960.0, 960.0), 2.0);
    let el = text_at(PIVOT);
    let start = viewport.device_to_screen(Point::new(PIVOT.x, PIVOT.y - 100.0));
    let end = viewport.device_to_screen(Point::new(PIVOT.x + 100.0, PIVOT.y));
    let config = RotateConfig::new(viewport, start, 0.0);
    let out = rotate_element(&el, end - start, &config);
    assert_eq!(out.angle, 90.0);
}
