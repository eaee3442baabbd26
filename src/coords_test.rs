#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_arithmetic() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(4.0, 6.0);
    assert_eq!(a + b, Point::new(5.0, 8.0));
    assert_eq!(b - a, Point::new(3.0, 4.0));
    assert!(approx_eq((b - a).length(), 5.0));
}

// --- screen_to_device ---

#[test]
fn screen_to_device_identity() {
    let rect = ReferenceRect::default();
    let p = screen_to_device(Point::new(50.0, 75.0), &rect, 1.0);
    assert!(point_approx_eq(p, Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_device_subtracts_origin_then_scales() {
    let rect = ReferenceRect::new(100.0, 40.0, 960.0, 960.0);
    let p = screen_to_device(Point::new(300.0, 240.0), &rect, 2.0);
    assert!(point_approx_eq(p, Point::new(100.0, 100.0)));
}

#[test]
fn screen_to_device_before_origin_is_negative() {
    let rect = ReferenceRect::new(100.0, 100.0, 480.0, 480.0);
    let p = screen_to_device(Point::new(90.0, 80.0), &rect, 1.0);
    assert!(point_approx_eq(p, Point::new(-10.0, -20.0)));
}

#[test]
fn device_to_screen_inverts_screen_to_device() {
    let rect = ReferenceRect::new(12.0, 34.0, 720.0, 720.0);
    let screen = Point::new(123.0, 456.0);
    let device = screen_to_device(screen, &rect, 1.5);
    let back = device_to_screen(device, &rect, 1.5);
    assert!(point_approx_eq(back, screen));
}

// --- deltas ---

#[test]
fn screen_delta_ignores_origin() {
    let vp = Viewport::new(ReferenceRect::new(500.0, 500.0, 100.0, 100.0), 2.0);
    let d = vp.screen_delta_to_device(Point::new(100.0, -40.0));
    assert!(point_approx_eq(d, Point::new(50.0, -20.0)));
}

#[test]
fn screen_dist_to_device_scales() {
    let vp = Viewport::new(ReferenceRect::default(), 4.0);
    assert!(approx_eq(vp.screen_dist_to_device(20.0), 5.0));
}

// --- degenerate scale ---

#[test]
fn zero_scale_falls_back_to_one() {
    let p = screen_to_device(Point::new(10.0, 20.0), &ReferenceRect::default(), 0.0);
    assert!(point_approx_eq(p, Point::new(10.0, 20.0)));
}

#[test]
fn nan_scale_falls_back_to_one() {
    assert_eq!(effective_scale(f64::NAN), 1.0);
    assert_eq!(effective_scale(-2.0), 1.0);
    assert_eq!(effective_scale(0.5), 0.5);
}

#[test]
fn viewport_default_is_unit_scale() {
    let vp = Viewport::default();
    assert_eq!(vp.scale_factor, 1.0);
    assert_eq!(vp.reference_rect.origin(), Point::new(0.0, 0.0));
}
