#![allow(clippy::float_cmp)]

use super::*;
use crate::error::EditorError;

const SEED: &str = r##"
  "elements": [
    {"id": "cpu", "type": "metric", "data": {"metric": "cpu_temp", "size": 40, "color": "#fff"}, "x": 100, "y": 100, "zIndex": 1},
    {"id": "title", "type": "text", "data": {"text": "Hello", "size": 24, "color": "#0f0"}, "x": 240, "y": 400, "zIndex": 0}
  ]
"##;

fn script(body: &str) -> String {
    format!("{{{SEED}{body}}}")
}

fn find<'a>(elements: &'a [Element], id: &str) -> &'a Element {
    elements.iter().find(|e| e.id == id).unwrap()
}

#[test]
fn empty_script_returns_seed_in_z_order() {
    let out = run_reader(script("").as_bytes(), EditorConfig::default()).unwrap();
    let ids: Vec<&str> = out.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["title", "cpu"]);
    assert_eq!(out[0].z_index, 0);
    assert_eq!(out[1].z_index, 1);
}

#[test]
fn move_gesture_is_replayed() {
    let body = r#", "gestures": [
        {"elementId": "cpu", "op": "move", "pointer": {"x": 0, "y": 0},
         "moves": [{"x": 10, "y": 0}, {"x": 20, "y": 5}]}
    ]"#;
    let out = run_reader(script(body).as_bytes(), EditorConfig::default()).unwrap();
    let cpu = find(&out, "cpu");
    assert_eq!((cpu.x, cpu.y), (120.0, 105.0));
}

#[test]
fn trailing_undo_reverts_whole_gestures() {
    let body = r#", "gestures": [
        {"elementId": "cpu", "op": "move", "pointer": {"x": 0, "y": 0}, "moves": [{"x": 10, "y": 0}], "end": {"x": 30, "y": 0}},
        {"elementId": "cpu", "op": "rotate", "pointer": {"x": 130, "y": 0}, "end": {"x": 230, "y": 100}}
    ], "undo": 1"#;
    let out = run_reader(script(body).as_bytes(), EditorConfig::default()).unwrap();
    let cpu = find(&out, "cpu");
    assert_eq!((cpu.x, cpu.angle), (130.0, 0.0));
}

#[test]
fn undo_then_redo_restores() {
    let body = r#", "gestures": [
        {"elementId": "title", "op": "resize", "handle": "e", "pointer": {"x": 0, "y": 0}, "end": {"x": 50, "y": 0}}
    ], "undo": 1, "redo": 1"#;
    let out = run_reader(script(body).as_bytes(), EditorConfig::default()).unwrap();
    assert_eq!(find(&out, "title").data.resizable_size(), Some(54.0));
}

#[test]
fn abandoned_gesture_leaves_no_trace() {
    let body = r#", "gestures": [
        {"elementId": "cpu", "op": "move", "pointer": {"x": 0, "y": 0}, "moves": [{"x": 50, "y": 50}], "abandon": true}
    ]"#;
    let out = run_reader(script(body).as_bytes(), EditorConfig::default()).unwrap();
    let cpu = find(&out, "cpu");
    assert_eq!((cpu.x, cpu.y), (100.0, 100.0));
}

#[test]
fn selection_drives_group_move() {
    let body = r#", "selection": ["cpu", "title"], "gestures": [
        {"elementId": "cpu", "op": "move", "pointer": {"x": 0, "y": 0}, "end": {"x": -7, "y": 11}, "modifiers": {"alt": true}}
    ]"#;
    let out = run_reader(script(body).as_bytes(), EditorConfig::default()).unwrap();
    assert_eq!((find(&out, "cpu").x, find(&out, "cpu").y), (93.0, 111.0));
    assert_eq!((find(&out, "title").x, find(&out, "title").y), (233.0, 411.0));
}

#[test]
fn unknown_target_is_skipped() {
    let body = r#", "gestures": [{"elementId": "nope", "op": "move", "pointer": {"x": 0, "y": 0}}]"#;
    let out = run_reader(script(body).as_bytes(), EditorConfig::default()).unwrap();
    assert_eq!(out.len(), 2);
}

#[test]
fn script_config_overrides_caller() {
    let body = r#", "config": {"boundary": {"mode": "clamp-to-display", "center_x": 240, "center_y": 240, "radius": 240}},
        "gestures": [{"elementId": "cpu", "op": "move", "pointer": {"x": 0, "y": 0}, "end": {"x": -500, "y": 140}}]"#;
    let out = run_reader(script(body).as_bytes(), EditorConfig::default()).unwrap();
    assert_eq!((find(&out, "cpu").x, find(&out, "cpu").y), (0.0, 240.0));
}

#[test]
fn malformed_script_is_a_script_error() {
    let err = run_reader("{ not json".as_bytes(), EditorConfig::default());
    assert!(matches!(err, Err(EditorError::Script(_))));
}
