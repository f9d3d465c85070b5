//! Integration tests for the EditCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use fig_history_lib::command::{execute_json, execute_json_batch};
use fig_history_lib::harness::TestHarness;
use shared::ObjectKind;

#[test]
fn test_command_add_object() {
    let mut h = TestHarness::new();

    let json = r#"{"command": "add_object", "shape": {"type": "ellipse", "depth": 50, "center": {"x": 10, "y": 10}, "radii": {"x": 5, "y": 5}}}"#;

    let resp = execute_json(&mut h, json).unwrap();
    assert!(resp.success, "Failed: {:?}", resp.error);
    assert!(resp.data.as_ref().unwrap()["id"].as_u64().is_some());
    assert_eq!(h.count(ObjectKind::Ellipse), 1);
}

#[test]
fn test_command_add_objects_with_group() {
    let mut h = TestHarness::new();

    let json = r#"{"command": "add_objects", "objects": [
        {"type": "text", "depth": 10, "size": 12.0, "base": {"x": 0, "y": 0}, "string": "a"},
        {"members": [
            {"type": "polyline", "kind": "polyline", "depth": 20, "points": [{"x": 0, "y": 0}, {"x": 5, "y": 5}]}
        ]}
    ]}"#;

    let resp = execute_json(&mut h, json).unwrap();
    assert!(resp.success, "Failed: {:?}", resp.error);
    assert_eq!(resp.data.unwrap()["ids"].as_array().unwrap().len(), 2);
    assert_eq!(h.count(ObjectKind::Compound), 1);
    assert_eq!(h.depth_count(ObjectKind::Polyline, 20), 1);

    assert!(h.undo());
    assert_eq!(h.object_count(), 0);
    assert_eq!(h.depth_count(ObjectKind::Polyline, 20), 0);
}

#[test]
fn test_command_full_workflow_via_json_batch() {
    let mut h = TestHarness::new();

    let json = r#"[
        {"command": "add_object", "shape": {"type": "polyline", "kind": "polyline", "depth": 50, "points": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 10}]}},
        {"command": "move_object", "id": 0, "dx": 5, "dy": -3},
        {"command": "add_point", "id": 0, "index": 1, "at": {"x": 5, "y": -3}},
        {"command": "add_arrowhead", "id": 0, "end": "forward"},
        {"command": "set_depth", "id": 0, "depth": 30},
        {"command": "inspect"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses.len(), 6);
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }

    let inspect = responses[5].data.as_ref().unwrap();
    assert_eq!(inspect["objects"]["polyline"], 1);
    assert_eq!(inspect["depths"], serde_json::json!([30]));
    assert_eq!(
        inspect["undo"],
        serde_json::json!(["ADD", "MOVE", "ADD_POINT", "ADD_ARROW_HEAD", "EDIT"])
    );
}

#[test]
fn test_command_undo_redo_via_json() {
    let mut h = TestHarness::new();
    h.add_ellipse(0, 0, 50);

    let resp = execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["undone"], true);
    assert_eq!(data["status"], "Undo complete");
    assert_eq!(h.object_count(), 0);

    let resp = execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["undone"], false);
    assert_eq!(data["status"], "nothing to undo");

    let resp = execute_json(&mut h, r#"{"command": "redo"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["status"], "Redo complete");
    assert_eq!(h.object_count(), 1);
}

#[test]
fn test_command_glue_and_break() {
    let mut h = TestHarness::new();
    let a = h.add_ellipse(0, 0, 50);
    let b = h.add_polyline(&[(0, 0), (9, 9)], 40);

    let json = format!(r#"{{"command": "glue", "ids": [{}, {}]}}"#, a.0, b.0);
    let resp = execute_json(&mut h, &json).unwrap();
    assert!(resp.success, "Failed: {:?}", resp.error);
    let group = resp.data.unwrap()["id"].as_u64().unwrap();
    assert_eq!(h.object_count(), 1);

    let json = format!(r#"{{"command": "break_compound", "id": {group}}}"#);
    assert!(execute_json(&mut h, &json).unwrap().success);
    assert_eq!(h.object_count(), 2);
    assert_eq!(h.count(ObjectKind::Compound), 0);
}

#[test]
fn test_command_link_mode_drags_polyline() {
    let mut h = TestHarness::new();
    let e = h.add_ellipse(100, 100, 50);
    let l = h.add_polyline(&[(0, 0), (100, 100)], 50);

    let json = r#"[
        {"command": "set_link_mode", "mode": "move"}
    ]"#;
    execute_json_batch(&mut h, json).unwrap();
    let json = format!(r#"{{"command": "move_object", "id": {}, "dx": 0, "dy": 10}}"#, e.0);
    assert!(execute_json(&mut h, &json).unwrap().success);

    let end = h.session.figure.line(l).unwrap().points[1];
    assert_eq!((end.x, end.y), (100, 110));
    assert!(h.undo());
    let end = h.session.figure.line(l).unwrap().points[1];
    assert_eq!((end.x, end.y), (100, 100));
}

#[test]
fn test_command_load_and_export() {
    let mut h = TestHarness::new();
    h.add_ellipse(0, 0, 50);

    let json = r#"{"command": "load_figure", "figure": {
        "filename": "drawing.fig",
        "comments": "loaded",
        "objects": [{"type": "text", "depth": 10, "size": 12.0, "base": {"x": 1, "y": 2}, "string": "hello"}]
    }}"#;
    assert!(execute_json(&mut h, json).unwrap().success);
    assert_eq!(h.session.figure.filename(), "drawing.fig");

    let resp = execute_json(&mut h, r#"{"command": "export_figure"}"#).unwrap();
    let exported = resp.data.unwrap()["figure_json"].as_str().unwrap().to_string();
    assert!(exported.contains("hello"));
    assert!(exported.contains("loaded"));

    assert!(h.undo());
    assert_eq!(h.session.figure.filename(), "");
    assert_eq!(h.count(ObjectKind::Ellipse), 1);
    assert_eq!(h.count(ObjectKind::Text), 0);
}

#[test]
fn test_command_errors_are_reported() {
    let mut h = TestHarness::new();
    let id = h.add_polyline(&[(0, 0), (5, 5)], 50);

    let json = format!(r#"{{"command": "split", "id": {}, "at": 1}}"#, id.0);
    let resp = execute_json(&mut h, &json).unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("out of range"));
    assert_eq!(h.undo_depth(), 1);
}

#[test]
fn test_command_invalid_json_error() {
    let mut h = TestHarness::new();
    let result = execute_json(&mut h, "not valid json");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid command JSON"));

    let result = execute_json_batch(&mut h, r#"[{"command": "teleport"}]"#);
    assert!(result.unwrap_err().contains("Invalid commands JSON"));
}
