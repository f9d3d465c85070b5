//! Integration tests for TestHarness.
//!
//! Tests the headless harness API: scripted edits, history walking,
//! redraw reporting and JSON load/export.

use fig_history_lib::fixtures;
use fig_history_lib::harness::TestHarness;
use fig_history_lib::redisplay::Damage;
use fig_history_lib::state::HistorySettings;
use fig_history_lib::{Side, Status};
use shared::{ObjectKind, SplineKind};

#[test]
fn test_harness_undo_redo_cycle() {
    let mut h = TestHarness::new();
    h.add_ellipse(0, 0, 50);
    h.add_polyline(&[(0, 0), (5, 5)], 40);
    assert_eq!(h.object_count(), 2);

    assert!(h.undo());
    assert_eq!(h.object_count(), 1);

    assert!(h.undo());
    assert_eq!(h.object_count(), 0);

    assert!(!h.undo()); // nothing to undo
    assert_eq!(h.status(), Some(&Status::NothingToUndo));

    assert!(h.redo());
    assert!(h.redo());
    assert_eq!(h.object_count(), 2);

    assert!(!h.redo()); // nothing to redo
    assert_eq!(h.status().unwrap().to_string(), "Nothing to REDO");
}

#[test]
fn test_harness_labels_follow_inversion() {
    let mut h = TestHarness::new();
    let id = h.add_ellipse(0, 0, 50);
    h.session.delete_object(id).unwrap();
    assert_eq!(h.labels(Side::Undo), vec!["ADD", "DELETE"]);

    h.undo();
    assert_eq!(h.labels(Side::Redo), vec!["ADD"]);
    h.undo();
    assert_eq!(h.labels(Side::Redo), vec!["ADD", "DELETE"]);
    assert_eq!(h.undo_depth() + h.redo_depth(), 2);
}

#[test]
fn test_harness_reports_damage() {
    let mut h = TestHarness::new();
    let id = h.add_ellipse(0, 0, 50);
    h.take_damage();

    h.session.move_object(id, 100, 0).unwrap();
    let damage = h.take_damage();
    assert_eq!(damage.len(), 1);
    let Damage::Region(region) = damage[0] else {
        panic!("expected a region, got {damage:?}");
    };
    assert_eq!((region.min.x, region.max.x), (-20, 120));

    h.session.delete_all().unwrap();
    assert_eq!(h.take_damage(), vec![Damage::Canvas]);
    assert!(h.undo());
    assert_eq!(h.take_damage(), vec![Damage::Canvas]);
}

#[test]
fn test_harness_load_export_json() {
    let mut h = TestHarness::new();
    let json = r#"{
        "filename": "a.fig",
        "colors": [{"r": 10, "g": 20, "b": 30}],
        "objects": [
            {"type": "ellipse", "depth": 50, "center": {"x": 0, "y": 0}, "radii": {"x": 10, "y": 5}},
            {"type": "arc", "depth": 40, "clockwise": false, "center": [0.0, 0.0],
             "points": [{"x": 10, "y": 0}, {"x": 0, "y": -10}, {"x": -10, "y": 0}]}
        ]
    }"#;
    h.load_figure_json(json).unwrap();
    assert_eq!(h.count(ObjectKind::Ellipse), 1);
    assert_eq!(h.count(ObjectKind::Arc), 1);
    assert_eq!(h.session.figure.colors().len(), 1);
    assert_eq!(h.depth_count(ObjectKind::Arc, 40), 1);

    let exported = h.export_figure_json();
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert_eq!(value["ellipses"].as_array().unwrap().len(), 1);
    assert_eq!(value["arcs"][0]["depth"], 40);

    assert!(h.undo());
    assert_eq!(h.object_count(), 0);
    assert!(h.session.figure.colors().is_empty());
}

#[test]
fn test_harness_load_rejects_bad_json() {
    let mut h = TestHarness::new();
    let err = h.load_figure_json("{").unwrap_err();
    assert!(err.starts_with("JSON parse error"));
    assert_eq!(h.undo_depth(), 0);
}

#[test]
fn test_harness_undo_limit() {
    let mut h = TestHarness::with_settings(HistorySettings {
        undo_limit: Some(3),
        ..HistorySettings::default()
    });
    for i in 0..6 {
        h.add_ellipse(i * 10, 0, 50);
    }
    assert_eq!(h.undo_depth(), 3);
    assert_eq!(h.undo_all(), 3);
    assert_eq!(h.object_count(), 3);
}

#[test]
fn test_harness_open_close_spline_tension() {
    let mut h = TestHarness::new();
    let open = h.add_spline(&[(0, 0), (10, 10), (20, 0)], 50);
    h.session.open_close(open, 0).unwrap();
    let s = h.session.figure.spline(open).unwrap();
    assert_eq!(s.kind, SplineKind::ClosedX);
    assert_eq!(s.sfactors, vec![-1.0, -1.0, -1.0]);

    let closed = h
        .add(fixtures::closed_spline(&[(0, 0), (10, 10), (20, 0), (10, -10)], 40))
        .unwrap();
    h.session.open_close(closed, 0).unwrap();
    let s = h.session.figure.spline(closed).unwrap();
    assert_eq!(s.kind, SplineKind::OpenX);
    assert_eq!((s.sfactors[0], s.sfactors[3]), (0.0, 0.0));

    assert!(h.undo());
    let s = h.session.figure.spline(closed).unwrap();
    assert_eq!(s.kind, SplineKind::ClosedX);
    assert_eq!(s.sfactors, vec![-1.0; 4]);

    assert!(h.undo());
    assert!(h.undo());
    let s = h.session.figure.spline(open).unwrap();
    assert_eq!(s.kind, SplineKind::OpenX);
    assert_eq!(s.sfactors, vec![0.0, -1.0, 0.0]);
}
