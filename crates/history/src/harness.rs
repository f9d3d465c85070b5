//! Headless test harness for scripted figure editing.
//!
//! Wraps an [`EditorSession`] whose redraw requests go to a [`DamageLog`],
//! so scripts and tests can check what the canvas would repaint.

use shared::{ObjectId, ObjectKind, Shape};

use crate::error::HistoryError;
use crate::fixtures;
use crate::redisplay::{Damage, DamageLog};
use crate::state::history::{Side, Status};
use crate::state::{EditorSession, FigureFile, HistorySettings};

/// Headless harness: one session plus the damage it reported
pub struct TestHarness {
    pub session: EditorSession,
    damage: DamageLog,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_settings(HistorySettings::default())
    }

    pub fn with_settings(settings: HistorySettings) -> Self {
        let damage = DamageLog::new();
        let session =
            EditorSession::with_redisplay(Box::new(damage.clone())).with_settings(settings);
        Self { session, damage }
    }

    // ── Object creation ───────────────────────────────────────

    pub fn add(&mut self, shape: Shape) -> Result<ObjectId, HistoryError> {
        self.session.add_object(shape)
    }

    /// Add an ellipse and return its handle. Panics on failure.
    pub fn add_ellipse(&mut self, x: i32, y: i32, depth: i32) -> ObjectId {
        self.add(fixtures::ellipse_at(x, y, depth))
            .unwrap_or_else(|e| panic!("add ellipse: {e}"))
    }

    /// Add an open polyline and return its handle. Panics on failure.
    pub fn add_polyline(&mut self, coords: &[(i32, i32)], depth: i32) -> ObjectId {
        self.add(fixtures::polyline(coords, depth))
            .unwrap_or_else(|e| panic!("add polyline: {e}"))
    }

    /// Add an open X-spline and return its handle. Panics on failure.
    pub fn add_spline(&mut self, coords: &[(i32, i32)], depth: i32) -> ObjectId {
        self.add(fixtures::open_spline(coords, depth))
            .unwrap_or_else(|e| panic!("add spline: {e}"))
    }

    // ── History ───────────────────────────────────────────────

    /// Undo one step; true when the figure changed
    pub fn undo(&mut self) -> bool {
        self.session.undo().is_complete()
    }

    /// Redo one step; true when the figure changed
    pub fn redo(&mut self) -> bool {
        self.session.redo().is_complete()
    }

    /// Undo until nothing is left, returning the number of steps taken
    pub fn undo_all(&mut self) -> usize {
        let mut steps = 0;
        while self.undo() {
            steps += 1;
        }
        steps
    }

    pub fn redo_all(&mut self) -> usize {
        let mut steps = 0;
        while self.redo() {
            steps += 1;
        }
        steps
    }

    pub fn status(&self) -> Option<&Status> {
        self.session.last_status()
    }

    pub fn undo_depth(&self) -> usize {
        self.session.history().len(Side::Undo)
    }

    pub fn redo_depth(&self) -> usize {
        self.session.history().len(Side::Redo)
    }

    /// Action labels on one stack, oldest first
    pub fn labels(&self, side: Side) -> Vec<&'static str> {
        self.session
            .history()
            .iter(side)
            .map(|r| r.kind().name())
            .collect()
    }

    // ── Inspection ────────────────────────────────────────────

    /// Number of top-level objects of `kind`
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.session.figure.count(kind)
    }

    /// Number of top-level objects of every kind
    pub fn object_count(&self) -> usize {
        self.session.figure.objects().len()
    }

    pub fn depth_count(&self, kind: ObjectKind, depth: i32) -> usize {
        self.session.figure.depths().count(kind, depth)
    }

    /// Drain the redraw requests made since the last call
    pub fn take_damage(&mut self) -> Vec<Damage> {
        self.damage.take()
    }

    // ── Load / export ─────────────────────────────────────────

    /// Load a figure from JSON, replacing the current one as an undoable step
    pub fn load_figure_json(&mut self, json: &str) -> Result<(), String> {
        let file: FigureFile =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.session.load_document(file).map_err(|e| e.to_string())
    }

    /// The current figure with every handle resolved, as JSON
    pub fn export_figure_json(&self) -> String {
        serde_json::to_string_pretty(&self.session.figure.snapshot()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_is_drained() {
        let mut h = TestHarness::new();
        h.add_ellipse(0, 0, 50);
        assert_eq!(h.take_damage().len(), 1);
        assert!(h.take_damage().is_empty());
    }

    #[test]
    fn test_undo_all_counts_steps() {
        let mut h = TestHarness::new();
        h.add_ellipse(0, 0, 50);
        h.add_polyline(&[(0, 0), (5, 5)], 40);
        assert_eq!(h.undo_all(), 2);
        assert_eq!(h.object_count(), 0);
        assert_eq!(h.redo_all(), 2);
        assert_eq!(h.labels(Side::Undo), vec!["ADD", "ADD"]);
    }
}
