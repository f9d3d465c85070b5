//! Staging area: the pre-edit state an editing command collects before
//! committing it as a new undo record.

use std::collections::BTreeSet;

use shared::{Arrow, Compound, ObjectId, ObjectKind, Point, Rgb};
use tracing::debug;

use super::{
    Action, ActionKind, ArrowEdit, ArrowEnd, Conversion, Grouping, HistoryRecord, JoinSplit,
    ObjectPair, ObjectRef, OpenClose, Placement, PointEdit, PointRef, Side, Target,
};
use crate::error::HistoryError;
use crate::state::figure::{Document, LinkInfo, LinkMode, ListTails};
use crate::state::EditorSession;

/// Scratch fields filled by the setters below. Setters never validate;
/// the commit checks that the fields its action needs are present.
#[derive(Debug, Default)]
pub struct StagingArea {
    action: Option<ActionKind>,
    target: Option<Target>,
    saved: Compound,
    latest: Option<ObjectId>,
    partner: Option<ObjectId>,
    prev_point: Option<Point>,
    selected_point: Option<PointRef>,
    next_point: Option<Point>,
    sfactor: Option<f64>,
    arc_point: Option<usize>,
    last_position: Option<Point>,
    new_position: Option<Point>,
    link_mode: LinkMode,
    links: Vec<LinkInfo>,
    tension: Option<(f64, f64)>,
    arrows: (Option<Arrow>, Option<Arrow>),
    colors: Option<Vec<Rgb>>,
    previous: Option<Box<Document>>,
    tails: Option<ListTails>,
    slots: Vec<usize>,
    slot: Option<usize>,
    radius: Option<i32>,
}

impl StagingArea {
    pub fn is_empty(&self) -> bool {
        self.action.is_none() && self.saved.is_empty() && self.previous.is_none()
    }

    fn first(&self, kind: ObjectKind) -> Option<ObjectId> {
        self.saved.first(kind)
    }

    /// The single object a per-object record is about
    fn subject(&self, target: Target, action: ActionKind) -> Result<(ObjectKind, ObjectId), HistoryError> {
        let Target::Object(kind) = target else {
            return Err(HistoryError::Unsupported { action, target });
        };
        self.first(kind)
            .map(|id| (kind, id))
            .ok_or(HistoryError::IncompleteCapture {
                action,
                missing: "saved object",
            })
    }

    /// Turn the staged fields into a record for `action`
    fn build(&mut self) -> Result<HistoryRecord, HistoryError> {
        let action = self
            .action
            .ok_or_else(|| HistoryError::InvalidEdit("no action staged".into()))?;
        let missing = |what: &'static str| HistoryError::IncompleteCapture {
            action,
            missing: what,
        };
        let target = self.target.ok_or_else(|| missing("target"))?;

        let variant = match action {
            ActionKind::Add | ActionKind::Delete => {
                let placement = Placement {
                    tails: self.tails,
                    slots: std::mem::take(&mut self.slots),
                    colors: self.colors.take(),
                };
                if action == ActionKind::Add {
                    Action::Add(placement)
                } else {
                    Action::Delete(placement)
                }
            }
            ActionKind::Move => {
                if target == Target::Figure {
                    return Err(HistoryError::Unsupported { action, target });
                }
                Action::Move {
                    last: self.last_position.ok_or_else(|| missing("last position"))?,
                    new: self.new_position.ok_or_else(|| missing("new position"))?,
                    link_mode: self.link_mode,
                    links: std::mem::take(&mut self.links),
                }
            }
            ActionKind::Edit => match target {
                Target::Object(_) => {
                    let (_, original) = self.subject(target, action)?;
                    let changed = self.latest.ok_or_else(|| missing("changed object"))?;
                    Action::Edit {
                        pair: Some(ObjectPair { original, changed }),
                    }
                }
                Target::AllObjects | Target::Figure => Action::Edit { pair: None },
            },
            ActionKind::Scale => {
                let (_, original) = self.subject(target, action)?;
                let changed = self.latest.ok_or_else(|| missing("changed object"))?;
                Action::Scale {
                    pair: ObjectPair { original, changed },
                }
            }
            ActionKind::Glue | ActionKind::Break => {
                self.first(ObjectKind::Compound)
                    .ok_or_else(|| missing("compound"))?;
                let grouping = Grouping {
                    slot: self.slot.ok_or_else(|| missing("compound position"))?,
                    member_slots: std::mem::take(&mut self.slots),
                };
                if action == ActionKind::Glue {
                    Action::Glue(grouping)
                } else {
                    Action::Break(grouping)
                }
            }
            ActionKind::Load => Action::Load {
                previous: self.previous.take().ok_or_else(|| missing("previous document"))?,
            },
            ActionKind::AddPoint | ActionKind::DeletePoint => {
                let (_, target_id) = self.subject(target, action)?;
                let edit = PointEdit {
                    target: target_id,
                    prev: self.prev_point,
                    selected: self.selected_point.ok_or_else(|| missing("selected point"))?,
                    next: self.next_point,
                    sfactor: self.sfactor,
                };
                if action == ActionKind::AddPoint {
                    Action::AddPoint(edit)
                } else {
                    Action::DeletePoint(edit)
                }
            }
            ActionKind::AddArrowHead | ActionKind::DeleteArrowHead => {
                let (kind, target_id) = self.subject(target, action)?;
                let (end, arrow) = match (kind, self.arc_point, self.arrows) {
                    (ObjectKind::Arc, Some(n), (fwd, back)) => {
                        let end = ArrowEnd::from_arc_point(n).ok_or_else(|| missing("arc endpoint"))?;
                        let arrow = match end {
                            ArrowEnd::Forward => fwd,
                            ArrowEnd::Backward => back,
                        };
                        (end, arrow.ok_or_else(|| missing("arrowhead"))?)
                    }
                    (_, _, (Some(fwd), _)) => (ArrowEnd::Forward, fwd),
                    (_, _, (None, Some(back))) => (ArrowEnd::Backward, back),
                    _ => return Err(missing("arrowhead")),
                };
                let edit = ArrowEdit {
                    target: target_id,
                    end,
                    arrow,
                };
                if action == ActionKind::AddArrowHead {
                    Action::AddArrowHead(edit)
                } else {
                    Action::DeleteArrowHead(edit)
                }
            }
            ActionKind::Convert => {
                let (kind, from) = self.subject(target, action)?;
                if let Some(radius) = self.radius {
                    Action::Convert(Conversion::BoxCorners { line: from, radius })
                } else {
                    let to = self.latest.ok_or_else(|| missing("converted object"))?;
                    let to_kind = match kind {
                        ObjectKind::Polyline => ObjectKind::Spline,
                        ObjectKind::Spline => ObjectKind::Polyline,
                        _ => return Err(HistoryError::Unsupported { action, target }),
                    };
                    Action::Convert(Conversion::Shape {
                        from: ObjectRef { kind, id: from },
                        to: ObjectRef {
                            kind: to_kind,
                            id: to,
                        },
                        slot: self.slot.ok_or_else(|| missing("list position"))?,
                    })
                }
            }
            ActionKind::OpenClose => {
                let (_, target_id) = self.subject(target, action)?;
                Action::OpenClose(OpenClose {
                    target: target_id,
                    vertex: self.selected_point.map(|p| p.index).unwrap_or(0),
                    arrows: self.arrows,
                    tension: self.tension,
                })
            }
            ActionKind::Join | ActionKind::Split => {
                let (_, original) = self.subject(target, action)?;
                let pieces = JoinSplit {
                    original,
                    latest: self.latest.ok_or_else(|| missing("latest object"))?,
                    partner: self.partner.ok_or_else(|| missing("partner object"))?,
                    slot: self.slot.ok_or_else(|| missing("partner position"))?,
                };
                if action == ActionKind::Join {
                    Action::Join(pieces)
                } else {
                    Action::Split(pieces)
                }
            }
        };

        Ok(HistoryRecord {
            target,
            saved: std::mem::take(&mut self.saved),
            action: variant,
        })
    }
}

/// The two capture guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureGuards {
    /// Commits leave the redo stack alone
    pub keep_redo: bool,
    /// Commits drop the staged edit instead of recording it
    pub frozen: bool,
}

/// Summary of the guards as seen by a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Record,
    RecordKeepRedo,
    Frozen,
}

impl CaptureGuards {
    pub fn mode(&self) -> CaptureMode {
        match (self.frozen, self.keep_redo) {
            (true, _) => CaptureMode::Frozen,
            (false, true) => CaptureMode::RecordKeepRedo,
            (false, false) => CaptureMode::Record,
        }
    }
}

impl EditorSession {
    pub fn set_action(&mut self, action: ActionKind) {
        self.staging.action = Some(action);
    }

    pub fn set_action_object(&mut self, action: ActionKind, target: Target) {
        self.staging.action = Some(action);
        self.staging.target = Some(target);
    }

    pub fn set_latest_line(&mut self, id: ObjectId) {
        self.staging.saved.lines = vec![id];
    }

    pub fn set_latest_spline(&mut self, id: ObjectId) {
        self.staging.saved.splines = vec![id];
    }

    pub fn set_latest_ellipse(&mut self, id: ObjectId) {
        self.staging.saved.ellipses = vec![id];
    }

    pub fn set_latest_arc(&mut self, id: ObjectId) {
        self.staging.saved.arcs = vec![id];
    }

    pub fn set_latest_text(&mut self, id: ObjectId) {
        self.staging.saved.texts = vec![id];
    }

    pub fn set_latest_compound(&mut self, id: ObjectId) {
        self.staging.saved.compounds = vec![id];
    }

    /// Stage `id` in the saved list matching `kind`
    pub fn set_latest_object(&mut self, kind: ObjectKind, id: ObjectId) {
        match kind {
            ObjectKind::Polyline => self.set_latest_line(id),
            ObjectKind::Spline => self.set_latest_spline(id),
            ObjectKind::Ellipse => self.set_latest_ellipse(id),
            ObjectKind::Arc => self.set_latest_arc(id),
            ObjectKind::Text => self.set_latest_text(id),
            ObjectKind::Compound => self.set_latest_compound(id),
        }
    }

    /// Replace the whole saved compound
    pub fn set_latest_objects(&mut self, objects: Compound) {
        self.staging.saved = objects;
    }

    /// Live object an edit, scale or conversion produced
    pub fn set_changed_object(&mut self, id: ObjectId) {
        self.staging.latest = Some(id);
    }

    pub fn set_latest_line_var(&mut self, id: ObjectId) {
        self.staging.latest = Some(id);
    }

    pub fn set_latest_spline_var(&mut self, id: ObjectId) {
        self.staging.latest = Some(id);
    }

    pub fn set_latest_partner(&mut self, id: ObjectId) {
        self.staging.partner = Some(id);
    }

    pub fn set_last_prev_point(&mut self, point: Option<Point>) {
        self.staging.prev_point = point;
    }

    pub fn set_last_selected_point(&mut self, index: usize, at: Point) {
        self.staging.selected_point = Some(PointRef { index, at });
    }

    pub fn set_last_next_point(&mut self, point: Option<Point>) {
        self.staging.next_point = point;
    }

    pub fn set_last_selected_sfactor(&mut self, sfactor: Option<f64>) {
        self.staging.sfactor = sfactor;
    }

    pub fn set_last_arc_point_num(&mut self, index: usize) {
        self.staging.arc_point = Some(index);
    }

    pub fn set_last_position(&mut self, at: Point) {
        self.staging.last_position = Some(at);
    }

    pub fn set_new_position(&mut self, at: Point) {
        self.staging.new_position = Some(at);
    }

    pub fn set_last_link_info(&mut self, mode: LinkMode, links: Vec<LinkInfo>) {
        self.staging.link_mode = mode;
        self.staging.links = links;
    }

    pub fn set_last_tension(&mut self, tension: Option<(f64, f64)>) {
        self.staging.tension = tension;
    }

    pub fn set_last_arrows(&mut self, forward: Option<Arrow>, backward: Option<Arrow>) {
        self.staging.arrows = (forward, backward);
    }

    pub fn set_saved_comments(&mut self, comments: Option<String>) {
        self.staging.saved.comments = comments;
    }

    pub fn set_saved_colors(&mut self, colors: Vec<Rgb>) {
        self.staging.colors = Some(colors);
    }

    pub fn set_previous_document(&mut self, previous: Document) {
        self.staging.previous = Some(Box::new(previous));
    }

    pub fn set_list_tails(&mut self, tails: ListTails) {
        self.staging.tails = Some(tails);
    }

    /// Former indices of the saved objects, in handle order
    pub fn set_list_slots(&mut self, slots: Vec<usize>) {
        self.staging.slots = slots;
    }

    /// Index of the single object a glue, break, convert, join or split moved
    pub fn set_list_slot(&mut self, slot: usize) {
        self.staging.slot = Some(slot);
    }

    pub fn set_last_radius(&mut self, radius: i32) {
        self.staging.radius = Some(radius);
    }

    pub fn set_freeze_redo_cleanup(&mut self, on: bool) {
        self.guards.keep_redo = on;
    }

    pub fn set_freeze_undo_additions(&mut self, on: bool) {
        self.guards.frozen = on;
    }

    pub fn capture_mode(&self) -> CaptureMode {
        self.guards.mode()
    }

    /// Commit the staged edit as the new top undo record.
    ///
    /// Returns `Ok(false)` when capture is frozen; the staging area is
    /// drained either way.
    pub fn undo_update_history(&mut self) -> Result<bool, HistoryError> {
        let mut staged = std::mem::take(&mut self.staging);
        let mode = self.guards.mode();
        if mode == CaptureMode::Frozen {
            debug!("capture frozen, staged edit dropped");
            return Ok(false);
        }

        let record = staged.build()?;

        let mut dropped = Vec::new();
        if mode == CaptureMode::Record {
            dropped.extend(self.stacks.clear_redo());
        }
        debug!(action = %record.kind(), target = %record.target, "history record committed");
        self.stacks.push(Side::Undo, record);
        if let Some(limit) = self.settings.undo_limit {
            dropped.extend(self.stacks.trim_undo(limit));
        }
        self.release_records(dropped);
        Ok(true)
    }

    /// Free the detached objects only `dropped` still refers to
    pub(crate) fn release_records(&mut self, dropped: Vec<HistoryRecord>) {
        if dropped.is_empty() {
            return;
        }
        let mut keep = self.figure.live_objects();
        keep.extend(self.stacks.referenced(&self.figure));
        let mut doomed = BTreeSet::new();
        for record in &dropped {
            doomed.extend(record.objects(&self.figure));
        }
        let freed: Vec<_> = doomed.difference(&keep).copied().collect();
        for id in &freed {
            self.figure.release(*id);
        }
        debug!(records = dropped.len(), objects = freed.len(), "history records discarded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::state::history::Side;

    #[test]
    fn test_commit_drains_staging() {
        let mut session = EditorSession::new();
        let id = session.figure.alloc(fixtures::ellipse_at(0, 0, 50));
        session.figure.insert(ObjectKind::Ellipse, id).unwrap();

        session.set_action_object(ActionKind::Add, Target::Object(ObjectKind::Ellipse));
        session.set_latest_ellipse(id);
        assert!(session.undo_update_history().unwrap());
        assert!(session.staging.is_empty());
        assert_eq!(session.history().len(Side::Undo), 1);
    }

    #[test]
    fn test_frozen_commit_records_nothing() {
        let mut session = EditorSession::new();
        session.set_freeze_undo_additions(true);
        assert_eq!(session.capture_mode(), CaptureMode::Frozen);
        session.set_action_object(ActionKind::Add, Target::Object(ObjectKind::Ellipse));
        session.set_latest_ellipse(ObjectId(0));
        assert!(!session.undo_update_history().unwrap());
        assert!(session.staging.is_empty());
        assert!(session.history().is_empty(Side::Undo));
    }

    #[test]
    fn test_incomplete_capture_is_rejected() {
        let mut session = EditorSession::new();
        session.set_action_object(ActionKind::Move, Target::Object(ObjectKind::Ellipse));
        session.set_latest_ellipse(ObjectId(0));
        session.set_last_position(Point::new(0, 0));
        assert_eq!(
            session.undo_update_history(),
            Err(HistoryError::IncompleteCapture {
                action: ActionKind::Move,
                missing: "new position"
            })
        );
        assert!(session.staging.is_empty());
        assert!(session.history().is_empty(Side::Undo));
    }

    #[test]
    fn test_keep_redo_guard() {
        let mut guards = CaptureGuards::default();
        assert_eq!(guards.mode(), CaptureMode::Record);
        guards.keep_redo = true;
        assert_eq!(guards.mode(), CaptureMode::RecordKeepRedo);
        guards.frozen = true;
        assert_eq!(guards.mode(), CaptureMode::Frozen);
    }

    #[test]
    fn test_undo_limit_releases_dropped_objects() {
        let mut session = EditorSession::new();
        session.settings.undo_limit = Some(1);
        let a = session.add_object(fixtures::ellipse_at(0, 0, 50)).unwrap();
        session.delete_object(a).unwrap();
        // the add record fell off; the delete record still owns the ellipse
        assert_eq!(session.history().len(Side::Undo), 1);
        assert!(session.figure.get(a).is_some());

        let b = session.add_object(fixtures::ellipse_at(5, 5, 50)).unwrap();
        assert_eq!(session.history().len(Side::Undo), 1);
        assert!(session.figure.get(a).is_none());
        assert!(session.figure.get(b).is_some());
    }
}
