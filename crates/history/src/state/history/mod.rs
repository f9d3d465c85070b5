//! History records and the undo/redo stacks.
//!
//! A record describes one reversible edit. Its label always names the
//! transition that produced the figure as it is now, so inverting a record
//! and relabeling it with the opposite kind makes it valid for the other stack.

mod dispatch;
mod handlers;
mod staging;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use shared::{Arrow, Compound, ObjectId, ObjectKind, Point, Rgb};

use super::figure::{Document, Figure, LinkInfo, LinkMode, ListTails};
use crate::error::HistoryError;

pub use staging::{CaptureGuards, CaptureMode, StagingArea};

pub(crate) use handlers::toggle_open_closed;

/// Label of a history record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Add,
    Delete,
    Move,
    Edit,
    Glue,
    Break,
    Load,
    Scale,
    AddPoint,
    DeletePoint,
    AddArrowHead,
    DeleteArrowHead,
    Convert,
    OpenClose,
    Join,
    Split,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Add => "ADD",
            ActionKind::Delete => "DELETE",
            ActionKind::Move => "MOVE",
            ActionKind::Edit => "EDIT",
            ActionKind::Glue => "GLUE",
            ActionKind::Break => "BREAK",
            ActionKind::Load => "LOAD",
            ActionKind::Scale => "SCALE",
            ActionKind::AddPoint => "ADD_POINT",
            ActionKind::DeletePoint => "DELETE_POINT",
            ActionKind::AddArrowHead => "ADD_ARROW_HEAD",
            ActionKind::DeleteArrowHead => "DELETE_ARROW_HEAD",
            ActionKind::Convert => "CONVERT",
            ActionKind::OpenClose => "OPEN_CLOSE",
            ActionKind::Join => "JOIN",
            ActionKind::Split => "SPLIT",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a record applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Objects of one kind, listed in the saved compound
    Object(ObjectKind),
    /// Every top-level object at once
    AllObjects,
    /// The document as a whole: objects, comments and colors
    Figure,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Object(kind) => f.write_str(kind.name()),
            Target::AllObjects => f.write_str("all objects"),
            Target::Figure => f.write_str("figure"),
        }
    }
}

/// Which history a call works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Undo,
    Redo,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Undo => Side::Redo,
            Side::Redo => Side::Undo,
        }
    }
}

/// A detached pre-edit image and the live object it was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectPair {
    pub original: ObjectId,
    pub changed: ObjectId,
}

/// Where a set of objects sits (or sat) in the document lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// List lengths before a block was appended
    pub tails: Option<ListTails>,
    /// Former index of every saved object, in handle order
    pub slots: Vec<usize>,
    /// Color table swapped along with a whole figure
    pub colors: Option<Vec<Rgb>>,
}

/// A compound and the positions of it and its members
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    pub slot: usize,
    pub member_slots: Vec<usize>,
}

/// One vertex of a polyline or spline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointRef {
    pub index: usize,
    pub at: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointEdit {
    pub target: ObjectId,
    pub prev: Option<Point>,
    pub selected: PointRef,
    pub next: Option<Point>,
    /// Shape factor of the vertex, splines only
    pub sfactor: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowEnd {
    Forward,
    Backward,
}

impl ArrowEnd {
    /// Arc ends are picked by control point: the first carries the backward
    /// arrow, the last the forward one
    pub fn from_arc_point(index: usize) -> Option<ArrowEnd> {
        match index {
            0 => Some(ArrowEnd::Backward),
            2 => Some(ArrowEnd::Forward),
            _ => None,
        }
    }
}

impl fmt::Display for ArrowEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrowEnd::Forward => f.write_str("forward"),
            ArrowEnd::Backward => f.write_str("backward"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowEdit {
    pub target: ObjectId,
    pub end: ArrowEnd,
    pub arrow: Arrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub id: ObjectId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `from` is detached, `to` is live; `slot` is where `from` sat
    Shape {
        from: ObjectRef,
        to: ObjectRef,
        slot: usize,
    },
    /// Box and arc-box share a payload; only kind and radius change
    BoxCorners { line: ObjectId, radius: i32 },
}

/// State a polyline or spline only has while open or only while closed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenClose {
    pub target: ObjectId,
    /// Vertex the shape was opened at
    pub vertex: usize,
    pub arrows: (Option<Arrow>, Option<Arrow>),
    /// Endpoint shape factors, splines only
    pub tension: Option<(f64, f64)>,
}

/// Objects taking part in a join or split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinSplit {
    /// Detached image of `latest` from the other side of the edit
    pub original: ObjectId,
    /// Live object that was extended or cut
    pub latest: ObjectId,
    /// The piece absorbed by a join, or produced by a split
    pub partner: ObjectId,
    /// Index of `partner` in its list while attached
    pub slot: usize,
}

/// Per-kind auxiliary state of a record
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Add(Placement),
    Delete(Placement),
    Move {
        last: Point,
        new: Point,
        link_mode: LinkMode,
        links: Vec<LinkInfo>,
    },
    Edit { pair: Option<ObjectPair> },
    Scale { pair: ObjectPair },
    Glue(Grouping),
    Break(Grouping),
    Load { previous: Box<Document> },
    AddPoint(PointEdit),
    DeletePoint(PointEdit),
    AddArrowHead(ArrowEdit),
    DeleteArrowHead(ArrowEdit),
    Convert(Conversion),
    OpenClose(OpenClose),
    Join(JoinSplit),
    Split(JoinSplit),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Add(_) => ActionKind::Add,
            Action::Delete(_) => ActionKind::Delete,
            Action::Move { .. } => ActionKind::Move,
            Action::Edit { .. } => ActionKind::Edit,
            Action::Scale { .. } => ActionKind::Scale,
            Action::Glue(_) => ActionKind::Glue,
            Action::Break(_) => ActionKind::Break,
            Action::Load { .. } => ActionKind::Load,
            Action::AddPoint(_) => ActionKind::AddPoint,
            Action::DeletePoint(_) => ActionKind::DeletePoint,
            Action::AddArrowHead(_) => ActionKind::AddArrowHead,
            Action::DeleteArrowHead(_) => ActionKind::DeleteArrowHead,
            Action::Convert(_) => ActionKind::Convert,
            Action::OpenClose(_) => ActionKind::OpenClose,
            Action::Join(_) => ActionKind::Join,
            Action::Split(_) => ActionKind::Split,
        }
    }
}

/// One committed, reversible edit
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub target: Target,
    /// Objects the edit touched, as they were captured
    pub saved: Compound,
    pub action: Action,
}

impl HistoryRecord {
    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    /// Every arena slot this record refers to, nested members included
    pub fn objects(&self, figure: &Figure) -> BTreeSet<ObjectId> {
        let mut out = BTreeSet::new();
        figure.collect_handles(&self.saved, &mut out);
        let mut direct = Vec::new();
        match &self.action {
            Action::Add(_) | Action::Delete(_) | Action::Glue(_) | Action::Break(_) => {}
            Action::Move { links, .. } => direct.extend(links.iter().map(|l| l.line)),
            Action::Edit { pair } => {
                if let Some(p) = pair {
                    direct.extend([p.original, p.changed]);
                }
            }
            Action::Scale { pair } => direct.extend([pair.original, pair.changed]),
            Action::Load { previous } => figure.collect_handles(&previous.objects, &mut out),
            Action::AddPoint(edit) | Action::DeletePoint(edit) => direct.push(edit.target),
            Action::AddArrowHead(edit) | Action::DeleteArrowHead(edit) => direct.push(edit.target),
            Action::Convert(Conversion::Shape { from, to, .. }) => direct.extend([from.id, to.id]),
            Action::Convert(Conversion::BoxCorners { line, .. }) => direct.push(*line),
            Action::OpenClose(edit) => direct.push(edit.target),
            Action::Join(js) | Action::Split(js) => {
                direct.extend([js.original, js.latest, js.partner])
            }
        }
        for id in direct {
            figure.collect_object(id, &mut out);
        }
        out
    }
}

/// The undo and redo histories. A record lives on exactly one of them.
#[derive(Debug, Default)]
pub struct HistoryStacks {
    undo: Vec<HistoryRecord>,
    redo: Vec<HistoryRecord>,
}

impl HistoryStacks {
    fn stack(&self, side: Side) -> &Vec<HistoryRecord> {
        match side {
            Side::Undo => &self.undo,
            Side::Redo => &self.redo,
        }
    }

    fn stack_mut(&mut self, side: Side) -> &mut Vec<HistoryRecord> {
        match side {
            Side::Undo => &mut self.undo,
            Side::Redo => &mut self.redo,
        }
    }

    pub fn push(&mut self, side: Side, record: HistoryRecord) {
        self.stack_mut(side).push(record);
    }

    pub fn top(&self, side: Side) -> Option<&HistoryRecord> {
        self.stack(side).last()
    }

    pub(crate) fn top_mut(&mut self, side: Side) -> Result<&mut HistoryRecord, HistoryError> {
        self.stack_mut(side)
            .last_mut()
            .ok_or(HistoryError::EmptyHistory)
    }

    pub(crate) fn pop(&mut self, side: Side) -> Option<HistoryRecord> {
        self.stack_mut(side).pop()
    }

    /// Move the top record of `side` onto the other stack. No-op when empty.
    pub fn swap(&mut self, side: Side) {
        if let Some(record) = self.pop(side) {
            tracing::debug!(action = %record.kind(), from = ?side, "record moved");
            self.push(side.opposite(), record);
        }
    }

    pub(crate) fn clear_redo(&mut self) -> Vec<HistoryRecord> {
        std::mem::take(&mut self.redo)
    }

    /// Drop the oldest undo records beyond `limit`
    pub(crate) fn trim_undo(&mut self, limit: usize) -> Vec<HistoryRecord> {
        let excess = self.undo.len().saturating_sub(limit);
        self.undo.drain(..excess).collect()
    }

    pub fn len(&self, side: Side) -> usize {
        self.stack(side).len()
    }

    pub fn is_empty(&self, side: Side) -> bool {
        self.stack(side).is_empty()
    }

    /// Records of one stack, oldest first
    pub fn iter(&self, side: Side) -> impl Iterator<Item = &HistoryRecord> {
        self.stack(side).iter()
    }

    /// Slots referenced by any record on either stack
    pub fn referenced(&self, figure: &Figure) -> BTreeSet<ObjectId> {
        self.undo
            .iter()
            .chain(self.redo.iter())
            .flat_map(|r| r.objects(figure))
            .collect()
    }
}

/// Outcome of an undo or redo call
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    NothingToUndo,
    NothingToRedo,
    Complete(Side),
    /// The top record has a shape no handler accepts
    Unsupported(Side),
    /// A precondition check rejected the top record
    Failed(Side, HistoryError),
}

impl Status {
    pub fn is_complete(&self) -> bool {
        matches!(self, Status::Complete(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NothingToUndo => f.write_str("nothing to undo"),
            Status::NothingToRedo => f.write_str("Nothing to REDO"),
            Status::Complete(Side::Undo) => f.write_str("Undo complete"),
            Status::Complete(Side::Redo) => f.write_str("Redo complete"),
            Status::Unsupported(Side::Undo) => f.write_str("Nothing to UNDO"),
            Status::Unsupported(Side::Redo) => f.write_str("Nothing to REDO"),
            Status::Failed(Side::Undo, e) => write!(f, "Undo failed: {e}"),
            Status::Failed(Side::Redo, e) => write!(f, "Redo failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: ObjectKind) -> HistoryRecord {
        HistoryRecord {
            target: Target::Object(kind),
            saved: Compound::default(),
            action: Action::Add(Placement::default()),
        }
    }

    #[test]
    fn test_swap_moves_exactly_one_record() {
        let mut stacks = HistoryStacks::default();
        stacks.push(Side::Undo, record(ObjectKind::Polyline));
        stacks.push(Side::Undo, record(ObjectKind::Ellipse));

        stacks.swap(Side::Undo);
        assert_eq!(stacks.len(Side::Undo), 1);
        assert_eq!(stacks.len(Side::Redo), 1);
        assert_eq!(
            stacks.top(Side::Redo).map(|r| r.target),
            Some(Target::Object(ObjectKind::Ellipse))
        );

        stacks.swap(Side::Redo);
        stacks.swap(Side::Redo);
        assert_eq!(stacks.len(Side::Undo), 2);
        assert!(stacks.is_empty(Side::Redo));
    }

    #[test]
    fn test_trim_undo_drops_oldest() {
        let mut stacks = HistoryStacks::default();
        for kind in [ObjectKind::Polyline, ObjectKind::Spline, ObjectKind::Arc] {
            stacks.push(Side::Undo, record(kind));
        }
        let dropped = stacks.trim_undo(2);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].target, Target::Object(ObjectKind::Polyline));
        assert_eq!(stacks.len(Side::Undo), 2);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(Status::NothingToUndo.to_string(), "nothing to undo");
        assert_eq!(Status::NothingToRedo.to_string(), "Nothing to REDO");
        assert_eq!(Status::Complete(Side::Undo).to_string(), "Undo complete");
        assert_eq!(Status::Complete(Side::Redo).to_string(), "Redo complete");
        assert_eq!(Status::Unsupported(Side::Undo).to_string(), "Nothing to UNDO");
        assert_eq!(
            Status::Failed(Side::Redo, HistoryError::NotInFigure(ObjectId(2))).to_string(),
            "Redo failed: object #2 is not part of the figure"
        );
    }

    #[test]
    fn test_arc_arrow_ends() {
        assert_eq!(ArrowEnd::from_arc_point(0), Some(ArrowEnd::Backward));
        assert_eq!(ArrowEnd::from_arc_point(2), Some(ArrowEnd::Forward));
        assert_eq!(ArrowEnd::from_arc_point(1), None);
    }
}
