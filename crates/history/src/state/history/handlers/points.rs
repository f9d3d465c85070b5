//! ADD_POINT / DELETE_POINT: replay the opposite vertex edit.
//!
//! The vertex commands record history themselves, so they run inside
//! [`EditorSession::replay`]; the record is relabeled and moved only after
//! the replayed edit succeeded.

use shared::Point;

use super::mismatch;
use crate::error::HistoryError;
use crate::state::history::{Action, PointEdit, Side};
use crate::state::EditorSession;

/// Whether the vertex and its neighbors sit where the record expects.
/// `present` is true when the selected vertex is currently in the shape.
fn vertices_match(points: &[Point], edit: &PointEdit, present: bool) -> bool {
    let i = edit.selected.index;
    let next_index = if present { i + 1 } else { i };
    let limit = if present { points.len() } else { points.len() + 1 };
    if i >= limit {
        return false;
    }
    if present && points[i] != edit.selected.at {
        return false;
    }
    let prev_ok = match edit.prev {
        Some(p) => i > 0 && points[i - 1] == p,
        None => true,
    };
    let next_ok = match edit.next {
        Some(p) => points.get(next_index) == Some(&p),
        None => true,
    };
    prev_ok && next_ok
}

pub(crate) fn undo_point(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let (edit, present) = match &record.action {
        Action::AddPoint(edit) => (edit.clone(), true),
        Action::DeletePoint(edit) => (edit.clone(), false),
        _ => return Err(mismatch(kind, target)),
    };

    let points = session
        .figure
        .shape(edit.target)?
        .vertices()
        .ok_or_else(|| mismatch(kind, target))?;
    if !vertices_match(points, &edit, present) {
        return Err(HistoryError::PointOutOfRange {
            id: edit.target,
            index: edit.selected.index,
        });
    }

    let index = edit.selected.index;
    let sfactor = session.replay(|s| {
        if present {
            s.delete_point(edit.target, index).map(|(_, sfactor)| sfactor)
        } else {
            s.add_point(edit.target, index, edit.selected.at, edit.sfactor)
                .map(|()| edit.sfactor)
        }
    })?;

    let relabeled = PointEdit { sfactor, ..edit };
    let record = session.stacks.top_mut(side)?;
    record.action = if present {
        Action::DeletePoint(relabeled)
    } else {
        Action::AddPoint(relabeled)
    };
    session.stacks.swap(side);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::history::PointRef;
    use shared::ObjectId;

    fn edit(index: usize, at: (i32, i32), prev: Option<(i32, i32)>, next: Option<(i32, i32)>) -> PointEdit {
        PointEdit {
            target: ObjectId(0),
            prev: prev.map(|(x, y)| Point::new(x, y)),
            selected: PointRef {
                index,
                at: Point::new(at.0, at.1),
            },
            next: next.map(|(x, y)| Point::new(x, y)),
            sfactor: None,
        }
    }

    #[test]
    fn test_vertices_match_present_and_absent() {
        let with = [Point::new(0, 0), Point::new(5, 5), Point::new(10, 0)];
        let without = [Point::new(0, 0), Point::new(10, 0)];
        let e = edit(1, (5, 5), Some((0, 0)), Some((10, 0)));
        assert!(vertices_match(&with, &e, true));
        assert!(vertices_match(&without, &e, false));
        assert!(!vertices_match(&without, &e, true));

        let appended = edit(2, (20, 0), Some((10, 0)), None);
        assert!(vertices_match(&without, &appended, false));
        assert!(!vertices_match(&without, &edit(3, (20, 0), None, None), false));
    }
}
