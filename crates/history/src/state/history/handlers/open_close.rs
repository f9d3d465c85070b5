//! OPEN_CLOSE: toggle a polyline or spline between open and closed form

use std::mem;

use shared::{LineKind, ObjectKind, Shape};

use super::mismatch;
use crate::error::HistoryError;
use crate::state::figure::Figure;
use crate::state::history::{Action, OpenClose, Side};
use crate::state::EditorSession;

/// Flip the open/closed state of `edit.target`.
///
/// Arrowheads and endpoint shape factors only exist in one of the two
/// states; they are exchanged with the stash in `edit`, so applying the
/// same edit twice restores the shape exactly.
pub(crate) fn toggle_open_closed(figure: &mut Figure, edit: &mut OpenClose) -> Result<(), HistoryError> {
    let id = edit.target;
    let invalid = |msg: &str| HistoryError::InvalidEdit(format!("object {id}: {msg}"));
    match figure.shape_mut(id)? {
        Shape::Polyline(line) => {
            let len = line.points.len();
            match line.kind {
                LineKind::Polyline => {
                    if len < 3 || edit.vertex >= len {
                        return Err(invalid("cannot close a polyline of fewer than 3 points"));
                    }
                    line.points.rotate_right(edit.vertex);
                    let first = line.points[0];
                    line.points.push(first);
                    line.kind = LineKind::Polygon;
                }
                LineKind::Polygon => {
                    if len < 4 || edit.vertex >= len - 1 {
                        return Err(invalid("vertex out of range"));
                    }
                    line.points.pop();
                    line.points.rotate_left(edit.vertex);
                    line.kind = LineKind::Polyline;
                }
                _ => return Err(invalid("boxes cannot be opened")),
            }
            mem::swap(&mut line.for_arrow, &mut edit.arrows.0);
            mem::swap(&mut line.back_arrow, &mut edit.arrows.1);
        }
        Shape::Spline(spline) => {
            let len = spline.points.len();
            let min = if spline.kind.is_closed() { 2 } else { 3 };
            if len < min || spline.sfactors.len() != len {
                return Err(invalid("not enough control points"));
            }
            if edit.vertex >= len {
                return Err(invalid("vertex out of range"));
            }
            let opening = spline.kind.is_closed();
            if opening {
                spline.points.rotate_left(edit.vertex);
                spline.sfactors.rotate_left(edit.vertex);
            }
            if let Some((first, last)) = edit.tension.as_mut() {
                mem::swap(&mut spline.sfactors[0], first);
                mem::swap(&mut spline.sfactors[len - 1], last);
            }
            if !opening {
                spline.points.rotate_right(edit.vertex);
                spline.sfactors.rotate_right(edit.vertex);
            }
            spline.kind = spline.kind.toggled();
            mem::swap(&mut spline.for_arrow, &mut edit.arrows.0);
            mem::swap(&mut spline.back_arrow, &mut edit.arrows.1);
        }
        _ => {
            return Err(HistoryError::WrongObjectKind {
                id,
                expected: ObjectKind::Polyline,
            })
        }
    }
    Ok(())
}

pub(crate) fn undo_open_close(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let figure = &mut session.figure;
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let Action::OpenClose(edit) = &mut record.action else {
        return Err(mismatch(kind, target));
    };

    let before = figure.bounds(edit.target);
    toggle_open_closed(figure, edit)?;
    let after = figure.bounds(edit.target);

    session.redisplay.regions(before, after);
    session.stacks.swap(side);
    Ok(())
}
