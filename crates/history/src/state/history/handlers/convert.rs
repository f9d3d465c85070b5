//! CONVERT: swap a shape with its converted form, or flip box corners.
//!
//! One record covers the whole conversion and names both objects, so the
//! two stacks always move in step.

use std::mem;

use shared::{Compound, LineKind};

use super::mismatch;
use crate::error::HistoryError;
use crate::state::history::{Action, Conversion, Side, Target};
use crate::state::EditorSession;

pub(crate) fn undo_convert(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let figure = &mut session.figure;
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let Action::Convert(conversion) = &mut record.action else {
        return Err(mismatch(kind, target));
    };

    let (before, after) = match conversion {
        Conversion::Shape { from, to, slot } => {
            if !figure.contains(to.kind, to.id) {
                return Err(HistoryError::NotInFigure(to.id));
            }
            figure.expect_kind(from.id, from.kind)?;
            if figure.contains(from.kind, from.id) {
                return Err(HistoryError::AlreadyInFigure(from.id));
            }

            let before = figure.bounds(to.id);
            let index = figure.remove(to.kind, to.id)?;
            figure.insert_at(from.kind, *slot, from.id)?;
            let after = figure.bounds(from.id);

            *slot = index;
            mem::swap(from, to);
            record.target = Target::Object(from.kind);
            record.saved = Compound::single(from.kind, from.id);
            (before, after)
        }
        Conversion::BoxCorners { line, radius } => {
            let before = figure.bounds(*line);
            let shape = figure.line_mut(*line)?;
            shape.kind = match shape.kind {
                LineKind::Box => LineKind::ArcBox,
                LineKind::ArcBox => LineKind::Box,
                _ => {
                    return Err(HistoryError::InvalidEdit(format!(
                        "object {line} is not a box"
                    )))
                }
            };
            mem::swap(&mut shape.radius, radius);
            (before, figure.bounds(*line))
        }
    };

    session.redisplay.regions(before, after);
    session.stacks.swap(side);
    Ok(())
}
