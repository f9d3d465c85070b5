//! EDIT and SCALE: exchange the live object with its detached image

use std::mem;

use shared::Compound;

use super::mismatch;
use crate::error::HistoryError;
use crate::state::history::{Action, Side, Target};
use crate::state::EditorSession;

pub(crate) fn undo_change(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let figure = &mut session.figure;
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let Action::Edit { pair } = &record.action else {
        return Err(mismatch(kind, target));
    };

    match (target, *pair) {
        (Target::Object(_), Some(pair)) => {
            figure.shape(pair.original)?;
            let before = figure.bounds(pair.changed);
            let live = figure.live_objects().contains(&pair.changed);
            if live {
                figure.remove_object_depth(pair.changed);
            }
            figure.swap_payloads(pair.original, pair.changed)?;
            if live {
                figure.add_object_depth(pair.changed);
            }
            let after = figure.bounds(pair.changed);
            session.redisplay.regions(before, after);
        }
        (Target::Figure, None) => {
            figure.swap_comments(&mut record.saved.comments);
        }
        (Target::AllObjects, None) => {
            let current = figure.take_objects();
            if let Err(e) = figure.append_objects(&record.saved) {
                figure.append_objects(&current)?;
                return Err(e);
            }
            let comments = record.saved.comments.take();
            record.saved = Compound { comments, ..current };
            figure.swap_comments(&mut record.saved.comments);
            session.redisplay.canvas();
        }
        _ => return Err(mismatch(kind, target)),
    }

    session.stacks.swap(side);
    Ok(())
}

pub(crate) fn undo_scale(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let figure = &mut session.figure;
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let (Action::Scale { pair }, Target::Object(object)) = (&mut record.action, target) else {
        return Err(mismatch(kind, target));
    };

    if !figure.contains(object, pair.changed) {
        return Err(HistoryError::NotInFigure(pair.changed));
    }
    figure.expect_kind(pair.original, object)?;
    if figure.contains(object, pair.original) {
        return Err(HistoryError::AlreadyInFigure(pair.original));
    }

    let before = figure.bounds(pair.changed);
    let index = figure.remove(object, pair.changed)?;
    figure.insert_at(object, index, pair.original)?;
    let after = figure.bounds(pair.original);

    mem::swap(&mut pair.original, &mut pair.changed);
    record.saved = Compound::single(object, pair.original);

    session.redisplay.regions(before, after);
    session.stacks.swap(side);
    Ok(())
}
