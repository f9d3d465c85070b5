//! JOIN / SPLIT: exchange the kept object with its image and attach or
//! detach the partner piece, located through its stored handle

use shared::BoundingBox;

use super::mismatch;
use crate::error::HistoryError;
use crate::state::history::{Action, JoinSplit, Side, Target};
use crate::state::EditorSession;

pub(crate) fn undo_join_split(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let figure = &mut session.figure;
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let (pieces, split, object) = match (&record.action, target) {
        (Action::Join(p), Target::Object(object)) => (*p, false, object),
        (Action::Split(p), Target::Object(object)) => (*p, true, object),
        _ => return Err(mismatch(kind, target)),
    };

    if !figure.contains(object, pieces.latest) {
        return Err(HistoryError::NotInFigure(pieces.latest));
    }
    if figure.contains(object, pieces.original) {
        return Err(HistoryError::AlreadyInFigure(pieces.original));
    }
    figure.expect_kind(pieces.original, object)?;
    figure.expect_kind(pieces.partner, object)?;
    match (split, figure.contains(object, pieces.partner)) {
        (true, false) => return Err(HistoryError::NotInFigure(pieces.partner)),
        (false, true) => return Err(HistoryError::AlreadyInFigure(pieces.partner)),
        _ => {}
    }

    let before = [pieces.latest, pieces.partner]
        .into_iter()
        .filter_map(|id| figure.bounds(id))
        .reduce(BoundingBox::union);

    figure.remove_object_depth(pieces.latest);
    figure.swap_payloads(pieces.original, pieces.latest)?;
    figure.add_object_depth(pieces.latest);

    record.action = if split {
        // undoing a split: the partner is absorbed again
        let slot = figure.remove(object, pieces.partner)?;
        Action::Join(JoinSplit { slot, ..pieces })
    } else {
        figure.insert_at(object, pieces.slot, pieces.partner)?;
        Action::Split(pieces)
    };

    let after = [pieces.latest, pieces.partner]
        .into_iter()
        .filter_map(|id| figure.bounds(id))
        .reduce(BoundingBox::union);
    session.redisplay.regions(before, after);
    session.stacks.swap(side);
    Ok(())
}
