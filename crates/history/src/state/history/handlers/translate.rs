//! MOVE: shift the saved objects back by the recorded displacement

use std::mem;

use shared::{ObjectId, ObjectKind};

use super::mismatch;
use crate::error::HistoryError;
use crate::state::history::{Action, Side, Target};
use crate::state::EditorSession;

pub(crate) fn undo_move(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let figure = &mut session.figure;
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let Action::Move {
        last,
        new,
        link_mode,
        links,
    } = &mut record.action
    else {
        return Err(mismatch(kind, target));
    };
    if target == Target::Figure {
        return Err(mismatch(kind, target));
    }

    let moved: Vec<(ObjectKind, ObjectId)> = record.saved.handles().collect();
    for (_, id) in &moved {
        figure.shape(*id)?;
    }
    for link in links.iter() {
        let points = figure.line(link.line)?.points.len();
        if link.endpoint >= points {
            return Err(HistoryError::PointOutOfRange {
                id: link.line,
                index: link.endpoint,
            });
        }
    }

    let (dx, dy) = (last.x - new.x, last.y - new.y);
    let before = figure.compound_bounds(&record.saved);
    for (kind, id) in moved {
        figure.translate(id, dx, dy)?;
        if kind == ObjectKind::Spline {
            // reinsert at the same position so list-derived state is rebuilt
            if let Some(index) = figure.position(kind, id) {
                figure.remove(kind, id)?;
                figure.insert_at(kind, index, id)?;
            }
        }
    }
    figure.adjust_links(*link_mode, links, dx, dy)?;
    let after = figure.compound_bounds(&record.saved);
    mem::swap(last, new);

    session.redisplay.regions(before, after);
    session.stacks.swap(side);
    Ok(())
}
