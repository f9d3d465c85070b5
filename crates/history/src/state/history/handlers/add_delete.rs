//! ADD / DELETE: take saved objects out of the figure or put them back

use std::mem;

use super::mismatch;
use crate::error::HistoryError;
use crate::state::history::{Action, Placement, Side, Target};
use crate::state::{EditorSession, Figure};

pub(crate) fn undo_add_delete(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let figure = &mut session.figure;
    let record = session.stacks.top_mut(side)?;
    let whole = matches!(record.target, Target::AllObjects | Target::Figure);
    let region = figure.compound_bounds(&record.saved);

    record.action = match &mut record.action {
        Action::Add(placement) => {
            // saved objects are in the figure: detach them
            let cut_at = placement
                .tails
                .filter(|tails| whole && figure.block_at_tail(*tails, &record.saved));
            match cut_at {
                Some(tails) => {
                    figure.cut_objects(tails);
                    placement.slots.clear();
                }
                None => placement.slots = figure.delete_objects(&record.saved)?,
            }
            placement.tails = None;
            if record.target == Target::Figure {
                swap_figure_state(figure, &mut record.saved.comments, placement);
            }
            Action::Delete(mem::take(placement))
        }
        Action::Delete(placement) => {
            let tails = figure.tails();
            figure.restore_objects(&record.saved, &placement.slots)?;
            placement.tails = Some(tails);
            placement.slots.clear();
            if record.target == Target::Figure {
                swap_figure_state(figure, &mut record.saved.comments, placement);
            }
            Action::Add(mem::take(placement))
        }
        other => return Err(mismatch(other.kind(), record.target)),
    };

    if whole {
        session.redisplay.canvas();
    } else if let Some(region) = region {
        session.redisplay.region(region);
    }
    session.stacks.swap(side);
    Ok(())
}

/// Whole-figure records also carry the figure comments and color table
fn swap_figure_state(figure: &mut Figure, comments: &mut Option<String>, placement: &mut Placement) {
    figure.swap_comments(comments);
    if let Some(colors) = placement.colors.as_mut() {
        figure.swap_colors(colors);
    }
}
