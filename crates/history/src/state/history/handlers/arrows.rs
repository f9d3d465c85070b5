//! ADD_ARROW_HEAD / DELETE_ARROW_HEAD

use super::mismatch;
use crate::error::HistoryError;
use crate::state::history::{Action, ArrowEdit, ArrowEnd, Side};
use crate::state::EditorSession;

pub(crate) fn undo_arrowhead(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let figure = &mut session.figure;
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let (edit, attached) = match &record.action {
        Action::AddArrowHead(edit) => (*edit, true),
        Action::DeleteArrowHead(edit) => (*edit, false),
        _ => return Err(mismatch(kind, target)),
    };

    let before = figure.bounds(edit.target);
    let (forward, backward) = figure
        .shape_mut(edit.target)?
        .arrows_mut()
        .ok_or_else(|| mismatch(kind, target))?;
    let slot = match edit.end {
        ArrowEnd::Forward => forward,
        ArrowEnd::Backward => backward,
    };

    record.action = if attached {
        let Some(arrow) = slot.take() else {
            return Err(HistoryError::InvalidEdit(format!(
                "object {} has no {} arrowhead",
                edit.target, edit.end
            )));
        };
        Action::DeleteArrowHead(ArrowEdit { arrow, ..edit })
    } else {
        if slot.is_some() {
            return Err(HistoryError::InvalidEdit(format!(
                "object {} already has a {} arrowhead",
                edit.target, edit.end
            )));
        }
        *slot = Some(edit.arrow);
        Action::AddArrowHead(edit)
    };

    let after = figure.bounds(edit.target);
    session.redisplay.regions(before, after);
    session.stacks.swap(side);
    Ok(())
}
