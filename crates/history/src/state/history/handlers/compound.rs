//! GLUE / BREAK: regroup scattered members or scatter a group

use shared::ObjectKind;

use super::mismatch;
use crate::error::HistoryError;
use crate::state::history::{Action, Grouping, Side};
use crate::state::EditorSession;

pub(crate) fn undo_glue_break(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let figure = &mut session.figure;
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let group = record
        .saved
        .first(ObjectKind::Compound)
        .ok_or_else(|| mismatch(kind, target))?;
    let members = figure.compound(group)?.clone();

    record.action = match &record.action {
        Action::Glue(grouping) => {
            // grouped now: scatter the members back where they were
            if !figure.contains(ObjectKind::Compound, group) {
                return Err(HistoryError::NotInFigure(group));
            }
            if let Some((_, id)) = members.handles().find(|(k, id)| figure.contains(*k, *id)) {
                return Err(HistoryError::AlreadyInFigure(id));
            }
            let slot = figure.remove(ObjectKind::Compound, group)?;
            figure.restore_objects(&members, &grouping.member_slots)?;
            figure.set_marked(group, false);
            figure.mark_members(&members, true);
            Action::Break(Grouping {
                slot,
                member_slots: Vec::new(),
            })
        }
        Action::Break(grouping) => {
            // scattered now: gather the members into the compound again
            if figure.contains(ObjectKind::Compound, group) {
                return Err(HistoryError::AlreadyInFigure(group));
            }
            let member_slots = figure.delete_objects(&members)?;
            figure.insert_at(ObjectKind::Compound, grouping.slot, group)?;
            figure.mark_members(&members, false);
            Action::Glue(Grouping {
                slot: grouping.slot,
                member_slots,
            })
        }
        other => return Err(mismatch(other.kind(), target)),
    };

    if let Some(region) = figure.bounds(group) {
        session.redisplay.region(region);
    }
    session.stacks.swap(side);
    Ok(())
}
