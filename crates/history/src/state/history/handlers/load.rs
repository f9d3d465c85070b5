//! LOAD: exchange the whole document with the one it replaced

use super::mismatch;
use crate::error::HistoryError;
use crate::state::history::{Action, Side};
use crate::state::EditorSession;

pub(crate) fn undo_load(session: &mut EditorSession, side: Side) -> Result<(), HistoryError> {
    let record = session.stacks.top_mut(side)?;
    let (kind, target) = (record.kind(), record.target);
    let Action::Load { previous } = &mut record.action else {
        return Err(mismatch(kind, target));
    };

    session.figure.swap_document(previous);
    tracing::debug!(filename = session.figure.filename(), "document swapped");

    session.redisplay.canvas();
    session.stacks.swap(side);
    Ok(())
}
