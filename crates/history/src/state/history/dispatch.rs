//! undo / redo entry points and the handler table

use tracing::{info, warn};

use super::handlers;
use super::{ActionKind, Side, Status};
use crate::error::HistoryError;
use crate::state::EditorSession;

/// Inverts the top record of the given stack in place, relabels it and
/// moves it to the other stack
pub(crate) type Handler = fn(&mut EditorSession, Side) -> Result<(), HistoryError>;

/// Handler for every record label. Each one serves both directions.
pub(crate) fn handler(kind: ActionKind) -> Handler {
    match kind {
        ActionKind::Add | ActionKind::Delete => handlers::add_delete::undo_add_delete,
        ActionKind::Move => handlers::translate::undo_move,
        ActionKind::Edit => handlers::change::undo_change,
        ActionKind::Scale => handlers::change::undo_scale,
        ActionKind::Glue | ActionKind::Break => handlers::compound::undo_glue_break,
        ActionKind::Load => handlers::load::undo_load,
        ActionKind::AddPoint | ActionKind::DeletePoint => handlers::points::undo_point,
        ActionKind::AddArrowHead | ActionKind::DeleteArrowHead => handlers::arrows::undo_arrowhead,
        ActionKind::Convert => handlers::convert::undo_convert,
        ActionKind::OpenClose => handlers::open_close::undo_open_close,
        ActionKind::Join | ActionKind::Split => handlers::join_split::undo_join_split,
    }
}

impl EditorSession {
    /// Revert the most recent edit
    pub fn undo(&mut self) -> Status {
        self.run(Side::Undo)
    }

    /// Re-apply the most recently reverted edit
    pub fn redo(&mut self) -> Status {
        self.run(Side::Redo)
    }

    fn run(&mut self, side: Side) -> Status {
        let status = match self.stacks.top(side).map(|r| r.kind()) {
            None => match side {
                Side::Undo => Status::NothingToUndo,
                Side::Redo => Status::NothingToRedo,
            },
            Some(kind) => match handler(kind)(self, side) {
                Ok(()) => {
                    info!(action = %kind, ?side, "history step complete");
                    Status::Complete(side)
                }
                Err(e @ HistoryError::Unsupported { .. }) => {
                    warn!(action = %kind, ?side, "{e}");
                    Status::Unsupported(side)
                }
                Err(e) => {
                    warn!(action = %kind, ?side, "record rejected: {e}");
                    Status::Failed(side, e)
                }
            },
        };
        self.set_status(status.clone());
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stacks() {
        let mut session = EditorSession::new();
        assert_eq!(session.undo(), Status::NothingToUndo);
        assert_eq!(session.redo(), Status::NothingToRedo);
        assert_eq!(session.last_status(), Some(&Status::NothingToRedo));
    }
}
