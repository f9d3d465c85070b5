//! Errors raised by editing commands and history handlers.

use shared::{ObjectId, ObjectKind};
use thiserror::Error;

use crate::state::history::{ActionKind, Target};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    #[error("history stack is empty")]
    EmptyHistory,
    #[error("cannot record {action}: no {missing} staged")]
    IncompleteCapture {
        action: ActionKind,
        missing: &'static str,
    },
    #[error("object {0} does not exist")]
    MissingObject(ObjectId),
    #[error("object {id} is not a {expected}")]
    WrongObjectKind { id: ObjectId, expected: ObjectKind },
    #[error("object {0} is not part of the figure")]
    NotInFigure(ObjectId),
    #[error("object {0} is already part of the figure")]
    AlreadyInFigure(ObjectId),
    #[error("point {index} is out of range for object {id}")]
    PointOutOfRange { id: ObjectId, index: usize },
    #[error("{action} is not supported for {target}")]
    Unsupported { action: ActionKind, target: Target },
    #[error("invalid edit: {0}")]
    InvalidEdit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = HistoryError::WrongObjectKind {
            id: ObjectId(3),
            expected: ObjectKind::Spline,
        };
        assert_eq!(e.to_string(), "object #3 is not a spline");

        let e = HistoryError::IncompleteCapture {
            action: ActionKind::Move,
            missing: "new position",
        };
        assert_eq!(e.to_string(), "cannot record MOVE: no new position staged");

        let e = HistoryError::Unsupported {
            action: ActionKind::Move,
            target: Target::Figure,
        };
        assert_eq!(e.to_string(), "MOVE is not supported for figure");
    }
}
