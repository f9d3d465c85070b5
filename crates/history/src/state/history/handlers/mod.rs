//! Inversion handlers, one module per family of record labels.
//!
//! Every handler checks its preconditions before touching the figure. On
//! failure the record stays where it is and the figure is unchanged.

pub(super) mod add_delete;
pub(super) mod arrows;
pub(super) mod change;
pub(super) mod compound;
pub(super) mod convert;
pub(super) mod join_split;
pub(super) mod load;
pub(super) mod open_close;
pub(super) mod points;
pub(super) mod translate;

pub(crate) use open_close::toggle_open_closed;

use super::{ActionKind, Target};
use crate::error::HistoryError;

/// Error for a record whose label and payload do not belong together
fn mismatch(action: ActionKind, target: Target) -> HistoryError {
    HistoryError::Unsupported { action, target }
}
