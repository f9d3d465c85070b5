// Library crate: the history engine, the figure model and the headless harness.
// The binary only wires settings, logging and the JSON command protocol together.

pub mod command;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod redisplay;
pub mod state;

pub use error::HistoryError;
pub use state::history::{ActionKind, Side, Status, Target};
pub use state::EditorSession;
