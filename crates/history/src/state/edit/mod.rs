//! Editing commands.
//!
//! Each command mutates the figure, stages what it needs to be reverted and
//! commits the staged edit as a new undo record.

mod compound_ops;
mod convert_ops;
mod file;
mod object_ops;
mod point_ops;

pub use file::{FigureFile, ObjectSpec};
