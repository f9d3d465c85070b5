//! Redraw notification sink.
//!
//! The engine only tells the canvas which regions went stale; it never reads
//! anything back.

use std::cell::RefCell;
use std::rc::Rc;

use shared::BoundingBox;

/// A single redraw request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    Region(BoundingBox),
    Canvas,
}

pub trait Redisplay {
    /// Redraw everything inside `region`
    fn region(&mut self, region: BoundingBox);

    /// Redraw the whole canvas
    fn canvas(&mut self);

    /// Redraw the union of an object's old and new extents
    fn regions(&mut self, before: Option<BoundingBox>, after: Option<BoundingBox>) {
        match (before, after) {
            (Some(a), Some(b)) => self.region(a.union(b)),
            (Some(r), None) | (None, Some(r)) => self.region(r),
            (None, None) => {}
        }
    }
}

/// Discards every request
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRedisplay;

impl Redisplay for NullRedisplay {
    fn region(&mut self, _region: BoundingBox) {}

    fn canvas(&mut self) {}
}

/// Records requests so tests and the CLI can see what would be redrawn.
///
/// Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct DamageLog {
    entries: Rc<RefCell<Vec<Damage>>>,
}

impl DamageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Damage> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drain the log, returning what was recorded
    pub fn take(&self) -> Vec<Damage> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }
}

impl Redisplay for DamageLog {
    fn region(&mut self, region: BoundingBox) {
        tracing::debug!(?region, "redisplay region");
        self.entries.borrow_mut().push(Damage::Region(region));
    }

    fn canvas(&mut self) {
        tracing::debug!("redisplay canvas");
        self.entries.borrow_mut().push(Damage::Canvas);
    }
}
