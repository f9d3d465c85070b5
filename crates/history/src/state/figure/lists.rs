//! Typed-list primitives on the live document.
//!
//! Every primitive that attaches or detaches objects keeps the depth
//! counters in step. Primitives that fail leave the document untouched.

use shared::{Compound, ObjectId, ObjectKind};

use super::Figure;
use crate::error::HistoryError;

/// Length of every top-level list at some moment, used to cut a block
/// that was appended after that moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListTails {
    lens: [usize; 6],
}

fn slot(kind: ObjectKind) -> usize {
    match kind {
        ObjectKind::Polyline => 0,
        ObjectKind::Spline => 1,
        ObjectKind::Ellipse => 2,
        ObjectKind::Arc => 3,
        ObjectKind::Text => 4,
        ObjectKind::Compound => 5,
    }
}

impl ListTails {
    pub fn len(&self, kind: ObjectKind) -> usize {
        self.lens[slot(kind)]
    }
}

impl Figure {
    fn check_attachable(&self, kind: ObjectKind, id: ObjectId) -> Result<(), HistoryError> {
        self.expect_kind(id, kind)?;
        if self.contains(kind, id) {
            return Err(HistoryError::AlreadyInFigure(id));
        }
        Ok(())
    }

    /// Append an object to its top-level list. Returns its index.
    pub fn insert(&mut self, kind: ObjectKind, id: ObjectId) -> Result<usize, HistoryError> {
        let end = self.count(kind);
        self.insert_at(kind, end, id)
    }

    /// Insert at `index`, clamped to the list length. Returns the index used.
    pub fn insert_at(
        &mut self,
        kind: ObjectKind,
        index: usize,
        id: ObjectId,
    ) -> Result<usize, HistoryError> {
        self.check_attachable(kind, id)?;
        let list = self.doc.objects.list_mut(kind);
        let index = index.min(list.len());
        list.insert(index, id);
        self.add_object_depth(id);
        Ok(index)
    }

    /// Detach an object from its top-level list. Returns the index it had.
    pub fn remove(&mut self, kind: ObjectKind, id: ObjectId) -> Result<usize, HistoryError> {
        let index = self
            .position(kind, id)
            .ok_or(HistoryError::NotInFigure(id))?;
        self.doc.objects.list_mut(kind).remove(index);
        self.remove_object_depth(id);
        Ok(index)
    }

    pub fn tails(&self) -> ListTails {
        let mut tails = ListTails::default();
        for kind in ObjectKind::ALL {
            tails.lens[slot(kind)] = self.count(kind);
        }
        tails
    }

    fn check_block_attachable(&self, block: &Compound) -> Result<(), HistoryError> {
        for (kind, id) in block.handles() {
            self.check_attachable(kind, id)?;
        }
        Ok(())
    }

    /// Append every list of `block` to the document. Returns the tails the
    /// document had before, so the block can be cut off again.
    pub fn append_objects(&mut self, block: &Compound) -> Result<ListTails, HistoryError> {
        self.check_block_attachable(block)?;
        let tails = self.tails();
        for kind in ObjectKind::ALL {
            self.doc
                .objects
                .list_mut(kind)
                .extend(block.list(kind).iter().copied());
        }
        self.add_compound_depth(block);
        Ok(tails)
    }

    /// Whether the document lists end exactly with `block`, starting at `tails`
    pub fn block_at_tail(&self, tails: ListTails, block: &Compound) -> bool {
        ObjectKind::ALL.into_iter().all(|kind| {
            let list = self.doc.objects.list(kind);
            let from = tails.len(kind);
            from <= list.len() && list[from..] == block.list(kind)[..]
        })
    }

    /// Cut every list back to `tails`, returning what was cut off
    pub fn cut_objects(&mut self, tails: ListTails) -> Compound {
        let mut cut = Compound::default();
        for kind in ObjectKind::ALL {
            let list = self.doc.objects.list_mut(kind);
            let from = tails.len(kind).min(list.len());
            *cut.list_mut(kind) = list.split_off(from);
        }
        self.remove_compound_depth(&cut);
        cut
    }

    /// Detach every object in `block` from wherever it sits. Returns the
    /// index each one had, in `block.handles()` order.
    pub fn delete_objects(&mut self, block: &Compound) -> Result<Vec<usize>, HistoryError> {
        for (kind, id) in block.handles() {
            if !self.contains(kind, id) {
                return Err(HistoryError::NotInFigure(id));
            }
        }
        block
            .handles()
            .map(|(kind, id)| self.remove(kind, id))
            .collect()
    }

    /// Undo [`Figure::delete_objects`]: put every object back at the index
    /// it was removed from. Without matching indices the block is appended.
    pub fn restore_objects(&mut self, block: &Compound, slots: &[usize]) -> Result<(), HistoryError> {
        self.check_block_attachable(block)?;
        if slots.len() != block.len() {
            self.append_objects(block)?;
            return Ok(());
        }
        let handles: Vec<_> = block.handles().collect();
        for ((kind, id), index) in handles.into_iter().zip(slots.iter().copied()).rev() {
            self.insert_at(kind, index, id)?;
        }
        Ok(())
    }

    /// Detach every top-level object, keeping the figure comments
    pub fn take_objects(&mut self) -> Compound {
        self.cut_objects(ListTails::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn figure_with_lines(n: usize) -> (Figure, Vec<ObjectId>) {
        let mut f = Figure::new();
        let ids = (0..n)
            .map(|i| {
                let id = f.alloc(fixtures::polyline(&[(i as i32, 0), (i as i32, 10)], 50));
                f.insert(ObjectKind::Polyline, id).unwrap();
                id
            })
            .collect();
        (f, ids)
    }

    #[test]
    fn test_insert_rejects_duplicates_and_wrong_kind() {
        let (mut f, ids) = figure_with_lines(1);
        assert_eq!(
            f.insert(ObjectKind::Polyline, ids[0]),
            Err(HistoryError::AlreadyInFigure(ids[0]))
        );
        assert!(matches!(
            f.insert(ObjectKind::Ellipse, ids[0]),
            Err(HistoryError::WrongObjectKind { .. })
        ));
        assert_eq!(f.count(ObjectKind::Polyline), 1);
    }

    #[test]
    fn test_remove_returns_index_and_updates_depth() {
        let (mut f, ids) = figure_with_lines(3);
        assert_eq!(f.depths().count(ObjectKind::Polyline, 50), 3);
        assert_eq!(f.remove(ObjectKind::Polyline, ids[1]), Ok(1));
        assert_eq!(f.depths().count(ObjectKind::Polyline, 50), 2);
        assert_eq!(
            f.remove(ObjectKind::Polyline, ids[1]),
            Err(HistoryError::NotInFigure(ids[1]))
        );
    }

    #[test]
    fn test_append_and_cut() {
        let (mut f, _) = figure_with_lines(2);
        let e = f.alloc(fixtures::ellipse_at(0, 0, 5));
        let l = f.alloc(fixtures::polyline(&[(1, 1), (2, 2)], 40));
        let mut block = Compound::single(ObjectKind::Ellipse, e);
        block.lines.push(l);

        let tails = f.append_objects(&block).unwrap();
        assert_eq!(tails.len(ObjectKind::Polyline), 2);
        assert!(f.block_at_tail(tails, &block));
        assert_eq!(f.count(ObjectKind::Polyline), 3);

        let cut = f.cut_objects(tails);
        assert_eq!(cut.lines, vec![l]);
        assert_eq!(cut.ellipses, vec![e]);
        assert_eq!(f.count(ObjectKind::Polyline), 2);
        assert_eq!(f.depths().count(ObjectKind::Polyline, 40), 0);
    }

    #[test]
    fn test_delete_and_restore_positions() {
        let (mut f, ids) = figure_with_lines(5);
        let mut block = Compound::default();
        block.lines = vec![ids[3], ids[0]];
        let slots = f.delete_objects(&block).unwrap();
        assert_eq!(slots, vec![3, 0]);

        f.restore_objects(&block, &slots).unwrap();
        assert_eq!(f.objects().lines, ids);
        assert_eq!(f.depths().count(ObjectKind::Polyline, 50), 5);
    }

    #[test]
    fn test_delete_objects_is_all_or_nothing() {
        let (mut f, ids) = figure_with_lines(2);
        let stray = f.alloc(fixtures::polyline(&[(0, 0), (1, 1)], 50));
        let mut block = Compound::default();
        block.lines = vec![ids[0], stray];
        assert_eq!(
            f.delete_objects(&block),
            Err(HistoryError::NotInFigure(stray))
        );
        assert_eq!(f.objects().lines, ids);
    }
}
