//! Draw-order accounting for the layer panel

use std::collections::BTreeMap;

use shared::{Compound, ObjectId, ObjectKind, Shape};

use super::Figure;

/// How many objects of each kind sit at each depth
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthCounts {
    counts: BTreeMap<(ObjectKind, i32), usize>,
}

impl DepthCounts {
    pub fn add(&mut self, kind: ObjectKind, depth: i32) {
        *self.counts.entry((kind, depth)).or_insert(0) += 1;
    }

    pub fn remove(&mut self, kind: ObjectKind, depth: i32) {
        if let Some(n) = self.counts.get_mut(&(kind, depth)) {
            *n -= 1;
            if *n == 0 {
                self.counts.remove(&(kind, depth));
            }
        } else {
            tracing::warn!(kind = kind.name(), depth, "depth counter underflow");
        }
    }

    pub fn count(&self, kind: ObjectKind, depth: i32) -> usize {
        self.counts.get(&(kind, depth)).copied().unwrap_or(0)
    }

    /// Objects of `kind` across all depths
    pub fn total(&self, kind: ObjectKind) -> usize {
        self.counts
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, n)| *n)
            .sum()
    }

    /// Depths in use, shallowest first
    pub fn layers(&self) -> Vec<i32> {
        let mut layers: Vec<i32> = self.counts.keys().map(|(_, d)| *d).collect();
        layers.sort_unstable();
        layers.dedup();
        layers
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

fn account_object(
    slots: &[Option<Shape>],
    depths: &mut DepthCounts,
    id: ObjectId,
    add: bool,
) {
    match slots.get(id.index()).and_then(Option::as_ref) {
        Some(Shape::Compound(members)) => account_block(slots, depths, members, add),
        Some(shape) => {
            if let Some(depth) = shape.depth() {
                if add {
                    depths.add(shape.kind(), depth);
                } else {
                    depths.remove(shape.kind(), depth);
                }
            }
        }
        None => tracing::warn!(%id, "depth accounting on a freed object"),
    }
}

fn account_block(slots: &[Option<Shape>], depths: &mut DepthCounts, block: &Compound, add: bool) {
    for (_, id) in block.handles() {
        account_object(slots, depths, id, add);
    }
}

impl Figure {
    /// Count an object (every member, for compounds) in the depth counters
    pub fn add_object_depth(&mut self, id: ObjectId) {
        account_object(&self.slots, &mut self.doc.depths, id, true);
    }

    pub fn remove_object_depth(&mut self, id: ObjectId) {
        account_object(&self.slots, &mut self.doc.depths, id, false);
    }

    pub fn add_compound_depth(&mut self, block: &Compound) {
        account_block(&self.slots, &mut self.doc.depths, block, true);
    }

    pub fn remove_compound_depth(&mut self, block: &Compound) {
        account_block(&self.slots, &mut self.doc.depths, block, false);
    }

    /// Rebuild the counters from scratch for the current document
    pub fn recount_depths(&mut self) {
        let mut depths = DepthCounts::default();
        account_block(&self.slots, &mut depths, &self.doc.objects, true);
        self.doc.depths = depths;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_add_remove() {
        let mut d = DepthCounts::default();
        d.add(ObjectKind::Spline, 3);
        d.add(ObjectKind::Spline, 3);
        d.add(ObjectKind::Polyline, 5);
        assert_eq!(d.count(ObjectKind::Spline, 3), 2);
        assert_eq!(d.total(ObjectKind::Spline), 2);
        assert_eq!(d.layers(), vec![3, 5]);

        d.remove(ObjectKind::Spline, 3);
        d.remove(ObjectKind::Spline, 3);
        assert_eq!(d.count(ObjectKind::Spline, 3), 0);
        assert_eq!(d.layers(), vec![5]);
    }

    #[test]
    fn test_compound_depth_recurses() {
        let mut f = Figure::new();
        let a = f.alloc(fixtures::ellipse_at(0, 0, 40));
        let b = f.alloc(fixtures::polyline(&[(0, 0), (5, 5)], 41));
        let mut inner = Compound::single(ObjectKind::Ellipse, a);
        inner.lines.push(b);
        let c = f.alloc(Shape::Compound(inner));

        f.add_object_depth(c);
        assert_eq!(f.depths().count(ObjectKind::Ellipse, 40), 1);
        assert_eq!(f.depths().count(ObjectKind::Polyline, 41), 1);
        assert_eq!(f.depths().total(ObjectKind::Compound), 0);

        f.remove_object_depth(c);
        assert!(f.depths().is_empty());
    }
}
