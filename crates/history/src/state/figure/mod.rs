//! The figure: object arena and the live document.
//!
//! Every object payload lives in an arena slot addressed by a stable
//! [`ObjectId`]. Typed lists (in the document, in compounds and in history
//! records) only hold handles, so exchanging two slots' payloads leaves every
//! list position untouched.

mod depth;
mod geometry;
mod lists;
mod snapshot;

use std::collections::BTreeSet;

use shared::{Compound, Line, ObjectId, ObjectKind, Rgb, Shape, Spline};

use crate::error::HistoryError;

pub use depth::DepthCounts;
pub use geometry::{LinkInfo, LinkMode};
pub use lists::ListTails;
pub use snapshot::{CompoundSnapshot, ObjectSnapshot};

/// Everything that makes up one open figure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Top-level objects and figure comments
    pub objects: Compound,
    /// Per-kind draw-order counters for every object reachable from `objects`
    pub depths: DepthCounts,
    /// User color table
    pub colors: Vec<Rgb>,
    pub filename: String,
}

/// Object arena plus the document currently shown
#[derive(Debug, Default)]
pub struct Figure {
    slots: Vec<Option<Shape>>,
    pub(crate) doc: Document,
    markers: BTreeSet<ObjectId>,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload in a fresh slot. The object is not part of any list yet.
    pub fn alloc(&mut self, shape: Shape) -> ObjectId {
        let id = ObjectId(self.slots.len() as u32);
        self.slots.push(Some(shape));
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&Shape> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn shape(&self, id: ObjectId) -> Result<&Shape, HistoryError> {
        self.get(id).ok_or(HistoryError::MissingObject(id))
    }

    pub fn shape_mut(&mut self, id: ObjectId) -> Result<&mut Shape, HistoryError> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(HistoryError::MissingObject(id))
    }

    /// Kind of the payload in `id`
    pub fn kind_of(&self, id: ObjectId) -> Result<ObjectKind, HistoryError> {
        self.shape(id).map(Shape::kind)
    }

    pub(crate) fn expect_kind(&self, id: ObjectId, kind: ObjectKind) -> Result<(), HistoryError> {
        if self.kind_of(id)? == kind {
            Ok(())
        } else {
            Err(HistoryError::WrongObjectKind { id, expected: kind })
        }
    }

    pub fn line(&self, id: ObjectId) -> Result<&Line, HistoryError> {
        self.shape(id)?.as_line().ok_or(HistoryError::WrongObjectKind {
            id,
            expected: ObjectKind::Polyline,
        })
    }

    pub fn line_mut(&mut self, id: ObjectId) -> Result<&mut Line, HistoryError> {
        self.shape_mut(id)?
            .as_line_mut()
            .ok_or(HistoryError::WrongObjectKind {
                id,
                expected: ObjectKind::Polyline,
            })
    }

    pub fn spline(&self, id: ObjectId) -> Result<&Spline, HistoryError> {
        self.shape(id)?.as_spline().ok_or(HistoryError::WrongObjectKind {
            id,
            expected: ObjectKind::Spline,
        })
    }

    pub fn spline_mut(&mut self, id: ObjectId) -> Result<&mut Spline, HistoryError> {
        self.shape_mut(id)?
            .as_spline_mut()
            .ok_or(HistoryError::WrongObjectKind {
                id,
                expected: ObjectKind::Spline,
            })
    }

    pub fn compound(&self, id: ObjectId) -> Result<&Compound, HistoryError> {
        self.shape(id)?
            .as_compound()
            .ok_or(HistoryError::WrongObjectKind {
                id,
                expected: ObjectKind::Compound,
            })
    }

    /// Top-level objects of the live document
    pub fn objects(&self) -> &Compound {
        &self.doc.objects
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn depths(&self) -> &DepthCounts {
        &self.doc.depths
    }

    pub fn comments(&self) -> Option<&str> {
        self.doc.objects.comments.as_deref()
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.doc.colors
    }

    pub fn filename(&self) -> &str {
        &self.doc.filename
    }

    pub fn swap_comments(&mut self, other: &mut Option<String>) {
        std::mem::swap(&mut self.doc.objects.comments, other);
    }

    pub fn swap_colors(&mut self, other: &mut Vec<Rgb>) {
        std::mem::swap(&mut self.doc.colors, other);
    }

    /// Exchange the whole document (objects, counters, colors, file name)
    pub fn swap_document(&mut self, other: &mut Document) {
        std::mem::swap(&mut self.doc, other);
        self.markers.clear();
    }

    /// Exchange the payloads of two slots. Handles and list positions stay put.
    pub fn swap_payloads(&mut self, a: ObjectId, b: ObjectId) -> Result<(), HistoryError> {
        self.shape(a)?;
        self.shape(b)?;
        self.slots.swap(a.index(), b.index());
        Ok(())
    }

    /// Deep copy into fresh, detached slots. Compound members are copied too.
    pub fn duplicate(&mut self, id: ObjectId) -> Result<ObjectId, HistoryError> {
        let shape = self.shape(id)?.clone();
        let shape = match shape {
            Shape::Compound(members) => {
                let mut copy = Compound {
                    nw_corner: members.nw_corner,
                    se_corner: members.se_corner,
                    comments: members.comments.clone(),
                    ..Compound::default()
                };
                for (kind, member) in members.handles() {
                    let dup = self.duplicate(member)?;
                    copy.list_mut(kind).push(dup);
                }
                Shape::Compound(copy)
            }
            other => other,
        };
        Ok(self.alloc(shape))
    }

    /// Free a slot. Callers must make sure nothing refers to it any more.
    pub(crate) fn release(&mut self, id: ObjectId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            *slot = None;
        }
        self.markers.remove(&id);
    }

    /// Number of occupied arena slots
    pub fn allocated(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Add every handle reachable from `compound`, nested members included
    pub fn collect_handles(&self, compound: &Compound, out: &mut BTreeSet<ObjectId>) {
        for (_, id) in compound.handles() {
            self.collect_object(id, out);
        }
    }

    pub(crate) fn collect_object(&self, id: ObjectId, out: &mut BTreeSet<ObjectId>) {
        if !out.insert(id) {
            return;
        }
        if let Some(Shape::Compound(members)) = self.get(id) {
            self.collect_handles(members, out);
        }
    }

    /// Handles reachable from the live document
    pub fn live_objects(&self) -> BTreeSet<ObjectId> {
        let mut out = BTreeSet::new();
        self.collect_handles(&self.doc.objects, &mut out);
        out
    }

    /// Whether `id` sits in the top-level list for `kind`
    pub fn contains(&self, kind: ObjectKind, id: ObjectId) -> bool {
        self.doc.objects.contains(kind, id)
    }

    pub fn position(&self, kind: ObjectKind, id: ObjectId) -> Option<usize> {
        self.doc.objects.list(kind).iter().position(|h| *h == id)
    }

    /// Number of top-level objects of a kind
    pub fn count(&self, kind: ObjectKind) -> usize {
        self.doc.objects.list(kind).len()
    }

    // ── Selection markers ─────────────────────────────────────

    pub fn set_marked(&mut self, id: ObjectId, on: bool) {
        if on {
            self.markers.insert(id);
        } else {
            self.markers.remove(&id);
        }
    }

    pub fn is_marked(&self, id: ObjectId) -> bool {
        self.markers.contains(&id)
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
    }

    /// Show or hide the markers of every direct member of a compound
    pub fn mark_members(&mut self, members: &Compound, on: bool) {
        for (_, id) in members.handles() {
            self.set_marked(id, on);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_alloc_is_detached() {
        let mut f = Figure::new();
        let id = f.alloc(fixtures::ellipse_at(10, 10, 50));
        assert!(f.get(id).is_some());
        assert!(!f.contains(ObjectKind::Ellipse, id));
        assert!(f.live_objects().is_empty());
    }

    #[test]
    fn test_swap_payloads_keeps_positions() {
        let mut f = Figure::new();
        let a = f.alloc(fixtures::polyline(&[(0, 0), (10, 0)], 10));
        let b = f.alloc(fixtures::polyline(&[(5, 5), (6, 6), (7, 7)], 20));
        f.insert(ObjectKind::Polyline, a).unwrap();
        f.insert(ObjectKind::Polyline, b).unwrap();

        f.swap_payloads(a, b).unwrap();
        assert_eq!(f.objects().lines, vec![a, b]);
        assert_eq!(f.line(a).unwrap().depth, 20);
        assert_eq!(f.line(b).unwrap().points.len(), 2);
    }

    #[test]
    fn test_duplicate_compound_is_deep() {
        let mut f = Figure::new();
        let e = f.alloc(fixtures::ellipse_at(0, 0, 30));
        let c = f.alloc(Shape::Compound(Compound::single(ObjectKind::Ellipse, e)));
        let dup = f.duplicate(c).unwrap();
        let inner = f.compound(dup).unwrap().ellipses[0];
        assert_ne!(inner, e);
        assert_eq!(f.get(inner), f.get(e));
    }

    #[test]
    fn test_wrong_kind_accessors() {
        let mut f = Figure::new();
        let e = f.alloc(fixtures::ellipse_at(0, 0, 30));
        assert_eq!(
            f.line(e).unwrap_err(),
            HistoryError::WrongObjectKind {
                id: e,
                expected: ObjectKind::Polyline
            }
        );
        assert_eq!(
            f.shape(ObjectId(99)).unwrap_err(),
            HistoryError::MissingObject(ObjectId(99))
        );
    }

    #[test]
    fn test_release_frees_slot() {
        let mut f = Figure::new();
        let e = f.alloc(fixtures::ellipse_at(0, 0, 30));
        f.set_marked(e, true);
        f.release(e);
        assert!(f.get(e).is_none());
        assert!(!f.is_marked(e));
        assert_eq!(f.allocated(), 0);
    }
}
