//! Handle-free copy of a compound, for comparisons and export

use serde::Serialize;
use shared::{Compound, ObjectKind, Shape};

use super::Figure;

/// One resolved object. Nested compounds are resolved too.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObjectSnapshot {
    Group(CompoundSnapshot),
    Leaf(Shape),
}

/// A compound with every handle replaced by the payload it points at.
///
/// Two figures compare equal when their snapshots do, whatever handles they use.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CompoundSnapshot {
    pub lines: Vec<ObjectSnapshot>,
    pub splines: Vec<ObjectSnapshot>,
    pub ellipses: Vec<ObjectSnapshot>,
    pub arcs: Vec<ObjectSnapshot>,
    pub texts: Vec<ObjectSnapshot>,
    pub compounds: Vec<ObjectSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl CompoundSnapshot {
    fn list_mut(&mut self, kind: ObjectKind) -> &mut Vec<ObjectSnapshot> {
        match kind {
            ObjectKind::Polyline => &mut self.lines,
            ObjectKind::Spline => &mut self.splines,
            ObjectKind::Ellipse => &mut self.ellipses,
            ObjectKind::Arc => &mut self.arcs,
            ObjectKind::Text => &mut self.texts,
            ObjectKind::Compound => &mut self.compounds,
        }
    }
}

impl Figure {
    pub fn resolve(&self, block: &Compound) -> CompoundSnapshot {
        let mut snap = CompoundSnapshot {
            comments: block.comments.clone(),
            ..CompoundSnapshot::default()
        };
        for (kind, id) in block.handles() {
            let resolved = match self.get(id) {
                Some(Shape::Compound(members)) => ObjectSnapshot::Group(self.resolve(members)),
                Some(shape) => ObjectSnapshot::Leaf(shape.clone()),
                None => {
                    tracing::warn!(%id, "snapshot of a freed object");
                    continue;
                }
            };
            snap.list_mut(kind).push(resolved);
        }
        snap
    }

    /// Snapshot of the live document
    pub fn snapshot(&self) -> CompoundSnapshot {
        self.resolve(&self.doc.objects)
    }
}
