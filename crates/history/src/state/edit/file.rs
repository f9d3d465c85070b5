//! Figure contents as loaded from disk or a command script

use serde::{Deserialize, Serialize};
use shared::{Compound, ObjectId, ObjectKind, Rgb, Shape};

use crate::error::HistoryError;
use crate::state::figure::Figure;

/// An object to create: a plain shape or a group of further specs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectSpec {
    Group {
        members: Vec<ObjectSpec>,
        #[serde(default)]
        comments: Option<String>,
    },
    Shape(Shape),
}

/// A whole document to load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FigureFile {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub colors: Vec<Rgb>,
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
}

impl Figure {
    /// Allocate detached slots for a spec tree. Returns the root handle.
    pub fn alloc_spec(&mut self, spec: ObjectSpec) -> Result<(ObjectKind, ObjectId), HistoryError> {
        match spec {
            ObjectSpec::Shape(Shape::Compound(_)) => Err(HistoryError::InvalidEdit(
                "compounds must be given as member groups".into(),
            )),
            ObjectSpec::Shape(shape) => Ok((shape.kind(), self.alloc(shape))),
            ObjectSpec::Group { members, comments } => {
                let block = self.alloc_block(members)?;
                let mut group = Compound { comments, ..block };
                if let Some(b) = self.compound_bounds(&group) {
                    group.nw_corner = b.min;
                    group.se_corner = b.max;
                }
                Ok((ObjectKind::Compound, self.alloc(Shape::Compound(group))))
            }
        }
    }

    /// Allocate every spec, collecting the handles into one block
    pub fn alloc_block(&mut self, specs: Vec<ObjectSpec>) -> Result<Compound, HistoryError> {
        let mut block = Compound::default();
        for spec in specs {
            let (kind, id) = self.alloc_spec(spec)?;
            block.list_mut(kind).push(id);
        }
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_groups() {
        let json = r#"{
            "filename": "a.fig",
            "objects": [
                {"type": "ellipse", "depth": 50, "center": {"x": 0, "y": 0}, "radii": {"x": 10, "y": 5}},
                {"members": [
                    {"type": "text", "depth": 40, "size": 12.0, "base": {"x": 3, "y": 4}, "string": "hi"}
                ]}
            ]
        }"#;
        let file: FigureFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.objects.len(), 2);

        let mut figure = Figure::new();
        let block = figure.alloc_block(file.objects).unwrap();
        assert_eq!(block.ellipses.len(), 1);
        let group = figure.compound(block.compounds[0]).unwrap();
        assert_eq!(group.texts.len(), 1);
        assert!(figure.live_objects().is_empty());
    }

    #[test]
    fn test_raw_compound_rejected() {
        let mut figure = Figure::new();
        let err = figure
            .alloc_spec(ObjectSpec::Shape(Shape::Compound(Compound::default())))
            .unwrap_err();
        assert!(matches!(err, HistoryError::InvalidEdit(_)));
    }
}
