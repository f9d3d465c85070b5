//! JSON command protocol for scripted editing sessions.
//!
//! Every editing command records one history step; `undo` and `redo` walk
//! the history.

use serde::{Deserialize, Serialize};
use shared::{Arrow, ObjectId, ObjectKind, Point, Shape};

use crate::harness::TestHarness;
use crate::state::edit::ObjectSpec;
use crate::state::history::{ArrowEnd, Side};
use crate::state::{FigureFile, LinkMode};

/// A command a script can execute
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditCommand {
    /// Add one object
    AddObject { shape: Shape },
    /// Append several objects, groups included, as one step
    AddObjects { objects: Vec<ObjectSpec> },
    DeleteObject { id: ObjectId },
    /// Remove every object, keeping comments and colors
    DeleteAll,
    /// Remove objects, comments and colors
    ClearFigure,
    MoveObject { id: ObjectId, dx: i32, dy: i32 },
    /// Change the depth of an object
    SetDepth { id: ObjectId, depth: i32 },
    /// Replace the comments of an object, or of the figure without `id`
    EditComments {
        #[serde(default)]
        id: Option<ObjectId>,
        #[serde(default)]
        comments: Option<String>,
    },
    ScaleObject {
        id: ObjectId,
        #[serde(default)]
        origin: Point,
        sx: f64,
        sy: f64,
    },
    Glue { ids: Vec<ObjectId> },
    BreakCompound { id: ObjectId },
    AddPoint {
        id: ObjectId,
        index: usize,
        at: Point,
        #[serde(default)]
        sfactor: Option<f64>,
    },
    DeletePoint { id: ObjectId, index: usize },
    AddArrowhead {
        id: ObjectId,
        end: ArrowEnd,
        #[serde(default)]
        arrow: Arrow,
    },
    DeleteArrowhead { id: ObjectId, end: ArrowEnd },
    OpenClose {
        id: ObjectId,
        #[serde(default)]
        vertex: usize,
    },
    Join { head: ObjectId, tail: ObjectId },
    Split { id: ObjectId, at: usize },
    ConvertLineToSpline { id: ObjectId },
    ConvertSplineToLine { id: ObjectId },
    ToggleBoxCorners {
        id: ObjectId,
        #[serde(default = "default_radius")]
        radius: i32,
    },
    /// Replace the whole figure
    LoadFigure { figure: FigureFile },
    /// How polylines attached to a moved object follow it
    SetLinkMode { mode: LinkMode },
    /// Undo the last edit.
    Undo,
    /// Redo the last undone edit.
    Redo,
    /// Inspect the figure and both history stacks.
    Inspect,
    /// Export the figure as JSON.
    ExportFigure,
}

fn default_radius() -> i32 {
    7
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for CommandResponse {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

fn with_id<E: std::fmt::Display>(result: Result<ObjectId, E>) -> CommandResponse {
    match result {
        Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
        Err(e) => CommandResponse::err(e.to_string()),
    }
}

fn inspect(harness: &TestHarness) -> serde_json::Value {
    let figure = &harness.session.figure;
    let counts: serde_json::Map<String, serde_json::Value> = ObjectKind::ALL
        .iter()
        .map(|kind| (kind.name().to_string(), figure.count(*kind).into()))
        .collect();
    serde_json::json!({
        "filename": figure.filename(),
        "comments": figure.comments(),
        "object_count": harness.object_count(),
        "objects": counts,
        "depths": figure.depths().layers(),
        "undo": harness.labels(Side::Undo),
        "redo": harness.labels(Side::Redo),
        "status": harness.status().map(|s| s.to_string()),
    })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: EditCommand) -> CommandResponse {
    let session = &mut harness.session;
    match cmd {
        EditCommand::AddObject { shape } => with_id(session.add_object(shape)),

        EditCommand::AddObjects { objects } => match session.add_objects(objects) {
            Ok(block) => {
                let ids: Vec<ObjectId> = block.handles().map(|(_, id)| id).collect();
                CommandResponse::ok_with_data(serde_json::json!({ "ids": ids }))
            }
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditCommand::DeleteObject { id } => session.delete_object(id).into(),
        EditCommand::DeleteAll => session.delete_all().into(),
        EditCommand::ClearFigure => session.clear_figure().into(),
        EditCommand::MoveObject { id, dx, dy } => session.move_object(id, dx, dy).into(),

        EditCommand::SetDepth { id, depth } => session
            .change_object(id, |shape| match shape {
                Shape::Polyline(l) => l.depth = depth,
                Shape::Spline(s) => s.depth = depth,
                Shape::Ellipse(e) => e.depth = depth,
                Shape::Arc(a) => a.depth = depth,
                Shape::Text(t) => t.depth = depth,
                Shape::Compound(_) => {}
            })
            .into(),

        EditCommand::EditComments { id, comments } => session.edit_comments(id, comments).into(),

        EditCommand::ScaleObject { id, origin, sx, sy } => {
            with_id(session.scale_object(id, origin, sx, sy))
        }

        EditCommand::Glue { ids } => with_id(session.glue(&ids)),
        EditCommand::BreakCompound { id } => session.break_compound(id).into(),

        EditCommand::AddPoint {
            id,
            index,
            at,
            sfactor,
        } => session.add_point(id, index, at, sfactor).into(),

        EditCommand::DeletePoint { id, index } => match session.delete_point(id, index) {
            Ok((point, sfactor)) => CommandResponse::ok_with_data(serde_json::json!({
                "point": point,
                "sfactor": sfactor,
            })),
            Err(e) => CommandResponse::err(e.to_string()),
        },

        EditCommand::AddArrowhead { id, end, arrow } => {
            session.add_arrowhead(id, end, arrow).into()
        }
        EditCommand::DeleteArrowhead { id, end } => {
            session.delete_arrowhead(id, end).map(|_| ()).into()
        }

        EditCommand::OpenClose { id, vertex } => session.open_close(id, vertex).into(),
        EditCommand::Join { head, tail } => session.join(head, tail).into(),
        EditCommand::Split { id, at } => with_id(session.split(id, at)),
        EditCommand::ConvertLineToSpline { id } => with_id(session.convert_line_to_spline(id)),
        EditCommand::ConvertSplineToLine { id } => with_id(session.convert_spline_to_line(id)),
        EditCommand::ToggleBoxCorners { id, radius } => {
            session.toggle_box_corners(id, radius).into()
        }

        EditCommand::LoadFigure { figure } => session.load_document(figure).into(),

        EditCommand::SetLinkMode { mode } => {
            session.settings.link_mode = mode;
            CommandResponse::ok()
        }

        EditCommand::Undo => {
            let status = session.undo();
            CommandResponse::ok_with_data(serde_json::json!({
                "undone": status.is_complete(),
                "status": status.to_string(),
            }))
        }

        EditCommand::Redo => {
            let status = session.redo();
            CommandResponse::ok_with_data(serde_json::json!({
                "redone": status.is_complete(),
                "status": status.to_string(),
            }))
        }

        EditCommand::Inspect => CommandResponse::ok_with_data(inspect(harness)),

        EditCommand::ExportFigure => {
            let json = harness.export_figure_json();
            CommandResponse::ok_with_data(serde_json::json!({ "figure_json": json }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_undo() {
        let cmd: EditCommand = serde_json::from_str(r#"{"command": "undo"}"#).unwrap();
        assert!(matches!(cmd, EditCommand::Undo));
    }

    #[test]
    fn test_command_serde_add_arrowhead_defaults() {
        let json = r#"{"command": "add_arrowhead", "id": 3, "end": "backward"}"#;
        let cmd: EditCommand = serde_json::from_str(json).unwrap();
        match cmd {
            EditCommand::AddArrowhead { id, end, arrow } => {
                assert_eq!(id, ObjectId(3));
                assert_eq!(end, ArrowEnd::Backward);
                assert_eq!(arrow, Arrow::default());
            }
            _ => panic!("Expected AddArrowhead"),
        }
    }

    #[test]
    fn test_execute_failed_command_reports_error() {
        let mut h = TestHarness::new();
        let resp = execute_command(&mut h, EditCommand::DeleteObject { id: ObjectId(9) });
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("object #9 does not exist"));
    }

    #[test]
    fn test_execute_inspect() {
        let mut h = TestHarness::new();
        h.add_ellipse(0, 0, 50);
        let resp = execute_command(&mut h, EditCommand::Inspect);
        let data = resp.data.unwrap();
        assert_eq!(data["object_count"], 1);
        assert_eq!(data["objects"]["ellipse"], 1);
        assert_eq!(data["undo"][0], "ADD");
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        let err = execute_json(&mut h, "{").unwrap_err();
        assert!(err.contains("Invalid command JSON"));
    }
}
