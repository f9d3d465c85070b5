//! Shape conversions

use shared::{Line, LineKind, ObjectId, ObjectKind, Shape, Spline, SplineKind};

use crate::error::HistoryError;
use crate::state::history::{ActionKind, Target};
use crate::state::EditorSession;

fn line_to_spline(line: &Line) -> Result<Spline, HistoryError> {
    let (kind, points) = match line.kind {
        LineKind::Polyline => (SplineKind::OpenX, line.points.clone()),
        // drop the closing vertex
        LineKind::Polygon => (
            SplineKind::ClosedX,
            line.points[..line.points.len().saturating_sub(1)].to_vec(),
        ),
        other => {
            return Err(HistoryError::InvalidEdit(format!(
                "a {other:?} cannot become a spline"
            )))
        }
    };
    let mut sfactors = vec![kind.default_sfactor(); points.len()];
    if !kind.is_closed() {
        if let Some(first) = sfactors.first_mut() {
            *first = 0.0;
        }
        if let Some(last) = sfactors.last_mut() {
            *last = 0.0;
        }
    }
    Ok(Spline {
        kind,
        depth: line.depth,
        style: line.style,
        points,
        sfactors,
        for_arrow: line.for_arrow,
        back_arrow: line.back_arrow,
        comments: line.comments.clone(),
    })
}

fn spline_to_line(spline: &Spline) -> Line {
    let mut points = spline.points.clone();
    let kind = if spline.kind.is_closed() {
        if let Some(&first) = points.first() {
            points.push(first);
        }
        LineKind::Polygon
    } else {
        LineKind::Polyline
    };
    Line {
        kind,
        depth: spline.depth,
        style: spline.style,
        radius: 0,
        points,
        for_arrow: spline.for_arrow,
        back_arrow: spline.back_arrow,
        comments: spline.comments.clone(),
    }
}

impl EditorSession {
    /// Replace a polyline or polygon with an X-spline through its vertices
    pub fn convert_line_to_spline(&mut self, id: ObjectId) -> Result<ObjectId, HistoryError> {
        if !self.figure.contains(ObjectKind::Polyline, id) {
            return Err(HistoryError::NotInFigure(id));
        }
        let spline = line_to_spline(self.figure.line(id)?)?;
        self.replace_converted(ObjectKind::Polyline, id, Shape::Spline(spline))
    }

    /// Replace a spline with the polyline or polygon through its control points
    pub fn convert_spline_to_line(&mut self, id: ObjectId) -> Result<ObjectId, HistoryError> {
        if !self.figure.contains(ObjectKind::Spline, id) {
            return Err(HistoryError::NotInFigure(id));
        }
        let line = spline_to_line(self.figure.spline(id)?);
        self.replace_converted(ObjectKind::Spline, id, Shape::Polyline(line))
    }

    fn replace_converted(
        &mut self,
        kind: ObjectKind,
        id: ObjectId,
        converted: Shape,
    ) -> Result<ObjectId, HistoryError> {
        let before = self.figure.bounds(id);
        let new_kind = converted.kind();
        let new_id = self.figure.alloc(converted);
        let slot = self.figure.remove(kind, id)?;
        self.figure.insert(new_kind, new_id)?;
        self.figure.set_marked(id, false);

        self.set_action_object(ActionKind::Convert, Target::Object(kind));
        self.set_latest_object(kind, id);
        self.set_changed_object(new_id);
        self.set_list_slot(slot);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(new_id));
        Ok(new_id)
    }

    /// Round the corners of a box with `radius`, or square an arc box
    pub fn toggle_box_corners(&mut self, id: ObjectId, radius: i32) -> Result<(), HistoryError> {
        if !self.figure.contains(ObjectKind::Polyline, id) {
            return Err(HistoryError::NotInFigure(id));
        }
        let before = self.figure.bounds(id);
        let line = self.figure.line_mut(id)?;
        let (kind, radius) = match line.kind {
            LineKind::Box => (LineKind::ArcBox, radius.max(1)),
            LineKind::ArcBox => (LineKind::Box, 0),
            _ => return Err(HistoryError::InvalidEdit(format!("object {id} is not a box"))),
        };
        line.kind = kind;
        let old = std::mem::replace(&mut line.radius, radius);

        self.set_action_object(ActionKind::Convert, Target::Object(ObjectKind::Polyline));
        self.set_latest_line(id);
        self.set_last_radius(old);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_polygon_becomes_closed_spline() {
        let Shape::Polyline(mut square) = fixtures::polyline(&[(0, 0), (10, 0), (10, 10), (0, 0)], 50)
        else {
            unreachable!()
        };
        square.kind = LineKind::Polygon;
        let spline = line_to_spline(&square).unwrap();
        assert_eq!(spline.kind, SplineKind::ClosedX);
        assert_eq!(spline.points.len(), 3);
        assert!(spline.sfactors.iter().all(|&s| s == -1.0));

        let back = spline_to_line(&spline);
        assert_eq!(back.kind, LineKind::Polygon);
        assert_eq!(back.points, square.points);
    }

    #[test]
    fn test_open_spline_endpoints_are_sharp() {
        let Shape::Polyline(line) = fixtures::polyline(&[(0, 0), (5, 5), (10, 0)], 50) else {
            unreachable!()
        };
        let spline = line_to_spline(&line).unwrap();
        assert_eq!(spline.sfactors, vec![0.0, -1.0, 0.0]);
    }

    #[test]
    fn test_toggle_box_corners_round_trip() {
        let mut session = EditorSession::new();
        let id = session.add_object(fixtures::rect_box(0, 0, 20, 20, 50)).unwrap();
        session.toggle_box_corners(id, 4).unwrap();
        assert_eq!(session.figure.line(id).unwrap().kind, LineKind::ArcBox);
        assert_eq!(session.figure.line(id).unwrap().radius, 4);

        session.undo();
        let line = session.figure.line(id).unwrap();
        assert_eq!((line.kind, line.radius), (LineKind::Box, 0));
        session.redo();
        assert_eq!(session.figure.line(id).unwrap().radius, 4);
    }
}
