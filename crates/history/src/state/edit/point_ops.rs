//! Vertex, arrowhead, open/close, join and split commands

use shared::{Arrow, LineKind, ObjectId, ObjectKind, Point, Shape};

use crate::error::HistoryError;
use crate::state::history::{toggle_open_closed, ActionKind, ArrowEnd, OpenClose, Target};
use crate::state::EditorSession;

fn neighbors(points: &[Point], prev: Option<usize>, next: usize) -> (Option<Point>, Option<Point>) {
    (prev.map(|i| points[i]), points.get(next).copied())
}

fn out_of_range(id: ObjectId, index: usize) -> HistoryError {
    HistoryError::PointOutOfRange { id, index }
}

impl EditorSession {
    /// Insert a vertex before `index`. Splines take `sfactor`, or their
    /// family default. A polygon given index 0 is re-closed on the new vertex.
    pub fn add_point(
        &mut self,
        id: ObjectId,
        index: usize,
        at: Point,
        sfactor: Option<f64>,
    ) -> Result<(), HistoryError> {
        let before = self.figure.bounds(id);
        let (kind, prev, next, sfactor) = match self.figure.shape_mut(id)? {
            Shape::Polyline(line) => {
                let len = line.points.len();
                let fits = match line.kind {
                    LineKind::Polyline => index <= len,
                    LineKind::Polygon => index < len,
                    _ => false,
                };
                if !fits {
                    return Err(out_of_range(id, index));
                }
                line.points.insert(index, at);
                if index == 0 && line.kind == LineKind::Polygon {
                    // re-close on the new first vertex
                    if let Some(last) = line.points.last_mut() {
                        *last = at;
                    }
                }
                let (prev, next) = neighbors(&line.points, index.checked_sub(1), index + 1);
                (ObjectKind::Polyline, prev, next, None)
            }
            Shape::Spline(spline) => {
                if index > spline.points.len() || spline.sfactors.len() != spline.points.len() {
                    return Err(out_of_range(id, index));
                }
                let s = sfactor.unwrap_or_else(|| spline.kind.default_sfactor());
                spline.points.insert(index, at);
                spline.sfactors.insert(index, s);
                let (prev, next) = neighbors(&spline.points, index.checked_sub(1), index + 1);
                (ObjectKind::Spline, prev, next, Some(s))
            }
            _ => {
                return Err(HistoryError::WrongObjectKind {
                    id,
                    expected: ObjectKind::Polyline,
                })
            }
        };

        self.set_action_object(ActionKind::AddPoint, Target::Object(kind));
        self.set_latest_object(kind, id);
        self.set_last_prev_point(prev);
        self.set_last_selected_point(index, at);
        self.set_last_next_point(next);
        self.set_last_selected_sfactor(sfactor);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(id));
        Ok(())
    }

    /// Remove the vertex at `index`. Returns it with its shape factor.
    /// Removing a polygon's first vertex re-closes it on the next one.
    pub fn delete_point(
        &mut self,
        id: ObjectId,
        index: usize,
    ) -> Result<(Point, Option<f64>), HistoryError> {
        let before = self.figure.bounds(id);
        let (kind, removed, prev, next, sfactor) = match self.figure.shape_mut(id)? {
            Shape::Polyline(line) => {
                let len = line.points.len();
                let fits = match line.kind {
                    LineKind::Polyline => len > 2 && index < len,
                    LineKind::Polygon => len > 4 && index < len - 1,
                    _ => false,
                };
                if !fits {
                    return Err(out_of_range(id, index));
                }
                let removed = line.points.remove(index);
                if index == 0 && line.kind == LineKind::Polygon {
                    let first = line.points[0];
                    if let Some(last) = line.points.last_mut() {
                        *last = first;
                    }
                }
                let (prev, next) = neighbors(&line.points, index.checked_sub(1), index);
                (ObjectKind::Polyline, removed, prev, next, None)
            }
            Shape::Spline(spline) => {
                let len = spline.points.len();
                let min = if spline.kind.is_closed() { 3 } else { 2 };
                if len <= min || index >= len || spline.sfactors.len() != len {
                    return Err(out_of_range(id, index));
                }
                let removed = spline.points.remove(index);
                let s = spline.sfactors.remove(index);
                let (prev, next) = neighbors(&spline.points, index.checked_sub(1), index);
                (ObjectKind::Spline, removed, prev, next, Some(s))
            }
            _ => {
                return Err(HistoryError::WrongObjectKind {
                    id,
                    expected: ObjectKind::Polyline,
                })
            }
        };

        self.set_action_object(ActionKind::DeletePoint, Target::Object(kind));
        self.set_latest_object(kind, id);
        self.set_last_prev_point(prev);
        self.set_last_selected_point(index, removed);
        self.set_last_next_point(next);
        self.set_last_selected_sfactor(sfactor);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(id));
        Ok((removed, sfactor))
    }

    fn arrow_slot(
        &mut self,
        id: ObjectId,
        end: ArrowEnd,
    ) -> Result<(ObjectKind, &mut Option<Arrow>), HistoryError> {
        let shape = self.figure.shape_mut(id)?;
        let kind = shape.kind();
        let closed = match &*shape {
            Shape::Polyline(l) => l.kind != LineKind::Polyline,
            Shape::Spline(s) => s.kind.is_closed(),
            _ => false,
        };
        let Some((forward, backward)) = shape.arrows_mut().filter(|_| !closed) else {
            return Err(HistoryError::InvalidEdit(format!(
                "object {id} cannot carry arrowheads"
            )));
        };
        let slot = match end {
            ArrowEnd::Forward => forward,
            ArrowEnd::Backward => backward,
        };
        Ok((kind, slot))
    }

    fn stage_arrow(&mut self, action: ActionKind, kind: ObjectKind, id: ObjectId, end: ArrowEnd, arrow: Arrow) {
        self.set_action_object(action, Target::Object(kind));
        self.set_latest_object(kind, id);
        match end {
            ArrowEnd::Forward => self.set_last_arrows(Some(arrow), None),
            ArrowEnd::Backward => self.set_last_arrows(None, Some(arrow)),
        }
        if kind == ObjectKind::Arc {
            self.set_last_arc_point_num(match end {
                ArrowEnd::Forward => 2,
                ArrowEnd::Backward => 0,
            });
        }
    }

    pub fn add_arrowhead(&mut self, id: ObjectId, end: ArrowEnd, arrow: Arrow) -> Result<(), HistoryError> {
        let before = self.figure.bounds(id);
        let (kind, slot) = self.arrow_slot(id, end)?;
        if slot.is_some() {
            return Err(HistoryError::InvalidEdit(format!(
                "object {id} already has a {end} arrowhead"
            )));
        }
        *slot = Some(arrow);

        self.stage_arrow(ActionKind::AddArrowHead, kind, id, end, arrow);
        self.undo_update_history()?;
        self.redisplay.regions(before, self.figure.bounds(id));
        Ok(())
    }

    pub fn delete_arrowhead(&mut self, id: ObjectId, end: ArrowEnd) -> Result<Arrow, HistoryError> {
        let before = self.figure.bounds(id);
        let (kind, slot) = self.arrow_slot(id, end)?;
        let arrow = slot.take().ok_or_else(|| {
            HistoryError::InvalidEdit(format!("object {id} has no {end} arrowhead"))
        })?;

        self.stage_arrow(ActionKind::DeleteArrowHead, kind, id, end, arrow);
        self.undo_update_history()?;
        self.redisplay.regions(before, self.figure.bounds(id));
        Ok(arrow)
    }

    /// Close an open polyline or spline, or open a closed one at `vertex`
    pub fn open_close(&mut self, id: ObjectId, vertex: usize) -> Result<(), HistoryError> {
        let before = self.figure.bounds(id);
        let (kind, at, tension) = match self.figure.shape(id)? {
            Shape::Polyline(l) => (ObjectKind::Polyline, l.points.get(vertex).copied(), None),
            Shape::Spline(s) => {
                let tension = if s.kind.is_closed() {
                    (0.0, 0.0)
                } else {
                    let d = s.kind.default_sfactor();
                    (d, d)
                };
                (ObjectKind::Spline, s.points.get(vertex).copied(), Some(tension))
            }
            _ => {
                return Err(HistoryError::WrongObjectKind {
                    id,
                    expected: ObjectKind::Polyline,
                })
            }
        };
        let mut edit = OpenClose {
            target: id,
            vertex,
            arrows: (None, None),
            tension,
        };
        toggle_open_closed(&mut self.figure, &mut edit)?;

        self.set_action_object(ActionKind::OpenClose, Target::Object(kind));
        self.set_latest_object(kind, id);
        self.set_last_selected_point(vertex, at.unwrap_or_default());
        self.set_last_arrows(edit.arrows.0, edit.arrows.1);
        self.set_last_tension(edit.tension);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(id));
        Ok(())
    }

    fn require_open_path(&self, id: ObjectId) -> Result<ObjectKind, HistoryError> {
        let kind = self.figure.kind_of(id)?;
        if !self.figure.contains(kind, id) {
            return Err(HistoryError::NotInFigure(id));
        }
        let open = match self.figure.shape(id)? {
            Shape::Polyline(l) => l.kind == LineKind::Polyline,
            Shape::Spline(s) => !s.kind.is_closed(),
            _ => {
                return Err(HistoryError::WrongObjectKind {
                    id,
                    expected: ObjectKind::Polyline,
                })
            }
        };
        if !open {
            return Err(HistoryError::InvalidEdit(format!("object {id} is closed")));
        }
        Ok(kind)
    }

    /// Append `tail` to the end of `head`; `tail` leaves the figure
    pub fn join(&mut self, head: ObjectId, tail: ObjectId) -> Result<(), HistoryError> {
        if head == tail {
            return Err(HistoryError::InvalidEdit("cannot join an object to itself".into()));
        }
        let kind = self.require_open_path(head)?;
        if self.require_open_path(tail)? != kind {
            return Err(HistoryError::WrongObjectKind {
                id: tail,
                expected: kind,
            });
        }
        let joined = join_shapes(self.figure.shape(head)?, self.figure.shape(tail)?);

        let before = self.figure.bounds(head).into_iter().chain(self.figure.bounds(tail)).reduce(shared::BoundingBox::union);
        let original = self.figure.alloc(self.figure.shape(head)?.clone());
        let slot = self.figure.remove(kind, tail)?;
        *self.figure.shape_mut(head)? = joined;

        self.set_action_object(ActionKind::Join, Target::Object(kind));
        self.set_latest_object(kind, original);
        match kind {
            ObjectKind::Spline => self.set_latest_spline_var(head),
            _ => self.set_latest_line_var(head),
        }
        self.set_latest_partner(tail);
        self.set_list_slot(slot);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(head));
        Ok(())
    }

    /// Cut an open path at vertex `at`; the second half becomes a new object
    pub fn split(&mut self, id: ObjectId, at: usize) -> Result<ObjectId, HistoryError> {
        let kind = self.require_open_path(id)?;
        let len = self.figure.shape(id)?.vertices().map_or(0, Vec::len);
        if at == 0 || at + 1 >= len {
            return Err(out_of_range(id, at));
        }
        let (kept, rest) = split_shape(self.figure.shape(id)?, at);

        let before = self.figure.bounds(id);
        let original = self.figure.alloc(self.figure.shape(id)?.clone());
        *self.figure.shape_mut(id)? = kept;
        let partner = self.figure.alloc(rest);
        let slot = self.figure.insert(kind, partner)?;

        self.set_action_object(ActionKind::Split, Target::Object(kind));
        self.set_latest_object(kind, original);
        match kind {
            ObjectKind::Spline => self.set_latest_spline_var(id),
            _ => self.set_latest_line_var(id),
        }
        self.set_latest_partner(partner);
        self.set_list_slot(slot);
        self.undo_update_history()?;

        self.redisplay.regions(before, self.figure.bounds(id));
        if let Some(region) = self.figure.bounds(partner) {
            self.redisplay.region(region);
        }
        Ok(partner)
    }
}

/// `head` followed by `tail`, sharing the joint vertex when both meet there
fn join_shapes(head: &Shape, tail: &Shape) -> Shape {
    let mut joined = head.clone();
    match (&mut joined, tail) {
        (Shape::Polyline(a), Shape::Polyline(b)) => {
            let skip = usize::from(a.points.last() == b.points.first());
            a.points.extend(b.points.iter().skip(skip));
            a.for_arrow = b.for_arrow;
        }
        (Shape::Spline(a), Shape::Spline(b)) => {
            let skip = usize::from(a.points.last() == b.points.first());
            if skip == 0 {
                // the old endpoints become interior vertices
                let d = a.kind.default_sfactor();
                if let Some(last) = a.sfactors.last_mut() {
                    *last = d;
                }
                a.points.extend(b.points.iter());
                a.sfactors.push(d);
                a.sfactors.extend(b.sfactors.iter().skip(1));
            } else {
                if let Some(last) = a.sfactors.last_mut() {
                    *last = a.kind.default_sfactor();
                }
                a.points.extend(b.points.iter().skip(1));
                a.sfactors.extend(b.sfactors.iter().skip(1));
            }
            a.for_arrow = b.for_arrow;
        }
        _ => {}
    }
    joined
}

/// Halves of an open path cut at vertex `at`, which both halves keep
fn split_shape(shape: &Shape, at: usize) -> (Shape, Shape) {
    let mut kept = shape.clone();
    let mut rest = shape.clone();
    match (&mut kept, &mut rest) {
        (Shape::Polyline(a), Shape::Polyline(b)) => {
            a.points.truncate(at + 1);
            b.points.drain(..at);
            a.for_arrow = None;
            b.back_arrow = None;
            b.comments = None;
        }
        (Shape::Spline(a), Shape::Spline(b)) => {
            a.points.truncate(at + 1);
            a.sfactors.truncate(at + 1);
            b.points.drain(..at);
            b.sfactors.drain(..at);
            if let Some(last) = a.sfactors.last_mut() {
                *last = 0.0;
            }
            if let Some(first) = b.sfactors.first_mut() {
                *first = 0.0;
            }
            a.for_arrow = None;
            b.back_arrow = None;
            b.comments = None;
        }
        _ => {}
    }
    (kept, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use shared::SplineKind;

    #[test]
    fn test_join_shares_meeting_vertex() {
        let a = fixtures::polyline(&[(0, 0), (10, 0)], 50);
        let b = fixtures::polyline(&[(10, 0), (10, 10)], 50);
        let joined = join_shapes(&a, &b);
        assert_eq!(joined.vertices().unwrap().len(), 3);
    }

    #[test]
    fn test_split_keeps_cut_vertex_in_both() {
        let s = fixtures::open_spline(&[(0, 0), (5, 5), (10, 0), (15, 5)], 50);
        let (kept, rest) = split_shape(&s, 2);
        let (Shape::Spline(k), Shape::Spline(r)) = (kept, rest) else {
            panic!("split changed the kind");
        };
        assert_eq!(k.points.last(), r.points.first());
        assert_eq!(k.points.len() + r.points.len(), 5);
        assert_eq!(k.sfactors.len(), k.points.len());
        assert_eq!(r.sfactors[0], 0.0);
    }

    #[test]
    fn test_open_spline_at_vertex() {
        let mut session = EditorSession::new();
        let coords = [(0, 0), (10, 10), (20, 0), (30, 10)];
        let id = session.add_object(fixtures::open_spline(&coords, 50)).unwrap();
        session.open_close(id, 0).unwrap();
        session.open_close(id, 2).unwrap();

        let s = session.figure.spline(id).unwrap();
        assert_eq!(s.kind, SplineKind::OpenX);
        assert_eq!(s.points[0], Point::new(20, 0));
        assert_eq!(s.points[3], Point::new(10, 10));
        assert_eq!(s.sfactors, vec![0.0, -1.0, -1.0, 0.0]);

        session.undo();
        let s = session.figure.spline(id).unwrap();
        assert!(s.kind.is_closed());
        assert_eq!(s.points[0], Point::new(0, 0));
        assert_eq!(s.sfactors, vec![-1.0; 4]);

        session.undo();
        let s = session.figure.spline(id).unwrap();
        assert_eq!(s.kind, SplineKind::OpenX);
        assert_eq!(s.sfactors, vec![0.0, -1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_open_spline_rejects_bad_vertex() {
        let mut session = EditorSession::new();
        let id = session
            .add_object(fixtures::closed_spline(&[(0, 0), (10, 10), (20, 0)], 50))
            .unwrap();
        assert!(matches!(
            session.open_close(id, 3),
            Err(HistoryError::InvalidEdit(_))
        ));
        assert!(session.figure.spline(id).unwrap().kind.is_closed());
    }

    #[test]
    fn test_delete_polygon_first_vertex() {
        let mut session = EditorSession::new();
        let coords = [(0, 0), (10, 0), (10, 10), (0, 10)];
        let id = session.add_object(fixtures::polygon(&coords, 50)).unwrap();
        let original = session.figure.line(id).unwrap().points.clone();

        let (removed, _) = session.delete_point(id, 0).unwrap();
        assert_eq!(removed, Point::new(0, 0));
        let points = &session.figure.line(id).unwrap().points;
        assert_eq!(points.len(), 4);
        assert_eq!(points.first(), points.last());
        assert_eq!(points[0], Point::new(10, 0));

        assert!(session.undo().is_complete());
        assert_eq!(session.figure.line(id).unwrap().points, original);
        assert!(session.redo().is_complete());
        assert_eq!(session.figure.line(id).unwrap().points[3], Point::new(10, 0));
    }

    #[test]
    fn test_add_point_rejects_box() {
        let mut session = EditorSession::new();
        let b = session.add_object(fixtures::rect_box(0, 0, 10, 10, 50)).unwrap();
        assert_eq!(
            session.add_point(b, 1, Point::new(3, 3), None),
            Err(HistoryError::PointOutOfRange { id: b, index: 1 })
        );
    }

    #[test]
    fn test_arrowheads_on_closed_shapes_rejected() {
        let mut session = EditorSession::new();
        let b = session.add_object(fixtures::rect_box(0, 0, 10, 10, 50)).unwrap();
        assert!(matches!(
            session.add_arrowhead(b, ArrowEnd::Forward, Arrow::default()),
            Err(HistoryError::InvalidEdit(_))
        ));
    }
}
