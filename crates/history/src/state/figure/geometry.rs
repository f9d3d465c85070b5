//! Extents, translation, scaling and smart-link bookkeeping

use serde::{Deserialize, Serialize};
use shared::{BoundingBox, Compound, ObjectId, Point, Shape};

use super::Figure;
use crate::error::HistoryError;

/// How polylines attached to a moved object follow it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    #[default]
    Off,
    /// Attached endpoints move with the object
    Move,
    /// Attached endpoints move and the segment before them stays axis-aligned
    Slide,
}

/// One polyline endpoint attached to a moved object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub line: ObjectId,
    /// Index of the attached endpoint in the polyline
    pub endpoint: usize,
    /// Neighbor of the endpoint, dragged along in slide mode
    pub prev_point: Option<usize>,
    /// In slide mode the neighbor follows horizontally; otherwise vertically.
    /// Fixed when the link is found so undo replays the same axis.
    pub slide_x: bool,
}

fn scale_point(p: Point, origin: Point, sx: f64, sy: f64) -> Point {
    Point::new(
        origin.x + ((p.x - origin.x) as f64 * sx).round() as i32,
        origin.y + ((p.y - origin.y) as f64 * sy).round() as i32,
    )
}

impl Figure {
    pub fn bounds(&self, id: ObjectId) -> Option<BoundingBox> {
        match self.get(id)? {
            Shape::Polyline(l) => l.bounds(),
            Shape::Spline(s) => s.bounds(),
            Shape::Ellipse(e) => Some(e.bounds()),
            Shape::Arc(a) => Some(a.bounds()),
            Shape::Text(t) => Some(t.bounds()),
            Shape::Compound(c) => self.compound_bounds(c),
        }
    }

    /// Union of every member's extent
    pub fn compound_bounds(&self, block: &Compound) -> Option<BoundingBox> {
        block
            .handles()
            .filter_map(|(_, id)| self.bounds(id))
            .reduce(BoundingBox::union)
    }

    /// Shift an object by (dx, dy). Compounds shift every member and their corners.
    pub fn translate(&mut self, id: ObjectId, dx: i32, dy: i32) -> Result<(), HistoryError> {
        let members = match self.shape_mut(id)? {
            Shape::Polyline(l) => {
                l.translate(dx, dy);
                return Ok(());
            }
            Shape::Spline(s) => {
                s.translate(dx, dy);
                return Ok(());
            }
            Shape::Ellipse(e) => {
                e.translate(dx, dy);
                return Ok(());
            }
            Shape::Arc(a) => {
                a.translate(dx, dy);
                return Ok(());
            }
            Shape::Text(t) => {
                t.translate(dx, dy);
                return Ok(());
            }
            Shape::Compound(c) => {
                c.nw_corner = c.nw_corner.offset(dx, dy);
                c.se_corner = c.se_corner.offset(dx, dy);
                c.handles().map(|(_, m)| m).collect::<Vec<_>>()
            }
        };
        for member in members {
            self.translate(member, dx, dy)?;
        }
        Ok(())
    }

    /// Scale an object about `origin`
    pub fn scale(
        &mut self,
        id: ObjectId,
        origin: Point,
        sx: f64,
        sy: f64,
    ) -> Result<(), HistoryError> {
        let members = match self.shape_mut(id)? {
            Shape::Polyline(l) => {
                for p in &mut l.points {
                    *p = scale_point(*p, origin, sx, sy);
                }
                l.radius = (l.radius as f64 * sx.abs().min(sy.abs())).round() as i32;
                return Ok(());
            }
            Shape::Spline(s) => {
                for p in &mut s.points {
                    *p = scale_point(*p, origin, sx, sy);
                }
                return Ok(());
            }
            Shape::Ellipse(e) => {
                e.center = scale_point(e.center, origin, sx, sy);
                e.radii = Point::new(
                    (e.radii.x as f64 * sx).abs().round() as i32,
                    (e.radii.y as f64 * sy).abs().round() as i32,
                );
                return Ok(());
            }
            Shape::Arc(a) => {
                for p in &mut a.points {
                    *p = scale_point(*p, origin, sx, sy);
                }
                a.center = [
                    origin.x as f64 + (a.center[0] - origin.x as f64) * sx,
                    origin.y as f64 + (a.center[1] - origin.y as f64) * sy,
                ];
                if (sx < 0.0) != (sy < 0.0) {
                    a.clockwise = !a.clockwise;
                }
                return Ok(());
            }
            Shape::Text(t) => {
                t.base = scale_point(t.base, origin, sx, sy);
                t.size = (t.size as f64 * sy.abs()) as f32;
                return Ok(());
            }
            Shape::Compound(c) => {
                c.nw_corner = scale_point(c.nw_corner, origin, sx, sy);
                c.se_corner = scale_point(c.se_corner, origin, sx, sy);
                c.handles().map(|(_, m)| m).collect::<Vec<_>>()
            }
        };
        for member in members {
            self.scale(member, origin, sx, sy)?;
        }
        Ok(())
    }

    /// Drag the attached polyline endpoints of a moved object by (dx, dy)
    pub fn adjust_links(
        &mut self,
        mode: LinkMode,
        links: &[LinkInfo],
        dx: i32,
        dy: i32,
    ) -> Result<(), HistoryError> {
        if mode == LinkMode::Off {
            return Ok(());
        }
        for link in links {
            let line = self.line_mut(link.line)?;
            let len = line.points.len();
            if link.endpoint >= len {
                return Err(HistoryError::PointOutOfRange {
                    id: link.line,
                    index: link.endpoint,
                });
            }
            let endpoint = line.points[link.endpoint];
            if mode == LinkMode::Slide {
                if let Some(prev) = link.prev_point.filter(|p| *p < len) {
                    let p = &mut line.points[prev];
                    if link.slide_x {
                        p.x += dx;
                    } else {
                        p.y += dy;
                    }
                }
            }
            line.points[link.endpoint] = endpoint.offset(dx, dy);
        }
        Ok(())
    }
}
