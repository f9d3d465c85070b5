use serde::{Deserialize, Serialize};

use crate::{Arc, Ellipse, Line, Point, Spline, Text};

/// Axis-aligned screen region in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` for an empty slice
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let mut it = points.iter();
        let first = *it.next()?;
        let mut b = BoundingBox::new(first, first);
        for p in it {
            b.min.x = b.min.x.min(p.x);
            b.min.y = b.min.y.min(p.y);
            b.max.x = b.max.x.max(p.x);
            b.max.y = b.max.y.max(p.y);
        }
        Some(b)
    }

    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn expand(self, by: i32) -> BoundingBox {
        BoundingBox {
            min: self.min.offset(-by, -by),
            max: self.max.offset(by, by),
        }
    }

    pub fn translate(self, dx: i32, dy: i32) -> BoundingBox {
        BoundingBox {
            min: self.min.offset(dx, dy),
            max: self.max.offset(dx, dy),
        }
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }
}

impl Line {
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points).map(|b| b.expand(self.style.thickness / 2))
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for p in &mut self.points {
            *p = p.offset(dx, dy);
        }
    }
}

impl Spline {
    /// Control-polygon bounds; the curve never leaves its control hull
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points).map(|b| b.expand(self.style.thickness / 2))
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for p in &mut self.points {
            *p = p.offset(dx, dy);
        }
    }
}

impl Ellipse {
    pub fn bounds(&self) -> BoundingBox {
        // a rotated ellipse fits in the circle of its larger radius
        let (rx, ry) = if self.angle.abs() <= f32::EPSILON {
            (self.radii.x.abs(), self.radii.y.abs())
        } else {
            let r = self.radii.x.abs().max(self.radii.y.abs());
            (r, r)
        };
        BoundingBox::new(
            self.center.offset(-rx, -ry),
            self.center.offset(rx, ry),
        )
        .expand(self.style.thickness / 2)
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.center = self.center.offset(dx, dy);
    }
}

impl Arc {
    pub fn bounds(&self) -> BoundingBox {
        let mut b = BoundingBox::new(self.points[0], self.points[0]);
        for p in &self.points[1..] {
            b = b.union(BoundingBox::new(*p, *p));
        }
        b.expand(self.style.thickness / 2)
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.center[0] += dx as f64;
        self.center[1] += dy as f64;
        for p in &mut self.points {
            *p = p.offset(dx, dy);
        }
    }
}

impl Text {
    /// Approximate extent from character count and font size
    pub fn bounds(&self) -> BoundingBox {
        let w = (self.string.chars().count().max(1) as f32 * self.size * 0.6).round() as i32;
        let h = (self.size * 1.2).round() as i32;
        BoundingBox::new(
            Point::new(self.base.x, self.base.y - h),
            Point::new(self.base.x + w, self.base.y),
        )
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.base = self.base.offset(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LineKind, Style};

    fn line(points: Vec<Point>) -> Line {
        Line {
            kind: LineKind::Polyline,
            depth: 50,
            style: Style {
                thickness: 0,
                ..Style::default()
            },
            radius: 0,
            points,
            for_arrow: None,
            back_arrow: None,
            comments: None,
        }
    }

    #[test]
    fn test_from_points_empty() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_line_bounds_and_translate() {
        let mut l = line(vec![Point::new(0, 0), Point::new(10, 5), Point::new(-3, 8)]);
        let b = l.bounds().unwrap();
        assert_eq!(b.min, Point::new(-3, 0));
        assert_eq!(b.max, Point::new(10, 8));

        l.translate(5, -3);
        assert_eq!(l.points[0], Point::new(5, -3));
        assert_eq!(l.bounds().unwrap(), b.translate(5, -3));
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new(Point::new(0, 0), Point::new(2, 2));
        let b = BoundingBox::new(Point::new(-1, 1), Point::new(1, 5));
        let u = a.union(b);
        assert_eq!(u.min, Point::new(-1, 0));
        assert_eq!(u.max, Point::new(2, 5));
        assert_eq!(u.width(), 3);
        assert_eq!(u.height(), 5);
    }

    #[test]
    fn test_text_bounds_grow_with_length() {
        let short = Text {
            depth: 10,
            color: 0,
            font: 0,
            size: 12.0,
            angle: 0.0,
            base: Point::new(100, 100),
            string: "ab".into(),
            comments: None,
        };
        let long = Text {
            string: "abcdef".into(),
            ..short.clone()
        };
        assert!(long.bounds().width() > short.bounds().width());
        assert_eq!(short.bounds().max.y, 100);
    }
}
