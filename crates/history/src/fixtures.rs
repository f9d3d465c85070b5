//! Factory functions for creating test shapes.
//!
//! Every factory returns a detached [`Shape`] with default style; add it
//! through a command such as `EditorSession::add_object`.

use shared::*;

fn points(coords: &[(i32, i32)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

// ── Lines ───────────────────────────────────────────────────────

/// Open polyline through `coords`
pub fn polyline(coords: &[(i32, i32)], depth: i32) -> Shape {
    Shape::Polyline(Line {
        kind: LineKind::Polyline,
        depth,
        style: Style::default(),
        radius: 0,
        points: points(coords),
        for_arrow: None,
        back_arrow: None,
        comments: None,
    })
}

/// Closed polygon through `coords`; the closing vertex is added here
pub fn polygon(coords: &[(i32, i32)], depth: i32) -> Shape {
    let mut pts = points(coords);
    if let Some(&first) = pts.first() {
        pts.push(first);
    }
    Shape::Polyline(Line {
        kind: LineKind::Polygon,
        depth,
        style: Style::default(),
        radius: 0,
        points: pts,
        for_arrow: None,
        back_arrow: None,
        comments: None,
    })
}

/// Axis-aligned box with corners `(x0, y0)` and `(x1, y1)`
pub fn rect_box(x0: i32, y0: i32, x1: i32, y1: i32, depth: i32) -> Shape {
    Shape::Polyline(Line {
        kind: LineKind::Box,
        depth,
        style: Style::default(),
        radius: 0,
        points: points(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
        for_arrow: None,
        back_arrow: None,
        comments: None,
    })
}

// ── Curves ──────────────────────────────────────────────────────

/// Open X-spline with sharp endpoints
pub fn open_spline(coords: &[(i32, i32)], depth: i32) -> Shape {
    let kind = SplineKind::OpenX;
    let mut sfactors = vec![kind.default_sfactor(); coords.len()];
    if let Some(first) = sfactors.first_mut() {
        *first = 0.0;
    }
    if let Some(last) = sfactors.last_mut() {
        *last = 0.0;
    }
    Shape::Spline(Spline {
        kind,
        depth,
        style: Style::default(),
        points: points(coords),
        sfactors,
        for_arrow: None,
        back_arrow: None,
        comments: None,
    })
}

/// Closed X-spline
pub fn closed_spline(coords: &[(i32, i32)], depth: i32) -> Shape {
    let kind = SplineKind::ClosedX;
    Shape::Spline(Spline {
        kind,
        depth,
        style: Style::default(),
        points: points(coords),
        sfactors: vec![kind.default_sfactor(); coords.len()],
        for_arrow: None,
        back_arrow: None,
        comments: None,
    })
}

/// Ellipse with radii 20 x 10 centered at `(x, y)`
pub fn ellipse_at(x: i32, y: i32, depth: i32) -> Shape {
    Shape::Ellipse(Ellipse {
        depth,
        style: Style::default(),
        center: Point::new(x, y),
        radii: Point::new(20, 10),
        angle: 0.0,
        comments: None,
    })
}

/// Counter-clockwise half circle of radius `r` above `(x, y)`
pub fn arc_at(x: i32, y: i32, r: i32, depth: i32) -> Shape {
    Shape::Arc(Arc {
        depth,
        style: Style::default(),
        pie_wedge: false,
        clockwise: false,
        center: [f64::from(x), f64::from(y)],
        points: [Point::new(x + r, y), Point::new(x, y - r), Point::new(x - r, y)],
        for_arrow: None,
        back_arrow: None,
        comments: None,
    })
}

// ── Text ────────────────────────────────────────────────────────

pub fn text_at(x: i32, y: i32, string: &str, depth: i32) -> Shape {
    Shape::Text(Text {
        depth,
        color: 0,
        font: 0,
        size: 12.0,
        angle: 0.0,
        base: Point::new(x, y),
        string: string.to_string(),
        comments: None,
    })
}
