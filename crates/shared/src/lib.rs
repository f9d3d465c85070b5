use std::fmt;

use serde::{Deserialize, Serialize};

pub mod geometry;

pub use geometry::BoundingBox;

/// Stable handle of an object slot in the figure arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Integer canvas coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Arrowhead attached to an open line, spline or arc end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub kind: u8,
    pub style: u8,
    pub thickness: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Arrow {
    fn default() -> Self {
        Self {
            kind: 1,
            style: 1,
            thickness: 1.0,
            width: 60.0,
            height: 120.0,
        }
    }
}

/// User-defined color table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Pen and fill attributes shared by all drawable objects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub pen_color: i32,
    pub fill_color: i32,
    pub fill_style: i32,
    pub thickness: i32,
    /// Dash length or dot gap, depending on the line style
    #[serde(default)]
    pub style_val: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            pen_color: 0,
            fill_color: 7,
            fill_style: -1,
            thickness: 1,
            style_val: 0.0,
        }
    }
}

/// Kind of object stored in a typed list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Polyline,
    Spline,
    Ellipse,
    Arc,
    Text,
    Compound,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Polyline,
        ObjectKind::Spline,
        ObjectKind::Ellipse,
        ObjectKind::Arc,
        ObjectKind::Text,
        ObjectKind::Compound,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Polyline => "polyline",
            ObjectKind::Spline => "spline",
            ObjectKind::Ellipse => "ellipse",
            ObjectKind::Arc => "arc",
            ObjectKind::Text => "text",
            ObjectKind::Compound => "compound",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sub-type of a polyline object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    #[default]
    Polyline,
    Box,
    Polygon,
    ArcBox,
    Picture,
}

/// Polyline, polygon or box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub kind: LineKind,
    pub depth: i32,
    #[serde(default)]
    pub style: Style,
    /// Corner radius, only meaningful for arc boxes
    #[serde(default)]
    pub radius: i32,
    pub points: Vec<Point>,
    #[serde(default)]
    pub for_arrow: Option<Arrow>,
    #[serde(default)]
    pub back_arrow: Option<Arrow>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Sub-type of a spline object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineKind {
    OpenApprox,
    ClosedApprox,
    OpenInterp,
    ClosedInterp,
    #[default]
    OpenX,
    ClosedX,
}

impl SplineKind {
    pub fn is_closed(self) -> bool {
        matches!(
            self,
            SplineKind::ClosedApprox | SplineKind::ClosedInterp | SplineKind::ClosedX
        )
    }

    pub fn is_x(self) -> bool {
        matches!(self, SplineKind::OpenX | SplineKind::ClosedX)
    }

    /// Same family with the opposite open/closed state
    pub fn toggled(self) -> Self {
        match self {
            SplineKind::OpenApprox => SplineKind::ClosedApprox,
            SplineKind::ClosedApprox => SplineKind::OpenApprox,
            SplineKind::OpenInterp => SplineKind::ClosedInterp,
            SplineKind::ClosedInterp => SplineKind::OpenInterp,
            SplineKind::OpenX => SplineKind::ClosedX,
            SplineKind::ClosedX => SplineKind::OpenX,
        }
    }

    /// Shape factor an interior control point gets for this family
    pub fn default_sfactor(self) -> f64 {
        match self {
            SplineKind::OpenApprox | SplineKind::ClosedApprox => 1.0,
            SplineKind::OpenInterp | SplineKind::ClosedInterp => -1.0,
            SplineKind::OpenX | SplineKind::ClosedX => -1.0,
        }
    }
}

/// Approximated, interpolated or X-spline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    pub kind: SplineKind,
    pub depth: i32,
    #[serde(default)]
    pub style: Style,
    pub points: Vec<Point>,
    /// One shape factor per control point
    pub sfactors: Vec<f64>,
    #[serde(default)]
    pub for_arrow: Option<Arrow>,
    #[serde(default)]
    pub back_arrow: Option<Arrow>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Ellipse or circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub depth: i32,
    #[serde(default)]
    pub style: Style,
    pub center: Point,
    pub radii: Point,
    #[serde(default)]
    pub angle: f32,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Three-point circular arc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub depth: i32,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub pie_wedge: bool,
    pub clockwise: bool,
    pub center: [f64; 2],
    pub points: [Point; 3],
    #[serde(default)]
    pub for_arrow: Option<Arrow>,
    #[serde(default)]
    pub back_arrow: Option<Arrow>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Single line of text anchored at its base point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub depth: i32,
    #[serde(default)]
    pub color: i32,
    #[serde(default)]
    pub font: i32,
    pub size: f32,
    #[serde(default)]
    pub angle: f32,
    pub base: Point,
    pub string: String,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Typed object lists plus nested compounds and free-text comments.
///
/// Used for the whole figure, for grouped objects and for saved snapshots.
/// Lists hold handles into the arena; list order is drawing order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Compound {
    #[serde(default)]
    pub nw_corner: Point,
    #[serde(default)]
    pub se_corner: Point,
    #[serde(default)]
    pub lines: Vec<ObjectId>,
    #[serde(default)]
    pub splines: Vec<ObjectId>,
    #[serde(default)]
    pub ellipses: Vec<ObjectId>,
    #[serde(default)]
    pub arcs: Vec<ObjectId>,
    #[serde(default)]
    pub texts: Vec<ObjectId>,
    #[serde(default)]
    pub compounds: Vec<ObjectId>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl Compound {
    pub fn list(&self, kind: ObjectKind) -> &Vec<ObjectId> {
        match kind {
            ObjectKind::Polyline => &self.lines,
            ObjectKind::Spline => &self.splines,
            ObjectKind::Ellipse => &self.ellipses,
            ObjectKind::Arc => &self.arcs,
            ObjectKind::Text => &self.texts,
            ObjectKind::Compound => &self.compounds,
        }
    }

    pub fn list_mut(&mut self, kind: ObjectKind) -> &mut Vec<ObjectId> {
        match kind {
            ObjectKind::Polyline => &mut self.lines,
            ObjectKind::Spline => &mut self.splines,
            ObjectKind::Ellipse => &mut self.ellipses,
            ObjectKind::Arc => &mut self.arcs,
            ObjectKind::Text => &mut self.texts,
            ObjectKind::Compound => &mut self.compounds,
        }
    }

    /// Compound holding a single handle
    pub fn single(kind: ObjectKind, id: ObjectId) -> Self {
        let mut compound = Compound::default();
        compound.list_mut(kind).push(id);
        compound
    }

    /// Every handle listed directly in this compound, tagged with its kind
    pub fn handles(&self) -> impl Iterator<Item = (ObjectKind, ObjectId)> + '_ {
        ObjectKind::ALL
            .into_iter()
            .flat_map(move |kind| self.list(kind).iter().map(move |id| (kind, *id)))
    }

    pub fn len(&self) -> usize {
        ObjectKind::ALL.iter().map(|k| self.list(*k).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First handle of the given kind, if any
    pub fn first(&self, kind: ObjectKind) -> Option<ObjectId> {
        self.list(kind).first().copied()
    }

    pub fn contains(&self, kind: ObjectKind, id: ObjectId) -> bool {
        self.list(kind).contains(&id)
    }
}

/// Object payload stored in an arena slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Polyline(Line),
    Spline(Spline),
    Ellipse(Ellipse),
    Arc(Arc),
    Text(Text),
    Compound(Compound),
}

impl Shape {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Shape::Polyline(_) => ObjectKind::Polyline,
            Shape::Spline(_) => ObjectKind::Spline,
            Shape::Ellipse(_) => ObjectKind::Ellipse,
            Shape::Arc(_) => ObjectKind::Arc,
            Shape::Text(_) => ObjectKind::Text,
            Shape::Compound(_) => ObjectKind::Compound,
        }
    }

    /// Draw-order key; compounds have none of their own
    pub fn depth(&self) -> Option<i32> {
        match self {
            Shape::Polyline(l) => Some(l.depth),
            Shape::Spline(s) => Some(s.depth),
            Shape::Ellipse(e) => Some(e.depth),
            Shape::Arc(a) => Some(a.depth),
            Shape::Text(t) => Some(t.depth),
            Shape::Compound(_) => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            Shape::Polyline(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut Line> {
        match self {
            Shape::Polyline(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_spline(&self) -> Option<&Spline> {
        match self {
            Shape::Spline(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_spline_mut(&mut self) -> Option<&mut Spline> {
        match self {
            Shape::Spline(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Shape::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Shape::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Control points of polylines and splines
    pub fn vertices(&self) -> Option<&Vec<Point>> {
        match self {
            Shape::Polyline(l) => Some(&l.points),
            Shape::Spline(s) => Some(&s.points),
            _ => None,
        }
    }

    pub fn comments_mut(&mut self) -> &mut Option<String> {
        match self {
            Shape::Polyline(l) => &mut l.comments,
            Shape::Spline(s) => &mut s.comments,
            Shape::Ellipse(e) => &mut e.comments,
            Shape::Arc(a) => &mut a.comments,
            Shape::Text(t) => &mut t.comments,
            Shape::Compound(c) => &mut c.comments,
        }
    }

    /// Forward and backward arrowhead slots, for the kinds that carry them
    pub fn arrows_mut(&mut self) -> Option<(&mut Option<Arrow>, &mut Option<Arrow>)> {
        match self {
            Shape::Polyline(l) => Some((&mut l.for_arrow, &mut l.back_arrow)),
            Shape::Spline(s) => Some((&mut s.for_arrow, &mut s.back_arrow)),
            Shape::Arc(a) => Some((&mut a.for_arrow, &mut a.back_arrow)),
            _ => None,
        }
    }
}
