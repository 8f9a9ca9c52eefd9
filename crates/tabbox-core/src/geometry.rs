//! 2D geometry primitives
//!
//! Everything the box generators produce is expressed with these types:
//! a [`Path`] is a start point followed by [`Segment`]s (straight lines and
//! the odd cubic curve), a [`Circle`] is a centre and radius. Serialization to a concrete file format
//! happens elsewhere, at the exporter boundary.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A point (or displacement) in sheet coordinates. +X is right, +Y is down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// True when both coordinates are within `eps` of `other`.
    pub fn approx_eq(&self, other: &Point, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Point) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Axis-aligned direction of travel along a panel edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// +X
    Right,
    /// +Y
    Down,
    /// -X
    Left,
    /// -Y
    Up,
}

impl Direction {
    /// Unit vector of travel.
    pub fn unit(self) -> Point {
        match self {
            Direction::Right => Point::new(1.0, 0.0),
            Direction::Down => Point::new(0.0, 1.0),
            Direction::Left => Point::new(-1.0, 0.0),
            Direction::Up => Point::new(0.0, -1.0),
        }
    }

    /// Selector for the axis perpendicular to travel: `(0, 1)` for horizontal
    /// travel, `(1, 0)` for vertical travel. Always non-negative.
    pub fn cross_axis(self) -> Point {
        if self.is_horizontal() {
            Point::new(0.0, 1.0)
        } else {
            Point::new(1.0, 0.0)
        }
    }

    /// Unit vector rotated a quarter turn clockwise on screen (`(-dy, dx)`).
    pub fn normal(self) -> Point {
        let u = self.unit();
        Point::new(-u.y, u.x)
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }
}

/// Number of chords a cubic is split into when flattened.
pub const CURVE_STEPS: usize = 16;

/// One drawing step of a [`Path`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    /// Straight cut from the current point to the given point.
    LineTo(Point),
    /// Cubic Bezier from the current point through two control points.
    CubicTo { c1: Point, c2: Point, end: Point },
}

impl Segment {
    pub fn end(&self) -> Point {
        match self {
            Segment::LineTo(p) => *p,
            Segment::CubicTo { end, .. } => *end,
        }
    }

    /// Points approximating this segment when drawn from `from`, excluding
    /// `from` itself. A line yields just its end point.
    pub fn flatten(&self, from: Point) -> Vec<Point> {
        match *self {
            Segment::LineTo(p) => vec![p],
            Segment::CubicTo { c1, c2, end } => (1..=CURVE_STEPS)
                .map(|i| {
                    let u = i as f64 / CURVE_STEPS as f64;
                    let v = 1.0 - u;
                    from * (v * v * v) + c1 * (3.0 * v * v * u) + c2 * (3.0 * v * u * u)
                        + end * (u * u * u)
                })
                .collect(),
        }
    }

    fn translate(&mut self, offset: Point) {
        match self {
            Segment::LineTo(p) => *p += offset,
            Segment::CubicTo { c1, c2, end } => {
                *c1 += offset;
                *c2 += offset;
                *end += offset;
            }
        }
    }
}

/// An ordered outline: a start point followed by segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub start: Point,
    pub segments: Vec<Segment>,
}

impl Path {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn line_to(&mut self, p: Point) {
        self.segments.push(Segment::LineTo(p));
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.segments.push(Segment::CubicTo { c1, c2, end });
    }

    pub fn extend_lines<I: IntoIterator<Item = Point>>(&mut self, points: I) {
        self.segments
            .extend(points.into_iter().map(Segment::LineTo));
    }

    /// Append `other`'s segments, dropping its start point. Callers join
    /// paths whose start coincides with this path's end.
    pub fn append(&mut self, other: Path) {
        self.segments.extend(other.segments);
    }

    /// Current end point (the start point when there are no segments).
    pub fn end(&self) -> Point {
        self.segments.last().map(Segment::end).unwrap_or(self.start)
    }

    /// All vertices, start point first. Curve control points are skipped.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start).chain(self.segments.iter().map(Segment::end))
    }

    /// Start point followed by every vertex with curves split into chords.
    pub fn flattened(&self) -> Vec<Point> {
        let mut pts = vec![self.start];
        for seg in &self.segments {
            let from = pts.last().copied().unwrap_or(self.start);
            pts.extend(seg.flatten(from));
        }
        pts
    }

    pub fn has_curves(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::CubicTo { .. }))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the last vertex lands on the start point.
    pub fn is_closed(&self, eps: f64) -> bool {
        !self.segments.is_empty() && self.end().approx_eq(&self.start, eps)
    }

    /// Lengths of every segment, in drawing order. Curves are measured
    /// along their flattened chords.
    pub fn segment_lengths(&self) -> Vec<f64> {
        let mut prev = self.start;
        self.segments
            .iter()
            .map(|s| {
                let mut len = 0.0;
                for p in s.flatten(prev) {
                    len += prev.distance_to(&p);
                    prev = p;
                }
                len
            })
            .collect()
    }

    pub fn translate(&mut self, offset: Point) {
        self.start += offset;
        for seg in &mut self.segments {
            seg.translate(offset);
        }
    }

    /// Bounds of the drawn shape. Curves contribute their flattened points,
    /// so the box stays tight even where control points stick out.
    pub fn bounds(&self) -> Bounds {
        let mut b = Bounds::empty();
        for p in self.flattened() {
            b.include(p);
        }
        b
    }
}

/// A circular hole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn bounds(&self) -> Bounds {
        let r = Point::new(self.radius, self.radius);
        let mut b = Bounds::empty();
        b.include(self.center - r);
        b.include(self.center + r);
        b
    }
}

/// Axis-aligned bounding box. Starts empty (inverted) until a point is added.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            min: Point::new(f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include(&mut self, p: Point) {
        if !p.x.is_finite() || !p.y.is_finite() {
            return;
        }
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn merge(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.include(other.min);
        self.include(other.max);
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }
}
