//! Geometry helpers: points, segments, intersections and rotations.
//!
//! Everything here is a pure function of its inputs. Positions and
//! displacements share the same [`Point`] type.

use crate::error::GeometryError;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A 2D point or vector in arena coordinates (pixels, y pointing down)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn distance(&self, other: &Point) -> f64 {
        length(vector(*self, *other))
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

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// Which side of the first vector the second one turns to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    Collinear,
    CounterClockwise,
}

pub fn length(v: Point) -> f64 {
    v.length_squared().sqrt()
}

/// Vector from `a` to `b`
pub fn vector(a: Point, b: Point) -> Point {
    b - a
}

pub fn distance(a: Point, b: Point) -> f64 {
    length(vector(a, b))
}

/// Scales `v` to unit length.
///
/// Unguarded: a zero vector divides by zero and yields non-finite components.
/// Use [`try_normalize`] when the input may be zero.
pub fn normalize(v: Point) -> Point {
    v / length(v)
}

/// Like [`normalize`] but fails on a zero-length input
pub fn try_normalize(v: Point) -> Result<Point, GeometryError> {
    let len = length(v);
    if len == 0.0 {
        return Err(GeometryError::ZeroLength);
    }
    Ok(v / len)
}

pub fn orientation(v1: Point, v2: Point) -> Orientation {
    let det = v1.cross(v2);
    if det < 0.0 {
        Orientation::Clockwise
    } else if det > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Collinear
    }
}

/// Orientation of the turn a -> b -> c
fn turn(a: Point, b: Point, c: Point) -> Orientation {
    orientation(vector(a, b), vector(b, c))
}

/// Checks whether segment CD crosses the infinite line through A and B.
/// A collinear endpoint counts as a crossing.
pub fn line_intersects_segment(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = turn(a, b, c);
    if o1 == Orientation::Collinear {
        return true;
    }
    let o2 = turn(a, b, d);
    if o2 == Orientation::Collinear {
        return true;
    }
    o1 != o2
}

/// Checks whether segments AB and CD cross, using the two-sided line test.
///
/// Any collinear configuration counts as an intersection, even when the
/// collinear point lies outside the other segment's extent. Use
/// [`segments_intersect_exact`] for a proper overlap test.
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    line_intersects_segment(a, b, c, d) && line_intersects_segment(c, d, a, b)
}

/// Whether `p`, already known to be collinear with AB, lies within AB's bounding box
fn within_extent(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Checks whether segments AB and CD share at least one point
pub fn segments_intersect_exact(a: Point, b: Point, c: Point, d: Point) -> bool {
    let o1 = turn(a, b, c);
    let o2 = turn(a, b, d);
    let o3 = turn(c, d, a);
    let o4 = turn(c, d, b);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && within_extent(a, b, c))
        || (o2 == Orientation::Collinear && within_extent(a, b, d))
        || (o3 == Orientation::Collinear && within_extent(c, d, a))
        || (o4 == Orientation::Collinear && within_extent(c, d, b))
}

/// Crossing point of the lines through AB and CD.
///
/// Only meaningful when the segments intersect. Returns `None` for parallel
/// (or collinear) lines, where no single crossing point exists.
pub fn segments_intersection(a: Point, b: Point, c: Point, d: Point) -> Option<Point> {
    let r = vector(a, b);
    let s = vector(c, d);
    let denom = r.cross(s);
    if denom == 0.0 {
        return None;
    }
    let t = vector(a, c).cross(s) / denom;
    Some(a + r * t)
}

/// Orthogonal projection of `p` onto the infinite line through A and B
pub fn orthogonal_projection(p: Point, a: Point, b: Point) -> Point {
    let delta = vector(a, b);
    let r = delta.dot(vector(a, p)) / delta.length_squared();
    a + delta * r
}

/// Point of segment AB closest to `p`
pub fn closest_point_on_segment(a: Point, b: Point, p: Point) -> Point {
    // Vertical segment: the projection would divide by zero on degenerate
    // input, and the x clamp below cannot order the endpoints
    if a.x == b.x {
        let (upper, lower) = if a.y > b.y { (b, a) } else { (a, b) };
        if p.y > upper.y && p.y < lower.y {
            return Point::new(a.x, p.y);
        }
        return if (a.y - p.y).abs() < (b.y - p.y).abs() { a } else { b };
    }

    let q = orthogonal_projection(p, a, b);
    let (left, right) = if a.x > b.x { (b, a) } else { (a, b) };

    if q.x < left.x {
        left
    } else if q.x > right.x {
        right
    } else {
        q
    }
}

/// Whether segment AB touches or crosses the circle
pub fn segment_intersects_circle(a: Point, b: Point, center: Point, radius: f64) -> bool {
    let q = closest_point_on_segment(a, b, center);
    radius * radius >= vector(center, q).length_squared()
}

/// Rotates `v` by `angle` radians
pub fn rotate(v: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(v.x * cos - v.y * sin, v.y * cos + v.x * sin)
}

/// Angle of `v` in radians, in `(-PI, PI]`
pub fn heading(v: Point) -> f64 {
    v.y.atan2(v.x)
}
