//! Closed polygons and ordered polygon collections.

use serde::Serialize;

use super::point::{cross, Point};

/// Tolerance used for convexity and containment tests.
pub const EPSILON: f64 = 1e-9;

/// A closed polygon with positive shoelace area in mask space.
///
/// Consecutive vertices are distinct and the closing edge is implicit
/// (the last vertex is not repeated).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Build a polygon, normalizing winding and dropping repeated vertices.
    ///
    /// Returns `None` when fewer than three distinct vertices remain or the
    /// enclosed area is zero.
    pub fn new(vertices: Vec<Point>) -> Option<Self> {
        let mut vertices = dedup_closed(vertices);
        if vertices.len() < 3 {
            return None;
        }
        let area = signed_area(&vertices);
        if area.abs() <= EPSILON {
            return None;
        }
        if area < 0.0 {
            vertices.reverse();
        }
        Some(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn into_vertices(self) -> Vec<Point> {
        self.vertices
    }

    /// Iterate over edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Point, Point) {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.vertices {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// True when no vertex turns against the winding by more than `tolerance`.
    pub fn is_convex(&self, tolerance: f64) -> bool {
        let n = self.vertices.len();
        (0..n).all(|i| {
            let a = &self.vertices[i];
            let b = &self.vertices[(i + 1) % n];
            let c = &self.vertices[(i + 2) % n];
            // Normalize by edge lengths so the tolerance is a distance
            let scale = a.distance_to(b).max(EPSILON);
            cross(a, b, c) / scale >= -tolerance
        })
    }

    /// Point containment, boundary inclusive.
    pub fn contains(&self, p: &Point) -> bool {
        if self.edges().any(|(a, b)| p.distance_to_segment(a, b) <= 1e-7) {
            return true;
        }
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// Ordered collection of output polygons.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    pub fn as_slice(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn total_vertices(&self) -> usize {
        self.polygons.iter().map(Polygon::len).sum()
    }

    pub fn total_area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// True when any polygon contains `p`.
    pub fn covers(&self, p: &Point) -> bool {
        self.polygons.iter().any(|poly| poly.contains(p))
    }

    /// Flatten to `[num_polygons, n1, x, y, ..., n2, ...]` for FFI.
    pub fn to_flat(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(1 + self.len() + 2 * self.total_vertices());
        result.push(self.polygons.len() as f32);
        for polygon in &self.polygons {
            result.push(polygon.len() as f32);
            for p in polygon.vertices() {
                result.push(p.x as f32);
                result.push(p.y as f32);
            }
        }
        result
    }
}

impl Extend<Polygon> for PolygonSet {
    fn extend<I: IntoIterator<Item = Polygon>>(&mut self, iter: I) {
        self.polygons.extend(iter);
    }
}

impl IntoIterator for PolygonSet {
    type Item = Polygon;
    type IntoIter = std::vec::IntoIter<Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.into_iter()
    }
}

impl<'a> IntoIterator for &'a PolygonSet {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

/// Signed shoelace area. Positive means clockwise on screen (y down).
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            points[i].x * points[j].y - points[j].x * points[i].y
        })
        .sum::<f64>()
        / 2.0
}

/// Indices of edges that properly cross a non-adjacent edge, ascending.
///
/// Edge `i` runs from `points[i]` to `points[(i + 1) % n]`. Edges that only
/// touch at a vertex or overlap collinearly are not reported, so a weakly
/// simple outline (a pinch vertex visited twice) yields no crossings.
pub fn crossing_edges(points: &[Point]) -> Vec<usize> {
    let n = points.len();
    if n < 4 {
        return Vec::new();
    }
    let mut crossing = vec![false; n];
    for i in 0..n {
        let (a, b) = (&points[i], &points[(i + 1) % n]);
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (c, d) = (&points[j], &points[(j + 1) % n]);
            if segments_cross(a, b, c, d) {
                crossing[i] = true;
                crossing[j] = true;
            }
        }
    }
    (0..n).filter(|&i| crossing[i]).collect()
}

/// Segments `a-b` and `c-d` intersect at a single point interior to both.
fn segments_cross(a: &Point, b: &Point, c: &Point, d: &Point) -> bool {
    let opposite =
        |u: f64, v: f64| (u > EPSILON && v < -EPSILON) || (u < -EPSILON && v > EPSILON);
    opposite(cross(c, d, a), cross(c, d, b)) && opposite(cross(a, b, c), cross(a, b, d))
}

/// Remove consecutive duplicates, treating the sequence as closed.
fn dedup_closed(mut points: Vec<Point>) -> Vec<Point> {
    points.dedup_by(|a, b| a.distance_to(b) <= EPSILON);
    while points.len() > 1 {
        let first = points[0];
        let last = points[points.len() - 1];
        if first.distance_to(&last) <= EPSILON {
            points.pop();
        } else {
            break;
        }
    }
    points
}
