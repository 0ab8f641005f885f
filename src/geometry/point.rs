//! 2D points in mask space.

use serde::{Deserialize, Serialize};

/// A 2D point in mask-space units (x right, y down).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance from this point to a line segment.
    pub fn distance_to_segment(&self, start: &Point, end: &Point) -> f64 {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let length_sq = dx * dx + dy * dy;

        if length_sq < 1e-18 {
            // Segment is essentially a point
            return self.distance_to(start);
        }

        // Project point onto line, clamping to segment
        let t = ((self.x - start.x) * dx + (self.y - start.y) * dy) / length_sq;
        let t = t.clamp(0.0, 1.0);

        let px = self.x - (start.x + t * dx);
        let py = self.y - (start.y + t * dy);
        (px * px + py * py).sqrt()
    }

    /// Perpendicular distance from this point to the infinite line through `a` and `b`.
    pub fn distance_to_line(&self, a: &Point, b: &Point) -> f64 {
        let length = a.distance_to(b);
        if length < 1e-9 {
            return self.distance_to(a);
        }
        cross(a, b, self).abs() / length
    }
}

/// Z component of `(b - a) x (c - a)`.
///
/// Positive when `a -> b -> c` turns clockwise on screen (y down), which is
/// the winding used for every output polygon.
#[inline]
pub fn cross(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}
