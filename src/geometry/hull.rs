//! Convex hull via Andrew's monotone chain.

use super::point::{cross, Point};

/// Indices of the convex hull vertices, positive winding, collinear points removed.
///
/// Fewer than three indices are returned when the input is degenerate.
pub fn convex_hull_indices(points: &[Point]) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return (0..n).collect();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        points[a]
            .x
            .total_cmp(&points[b].x)
            .then(points[a].y.total_cmp(&points[b].y))
            .then(a.cmp(&b))
    });

    let mut hull: Vec<usize> = Vec::with_capacity(2 * n);
    // Turn made by the last two hull vertices and `points[i]`
    let turn = |hull: &[usize], i: usize| {
        let (a, b) = (hull[hull.len() - 2], hull[hull.len() - 1]);
        cross(&points[a], &points[b], &points[i])
    };

    // Lower hull
    for &i in &order {
        while hull.len() >= 2 && turn(&hull, i) <= 0.0 {
            hull.pop();
        }
        hull.push(i);
    }

    // Upper hull
    let lower_len = hull.len() + 1;
    for &i in order.iter().rev().skip(1) {
        while hull.len() >= lower_len && turn(&hull, i) <= 0.0 {
            hull.pop();
        }
        hull.push(i);
    }

    // Last point repeats the first
    hull.pop();
    hull
}

pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    convex_hull_indices(points).into_iter().map(|i| points[i]).collect()
}
