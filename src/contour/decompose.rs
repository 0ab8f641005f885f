//! Approximate convex decomposition by deepest-notch splitting.
//!
//! Each piece is compared against its own convex hull. Vertices between two
//! consecutive hull vertices form a pocket, and a pocket vertex's concavity
//! depth is its distance to the hull edge spanning the pocket. While the
//! deepest vertex exceeds the threshold, the piece is cut along an internal
//! diagonal from that vertex. Pieces that are shallow enough are emitted as
//! their convex hull, so every output polygon is convex.

use log::{debug, warn};

use crate::geometry::{convex_hull, convex_hull_indices, cross, Point, Polygon, EPSILON};

/// The deepest concave vertex of a piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Notch {
    pub index: usize,
    pub depth: f64,
}

/// Split `points` (positive winding) into convex polygons.
///
/// Output order is depth-first: the piece following the notch in contour
/// order is fully decomposed before the piece preceding it.
pub fn convex_decompose(points: &[Point], concavity_threshold: f64) -> Vec<Polygon> {
    let mut output = Vec::new();
    let mut stack = vec![points.to_vec()];

    while let Some(piece) = stack.pop() {
        if piece.len() < 3 {
            continue;
        }

        if let Some(notch) = deepest_notch(&piece) {
            if notch.depth > concavity_threshold {
                match split_partner(&piece, notch.index) {
                    Some(partner) => {
                        debug!(
                            "splitting {}-vertex piece at vertex {} (depth {:.3}) toward vertex {}",
                            piece.len(),
                            notch.index,
                            notch.depth,
                            partner
                        );
                        let (first, second) = split_piece(&piece, notch.index, partner);
                        // Pushed in reverse so `first` is processed next
                        stack.push(second);
                        stack.push(first);
                        continue;
                    }
                    None => warn!(
                        "no internal diagonal from notch at vertex {} (depth {:.3}); emitting hull",
                        notch.index, notch.depth
                    ),
                }
            }
        }

        if let Some(hull) = Polygon::new(convex_hull(&piece)) {
            output.push(hull);
        }
    }

    output
}

/// Find the vertex farthest inside the convex hull, first in contour order on ties.
///
/// Returns `None` when the piece has a degenerate hull.
pub fn deepest_notch(points: &[Point]) -> Option<Notch> {
    let n = points.len();
    let mut hull = convex_hull_indices(points);
    if hull.len() < 3 {
        return None;
    }
    // Hull vertices of a simple polygon appear in contour order
    hull.sort_unstable();

    let mut depth = vec![0.0f64; n];
    let m = hull.len();
    for k in 0..m {
        let a = hull[k];
        let b = hull[(k + 1) % m];
        let mut i = (a + 1) % n;
        while i != b {
            depth[i] = points[i].distance_to_line(&points[a], &points[b]);
            i = (i + 1) % n;
        }
    }

    let mut best: Option<Notch> = None;
    for (index, &d) in depth.iter().enumerate() {
        if d > EPSILON && best.is_none_or(|b| d > b.depth) {
            best = Some(Notch { index, depth: d });
        }
    }
    best
}

/// Choose the partner vertex for a diagonal from `notch`.
///
/// Among valid internal diagonals, prefer one that leaves both angles at the
/// notch convex, then one ending at another reflex vertex, then the shortest.
/// Remaining ties go to the first vertex in contour order.
fn split_partner(points: &[Point], notch: usize) -> Option<usize> {
    let n = points.len();
    let prev = &points[(notch + n - 1) % n];
    let next = &points[(notch + 1) % n];
    let at = &points[notch];

    let mut best: Option<((bool, bool, f64), usize)> = None;
    for j in 0..n {
        if j == notch || j == (notch + 1) % n || j == (notch + n - 1) % n {
            continue;
        }
        let target = &points[j];
        let length = at.distance_to(target);
        if length <= EPSILON || !is_internal_diagonal(points, notch, j) {
            continue;
        }

        let resolves = cross(prev, at, target) >= -EPSILON && cross(target, at, next) >= -EPSILON;
        let key = (!resolves, !is_reflex(points, j), length);
        let better = match &best {
            None => true,
            Some((best_key, _)) => {
                (key.0, key.1) < (best_key.0, best_key.1)
                    || ((key.0, key.1) == (best_key.0, best_key.1) && key.2 < best_key.2 - EPSILON)
            }
        };
        if better {
            best = Some((key, j));
        }
    }

    best.map(|(_, j)| j)
}

/// Cut along the diagonal `a -> b`, returning the pieces `a..=b` and `b..=a`.
fn split_piece(points: &[Point], a: usize, b: usize) -> (Vec<Point>, Vec<Point>) {
    let n = points.len();
    let walk = |from: usize, to: usize| {
        let mut piece = Vec::new();
        let mut i = from;
        loop {
            piece.push(points[i]);
            if i == to {
                break;
            }
            i = (i + 1) % n;
        }
        piece
    };
    (walk(a, b), walk(b, a))
}

fn is_reflex(points: &[Point], i: usize) -> bool {
    let n = points.len();
    cross(&points[(i + n - 1) % n], &points[i], &points[(i + 1) % n]) < -EPSILON
}

/// True when the open segment `points[a] -> points[b]` lies inside the polygon.
fn is_internal_diagonal(points: &[Point], a: usize, b: usize) -> bool {
    in_cone(points, a, b) && in_cone(points, b, a) && !crosses_boundary(points, a, b)
}

/// The direction toward `points[b]` leaves `points[a]` into the interior.
fn in_cone(points: &[Point], a: usize, b: usize) -> bool {
    let n = points.len();
    let prev = &points[(a + n - 1) % n];
    let next = &points[(a + 1) % n];
    let at = &points[a];
    let target = &points[b];

    if cross(at, next, prev) >= 0.0 {
        // Convex vertex
        cross(at, target, prev) > EPSILON && cross(target, at, next) > EPSILON
    } else {
        // Reflex vertex
        !(cross(at, target, next) >= -EPSILON && cross(target, at, prev) >= -EPSILON)
    }
}

/// The diagonal touches an edge not incident to either endpoint.
fn crosses_boundary(points: &[Point], a: usize, b: usize) -> bool {
    let n = points.len();
    let (pa, pb) = (&points[a], &points[b]);
    (0..n).any(|k| {
        let k1 = (k + 1) % n;
        if k == a || k == b || k1 == a || k1 == b {
            return false;
        }
        segments_touch(pa, pb, &points[k], &points[k1])
    })
}

/// Closed segments `p1-p2` and `q1-q2` share at least one point.
fn segments_touch(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    let straddles = |u: f64, v: f64| (u > EPSILON && v < -EPSILON) || (u < -EPSILON && v > EPSILON);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    (d1.abs() <= EPSILON && on_segment(q1, q2, p1))
        || (d2.abs() <= EPSILON && on_segment(q1, q2, p2))
        || (d3.abs() <= EPSILON && on_segment(p1, p2, q1))
        || (d4.abs() <= EPSILON && on_segment(p1, p2, q2))
}

/// `p` (known collinear with `a-b`) lies within the segment's bounding box.
fn on_segment(a: &Point, b: &Point, p: &Point) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}
