//! Douglas-Peucker polyline simplification.

use log::warn;

use super::point::Point;
use super::polygon::crossing_edges;

/// Simplify an open polyline using the Douglas-Peucker algorithm.
///
/// Endpoints are always kept. Every removed point lies within `epsilon` of
/// the simplified polyline.
pub fn douglas_peucker(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;
    mark_span(points, 0, last, epsilon, &mut keep);

    points
        .iter()
        .zip(&keep)
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect()
}

/// Simplify a closed contour (closing vertex not repeated).
///
/// The contour is split at its first vertex and the vertex farthest from
/// it; both anchors survive and each half is simplified independently.
/// Two repairs follow, each splitting a span at its farthest vertex exactly
/// as Douglas-Peucker itself would, so every removed point stays within
/// `epsilon`:
///
/// - a contour with nonzero area keeps at least three vertices
/// - spans whose chords cross another edge are refined until the outline
///   has no proper self-intersection
pub fn douglas_peucker_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 4 {
        return points.to_vec();
    }

    // Index n is the first vertex again, so every span is a plain range
    let mut ring = points.to_vec();
    ring.push(points[0]);

    let start = points[0];
    let mut far = 1;
    let mut far_dist = 0.0f64;
    for (i, p) in points.iter().enumerate().skip(1) {
        let d = p.distance_to(&start);
        if d > far_dist {
            far_dist = d;
            far = i;
        }
    }

    let mut keep = vec![false; n + 1];
    keep[0] = true;
    keep[far] = true;
    keep[n] = true;
    mark_span(&ring, 0, far, epsilon, &mut keep);
    mark_span(&ring, far, n, epsilon, &mut keep);

    if keep[..n].iter().filter(|&&k| k).count() < 3 {
        restore_third_vertex(&ring, far, epsilon, &mut keep);
    }
    untangle(&ring, epsilon, &mut keep);

    (0..n).filter(|&i| keep[i]).map(|i| ring[i]).collect()
}

/// Recursive Douglas-Peucker over `points[lo..=hi]`, marking kept vertices.
fn mark_span(points: &[Point], lo: usize, hi: usize, epsilon: f64, keep: &mut [bool]) {
    if let Some((idx, dist)) = farthest_in_span(points, lo, hi) {
        if dist > epsilon {
            keep[idx] = true;
            mark_span(points, lo, idx, epsilon, keep);
            mark_span(points, idx, hi, epsilon, keep);
        }
    }
}

/// Split `lo..=hi` at its farthest vertex regardless of `epsilon`, then
/// continue normally on both halves.
fn force_split(points: &[Point], lo: usize, hi: usize, epsilon: f64, keep: &mut [bool]) {
    if let Some((idx, _)) = farthest_in_span(points, lo, hi) {
        keep[idx] = true;
        mark_span(points, lo, idx, epsilon, keep);
        mark_span(points, idx, hi, epsilon, keep);
    }
}

/// Interior vertex of `lo..=hi` farthest from the chord, first on ties.
fn farthest_in_span(points: &[Point], lo: usize, hi: usize) -> Option<(usize, f64)> {
    if hi < lo + 2 {
        return None;
    }
    let (first, last) = (&points[lo], &points[hi]);
    let mut best = (lo + 1, points[lo + 1].distance_to_segment(first, last));
    for (i, p) in points.iter().enumerate().take(hi).skip(lo + 2) {
        let dist = p.distance_to_segment(first, last);
        if dist > best.1 {
            best = (i, dist);
        }
    }
    Some(best)
}

/// Both halves collapsed onto the anchor chord. Split whichever half bulges
/// more; a ring with every vertex on the chord is left alone.
fn restore_third_vertex(ring: &[Point], far: usize, epsilon: f64, keep: &mut [bool]) {
    let n = ring.len() - 1;
    let forward = farthest_in_span(ring, 0, far);
    let back = farthest_in_span(ring, far, n);

    let (lo, hi, dist) = match (forward, back) {
        (Some((_, f)), Some((_, b))) if b > f => (far, n, b),
        (Some((_, f)), _) => (0, far, f),
        (None, Some((_, b))) => (far, n, b),
        (None, None) => return,
    };
    if dist > 0.0 {
        force_split(ring, lo, hi, epsilon, keep);
    }
}

/// Refine spans until no two edges of the kept outline cross.
///
/// Edges of the input ring never cross each other, so any crossing involves
/// at least one edge that still hides removed vertices.
fn untangle(ring: &[Point], epsilon: f64, keep: &mut [bool]) {
    loop {
        let kept: Vec<usize> = (0..ring.len()).filter(|&i| keep[i]).collect();
        // Last entry is the repeated first vertex
        let outline: Vec<Point> = kept[..kept.len() - 1].iter().map(|&i| ring[i]).collect();
        let crossing = crossing_edges(&outline);
        if crossing.is_empty() {
            return;
        }

        let spans: Vec<(usize, usize)> = crossing
            .into_iter()
            .map(|e| (kept[e], kept[e + 1]))
            .filter(|&(lo, hi)| hi >= lo + 2)
            .collect();
        if spans.is_empty() {
            warn!("simplified outline still crosses itself but no span can be refined");
            return;
        }
        for (lo, hi) in spans {
            force_split(ring, lo, hi, epsilon, keep);
        }
    }
}
