//! Outer boundary tracing on the pixel-corner grid.
//!
//! Contours run along pixel edges rather than through pixel centers, so a
//! straight run of N cells yields 2 vertices instead of N. The tracer walks
//! with the region on its right-hand side (clockwise on screen) and records
//! a vertex only where the direction changes.
//!
//! Only the outer boundary of each region is traced. Transparent holes
//! inside a region are therefore filled.

use log::warn;

use crate::geometry::{signed_area, Point};
use crate::mask::{BinaryGrid, Region, RegionMap};

/// Closed outer boundary of one region, in mask-space units.
#[derive(Clone, Debug)]
pub struct TracedContour {
    /// Region label this contour outlines.
    pub label: u32,
    /// Corner vertices, positive winding, closing vertex not repeated.
    pub points: Vec<Point>,
    /// Enclosed area in mask-space units squared (holes included).
    pub area: f64,
}

/// Trace the outer boundary of every region in discovery order.
///
/// `mask_size` is `(width, height)` of the original mask; vertices on the
/// right and bottom edges are clamped to it when the last block is partial.
pub fn trace_regions(
    grid: &BinaryGrid,
    regions: &RegionMap,
    mask_size: (usize, usize),
) -> Vec<TracedContour> {
    regions
        .regions()
        .iter()
        .map(|region| trace_region(grid, regions, region, mask_size))
        .collect()
}

/// Trace one region's outer boundary.
pub fn trace_region(
    grid: &BinaryGrid,
    regions: &RegionMap,
    region: &Region,
    mask_size: (usize, usize),
) -> TracedContour {
    let corners = trace_corners(regions, region, grid.width(), grid.height());
    let scale = grid.scale() as f64;
    let (mask_w, mask_h) = (mask_size.0 as f64, mask_size.1 as f64);

    let points: Vec<Point> = corners
        .iter()
        .map(|&(x, y)| {
            let x = (x as f64 * scale).min(mask_w);
            let y = (y as f64 * scale).min(mask_h);
            Point::new(x, y)
        })
        .collect();
    let area = signed_area(&points);

    TracedContour {
        label: region.label,
        points,
        area,
    }
}

/// Walk the region boundary in grid-corner coordinates.
///
/// Starts at the top-left corner of the region's seed cell heading right.
/// That corner touches no other cell of the region (the seed is the
/// topmost, leftmost cell), so returning to it closes the loop.
fn trace_corners(
    regions: &RegionMap,
    region: &Region,
    width: usize,
    height: usize,
) -> Vec<(i64, i64)> {
    let inside = |x: i64, y: i64| regions.label_at(x, y) == region.label;

    let start = (region.seed.0 as i64, region.seed.1 as i64);
    let mut points = vec![start];
    let (mut x, mut y) = start;
    let (mut dx, mut dy) = (1i64, 0i64);

    // Each boundary edge is walked at most once
    let max_steps = 4 * (width + 1) * (height + 1) + 4;
    let mut steps = 0;

    x += dx;
    y += dy;

    while (x, y) != start {
        // Cells ahead of the current vertex, on the left and right of the heading
        let (lx, ly) = (dy, -dx);
        let (rx, ry) = (-dy, dx);
        let ahead_left = inside(x + (dx + lx - 1) / 2, y + (dy + ly - 1) / 2);
        let ahead_right = inside(x + (dx + rx - 1) / 2, y + (dy + ry - 1) / 2);

        let (ndx, ndy) = if !ahead_right {
            // Convex corner, or a diagonal saddle: keep diagonal cells apart
            (rx, ry)
        } else if ahead_left {
            // Concave corner
            (lx, ly)
        } else {
            (dx, dy)
        };

        if (ndx, ndy) != (dx, dy) {
            points.push((x, y));
            dx = ndx;
            dy = ndy;
        }

        x += dx;
        y += dy;

        steps += 1;
        if steps > max_steps {
            warn!(
                "boundary trace of region {} did not close after {} steps",
                region.label, steps
            );
            break;
        }
    }

    points
}
