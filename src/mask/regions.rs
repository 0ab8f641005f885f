//! Connected opaque regions of a binary grid.
//!
//! Regions are 4-connected: cells touching only at a corner belong to
//! different regions. This matches the boundary tracer's saddle rule, so
//! every traced outline is the boundary of exactly one region.

use std::collections::VecDeque;

use super::downsample::BinaryGrid;

/// One connected opaque region.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Label stored in [`RegionMap::label_at`] for this region's cells (1-based).
    pub label: u32,
    /// First cell in raster order: topmost row, leftmost within it.
    pub seed: (usize, usize),
    pub cell_count: usize,
}

/// Per-cell region labels plus region metadata in discovery order.
#[derive(Clone, Debug)]
pub struct RegionMap {
    width: usize,
    height: usize,
    labels: Vec<u32>,
    regions: Vec<Region>,
}

impl RegionMap {
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Label at `(x, y)`, 0 for transparent or out-of-bounds cells.
    #[inline]
    pub fn label_at(&self, x: i64, y: i64) -> u32 {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.labels[y as usize * self.width + x as usize]
        } else {
            0
        }
    }
}

/// Label 4-connected opaque regions in raster discovery order.
pub fn label_regions(grid: &BinaryGrid) -> RegionMap {
    let (width, height) = (grid.width(), grid.height());
    let mut labels = vec![0u32; width * height];
    let mut regions = Vec::new();
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            if !grid.get(x as i64, y as i64) || labels[y * width + x] != 0 {
                continue;
            }

            let label = regions.len() as u32 + 1;
            let mut cell_count = 0;
            labels[y * width + x] = label;
            queue.push_back((x, y));

            while let Some((cx, cy)) = queue.pop_front() {
                cell_count += 1;
                for (dx, dy) in [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)] {
                    let nx = cx as i64 + dx;
                    let ny = cy as i64 + dy;
                    if !grid.get(nx, ny) {
                        continue;
                    }
                    let nidx = ny as usize * width + nx as usize;
                    if labels[nidx] == 0 {
                        labels[nidx] = label;
                        queue.push_back((nx as usize, ny as usize));
                    }
                }
            }

            regions.push(Region {
                label,
                seed: (x, y),
                cell_count,
            });
        }
    }

    RegionMap {
        width,
        height,
        labels,
        regions,
    }
}
