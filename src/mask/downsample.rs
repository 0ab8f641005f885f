//! Block downsampling of an alpha mask into a boolean grid.
//!
//! The mask is partitioned into `factor x factor` blocks starting at the
//! top-left corner. Blocks on the right and bottom edges may be partial;
//! they still map to a full grid cell, so the grid covers every sample.

use serde::{Deserialize, Serialize};

use super::alpha::AlphaMask;

/// Rule deciding whether a block of samples is opaque.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownsamplePolicy {
    /// Opaque if any sample in the block is opaque. Keeps thin features.
    #[default]
    Any,
    /// Opaque if strictly more than half of the in-bounds samples are opaque.
    Majority,
}

/// Boolean occupancy grid with the scale back to mask space.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    scale: usize,
}

impl BinaryGrid {
    pub fn new(width: usize, height: usize, scale: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
            scale,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Mask-space size of one cell edge.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Cell occupancy, treating out-of-bounds as empty.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.cells[y as usize * self.width + x as usize]
        } else {
            false
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.cells[y * self.width + x] = value;
    }

    pub fn count_opaque(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// Coarsen `mask` into a boolean grid.
///
/// A sample is opaque when strictly greater than `threshold`. `factor` must
/// be positive; the caller validates it.
pub fn downsample(
    mask: &AlphaMask,
    factor: usize,
    threshold: f32,
    policy: DownsamplePolicy,
) -> BinaryGrid {
    debug_assert!(factor > 0);
    let (width, height) = (mask.width(), mask.height());
    let grid_w = width.div_ceil(factor);
    let grid_h = height.div_ceil(factor);
    let mut grid = BinaryGrid::new(grid_w, grid_h, factor);

    for gy in 0..grid_h {
        let y0 = gy * factor;
        let y1 = (y0 + factor).min(height);
        for gx in 0..grid_w {
            let x0 = gx * factor;
            let x1 = (x0 + factor).min(width);

            let opaque = match policy {
                DownsamplePolicy::Any => {
                    (y0..y1).any(|y| (x0..x1).any(|x| mask.get(x, y) > threshold))
                }
                DownsamplePolicy::Majority => {
                    let total = (y1 - y0) * (x1 - x0);
                    let count = (y0..y1)
                        .flat_map(|y| (x0..x1).map(move |x| (x, y)))
                        .filter(|&(x, y)| mask.get(x, y) > threshold)
                        .count();
                    count * 2 > total
                }
            };
            grid.set(gx, gy, opaque);
        }
    }

    grid
}
