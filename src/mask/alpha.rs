//! Alpha mask input.
//!
//! ## Axis convention
//! The mask is stored as an `(height, width)` array. Row 0 is the top of the
//! sprite and column 0 is the left edge. Mask-space coordinates use the same
//! orientation: `x` grows to the right, `y` grows downward, and pixel
//! `(x, y)` covers the unit square `[x, x + 1] x [y, y + 1]`.

use ndarray::{Array2, ArrayView2};

use crate::error::GeometryError;

/// Dense 2D opacity grid with samples in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaMask {
    data: Array2<f32>,
}

impl AlphaMask {
    /// Wrap an existing `(height, width)` array.
    ///
    /// Zero-sized arrays are accepted here and rejected at extraction time.
    pub fn from_array(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn from_view(view: ArrayView2<'_, f32>) -> Self {
        Self {
            data: view.to_owned(),
        }
    }

    /// Build from row-major float samples (0.0-1.0).
    pub fn from_f32(data: &[f32], width: usize, height: usize) -> Result<Self, GeometryError> {
        check_len(data.len(), width, height, 1)?;
        let data = Array2::from_shape_vec((height, width), data.to_vec())
            .map_err(|e| GeometryError::invalid(e.to_string()))?;
        Ok(Self { data })
    }

    /// Build from row-major byte samples (0-255).
    pub fn from_u8(data: &[u8], width: usize, height: usize) -> Result<Self, GeometryError> {
        check_len(data.len(), width, height, 1)?;
        let samples = data.iter().map(|&v| v as f32 / 255.0).collect();
        let data = Array2::from_shape_vec((height, width), samples)
            .map_err(|e| GeometryError::invalid(e.to_string()))?;
        Ok(Self { data })
    }

    /// Extract the alpha channel from a row-major RGBA8 buffer.
    pub fn from_rgba(data: &[u8], width: usize, height: usize) -> Result<Self, GeometryError> {
        check_len(data.len(), width, height, 4)?;
        let samples = data.chunks_exact(4).map(|px| px[3] as f32 / 255.0).collect();
        let data = Array2::from_shape_vec((height, width), samples)
            .map_err(|e| GeometryError::invalid(e.to_string()))?;
        Ok(Self { data })
    }

    /// Build by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        Self {
            data: Array2::from_shape_fn((height, width), |(y, x)| f(x, y)),
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Sample at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[[y, x]]
    }

    pub fn view(&self) -> ArrayView2<'_, f32> {
        self.data.view()
    }
}

fn check_len(
    len: usize,
    width: usize,
    height: usize,
    channels: usize,
) -> Result<(), GeometryError> {
    let expected = width * height * channels;
    if len != expected {
        return Err(GeometryError::invalid(format!(
            "buffer has {len} samples, expected {expected} for {width}x{height}x{channels}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_u8_normalizes() {
        let mask = AlphaMask::from_u8(&[0, 255, 51, 0, 0, 0], 3, 2).unwrap();
        assert_eq!(mask.width(), 3);
        assert_eq!(mask.height(), 2);
        assert_eq!(mask.get(1, 0), 1.0);
        assert!((mask.get(2, 0) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_from_rgba_reads_alpha() {
        let rgba = [255, 0, 0, 0, 0, 0, 0, 255];
        let mask = AlphaMask::from_rgba(&rgba, 2, 1).unwrap();
        assert_eq!(mask.get(0, 0), 0.0);
        assert_eq!(mask.get(1, 0), 1.0);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = AlphaMask::from_f32(&[0.0; 5], 2, 3).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidInput { .. }));
    }

    #[test]
    fn test_from_fn_orientation() {
        // Row 0 is the top
        let mask = AlphaMask::from_fn(4, 2, |_, y| if y == 0 { 1.0 } else { 0.0 });
        assert_eq!(mask.view()[[0, 3]], 1.0);
        assert_eq!(mask.get(3, 1), 0.0);
    }
}
