//! WebAssembly exports.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Masks arrive
//! as the RGBA bytes of a canvas `ImageData`; only the alpha channel is read.
//!
//! ## Output Layout
//!
//! Polygons are returned as one flat `Float32Array`:
//! `[num_polygons, n1, x, y, x, y, ..., n2, x, y, ...]`

use wasm_bindgen::prelude::*;

use crate::config::ExtractionConfig;
use crate::error::GeometryError;
use crate::extract::extract;
use crate::mask::AlphaMask;

fn to_js_error(err: GeometryError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn run(
    data: &[u8],
    width: usize,
    height: usize,
    config: &ExtractionConfig,
) -> Result<Vec<f32>, JsValue> {
    let mask = AlphaMask::from_rgba(data, width, height).map_err(to_js_error)?;
    let extraction = extract(&mask, config).map_err(to_js_error)?;
    Ok(extraction.polygons.to_flat())
}

/// Extract convex collision polygons from RGBA pixels.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `downsample` - Block size used before tracing
/// * `quality` - Maximum outline deviation in pixels
/// * `concavity` - Dimple depth that triggers a split (`Infinity` disables splitting)
///
/// # Returns
/// Flat polygon array (see module docs)
#[wasm_bindgen]
pub fn extract_polygons_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    downsample: usize,
    quality: f64,
    concavity: f64,
) -> Result<Vec<f32>, JsValue> {
    let config = ExtractionConfig::new(downsample, quality, concavity);
    run(data, width, height, &config)
}

/// Same as [`extract_polygons_wasm`] with quality 2.0 and concavity 2.0.
#[wasm_bindgen]
pub fn extract_polygons_default_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    downsample: usize,
) -> Result<Vec<f32>, JsValue> {
    let config = ExtractionConfig::default().with_downsample(downsample);
    run(data, width, height, &config)
}
